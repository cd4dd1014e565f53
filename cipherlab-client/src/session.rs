// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use cipherlab_core::scheme::MessageResponse;
use cipherlab_core::scheme::rsa::Rsa;
use cipherlab_core::{
    Action, AdapterError, Endpoint, Party, PartyId, Registry, RegistryError, SchemeAdapter, gate,
};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::backend::Backend;

/// Names of the parties a session gets seeded with by [`SessionBuilder::with_default_parties`].
pub const DEFAULT_PARTIES: [&str; 2] = ["Alice", "Bob"];

pub struct SessionBuilder<S>
where
    S: SchemeAdapter,
{
    config: S::Config,
    parties: Vec<String>,
}

impl<S> Default for SessionBuilder<S>
where
    S: SchemeAdapter,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SessionBuilder<S>
where
    S: SchemeAdapter,
{
    pub fn new() -> Self {
        Self {
            config: S::Config::default(),
            parties: Vec::new(),
        }
    }

    pub fn config(mut self, config: S::Config) -> Self {
        self.config = config;
        self
    }

    pub fn party(mut self, name: impl Into<String>) -> Self {
        self.parties.push(name.into());
        self
    }

    pub fn with_default_parties(self) -> Self {
        DEFAULT_PARTIES
            .into_iter()
            .fold(self, |builder, name| builder.party(name))
    }

    pub fn build<B>(self, backend: B) -> Result<Session<B, S>, RegistryError>
    where
        B: Backend,
    {
        let mut registry = Registry::new();
        for name in self.parties {
            registry.insert(name)?;
        }

        Ok(Session::from_parts(backend, self.config, registry))
    }
}

/// Exchange between simulated parties using one scheme.
///
/// The session is the validating caller in front of the permissive [`Registry`]: every action is
/// checked against the [`gate`] before anything is requested or mutated. Requests are built from a
/// snapshot of the registry and no lock is held while waiting for the computation service, so
/// actions on different parties can be in flight at the same time. Two actions on the same party
/// race and the last response wins.
///
/// Results arriving for a party which got removed in the meantime are discarded.
pub struct Session<B, S>
where
    B: Backend,
    S: SchemeAdapter,
{
    inner: Arc<Inner<B, S>>,
}

struct Inner<B, S>
where
    B: Backend,
    S: SchemeAdapter,
{
    backend: B,
    config: RwLock<S::Config>,
    registry: RwLock<Registry<S>>,
}

impl<B, S> Clone for Session<B, S>
where
    B: Backend,
    S: SchemeAdapter,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B, S> Session<B, S>
where
    B: Backend,
    S: SchemeAdapter,
{
    /// Returns a session without any parties, using the scheme's default configuration.
    pub fn new(backend: B) -> Self {
        Self::from_parts(backend, S::Config::default(), Registry::new())
    }

    fn from_parts(backend: B, config: S::Config, registry: Registry<S>) -> Self {
        let inner = Inner {
            backend,
            config: RwLock::new(config),
            registry: RwLock::new(registry),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    pub async fn config(&self) -> S::Config {
        self.inner.config.read().await.clone()
    }

    /// Changes the parameters used for all following requests.
    pub async fn set_config(&self, config: S::Config) {
        *self.inner.config.write().await = config;
    }

    /// Probes the computation service.
    pub async fn health(&self) -> bool {
        match self.inner.backend.health().await {
            Ok(()) => true,
            Err(err) => {
                warn!("computation service unavailable: {}", err);
                false
            }
        }
    }

    pub async fn add_party(&self, name: &str) -> Result<PartyId, SessionError<B::Error>> {
        let mut registry = self.inner.registry.write().await;
        let id = registry.insert(name)?;
        debug!(party = %id, name = %name, "added party");
        Ok(id)
    }

    /// Removes a party. Pending results for it will be discarded once they arrive.
    pub async fn remove_party(&self, id: PartyId) -> Result<Party<S>, SessionError<B::Error>> {
        let mut registry = self.inner.registry.write().await;
        let party = registry
            .remove(id)
            .ok_or(SessionError::UnknownParty(id))?;
        debug!(party = %id, name = party.name(), "removed party");
        Ok(party)
    }

    /// Snapshot of a party.
    pub async fn party(&self, id: PartyId) -> Option<Party<S>> {
        self.inner.registry.read().await.get(id).cloned()
    }

    pub async fn find_party(&self, name: &str) -> Option<PartyId> {
        self.inner
            .registry
            .read()
            .await
            .find(name)
            .map(|party| party.id())
    }

    /// Key pair of a party, if any.
    pub async fn key_pair(&self, id: PartyId) -> Option<S::KeyPair> {
        self.inner
            .registry
            .read()
            .await
            .get(id)
            .and_then(|party| party.key_pair().cloned())
    }

    /// Snapshot of all parties in order of creation.
    pub async fn parties(&self) -> Vec<Party<S>> {
        self.inner.registry.read().await.iter().cloned().collect()
    }

    pub async fn set_plaintext(
        &self,
        id: PartyId,
        plaintext: impl Into<String>,
    ) -> Result<(), SessionError<B::Error>> {
        let mut registry = self.inner.registry.write().await;
        let party = registry.get_mut(id).ok_or(SessionError::UnknownParty(id))?;
        party.set_plaintext(plaintext);
        Ok(())
    }

    pub async fn set_target(
        &self,
        id: PartyId,
        target: PartyId,
    ) -> Result<(), SessionError<B::Error>> {
        self.inner.registry.write().await.set_target(id, target)?;
        trace!(party = %id, target = %target, "changed target");
        Ok(())
    }

    pub async fn clear_target(&self, id: PartyId) -> Result<(), SessionError<B::Error>> {
        self.inner.registry.write().await.clear_target(id)?;
        Ok(())
    }

    pub async fn permits(&self, id: PartyId, action: Action) -> bool {
        gate::permits(&*self.inner.registry.read().await, id, action)
    }

    pub async fn can_encrypt(&self, id: PartyId) -> bool {
        self.permits(id, Action::Encrypt).await
    }

    pub async fn can_decrypt(&self, id: PartyId) -> bool {
        self.permits(id, Action::Decrypt).await
    }

    pub async fn can_send(&self, id: PartyId) -> bool {
        self.permits(id, Action::Send).await
    }

    /// Requests a fresh key pair for the party, replacing any previous one.
    pub async fn generate_key_pair(&self, id: PartyId) -> Result<(), SessionError<B::Error>> {
        let request = {
            let registry = self.inner.registry.read().await;
            if !registry.contains(id) {
                return Err(SessionError::UnknownParty(id));
            }
            S::build_keygen_request(&*self.inner.config.read().await)
        };

        debug!(party = %id, scheme = %S::KIND, "requesting key pair");
        let key_pair: S::KeyPair = self.request(S::KEYGEN_ENDPOINT, &request).await?;

        self.apply(id, |party| S::apply_keygen_result(party, &key_pair))
            .await
    }

    /// Encrypts the party's plaintext for its target.
    pub async fn encrypt(&self, id: PartyId) -> Result<(), SessionError<B::Error>> {
        let request = {
            let registry = self.inner.registry.read().await;
            let party = self.check(&registry, id, Action::Encrypt)?;
            let recipient = registry
                .target_of(id)
                .ok_or(SessionError::NotPermitted {
                    action: Action::Encrypt,
                    party: id,
                })?;
            let config = self.inner.config.read().await;
            S::build_encrypt_request(&config, party, recipient)?
        };

        debug!(party = %id, scheme = %S::KIND, "requesting encryption");
        let response: S::EncryptResponse = self.request(S::ENCRYPT_ENDPOINT, &request).await?;

        self.apply(id, |party| S::apply_encrypt_result(party, &response))
            .await
    }

    /// Decrypts the party's ciphertext with its own key pair.
    pub async fn decrypt(&self, id: PartyId) -> Result<(), SessionError<B::Error>> {
        let request = {
            let registry = self.inner.registry.read().await;
            let party = self.check(&registry, id, Action::Decrypt)?;
            let config = self.inner.config.read().await;
            S::build_decrypt_request(&config, party)?
        };

        debug!(party = %id, scheme = %S::KIND, "requesting decryption");
        let response: MessageResponse = self.request(S::DECRYPT_ENDPOINT, &request).await?;

        self.apply(id, |party| S::apply_decrypt_result(party, &response))
            .await
    }

    /// Hands the party's ciphertext over to its target.
    pub async fn send(&self, id: PartyId) -> Result<(), SessionError<B::Error>> {
        let mut registry = self.inner.registry.write().await;
        self.check(&registry, id, Action::Send)?;

        // The gate holds, so the registry applies the transfer.
        let sent = registry.send(id);
        debug_assert!(sent);

        debug!(party = %id, "sent ciphertext");
        Ok(())
    }

    /// Resets plaintext, ciphertext and signature of a party.
    pub async fn clear(&self, id: PartyId) -> Result<(), SessionError<B::Error>> {
        if self.inner.registry.write().await.clear(id) {
            Ok(())
        } else {
            Err(SessionError::UnknownParty(id))
        }
    }

    fn check<'a>(
        &self,
        registry: &'a Registry<S>,
        id: PartyId,
        action: Action,
    ) -> Result<&'a Party<S>, SessionError<B::Error>> {
        let party = registry.get(id).ok_or(SessionError::UnknownParty(id))?;

        if !gate::permits(registry, id, action) {
            debug!(party = %id, %action, "action not permitted");
            return Err(SessionError::NotPermitted { action, party: id });
        }

        Ok(party)
    }

    async fn request<Req, Res>(
        &self,
        endpoint: Endpoint,
        request: &Req,
    ) -> Result<Res, SessionError<B::Error>>
    where
        Req: serde::Serialize + Sync,
        Res: serde::de::DeserializeOwned + Send,
    {
        self.inner
            .backend
            .post(endpoint, request)
            .await
            .map_err(|err| {
                warn!(%endpoint, "request failed: {}", err);
                SessionError::Backend(err)
            })
    }

    /// Applies a result to the party under a single write lock.
    async fn apply<F>(&self, id: PartyId, f: F) -> Result<(), SessionError<B::Error>>
    where
        F: FnOnce(&mut Party<S>),
    {
        let mut registry = self.inner.registry.write().await;

        let Some(party) = registry.get_mut(id) else {
            debug!(party = %id, "discarding result for removed party");
            return Err(SessionError::UnknownParty(id));
        };

        f(party);
        trace!(party = %id, "applied result");

        Ok(())
    }
}

impl<B> Session<B, Rsa>
where
    B: Backend,
{
    /// Signs the party's plaintext with its own key pair.
    ///
    /// The signature is stored on the party and handed over to the target with the next
    /// [`send`](Self::send).
    pub async fn sign(&self, id: PartyId) -> Result<String, SessionError<B::Error>> {
        let request = {
            let registry = self.inner.registry.read().await;
            let party = self.check(&registry, id, Action::Sign)?;
            Rsa::build_sign_request(party)?
        };

        debug!(party = %id, "requesting signature");
        let response: MessageResponse = self.request(Endpoint::RsaSign, &request).await?;

        self.apply(id, |party| Rsa::apply_sign_result(party, &response))
            .await?;

        Ok(response.message)
    }

    /// Checks the party's plaintext against the signature it received from its source.
    pub async fn verify(&self, id: PartyId) -> Result<bool, SessionError<B::Error>> {
        let request = {
            let registry = self.inner.registry.read().await;
            let party = self.check(&registry, id, Action::Verify)?;
            let signer = registry.source_of(id).ok_or(SessionError::NotPermitted {
                action: Action::Verify,
                party: id,
            })?;
            Rsa::build_verify_request(party, signer)?
        };

        debug!(party = %id, "requesting signature verification");
        let response: MessageResponse = self.request(Endpoint::RsaVerify, &request).await?;

        match response.message.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(SessionError::UnexpectedResponse(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError<E> {
    #[error("unknown party {0}")]
    UnknownParty(PartyId),

    #[error("{action} is not permitted for party {party}")]
    NotPermitted { action: Action, party: PartyId },

    #[error(transparent)]
    Registry(RegistryError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("computation service failed: {0}")]
    Backend(E),

    #[error("unexpected response from computation service: {0}")]
    UnexpectedResponse(String),
}

impl<E> From<RegistryError> for SessionError<E> {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownParty(id) => SessionError::UnknownParty(id),
            err => SessionError::Registry(err),
        }
    }
}
