// SPDX-License-Identifier: MIT OR Apache-2.0

//! Set of parties and the directed links between them.
//!
//! Each party points at most at one recipient (`sending_to`) and remembers the last party it
//! received a ciphertext from (`received_from`). Links are [`PartyId`] handles, removing a party
//! sweeps every link which still points at it.
//!
//! Operations with unmet preconditions (like sending without a ciphertext) are no-ops. Use the
//! predicates in [`gate`](crate::gate) to find out what is legal.
use std::collections::BTreeMap;

use thiserror::Error;

use crate::party::{Party, PartyId};
use crate::scheme::SchemeAdapter;

#[derive(Clone, Debug)]
pub struct Registry<S>
where
    S: SchemeAdapter,
{
    next_id: u64,
    parties: BTreeMap<PartyId, Party<S>>,
}

impl<S> Default for Registry<S>
where
    S: SchemeAdapter,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Registry<S>
where
    S: SchemeAdapter,
{
    pub fn new() -> Self {
        Self {
            next_id: 1,
            parties: BTreeMap::new(),
        }
    }

    /// Adds a party with empty state.
    pub fn insert(&mut self, name: impl Into<String>) -> Result<PartyId, RegistryError> {
        let name = name.into();

        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        if self.find(&name).is_some() {
            return Err(RegistryError::DuplicateName(name));
        }

        let id = PartyId(self.next_id);
        self.next_id += 1;
        self.parties.insert(id, Party::new(id, name));

        Ok(id)
    }

    pub fn get(&self, id: PartyId) -> Option<&Party<S>> {
        self.parties.get(&id)
    }

    pub fn get_mut(&mut self, id: PartyId) -> Option<&mut Party<S>> {
        self.parties.get_mut(&id)
    }

    pub fn contains(&self, id: PartyId) -> bool {
        self.parties.contains_key(&id)
    }

    /// Looks up a party by its name.
    pub fn find(&self, name: &str) -> Option<&Party<S>> {
        self.parties.values().find(|party| party.name() == name)
    }

    /// Parties in order of creation.
    pub fn iter(&self) -> impl Iterator<Item = &Party<S>> {
        self.parties.values()
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Returns the party the given one is sending to.
    pub fn target_of(&self, id: PartyId) -> Option<&Party<S>> {
        self.get(id)
            .and_then(|party| party.sending_to())
            .and_then(|target| self.get(target))
    }

    /// Returns the party the given one last received a ciphertext from.
    pub fn source_of(&self, id: PartyId) -> Option<&Party<S>> {
        self.get(id)
            .and_then(|party| party.received_from())
            .and_then(|source| self.get(source))
    }

    /// Chooses the recipient for outgoing ciphertexts. The target's state stays untouched.
    pub fn set_target(&mut self, id: PartyId, target: PartyId) -> Result<(), RegistryError> {
        if id == target {
            return Err(RegistryError::SelfTarget(id));
        }

        if !self.contains(target) {
            return Err(RegistryError::UnknownParty(target));
        }

        let party = self
            .parties
            .get_mut(&id)
            .ok_or(RegistryError::UnknownParty(id))?;
        party.set_sending_to(Some(target));

        Ok(())
    }

    pub fn clear_target(&mut self, id: PartyId) -> Result<(), RegistryError> {
        let party = self
            .parties
            .get_mut(&id)
            .ok_or(RegistryError::UnknownParty(id))?;
        party.set_sending_to(None);
        Ok(())
    }

    /// Copies the party's ciphertext and signature into its target and marks the party as the
    /// target's source. A signature the target held before is replaced, even if the party has
    /// none.
    ///
    /// Returns `false` without touching anything if the party has no target or no ciphertext.
    pub fn send(&mut self, id: PartyId) -> bool {
        let Some(party) = self.parties.get(&id) else {
            return false;
        };

        let Some(target) = party.sending_to() else {
            return false;
        };

        if !party.has_ciphertext() {
            return false;
        }

        let ciphertext = party.ciphertext().cloned();
        let signature = party.signature().map(str::to_string);

        match self.parties.get_mut(&target) {
            Some(recipient) => {
                recipient.set_ciphertext(ciphertext);
                recipient.set_signature(signature);
                recipient.set_received_from(Some(id));
                true
            }
            None => false,
        }
    }

    /// Resets plaintext, ciphertext and signature of a party, keeping key pair and links.
    pub fn clear(&mut self, id: PartyId) -> bool {
        match self.parties.get_mut(&id) {
            Some(party) => {
                party.clear();
                true
            }
            None => false,
        }
    }

    /// Removes a party and clears every link other parties still hold towards it.
    pub fn remove(&mut self, id: PartyId) -> Option<Party<S>> {
        let removed = self.parties.remove(&id)?;

        for party in self.parties.values_mut() {
            if party.sending_to() == Some(id) {
                party.set_sending_to(None);
            }

            if party.received_from() == Some(id) {
                party.set_received_from(None);
            }
        }

        Some(removed)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("party names can not be empty")]
    EmptyName,

    #[error("a party with the name '{0}' already exists")]
    DuplicateName(String),

    #[error("unknown party {0}")]
    UnknownParty(PartyId),

    #[error("party {0} can not send to itself")]
    SelfTarget(PartyId),
}
