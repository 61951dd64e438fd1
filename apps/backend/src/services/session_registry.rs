//! Connected participants and fighter reservations.
//!
//! Not internally synchronized: the arena keeps it behind the lobby lock
//! together with the match pairer, so fighter uniqueness and pairing are
//! checked under one serialization point.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::domain::{FighterCatalog, FighterCatalogEntry, MatchId, ParticipantId};
use crate::errors::DomainError;
use crate::protocol::PlayerView;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionEntry {
    pub fighter: Option<FighterCatalogEntry>,
    pub ready: bool,
    pub match_id: Option<MatchId>,
}

impl SessionEntry {
    pub fn view(&self) -> PlayerView {
        PlayerView {
            fighter: self.fighter.clone(),
            ready: self.ready,
        }
    }
}

pub struct SessionRegistry {
    catalog: Arc<FighterCatalog>,
    sessions: HashMap<ParticipantId, SessionEntry>,
    /// fighter name -> holder
    reserved: HashMap<String, ParticipantId>,
}

impl SessionRegistry {
    pub fn new(catalog: Arc<FighterCatalog>) -> Self {
        Self {
            catalog,
            sessions: HashMap::new(),
            reserved: HashMap::new(),
        }
    }

    pub fn register(&mut self, id: ParticipantId) {
        self.sessions.entry(id).or_default();
    }

    pub fn is_live(&self, id: ParticipantId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn get(&self, id: ParticipantId) -> Option<&SessionEntry> {
        self.sessions.get(&id)
    }

    /// Live session or `StaleParticipant`.
    pub fn require(&self, id: ParticipantId) -> Result<&SessionEntry, DomainError> {
        self.sessions.get(&id).ok_or(DomainError::StaleParticipant)
    }

    fn require_mut(&mut self, id: ParticipantId) -> Result<&mut SessionEntry, DomainError> {
        self.sessions
            .get_mut(&id)
            .ok_or(DomainError::StaleParticipant)
    }

    /// Reserve `name` for `id`. Nothing changes on error.
    pub fn select_fighter(
        &mut self,
        id: ParticipantId,
        name: &str,
    ) -> Result<FighterCatalogEntry, DomainError> {
        let session = self.require(id)?;
        if session.fighter.is_some() {
            return Err(DomainError::FighterAlreadyChosen);
        }
        let entry = self
            .catalog
            .find(name)
            .cloned()
            .ok_or_else(|| DomainError::UnknownFighter(name.to_string()))?;
        if self.reserved.contains_key(&entry.name) {
            return Err(DomainError::FighterUnavailable(entry.name));
        }

        self.reserved.insert(entry.name.clone(), id);
        self.require_mut(id)?.fighter = Some(entry.clone());
        Ok(entry)
    }

    /// Return the fighter held by `id` to the pool. Returns the released name.
    pub fn release_fighter(&mut self, id: ParticipantId) -> Option<String> {
        let fighter = self.sessions.get_mut(&id)?.fighter.take()?;
        if self.reserved.get(&fighter.name) == Some(&id) {
            self.reserved.remove(&fighter.name);
        }
        Some(fighter.name)
    }

    /// Drop the session entirely, releasing its fighter.
    pub fn remove(&mut self, id: ParticipantId) -> Option<SessionEntry> {
        self.release_fighter(id);
        self.sessions.remove(&id)
    }

    pub fn set_ready(&mut self, id: ParticipantId, ready: bool) -> Result<(), DomainError> {
        self.require_mut(id)?.ready = ready;
        Ok(())
    }

    pub fn set_match(&mut self, id: ParticipantId, match_id: Option<MatchId>) {
        if let Some(session) = self.sessions.get_mut(&id) {
            session.match_id = match_id;
        }
    }

    /// Post-match reset: fighter released, readiness cleared, unpaired.
    ///
    /// Only applies while `id` is still attached to `match_id`, so a repeated
    /// reset for the same match is a no-op.
    pub fn reset_after_match(&mut self, id: ParticipantId, match_id: MatchId) -> bool {
        match self.sessions.get(&id) {
            Some(session) if session.match_id == Some(match_id) => {}
            _ => return false,
        }
        self.release_fighter(id);
        if let Some(session) = self.sessions.get_mut(&id) {
            session.ready = false;
            session.match_id = None;
        }
        true
    }

    /// Catalog entries not held by any live participant, in catalog order.
    pub fn available(&self) -> Vec<FighterCatalogEntry> {
        self.catalog
            .fighters
            .iter()
            .filter(|f| !self.reserved.contains_key(&f.name))
            .cloned()
            .collect()
    }

    pub fn reserved_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.reserved.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn ids(&self) -> Vec<ParticipantId> {
        self.sessions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// `updatePlayers` payload for a participant who is not in a match.
    pub fn solo_view(&self, id: ParticipantId) -> BTreeMap<ParticipantId, PlayerView> {
        self.sessions
            .get(&id)
            .map(|s| BTreeMap::from([(id, s.view())]))
            .unwrap_or_default()
    }
}
