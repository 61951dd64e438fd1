//! Process-wide game authority.
//!
//! Lock order: `lobby` before any match lock. A match lock is never held
//! while taking `lobby`. Frames are handed to the outbox while the lock that
//! produced them is still held, so each participant sees a match's frames in
//! transition order.

use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::domain::{
    Action, Departure, FighterCatalog, FighterCatalogEntry, MatchId, ParticipantId,
    EQUIPMENT_SLOTS,
};
use crate::errors::DomainError;
use crate::protocol::{ServerMsg, WelcomeView, PROTOCOL_VERSION};
use crate::services::match_pairer::MatchPairer;
use crate::services::outbox::{Outbound, Outbox};
use crate::services::round_coordinator::{RoundCoordinator, Step};
use crate::services::session_registry::SessionRegistry;

#[derive(Debug, Clone, Default)]
pub struct ArenaSettings {
    /// `None` disables the round timer.
    pub round_timeout: Option<Duration>,
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    pub connected: usize,
    pub waiting: usize,
    pub active_matches: usize,
}

struct Lobby {
    registry: SessionRegistry,
    pairer: MatchPairer,
}

pub struct Arena {
    me: Weak<Arena>,
    lobby: Mutex<Lobby>,
    matches: DashMap<MatchId, Arc<Mutex<RoundCoordinator>>>,
    outbox: Arc<dyn Outbox>,
    rng: Mutex<ChaCha8Rng>,
    round_timeout: Option<Duration>,
    catalog: Arc<FighterCatalog>,
}

impl Arena {
    pub fn new(
        catalog: Arc<FighterCatalog>,
        outbox: Arc<dyn Outbox>,
        settings: ArenaSettings,
    ) -> Arc<Self> {
        let rng = match settings.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            lobby: Mutex::new(Lobby {
                registry: SessionRegistry::new(Arc::clone(&catalog)),
                pairer: MatchPairer::new(),
            }),
            matches: DashMap::new(),
            outbox,
            rng: Mutex::new(rng),
            round_timeout: settings.round_timeout,
            catalog,
        })
    }

    pub fn catalog(&self) -> &FighterCatalog {
        &self.catalog
    }

    fn send(&self, outbound: Outbound) {
        for (to, msg) in outbound {
            self.outbox.deliver(to, msg);
        }
    }

    fn broadcast_catalog(&self, lobby: &Lobby) {
        let available = lobby.registry.available();
        for id in lobby.registry.ids() {
            self.outbox
                .deliver(id, ServerMsg::UpdateAvailableCharacters(available.clone()));
        }
    }

    fn coordinator(&self, match_id: MatchId) -> Option<Arc<Mutex<RoundCoordinator>>> {
        self.matches.get(&match_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Register a new connection and greet it.
    pub fn connect(&self, id: ParticipantId) {
        let mut lobby = self.lobby.lock();
        lobby.registry.register(id);
        debug!(participant_id = %id, "participant connected");
        self.outbox.deliver(
            id,
            ServerMsg::Welcome(WelcomeView {
                participant_id: id,
                protocol: PROTOCOL_VERSION,
            }),
        );
        self.broadcast_catalog(&lobby);
    }

    /// Reserve a fighter and put the participant in the waiting pool.
    pub fn select_fighter(&self, id: ParticipantId, name: &str) -> Result<(), DomainError> {
        let mut lobby = self.lobby.lock();
        let entry = lobby.registry.select_fighter(id, name)?;
        info!(participant_id = %id, fighter = %entry.name, "fighter selected");

        self.outbox.deliver(id, ServerMsg::CharacterSelected(entry));
        self.broadcast_catalog(&lobby);
        self.outbox
            .deliver(id, ServerMsg::UpdatePlayers(lobby.registry.solo_view(id)));

        if let Some(pair) = lobby.pairer.enqueue(id) {
            self.form_match(&mut lobby, pair);
        }
        Ok(())
    }

    fn form_match(&self, lobby: &mut Lobby, pair: [ParticipantId; 2]) {
        let sessions = pair.map(|id| lobby.registry.get(id).cloned().unwrap_or_default());
        let (Some(f0), Some(f1)) = (sessions[0].fighter.clone(), sessions[1].fighter.clone())
        else {
            // Only participants holding a fighter are ever enqueued.
            warn!(?pair, "pair without fighters; returning to pool");
            for id in pair {
                if lobby.registry.get(id).is_some_and(|s| s.fighter.is_some()) {
                    lobby.pairer.enqueue(id);
                }
            }
            return;
        };

        let (equipment, match_seed) = {
            let mut rng = self.rng.lock();
            let mut deal = || -> Vec<String> {
                self.catalog
                    .equipment
                    .choose_multiple(&mut *rng, EQUIPMENT_SLOTS)
                    .cloned()
                    .collect()
            };
            let equipment = [deal(), deal()];
            (equipment, rng.random::<u64>())
        };

        let match_id = MatchId::new();
        let mut coordinator = RoundCoordinator::new(
            match_id,
            pair,
            [f0, f1],
            [sessions[0].ready, sessions[1].ready],
            equipment,
            match_seed,
        );
        for id in pair {
            lobby.registry.set_match(id, Some(match_id));
        }
        info!(%match_id, a = %pair[0], b = %pair[1], "match formed");

        self.send(coordinator.introduce());
        let step = coordinator.start_if_ready();
        let opened = step.opened_round;
        self.send(step.outbound);
        self.matches
            .insert(match_id, Arc::new(Mutex::new(coordinator)));
        if let Some(round) = opened {
            self.schedule_round_timer(match_id, round);
        }
    }

    /// Readiness handshake. Allowed before pairing; carried into the match.
    pub fn player_ready(&self, id: ParticipantId) -> Result<(), DomainError> {
        let mut lobby = self.lobby.lock();
        let session = lobby.registry.require(id)?;
        if session.fighter.is_none() {
            return Err(DomainError::FighterRequired);
        }

        let Some(match_id) = session.match_id else {
            lobby.registry.set_ready(id, true)?;
            self.outbox
                .deliver(id, ServerMsg::UpdatePlayers(lobby.registry.solo_view(id)));
            return Ok(());
        };

        let coordinator = self
            .coordinator(match_id)
            .ok_or(DomainError::NotInMatch)?;
        let mut coordinator = coordinator.lock();
        let step = coordinator.mark_ready(id)?;
        lobby.registry.set_ready(id, true)?;
        let opened = step.opened_round;
        self.send(step.outbound);
        drop(coordinator);

        if let Some(round) = opened {
            self.schedule_round_timer(match_id, round);
        }
        Ok(())
    }

    /// Commit an attack/block pair for the current round.
    pub fn submit_action(
        &self,
        id: ParticipantId,
        attack: &str,
        block: &str,
    ) -> Result<(), DomainError> {
        let (match_id, action) = {
            let lobby = self.lobby.lock();
            let session = lobby.registry.require(id)?;
            let action = Action::parse(attack, block)?;
            let match_id = session.match_id.ok_or(DomainError::NotInMatch)?;
            (match_id, action)
        };

        // Torn down between the lobby check and here.
        let Some(coordinator) = self.coordinator(match_id) else {
            warn!(%match_id, participant_id = %id, "action for a torn-down match");
            return Err(if self.lobby.lock().registry.is_live(id) {
                DomainError::NotInMatch
            } else {
                DomainError::StaleParticipant
            });
        };
        let step = {
            let mut coordinator = coordinator.lock();
            let step = coordinator.submit(id, action)?;
            self.deliver_step(step)
        };
        self.follow_up(match_id, step);
        Ok(())
    }

    /// Round timer callback. Expiry for a closed round is a no-op.
    pub fn expire_round(&self, match_id: MatchId, round_no: u32) {
        let Some(coordinator) = self.coordinator(match_id) else {
            return;
        };
        let step = {
            let mut coordinator = coordinator.lock();
            let step = coordinator.expire(round_no);
            self.deliver_step(step)
        };
        self.follow_up(match_id, step);
    }

    /// Sends the frames and keeps the follow-up flags.
    fn deliver_step(&self, step: Step) -> Step {
        self.send(step.outbound);
        Step {
            outbound: Vec::new(),
            ..step
        }
    }

    fn follow_up(&self, match_id: MatchId, step: Step) {
        if step.finished {
            self.finish_match(match_id);
        } else if let Some(round) = step.opened_round {
            self.schedule_round_timer(match_id, round);
        }
    }

    /// Tear down a finished match. Safe to call more than once.
    pub fn finish_match(&self, match_id: MatchId) {
        let mut lobby = self.lobby.lock();
        if self.finish_match_locked(&mut lobby, match_id) {
            self.broadcast_catalog(&lobby);
        }
    }

    fn finish_match_locked(&self, lobby: &mut Lobby, match_id: MatchId) -> bool {
        let Some((_, coordinator)) = self.matches.remove(&match_id) else {
            return false;
        };
        let participants = coordinator.lock().participants();
        for id in participants {
            lobby.registry.reset_after_match(id, match_id);
        }
        debug!(%match_id, "match torn down");
        true
    }

    /// Connection closed. Releases the fighter and settles any match.
    pub fn disconnect(&self, id: ParticipantId) {
        let mut lobby = self.lobby.lock();
        lobby.pairer.remove(id);
        let Some(session) = lobby.registry.remove(id) else {
            return;
        };
        info!(participant_id = %id, "participant disconnected");

        if let Some(match_id) = session.match_id {
            self.settle_departure(&mut lobby, id, match_id);
        }
        self.broadcast_catalog(&lobby);
    }

    fn settle_departure(&self, lobby: &mut Lobby, id: ParticipantId, match_id: MatchId) {
        let Some(coordinator) = self.coordinator(match_id) else {
            return;
        };
        let departure = {
            let mut coordinator = coordinator.lock();
            match coordinator.depart(id) {
                Ok((departure, step)) => {
                    self.send(step.outbound);
                    departure
                }
                Err(err) => {
                    warn!(%match_id, participant_id = %id, error = %err, "departure rejected");
                    return;
                }
            }
        };

        match departure {
            Departure::Dissolved { remaining } => {
                self.matches.remove(&match_id);
                lobby.registry.set_match(remaining, None);
                info!(%match_id, participant_id = %remaining, "opponent left; back to pool");
                self.outbox.deliver(
                    remaining,
                    ServerMsg::UpdatePlayers(lobby.registry.solo_view(remaining)),
                );
                if let Some(pair) = lobby.pairer.enqueue(remaining) {
                    self.form_match(lobby, pair);
                }
            }
            Departure::Conceded(_) => {
                warn!(%match_id, participant_id = %id, "match forfeited");
                self.finish_match_locked(lobby, match_id);
            }
            Departure::AlreadyOver => {
                self.finish_match_locked(lobby, match_id);
            }
        }
    }

    fn schedule_round_timer(&self, match_id: MatchId, round_no: u32) {
        let Some(timeout) = self.round_timeout else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(%match_id, "no runtime; round timer not scheduled");
            return;
        };
        let arena = self.me.clone();
        handle.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(arena) = arena.upgrade() {
                arena.expire_round(match_id, round_no);
            }
        });
    }

    pub fn match_of(&self, id: ParticipantId) -> Option<MatchId> {
        self.lobby.lock().registry.get(id).and_then(|s| s.match_id)
    }

    pub fn stats(&self) -> ArenaStats {
        let lobby = self.lobby.lock();
        ArenaStats {
            connected: lobby.registry.len(),
            waiting: lobby.pairer.len(),
            active_matches: self.matches.len(),
        }
    }

    /// `(available entries, reserved names)`.
    pub fn fighter_availability(&self) -> (Vec<FighterCatalogEntry>, Vec<String>) {
        let lobby = self.lobby.lock();
        (lobby.registry.available(), lobby.registry.reserved_names())
    }
}
