//! Per-match round state machine.
//!
//! `AwaitingReady -> RoundInProgress (repeats) -> MatchOver`. The two commit
//! slots are private: nothing outside this type can read one participant's
//! pending choice, only whether a seat has committed.

use serde::Serialize;

use crate::domain::combat::{opponent_of, resolve_round, RoundReport, Seat, Verdict, SEATS};
use crate::domain::parts::{Action, STARTING_HEALTH};
use crate::errors::domain::DomainError;

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    /// Health reached zero in a resolution step.
    Knockout,
    /// A participant disconnected after the match started.
    Forfeit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub verdict: Verdict,
    pub reason: EndReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelPhase {
    AwaitingReady,
    RoundInProgress,
    MatchOver(Outcome),
    /// Torn down before it started.
    Dissolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Stored; the opponent has not committed yet.
    Awaiting,
    /// Both slots were filled and the round resolved.
    Resolved(RoundReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expiry {
    /// The timer belonged to a round that is no longer open.
    Stale,
    /// Resolved with "no action" for every empty slot.
    Resolved(RoundReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure<P> {
    /// The match had not started; the remaining participant is free again.
    Dissolved { remaining: P },
    /// The match was running; the remaining participant wins.
    Conceded(Outcome),
    /// Already over; nothing changes.
    AlreadyOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duel<P> {
    participants: [P; SEATS],
    health: [i32; SEATS],
    ready: [bool; SEATS],
    slots: [Option<Action>; SEATS],
    round_no: u32,
    phase: DuelPhase,
}

impl<P: Copy + Eq> Duel<P> {
    pub fn new(participants: [P; SEATS], ready: [bool; SEATS]) -> Self {
        Self {
            participants,
            health: [STARTING_HEALTH; SEATS],
            ready,
            slots: [None; SEATS],
            round_no: 0,
            phase: DuelPhase::AwaitingReady,
        }
    }

    pub fn participants(&self) -> [P; SEATS] {
        self.participants
    }

    pub fn participant(&self, seat: Seat) -> P {
        self.participants[seat]
    }

    pub fn seat_of(&self, participant: P) -> Option<Seat> {
        self.participants.iter().position(|p| *p == participant)
    }

    pub fn phase(&self) -> DuelPhase {
        self.phase
    }

    pub fn round_no(&self) -> u32 {
        self.round_no
    }

    pub fn health(&self) -> [i32; SEATS] {
        self.health
    }

    pub fn is_ready(&self, seat: Seat) -> bool {
        self.ready[seat]
    }

    pub fn has_committed(&self, seat: Seat) -> bool {
        self.slots[seat].is_some()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, DuelPhase::MatchOver(_) | DuelPhase::Dissolved)
    }

    fn require_seat(&self, participant: P) -> Result<Seat, DomainError> {
        self.seat_of(participant)
            .ok_or(DomainError::StaleParticipant)
    }

    /// Record readiness. Returns `true` when this call started round 1.
    pub fn mark_ready(&mut self, participant: P) -> Result<bool, DomainError> {
        let seat = self.require_seat(participant)?;
        if self.phase != DuelPhase::AwaitingReady {
            return Err(DomainError::PhaseMismatch(
                "match is not awaiting readiness".to_string(),
            ));
        }
        self.ready[seat] = true;
        Ok(self.start_if_ready())
    }

    /// Enter round 1 if both seats are ready. Returns `true` on the transition.
    pub fn start_if_ready(&mut self) -> bool {
        if self.phase == DuelPhase::AwaitingReady && self.ready.iter().all(|r| *r) {
            self.phase = DuelPhase::RoundInProgress;
            self.round_no = 1;
            self.slots = [None; SEATS];
            true
        } else {
            false
        }
    }

    /// Commit one action for the current round.
    ///
    /// All checks run before any mutation; a rejected call leaves the duel untouched.
    pub fn submit(&mut self, participant: P, action: Action) -> Result<Submission, DomainError> {
        let seat = self.require_seat(participant)?;
        match self.phase {
            DuelPhase::RoundInProgress => {}
            DuelPhase::AwaitingReady => {
                return Err(DomainError::PhaseMismatch(
                    "match has not started".to_string(),
                ))
            }
            DuelPhase::MatchOver(_) | DuelPhase::Dissolved => {
                return Err(DomainError::PhaseMismatch("match is over".to_string()))
            }
        }
        if self.slots[seat].is_some() {
            return Err(DomainError::DuplicateSubmission);
        }

        self.slots[seat] = Some(action);
        if self.slots.iter().all(Option::is_some) {
            Ok(Submission::Resolved(self.resolve()))
        } else {
            Ok(Submission::Awaiting)
        }
    }

    /// Round timer fired for `round_no`.
    ///
    /// Empty slots default to "no action". With both slots empty the round
    /// deals no damage and the next one opens.
    pub fn expire(&mut self, round_no: u32) -> Expiry {
        if self.phase != DuelPhase::RoundInProgress || round_no != self.round_no {
            return Expiry::Stale;
        }
        Expiry::Resolved(self.resolve())
    }

    /// A participant left.
    pub fn depart(&mut self, participant: P) -> Result<Departure<P>, DomainError> {
        let seat = self.require_seat(participant)?;
        let remaining = opponent_of(seat);
        match self.phase {
            DuelPhase::AwaitingReady => {
                self.phase = DuelPhase::Dissolved;
                Ok(Departure::Dissolved {
                    remaining: self.participants[remaining],
                })
            }
            DuelPhase::RoundInProgress => {
                let outcome = Outcome {
                    verdict: Verdict::Winner(remaining),
                    reason: EndReason::Forfeit,
                };
                self.slots = [None; SEATS];
                self.phase = DuelPhase::MatchOver(outcome);
                Ok(Departure::Conceded(outcome))
            }
            DuelPhase::MatchOver(_) | DuelPhase::Dissolved => Ok(Departure::AlreadyOver),
        }
    }

    fn resolve(&mut self) -> RoundReport {
        let report = resolve_round(self.round_no, self.health, self.slots);
        self.health = report.health;
        self.slots = [None; SEATS];
        self.round_no += 1;

        if let Some(verdict) = report.verdict() {
            self.phase = DuelPhase::MatchOver(Outcome {
                verdict,
                reason: EndReason::Knockout,
            });
        }
        report
    }
}
