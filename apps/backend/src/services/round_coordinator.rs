//! Per-match authority: wraps the pure `Duel` and turns each transition into
//! the frames both participants should see.
//!
//! One coordinator exists per match and lives behind its own mutex in the
//! arena, so all transitions of one match are serialized.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::domain::combat::opponent_of;
use crate::domain::narrator::narrate;
use crate::domain::seed_derivation::derive_narration_seed;
use crate::domain::{
    Action, Departure, Duel, DuelPhase, EndReason, Expiry, FighterCatalogEntry, MatchId, Outcome,
    ParticipantId, RoundReport, Submission, Verdict,
};
use crate::errors::DomainError;
use crate::protocol::{
    GameOverView, PlayerView, RoundPlayerView, RoundResultView, ServerMsg, Winner,
};
use crate::services::outbox::Outbound;

/// Frames and follow-ups produced by one transition.
#[derive(Debug, Default)]
pub struct Step {
    pub outbound: Outbound,
    /// A round opened and needs its timer.
    pub opened_round: Option<u32>,
    /// The match reached a terminal state and must be torn down.
    pub finished: bool,
}

pub struct RoundCoordinator {
    match_id: MatchId,
    duel: Duel<ParticipantId>,
    fighters: [FighterCatalogEntry; 2],
    equipment: [Vec<String>; 2],
    match_seed: u64,
}

impl RoundCoordinator {
    pub fn new(
        match_id: MatchId,
        participants: [ParticipantId; 2],
        fighters: [FighterCatalogEntry; 2],
        ready: [bool; 2],
        equipment: [Vec<String>; 2],
        match_seed: u64,
    ) -> Self {
        Self {
            match_id,
            duel: Duel::new(participants, ready),
            fighters,
            equipment,
            match_seed,
        }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub fn participants(&self) -> [ParticipantId; 2] {
        self.duel.participants()
    }

    pub fn phase(&self) -> DuelPhase {
        self.duel.phase()
    }

    pub fn round_no(&self) -> u32 {
        self.duel.round_no()
    }

    fn players_view(&self) -> BTreeMap<ParticipantId, PlayerView> {
        (0..2)
            .map(|seat| {
                (
                    self.duel.participant(seat),
                    PlayerView {
                        fighter: Some(self.fighters[seat].clone()),
                        ready: self.duel.is_ready(seat),
                    },
                )
            })
            .collect()
    }

    fn to_both(&self, outbound: &mut Outbound, msg: ServerMsg) {
        for id in self.duel.participants() {
            outbound.push((id, msg.clone()));
        }
    }

    /// Reveal frames sent right after pairing.
    pub fn introduce(&self) -> Outbound {
        let mut outbound = Vec::new();
        for seat in 0..2 {
            let viewer = self.duel.participant(seat);
            let other = opponent_of(seat);
            outbound.push((viewer, ServerMsg::OpponentCharacter(self.fighters[other].clone())));
            outbound.push((viewer, ServerMsg::EquipmentAssigned(self.equipment[seat].clone())));
            outbound.push((viewer, ServerMsg::OpponentEquipment(self.equipment[other].clone())));
        }
        self.to_both(&mut outbound, ServerMsg::UpdatePlayers(self.players_view()));
        outbound
    }

    /// Start round 1 if both participants were already ready at pairing.
    pub fn start_if_ready(&mut self) -> Step {
        let mut step = Step::default();
        if self.duel.start_if_ready() {
            self.opened(&mut step);
        }
        step
    }

    fn opened(&self, step: &mut Step) {
        info!(match_id = %self.match_id, "match started");
        self.to_both(&mut step.outbound, ServerMsg::StartGame);
        step.opened_round = Some(self.duel.round_no());
    }

    pub fn mark_ready(&mut self, id: ParticipantId) -> Result<Step, DomainError> {
        let started = self.duel.mark_ready(id)?;
        let mut step = Step::default();
        self.to_both(&mut step.outbound, ServerMsg::UpdatePlayers(self.players_view()));
        if started {
            self.opened(&mut step);
        }
        Ok(step)
    }

    pub fn submit(&mut self, id: ParticipantId, action: Action) -> Result<Step, DomainError> {
        let round = self.duel.round_no();
        match self.duel.submit(id, action) {
            Ok(Submission::Awaiting) => Ok(Step {
                outbound: vec![(id, ServerMsg::ActionAccepted { round })],
                ..Step::default()
            }),
            Ok(Submission::Resolved(report)) => Ok(self.resolved(report)),
            Err(DomainError::PhaseMismatch(detail)) => Err(self.forfeit_rejection(id, detail)),
            Err(err) => Err(err),
        }
    }

    /// After a forfeit, the winner is told the opponent is gone and the
    /// departed participant's in-flight action is stale.
    fn forfeit_rejection(&self, id: ParticipantId, detail: String) -> DomainError {
        match self.duel.phase() {
            DuelPhase::MatchOver(Outcome {
                verdict: Verdict::Winner(seat),
                reason: EndReason::Forfeit,
            }) => {
                if self.duel.seat_of(id) == Some(seat) {
                    DomainError::OpponentDisconnected
                } else {
                    DomainError::StaleParticipant
                }
            }
            _ => DomainError::PhaseMismatch(detail),
        }
    }

    /// Round timer fired.
    pub fn expire(&mut self, round_no: u32) -> Step {
        match self.duel.expire(round_no) {
            Expiry::Stale => Step::default(),
            Expiry::Resolved(report) => {
                debug!(match_id = %self.match_id, round = round_no, "round resolved by timeout");
                self.resolved(report)
            }
        }
    }

    /// `id` left. The departure result tells the arena what to do with the
    /// remaining participant.
    pub fn depart(
        &mut self,
        id: ParticipantId,
    ) -> Result<(Departure<ParticipantId>, Step), DomainError> {
        let departure = self.duel.depart(id)?;
        let mut step = Step::default();
        match departure {
            Departure::Dissolved { remaining } => {
                step.outbound.push((remaining, ServerMsg::OpponentLeft));
                step.finished = true;
            }
            Departure::Conceded(outcome) => self.game_over(&mut step, outcome),
            Departure::AlreadyOver => step.finished = true,
        }
        Ok((departure, step))
    }

    fn resolved(&self, report: RoundReport) -> Step {
        debug!(
            match_id = %self.match_id,
            round = report.round_no,
            health = ?report.health,
            "round resolved"
        );
        let mut step = Step::default();
        let mut rng =
            ChaCha8Rng::seed_from_u64(derive_narration_seed(self.match_seed, report.round_no));

        let participants = self.duel.participants();
        let players: BTreeMap<_, _> = (0..2)
            .map(|seat| {
                let action = report.actions[seat];
                (
                    participants[seat],
                    RoundPlayerView {
                        health: report.displayed_health(seat),
                        attack: action.map(|a| a.attack),
                        block: action.map(|a| a.block),
                    },
                )
            })
            .collect();
        let damages: BTreeMap<_, _> = (0..2)
            .map(|seat| (participants[seat], report.damage_taken[seat]))
            .collect();

        for (seat, id) in participants.into_iter().enumerate() {
            step.outbound.push((
                id,
                ServerMsg::RoundResult(RoundResultView {
                    round: report.round_no,
                    players: players.clone(),
                    damages: damages.clone(),
                    narration: narrate(&report, seat, &mut rng),
                }),
            ));
        }

        match self.duel.phase() {
            DuelPhase::MatchOver(outcome) => self.game_over(&mut step, outcome),
            _ => step.opened_round = Some(self.duel.round_no()),
        }
        step
    }

    fn game_over(&self, step: &mut Step, outcome: Outcome) {
        let winner = match outcome.verdict {
            Verdict::Winner(seat) => Winner::Participant(self.duel.participant(seat)),
            Verdict::Draw => Winner::Draw,
        };
        info!(
            match_id = %self.match_id,
            reason = ?outcome.reason,
            winner = ?winner,
            "match over"
        );
        self.to_both(
            &mut step.outbound,
            ServerMsg::GameOver(GameOverView {
                winner,
                reason: outcome.reason,
            }),
        );
        step.finished = true;
    }
}
