//! Simultaneous round resolution.
//!
//! Both strikes are evaluated against the same pre-round snapshot, so the
//! order in which participants committed never changes the outcome.

use crate::domain::parts::{Action, Part};

/// Seat index within a match (0 or 1).
pub type Seat = usize;

pub const SEATS: usize = 2;

#[inline]
pub fn opponent_of(seat: Seat) -> Seat {
    1 - seat
}

/// What happened to one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    /// The attacker had no committed action (round timed out on them).
    Withheld,
    /// The defender covered the attacked part.
    Blocked { part: Part },
    /// Full table damage applied.
    Landed { part: Part, damage: u32 },
}

impl Strike {
    pub fn damage(&self) -> u32 {
        match self {
            Strike::Landed { damage, .. } => *damage,
            _ => 0,
        }
    }
}

/// Resolve a single attack. A defender without an action blocks nothing.
pub fn strike(attacker: Option<Action>, defender: Option<Action>) -> Strike {
    let Some(attack) = attacker.map(|a| a.attack) else {
        return Strike::Withheld;
    };
    match defender {
        Some(d) if d.block == attack => Strike::Blocked { part: attack },
        _ => Strike::Landed {
            part: attack,
            damage: attack.damage(),
        },
    }
}

/// Terminal outcome of a resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Winner(Seat),
    Draw,
}

/// Result of one resolved round, indexed by seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round_no: u32,
    pub actions: [Option<Action>; SEATS],
    /// `strikes[s]` is the attack made BY seat `s`.
    pub strikes: [Strike; SEATS],
    /// Damage received by each seat.
    pub damage_taken: [u32; SEATS],
    /// Internal post-round health; may be negative.
    pub health: [i32; SEATS],
}

impl RoundReport {
    /// Health as shown to clients, floored at zero.
    pub fn displayed_health(&self, seat: Seat) -> u32 {
        self.health[seat].max(0) as u32
    }

    pub fn verdict(&self) -> Option<Verdict> {
        verdict(self.health)
    }
}

pub fn verdict(health: [i32; SEATS]) -> Option<Verdict> {
    match (health[0] <= 0, health[1] <= 0) {
        (true, true) => Some(Verdict::Draw),
        (true, false) => Some(Verdict::Winner(1)),
        (false, true) => Some(Verdict::Winner(0)),
        (false, false) => None,
    }
}

pub fn resolve_round(
    round_no: u32,
    health_before: [i32; SEATS],
    actions: [Option<Action>; SEATS],
) -> RoundReport {
    let strikes = [
        strike(actions[0], actions[1]),
        strike(actions[1], actions[0]),
    ];
    let damage_taken = [strikes[1].damage(), strikes[0].damage()];
    let health = [
        health_before[0] - damage_taken[0] as i32,
        health_before[1] - damage_taken[1] as i32,
    ];

    RoundReport {
        round_no,
        actions,
        strikes,
        damage_taken,
        health,
    }
}
