//! Human-readable round narration, written from one participant's point of view.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::domain::combat::{opponent_of, RoundReport, Seat, Strike};
use crate::domain::parts::Part;

const ATTACK_LANDED: [&str; 3] = [
    "You struck the opponent's [part] in a flash, dealing [damage] damage!",
    "Your blow to the [part] was sharp and heavy: [damage] damage.",
    "With blinding speed you hit the opponent's [part] for [damage] damage.",
];

const ATTACK_BLOCKED: [&str; 3] = [
    "The opponent read your strike at the [part] and blocked it!",
    "Your strike at the [part] glanced off the opponent's guard.",
    "The opponent covered the [part] just in time; your strike did nothing.",
];

const DEFENSE_HELD: [&str; 3] = [
    "You blocked the opponent's strike at your [part]!",
    "Your guard on the [part] saved you.",
    "Thanks to your block on the [part], you avoided [damage] damage.",
];

const DEFENSE_BROKEN: [&str; 3] = [
    "The opponent hit your [part], dealing [damage] damage!",
    "You missed a strike to the [part] and took [damage] damage.",
    "The opponent struck your [part]; you lost [damage] health.",
];

const OWN_WITHHELD: &str = "You hesitated and never threw a strike.";
const OPPONENT_WITHHELD: &str = "The opponent hesitated and never threw a strike.";

fn fill(template: &str, part: Part) -> String {
    template
        .replace("[part]", part.as_str())
        .replace("[damage]", &part.damage().to_string())
}

fn pick<R: Rng + ?Sized>(phrases: &[&'static str], rng: &mut R) -> &'static str {
    phrases.choose(rng).copied().unwrap_or(phrases[0])
}

/// Two lines for `viewer`: their own attack, then the opponent's attack on them.
pub fn narrate<R: Rng + ?Sized>(report: &RoundReport, viewer: Seat, rng: &mut R) -> Vec<String> {
    let own = match report.strikes[viewer] {
        Strike::Landed { part, .. } => fill(pick(&ATTACK_LANDED, rng), part),
        Strike::Blocked { part } => fill(pick(&ATTACK_BLOCKED, rng), part),
        Strike::Withheld => OWN_WITHHELD.to_string(),
    };

    let incoming = match report.strikes[opponent_of(viewer)] {
        Strike::Landed { part, .. } => fill(pick(&DEFENSE_BROKEN, rng), part),
        Strike::Blocked { part } => fill(pick(&DEFENSE_HELD, rng), part),
        Strike::Withheld => OPPONENT_WITHHELD.to_string(),
    };

    vec![own, incoming]
}
