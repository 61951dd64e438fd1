use crate::domain::combat::Verdict;
use crate::domain::duel::{Departure, Duel, DuelPhase, EndReason, Expiry, Outcome, Submission};
use crate::domain::parts::{Action, Part};
use crate::errors::domain::DomainError;

const A: u8 = 1;
const B: u8 = 2;

fn started() -> Duel<u8> {
    let mut duel = Duel::new([A, B], [false, false]);
    assert!(!duel.mark_ready(A).unwrap());
    assert!(duel.mark_ready(B).unwrap());
    duel
}

fn act(attack: Part, block: Part) -> Action {
    Action::new(attack, block)
}

fn resolved(sub: Submission) -> crate::domain::combat::RoundReport {
    match sub {
        Submission::Resolved(report) => report,
        Submission::Awaiting => panic!("expected the round to resolve"),
    }
}

#[test]
fn ready_handshake_enters_round_one() {
    let duel = started();
    assert_eq!(duel.phase(), DuelPhase::RoundInProgress);
    assert_eq!(duel.round_no(), 1);
    assert_eq!(duel.health(), [100, 100]);
}

#[test]
fn pre_ready_seats_start_immediately() {
    let mut duel = Duel::new([A, B], [true, true]);
    assert!(duel.start_if_ready());
    assert!(!duel.start_if_ready());
    assert_eq!(duel.phase(), DuelPhase::RoundInProgress);
}

#[test]
fn head_blocked_one_way_only() {
    let mut duel = started();
    assert_eq!(
        duel.submit(A, act(Part::Head, Part::Legs)).unwrap(),
        Submission::Awaiting
    );
    let report = resolved(duel.submit(B, act(Part::Head, Part::Head)).unwrap());

    assert_eq!(report.damage_taken, [30, 0]);
    assert_eq!(duel.health(), [70, 100]);
    assert_eq!(duel.phase(), DuelPhase::RoundInProgress);
    assert_eq!(duel.round_no(), 2);
    assert!(!duel.has_committed(0) && !duel.has_committed(1));
}

#[test]
fn lethal_hit_ends_with_winner() {
    let mut duel = started();
    // Three unblocked head hits leave A at 10, a fourth finishes.
    for _ in 0..3 {
        duel.submit(A, act(Part::Legs, Part::Legs)).unwrap();
        duel.submit(B, act(Part::Head, Part::Head)).unwrap();
    }
    assert_eq!(duel.health()[0], 10);

    duel.submit(A, act(Part::Chest, Part::Groin)).unwrap();
    let report = resolved(duel.submit(B, act(Part::Head, Part::Legs)).unwrap());
    assert_eq!(report.displayed_health(0), 0);
    assert!(report.health[0] < 0);
    assert_eq!(
        duel.phase(),
        DuelPhase::MatchOver(Outcome {
            verdict: Verdict::Winner(1),
            reason: EndReason::Knockout
        })
    );
}

#[test]
fn simultaneous_knockout_is_a_draw() {
    let mut duel = started();
    for _ in 0..4 {
        duel.submit(A, act(Part::Head, Part::Chest)).unwrap();
        duel.submit(B, act(Part::Head, Part::Chest)).unwrap();
    }
    assert_eq!(
        duel.phase(),
        DuelPhase::MatchOver(Outcome {
            verdict: Verdict::Draw,
            reason: EndReason::Knockout
        })
    );
}

#[test]
fn duplicate_submission_is_rejected_without_change() {
    let mut duel = started();
    duel.submit(A, act(Part::Head, Part::Legs)).unwrap();
    let before = duel.clone();
    assert_eq!(
        duel.submit(A, act(Part::Chest, Part::Chest)),
        Err(DomainError::DuplicateSubmission)
    );
    assert_eq!(duel, before);

    // The first choice is the one that counts.
    let report = resolved(duel.submit(B, act(Part::Legs, Part::Chest)).unwrap());
    assert_eq!(report.damage_taken[1], 30);
}

#[test]
fn no_actions_after_match_over_or_before_start() {
    let mut waiting = Duel::new([A, B], [false, false]);
    assert!(matches!(
        waiting.submit(A, act(Part::Head, Part::Head)),
        Err(DomainError::PhaseMismatch(_))
    ));

    let mut duel = started();
    duel.depart(B).unwrap();
    assert!(matches!(
        duel.submit(A, act(Part::Head, Part::Head)),
        Err(DomainError::PhaseMismatch(_))
    ));
    assert!(matches!(duel.mark_ready(A), Err(DomainError::PhaseMismatch(_))));
}

#[test]
fn outsider_is_stale() {
    let mut duel = started();
    assert_eq!(
        duel.submit(99, act(Part::Head, Part::Head)),
        Err(DomainError::StaleParticipant)
    );
    assert_eq!(duel.depart(99), Err(DomainError::StaleParticipant));
}

#[test]
fn departure_before_start_dissolves() {
    let mut duel = Duel::new([A, B], [true, false]);
    assert_eq!(duel.depart(A).unwrap(), Departure::Dissolved { remaining: B });
    assert_eq!(duel.phase(), DuelPhase::Dissolved);
    assert_eq!(duel.depart(B).unwrap(), Departure::AlreadyOver);
}

#[test]
fn departure_mid_round_forfeits_to_remaining() {
    let mut duel = started();
    duel.submit(B, act(Part::Head, Part::Legs)).unwrap();
    let expected = Outcome {
        verdict: Verdict::Winner(1),
        reason: EndReason::Forfeit,
    };
    assert_eq!(duel.depart(A).unwrap(), Departure::Conceded(expected));
    assert_eq!(duel.depart(B).unwrap(), Departure::AlreadyOver);
    assert_eq!(duel.phase(), DuelPhase::MatchOver(expected));
}

#[test]
fn expiry_defaults_missing_slot() {
    let mut duel = started();
    duel.submit(A, act(Part::Chest, Part::Head)).unwrap();
    let Expiry::Resolved(report) = duel.expire(1) else {
        panic!("expected a resolution");
    };
    assert_eq!(report.actions[1], None);
    assert_eq!(report.damage_taken, [0, 20]);
    assert_eq!(duel.round_no(), 2);

    // Timer for a round that is gone does nothing.
    assert_eq!(duel.expire(1), Expiry::Stale);
}

#[test]
fn idle_expiry_keeps_match_running() {
    let mut duel = started();
    let Expiry::Resolved(report) = duel.expire(1) else {
        panic!("expected a resolution");
    };
    assert_eq!(report.actions, [None, None]);
    assert_eq!(report.damage_taken, [0, 0]);
    assert_eq!(report.verdict(), None);
    assert_eq!(duel.health(), [100, 100]);
    assert_eq!(duel.phase(), DuelPhase::RoundInProgress);
    assert_eq!(duel.round_no(), 2);
    assert_eq!(duel.expire(1), Expiry::Stale);
}
