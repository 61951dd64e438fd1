//! Arena scenarios driven through a recording outbox.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{EndReason, FighterCatalog, ParticipantId};
use crate::errors::DomainError;
use crate::protocol::{GameOverView, ServerMsg, Winner};
use crate::services::outbox::RecordingOutbox;
use crate::services::{Arena, ArenaSettings, ArenaStats};

fn arena_with(settings: ArenaSettings) -> (Arc<Arena>, Arc<RecordingOutbox>) {
    let outbox = Arc::new(RecordingOutbox::new());
    let arena = Arena::new(
        Arc::new(FighterCatalog::builtin()),
        outbox.clone(),
        ArenaSettings {
            rng_seed: Some(7),
            ..settings
        },
    );
    (arena, outbox)
}

fn arena() -> (Arc<Arena>, Arc<RecordingOutbox>) {
    arena_with(ArenaSettings::default())
}

fn join(arena: &Arena) -> ParticipantId {
    let id = ParticipantId::new();
    arena.connect(id);
    id
}

/// Two connected, paired, ready participants in round 1.
fn started_match(arena: &Arena, outbox: &RecordingOutbox) -> (ParticipantId, ParticipantId) {
    let (a, b) = (join(arena), join(arena));
    arena.select_fighter(a, "Knight").unwrap();
    arena.select_fighter(b, "Monk").unwrap();
    arena.player_ready(a).unwrap();
    arena.player_ready(b).unwrap();
    outbox.clear();
    (a, b)
}

fn last_game_over(outbox: &RecordingOutbox, id: ParticipantId) -> Option<GameOverView> {
    outbox.take_for(id).into_iter().rev().find_map(|msg| match msg {
        ServerMsg::GameOver(view) => Some(view),
        _ => None,
    })
}

#[test]
fn connect_greets_then_lists_fighters() {
    let (arena, outbox) = arena();
    let a = join(&arena);
    let msgs = outbox.take_for(a);
    assert!(matches!(&msgs[0], ServerMsg::Welcome(w) if w.participant_id == a));
    assert!(matches!(&msgs[1], ServerMsg::UpdateAvailableCharacters(list) if list.len() == 6));
}

#[test]
fn selection_broadcasts_availability_to_everyone() {
    let (arena, outbox) = arena();
    let (a, b) = (join(&arena), join(&arena));
    outbox.clear();

    arena.select_fighter(a, "Knight").unwrap();
    assert_eq!(
        outbox.kinds_for(a),
        vec!["characterSelected", "updateAvailableCharacters", "updatePlayers"]
    );
    let to_b = outbox.take_for(b);
    let [ServerMsg::UpdateAvailableCharacters(list)] = to_b.as_slice() else {
        panic!("expected one catalog update, got {to_b:?}");
    };
    assert!(list.iter().all(|f| f.name != "Knight"));
}

#[test]
fn taken_fighter_is_unavailable() {
    let (arena, outbox) = arena();
    let (a, b) = (join(&arena), join(&arena));
    arena.select_fighter(a, "Ronin").unwrap();
    outbox.clear();

    assert_eq!(
        arena.select_fighter(b, "Ronin"),
        Err(DomainError::FighterUnavailable("Ronin".into()))
    );
    assert!(outbox.take().is_empty());
    assert_eq!(arena.stats().waiting, 1);
}

#[test]
fn pairing_reveals_opponent_and_equipment() {
    let (arena, outbox) = arena();
    let (a, b) = (join(&arena), join(&arena));
    arena.select_fighter(a, "Knight").unwrap();
    outbox.clear();
    arena.select_fighter(b, "Monk").unwrap();

    let to_a = outbox.take_for(a);
    let own = to_a.iter().find_map(|m| match m {
        ServerMsg::EquipmentAssigned(items) => Some(items.clone()),
        _ => None,
    });
    let opp = to_a.iter().find_map(|m| match m {
        ServerMsg::OpponentCharacter(f) => Some(f.name.clone()),
        _ => None,
    });
    assert_eq!(opp.as_deref(), Some("Monk"));
    let own = own.unwrap();
    assert_eq!(own.len(), 3);
    let mut dedup = own.clone();
    dedup.sort();
    dedup.dedup();
    assert_eq!(dedup.len(), 3);

    let to_b = outbox.take_for(b);
    assert!(to_b.contains(&ServerMsg::OpponentEquipment(own)));
    assert!(!to_b.contains(&ServerMsg::StartGame));
    assert_eq!(
        arena.stats(),
        ArenaStats {
            connected: 2,
            waiting: 0,
            active_matches: 1
        }
    );
}

#[test]
fn ready_requires_a_fighter() {
    let (arena, _) = arena();
    let a = join(&arena);
    assert_eq!(arena.player_ready(a), Err(DomainError::FighterRequired));
}

#[test]
fn start_game_after_both_ready() {
    let (arena, outbox) = arena();
    let (a, b) = (join(&arena), join(&arena));
    arena.select_fighter(a, "Knight").unwrap();
    arena.select_fighter(b, "Monk").unwrap();
    outbox.clear();

    arena.player_ready(a).unwrap();
    assert!(!outbox.kinds_for(a).contains(&"startGame"));
    arena.player_ready(b).unwrap();
    assert!(outbox.kinds_for(a).contains(&"startGame"));
    assert!(outbox.kinds_for(b).contains(&"startGame"));
}

#[test]
fn early_ready_carries_into_match() {
    let (arena, outbox) = arena();
    let (a, b) = (join(&arena), join(&arena));
    arena.select_fighter(a, "Knight").unwrap();
    arena.player_ready(a).unwrap();
    arena.select_fighter(b, "Monk").unwrap();
    arena.player_ready(b).unwrap();
    assert!(outbox.kinds_for(a).contains(&"startGame"));
}

#[test]
fn full_match_ends_in_knockout_and_resets_sessions() {
    let (arena, outbox) = arena();
    let (a, b) = started_match(&arena, &outbox);

    // a hits head unblocked every round; b always blocks legs and attacks legs into a's block.
    for round in 1..=4 {
        arena.submit_action(a, "head", "legs").unwrap();
        assert_eq!(
            outbox.take_for(a),
            vec![ServerMsg::ActionAccepted { round }],
            "round {round}"
        );
        arena.submit_action(b, "legs", "chest").unwrap();
        if round < 4 {
            let to_b = outbox.take_for(b);
            let ServerMsg::RoundResult(view) = &to_b[0] else {
                panic!("expected roundResult");
            };
            assert_eq!(view.players[&b].health, 100 - 30 * round);
            outbox.clear();
        }
    }

    let game_over = last_game_over(&outbox, a).unwrap();
    assert_eq!(game_over.winner, Winner::Participant(a));
    assert_eq!(game_over.reason, EndReason::Knockout);
    assert_eq!(arena.stats().active_matches, 0);
    assert_eq!(arena.match_of(a), None);
    let (available, reserved) = arena.fighter_availability();
    assert_eq!(available.len(), 6);
    assert!(reserved.is_empty());

    // The finished match accepts nothing more.
    assert_eq!(
        arena.submit_action(a, "head", "legs"),
        Err(DomainError::NotInMatch)
    );
}

#[test]
fn invalid_part_and_duplicate_are_rejected_without_change() {
    let (arena, outbox) = arena();
    let (a, b) = started_match(&arena, &outbox);

    assert_eq!(
        arena.submit_action(a, "nose", "head"),
        Err(DomainError::InvalidPart("nose".into()))
    );
    arena.submit_action(a, "head", "head").unwrap();
    assert_eq!(
        arena.submit_action(a, "chest", "chest"),
        Err(DomainError::DuplicateSubmission)
    );
    outbox.clear();

    arena.submit_action(b, "legs", "legs").unwrap();
    let to_b = outbox.take_for(b);
    let ServerMsg::RoundResult(view) = &to_b[0] else {
        panic!("expected roundResult");
    };
    // The first committed action stands.
    assert_eq!(view.players[&a].attack, Some(crate::domain::Part::Head));
    assert_eq!(view.damages[&b], 30);
}

#[test]
fn action_before_pairing_or_start() {
    let (arena, _) = arena();
    let (a, b) = (join(&arena), join(&arena));
    arena.select_fighter(a, "Knight").unwrap();
    assert_eq!(
        arena.submit_action(a, "head", "head"),
        Err(DomainError::NotInMatch)
    );
    arena.select_fighter(b, "Monk").unwrap();
    assert!(matches!(
        arena.submit_action(a, "head", "head"),
        Err(DomainError::PhaseMismatch(_))
    ));
}

#[test]
fn disconnect_mid_match_forfeits() {
    let (arena, outbox) = arena();
    let (a, b) = started_match(&arena, &outbox);
    arena.submit_action(a, "head", "head").unwrap();

    arena.disconnect(a);
    let game_over = last_game_over(&outbox, b).unwrap();
    assert_eq!(game_over.winner, Winner::Participant(b));
    assert_eq!(game_over.reason, EndReason::Forfeit);
    assert_eq!(arena.stats().active_matches, 0);

    // In-flight action from the torn-down session.
    assert_eq!(
        arena.submit_action(a, "head", "head"),
        Err(DomainError::StaleParticipant)
    );
    assert_eq!(arena.fighter_availability().0.len(), 6);
}

#[test]
fn disconnect_before_start_returns_opponent_to_pool() {
    let (arena, outbox) = arena();
    let (a, b) = (join(&arena), join(&arena));
    arena.select_fighter(a, "Knight").unwrap();
    arena.select_fighter(b, "Monk").unwrap();
    arena.player_ready(b).unwrap();
    outbox.clear();

    arena.disconnect(a);
    assert!(outbox.kinds_for(b).contains(&"opponentLeft"));
    assert_eq!(
        arena.stats(),
        ArenaStats {
            connected: 1,
            waiting: 1,
            active_matches: 0
        }
    );

    // A newcomer pairs with b, whose readiness carried over.
    let c = join(&arena);
    arena.select_fighter(c, "Knight").unwrap();
    outbox.clear();
    arena.player_ready(c).unwrap();
    assert!(outbox.kinds_for(b).contains(&"startGame"));
}

#[test]
fn disconnect_is_idempotent() {
    let (arena, _) = arena();
    let a = join(&arena);
    arena.disconnect(a);
    arena.disconnect(a);
    assert_eq!(arena.stats().connected, 0);
}

#[test]
fn stale_round_timer_is_ignored() {
    let (arena, outbox) = arena();
    let (a, b) = started_match(&arena, &outbox);
    let match_id = arena.match_of(a).unwrap();
    arena.submit_action(a, "head", "head").unwrap();
    arena.submit_action(b, "legs", "legs").unwrap();
    outbox.clear();

    arena.expire_round(match_id, 1);
    assert!(outbox.take().is_empty());

    arena.expire_round(match_id, 2);
    outbox.clear();
    arena.expire_round(match_id, 2);
    assert!(outbox.take().is_empty());
}

#[test]
fn idle_round_deals_no_damage_and_match_continues() {
    let (arena, outbox) = arena();
    let (a, b) = started_match(&arena, &outbox);
    let match_id = arena.match_of(a).unwrap();

    arena.expire_round(match_id, 1);
    for id in [a, b] {
        let msgs = outbox.take_for(id);
        assert!(!msgs.iter().any(|m| matches!(m, ServerMsg::GameOver(_))));
        let Some(ServerMsg::RoundResult(view)) = msgs.last() else {
            panic!("expected roundResult, got {msgs:?}");
        };
        assert_eq!(view.round, 1);
        assert_eq!(view.players[&a].health, 100);
        assert_eq!(view.players[&b].health, 100);
        assert!(view.damages.values().all(|d| *d == 0));
    }
    assert_eq!(arena.match_of(a), Some(match_id));
    assert_eq!(arena.stats().active_matches, 1);

    // Round 2 is open and plays normally.
    arena.submit_action(a, "head", "legs").unwrap();
    arena.submit_action(b, "chest", "chest").unwrap();
    let Some(ServerMsg::RoundResult(view)) = outbox.take_for(b).pop() else {
        panic!("expected roundResult");
    };
    assert_eq!(view.round, 2);
    assert_eq!(view.players[&b].health, 70);
}

#[tokio::test]
async fn round_timer_defaults_silent_participant() {
    let (arena, outbox) = arena_with(ArenaSettings {
        round_timeout: Some(Duration::from_millis(50)),
        ..ArenaSettings::default()
    });
    let (a, b) = started_match(&arena, &outbox);
    arena.submit_action(a, "groin", "head").unwrap();
    outbox.clear();

    tokio::time::sleep(Duration::from_millis(80)).await;
    let to_b = outbox.take_for(b);
    let result = to_b.iter().find_map(|m| match m {
        ServerMsg::RoundResult(view) => Some(view.clone()),
        _ => None,
    });
    let view = result.expect("round resolved by timer");
    assert_eq!(view.round, 1);
    assert_eq!(view.players[&b].attack, None);
    assert_eq!(view.players[&b].health, 75);
}
