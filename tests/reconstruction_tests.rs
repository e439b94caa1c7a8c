//! End-to-end reconstruction tests over synthetic client logs.
//!
//! Each test writes a log with `LogBuilder`, parses it with `ArenaLog`
//! and checks the per-match outcome.

mod common;

use arena_log::cards::{CardDefinition, CardId, CardRegistry};
use arena_log::core::{InstanceId, MatchId, Seat};
use arena_log::report::RenderedReport;
use arena_log::{ArenaLog, LogError, MatchError};
use serde_json::json;

use common::*;

fn parse(log: String) -> ArenaLog {
    ArenaLog::parse(log.as_bytes())
}

/// Scenario: two connection responses both naming seat 2.
#[test]
fn test_seat_two_is_never_defaulted_to_one() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect(2, &[])
        .connect(2, &[])
        .game_state(json!({ "gameObjects": [card(100, 5, BATTLEFIELD, 1)] }))
        .build();

    let report = parse(log).reconstruct(&MatchId::new("m-1")).unwrap();
    assert_eq!(report.local_seat, Seat::TWO);
    assert_eq!(report.opponent_seat(), Seat::ONE);
    assert_eq!(report.opponent_name.as_deref(), Some("Alice"));
    assert_eq!(report.revealed_by(Seat::ONE).count(CardId::new(5)), 1);
}

/// Scenario: a card leaves the hand snapshot and reappears on the battlefield
/// under a new id.
#[test]
fn test_played_card_leaves_hand() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect(1, &[500, 501, 502])
        .game_state(json!({ "zones": [hand(1, &[10, 11, 12])] }))
        .game_state(json!({
            "zones": [hand(1, &[11, 12])],
            "annotations": [id_change(10, 20)],
            "gameObjects": [card(20, 500, BATTLEFIELD, 1)],
            "diffDeletedInstanceIds": [10]
        }))
        .build();

    let report = parse(log).reconstruct_latest().unwrap();
    let mine = report.revealed_by(Seat::ONE);
    assert_eq!(mine.count(CardId::new(500)), 1);
    assert_eq!(mine.total(), 1, "hand cards were never identified");
    assert!(report.unconfirmed.is_empty());
}

/// Scenario: remap after the instance was tracked on the battlefield.
#[test]
fn test_remap_after_battlefield() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect(1, &[])
        .game_state(json!({ "gameObjects": [card(284, 900, BATTLEFIELD, 2)] }))
        .game_state(json!({ "annotations": [id_change(284, 289)] }))
        .build();

    let report = parse(log).reconstruct_latest().unwrap();
    assert_eq!(report.revealed_by(Seat::TWO).count(CardId::new(900)), 1);
    assert_eq!(report.revealed_by(Seat::TWO).total(), 1);
}

/// Scenario: one match without a connection response; the other still parses.
#[test]
fn test_unresolved_seat_does_not_abort_other_matches() {
    let log = LogBuilder::new()
        .start("broken")
        .game_state(json!({ "gameObjects": [card(1, 5, BATTLEFIELD, 2)] }))
        .complete("broken")
        .start("good")
        .connect(1, &[])
        .game_state(json!({ "gameObjects": [card(1, 6, BATTLEFIELD, 2)] }))
        .complete("good")
        .build();

    let results = parse(log).reconstruct_all().unwrap();
    assert_eq!(results.len(), 2);

    let failure = results[0].as_ref().unwrap_err();
    assert_eq!(failure.match_id, MatchId::new("broken"));
    assert_eq!(failure.error, MatchError::SeatUnresolved);

    let report = results[1].as_ref().unwrap();
    assert_eq!(report.match_id, MatchId::new("good"));
    assert!(report.complete);
    assert_eq!(report.revealed_by(Seat::TWO).count(CardId::new(6)), 1);
}

/// Scenario: detailed logging disabled in the header.
#[test]
fn test_detailed_logging_disabled_header() {
    let log = LogBuilder::new()
        .line("DETAILED LOGS: DISABLED")
        .start("m-1")
        .build();

    let parsed = parse(log);
    assert!(matches!(parsed.list_matches(), Err(LogError::MissingDetailedLogging)));
    assert!(matches!(parsed.reconstruct_latest(), Err(LogError::MissingDetailedLogging)));
}

/// Scenario: a match with room events only, no game-engine traffic.
#[test]
fn test_match_without_game_messages() {
    let log = LogBuilder::new().start("m-1").complete("m-1").build();

    match parse(log).reconstruct_latest() {
        Err(LogError::Match(failure)) => assert_eq!(failure.error, MatchError::MissingDetailedLogging),
        other => panic!("expected missing detailed logging, got {:?}", other),
    }
}

#[test]
fn test_empty_log_has_no_matches() {
    let log = LogBuilder::new().line("nothing else").build();
    assert!(matches!(parse(log).list_matches(), Err(LogError::NoMatchesFound)));
}

#[test]
fn test_list_matches() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect(1, &[])
        .complete("m-1")
        .start("m-2")
        .build();

    let summaries = parse(log).list_matches().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].opponent_name.as_deref(), Some("Bob"));
    assert!(summaries[0].completed);
    assert!(summaries[0].end.is_some());
    assert!(summaries[0].start.is_some());
    assert_eq!(summaries[1].id, MatchId::new("m-2"));
    assert!(!summaries[1].completed);
}

#[test]
fn test_instance_ids_are_match_scoped() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect(1, &[])
        .game_state(json!({ "gameObjects": [card(10, 100, BATTLEFIELD, 2)] }))
        .complete("m-1")
        .start("m-2")
        .connect(1, &[])
        .game_state(json!({ "gameObjects": [card(10, 200, GRAVEYARD_TWO, 2)] }))
        .build();

    let parsed = parse(log);
    let second = parsed.reconstruct(&MatchId::new("m-2")).unwrap();
    assert_eq!(second.revealed_by(Seat::TWO).count(CardId::new(100)), 0);
    assert_eq!(second.revealed_by(Seat::TWO).count(CardId::new(200)), 1);

    let first = parsed.reconstruct(&MatchId::new("m-1")).unwrap();
    assert_eq!(first.revealed_by(Seat::TWO).count(CardId::new(100)), 1);
}

#[test]
fn test_mulligan_redraw_excluded() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect(1, &[])
        .game_state(json!({
            "zones": [hand(1, &[10, 11])],
            "gameObjects": [card(10, 70, 31, 1), card(11, 71, 31, 1)]
        }))
        // Mulligan: the whole hand is replaced.
        .game_state(json!({
            "zones": [hand(1, &[20, 21])],
            "gameObjects": [card(20, 72, 31, 1), card(21, 73, 31, 1)]
        }))
        .build();

    let report = parse(log).reconstruct_latest().unwrap();
    let mine = report.revealed_by(Seat::ONE);
    assert_eq!(mine.count(CardId::new(70)), 0);
    assert_eq!(mine.count(CardId::new(72)), 1);
    assert_eq!(mine.count(CardId::new(73)), 1);

    let unconfirmed: Vec<_> = report.unconfirmed.iter().map(|c| c.instance_id).collect();
    assert_eq!(unconfirmed, vec![InstanceId(10), InstanceId(11)]);
}

#[test]
fn test_opponent_hand_stays_hidden() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect(1, &[])
        .game_state(json!({
            "zones": [hand(2, &[40, 41])]
        }))
        .game_state(json!({
            "zones": [hand(2, &[41])],
            "gameObjects": [card(40, 300, EXILE, 2)]
        }))
        .build();

    let report = parse(log).reconstruct_latest().unwrap();
    let theirs = report.revealed_by(Seat::TWO);
    assert_eq!(theirs.count(CardId::new(300)), 1);
    assert_eq!(theirs.total(), 1);
}

#[test]
fn test_deck_library_and_commander() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect(1, &[1, 1, 2, 3])
        .game_state(json!({
            "zones": [zone(LIBRARY_TWO, "Library", Some(2), &(100..199).collect::<Vec<u32>>())],
            "gameObjects": [card(500, 77, COMMAND, 2)]
        }))
        .build();

    let report = parse(log).reconstruct_latest().unwrap();
    assert_eq!(report.deck.count(CardId::new(1)), 2);
    assert_eq!(report.deck.total(), 4);
    assert_eq!(report.library_sizes[Seat::TWO], 99);
    assert_eq!(report.commanders[Seat::TWO], vec![CardId::new(77)]);
}

#[test]
fn test_truncated_tail_and_bad_block_are_tolerated() {
    let mut log = LogBuilder::new()
        .start("m-1")
        .connect(1, &[])
        .line("{ \"greToClientEvent\": oops }")
        .game_state(json!({ "gameObjects": [card(1, 42, GRAVEYARD_ONE, 1)] }))
        .build();
    log.push_str("{\n  \"greToClientEvent\": { \"greToClientMessages\": [\n");

    let parsed = parse(log);
    assert_eq!(parsed.skipped_blocks(), 1);
    let report = parsed.reconstruct_latest().unwrap();
    assert_eq!(report.revealed_by(Seat::ONE).count(CardId::new(42)), 1);
}

#[test]
fn test_unterminated_block_before_match_is_skipped() {
    let log = LogBuilder::new()
        .line("{\"greToClientEvent\": {\"greToClientMessages\": [")
        .start("m-1")
        .connect(1, &[])
        .game_state(json!({ "gameObjects": [card(1, 42, BATTLEFIELD, 2)] }))
        .complete("m-1")
        .build();

    let parsed = parse(log);
    assert_eq!(parsed.skipped_blocks(), 1);
    assert_eq!(parsed.list_matches().unwrap().len(), 1);

    let report = parsed.reconstruct_latest().unwrap();
    assert!(report.complete);
    assert_eq!(report.revealed_by(Seat::TWO).count(CardId::new(42)), 1);
}

#[test]
fn test_corrupt_match_is_isolated() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect(1, &[])
        .game_state(json!({ "annotations": [id_change(1, 2)] }))
        .game_state(json!({ "annotations": [id_change(2, 1)] }))
        .complete("m-1")
        .start("m-2")
        .connect(1, &[])
        .build();

    let results = parse(log).reconstruct_all().unwrap();
    assert!(matches!(
        results[0].as_ref().unwrap_err().error,
        MatchError::CorruptState(_)
    ));
    assert!(results[1].is_ok());
}

#[test]
fn test_rendered_report() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect_with_sideboard(1, &[10, 10, 11], &[12, 13])
        .game_state(json!({ "gameObjects": [
            card(1, 10, BATTLEFIELD, 1),
            card(2, 21, BATTLEFIELD, 2),
            card(3, 21, GRAVEYARD_TWO, 2),
            card(4, 22, EXILE, 2),
            card(5, 99, BATTLEFIELD, 2)
        ]}))
        .complete("m-1")
        .build();
    let report = parse(log).reconstruct_latest().unwrap();

    let mut registry = CardRegistry::new();
    registry.register(CardDefinition::new(CardId::new(10), "Forest").with_type("Land"));
    registry.register(CardDefinition::new(CardId::new(20), "Fire /// Ice").with_type("Instant"));
    registry.register(CardDefinition::new(CardId::new(21), "Fire").with_type("Instant"));
    registry.register(CardDefinition::new(CardId::new(22), "Ice").with_type("Instant"));

    let text = RenderedReport::new(&report, &registry).to_string();
    assert!(text.starts_with("Match m-1\n"));
    assert!(text.contains("OPPONENT'S DECK (Bob, Seat 2)"));
    assert!(text.contains("  Instants (3):\n    - Fire /// Ice (x3)\n"));
    assert!(text.contains("    - Unknown card #99\n"));
    assert!(text.contains("Revealed: 2 unique cards | 4 total cards"));
    assert!(text.contains("Deck: 3 cards total | 1 revealed | 2 unrevealed"));
    assert!(text.contains("Sideboard: 2 cards"));
    assert_eq!(report.sideboard.total(), 2);
}

#[test]
fn test_report_serializes() {
    let log = LogBuilder::new()
        .start("m-1")
        .connect(2, &[])
        .game_state(json!({ "gameObjects": [card(1, 8, BATTLEFIELD, 1)] }))
        .build();
    let report = parse(log).reconstruct_latest().unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["match_id"], json!("m-1"));
    assert_eq!(value["local_seat"], json!(2));
    assert_eq!(value["complete"], json!(false));
}
