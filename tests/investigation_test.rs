//! End-to-end games against the domain API, no console involved.

use rstest::rstest;

use detective_quest::domain::{
    Direction, DomainError, Investigation, Move, Phase, RoomMap, RoomSpec, SuspectIndex, Verdict,
};
use detective_quest::util::testing;

/// Hall{A} -> left Room1{A}, right Room2{B}
fn shared_clue_map() -> RoomMap {
    RoomMap::build(&[
        RoomSpec::new("Hall", Some("A")).with_exits(Some(1), Some(2)),
        RoomSpec::new("Room1", Some("A")),
        RoomSpec::new("Room2", Some("B")),
    ])
    .expect("valid map")
}

/// Hall -> Corridor -> Cellar, every clue pointing at Carlos
fn carlos_corridor() -> (RoomMap, SuspectIndex) {
    let map = RoomMap::build(&[
        RoomSpec::new("Hall", Some("mud")).with_exits(Some(1), None),
        RoomSpec::new("Corridor", Some("knife")).with_exits(None, Some(2)),
        RoomSpec::new("Cellar", Some("poison")),
    ])
    .expect("valid map");
    let index = SuspectIndex::build([("mud", "Carlos"), ("knife", "Carlos"), ("poison", "Carlos")]);
    (map, index)
}

#[test]
fn given_shared_clue_when_visiting_twice_then_logged_once_and_insufficient() {
    testing::init_test_setup();
    let index = SuspectIndex::build([("A", "X"), ("B", "Y")]);
    let (mut game, first) = Investigation::start(shared_clue_map(), index);
    assert_eq!(first.was_new_clue, Some(true));

    let Move::Entered(event) = game.advance(Direction::Left).unwrap() else {
        panic!("expected to enter Room1");
    };
    assert_eq!(event.entered_room, "Room1");
    assert_eq!(event.was_new_clue, Some(false));
    assert!(event.terminal);
    assert_eq!(game.ledger().to_vec(), ["A"]);

    let conclusion = game.accuse("X").unwrap();
    assert_eq!(conclusion.tally, 1);
    assert_eq!(conclusion.verdict, Verdict::Insufficient);
    assert_eq!(game.phase(), Phase::Concluded);
}

#[test]
fn given_three_clues_against_carlos_when_accusing_then_guilty() {
    testing::init_test_setup();
    let (map, index) = carlos_corridor();
    let (mut game, _) = Investigation::start(map, index);

    game.advance(Direction::Left).unwrap();
    game.advance(Direction::Right).unwrap();
    assert_eq!(game.phase(), Phase::AwaitingAccusation);

    let conclusion = game.accuse("  Carlos ").unwrap();
    assert_eq!(conclusion.accused, "Carlos");
    assert_eq!(conclusion.tally, 3);
    assert_eq!(conclusion.verdict, Verdict::Guilty);
    assert_eq!(conclusion.clues, ["knife", "mud", "poison"]);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn given_blank_accusation_when_accusing_then_rejected_and_still_waiting(#[case] name: &str) {
    let (map, index) = carlos_corridor();
    let (mut game, _) = Investigation::start(map, index);
    game.advance(Direction::Stop).unwrap();

    assert_eq!(game.accuse(name), Err(DomainError::EmptyAccusation));
    assert_eq!(game.phase(), Phase::AwaitingAccusation);
    assert!(game.conclusion().is_none());

    assert_eq!(game.accuse("Carlos").unwrap().tally, 1);
}

#[test]
fn given_missing_exit_when_advancing_then_error_and_room_unchanged() {
    let (map, index) = carlos_corridor();
    let (mut game, _) = Investigation::start(map, index);

    let err = game.advance(Direction::Right).unwrap_err();
    assert!(matches!(err, DomainError::InvalidDirection { ref room, .. } if room == "Hall"));
    assert!(err.is_recoverable());
    assert_eq!(game.current_room().name, "Hall");
    assert_eq!(game.phase(), Phase::Exploring);
    assert_eq!(game.ledger().count(), 1);
}

#[test]
fn given_stop_in_root_when_accusing_then_only_root_clue_counts() {
    let (map, index) = carlos_corridor();
    let (mut game, _) = Investigation::start(map, index);

    let stopped = game.advance(Direction::Stop).unwrap();
    assert_eq!(
        stopped,
        Move::Stopped {
            room: "Hall".to_string()
        }
    );
    assert_eq!(game.tally("Carlos"), 1);
    assert_eq!(game.accuse("Carlos").unwrap().verdict, Verdict::Insufficient);
}

#[test]
fn given_concluded_game_when_acting_then_wrong_phase() {
    let (map, index) = carlos_corridor();
    let (mut game, _) = Investigation::start(map, index);
    game.advance(Direction::Stop).unwrap();
    game.accuse("Carlos").unwrap();

    assert!(matches!(
        game.advance(Direction::Left),
        Err(DomainError::WrongPhase { .. })
    ));
    assert!(matches!(
        game.accuse("Carlos"),
        Err(DomainError::WrongPhase { .. })
    ));
}

#[test]
fn given_unknown_suspect_when_accusing_then_zero_tally() {
    let (map, index) = carlos_corridor();
    let (mut game, _) = Investigation::start(map, index);
    game.advance(Direction::Stop).unwrap();

    let conclusion = game.accuse("Beatriz").unwrap();
    assert_eq!(conclusion.tally, 0);
    assert_eq!(conclusion.verdict, Verdict::Insufficient);
}

#[test]
fn given_case_variant_name_when_accusing_then_no_match() {
    let (map, index) = carlos_corridor();
    let (mut game, _) = Investigation::start(map, index);
    game.advance(Direction::Stop).unwrap();

    assert_eq!(game.accuse("carlos").unwrap().tally, 0);
}
