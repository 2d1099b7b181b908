use std::sync::Arc;

use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, SeedableRng};

use crate::board::GuessError;
use crate::game::*;
use crate::progress::{load, MemoryStorage, Progress};
use crate::schedule::{Effects, Event, ModalAction};
use crate::wordle::{Mark, Word};
use crate::words::WordList;

fn word(s: &str) -> Word {
    s.parse().unwrap()
}

fn words() -> Arc<WordList> {
    let mut list = WordList::fallback();
    list.extend(["EARTH", "LILAC", "TEETH", "CIVIL", "CRANE"].map(word));
    Arc::new(list)
}

fn gift_game(progress: Progress) -> Game {
    Game::with_rng(
        GameConfig::default(),
        words(),
        progress,
        StdRng::seed_from_u64(7),
    )
}

fn type_word(game: &mut Game, s: &str) {
    for c in s.chars() {
        game.add_letter(c);
    }
}

// Fires every scheduled command, including the ones they schedule, and returns all events.
fn settle(game: &mut Game, fx: Effects<Command>) -> Vec<Event> {
    let mut events = fx.events;
    let mut queue = fx.scheduled;
    while !queue.is_empty() {
        let scheduled = queue.remove(0);
        let fx = game.fire(scheduled);
        events.extend(fx.events);
        queue.extend(fx.scheduled);
    }
    events
}

fn play(game: &mut Game, s: &str) -> Vec<Event> {
    type_word(game, s);
    let fx = game.submit_guess().unwrap();
    settle(game, fx)
}

#[test]
fn letters_fill_and_clear_the_current_row() {
    let mut game = gift_game(Progress::in_memory());

    let fx = game.add_letter('e');
    assert_eq!(
        fx.events,
        vec![Event::Cell {
            seat: None,
            row: 0,
            col: 0,
            letter: Some('E'),
            mark: None
        }]
    );

    type_word(&mut game, "ARTHX");
    assert_eq!(game.board().col(), 5);
    assert!(game.add_letter('Q').is_empty());

    game.delete_letter();
    assert_eq!(game.board().col(), 4);

    for _ in 0..6 {
        game.delete_letter();
    }
    assert_eq!(game.board().col(), 0);
    assert!(game.delete_letter().is_empty());
    assert!(game.add_letter('1').is_empty());
}

#[test]
fn incomplete_guess_is_rejected_without_changes() {
    let mut game = gift_game(Progress::in_memory());
    type_word(&mut game, "EAR");

    assert_eq!(game.submit_guess(), Err(GuessError::IncompleteGuess));
    assert_eq!(game.board().row(), 0);
    assert_eq!(game.board().col(), 3);
}

#[test]
fn unknown_word_is_rejected_without_changes() {
    let mut game = gift_game(Progress::in_memory());
    type_word(&mut game, "QQQQQ");

    assert_eq!(
        game.submit_guess(),
        Err(GuessError::InvalidWord(word("QQQQQ")))
    );
    assert_eq!(game.board().row(), 0);
    assert_eq!(GuessError::IncompleteGuess.to_string(), "Not enough letters");
    assert_eq!(
        GuessError::InvalidWord(word("QQQQQ")).to_string(),
        "Not in word list"
    );
}

#[test]
fn miss_reveals_tiles_and_updates_keyboard() {
    let mut game = gift_game(Progress::in_memory());
    let target = game.target().unwrap();
    let guess = if target == word("CRANE") { "HOUSE" } else { "CRANE" };

    type_word(&mut game, guess);
    let fx = game.submit_guess().unwrap();

    assert_eq!(fx.scheduled.len(), 5);
    assert!(fx.events.iter().all(|e| matches!(e, Event::Key { .. })));
    let events = settle(&mut game, fx);
    let cells = events
        .iter()
        .filter(|e| matches!(e, Event::Cell { row: 0, mark: Some(_), .. }))
        .count();
    assert_eq!(cells, 5);
    assert_eq!(game.board().row(), 1);
    assert_eq!(game.status(), Status::Active);
}

#[test]
fn fixed_targets_run_out_after_all_are_solved() {
    let storage = MemoryStorage::new();
    let mut game = gift_game(Progress::open(storage.clone()));
    let mut seen = Vec::new();

    for _ in 0..3 {
        let target = game.target().unwrap();
        assert!(!seen.contains(&target));
        seen.push(target);
        play(&mut game, &target.to_string());
    }

    seen.sort();
    assert_eq!(seen, vec![word("EARTH"), word("LILAC"), word("TEETH")]);
    assert_eq!(game.status(), Status::Complete);
    assert_eq!(game.pick_target(), None);
    assert_eq!(game.target(), None);

    type_word(&mut game, "CRANE");
    assert_eq!(game.board().col(), 0);
    assert_eq!(game.submit_guess(), Err(GuessError::NotAccepting));
    assert!(game.new_game().is_empty());

    let arrangement = game.start_arrangement().unwrap();
    assert_eq!(arrangement.slot_count(), 15);
    assert_eq!(load(&storage).len(), 3);
}

#[test]
fn debug_target_is_cleared_after_the_last_word() {
    let mut game = Game::with_rng(
        GameConfig {
            mode: TargetMode::Fixed(vec![word("LILAC")]),
            debug: true,
            ..Default::default()
        },
        words(),
        Progress::in_memory(),
        StdRng::seed_from_u64(3),
    );
    assert_eq!(game.target(), Some(word("LILAC")));

    let events = play(&mut game, "LILAC");
    assert_eq!(game.status(), Status::Complete);
    assert_eq!(game.target(), None);
    assert!(events.contains(&Event::Target(None)));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::Modal {
            action: ModalAction::StartArrangement,
            ..
        }
    )));
}

#[test]
fn winning_records_attempts_and_moves_on() {
    let mut game = gift_game(Progress::in_memory());
    let target = game.target().unwrap();
    let miss = if target == word("EARTH") { "LILAC" } else { "EARTH" };

    play(&mut game, miss);
    type_word(&mut game, &target.to_string());
    let fx = game.submit_guess().unwrap();
    assert_eq!(game.status(), Status::Won);
    assert_eq!(game.progress().get(&target).unwrap().attempts, 2);

    // Input is blocked until the next board arrives.
    assert!(game.add_letter('A').is_empty());

    let epoch = game.epoch();
    let events = settle(&mut game, fx);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::Message { text, .. } if text.contains("Next word loading")
    )));
    assert!(events.contains(&Event::ClearBoard { seat: None }));
    assert_eq!(game.epoch(), epoch + 1);
    assert_eq!(game.status(), Status::Active);
    assert_eq!(game.board().row(), 0);
    assert_ne!(game.target(), Some(target));
    assert_eq!(game.keyboard().keys().count(), 0);
}

#[test]
fn six_misses_lose_and_report_the_target() {
    let mut game = gift_game(Progress::in_memory());
    let target = game.target().unwrap();
    let miss = ["HOUSE", "WORLD", "GREAT", "RIGHT", "THINK", "PLACE"];

    let mut events = Vec::new();
    for guess in miss {
        events = play(&mut game, guess);
    }

    assert_eq!(game.status(), Status::Lost);
    assert_eq!(game.board().row(), 6);
    let modal = events.iter().find_map(|e| match e {
        Event::Modal { body, action, .. } => Some((body.clone(), *action)),
        _ => None,
    });
    let (body, action) = modal.unwrap();
    assert!(body.contains(&target.to_string()));
    assert_eq!(action, ModalAction::NewGame);

    assert_eq!(game.submit_guess(), Err(GuessError::NotAccepting));
    game.new_game();
    assert_eq!(game.status(), Status::Active);
    assert_eq!(game.board().row(), 0);
}

#[test]
fn stale_commands_are_dropped_after_reset() {
    let mut game = gift_game(Progress::in_memory());
    let target = game.target().unwrap();

    type_word(&mut game, &target.to_string());
    let fx = game.submit_guess().unwrap();
    assert_eq!(game.status(), Status::Won);

    game.reset_progress();
    let fresh = game.target();
    assert!(game.progress().records().is_empty());

    let events = settle(&mut game, fx);
    assert!(events.iter().all(|e| !matches!(e, Event::Cell { .. } | Event::Message { .. })));
    assert_eq!(game.target(), fresh);
    assert_eq!(game.status(), Status::Active);
}

#[test]
fn saved_progress_is_respected_at_start() {
    let storage = MemoryStorage::new();
    let mut progress = Progress::open(storage.clone());
    progress.add_or_improve(word("EARTH"), 2);
    progress.add_or_improve(word("LILAC"), 3);

    let game = gift_game(Progress::open(storage.clone()));
    assert_eq!(game.target(), Some(word("TEETH")));

    progress.add_or_improve(word("TEETH"), 4);
    let game = gift_game(Progress::open(storage));
    assert_eq!(game.status(), Status::Complete);
    let start = game.start();
    assert!(start.events.iter().any(|e| matches!(
        e,
        Event::Modal { action: ModalAction::StartArrangement, .. }
    )));
}

#[test]
fn endless_mode_never_completes() {
    let mut game = Game::with_rng(
        GameConfig::endless(),
        words(),
        Progress::in_memory(),
        StdRng::seed_from_u64(3),
    );

    for _ in 0..5 {
        let target = game.target().unwrap();
        assert!(words().contains(&target));
        play(&mut game, &target.to_string());
        assert_eq!(game.status(), Status::Active);
    }
    assert!(game.start_arrangement().is_err());
    assert_eq!(game.summary().total, None);
}

#[test]
fn skipping_needs_debug() {
    let mut game = gift_game(Progress::in_memory());
    assert!(game.skip_to_arrangement().is_err());
    assert!(game.start_arrangement().is_err());

    let mut game = Game::with_rng(
        GameConfig {
            debug: true,
            ..Default::default()
        },
        words(),
        Progress::in_memory(),
        StdRng::seed_from_u64(1),
    );
    let (arrangement, _) = game.skip_to_arrangement().unwrap();
    assert_eq!(arrangement.segments(), &[5, 3, 7]);
    assert_eq!(game.status(), Status::Complete);
    assert_eq!(game.progress().get(&word("TEETH")).unwrap().attempts, 4);
}

#[test]
fn keyboard_keeps_best_mark() {
    let mut game = Game::with_rng(
        GameConfig {
            mode: TargetMode::Fixed(vec![word("LILAC")]),
            ..Default::default()
        },
        words(),
        Progress::in_memory(),
        StdRng::seed_from_u64(1),
    );

    play(&mut game, "CIVIL");
    assert_eq!(game.keyboard().get('I'), Some(Mark::Correct));
    assert_eq!(game.keyboard().get('V'), Some(Mark::Absent));
    assert_eq!(game.keyboard().get('C'), Some(Mark::Present));

    play(&mut game, "CRANE");
    assert_eq!(game.keyboard().get('C'), Some(Mark::Present));
    assert_eq!(game.keyboard().get('A'), Some(Mark::Present));
}
