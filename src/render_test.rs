use pretty_assertions::assert_eq;

use crate::duel::{Phase, Player};
use crate::render::*;
use crate::schedule::Event;
use crate::wordle::Mark;

fn typed(seat: Option<Player>, col: usize, letter: char) -> Event {
    Event::Cell {
        seat,
        row: 0,
        col,
        letter: Some(letter),
        mark: None,
    }
}

#[test]
fn tiles_show_their_mark() {
    assert_eq!(emoji_letter('a'), '🇦');
    assert_eq!(render_tile(Some('E'), Some(Mark::Correct)), " 🇪 ");
    assert_eq!(render_tile(Some('E'), Some(Mark::Present)), "`E`");
    assert_eq!(render_tile(Some('E'), Some(Mark::Absent)), "~E~");
    assert_eq!(render_tile(None, None), " _ ");
}

#[test]
fn typing_redraws_the_board() {
    let mut console = Console::new();
    console.apply(&typed(None, 0, 'E'));

    let out = console.flush();
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with(" E  _ "));
    assert!(console.flush().is_empty());
}

#[test]
fn board_stays_hidden_while_the_device_is_handed_over() {
    let mut console = Console::new();
    console.apply(&Event::SwitchScreen {
        player: Player::Two,
        phase: Phase::Guessing,
    });
    console.apply(&typed(Some(Player::Two), 0, 'H'));

    let out = console.flush();
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("Pass the device to Player 2."));

    console.apply(&Event::ShowBoard {
        player: Player::Two,
    });
    let out = console.flush();
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("Player 2's board:\n H "));
}
