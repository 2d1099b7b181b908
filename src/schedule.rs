/// Render intents and delayed commands.
///
/// The state machines never draw anything. Every operation returns `Effects`: the events the
/// view should apply right away, and commands to hand back to the machine after a delay.
/// Each delayed command carries the epoch it was created in; the machine drops it if the
/// board has been reset or replaced since.
use std::time::{Duration, Instant};

use crate::duel::{Phase, Player};
use crate::progress::Summary;
use crate::wordle::{Mark, Word};

/// Stagger between revealing consecutive tiles of a row.
pub const TILE_STAGGER: Duration = Duration::from_millis(100);

/// Pause after a winning row before the "next word" message.
pub const CELEBRATE_DELAY: Duration = Duration::from_millis(1500);

/// Pause between the "next word" message and the fresh board.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(2000);

/// Pause before the game over modal.
pub const GAME_OVER_DELAY: Duration = Duration::from_millis(1500);

/// Pause before the "all words found" modal.
pub const UNLOCK_DELAY: Duration = Duration::from_millis(2000);

/// Two-player: pause before handing the device over after a normal turn or a word set.
pub const TURN_DELAY: Duration = Duration::from_millis(1500);

/// Two-player: pause before handing over after a player won or ran out of rows.
pub const FINISH_DELAY: Duration = Duration::from_millis(2000);

/// What a modal's button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    NewGame,
    StartArrangement,
    Continue,
}

impl ModalAction {
    pub fn label(&self) -> &'static str {
        match self {
            ModalAction::NewGame => "New Game",
            ModalAction::StartArrangement => "Start Letter Game",
            ModalAction::Continue => "Continue",
        }
    }
}

/// Event is a render intent. `seat` names the board: `None` for the single-player board,
/// `Some(player)` for a duel board.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Cell {
        seat: Option<Player>,
        row: usize,
        col: usize,
        letter: Option<char>,
        mark: Option<Mark>,
    },
    Key {
        letter: char,
        mark: Mark,
    },
    ResetKeyboard,
    ClearBoard {
        seat: Option<Player>,
    },
    Shake {
        seat: Option<Player>,
        row: usize,
    },
    Message {
        seat: Option<Player>,
        text: String,
    },
    Modal {
        title: String,
        body: String,
        action: ModalAction,
    },
    Progress(Summary),
    SwitchScreen {
        player: Player,
        phase: Phase,
    },
    ShowBoard {
        player: Player,
    },
    /// Debug builds show the current target.
    Target(Option<Word>),
    Navigate(String),
}

/// A command to deliver back to its state machine once `delay` has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled<C> {
    pub delay: Duration,
    pub epoch: u64,
    pub command: C,
}

impl<C> Scheduled<C> {
    pub fn map<D>(self, f: impl FnOnce(C) -> D) -> Scheduled<D> {
        Scheduled {
            delay: self.delay,
            epoch: self.epoch,
            command: f(self.command),
        }
    }
}

/// Effects is the output of every state machine operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Effects<C> {
    pub events: Vec<Event>,
    pub scheduled: Vec<Scheduled<C>>,
}

impl<C> Default for Effects<C> {
    fn default() -> Self {
        Effects {
            events: Vec::new(),
            scheduled: Vec::new(),
        }
    }
}

impl<C> Effects<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn schedule(&mut self, epoch: u64, delay: Duration, command: C) {
        self.scheduled.push(Scheduled {
            delay,
            epoch,
            command,
        });
    }

    pub fn extend(&mut self, other: Effects<C>) {
        self.events.extend(other.events);
        self.scheduled.extend(other.scheduled);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.scheduled.is_empty()
    }
}

/// Timeline orders pending commands by the instant they fall due. Commands due at the same
/// instant come out in the order they were pushed.
#[derive(Debug)]
pub struct Timeline<C> {
    pending: Vec<(Instant, u64, Scheduled<C>)>,
    seq: u64,
}

impl<C> Default for Timeline<C> {
    fn default() -> Self {
        Timeline {
            pending: Vec::new(),
            seq: 0,
        }
    }
}

impl<C> Timeline<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, now: Instant, scheduled: Scheduled<C>) {
        self.seq += 1;
        self.pending.push((now + scheduled.delay, self.seq, scheduled));
    }

    /// When the next command falls due.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|(due, _, _)| *due).min()
    }

    /// Removes and returns every command due at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: Instant) -> Vec<Scheduled<C>> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _, _)| *at <= now);
        self.pending = pending;
        due.sort_by_key(|(at, seq, _)| (*at, *seq));
        due.into_iter().map(|(_, _, s)| s).collect()
    }
}
