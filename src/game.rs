/// Single-player game.
///
/// One board, one target at a time. In gift mode the targets come from a fixed list and the
/// game ends once every one of them is solved, unlocking the letter arranging finale. In
/// endless mode targets are drawn from the whole word list forever.
///
/// ```text
/// Active ──guess──▶ Active
///   │ │
///   │ └─match──▶ Won ──(delay)──▶ Active (next target)
///   │       └──▶ Complete (last gift word)
///   └─sixth miss──▶ Lost
/// ```
use std::sync::Arc;

use log::*;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::arrange::{ArrangeError, Arrangement};
use crate::board::{Board, GuessError, Keyboard};
use crate::progress::{Progress, Summary};
use crate::schedule::*;
use crate::wordle::{evaluate, Letter, Word};
use crate::words::WordList;

/// The gift words, in the order their letters are offered in the finale.
pub const GIFT_TARGETS: [&str; 3] = ["EARTH", "LILAC", "TEETH"];

/// What the gift words' letters spell.
pub const GIFT_PHRASE: &str = "CHILL EAT THEATRE";

/// Where a solved arrangement leads.
pub const GIFT_URL: &str = "gift-revealed.html";

/// How targets are picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetMode {
    /// Solve each of these once, in random order.
    Fixed(Vec<Word>),
    /// Random words from the full word list, with no end.
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub mode: TargetMode,
    /// Show the target and allow skipping ahead.
    pub debug: bool,
    /// The finale phrase, spelled by the letters of the fixed targets.
    pub phrase: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: TargetMode::Fixed(GIFT_TARGETS.iter().filter_map(|w| w.parse().ok()).collect()),
            debug: false,
            phrase: GIFT_PHRASE.to_string(),
        }
    }
}

impl GameConfig {
    pub fn endless() -> Self {
        GameConfig {
            mode: TargetMode::Unbounded,
            ..Default::default()
        }
    }

    pub fn targets(&self) -> Option<&[Word]> {
        match &self.mode {
            TargetMode::Fixed(targets) => Some(targets),
            TargetMode::Unbounded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    /// Solved; the next target is on its way.
    Won,
    Lost,
    /// Every fixed target has been solved.
    Complete,
}

/// Delayed work for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reveal { row: usize, col: usize, letter: Letter },
    Celebrate,
    NextTarget,
    GameOver,
    Unlock,
}

pub struct Game {
    config: GameConfig,
    words: Arc<WordList>,
    progress: Progress,
    rng: StdRng,
    board: Board,
    keyboard: Keyboard,
    target: Option<Word>,
    status: Status,
    epoch: u64,
}

impl Game {
    /// Creates a new game and picks the first target.
    pub fn new(config: GameConfig, words: Arc<WordList>, progress: Progress) -> Game {
        Game::with_rng(config, words, progress, StdRng::from_entropy())
    }

    pub fn with_rng(
        config: GameConfig,
        words: Arc<WordList>,
        progress: Progress,
        rng: StdRng,
    ) -> Game {
        let mut game = Game {
            config,
            words,
            progress,
            rng,
            board: Board::new(),
            keyboard: Keyboard::default(),
            target: None,
            status: Status::Active,
            epoch: 0,
        };
        game.target = game.pick_target();
        if game.target.is_none() {
            game.status = Status::Complete;
        }
        info!("Starting new game, target word: {:?}", game.target);
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    #[cfg(test)]
    pub fn target(&self) -> Option<Word> {
        self.target
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    #[cfg(test)]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[cfg(test)]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Events that draw the game from scratch.
    pub fn start(&self) -> Effects<Command> {
        let mut fx = Effects::new();
        fx.emit(Event::ClearBoard { seat: None });
        fx.emit(Event::ResetKeyboard);
        fx.emit(Event::Progress(self.summary()));
        if self.config.debug {
            fx.emit(Event::Target(self.target));
        }
        if self.status == Status::Complete {
            fx.emit(self.unlocked_modal());
        }
        fx
    }

    /// `pick_target` chooses the next target: a random unsolved gift word, or any word in
    /// endless mode. None means every gift word is solved.
    pub fn pick_target(&mut self) -> Option<Word> {
        match &self.config.mode {
            TargetMode::Fixed(targets) => {
                let unsolved: Vec<Word> = targets
                    .iter()
                    .filter(|w| !self.progress.is_solved(w))
                    .copied()
                    .collect();
                unsolved.choose(&mut self.rng).copied()
            }
            TargetMode::Unbounded => self.words.choose(&mut self.rng),
        }
    }

    pub fn add_letter(&mut self, c: char) -> Effects<Command> {
        let mut fx = Effects::new();
        if self.status != Status::Active || !c.is_ascii_alphabetic() {
            return fx;
        }
        let letter = c.to_ascii_uppercase();
        if let Some(pos) = self.board.push(letter) {
            fx.emit(Event::Cell {
                seat: None,
                row: pos.row,
                col: pos.col,
                letter: Some(letter),
                mark: None,
            });
        }
        fx
    }

    pub fn delete_letter(&mut self) -> Effects<Command> {
        let mut fx = Effects::new();
        if self.status != Status::Active {
            return fx;
        }
        if let Some(pos) = self.board.pop() {
            fx.emit(Event::Cell {
                seat: None,
                row: pos.row,
                col: pos.col,
                letter: None,
                mark: None,
            });
        }
        fx
    }

    /// Submits the current row. Validation failures leave the game untouched; the caller
    /// shakes the row and shows the error.
    pub fn submit_guess(&mut self) -> Result<Effects<Command>, GuessError> {
        if self.status != Status::Active {
            return Err(GuessError::NotAccepting);
        }
        let target = self.target.ok_or(GuessError::NotAccepting)?;
        let guess = self.board.current_word()?;
        if !self.words.contains(&guess) {
            return Err(GuessError::InvalidWord(guess));
        }

        let result = evaluate(&guess, &target);
        let row = self.board.record(result);
        debug!("Guessed {} against {}: {:?}", guess, target, result);

        let mut fx = Effects::new();
        for (col, letter) in result.iter().enumerate() {
            fx.schedule(
                self.epoch,
                TILE_STAGGER * col as u32,
                Command::Reveal {
                    row,
                    col,
                    letter: *letter,
                },
            );
        }
        for (letter, mark) in self.keyboard.update(&result) {
            fx.emit(Event::Key { letter, mark });
        }

        if guess == target {
            let attempts = row as u8 + 1;
            info!("Solved {} in {} attempts", target, attempts);
            self.progress.add_or_improve(target, attempts);
            fx.emit(Event::Progress(self.summary()));

            if self.all_targets_solved() {
                self.status = Status::Complete;
                self.target = None;
                if self.config.debug {
                    fx.emit(Event::Target(None));
                }
                fx.schedule(self.epoch, UNLOCK_DELAY, Command::Unlock);
            } else {
                self.status = Status::Won;
                fx.schedule(self.epoch, CELEBRATE_DELAY, Command::Celebrate);
            }
        } else if self.board.is_full() {
            info!("Out of guesses, target word was {}", target);
            self.status = Status::Lost;
            fx.schedule(self.epoch, GAME_OVER_DELAY, Command::GameOver);
        }

        Ok(fx)
    }

    /// Applies a delayed command. Commands from an earlier epoch are dropped.
    pub fn fire(&mut self, scheduled: Scheduled<Command>) -> Effects<Command> {
        let mut fx = Effects::new();
        if scheduled.epoch != self.epoch {
            debug!(
                "Dropping stale {:?} from epoch {} (now {})",
                scheduled.command, scheduled.epoch, self.epoch
            );
            return fx;
        }

        match scheduled.command {
            Command::Reveal { row, col, letter } => fx.emit(Event::Cell {
                seat: None,
                row,
                col,
                letter: Some(letter.char()),
                mark: Some(letter.mark()),
            }),
            Command::Celebrate if self.status == Status::Won => {
                if let Some(target) = self.target {
                    fx.emit(Event::Message {
                        seat: None,
                        text: format!("Great! \"{}\" found! Next word loading...", target),
                    });
                }
                fx.schedule(self.epoch, TRANSITION_DELAY, Command::NextTarget);
            }
            Command::NextTarget if self.status == Status::Won => fx.extend(self.replace_board()),
            Command::GameOver if self.status == Status::Lost => {
                let target = self.target.map(|w| w.to_string()).unwrap_or_default();
                fx.emit(Event::Modal {
                    title: "Game Over".into(),
                    body: format!(
                        "Game Over! The word was \"{}\". Better luck next time!",
                        target
                    ),
                    action: ModalAction::NewGame,
                });
            }
            Command::Unlock if self.status == Status::Complete => fx.emit(self.unlocked_modal()),
            command => debug!("Ignoring {:?} in status {:?}", command, self.status),
        }
        fx
    }

    /// Starts over with a fresh board and the next target. Refused once the gift words are
    /// all found.
    pub fn new_game(&mut self) -> Effects<Command> {
        if self.status == Status::Complete {
            info!("All target words already solved");
            return Effects::new();
        }
        self.replace_board()
    }

    /// Forgets all solved words and starts over.
    pub fn reset_progress(&mut self) -> Effects<Command> {
        info!("Resetting all progress");
        self.progress.clear();
        let mut fx = self.replace_board();
        fx.emit(Event::Progress(self.summary()));
        fx
    }

    /// The letter arranging finale, once every gift word is solved.
    pub fn start_arrangement(&self) -> Result<Arrangement, ArrangeError> {
        match (&self.config.mode, self.status) {
            (TargetMode::Fixed(targets), Status::Complete) => {
                Arrangement::new(targets, &self.config.phrase)
            }
            _ => Err(ArrangeError::Locked),
        }
    }

    /// Debug only: marks every gift word solved and jumps to the finale.
    pub fn skip_to_arrangement(&mut self) -> Result<(Arrangement, Effects<Command>), ArrangeError> {
        let targets = match (&self.config.mode, self.config.debug) {
            (TargetMode::Fixed(targets), true) => targets.clone(),
            _ => return Err(ArrangeError::Locked),
        };

        self.progress.mark_solved(&targets);
        self.epoch += 1;
        self.target = None;
        self.status = Status::Complete;
        info!("Skipped to letter game");

        let mut fx = Effects::new();
        fx.emit(Event::Target(None));
        fx.emit(Event::Progress(self.summary()));
        Ok((self.start_arrangement()?, fx))
    }

    pub fn summary(&self) -> Summary {
        self.progress.summary(self.config.targets())
    }

    fn all_targets_solved(&self) -> bool {
        match &self.config.mode {
            TargetMode::Fixed(targets) => targets.iter().all(|w| self.progress.is_solved(w)),
            TargetMode::Unbounded => false,
        }
    }

    fn replace_board(&mut self) -> Effects<Command> {
        self.epoch += 1;
        self.board = Board::new();
        self.keyboard.reset();
        self.target = self.pick_target();
        self.status = match self.target {
            Some(_) => Status::Active,
            None => Status::Complete,
        };
        info!("New target word: {:?}", self.target);

        let mut fx = Effects::new();
        fx.emit(Event::ClearBoard { seat: None });
        fx.emit(Event::ResetKeyboard);
        if self.config.debug {
            fx.emit(Event::Target(self.target));
        }
        if self.status == Status::Complete {
            fx.emit(self.unlocked_modal());
        }
        fx
    }

    fn unlocked_modal(&self) -> Event {
        let words = self
            .config
            .targets()
            .unwrap_or_default()
            .iter()
            .map(Word::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Event::Modal {
            title: "Words Unlocked!".into(),
            body: format!(
                "Congratulations! You've found all the words: {}. \
                 Now let's arrange these letters to reveal your gift!",
                words
            ),
            action: ModalAction::StartArrangement,
        }
    }
}
