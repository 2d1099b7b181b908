/// Two-player game on one device.
///
/// Each player first types a word for the other to guess. That word also counts as their own
/// opening guess: once both words are in, both opening rows are evaluated against the words
/// just set, and the players take turns guessing from row 1 on. The device is handed over
/// between turns through a switch screen the next player has to acknowledge.
///
/// ```text
/// SettingWord(P1) ──▶ SettingWord(P2) ──▶ Guessing(P1) ◀──▶ Guessing(P2)
///                                             │                 │
///                                             └──▶ won/lost ◀───┘ (per player)
/// ```
use std::{fmt, sync::Arc};

use chrono::Utc;
use log::*;

use crate::board::{Board, GuessError, Keyboard, ROWS};
use crate::progress::SolvedWord;
use crate::schedule::*;
use crate::wordle::{evaluate, is_solved, GuessResult, Letter, Word};
use crate::words::WordList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(&self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    fn index(&self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}

/// Match-wide phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SettingWord,
    Guessing,
}

/// Who may act right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// The switch screen is up; the current player has to acknowledge it.
    Switching,
    /// The current player is typing.
    Playing,
    /// A row was accepted; waiting for the turn to end.
    Pending,
    /// Both players are done.
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Session is everything one player owns.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub board: Board,
    pub keyboard: Keyboard,
    /// The word this player set for the opponent.
    pub offered: Option<Word>,
    /// The word this player has to find, set by the opponent.
    pub target: Option<Word>,
    pub solved: Vec<SolvedWord>,
    pub outcome: Option<Outcome>,
}

impl Session {
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Delayed work for the duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reveal {
        player: Player,
        row: usize,
        col: usize,
        letter: Letter,
    },
    EndTurn,
    Victory(Player),
}

pub struct Duel {
    words: Arc<WordList>,
    sessions: [Session; 2],
    current: Player,
    phase: Phase,
    control: Control,
    epoch: u64,
}

impl Duel {
    pub fn new(words: Arc<WordList>) -> Duel {
        Duel {
            words,
            sessions: Default::default(),
            current: Player::One,
            phase: Phase::SettingWord,
            control: Control::Switching,
            epoch: 0,
        }
    }

    pub fn current(&self) -> Player {
        self.current
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn session(&self, player: Player) -> &Session {
        &self.sessions[player.index()]
    }

    fn session_mut(&mut self, player: Player) -> &mut Session {
        &mut self.sessions[player.index()]
    }

    /// Events that draw the match from scratch.
    pub fn start(&self) -> Effects<Command> {
        let mut fx = Effects::new();
        fx.emit(Event::ClearBoard {
            seat: Some(Player::One),
        });
        fx.emit(Event::ClearBoard {
            seat: Some(Player::Two),
        });
        fx.emit(Event::ResetKeyboard);
        fx.emit(Event::SwitchScreen {
            player: self.current,
            phase: self.phase,
        });
        fx
    }

    /// The current player confirms they have the device.
    pub fn acknowledge(&mut self) -> Effects<Command> {
        let mut fx = Effects::new();
        if self.control != Control::Switching {
            return fx;
        }
        self.control = Control::Playing;
        debug!("{} starts their turn ({:?})", self.current, self.phase);

        fx.emit(Event::ShowBoard {
            player: self.current,
        });
        fx.emit(Event::ResetKeyboard);
        for (letter, mark) in self.session(self.current).keyboard.keys() {
            fx.emit(Event::Key { letter, mark });
        }
        fx
    }

    pub fn add_letter(&mut self, c: char) -> Effects<Command> {
        let mut fx = Effects::new();
        if self.control != Control::Playing || !c.is_ascii_alphabetic() {
            return fx;
        }
        let player = self.current;
        let letter = c.to_ascii_uppercase();
        if let Some(pos) = self.session_mut(player).board.push(letter) {
            fx.emit(Event::Cell {
                seat: Some(player),
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
        if self.control != Control::Playing {
            return fx;
        }
        let player = self.current;
        if let Some(pos) = self.session_mut(player).board.pop() {
            fx.emit(Event::Cell {
                seat: Some(player),
                row: pos.row,
                col: pos.col,
                letter: None,
                mark: None,
            });
        }
        fx
    }

    /// Submits the current player's row: their word for the opponent while setting words,
    /// otherwise a guess at their own target. Rejected rows change nothing.
    pub fn submit_guess(&mut self) -> Result<Effects<Command>, GuessError> {
        if self.control != Control::Playing {
            return Err(GuessError::NotAccepting);
        }
        let player = self.current;
        let guess = self.session(player).board.current_word()?;
        if !self.words.contains(&guess) {
            return Err(GuessError::InvalidWord(guess));
        }

        match self.phase {
            Phase::SettingWord => Ok(self.set_word(player, guess)),
            Phase::Guessing => self.guess(player, guess),
        }
    }

    fn set_word(&mut self, player: Player, word: Word) -> Effects<Command> {
        let mut fx = Effects::new();
        info!("{} set a word", player);

        let session = self.session_mut(player);
        session.offered = Some(word);
        // The word stays on the board as the opening guess.
        session.board.commit();
        self.session_mut(player.other()).target = Some(word);

        fx.emit(Event::Message {
            seat: Some(player),
            text: "Word set! This will be your first guess too".into(),
        });

        if self.sessions.iter().all(|s| s.offered.is_some()) {
            info!("Both words set, guessing starts");
            self.phase = Phase::Guessing;
            for p in [Player::One, Player::Two] {
                self.reveal_opening(p, &mut fx);
            }
        }

        self.control = Control::Pending;
        fx.schedule(self.epoch, TURN_DELAY, Command::EndTurn);
        fx
    }

    // Evaluates a player's word-setting row against the target the opponent just set.
    fn reveal_opening(&mut self, player: Player, fx: &mut Effects<Command>) {
        let session = self.session(player);
        if session.board.result(0).is_some() {
            return;
        }
        let (Some(guess), Some(target)) = (session.board.guess(0), session.target) else {
            return;
        };

        let result = evaluate(&guess, &target);
        let session = self.session_mut(player);
        session.board.reveal(0, result);
        session.keyboard.update(&result);
        self.schedule_reveal(player, 0, &result, fx);

        if is_solved(&result) {
            self.win(player, target, 0, fx);
        }
    }

    fn guess(&mut self, player: Player, guess: Word) -> Result<Effects<Command>, GuessError> {
        let target = self
            .session(player)
            .target
            .ok_or(GuessError::NotAccepting)?;

        let mut fx = Effects::new();
        let result = evaluate(&guess, &target);
        let session = self.session_mut(player);
        let row = session.board.record(result);
        for (letter, mark) in session.keyboard.update(&result) {
            fx.emit(Event::Key { letter, mark });
        }
        self.schedule_reveal(player, row, &result, &mut fx);
        debug!("{} guessed {} against {}", player, guess, target);

        let delay = if guess == target {
            self.win(player, target, row, &mut fx);
            FINISH_DELAY
        } else if row + 1 >= ROWS {
            info!("{} is out of guesses, target word was {}", player, target);
            self.session_mut(player).outcome = Some(Outcome::Lost);
            fx.emit(Event::Message {
                seat: Some(player),
                text: format!("Game Over! The word was \"{}\"", target),
            });
            FINISH_DELAY
        } else {
            TURN_DELAY
        };

        self.control = Control::Pending;
        fx.schedule(self.epoch, delay, Command::EndTurn);
        Ok(fx)
    }

    fn win(&mut self, player: Player, target: Word, row: usize, fx: &mut Effects<Command>) {
        let attempts = row as u8 + 1;
        info!("{} found {} in {} attempts", player, target, attempts);

        let session = self.session_mut(player);
        session.outcome = Some(Outcome::Won);
        session.solved.push(SolvedWord {
            word: target,
            attempts,
            date: Utc::now(),
        });

        fx.emit(Event::Message {
            seat: Some(player),
            text: format!("Correct! You found \"{}\"", target),
        });
        fx.schedule(self.epoch, FINISH_DELAY, Command::Victory(player));
    }

    fn schedule_reveal(
        &self,
        player: Player,
        row: usize,
        result: &GuessResult,
        fx: &mut Effects<Command>,
    ) {
        for (col, letter) in result.iter().enumerate() {
            fx.schedule(
                self.epoch,
                TILE_STAGGER * col as u32,
                Command::Reveal {
                    player,
                    row,
                    col,
                    letter: *letter,
                },
            );
        }
    }

    /// Applies a delayed command. Commands from an earlier match are dropped.
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
            Command::Reveal {
                player,
                row,
                col,
                letter,
            } => fx.emit(Event::Cell {
                seat: Some(player),
                row,
                col,
                letter: Some(letter.char()),
                mark: Some(letter.mark()),
            }),
            Command::Victory(player) => {
                let session = self.session(player);
                let attempts = session.board.row();
                let set_by = player.other();
                fx.emit(Event::Modal {
                    title: format!("{} Wins!", player),
                    body: format!(
                        "Winning word: {}\nAttempts: {}/{}\nSet by: {}",
                        session.target.map(|w| w.to_string()).unwrap_or_default(),
                        attempts,
                        ROWS,
                        set_by
                    ),
                    action: if self.session(set_by).is_finished() {
                        ModalAction::NewGame
                    } else {
                        ModalAction::Continue
                    },
                });
            }
            Command::EndTurn => fx.extend(self.end_turn()),
        }
        fx
    }

    // Hands control to whoever plays next: the opponent if they're still guessing, else the
    // same player, else nobody.
    fn end_turn(&mut self) -> Effects<Command> {
        let mut fx = Effects::new();
        if self.control != Control::Pending {
            return fx;
        }

        let current = self.current;
        let next = match self.phase {
            Phase::SettingWord => Some(current.other()),
            Phase::Guessing => [current.other(), current]
                .into_iter()
                .find(|p| !self.session(*p).is_finished()),
        };

        match next {
            Some(player) if player == current => {
                self.control = Control::Playing;
                fx.emit(Event::Message {
                    seat: Some(player),
                    text: format!("{}, keep guessing", player),
                });
            }
            Some(player) => {
                self.current = player;
                self.control = Control::Switching;
                fx.emit(Event::SwitchScreen {
                    player,
                    phase: self.phase,
                });
            }
            None => {
                info!("Match over");
                self.control = Control::Over;
                fx.emit(Event::Modal {
                    title: "Match Over".into(),
                    body: self.scoreline(),
                    action: ModalAction::NewGame,
                });
            }
        }
        fx
    }

    fn scoreline(&self) -> String {
        [Player::One, Player::Two]
            .iter()
            .map(|p| {
                let session = self.session(*p);
                let target = session.target.map(|w| w.to_string()).unwrap_or_default();
                match session.outcome {
                    Some(Outcome::Won) => {
                        format!("{} found {} in {}/{}", p, target, session.board.row(), ROWS)
                    }
                    _ => format!("{} missed {}", p, target),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Resets both players and starts a new match.
    pub fn new_game(&mut self) -> Effects<Command> {
        info!("Starting new two-player match");
        self.epoch += 1;
        self.sessions = Default::default();
        self.current = Player::One;
        self.phase = Phase::SettingWord;
        self.control = Control::Switching;
        self.start()
    }
}
