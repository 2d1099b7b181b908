/// App is the console front-end. It turns input lines into intents for the game, feeds the
/// resulting events to the console and keeps delayed commands on a timeline until they're due.
use std::time::Instant;

use anyhow::Context;
use log::*;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::arrange::{ArrangeError, Arrangement};
use crate::board::GuessError;
use crate::duel::{self, Control, Duel};
use crate::game::{self, Game, GIFT_URL};
use crate::render::{render_arrangement, Console};
use crate::schedule::{Effects, Event, ModalAction, Timeline};
use crate::wordle::WORD_LEN;

const HELP: &str = "Type a 5-letter word to guess it.

/del            delete the last letter
/new            start a new game
/reset          forget all solved words
/go             press the button on screen, or take the device (two players)
/next           start the letter game once all words are found
/skip           debug: jump straight to the letter game
/place <t> <s>  put tile t into slot s
/take <t>       put tile t back
/clear          put every tile back
/autofill       debug: arrange the letters for you
/check          check your arrangement
/quit           leave";

/// A delayed command for whichever game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Game(game::Command),
    Duel(duel::Command),
}

pub enum Mode {
    Single(Game),
    Duel(Duel),
}

pub struct App {
    mode: Mode,
    puzzle: Option<Arrangement>,
    console: Console,
    timeline: Timeline<Pending>,
    debug: bool,
    quit: bool,
}

impl App {
    pub fn new(mode: Mode) -> App {
        let debug = match &mode {
            Mode::Single(game) => game.config().debug,
            Mode::Duel(_) => false,
        };
        App {
            mode,
            puzzle: None,
            console: Console::new(),
            timeline: Timeline::new(),
            debug,
            quit: false,
        }
    }

    #[cfg(test)]
    pub fn console(&self) -> &Console {
        &self.console
    }

    #[cfg(test)]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    #[cfg(test)]
    pub fn puzzle(&self) -> Option<&Arrangement> {
        self.puzzle.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.quit
    }

    /// When the next delayed command falls due.
    pub fn next_due(&self) -> Option<Instant> {
        self.timeline.next_due()
    }

    /// Draws the opening screen.
    pub fn start(&mut self, now: Instant) -> Vec<String> {
        match &self.mode {
            Mode::Single(game) => {
                let fx = game.start();
                self.apply(fx, Pending::Game, now);
            }
            Mode::Duel(duel) => {
                let fx = duel.start();
                self.apply(fx, Pending::Duel, now);
            }
        }
        self.console.say("Type /help for commands.");
        self.console.flush()
    }

    /// Fires every command due at `now`, including ones they schedule with no delay.
    pub fn tick(&mut self, now: Instant) -> Vec<String> {
        loop {
            let due = self.timeline.pop_due(now);
            if due.is_empty() {
                break;
            }
            for scheduled in due {
                match (&mut self.mode, scheduled.command) {
                    (Mode::Single(game), Pending::Game(command)) => {
                        let fx = game.fire(scheduled.map(|_| command));
                        self.apply(fx, Pending::Game, now);
                    }
                    (Mode::Duel(duel), Pending::Duel(command)) => {
                        let fx = duel.fire(scheduled.map(|_| command));
                        self.apply(fx, Pending::Duel, now);
                    }
                    (_, command) => warn!("Dropping {:?} for a different mode", command),
                }
            }
        }
        self.console.flush()
    }

    /// Handles one line of input.
    pub fn handle_line(&mut self, line: &str, now: Instant) -> Vec<String> {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match command {
            "" => {}
            "/help" => self.console.say(HELP),
            "/quit" => self.quit = true,
            "/del" => self.delete_letter(now),
            "/new" => self.new_game(now),
            "/reset" => self.reset_progress(now),
            "/go" => self.go(now),
            "/next" => self.start_arrangement(),
            "/skip" => self.skip(now),
            "/place" => match args.as_slice() {
                [tile, slot] => match (tile.parse::<usize>(), slot.parse::<usize>()) {
                    (Ok(tile), Ok(slot)) => {
                        self.with_puzzle(|puzzle| puzzle.place(tile, slot).map(|_| ()))
                    }
                    _ => self.console.say("Tile and slot must be numbers"),
                },
                _ => self.console.say("Usage: /place <tile> <slot>"),
            },
            "/take" => match args.as_slice() {
                [tile] => match tile.parse::<usize>() {
                    Ok(tile) => {
                        self.with_puzzle(|puzzle| puzzle.take(tile).map(|_| ()))
                    }
                    Err(_) => self.console.say("Tile must be a number"),
                },
                _ => self.console.say("Usage: /take <tile>"),
            },
            "/clear" => self.with_puzzle(|puzzle| {
                puzzle.reset();
                Ok(())
            }),
            "/autofill" => self.autofill(),
            "/check" => self.check(),
            word if word.starts_with('/') => self
                .console
                .say(format!("I don't know {}. Type /help for commands.", word)),
            word => self.type_word(word, now),
        }

        self.console.flush()
    }

    fn apply<C>(&mut self, fx: Effects<C>, wrap: fn(C) -> Pending, now: Instant) {
        for event in &fx.events {
            self.console.apply(event);
        }
        for scheduled in fx.scheduled {
            self.timeline.push(now, scheduled.map(wrap));
        }
    }

    // A bare word replaces whatever is typed in the current row and is submitted right away.
    fn type_word(&mut self, word: &str, now: Instant) {
        if self.puzzle.is_some() {
            self.console
                .say("Use /place, /take and /check to arrange the letters.");
            return;
        }
        if !word.chars().all(|c| c.is_ascii_alphabetic()) {
            self.console.say("Letters only, please");
            return;
        }
        if word.chars().count() > WORD_LEN {
            self.console.say("Too many letters");
            return;
        }

        match &mut self.mode {
            Mode::Single(game) => {
                let mut fx = Effects::new();
                for _ in 0..game.board().col() {
                    fx.extend(game.delete_letter());
                }
                for c in word.chars() {
                    fx.extend(game.add_letter(c));
                }
                let row = game.board().row();
                let result = game.submit_guess();
                self.apply(fx, Pending::Game, now);
                self.submitted(result, None, row, Pending::Game, now);
            }
            Mode::Duel(duel) => {
                let player = duel.current();
                let mut fx = Effects::new();
                for _ in 0..duel.session(player).board.col() {
                    fx.extend(duel.delete_letter());
                }
                for c in word.chars() {
                    fx.extend(duel.add_letter(c));
                }
                let row = duel.session(player).board.row();
                let result = duel.submit_guess();
                self.apply(fx, Pending::Duel, now);
                self.submitted(result, Some(player), row, Pending::Duel, now);
            }
        }
    }

    fn submitted<C>(
        &mut self,
        result: Result<Effects<C>, GuessError>,
        seat: Option<crate::duel::Player>,
        row: usize,
        wrap: fn(C) -> Pending,
        now: Instant,
    ) {
        match result {
            Ok(fx) => self.apply(fx, wrap, now),
            Err(GuessError::NotAccepting) => debug!("Input ignored, not accepting guesses"),
            Err(e) => {
                self.console.apply(&Event::Shake { seat, row });
                self.console.apply(&Event::Message {
                    seat: None,
                    text: e.to_string(),
                });
            }
        }
    }

    fn delete_letter(&mut self, now: Instant) {
        match &mut self.mode {
            Mode::Single(game) => {
                let fx = game.delete_letter();
                self.apply(fx, Pending::Game, now);
            }
            Mode::Duel(duel) => {
                let fx = duel.delete_letter();
                self.apply(fx, Pending::Duel, now);
            }
        }
    }

    fn new_game(&mut self, now: Instant) {
        self.console.dismiss_modal();
        match &mut self.mode {
            Mode::Single(game) => {
                let fx = game.new_game();
                if fx.is_empty() {
                    self.console
                        .say("All words found! Type /next for the letter game.");
                    return;
                }
                self.puzzle = None;
                self.apply(fx, Pending::Game, now);
            }
            Mode::Duel(duel) => {
                let fx = duel.new_game();
                self.apply(fx, Pending::Duel, now);
            }
        }
    }

    fn reset_progress(&mut self, now: Instant) {
        match &mut self.mode {
            Mode::Single(game) => {
                self.puzzle = None;
                self.console.dismiss_modal();
                let fx = game.reset_progress();
                self.apply(fx, Pending::Game, now);
                self.console.say("Progress cleared.");
            }
            Mode::Duel(_) => self
                .console
                .say("Nothing is saved in two-player mode. Use /new to start over."),
        }
    }

    // Presses the modal's button, then takes the device if a switch screen is waiting.
    fn go(&mut self, now: Instant) {
        match self.console.dismiss_modal() {
            Some(ModalAction::NewGame) => return self.new_game(now),
            Some(ModalAction::StartArrangement) => return self.start_arrangement(),
            Some(ModalAction::Continue) | None => {}
        }

        if let Mode::Duel(duel) = &mut self.mode {
            if duel.control() == Control::Switching {
                let fx = duel.acknowledge();
                self.apply(fx, Pending::Duel, now);
            }
        }
    }

    fn start_arrangement(&mut self) {
        let Mode::Single(game) = &self.mode else {
            self.console
                .say("The letter game is only in single-player mode.");
            return;
        };
        match game.start_arrangement() {
            Ok(puzzle) => {
                info!("Starting letter game: {}", puzzle.phrase());
                self.console.dismiss_modal();
                let mut sources: Vec<String> =
                    puzzle.tiles().iter().map(|t| t.source.to_string()).collect();
                sources.dedup();
                self.console.say(format!(
                    "Arrange the letters of {} into the hidden phrase!",
                    sources.join(", ")
                ));
                self.console.say(render_arrangement(&puzzle));
                self.puzzle = Some(puzzle);
            }
            Err(ArrangeError::Locked) => self
                .console
                .say("Find all the words first to unlock the letter game."),
            Err(e) => {
                error!("Can't build the letter game: {}", e);
                self.console.say(format!("Can't start the letter game: {}", e));
            }
        }
    }

    fn skip(&mut self, now: Instant) {
        let Mode::Single(game) = &mut self.mode else {
            return;
        };
        match game.skip_to_arrangement() {
            Ok((puzzle, fx)) => {
                self.apply(fx, Pending::Game, now);
                self.console.say("[debug] skipped to the letter game");
                self.console.say(render_arrangement(&puzzle));
                self.puzzle = Some(puzzle);
            }
            Err(_) => self.console.say("Skipping is only available in debug mode."),
        }
    }

    fn with_puzzle(
        &mut self,
        f: impl FnOnce(&mut Arrangement) -> Result<(), ArrangeError>,
    ) {
        let Some(puzzle) = self.puzzle.as_mut() else {
            self.console.say("The letter game isn't unlocked yet.");
            return;
        };
        match f(puzzle) {
            Ok(()) => {
                let drawing = render_arrangement(puzzle);
                self.console.say(drawing);
            }
            Err(e) => self.console.say(e.to_string()),
        }
    }

    fn autofill(&mut self) {
        if !self.debug {
            self.console.say("Autofill is only available in debug mode.");
            return;
        }
        self.with_puzzle(|puzzle| {
            puzzle.autofill();
            Ok(())
        });
    }

    fn check(&mut self) {
        let Some(puzzle) = self.puzzle.as_ref() else {
            self.console.say("The letter game isn't unlocked yet.");
            return;
        };
        let check = puzzle.check();
        match check.message(puzzle.slot_count()) {
            Some(message) => self.console.say(message),
            None => {
                info!("Letter game solved");
                self.console
                    .say(format!("You spelled {}!", puzzle.phrase()));
                self.console.apply(&Event::Navigate(GIFT_URL.to_string()));
            }
        }
        debug!("Checked arrangement: {:?}", check);
    }

    /// run reads commands from stdin and fires delayed commands on time, until the input ends
    /// or the player quits.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        print(&mut stdout, self.start(Instant::now())).await?;

        while !self.is_done() {
            let output = match self.next_due() {
                Some(due) => {
                    tokio::select! {
                        line = lines.next_line() => match line.context("Error reading input")? {
                            Some(line) => self.handle_line(&line, Instant::now()),
                            None => break,
                        },
                        _ = tokio::time::sleep_until(tokio::time::Instant::from_std(due)) => {
                            self.tick(Instant::now())
                        }
                    }
                }
                None => match lines.next_line().await.context("Error reading input")? {
                    Some(line) => self.handle_line(&line, Instant::now()),
                    None => break,
                },
            };
            print(&mut stdout, output).await?;
        }

        info!("Bye");
        Ok(())
    }
}

async fn print(stdout: &mut tokio::io::Stdout, lines: Vec<String>) -> anyhow::Result<()> {
    for line in lines {
        stdout
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .context("Error writing output")?;
    }
    stdout.flush().await.context("Error writing output")
}
