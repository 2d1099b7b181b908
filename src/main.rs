use std::{str::FromStr, sync::Arc};

use anyhow::{bail, Context};
use argh::FromArgs;
use log::*;

use crate::app::{App, Mode};
use crate::duel::Duel;
use crate::game::{Game, GameConfig, TargetMode};
use crate::progress::{FileStorage, Progress};
use crate::wordle::Word;
use crate::words::WordList;

mod app;
mod arrange;
mod board;
mod duel;
mod finder;
mod game;
mod progress;
mod render;
mod schedule;
mod wordle;
mod words;

#[cfg(test)]
mod game_test;
#[cfg(test)]
mod progress_test;
#[cfg(test)]
mod render_test;
#[cfg(test)]
mod wordle_test;

/// Which game to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Gift,
    Endless,
    Duel,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gift" => Ok(Variant::Gift),
            "endless" => Ok(Variant::Endless),
            "duel" => Ok(Variant::Duel),
            other => Err(format!("unknown mode {}, expected gift, endless or duel", other)),
        }
    }
}

#[derive(FromArgs)]
/// A word guessing game with a gift at the end.
struct Args {
    /// file containing valid words, one per line
    #[argh(option, short = 'w', default = "String::from(\"valid-wordle-words.txt\")")]
    words: String,

    /// directory where progress is saved; progress is kept in memory if unset
    #[argh(option, short = 's')]
    save_dir: Option<String>,

    /// game to play: gift, endless or duel
    #[argh(option, short = 'm', default = "Variant::Gift")]
    mode: Variant,

    /// comma separated target words for gift mode
    #[argh(option, short = 't')]
    targets: Option<String>,

    /// phrase spelled by the letters of the target words
    #[argh(option, short = 'p')]
    phrase: Option<String>,

    /// show the target word and allow skipping ahead
    #[argh(switch, short = 'd')]
    debug: bool,

    /// print three-word combinations from the word list that spell this phrase, then exit
    #[argh(option)]
    find: Option<String>,
}

// parse_targets reads a comma separated list of target words.
fn parse_targets(list: &str) -> anyhow::Result<Vec<Word>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Word>()
                .with_context(|| format!("Invalid target word {:?}", s))
        })
        .collect()
}

fn find(phrase: &str, words: &WordList) {
    let search = finder::find_combinations(phrase, words.words());
    println!(
        "{} candidate words, {} combinations for {}",
        search.candidates.len(),
        search.results.len(),
        search.phrase
    );

    let perfect: Vec<_> = search.perfect().collect();
    if perfect.is_empty() {
        let Some(best) = search.best() else {
            println!("No combinations found.");
            return;
        };
        println!(
            "No perfect matches, best coverage is {:.1}%. Top 10:",
            best.coverage
        );
        for (i, combination) in search.results.iter().take(10).enumerate() {
            println!("{:2}. {}", i + 1, combination);
        }
    } else {
        println!("Perfect matches:");
        for (i, combination) in perfect.iter().enumerate() {
            println!("{:3}. {}", i + 1, combination);
        }
    }
}

// game_config builds the single-player settings. Target words and the phrase only mean
// something in gift mode.
fn game_config(args: &Args) -> anyhow::Result<GameConfig> {
    if args.mode != Variant::Gift && (args.targets.is_some() || args.phrase.is_some()) {
        bail!("--targets and --phrase only apply to gift mode");
    }

    let mut config = match args.mode {
        Variant::Endless => GameConfig::endless(),
        Variant::Gift | Variant::Duel => GameConfig::default(),
    };
    config.debug = args.debug;
    if let Some(targets) = &args.targets {
        let targets = parse_targets(targets)?;
        if targets.is_empty() {
            bail!("--targets needs at least one word");
        }
        config.mode = TargetMode::Fixed(targets);
    }
    if let Some(phrase) = &args.phrase {
        config.phrase = phrase.clone();
    }
    Ok(config)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut words = WordList::load(&args.words);

    if let Some(phrase) = &args.find {
        find(phrase, &words);
        return Ok(());
    }

    let config = game_config(&args)?;

    // Target words are always valid guesses.
    if let Some(targets) = config.targets() {
        words.extend(targets.iter().copied());
    }
    let words = Arc::new(words);

    let mode = match args.mode {
        Variant::Duel => Mode::Duel(Duel::new(words)),
        _ => {
            let progress = match &args.save_dir {
                Some(dir) => Progress::open(
                    FileStorage::new(dir)
                        .with_context(|| format!("Error opening save directory {}", dir))?,
                ),
                None => Progress::in_memory(),
            };
            Mode::Single(Game::new(config, words, progress))
        }
    };

    info!("Starting {:?} game...", args.mode);
    App::new(mode).run().await
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args: Args = argh::from_env();

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
