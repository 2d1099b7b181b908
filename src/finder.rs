/// Finder searches the word list for three words whose letters spell a phrase. This is how the
/// gift words are picked for a new phrase; it's not part of the game itself.
use std::collections::BTreeMap;

use log::*;

use crate::wordle::{Word, WORD_LEN};

type LetterCounts = BTreeMap<char, usize>;

fn count_letters(letters: impl IntoIterator<Item = char>) -> LetterCounts {
    letters.into_iter().fold(LetterCounts::new(), |mut acc, c| {
        *acc.entry(c).or_insert(0) += 1;
        acc
    })
}

/// A triple of words and how much of the phrase they cover.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub words: [Word; 3],
    /// Percentage of the phrase's letters covered, 0 to 100.
    pub coverage: f32,
    /// Phrase letters the triple doesn't supply, with counts.
    pub missing: LetterCounts,
}

impl Combination {
    pub fn is_perfect(&self) -> bool {
        self.missing.is_empty()
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} - {:.1}% coverage",
            self.words[0], self.words[1], self.words[2], self.coverage
        )?;
        if !self.missing.is_empty() {
            let missing: Vec<String> = self
                .missing
                .iter()
                .map(|(c, n)| format!("{}x{}", c, n))
                .collect();
            write!(f, " (missing {})", missing.join(" "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Search {
    /// Normalized phrase: uppercase, no spaces.
    pub phrase: String,
    /// Words whose letters all fit in the phrase.
    pub candidates: Vec<Word>,
    /// Every triple of candidates, best coverage first.
    pub results: Vec<Combination>,
}

impl Search {
    /// Triples that spell the phrase exactly.
    pub fn perfect(&self) -> impl Iterator<Item = &Combination> {
        self.results.iter().filter(|c| c.is_perfect())
    }

    pub fn best(&self) -> Option<&Combination> {
        self.results.first()
    }
}

/// Number of letters of `word` available in `target`, counting repeats.
fn matching_letters(word: &Word, target: &LetterCounts) -> usize {
    count_letters(word.letters())
        .iter()
        .map(|(c, n)| (*n).min(target.get(c).copied().unwrap_or(0)))
        .sum()
}

fn coverage(words: &[Word; 3], target: &LetterCounts) -> (f32, LetterCounts) {
    let used = count_letters(words.iter().flat_map(|w| w.letters()));
    let missing: LetterCounts = target
        .iter()
        .filter_map(|(c, n)| {
            let left = n.saturating_sub(used.get(c).copied().unwrap_or(0));
            (left > 0).then_some((*c, left))
        })
        .collect();

    let needed: usize = target.values().sum();
    let remaining: usize = missing.values().sum();
    let coverage = if needed == 0 {
        0.0
    } else {
        (needed - remaining) as f32 / needed as f32 * 100.0
    };
    (coverage, missing)
}

/// find_combinations scores every unordered triple of distinct candidate words against
/// `phrase`. A candidate is a word whose five letters can all be taken from the phrase.
pub fn find_combinations(phrase: &str, words: &[Word]) -> Search {
    let phrase: String = phrase
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let target = count_letters(phrase.chars());

    let mut candidates: Vec<Word> = words
        .iter()
        .filter(|w| matching_letters(w, &target) == WORD_LEN)
        .copied()
        .collect();
    candidates.sort();
    candidates.dedup();
    info!(
        "{} of {} words fit in {}",
        candidates.len(),
        words.len(),
        phrase
    );

    let mut results = Vec::new();
    for i in 0..candidates.len() {
        for j in i + 1..candidates.len() {
            for k in j + 1..candidates.len() {
                let triple = [candidates[i], candidates[j], candidates[k]];
                let (coverage, missing) = coverage(&triple, &target);
                results.push(Combination {
                    words: triple,
                    coverage,
                    missing,
                });
            }
        }
    }
    debug!("Scored {} combinations", results.len());

    // Stable, so equal coverage keeps alphabetical order.
    results.sort_by(|a, b| b.coverage.total_cmp(&a.coverage));

    Search {
        phrase,
        candidates,
        results,
    }
}
