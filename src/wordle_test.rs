use pretty_assertions::assert_eq;

use crate::wordle::*;

fn word(s: &str) -> Word {
    s.parse().unwrap()
}

#[test]
fn it_works() {
    let result = evaluate(&word("bolle"), &word("hello"));

    assert_eq!(result[0], Letter::Absent('B'));
    assert_eq!(result[1], Letter::Present('O'));
    assert_eq!(result[2], Letter::Correct('L'));
    assert_eq!(result[3], Letter::Correct('L'));
    assert_eq!(result[4], Letter::Present('E'));
}

#[test]
fn exact_guess_is_all_correct() {
    let result = evaluate(&word("EARTH"), &word("EARTH"));

    assert!(result.iter().all(|l| l.mark() == Mark::Correct));
    assert!(is_solved(&result));
}

#[test]
fn duplicate_guess_letter_only_claims_target_count() {
    // LILAC has two Ls, but CIVIL has just one, in a position LILAC doesn't use.
    let result = evaluate(&word("CIVIL"), &word("LILAC"));

    assert_eq!(
        result,
        [
            Letter::Present('C'),
            Letter::Correct('I'),
            Letter::Absent('V'),
            Letter::Absent('I'),
            Letter::Present('L'),
        ]
    );
    let ls = result
        .iter()
        .filter(|l| l.char() == 'L' && l.mark() != Mark::Absent)
        .count();
    assert_eq!(ls, 1);
}

#[test]
fn exact_match_is_claimed_before_presence() {
    // The last E is exact, which leaves a single E for the first two.
    let result = evaluate(&word("EERIE"), &word("THREE"));

    assert_eq!(
        result,
        [
            Letter::Present('E'),
            Letter::Absent('E'),
            Letter::Correct('R'),
            Letter::Absent('I'),
            Letter::Correct('E'),
        ]
    );
}

#[test]
fn excess_letters_are_absent() {
    let result = evaluate(&word("TEETH"), &word("EARTH"));

    assert_eq!(
        result,
        [
            Letter::Absent('T'),
            Letter::Present('E'),
            Letter::Absent('E'),
            Letter::Correct('T'),
            Letter::Correct('H'),
        ]
    );
}

#[test]
fn evaluation_is_pure() {
    let guess = word("LLAMA");
    let target = word("LILAC");
    assert_eq!(evaluate(&guess, &target), evaluate(&guess, &target));
}

#[test]
fn present_never_exceeds_unclaimed_target_count() {
    let words = [
        "EARTH", "LILAC", "TEETH", "CIVIL", "LLAMA", "EERIE", "THREE", "ALLEE", "SASSY", "ABBEY",
    ];
    for g in words {
        for t in words {
            let (guess, target) = (word(g), word(t));
            let result = evaluate(&guess, &target);

            for (i, letter) in result.iter().enumerate() {
                assert_eq!(
                    letter.mark() == Mark::Correct,
                    guess.letters()[i] == target.letters()[i],
                    "{} vs {} at {}",
                    g,
                    t,
                    i
                );
            }

            for c in guess.letters() {
                let in_target = target.letters().iter().filter(|&&x| x == c).count();
                let correct = result
                    .iter()
                    .filter(|l| l.char() == c && l.mark() == Mark::Correct)
                    .count();
                let present = result
                    .iter()
                    .filter(|l| l.char() == c && l.mark() == Mark::Present)
                    .count();
                assert!(present <= in_target - correct, "{} vs {}", g, t);
            }
        }
    }
}

#[test]
fn parses_and_normalizes_words() {
    assert_eq!(word(" earth\n").to_string(), "EARTH");
    assert_eq!("ear".parse::<Word>(), Err(WordError::Length(3)));
    assert_eq!("ear1h".parse::<Word>(), Err(WordError::Character('1')));
    assert_eq!(word("lilac").letters(), ['L', 'I', 'L', 'A', 'C']);
}

#[test]
fn word_serializes_as_string() {
    let json = serde_json::to_string(&word("teeth")).unwrap();
    assert_eq!(json, "\"TEETH\"");
    assert_eq!(serde_json::from_str::<Word>(&json).unwrap(), word("TEETH"));
    assert!(serde_json::from_str::<Word>("\"TOOLONG\"").is_err());
}
