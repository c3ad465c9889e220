//! Arabic text folding for search.
//!
//! Shoppers type the same word many ways (`أحمد`, `احمد`, `إحمد`), so both
//! the query and each candidate field are folded before comparison:
//!
//! - lowercase and trim
//! - every alef form (madda, hamza above/below, wasla, wavy hamza) becomes bare alef
//! - taa marbuta becomes haa
//! - yaa becomes alef maksura
//! - standalone hamza is dropped
//! - whitespace runs collapse to one space

/// Alef forms folded to bare alef (U+0627).
const ALEF_VARIANTS: &[char] = &[
    '\u{0622}', // alef with madda above
    '\u{0623}', // alef with hamza above
    '\u{0625}', // alef with hamza below
    '\u{0627}', // alef
    '\u{0671}', // alef wasla
    '\u{0672}', // alef with wavy hamza above
    '\u{0673}', // alef with wavy hamza below
    '\u{0674}', // high hamza
    '\u{0675}', // high hamza alef
];

const ALEF: char = '\u{0627}';
const TAA_MARBUTA: char = '\u{0629}';
const HAA: char = '\u{0647}';
const YAA: char = '\u{064A}';
const ALEF_MAKSURA: char = '\u{0649}';
const HAMZA: char = '\u{0621}';

/// Fold `input` for comparison.
#[must_use]
pub fn normalize_arabic(input: &str) -> String {
    let folded: String = input
        .to_lowercase()
        .chars()
        .filter(|c| *c != HAMZA)
        .map(|c| match c {
            c if ALEF_VARIANTS.contains(&c) => ALEF,
            TAA_MARBUTA => HAA,
            YAA => ALEF_MAKSURA,
            c => c,
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
