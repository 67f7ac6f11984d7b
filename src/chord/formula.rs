//! The table of chord formulas the matcher knows about.

use serde::Serialize;

/// How a formula ranks when several interpretations of one pitch-class set
/// exist. Variants are listed in matching priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FormulaTier {
    Triad,
    Seventh,
    Extended,
}

/// A named set of semitone offsets from a root. The root, `0`, is always
/// included and offsets are kept in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChordFormula {
    /// Display quality, e.g. `"Minor 7th"`.
    pub quality: &'static str,
    /// Suffix appended to the root name, e.g. `"m7"`.
    pub symbol: &'static str,
    pub intervals: &'static [u8],
    pub tier: FormulaTier,
}

impl ChordFormula {
    /// Bit `i` is set when the formula contains an interval of `i` semitones.
    pub fn interval_mask(&self) -> u16 {
        self.intervals.iter().fold(0, |mask, &i| mask | 1 << i)
    }
}

const fn formula(
    quality: &'static str,
    symbol: &'static str,
    intervals: &'static [u8],
    tier: FormulaTier,
) -> ChordFormula {
    ChordFormula {
        quality,
        symbol,
        intervals,
        tier,
    }
}

/// Every known formula in priority order: triads, then sevenths and sixths,
/// then extended chords.
pub static CHORD_FORMULAS: &[ChordFormula] = &[
    formula("Major", "", &[0, 4, 7], FormulaTier::Triad),
    formula("Minor", "m", &[0, 3, 7], FormulaTier::Triad),
    formula("Diminished", "dim", &[0, 3, 6], FormulaTier::Triad),
    formula("Augmented", "aug", &[0, 4, 8], FormulaTier::Triad),
    formula("Suspended 2nd", "sus2", &[0, 2, 7], FormulaTier::Triad),
    formula("Suspended 4th", "sus4", &[0, 5, 7], FormulaTier::Triad),
    formula("Dominant 7th", "7", &[0, 4, 7, 10], FormulaTier::Seventh),
    formula("Major 7th", "maj7", &[0, 4, 7, 11], FormulaTier::Seventh),
    formula("Minor 7th", "m7", &[0, 3, 7, 10], FormulaTier::Seventh),
    formula("Half-diminished 7th", "m7b5", &[0, 3, 6, 10], FormulaTier::Seventh),
    formula("Diminished 7th", "dim7", &[0, 3, 6, 9], FormulaTier::Seventh),
    formula("Minor major 7th", "mMaj7", &[0, 3, 7, 11], FormulaTier::Seventh),
    formula("Dominant 7th sus4", "7sus4", &[0, 5, 7, 10], FormulaTier::Seventh),
    formula("Augmented 7th", "aug7", &[0, 4, 8, 10], FormulaTier::Seventh),
    formula("Major 6th", "6", &[0, 4, 7, 9], FormulaTier::Seventh),
    formula("Minor 6th", "m6", &[0, 3, 7, 9], FormulaTier::Seventh),
    formula("Added 9th", "add9", &[0, 2, 4, 7], FormulaTier::Extended),
    formula("Minor added 9th", "madd9", &[0, 2, 3, 7], FormulaTier::Extended),
    formula("Dominant 9th", "9", &[0, 2, 4, 7, 10], FormulaTier::Extended),
    formula("Major 9th", "maj9", &[0, 2, 4, 7, 11], FormulaTier::Extended),
    formula("Minor 9th", "m9", &[0, 2, 3, 7, 10], FormulaTier::Extended),
    formula("Six-nine", "6/9", &[0, 2, 4, 7, 9], FormulaTier::Extended),
    formula("Dominant 11th", "11", &[0, 2, 4, 5, 7, 10], FormulaTier::Extended),
    formula("Dominant 13th", "13", &[0, 2, 4, 7, 9, 10], FormulaTier::Extended),
];
