//! # Chord Formula Matcher
//! Purely symbolic: given the pitch classes that are sounding, find every
//! known [ChordFormula] they spell, trying each pitch class as the root.
//!
//! ```
//! use chord_detection::chord::{match_pitch_classes, Detection};
//! use chord_detection::note::PitchClass;
//!
//! let notes = [9, 0, 4, 7].map(PitchClass::new);
//! match match_pitch_classes(&notes) {
//!     Detection::Chord(chord) => {
//!         assert_eq!(chord.name, "Am7");
//!         assert_eq!(chord.alternates[0].name, "C6");
//!     }
//!     other => panic!("expected a chord, got {:?}", other),
//! }
//! ```

use serde::Serialize;

use crate::note::PitchClass;

pub mod formula;

pub use formula::{ChordFormula, FormulaTier, CHORD_FORMULAS};

/// One reading of a pitch-class set as a chord.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordResult {
    /// Root name followed by the formula symbol, e.g. `"Am7"`.
    pub name: String,
    pub quality: &'static str,
    pub root: PitchClass,
    /// Chord tones in interval order from the root.
    pub notes: Vec<PitchClass>,
    pub formula: &'static ChordFormula,
    /// Other formulas spelled by the same pitch-class set. Always empty on the
    /// alternates themselves.
    pub alternates: Vec<ChordResult>,
}

impl ChordResult {
    fn new(root: PitchClass, formula: &'static ChordFormula) -> Self {
        ChordResult {
            name: format!("{}{}", root, formula.symbol),
            quality: formula.quality,
            root,
            notes: formula
                .intervals
                .iter()
                .map(|&i| root.transpose(i as i32))
                .collect(),
            formula,
            alternates: Vec::new(),
        }
    }

    /// The primary reading followed by its alternates.
    pub fn interpretations(&self) -> impl Iterator<Item = &ChordResult> {
        std::iter::once(self).chain(self.alternates.iter())
    }
}

/// Outcome of a chord detection. Built fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Detection {
    /// Nothing is sounding.
    NoSelection,
    SingleNote(PitchClass),
    /// Two distinct pitch classes; no chord judgement is attempted.
    Interval {
        first: PitchClass,
        second: PitchClass,
        /// Semitones from `first` up to `second`.
        semitones: u8,
    },
    Chord(ChordResult),
    /// Three or more pitch classes that spell no known formula.
    NoMatch(Vec<PitchClass>),
}

impl Detection {
    pub fn chord(&self) -> Option<&ChordResult> {
        match self {
            Detection::Chord(chord) => Some(chord),
            _ => None,
        }
    }

    pub fn into_chord(self) -> Option<ChordResult> {
        match self {
            Detection::Chord(chord) => Some(chord),
            _ => None,
        }
    }

    pub fn is_chord(&self) -> bool {
        matches!(self, Detection::Chord(_))
    }
}

/// Conventional name of an interval of `semitones` (taken modulo 12).
pub fn interval_name(semitones: u8) -> &'static str {
    const NAMES: [&str; 12] = [
        "Unison",
        "Minor 2nd",
        "Major 2nd",
        "Minor 3rd",
        "Major 3rd",
        "Perfect 4th",
        "Tritone",
        "Perfect 5th",
        "Minor 6th",
        "Major 6th",
        "Minor 7th",
        "Major 7th",
    ];
    NAMES[(semitones % 12) as usize]
}

/// Match a collection of pitch classes (duplicates allowed) against
/// [CHORD_FORMULAS].
///
/// Every distinct pitch class is tried as the root, in order of first
/// appearance, and every formula whose interval set equals the resulting set
/// is recorded. The first match becomes the primary result and the rest are
/// attached as alternates, so `{A, C, E, G}` reads as Am7 with C6 as an
/// alternate.
pub fn match_pitch_classes(pitch_classes: &[PitchClass]) -> Detection {
    let mut distinct: Vec<PitchClass> = Vec::with_capacity(pitch_classes.len());
    for &pc in pitch_classes {
        if !distinct.contains(&pc) {
            distinct.push(pc);
        }
    }

    match distinct.as_slice() {
        [] => return Detection::NoSelection,
        [note] => return Detection::SingleNote(*note),
        [first, second] => {
            return Detection::Interval {
                first: *first,
                second: *second,
                semitones: first.interval_to(*second),
            }
        }
        _ => {}
    }

    let mut matches: Vec<ChordResult> = distinct
        .iter()
        .flat_map(|&root| {
            let mask = distinct
                .iter()
                .fold(0u16, |mask, &pc| mask | 1 << root.interval_to(pc));
            CHORD_FORMULAS
                .iter()
                .filter(move |formula| formula.interval_mask() == mask)
                .map(move |formula| ChordResult::new(root, formula))
        })
        .collect();

    if matches.is_empty() {
        return Detection::NoMatch(distinct);
    }
    let mut primary = matches.remove(0);
    primary.alternates = matches;
    Detection::Chord(primary)
}
