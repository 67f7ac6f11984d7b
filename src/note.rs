//! Pitch classes, note names and equal-temperament helpers for tuner display.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::float::{lit, Float};

/// Reference pitch, A4.
pub const A4_FREQUENCY: f64 = 440.0;

/// C0, nine semitones and four octaves below A4.
pub const C0_FREQUENCY: f64 = 16.351_597_831_287_414;

pub const PITCH_CLASS_COUNT: usize = 12;

const NOTE_NAMES: [&str; PITCH_CLASS_COUNT] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One of the twelve chromatic notes, ignoring octave. `0` is C, `11` is B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Wraps any semitone count (negative included) onto the twelve classes.
    pub fn new(semitone: i32) -> Self {
        PitchClass(semitone.rem_euclid(PITCH_CLASS_COUNT as i32) as u8)
    }

    /// Nearest pitch class of `frequency`, i.e. `round(12·log2(f / C0)) mod 12`.
    /// `None` for non-positive or non-finite input.
    pub fn from_frequency<T: Float>(frequency: T) -> Option<Self> {
        let frequency = frequency.to_f64().filter(|f| f.is_finite() && *f > 0.0)?;
        let semitones = (12.0 * (frequency / C0_FREQUENCY).log2()).round();
        Some(PitchClass::new(semitones as i32))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.index()]
    }

    /// Semitones from `self` up to `other`, in `0..12`.
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 + PITCH_CLASS_COUNT as u8 - self.0) % PITCH_CLASS_COUNT as u8
    }

    /// The class `semitones` above `self`.
    pub fn transpose(self, semitones: i32) -> Self {
        PitchClass::new(self.0 as i32 + semitones)
    }

    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..PITCH_CLASS_COUNT as i32).map(PitchClass::new)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Nearest equal-tempered note to a measured frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEstimate<T>
where
    T: Float,
{
    pub pitch_class: PitchClass,
    /// Octave in scientific pitch notation (A4 = 440 Hz).
    pub octave: i32,
    pub target_frequency: T,
    /// Deviation of the measurement from `target_frequency`; positive is sharp.
    pub cents: T,
}

impl<T: Float> NoteEstimate<T> {
    /// Scientific pitch name, e.g. `"A4"` or `"C#3"`.
    pub fn name(&self) -> String {
        format!("{}{}", self.pitch_class, self.octave)
    }
}

/// Finds the equal-tempered note closest to `frequency`.
pub fn nearest_note<T: Float>(frequency: T) -> Option<NoteEstimate<T>> {
    let measured = frequency.to_f64().filter(|f| f.is_finite() && *f > 0.0)?;
    let midi = (69.0 + 12.0 * (measured / A4_FREQUENCY).log2()).round() as i32;
    let target = A4_FREQUENCY * 2f64.powf((midi - 69) as f64 / 12.0);

    Some(NoteEstimate {
        pitch_class: PitchClass::new(midi),
        octave: midi.div_euclid(12) - 1,
        target_frequency: lit(target),
        cents: lit(cents_between(measured, target)),
    })
}

/// Deviation of `frequency` from `target` in cents (100 per semitone, 1200 per octave).
pub fn cents_between<T: Float>(frequency: T, target: T) -> T {
    lit::<T>(1200.0) * (frequency / target).log2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wraps_semitones() {
        assert_eq!(PitchClass::new(12), PitchClass::new(0));
        assert_eq!(PitchClass::new(-1).name(), "B");
        assert_eq!(PitchClass::new(9).transpose(3).name(), "C");
        assert_eq!(PitchClass::new(9).interval_to(PitchClass::new(4)), 7);
        assert_eq!(PitchClass::all().count(), 12);
    }

    #[test]
    fn classes_of_reference_frequencies() {
        assert_eq!(PitchClass::from_frequency(440.0f64), Some(PitchClass::new(9)));
        assert_eq!(PitchClass::from_frequency(261.63f32), Some(PitchClass::new(0)));
        assert_eq!(PitchClass::from_frequency(196.0f64).map(|p| p.name()), Some("G"));
        assert_eq!(PitchClass::from_frequency(0.0f64), None);
        assert_eq!(PitchClass::from_frequency(f64::NAN), None);
    }

    #[test]
    fn nearest_note_reports_cents() {
        let note = nearest_note(446.0f64).unwrap();
        assert_eq!(note.name(), "A4");
        assert_abs_diff_eq!(note.target_frequency, 440.0, epsilon = 1e-9);
        assert_abs_diff_eq!(note.cents, 23.45, epsilon = 0.01);

        let low = nearest_note(65.41f64).unwrap();
        assert_eq!(low.name(), "C2");
        assert!(nearest_note(-3.0f64).is_none());
    }

    #[test]
    fn cents_of_octave_and_semitone() {
        assert_abs_diff_eq!(cents_between(880.0f64, 440.0), 1200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            cents_between(440.0f64 * 2f64.powf(1.0 / 12.0), 440.0),
            100.0,
            epsilon = 1e-9
        );
    }
}
