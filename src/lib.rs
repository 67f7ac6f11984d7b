//! # Chord Detection
//! *chord_detection* turns buffers of microphone samples into musical symbols
//! with classical signal processing only: a single note's frequency for
//! tuning, and the chord outlined by notes strummed together or plucked one
//! after another.
//!
//! # Components
//!   * [transform]: in-place radix-2 FFT, Hann window and magnitude spectrum.
//!   * [detector::yin]: monophonic fundamental frequency estimation (YIN).
//!   * [chroma]: pitch-class energy profile of a magnitude spectrum.
//!   * [chord]: interval-based chord formula matching.
//!   * [pipeline]: buffer → chromagram → chord, for strummed chords.
//!   * [arpeggio]: sliding-window chord recognition for plucked notes.
//!   * [hint]: boundary to an optional external pitch estimator.
//!
//! Absence of a result (silence, noise, too few notes) is reported as a
//! value, never as an error. Only malformed buffers handed to the transform
//! produce a [TransformError](transform::TransformError).
//!
//! # Examples
//! ```
//! use chord_detection::detector::yin::YINDetector;
//! use chord_detection::detector::PitchDetector;
//! use chord_detection::note::nearest_note;
//!
//! fn main() {
//!     const SAMPLE_RATE: usize = 44100;
//!     const SIZE: usize = 4096;
//!
//!     // Signal coming from some source (microphone, generated, etc...)
//!     let dt = 1.0 / SAMPLE_RATE as f64;
//!     let freq = 220.0;
//!     let signal: Vec<f64> = (0..SIZE)
//!         .map(|x| 0.5 * (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin())
//!         .collect();
//!
//!     let mut detector = YINDetector::new(SIZE);
//!
//!     let pitch = detector.get_pitch(&signal, SAMPLE_RATE, None).unwrap();
//!     let note = nearest_note(pitch.frequency).unwrap();
//!
//!     println!("Frequency: {}, Note: {} ({:+.1} cents)", pitch.frequency, note.name(), note.cents);
//! }
//! ```

pub use detector::internals::Pitch;

pub mod arpeggio;
pub mod chord;
pub mod chroma;
pub mod detector;
pub mod float;
pub mod hint;
pub mod note;
pub mod pipeline;
pub mod transform;
pub mod utils;
