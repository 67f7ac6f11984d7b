use crate::detector::internals::Pitch;
use crate::float::Float;

pub mod internals;
pub mod yin;

/// A monophonic pitch detector.
///
/// `previous_frequency` is the estimate from the preceding frame, if any. The
/// caller threads it from frame to frame; detectors keep no memory of it.
pub trait PitchDetector<T>
where
    T: Float,
{
    fn get_pitch(
        &mut self,
        signal: &[T],
        sample_rate: usize,
        previous_frequency: Option<T>,
    ) -> Option<Pitch<T>>;
}
