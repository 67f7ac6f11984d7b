//! Boundary to an optional external pitch estimator (for example a neural
//! model running on a downsampled copy of recent audio).
//!
//! The estimator is advisory. Whatever it does (fail, time out, return
//! garbage or nothing at all) the DSP pipeline runs the same code path; the
//! only thing that reaches it is an `Option<PitchClass>` from [poll_hint].

use log::debug;

use crate::float::Float;
use crate::note::PitchClass;

/// A frequency estimate from an external source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchHint<T>
where
    T: Float,
{
    pub frequency: T,
    /// Source-reported confidence in `0..=1`.
    pub confidence: T,
}

/// Something that may offer a pitch estimate for a block of samples.
pub trait HintSource<T>
where
    T: Float,
{
    type Error: std::error::Error;

    /// `Ok(None)` means the source has no opinion for this block.
    fn query(&mut self, samples: &[T], sample_rate: usize)
        -> Result<Option<PitchHint<T>>, Self::Error>;
}

/// A source that never has an opinion. Use it when no model is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHint;

impl<T: Float> HintSource<T> for NoHint {
    type Error = std::convert::Infallible;

    fn query(&mut self, _: &[T], _: usize) -> Result<Option<PitchHint<T>>, Self::Error> {
        Ok(None)
    }
}

/// Query `source` and reduce the answer to a pitch class, or `None` when the
/// source fails, has no estimate, reports a malformed value or is less
/// confident than `min_confidence`. Errors are logged and swallowed here.
pub fn poll_hint<T, S>(
    source: &mut S,
    samples: &[T],
    sample_rate: usize,
    min_confidence: T,
) -> Option<PitchClass>
where
    T: Float,
    S: HintSource<T>,
{
    let hint = match source.query(samples, sample_rate) {
        Ok(hint) => hint?,
        Err(err) => {
            debug!("hint source failed: {}", err);
            return None;
        }
    };

    let well_formed = hint.frequency.is_finite()
        && hint.frequency > T::zero()
        && hint.confidence.is_finite()
        && hint.confidence <= T::one();
    if !well_formed {
        debug!(
            "discarding malformed hint: {} Hz at confidence {}",
            hint.frequency, hint.confidence
        );
        return None;
    }
    if hint.confidence < min_confidence {
        return None;
    }

    PitchClass::from_frequency(hint.frequency)
}
