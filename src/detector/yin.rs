//! The YIN pitch detection algorithm is based on the algorithm from the paper
//! *[YIN, a fundamental frequency estimator for speech and music](http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf)*.
//!
//! Let $S=(s_0,s_1,\ldots,s_N)$ be a discrete signal and $w = N/2$. The *square difference function*
//! at lag $t$ is defined by
//! $$ d(t) = \sum_{i=0}^{w-1} (s_i-s_{i+t})^2. $$
//! This function is close to zero when the signal "lines up" with itself, but its scale depends on
//! volume. YIN therefore computes the *cumulative mean normalized difference function*,
//! $$ d\'(t) = \begin{cases}1&\text{if }t=0\\\\ d(t) / \left[ \tfrac{1}{t}\sum_{i=1}^t d(i) \right] & \text{otherwise}\end{cases}, $$
//! and searches for the first dip of $d\'(t)$ below a threshold.
//!
//! ## Implementation
//! $d(t)$ is computed through an [FFT](crate::transform) cross correlation and a prefix sum of
//! squares, so a frame costs $O(N \log N)$ rather than $O(N \cdot t_{max})$. On top of the
//! paper's steps the detector
//!   * gates silence by RMS amplitude,
//!   * restricts lags to a configured frequency range,
//!   * searches first near the previous frame's frequency, which keeps a sustained note from
//!     jumping octaves between frames,
//!   * rejects frames whose best dip is still too shallow (attack transients, noise),
//!   * re-checks the raw $d(t)$ within a couple of samples of the chosen lag (the *best local
//!     estimate*) before quadratic interpolation.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::detector::internals::Pitch;
use crate::detector::PitchDetector;
use crate::float::{lit, Float};
use crate::utils::buffer::rms;
use crate::utils::peak::{first_dip_below, global_minimum, parabolic_offset, refine_local_minimum};

use super::internals::{windowed_square_error, yin_normalize_square_error, DetectorInternals};

/// Tunable parameters of [YINDetector]. The defaults are empirical and worth
/// re-tuning per microphone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YinConfig {
    /// CMND value a dip must fall below to be accepted on first crossing.
    pub threshold: f64,
    /// Frames whose chosen CMND value exceeds this are rejected as aperiodic.
    pub reject_threshold: f64,
    /// RMS amplitude below which a frame counts as silence.
    pub silence_rms: f64,
    pub min_frequency: f64,
    pub max_frequency: f64,
    /// Half-width, in semitones, of the band searched around the previous frequency.
    pub continuity_semitones: f64,
    /// Radius, in samples, of the best local estimate search.
    pub local_search_radius: usize,
}

impl Default for YinConfig {
    fn default() -> Self {
        YinConfig {
            threshold: 0.15,
            reject_threshold: 0.30,
            silence_rms: 0.01,
            min_frequency: 65.0,
            max_frequency: 1100.0,
            continuity_semitones: 2.0,
            local_search_radius: 2,
        }
    }
}

pub struct YINDetector<T>
where
    T: Float,
{
    internals: DetectorInternals<T>,
    config: YinConfig,
}

impl<T> YINDetector<T>
where
    T: Float,
{
    pub fn new(size: usize) -> Self {
        Self::with_config(size, YinConfig::default())
    }

    pub fn with_config(size: usize, config: YinConfig) -> Self {
        let internals = DetectorInternals::<T>::new(size);
        YINDetector { internals, config }
    }

    pub fn config(&self) -> &YinConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.internals.size
    }

    /// Inclusive range of integer lags worth searching, or `None` if the buffer
    /// is too short for the configured frequency range.
    fn lag_range(&self, sample_rate: f64) -> Option<(usize, usize)> {
        let min_lag = ((sample_rate / self.config.max_frequency).floor() as usize).max(2);
        let max_lag = ((sample_rate / self.config.min_frequency).ceil() as usize)
            .min(self.internals.window_size.saturating_sub(2));
        match min_lag < max_lag {
            true => Some((min_lag, max_lag)),
            false => None,
        }
    }

    /// Lags within `continuity_semitones` of `previous`, clamped to `min_lag..=max_lag`.
    fn continuity_band(
        &self,
        previous: T,
        sample_rate: f64,
        min_lag: usize,
        max_lag: usize,
    ) -> Option<(usize, usize)> {
        let previous = previous.to_f64().filter(|f| f.is_finite() && *f > 0.0)?;
        let ratio = 2f64.powf(self.config.continuity_semitones / 12.0);
        let lo = ((sample_rate / (previous * ratio)).floor() as usize).max(min_lag);
        let hi = ((sample_rate * ratio / previous).ceil() as usize).min(max_lag);
        match lo <= hi {
            true => Some((lo, hi)),
            false => None,
        }
    }
}

/// Pitch detection based on the YIN algorithm. See <http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf>
impl<T> PitchDetector<T> for YINDetector<T>
where
    T: Float,
{
    fn get_pitch(
        &mut self,
        signal: &[T],
        sample_rate: usize,
        previous_frequency: Option<T>,
    ) -> Option<Pitch<T>> {
        assert_eq!(signal.len(), self.internals.size);
        let window_size = self.internals.window_size;
        let rate = sample_rate as f64;

        // STEP 1: Silence gate.
        if rms(signal) < lit(self.config.silence_rms) {
            trace!("yin: frame below silence floor");
            return None;
        }

        let (min_lag, max_lag) = match self.lag_range(rate) {
            Some(range) => range,
            None => {
                trace!("yin: empty lag range for {} samples at {} Hz", signal.len(), sample_rate);
                return None;
            }
        };

        // STEP 2: Calculate the difference function, d_t.
        let mut sdf_ref = self.internals.buffers.get_buffer();
        let sdf = &mut sdf_ref[..window_size];
        windowed_square_error(
            signal,
            window_size,
            &self.internals.fft,
            &self.internals.buffers,
            sdf,
        );

        // STEP 3: Calculate the cumulative mean normalized difference function, d_t'.
        let mut cmnd_ref = self.internals.buffers.get_buffer();
        let cmnd = &mut cmnd_ref[..window_size];
        cmnd.copy_from_slice(sdf);
        yin_normalize_square_error(cmnd);
        let (sdf, cmnd): (&[T], &[T]) = (sdf, cmnd);

        // STEP 4: The absolute threshold, searched near the previous pitch first.
        // With no dip below the threshold, fall back to the deepest dip and let
        // the confidence gate decide.
        let threshold = lit(self.config.threshold);
        let lag = previous_frequency
            .and_then(|previous| self.continuity_band(previous, rate, min_lag, max_lag))
            .and_then(|(lo, hi)| first_dip_below(cmnd, lo, hi, threshold))
            .or_else(|| first_dip_below(cmnd, min_lag, max_lag, threshold))
            .or_else(|| global_minimum(cmnd, min_lag, max_lag))?;

        let confidence = cmnd[lag];
        if confidence > lit(self.config.reject_threshold) {
            trace!("yin: rejecting aperiodic frame, cmnd {} at lag {}", confidence, lag);
            return None;
        }

        // STEP 5: Best local estimate on the raw difference function, then
        // quadratic interpolation for sub-sample precision.
        let lag = refine_local_minimum(
            sdf,
            lag,
            self.config.local_search_radius,
            1,
            window_size.saturating_sub(2),
        );
        let period = parabolic_offset(sdf, lag);
        if period <= T::zero() {
            return None;
        }

        let frequency = lit::<T>(rate) / period;
        if frequency < lit(self.config.min_frequency) || frequency > lit(self.config.max_frequency) {
            trace!("yin: {} Hz outside supported range", frequency);
            return None;
        }

        Some(Pitch {
            frequency,
            confidence,
        })
    }
}
