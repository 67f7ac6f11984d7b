//! # Chroma Extractor
//! Folds a magnitude spectrum onto the twelve pitch classes. Each bin whose
//! centre frequency lies in the configured band adds its energy (squared
//! magnitude) to the class nearest its frequency; the twelve sums are then
//! normalized to add up to one.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::float::Float;
use crate::note::{PitchClass, PITCH_CLASS_COUNT};

/// Band of the spectrum folded into the chromagram. The default covers the
/// low and middle register and leaves out most upper overtones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaConfig {
    pub min_frequency: f64,
    pub max_frequency: f64,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        ChromaConfig {
            min_frequency: 130.0,
            max_frequency: 1050.0,
        }
    }
}

/// Energy per pitch class. Sums to one, or is all zero when there was no
/// energy in the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chromagram<T>
where
    T: Float,
{
    pub bins: [T; PITCH_CLASS_COUNT],
}

impl<T: Float> Chromagram<T> {
    pub fn zero() -> Self {
        Chromagram {
            bins: [T::zero(); PITCH_CLASS_COUNT],
        }
    }

    pub fn total(&self) -> T {
        self.bins.iter().copied().sum()
    }

    /// The strongest pitch class and its energy. Ties go to the lower class.
    pub fn max(&self) -> (PitchClass, T) {
        self.iter()
            .fold((PitchClass::new(0), T::zero()), |best, (pc, energy)| {
                match energy > best.1 {
                    true => (pc, energy),
                    false => best,
                }
            })
    }

    pub fn is_silent(&self) -> bool {
        self.bins.iter().all(|&b| b <= T::zero())
    }

    pub fn iter(&self) -> impl Iterator<Item = (PitchClass, T)> + '_ {
        self.bins
            .iter()
            .enumerate()
            .map(|(i, &energy)| (PitchClass::new(i as i32), energy))
    }

    /// Scale the bins to sum to one. A silent chromagram stays all zero.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total > T::zero() {
            self.bins.iter_mut().for_each(|b| *b = *b / total);
        }
    }
}

impl<T: Float> Default for Chromagram<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Float> Index<PitchClass> for Chromagram<T> {
    type Output = T;

    fn index(&self, pc: PitchClass) -> &T {
        &self.bins[pc.index()]
    }
}

impl<T: Float> IndexMut<PitchClass> for Chromagram<T> {
    fn index_mut(&mut self, pc: PitchClass) -> &mut T {
        &mut self.bins[pc.index()]
    }
}

/// Build a [Chromagram] from the positive-frequency `magnitudes` of a
/// `transform_size`-point transform sampled at `sample_rate`.
pub fn chromagram<T: Float>(
    magnitudes: &[T],
    sample_rate: usize,
    transform_size: usize,
    config: &ChromaConfig,
) -> Chromagram<T> {
    let mut chroma = Chromagram::zero();
    if transform_size == 0 {
        return chroma;
    }
    let bin_width = sample_rate as f64 / transform_size as f64;

    for (k, &magnitude) in magnitudes.iter().enumerate().skip(1) {
        let frequency = k as f64 * bin_width;
        if frequency < config.min_frequency || frequency > config.max_frequency {
            continue;
        }
        if let Some(pc) = PitchClass::from_frequency(frequency) {
            chroma[pc] = chroma[pc] + magnitude * magnitude;
        }
    }

    chroma.normalize();
    chroma
}
