//! # Polyphonic Chord Pipeline
//! Turns one raw audio buffer into a chord guess:
//! window → FFT → magnitude spectrum → chromagram → active pitch classes →
//! [match_pitch_classes].
//!
//! The pipeline owns its transform plan and scratch buffers, so feeding it a
//! stream of frames does not allocate in the transform path. Run one pipeline
//! per stream; nothing is shared between instances.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::chord::{match_pitch_classes, Detection};
use crate::chroma::{chromagram, ChromaConfig, Chromagram};
use crate::float::{lit, Float};
use crate::note::PitchClass;
use crate::transform::window::{apply_hann_window, write_magnitude_spectrum};
use crate::transform::{Radix2Fft, TransformError, TransformResult};
use crate::utils::buffer::{copy_zero_padded, new_real_buffer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub chroma: ChromaConfig,
    /// A pitch class is active when its energy is at least this fraction of
    /// the strongest bin.
    pub activation_ratio: f64,
    /// Factor applied to the hinted pitch class before thresholding.
    pub hint_boost: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            chroma: ChromaConfig::default(),
            activation_ratio: 0.28,
            hint_boost: 1.15,
        }
    }
}

/// Result of analysing one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordAnalysis<T>
where
    T: Float,
{
    pub detection: Detection,
    /// Share of chromagram energy held by the active pitch classes. Close to
    /// one for a clean spectrum, lower when energy is smeared across classes.
    pub confidence: T,
    /// Active pitch classes in ascending order.
    pub active: Vec<PitchClass>,
    /// The chromagram the decision was made on, renormalized after any hint
    /// boost so it still sums to one.
    pub chromagram: Chromagram<T>,
}

impl<T: Float> ChordAnalysis<T> {
    fn silent() -> Self {
        ChordAnalysis {
            detection: Detection::NoSelection,
            confidence: T::zero(),
            active: Vec::new(),
            chromagram: Chromagram::zero(),
        }
    }
}

pub struct ChordPipeline<T>
where
    T: Float,
{
    fft: Radix2Fft<T>,
    config: PipelineConfig,
    real: Vec<T>,
    imag: Vec<T>,
    magnitudes: Vec<T>,
}

impl<T> ChordPipeline<T>
where
    T: Float,
{
    /// A pipeline for buffers of `size` samples. `size` must be a power of two.
    pub fn new(size: usize) -> TransformResult<Self> {
        Self::with_config(size, PipelineConfig::default())
    }

    pub fn with_config(size: usize, config: PipelineConfig) -> TransformResult<Self> {
        let fft = Radix2Fft::new(size)?;
        Ok(ChordPipeline {
            fft,
            config,
            real: new_real_buffer(size),
            imag: new_real_buffer(size),
            magnitudes: new_real_buffer(size / 2),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.fft.len()
    }

    /// Analyse one buffer. `hint` nudges an externally suggested pitch class
    /// upward before thresholding; pass `None` when no hint is available.
    pub fn analyze(
        &mut self,
        signal: &[T],
        sample_rate: usize,
        hint: Option<PitchClass>,
    ) -> TransformResult<ChordAnalysis<T>> {
        if signal.len() != self.fft.len() {
            return Err(TransformError::PlanMismatch {
                expected: self.fft.len(),
                got: signal.len(),
            });
        }

        copy_zero_padded(signal, &mut self.real);
        apply_hann_window(&mut self.real);
        copy_zero_padded(&[], &mut self.imag);
        self.fft.forward(&mut self.real, &mut self.imag)?;
        write_magnitude_spectrum(&self.real, &self.imag, &mut self.magnitudes);

        let mut chroma = chromagram(
            &self.magnitudes,
            sample_rate,
            self.fft.len(),
            &self.config.chroma,
        );
        if let Some(pc) = hint {
            chroma[pc] = chroma[pc] * lit(self.config.hint_boost);
            chroma.normalize();
        }

        let (_, peak) = chroma.max();
        if peak <= T::zero() {
            return Ok(ChordAnalysis::silent());
        }

        let cutoff = peak * lit(self.config.activation_ratio);
        let active: Vec<PitchClass> = chroma
            .iter()
            .filter(|&(_, energy)| energy >= cutoff)
            .map(|(pc, _)| pc)
            .collect();
        let captured: T = active.iter().map(|&pc| chroma[pc]).sum();
        let confidence = captured / chroma.total();

        let detection = match_pitch_classes(&active);
        debug!(
            "chord pipeline: active {:?}, confidence {}, detection {:?}",
            active, confidence, detection
        );

        Ok(ChordAnalysis {
            detection,
            confidence,
            active,
            chromagram: chroma,
        })
    }
}
