//! # Transform Engine
//! In-place radix-2 discrete Fourier transform over split real/imaginary
//! buffers, plus the Hann window and magnitude spectrum used in front of the
//! chroma and pitch stages.
//!
//! The [Radix2Fft] plan precomputes twiddle factors and the bit-reversal
//! permutation once, so a caller processing a stream of equally sized frames
//! can reuse it without allocating. [forward_transform] and
//! [inverse_transform] are one-shot conveniences which build a plan per call.

use thiserror::Error;

pub mod fft;
pub mod window;

pub use fft::{forward_transform, inverse_transform, Radix2Fft};
pub use window::{apply_hann_window, hann_window, magnitude_spectrum};

/// Invalid arguments handed to the transform. These are programmer errors:
/// the transform never pads or truncates a buffer to make it fit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Buffer length is zero or not a power of two.
    #[error("Invalid argument: buffer length {len} is not a power of two")]
    NotPowerOfTwo { len: usize },

    /// Real and imaginary buffers disagree in length.
    #[error("Invalid argument: real length {real} does not match imaginary length {imag}")]
    LengthMismatch { real: usize, imag: usize },

    /// Buffers do not match the length a plan was built for.
    #[error("Invalid argument: plan expects {expected} points, got {got}")]
    PlanMismatch { expected: usize, got: usize },
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
