//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::Float as NumFloat;
use rustfft::FftNum;
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
// `abs` is ambiguous on a generic `T` (both `num_traits::Float` and `Signed`
// provide it); compare against zero instead.
pub trait Float: Display + Debug + NumFloat + FftNum + Sum {}

impl Float for f64 {}
impl Float for f32 {}

/// Convert an `f64` constant into `T`.
pub(crate) fn lit<T: Float>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// Convert a length or index into `T`.
pub(crate) fn from_len<T: Float>(value: usize) -> T {
    T::from_usize(value).unwrap_or_else(T::nan)
}
