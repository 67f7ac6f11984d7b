//! Windowing and magnitude utilities applied around the transform.

use crate::float::{from_len, lit, Float};

/// Returns a copy of `signal` tapered by a Hann window.
pub fn hann_window<T: Float>(signal: &[T]) -> Vec<T> {
    let mut output = signal.to_vec();
    apply_hann_window(&mut output);
    output
}

/// Applies a Hann window to `signal` in place to reduce spectral leakage.
pub fn apply_hann_window<T: Float>(signal: &mut [T]) {
    let n = signal.len();
    if n < 2 {
        return;
    }
    let half = lit::<T>(0.5);
    let step = lit::<T>(2.0 * std::f64::consts::PI) / from_len(n - 1);
    signal.iter_mut().enumerate().for_each(|(i, s)| {
        let weight = half * (T::one() - (step * from_len(i)).cos());
        *s = *s * weight;
    });
}

/// Magnitudes `sqrt(re² + im²)` of the first `N/2` bins. The upper half of the
/// spectrum of a real signal mirrors the lower half and is dropped.
pub fn magnitude_spectrum<T: Float>(real: &[T], imag: &[T]) -> Vec<T> {
    let mut output = vec![T::zero(); real.len().min(imag.len()) / 2];
    write_magnitude_spectrum(real, imag, &mut output);
    output
}

/// Writes magnitudes of the leading bins of `(real, imag)` into `output`.
pub(crate) fn write_magnitude_spectrum<T: Float>(real: &[T], imag: &[T], output: &mut [T]) {
    output
        .iter_mut()
        .zip(real.iter().zip(imag.iter()))
        .for_each(|(o, (&re, &im))| *o = (re * re + im * im).sqrt());
}
