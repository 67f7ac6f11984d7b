//! Radix-2 Cooley–Tukey FFT over split real/imaginary buffers.
//!
//! Let $x=(x_0,\ldots,x_{N-1})$ with $N=2^m$. The forward transform computes
//! $$ X_k = \sum_{n=0}^{N-1} x_n e^{-2\pi i k n / N} $$
//! in place: the input is permuted into bit-reversed order and then combined
//! by $m$ stages of butterflies. The inverse uses the identity
//! $x = \overline{\mathrm{FFT}(\overline{X})} / N$, so only one butterfly
//! kernel exists.

use super::{TransformError, TransformResult};
use crate::float::{from_len, lit, Float};

/// A reusable transform plan for one power-of-two length.
#[derive(Debug, Clone)]
pub struct Radix2Fft<T>
where
    T: Float,
{
    len: usize,
    /// `(cos, sin)` of `-2πk/len` for `k` in `0..len/2`.
    twiddles: Vec<(T, T)>,
    bit_reverse: Vec<usize>,
}

impl<T> Radix2Fft<T>
where
    T: Float,
{
    /// Build a plan for buffers of length `len`. Fails if `len` is not a power of two.
    pub fn new(len: usize) -> TransformResult<Self> {
        if !len.is_power_of_two() {
            return Err(TransformError::NotPowerOfTwo { len });
        }
        Ok(Self::build(len))
    }

    /// Build a plan for the smallest power of two that holds `min_len` points.
    pub(crate) fn with_min_len(min_len: usize) -> Self {
        Self::build(min_len.max(1).next_power_of_two())
    }

    fn build(len: usize) -> Self {
        let bits = len.trailing_zeros();
        let bit_reverse = (0..len)
            .map(|i| match bits {
                0 => 0,
                _ => i.reverse_bits() >> (usize::BITS - bits),
            })
            .collect();

        let twiddles = (0..len / 2)
            .map(|k| {
                let angle = -2.0 * std::f64::consts::PI * k as f64 / len as f64;
                let (sin, cos) = angle.sin_cos();
                (lit(cos), lit(sin))
            })
            .collect();

        Radix2Fft {
            len,
            twiddles,
            bit_reverse,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Forward transform of `(real, imag)` in place.
    pub fn forward(&self, real: &mut [T], imag: &mut [T]) -> TransformResult<()> {
        self.check(real, imag)?;
        self.process(real, imag);
        Ok(())
    }

    /// Inverse transform of `(real, imag)` in place, normalized by `1/N`.
    pub fn inverse(&self, real: &mut [T], imag: &mut [T]) -> TransformResult<()> {
        self.check(real, imag)?;
        self.process_inverse(real, imag);
        Ok(())
    }

    fn check(&self, real: &[T], imag: &[T]) -> TransformResult<()> {
        if real.len() != imag.len() {
            return Err(TransformError::LengthMismatch {
                real: real.len(),
                imag: imag.len(),
            });
        }
        if real.len() != self.len {
            return Err(TransformError::PlanMismatch {
                expected: self.len,
                got: real.len(),
            });
        }
        Ok(())
    }

    /// The butterfly kernel. Callers inside the crate guarantee both buffers
    /// have exactly `self.len` points.
    pub(crate) fn process(&self, real: &mut [T], imag: &mut [T]) {
        debug_assert_eq!(real.len(), self.len);
        debug_assert_eq!(imag.len(), self.len);
        let n = self.len;

        for (i, &j) in self.bit_reverse.iter().enumerate() {
            if j > i {
                real.swap(i, j);
                imag.swap(i, j);
            }
        }

        let mut size = 2;
        while size <= n {
            let half = size / 2;
            let stride = n / size;
            for start in (0..n).step_by(size) {
                for k in 0..half {
                    let (wr, wi) = self.twiddles[k * stride];
                    let a = start + k;
                    let b = a + half;
                    let tr = real[b] * wr - imag[b] * wi;
                    let ti = real[b] * wi + imag[b] * wr;
                    real[b] = real[a] - tr;
                    imag[b] = imag[a] - ti;
                    real[a] = real[a] + tr;
                    imag[a] = imag[a] + ti;
                }
            }
            size *= 2;
        }
    }

    pub(crate) fn process_inverse(&self, real: &mut [T], imag: &mut [T]) {
        imag.iter_mut().for_each(|v| *v = -*v);
        self.process(real, imag);

        let scale = T::one() / from_len(self.len);
        real.iter_mut().for_each(|v| *v = *v * scale);
        imag.iter_mut().for_each(|v| *v = -*v * scale);
    }
}

/// One-shot forward transform. Both buffers must share a power-of-two length.
pub fn forward_transform<T: Float>(real: &mut [T], imag: &mut [T]) -> TransformResult<()> {
    one_shot_plan(real, imag)?.forward(real, imag)
}

/// One-shot inverse transform. Both buffers must share a power-of-two length.
pub fn inverse_transform<T: Float>(real: &mut [T], imag: &mut [T]) -> TransformResult<()> {
    one_shot_plan(real, imag)?.inverse(real, imag)
}

fn one_shot_plan<T: Float>(real: &[T], imag: &[T]) -> TransformResult<Radix2Fft<T>> {
    if real.len() != imag.len() {
        return Err(TransformError::LengthMismatch {
            real: real.len(),
            imag: imag.len(),
        });
    }
    Radix2Fft::new(real.len())
}
