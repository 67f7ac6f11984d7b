use rustfft::num_complex::Complex;

use crate::float::{from_len, Float};
use crate::transform::Radix2Fft;
use crate::utils::buffer::{copy_zero_padded, prefix_square_sum, BufferPool};

/// A detected fundamental frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch<T>
where
    T: Float,
{
    /// Frequency in Hz.
    pub frequency: T,
    /// The cumulative mean normalized difference at the chosen lag. Lower values
    /// mean a more periodic, more trustworthy estimate.
    pub confidence: T,
}

/// Data structure to hold any buffers needed for pitch computation.
/// It's best to allocate buffers once rather than allocate and
/// free buffers repeatedly on every frame, so we use a `BufferPool` object to manage
/// the buffers and keep a transform plan sized for the zero-padded correlation.
pub struct DetectorInternals<T>
where
    T: Float,
{
    pub size: usize,
    pub window_size: usize,
    pub fft: Radix2Fft<T>,
    pub buffers: BufferPool<T>,
}

impl<T> DetectorInternals<T>
where
    T: Float,
{
    pub fn new(size: usize) -> Self {
        let window_size = size / 2;
        // Room for the whole signal plus one window of lags keeps the circular
        // correlation free of wrap-around.
        let fft = Radix2Fft::with_min_len(size + window_size);
        let buffers = BufferPool::new(fft.len());

        DetectorInternals {
            size,
            window_size,
            fft,
            buffers,
        }
    }
}

/// Compute the windowed autocorrelation of `signal` and put the result in `result`.
/// For a signal _x=(x_0,x_1,...)_, the windowed autocorrelation with window size _w_ is
/// the function
///
/// > r(t) = sum_{i=0}^{w-1} x_i*x_{i+t}
///
/// This is the cross correlation of the reference window `signal[..w]` against
/// the whole signal, computed as `IFFT(conj(FFT(ref)) * FFT(signal))`.
/// This function assumes `window_size` is at most half of the length of `signal`.
pub fn windowed_autocorrelation<T>(
    signal: &[T],
    window_size: usize,
    fft: &Radix2Fft<T>,
    buffers: &BufferPool<T>,
    result: &mut [T],
) where
    T: Float,
{
    assert!(
        fft.len() >= signal.len() + window_size,
        "The transform must hold the signal plus one window of lags."
    );
    assert_eq!(buffers.buffer_size, fft.len());

    let (mut ref_re, mut ref_im, mut sig_re, mut sig_im) = (
        buffers.get_buffer(),
        buffers.get_buffer(),
        buffers.get_buffer(),
        buffers.get_buffer(),
    );

    copy_zero_padded(&signal[..window_size], &mut ref_re);
    copy_zero_padded(&[], &mut ref_im);
    copy_zero_padded(signal, &mut sig_re);
    copy_zero_padded(&[], &mut sig_im);

    fft.process(&mut ref_re, &mut ref_im);
    fft.process(&mut sig_re, &mut sig_im);

    ref_re
        .iter()
        .zip(ref_im.iter())
        .zip(sig_re.iter_mut().zip(sig_im.iter_mut()))
        .for_each(|((&ar, &ai), (br, bi))| {
            let product = Complex::new(ar, ai).conj() * Complex::new(*br, *bi);
            *br = product.re;
            *bi = product.im;
        });

    fft.process_inverse(&mut sig_re, &mut sig_im);

    // The result is valid only for `0..window_size`
    let valid = result.len().min(window_size);
    result[..valid].copy_from_slice(&sig_re[..valid]);
}

/// Compute the windowed square error, _d(t)_, of `signal`. For a window size of _w_ and a signal
/// _x=(x_0,x_1,...)_, this is defined by
///
///  > d(t) = sum_{i=0}^{w-1} (x_i - x_{i+t})^2
///
/// Expanding the square gives d(t) = E_0 + E_t - 2 r(t), where E_0 is the energy of the
/// reference window, E_t the energy of the window shifted by _t_ (read off a prefix sum
/// of squares) and r(t) the [windowed_autocorrelation].
/// It is assumed that `window_size` is at most half the length of `signal`.
pub fn windowed_square_error<T>(
    signal: &[T],
    window_size: usize,
    fft: &Radix2Fft<T>,
    buffers: &BufferPool<T>,
    result: &mut [T],
) where
    T: Float,
{
    assert!(
        2 * window_size <= signal.len(),
        "The window size cannot be more than half the signal length"
    );

    let two = T::one() + T::one();

    windowed_autocorrelation(signal, window_size, fft, buffers, result);

    let mut prefix = buffers.get_buffer();
    let prefix = &mut prefix[..signal.len() + 1];
    prefix_square_sum(signal, prefix);
    let power = prefix[window_size];

    result
        .iter_mut()
        .take(window_size)
        .enumerate()
        .for_each(|(t, a)| {
            let shifted_power = prefix[t + window_size] - prefix[t];
            // Rounding in the transform can push exact matches slightly negative.
            *a = (power + shifted_power - two * *a).max(T::zero());
        });
}

/// Calculate the "cumulative mean normalized difference function" as
/// specified in the YIN paper. If _d(t)_ is the square error function,
/// compute _d'(0) = 1_ and for _t > 0_
///
///  > d'(t) = d(t) * t / sum_{i=1}^t d(i)
///
/// Lags where the running sum is still zero are assigned 1.
pub fn yin_normalize_square_error<T: Float>(square_error: &mut [T]) {
    if square_error.is_empty() {
        return;
    }
    let mut sum = T::zero();
    square_error[0] = T::one();
    square_error
        .iter_mut()
        .enumerate()
        .skip(1)
        .for_each(|(i, a)| {
            sum = sum + *a;
            *a = match sum > T::zero() {
                true => *a * from_len(i) / sum,
                false => T::one(),
            };
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn internals_for(signal: &[f64]) -> DetectorInternals<f64> {
        DetectorInternals::new(signal.len())
    }

    #[test]
    fn windowed_autocorrelation_test() {
        let signal: Vec<f64> = vec![0., 1., 2., 0., -1., -2.];
        let window_size: usize = 3;
        let internals = internals_for(&signal);

        let result: Vec<f64> = (0..window_size)
            .map(|i| {
                signal[..window_size]
                    .iter()
                    .zip(signal[i..(i + window_size)].iter())
                    .map(|(a, b)| *a * *b)
                    .sum()
            })
            .collect();

        let mut computed_result = vec![0.; window_size];
        windowed_autocorrelation(
            &signal,
            window_size,
            &internals.fft,
            &internals.buffers,
            &mut computed_result,
        );
        // Using an FFT loses precision; we don't care that much, so round generously.
        computed_result
            .iter_mut()
            .for_each(|x| *x = (*x * 100.).round() / 100.);

        assert_eq!(result, computed_result);
    }

    #[test]
    fn windowed_square_error_test() {
        let signal: Vec<f64> = vec![0., 1., 2., 0., -1., -2.];
        let window_size: usize = 3;
        let internals = internals_for(&signal);

        let result: Vec<f64> = (0..window_size)
            .map(|i| {
                signal[..window_size]
                    .iter()
                    .zip(signal[i..(i + window_size)].iter())
                    .map(|(x_j, x_j_tau)| (*x_j - *x_j_tau) * (*x_j - *x_j_tau))
                    .sum()
            })
            .collect();

        let mut computed_result = vec![0.; window_size];
        windowed_square_error(
            &signal,
            window_size,
            &internals.fft,
            &internals.buffers,
            &mut computed_result,
        );
        computed_result
            .iter_mut()
            .for_each(|x| *x = (*x * 100.).round() / 100.);

        assert_eq!(result, computed_result);
    }

    #[test]
    fn square_error_matches_direct_sum_on_longer_signal() {
        let signal: Vec<f64> = (0..64).map(|i| ((i * 37) % 17) as f64 / 8.0 - 1.0).collect();
        let window_size = 32;
        let internals = internals_for(&signal);

        let mut computed = vec![0.; window_size];
        windowed_square_error(
            &signal,
            window_size,
            &internals.fft,
            &internals.buffers,
            &mut computed,
        );

        for (t, value) in computed.iter().enumerate() {
            let direct: f64 = (0..window_size)
                .map(|i| (signal[i] - signal[i + t]).powi(2))
                .sum();
            assert!((direct - value).abs() < 1e-9, "lag {}: {} vs {}", t, direct, value);
        }
    }

    #[test]
    fn yin_normalized_square_error_test() {
        let signal: &mut Vec<f64> = &mut vec![0., 6., 14.];
        let result = vec![1., 1., 2. * 14. / (6. + 14.)];

        yin_normalize_square_error(signal);

        assert_eq!(result, *signal);
    }

    #[test]
    fn yin_normalization_guards_zero_sum() {
        let signal: &mut Vec<f64> = &mut vec![0., 0., 0., 4.];

        yin_normalize_square_error(signal);

        assert_eq!(*signal, vec![1., 1., 1., 3.]);
    }
}
