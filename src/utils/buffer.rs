use object_pool::{Pool, Reusable};

use crate::float::{from_len, Float};

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

/// Copy `input` into the front of `output` and zero the remainder.
pub fn copy_zero_padded<T: Float>(input: &[T], output: &mut [T]) {
    assert!(input.len() <= output.len());
    output[..input.len()].copy_from_slice(input);
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = T::zero());
}

/// Compute the sum of the square of each element of `arr`.
pub fn square_sum<T>(arr: &[T]) -> T
where
    T: Float,
{
    arr.iter().map(|&s| s * s).sum::<T>()
}

/// Root-mean-square amplitude of `arr`; zero for an empty slice.
pub fn rms<T: Float>(arr: &[T]) -> T {
    if arr.is_empty() {
        return T::zero();
    }
    (square_sum(arr) / from_len(arr.len())).sqrt()
}

/// Running sums of squares: `prefix[i]` is the energy of `arr[..i]`, so the
/// energy of any window `a..b` is `prefix[b] - prefix[a]`.
pub fn prefix_square_sum<T: Float>(arr: &[T], prefix: &mut [T]) {
    assert!(prefix.len() > arr.len());
    prefix[0] = T::zero();
    let mut acc = T::zero();
    arr.iter().zip(prefix[1..].iter_mut()).for_each(|(&s, p)| {
        acc = acc + s * s;
        *p = acc;
    });
}

/// A pool of scratch buffers. Buffers are dynamically created as needed
/// and reused if previously `Drop`ed. Buffers are never freed. Instead buffers are kept
/// in reserve and reused when a new buffer is requested.
///
/// Buffers come back with whatever the previous user left in them.
///
/// ```rust
/// use chord_detection::utils::buffer::BufferPool;
///
/// let buffers = BufferPool::new(3);
/// let mut buf1 = buffers.get_buffer();
/// {
///     // This buffer won't be dropped until the end of the function
///     buf1[0] = 5.5;
/// }
/// {
///     // This buffer will be dropped when the scope ends
///     let mut buf2 = buffers.get_buffer();
///     buf2[1] = 6.6;
/// }
/// {
///     // This buffer will be dropped when the scope ends
///     // It is the same buffer that was just used (i.e., it's a reused buffer)
///     let mut buf3 = buffers.get_buffer();
///     buf3[2] = 7.7;
/// }
/// drop(buf1);
///
/// let buf1 = &buffers.get_buffer();
/// let buf2 = &buffers.get_buffer();
/// // Buffers are distributed in LIFO order, so compare them "backwards".
/// assert_eq!(&buf2[..], &[0.0, 6.6, 7.7]);
/// assert_eq!(&buf1[..], &[5.5, 0., 0.]);
/// ```
pub struct BufferPool<T> {
    buffers: Pool<Vec<T>>,
    pub buffer_size: usize,
}

impl<T: Float> BufferPool<T> {
    pub fn new(buffer_size: usize) -> Self {
        BufferPool {
            buffers: Pool::new(0, || new_real_buffer(buffer_size)),
            buffer_size,
        }
    }

    /// Get a buffer that can be used until it is `Drop`ed.
    pub fn get_buffer(&self) -> Reusable<Vec<T>> {
        self.buffers.pull(|| new_real_buffer(self.buffer_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers() {
        let buffers = BufferPool::new(3);
        let mut buf1 = buffers.get_buffer();
        buf1[0] = 5.5;
        {
            let mut buf2 = buffers.get_buffer();
            buf2[1] = 6.6;
        }
        {
            // Reuses the buffer released by `buf2`.
            let mut buf3 = buffers.get_buffer();
            buf3[2] = 7.7;
        }
        drop(buf1);

        let buf1 = &buffers.get_buffer();
        let buf2 = &buffers.get_buffer();
        assert_eq!(&buf2[..], &[0.0, 6.6, 7.7]);
        assert_eq!(&buf1[..], &[5.5, 0., 0.]);
    }

    #[test]
    fn prefix_sums_give_window_energy() {
        let signal = [1.0f64, -2.0, 3.0, 0.5];
        let mut prefix = [0.0; 5];
        prefix_square_sum(&signal, &mut prefix);
        assert_eq!(prefix, [0.0, 1.0, 5.0, 14.0, 14.25]);
        assert_eq!(prefix[3] - prefix[1], square_sum(&signal[1..3]));
    }

    #[test]
    fn rms_of_constant() {
        assert_eq!(rms(&[0.5f32; 16]), 0.5);
        assert_eq!(rms::<f64>(&[]), 0.0);
    }
}
