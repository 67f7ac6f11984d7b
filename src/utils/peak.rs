//! Dip search and sub-sample refinement over difference functions. Everything
//! here looks for *minima*, since that is where a periodic signal lines up with
//! itself.

use crate::float::{from_len, lit, Float};

struct Point<T: Float> {
    x: T,
    y: T,
}

/// Find the first index in `lo..=hi` whose value drops below `threshold`, then
/// walk forward while values keep decreasing so the result sits on the local
/// minimum rather than on the first crossing.
pub fn first_dip_below<T: Float>(values: &[T], lo: usize, hi: usize, threshold: T) -> Option<usize> {
    let hi = hi.min(values.len().checked_sub(1)?);
    let mut idx = (lo..=hi).find(|&i| values[i] < threshold)?;
    while idx < hi && values[idx + 1] < values[idx] {
        idx += 1;
    }
    Some(idx)
}

/// Index of the smallest value in `lo..=hi`.
pub fn global_minimum<T: Float>(values: &[T], lo: usize, hi: usize) -> Option<usize> {
    let hi = hi.min(values.len().checked_sub(1)?);
    (lo..=hi)
        .filter(|&i| values[i].is_finite())
        .min_by(|&a, &b| {
            values[a]
                .partial_cmp(&values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Look within `radius` samples of `idx` (clamped to `lo..=hi`) for a smaller
/// value and return its index.
pub fn refine_local_minimum<T: Float>(
    values: &[T],
    idx: usize,
    radius: usize,
    lo: usize,
    hi: usize,
) -> usize {
    let start = idx.saturating_sub(radius).max(lo);
    let stop = (idx + radius).min(hi).min(values.len().saturating_sub(1));
    (start..=stop).fold(idx, |best, i| if values[i] < values[best] { i } else { best })
}

/// Sub-sample position of the extremum around `idx`, from a parabola through
/// `idx - 1`, `idx` and `idx + 1`. Falls back to `idx` at the edges or when the
/// three points are collinear.
pub fn parabolic_offset<T: Float>(values: &[T], idx: usize) -> T {
    if idx == 0 || idx + 1 >= values.len() {
        return from_len(idx);
    }
    let point = quadratic_interpolation(
        Point {
            x: from_len(idx - 1),
            y: values[idx - 1],
        },
        Point {
            x: from_len(idx),
            y: values[idx],
        },
        Point {
            x: from_len(idx + 1),
            y: values[idx + 1],
        },
    );
    match point.x.is_finite() {
        true => point.x,
        false => from_len(idx),
    }
}

fn quadratic_interpolation<T: Float>(
    left: Point<T>,
    center: Point<T>,
    right: Point<T>,
) -> Point<T> {
    let denominator = lit::<T>(2.0) * center.y - left.y - right.y;
    if denominator == T::zero() {
        return center;
    }
    let shift = lit::<T>(0.5) * (right.y - left.y) / denominator;
    let x = center.x + shift;
    let y = center.y + lit::<T>(0.25) * (right.y - left.y) * shift;
    Point { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_correction() {
        let point = quadratic_interpolation(
            Point {
                x: -1.5,
                y: -(1.5 * 1.5) + 4.0,
            },
            Point {
                x: -0.5,
                y: -(0.5 * 0.5) + 4.0,
            },
            Point {
                x: 0.5,
                y: -(0.5 * 0.5) + 4.0,
            },
        );
        assert_eq!(point.x, 0.0);
        assert_eq!(point.y, 4.0);
    }

    #[test]
    fn valley_correction() {
        // y = (x - 3.25)^2 sampled on integers
        let values: Vec<f64> = (0..8).map(|x| (x as f64 - 3.25).powi(2)).collect();
        assert_eq!(parabolic_offset(&values, 3), 3.25);
        assert_eq!(parabolic_offset(&values, 0), 0.0);
    }

    #[test]
    fn dip_walks_to_minimum() {
        let values = [1.0, 0.9, 0.5, 0.3, 0.2, 0.4, 0.1];
        assert_eq!(first_dip_below(&values, 1, 6, 0.6), Some(4));
        assert_eq!(first_dip_below(&values, 1, 6, 0.05), None);
        assert_eq!(first_dip_below(&values, 5, 20, 0.6), Some(6));
        assert_eq!(global_minimum(&values, 0, 5), Some(4));
    }

    #[test]
    fn local_refinement_stays_in_range() {
        let values = [5.0, 0.0, 3.0, 2.0, 4.0, 1.5];
        assert_eq!(refine_local_minimum(&values, 3, 2, 2, 5), 5);
        assert_eq!(refine_local_minimum(&values, 3, 1, 2, 5), 3);
    }
}
