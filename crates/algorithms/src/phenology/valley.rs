//! Valley-to-valley detection
//!
//! A coarser season bound than the baseline crossings: the largest local
//! maximum of the curve, and the nearest local minima on either side of it.
//! Local extrema use a symmetric comparison of order `k`: a day qualifies
//! when it is strictly above (or below) every day within `±k`. Neighbours
//! beyond the series ends are clipped to the end day, so the first and last
//! day never qualify.

use phenoscope_core::{Error, Result};

/// Valley, peak and valley days of one season
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValleyEvents {
    pub vos_start: usize,
    pub pos: usize,
    pub vos_end: usize,
}

/// Steepest green-up and senescence days between the valleys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivativeEvents {
    pub bos_der: Option<usize>,
    pub eos_der: Option<usize>,
}

fn relative_extrema<F>(values: &[f64], order: usize, beats: F) -> Vec<usize>
where
    F: Fn(f64, f64) -> bool,
{
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let order = order.max(1);
    let last = n - 1;

    (0..n)
        .filter(|&i| {
            (1..=order).all(|shift| {
                let ahead = (i + shift).min(last);
                let behind = i.saturating_sub(shift);
                beats(values[i], values[ahead]) && beats(values[i], values[behind])
            })
        })
        .collect()
}

/// Days strictly greater than every day within `±order`
pub fn local_maxima(values: &[f64], order: usize) -> Vec<usize> {
    relative_extrema(values, order, |a, b| a > b)
}

/// Days strictly smaller than every day within `±order`
pub fn local_minima(values: &[f64], order: usize) -> Vec<usize> {
    relative_extrema(values, order, |a, b| a < b)
}

/// Find the valley → peak → valley triplet of the season.
///
/// The peak is the local maximum with the largest value (earliest on ties).
/// `vos_start` is the closest local minimum before it, `vos_end` the closest
/// one after it.
///
/// # Errors
/// [`Error::DegenerateExtremum`] when the curve has no local maximum, or
/// the peak has no local minimum on one side.
pub fn valley_to_valley(values: &[f64], order: usize) -> Result<ValleyEvents> {
    let peaks = local_maxima(values, order);
    let pos = peaks
        .iter()
        .copied()
        .reduce(|best, i| if values[i] > values[best] { i } else { best })
        .ok_or_else(|| Error::DegenerateExtremum(format!("no local maximum of order {order}")))?;

    let valleys = local_minima(values, order);
    let vos_start = valleys
        .iter()
        .copied()
        .filter(|&i| i < pos)
        .max()
        .ok_or_else(|| Error::DegenerateExtremum(format!("no valley before peak at day {pos}")))?;
    let vos_end = valleys
        .iter()
        .copied()
        .find(|&i| i > pos)
        .ok_or_else(|| Error::DegenerateExtremum(format!("no valley after peak at day {pos}")))?;

    Ok(ValleyEvents {
        vos_start,
        pos,
        vos_end,
    })
}

/// Days of steepest rise in `[vos_start, pos)` and steepest fall in `[pos, vos_end)`.
///
/// The slope at day `d` is `values[d + 1] - values[d]`. Earliest day wins ties.
pub fn derivative_events(values: &[f64], valley: &ValleyEvents) -> DerivativeEvents {
    let slope = |d: usize| {
        let s = values[d + 1] - values[d];
        s.is_finite().then_some((d, s))
    };

    let bos_der = (valley.vos_start..valley.pos)
        .filter_map(slope)
        .reduce(|best, c| if c.1 > best.1 { c } else { best })
        .map(|(d, _)| d);
    let eos_der = (valley.pos..valley.vos_end)
        .filter_map(slope)
        .reduce(|best, c| if c.1 < best.1 { c } else { best })
        .map(|(d, _)| d);

    DerivativeEvents { bos_der, eos_der }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_extrema_order_one() {
        let v = [1.0, 3.0, 2.0, 2.0, 0.5, 4.0, 1.0];
        assert_eq!(local_maxima(&v, 1), vec![1, 5]);
        assert_eq!(local_minima(&v, 1), vec![4]);
    }

    #[test]
    fn test_ends_never_qualify() {
        let v = [9.0, 1.0, 5.0, 1.0, 9.0];
        assert_eq!(local_maxima(&v, 1), vec![2]);
        assert_eq!(local_minima(&v, 1), vec![1, 3]);
        assert!(local_maxima(&[1.0], 3).is_empty());
        assert!(local_minima(&[], 3).is_empty());
    }

    #[test]
    fn test_order_widens_the_comparison() {
        let v = [0.0, 2.0, 1.0, 3.0, 1.0, 0.0, 0.5, 0.0];
        assert_eq!(local_maxima(&v, 1), vec![1, 3, 6]);
        assert_eq!(local_maxima(&v, 2), vec![3]);
    }

    #[test]
    fn test_plateaus_are_not_extrema() {
        let v = [0.5, 1.0, 1.0, 0.5, 0.2, 0.2, 0.6];
        assert!(local_maxima(&v, 1).is_empty());
        assert!(local_minima(&v, 1).is_empty());
    }

    #[test]
    fn test_valley_to_valley_picks_largest_peak() {
        // valleys at 2, 6, 10; peaks at 4 (0.5) and 8 (0.9)
        let v = [0.4, 0.3, 0.1, 0.3, 0.5, 0.3, 0.2, 0.6, 0.9, 0.5, 0.15, 0.3, 0.4];
        let ev = valley_to_valley(&v, 1).unwrap();
        assert_eq!(ev, ValleyEvents { vos_start: 6, pos: 8, vos_end: 10 });
    }

    #[test]
    fn test_missing_valley_is_an_error() {
        // monotone rise to a peak then fall: no valley on either side
        let v = [0.1, 0.2, 0.4, 0.8, 0.4, 0.2, 0.1];
        assert!(matches!(valley_to_valley(&v, 1), Err(Error::DegenerateExtremum(_))));

        let flat = [0.3; 20];
        let err = valley_to_valley(&flat, 2).unwrap_err();
        assert!(err.to_string().contains("no local maximum"));
    }

    #[test]
    fn test_derivative_events() {
        let v = [0.2, 0.1, 0.2, 0.5, 0.6, 0.7, 0.65, 0.3, 0.2, 0.1, 0.15];
        let valley = ValleyEvents { vos_start: 1, pos: 5, vos_end: 9 };
        let der = derivative_events(&v, &valley);
        assert_eq!(der.bos_der, Some(2)); // 0.2 -> 0.5
        assert_eq!(der.eos_der, Some(6)); // 0.65 -> 0.3
    }
}
