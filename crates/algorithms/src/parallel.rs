//! Per-sample fan-out, parallel when the `parallel` feature is enabled.
//!
//! Samples are independent, so every batch operation maps a closure over
//! sample indices and collects the results in input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Apply `f` to every sample index `0..n`, preserving order
#[cfg(feature = "parallel")]
pub(crate) fn map_samples<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..n).into_par_iter().map(f).collect()
}

/// Apply `f` to every sample index `0..n`, preserving order
#[cfg(not(feature = "parallel"))]
pub(crate) fn map_samples<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..n).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_samples_keeps_order() {
        let out = map_samples(100, |i| i * 2);
        assert_eq!(out.len(), 100);
        assert!(out.iter().enumerate().all(|(i, &v)| v == i * 2));
    }

    #[test]
    fn test_map_samples_empty() {
        let out: Vec<usize> = map_samples(0, |i| i);
        assert!(out.is_empty());
    }
}
