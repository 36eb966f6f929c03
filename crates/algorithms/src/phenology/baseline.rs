//! Forward and backward rolling-mean baselines
//!
//! Each sample gets two boxcar means of its own daily series, sized by the
//! sample's senescence-lag estimate. The series is treated as one annual
//! cycle that wraps around: day 0 follows day 364. Indexing modulo the
//! series length gives the same interior values as averaging a series
//! repeated three times and keeping the middle year, without building it.

use crate::parallel::map_samples;
use crate::phenology::minima::locate_minima;
use crate::phenology::params::{BaselineAlignment, PhenologyParams};
use ndarray::Array2;
use phenoscope_core::{Algorithm, Error, NdviMatrix, Result, Sample};

/// Forward and backward baselines of one sample
#[derive(Debug, Clone, PartialEq)]
pub struct Baselines {
    /// Rolling mean compared against the curve to find the season start
    pub forward: Vec<f64>,
    /// Mirrored rolling mean compared against the curve to find the season end
    pub backward: Vec<f64>,
    /// Window length, `None` when no baseline could be built
    pub window: Option<usize>,
}

impl Baselines {
    /// All-undefined baselines for a series of `len` days
    pub fn undefined(len: usize) -> Self {
        Self {
            forward: vec![f64::NAN; len],
            backward: vec![f64::NAN; len],
            window: None,
        }
    }
}

/// Mean of `window` consecutive days starting at `d + offset`, for every day `d`.
///
/// Indices wrap around the series. A window holding an undefined day is
/// undefined. Each window is summed from scratch so constant stretches of
/// the curve produce exactly constant means.
fn circular_rolling_mean(values: &[f64], window: usize, offset: isize) -> Vec<f64> {
    let n = values.len();
    if window == 0 || window > n {
        return vec![f64::NAN; n];
    }

    let len = n as isize;
    (0..len)
        .map(|d| {
            let mut sum = 0.0;
            for k in 0..window as isize {
                let v = values[(d + offset + k).rem_euclid(len) as usize];
                if !v.is_finite() {
                    return f64::NAN;
                }
                sum += v;
            }
            sum / window as f64
        })
        .collect()
}

/// Forward baseline with window `window`.
///
/// Trailing alignment averages the `window` days ending on `d`; centered
/// alignment averages `window` days around `d` (the extra day of an even
/// window falls before `d`).
pub fn forward_baseline(values: &[f64], window: Option<usize>, alignment: BaselineAlignment) -> Vec<f64> {
    let Some(w) = window else {
        return vec![f64::NAN; values.len()];
    };
    let offset = match alignment {
        BaselineAlignment::Trailing => 1 - w as isize,
        BaselineAlignment::Centered => -((w / 2) as isize),
    };
    circular_rolling_mean(values, w, offset)
}

/// Backward baseline: the mean of the `window` days strictly after `d`
pub fn backward_baseline(values: &[f64], window: Option<usize>) -> Vec<f64> {
    match window {
        Some(w) => circular_rolling_mean(values, w, 1),
        None => vec![f64::NAN; values.len()],
    }
}

/// Both baselines of one series for a given window
pub fn rolling_baselines(values: &[f64], window: Option<usize>, alignment: BaselineAlignment) -> Baselines {
    let window = window.filter(|&w| w > 0 && w <= values.len());
    Baselines {
        forward: forward_baseline(values, window, alignment),
        backward: backward_baseline(values, window),
        window,
    }
}

/// Baselines of a whole batch, as two (day, sample) matrices
#[derive(Debug, Clone)]
pub struct RollingBaselines {
    pub forward: Array2<f64>,
    pub backward: Array2<f64>,
    /// Window length per sample
    pub windows: Vec<Option<usize>>,
}

/// Compute forward and backward baselines for every sample.
///
/// Invalid samples, and valid samples whose minima do not yield a window,
/// keep all-undefined columns.
pub fn rolling_baseline_matrices(matrix: &NdviMatrix, params: &PhenologyParams) -> Result<RollingBaselines> {
    params.validate()?;

    let days = matrix.days();
    let columns: Vec<Baselines> = map_samples(matrix.n_samples(), |i| match matrix.sample(i) {
        Sample::Valid(series) => {
            let window = locate_minima(&series.values, params.left_min_from, params.right_min_until)
                .and_then(|m| m.window_len(days));
            rolling_baselines(&series.values, window, params.alignment)
        }
        Sample::Invalid(_) => Baselines::undefined(days),
    });

    let mut forward = Array2::from_elem((days, columns.len()), f64::NAN);
    let mut backward = Array2::from_elem((days, columns.len()), f64::NAN);
    for (col, b) in columns.iter().enumerate() {
        for day in 0..days {
            forward[(day, col)] = b.forward[day];
            backward[(day, col)] = b.backward[day];
        }
    }

    Ok(RollingBaselines {
        forward,
        backward,
        windows: columns.iter().map(|b| b.window).collect(),
    })
}

/// Rolling baseline builder
#[derive(Debug, Clone, Default)]
pub struct BaselineBuilder;

impl Algorithm for BaselineBuilder {
    type Input = NdviMatrix;
    type Output = RollingBaselines;
    type Params = PhenologyParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Rolling Baselines"
    }

    fn description(&self) -> &'static str {
        "Forward and backward rolling-mean baselines sized by each sample's senescence lag"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        rolling_baseline_matrices(&input, &params)
    }
}
