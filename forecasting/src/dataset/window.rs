use ndarray::{Array2, ArrayView1};

use super::Dataset;
use crate::{ForecastErr, Result};

impl Dataset {
    /// Reframes a scalar series as supervised samples through time-delay embedding.
    ///
    /// Sample `i` has the features `series[i..i + window]` and the targets
    /// `series[i + window..i + window + horizon]`, so consecutive samples overlap by
    /// `window - 1` values and there are `series.len() - window - horizon + 1` of them.
    ///
    /// # Arguments
    /// * `series` - The ordered observations, one per time step.
    /// * `window` - The amount of past values used as features.
    /// * `horizon` - The amount of trailing values used as targets.
    ///
    /// # Returns
    /// The windowed dataset or `InvalidConfiguration` if no sample fits in the series.
    pub fn from_series(series: &[f32], window: usize, horizon: usize) -> Result<Self> {
        if window == 0 || horizon == 0 {
            return Err(ForecastErr::config(format!(
                "window ({window}) and horizon ({horizon}) must be greater than 0"
            )));
        }

        let row_size = window + horizon;
        if row_size > series.len() {
            return Err(ForecastErr::config(format!(
                "window + horizon ({row_size}) exceeds the series length ({})",
                series.len()
            )));
        }

        let len = series.len() - row_size + 1;
        let mut data = Array2::zeros((len, row_size));
        let series = ArrayView1::from(series);

        for (mut row, values) in data.rows_mut().into_iter().zip(series.windows(row_size)) {
            row.assign(&values);
        }

        Ok(Self::from_parts(data, window, horizon))
    }
}
