use ndarray::Array2;

use super::Dataset;
use crate::{ForecastErr, Result};

/// Min-max scaling of every value into `[0, 1]`.
///
/// Features and targets share one range, since both are values of the same series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    min: f32,
    range: f32,
}

impl MinMaxScaler {
    /// Fits the scaler to the values of a dataset.
    ///
    /// Fit on the train subset only, otherwise the test extremes leak into training.
    ///
    /// # Returns
    /// The fitted scaler or `EmptyDataset` if there's nothing to fit.
    pub fn fit(dataset: &Dataset) -> Result<Self> {
        if dataset.is_empty() {
            return Err(ForecastErr::EmptyDataset("scaler fit"));
        }

        let view = dataset.view();
        let min = view.fold(f32::INFINITY, |acc, &v| acc.min(v));
        let max = view.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));

        // A flat series would divide by zero.
        let range = match max - min {
            r if r.abs() < f32::EPSILON => 1.0,
            r => r,
        };

        Ok(Self { min, range })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    /// Scales a single value.
    pub fn scale(&self, value: f32) -> f32 {
        (value - self.min) / self.range
    }

    /// Maps a scaled value back to the original units.
    pub fn unscale(&self, value: f32) -> f32 {
        value * self.range + self.min
    }

    /// Scales every value of a dataset.
    pub fn transform(&self, dataset: &Dataset) -> Dataset {
        dataset.mapv(|v| self.scale(v))
    }

    /// Maps a batch of scaled predictions back to the original units.
    pub fn inverse_transform(&self, values: &Array2<f32>) -> Array2<f32> {
        values.mapv(|v| self.unscale(v))
    }
}
