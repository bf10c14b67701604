use ndarray::{Array2, ArrayView2};

use super::LossFn;
use crate::{ForecastErr, Result};

/// Mean squared error loss function.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mse;

impl Mse {
    /// Returns a new `Mse`.
    pub fn new() -> Self {
        Self
    }

    fn check_shapes(y_pred: &ArrayView2<f32>, y: &ArrayView2<f32>) -> Result<()> {
        if y_pred.ncols() != y.ncols() {
            return Err(ForecastErr::DimensionMismatch {
                what: "prediction width",
                got: y_pred.ncols(),
                expected: y.ncols(),
            });
        }

        if y_pred.nrows() != y.nrows() {
            return Err(ForecastErr::DimensionMismatch {
                what: "prediction rows",
                got: y_pred.nrows(),
                expected: y.nrows(),
            });
        }

        Ok(())
    }
}

impl LossFn for Mse {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32> {
        Self::check_shapes(&y_pred, &y)?;

        let loss = (&y_pred - &y)
            .mapv(|d| d.powi(2))
            .mean()
            .unwrap_or_default();

        Ok(loss)
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>> {
        Self::check_shapes(&y_pred, &y)?;

        Ok((&y_pred - &y) * (2.0 / y_pred.len().max(1) as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn loss_is_mean_of_squared_differences() {
        let y_pred = array![[1.0_f32], [2.0], [4.0]];
        let y = array![[1.0_f32], [0.0], [1.0]];

        let loss = Mse.loss(y_pred.view(), y.view()).unwrap();
        assert_eq!(loss, (0. + 4. + 9.) / 3.);

        let prime = Mse.loss_prime(y_pred.view(), y.view()).unwrap();
        assert_eq!(prime, array![[0.0_f32], [4. / 3.], [2.]]);
    }

    #[test]
    fn mismatched_shapes_fail() {
        let y_pred = array![[1.0_f32, 2.0]];
        let y = array![[1.0_f32]];

        assert!(matches!(
            Mse.loss(y_pred.view(), y.view()),
            Err(ForecastErr::DimensionMismatch { .. })
        ));
    }
}
