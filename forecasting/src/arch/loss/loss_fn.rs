use ndarray::{Array2, ArrayView2};

use crate::Result;

/// A differentiable measure of the distance between a prediction and its target.
pub trait LossFn {
    /// Computes the loss of a batch.
    ///
    /// # Errors
    /// `DimensionMismatch` if `y_pred` and `y` don't share a shape.
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32>;

    /// Computes the derivative of the loss with respect to each prediction.
    ///
    /// # Errors
    /// `DimensionMismatch` if `y_pred` and `y` don't share a shape.
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>>;
}
