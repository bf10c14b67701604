use ndarray::{Array2, ArrayView2};

use super::TrainingHistory;
use crate::{Result, dataset::Dataset};

/// A type-erased trainer, owning the model it fits.
pub trait Trainer {
    /// Trains the model, see `ModelTrainer::train`.
    fn train(&mut self, train: &Dataset, test: Option<&Dataset>) -> Result<TrainingHistory>;

    /// Runs the trained model in inference mode.
    fn predict(&self, x: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Returns the current parameters of the model.
    fn params(&self) -> &[f32];
}
