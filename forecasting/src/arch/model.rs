use ndarray::{Array2, ArrayView2};

use crate::{Result, arch::loss::LossFn, optimization::Optimizer};

pub trait Model {
    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// Returns the flat parameters of the model.
    fn params(&self) -> &[f32];

    /// Returns the width of the feature vectors the model consumes.
    fn input_size(&self) -> usize;

    /// Returns the width of the vectors the model produces.
    fn output_size(&self) -> usize;

    /// Computes the model output for a batch, one sample per row, without mutating anything.
    ///
    /// # Errors
    /// `DimensionMismatch` if `x` doesn't have `input_size` columns.
    fn predict(&self, x: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Computes the gradient of the loss function with respect to the parameters of the model
    /// over each of the provided batches. **The parameters get updated** after each batch
    /// according to the optimization algorithm.
    ///
    /// # Arguments
    /// * `optimizer` - The optimizer that dictates how to update the parameters on each batch.
    /// * `loss_fn` - The loss function.
    /// * `batches` - The (features, targets) batches of data.
    ///
    /// # Returns
    /// The statistics of the pass, its loss being the mean of the batch losses.
    fn backprop<O, L, I>(&mut self, optimizer: &mut O, loss_fn: &L, batches: I) -> Result<PassStats>
    where
        O: Optimizer + ?Sized,
        L: LossFn + ?Sized,
        I: Iterator<Item = (Array2<f32>, Array2<f32>)>;

    /// Computes the loss over the provided batches in inference mode.
    ///
    /// # Returns
    /// The statistics of the pass, its loss being the mean of the batch losses.
    fn evaluate<L, I>(&self, loss_fn: &L, batches: I) -> Result<PassStats>
    where
        L: LossFn + ?Sized,
        I: Iterator<Item = (Array2<f32>, Array2<f32>)>;
}

/// Statistics of a single pass over a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassStats {
    loss_sum: f32,
    batches: usize,
    samples: usize,
}

impl PassStats {
    /// Accounts for one more batch.
    ///
    /// # Arguments
    /// * `loss` - The mean loss over the batch.
    /// * `samples` - The amount of samples in the batch.
    pub fn record(&mut self, loss: f32, samples: usize) {
        self.loss_sum += loss;
        self.batches += 1;
        self.samples += samples;
    }

    /// Returns the mean of the batch losses.
    ///
    /// This is not the loss over every sample when the last batch is smaller than the rest,
    /// since all batches weigh the same.
    pub fn loss(&self) -> f32 {
        if self.batches == 0 {
            return 0.;
        }

        self.loss_sum / self.batches as f32
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn samples(&self) -> usize {
        self.samples
    }
}
