use serde::Serialize;

use crate::arch::PassStats;

/// The per-epoch record of a training run.
///
/// Owned by the caller once `train` returns. `val_losses` stays empty when training ran
/// without a validation set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingHistory {
    train_losses: Vec<f32>,
    val_losses: Vec<f32>,
    batches: Vec<usize>,
    samples: Vec<usize>,
}

impl TrainingHistory {
    /// Creates an empty `TrainingHistory` with room for `epochs` epochs.
    pub fn with_capacity(epochs: usize) -> Self {
        Self {
            train_losses: Vec::with_capacity(epochs),
            val_losses: Vec::with_capacity(epochs),
            batches: Vec::with_capacity(epochs),
            samples: Vec::with_capacity(epochs),
        }
    }

    /// Appends the results of one epoch.
    ///
    /// # Arguments
    /// * `train` - The statistics of the epoch's training pass.
    /// * `val_loss` - The mean of the validation batch losses, if there was a validation set.
    pub fn push(&mut self, train: PassStats, val_loss: Option<f32>) {
        self.train_losses.push(train.loss());
        self.val_losses.extend(val_loss);
        self.batches.push(train.batches());
        self.samples.push(train.samples());
    }

    pub fn train_losses(&self) -> &[f32] {
        &self.train_losses
    }

    pub fn val_losses(&self) -> &[f32] {
        &self.val_losses
    }

    /// Returns the amount of optimizer steps taken on each epoch.
    pub fn batches(&self) -> &[usize] {
        &self.batches
    }

    /// Returns the amount of training samples visited on each epoch.
    pub fn samples(&self) -> &[usize] {
        &self.samples
    }

    pub fn epochs(&self) -> usize {
        self.train_losses.len()
    }

    pub fn last_train_loss(&self) -> Option<f32> {
        self.train_losses.last().copied()
    }

    pub fn last_val_loss(&self) -> Option<f32> {
        self.val_losses.last().copied()
    }
}
