use std::num::NonZeroUsize;

use log::{debug, info, warn};
use ndarray::{Array2, ArrayView2};
use rand::{Rng, seq::SliceRandom};

use super::{Trainer, TrainingHistory};
use crate::{
    ForecastErr, Result,
    arch::{Model, loss::LossFn},
    dataset::Dataset,
    optimization::Optimizer,
};

/// A model `Trainer`. Contains the relevant components needed for training a model,
/// including the model itself.
pub struct ModelTrainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    model: M,
    optimizer: O,
    loss_fn: L,

    epochs: NonZeroUsize,
    batch_size: NonZeroUsize,
    rng: R,
}

impl<M, O, L, R> ModelTrainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    /// Returns a new `ModelTrainer`.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `optimizer` - The optimizer that updates the model's parameters after each batch.
    /// * `loss_fn` - The loss function used to measure the difference between a model's output and the expected one.
    /// * `epochs` - The amount of full passes over the training set per `train` call.
    /// * `batch_size` - The maximum amount of samples per optimizer step.
    /// * `rng` - A random number generator, used to shuffle the samples on every epoch.
    ///
    /// # Returns
    /// A new `ModelTrainer` or `InvalidConfiguration` if `epochs` or `batch_size` are 0.
    pub fn new(
        model: M,
        optimizer: O,
        loss_fn: L,
        epochs: usize,
        batch_size: usize,
        rng: R,
    ) -> Result<Self> {
        let epochs = NonZeroUsize::new(epochs)
            .ok_or_else(|| ForecastErr::config("epochs must be greater than 0"))?;
        let batch_size = NonZeroUsize::new(batch_size)
            .ok_or_else(|| ForecastErr::config("batch_size must be greater than 0"))?;

        Ok(Self {
            model,
            optimizer,
            loss_fn,
            epochs,
            batch_size,
            rng,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Trains the model for `epochs` epochs, each one visiting the training samples in a new
    /// random order, optionally evaluating the model on `test` after every epoch.
    ///
    /// # Arguments
    /// * `train` - The samples the model is fitted to.
    /// * `test` - The samples the model is validated against, never used to update it.
    ///
    /// # Returns
    /// The training history or an error if occurred.
    pub fn train(&mut self, train: &Dataset, test: Option<&Dataset>) -> Result<TrainingHistory> {
        if train.is_empty() {
            return Err(ForecastErr::EmptyDataset("training"));
        }
        self.check_widths(train)?;

        if let Some(test) = test {
            if test.is_empty() {
                return Err(ForecastErr::EmptyDataset("validation"));
            }
            self.check_widths(test)?;
        }

        let epochs = self.epochs.get();
        let mut history = TrainingHistory::with_capacity(epochs);
        let mut order: Vec<usize> = (0..train.len()).collect();
        let test_order: Vec<usize> = (0..test.map_or(0, Dataset::len)).collect();

        info!(
            epochs = epochs,
            batch_size = self.batch_size.get(),
            train_samples = train.len(),
            test_samples = test_order.len();
            "starting training"
        );

        for epoch in 0..epochs {
            order.shuffle(&mut self.rng);
            let batches = train.batches(&order, self.batch_size)?;

            let stats = self
                .model
                .backprop(&mut self.optimizer, &self.loss_fn, batches)?;

            let val_loss = match test {
                Some(test) => {
                    let batches = test.batches(&test_order, self.batch_size)?;
                    Some(self.model.evaluate(&self.loss_fn, batches)?.loss())
                }
                None => None,
            };

            let train_loss = stats.loss();
            match val_loss {
                Some(val_loss) => {
                    debug!(epoch = epoch, train_loss = train_loss, val_loss = val_loss; "epoch finished")
                }
                None => debug!(epoch = epoch, train_loss = train_loss; "epoch finished"),
            }

            if !train_loss.is_finite() || val_loss.is_some_and(|loss| !loss.is_finite()) {
                warn!("non-finite loss on epoch {epoch}, consider a lower learning rate");
            }

            history.push(stats, val_loss);
        }

        info!(
            "training finished: train_loss={:?} val_loss={:?}",
            history.last_train_loss(),
            history.last_val_loss()
        );

        Ok(history)
    }

    fn check_widths(&self, dataset: &Dataset) -> Result<()> {
        if dataset.x_size() != self.model.input_size() {
            return Err(ForecastErr::DimensionMismatch {
                what: "dataset feature width",
                got: dataset.x_size(),
                expected: self.model.input_size(),
            });
        }

        if dataset.y_size() != self.model.output_size() {
            return Err(ForecastErr::DimensionMismatch {
                what: "dataset target width",
                got: dataset.y_size(),
                expected: self.model.output_size(),
            });
        }

        Ok(())
    }
}

impl<M, O, L, R> Trainer for ModelTrainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    fn train(&mut self, train: &Dataset, test: Option<&Dataset>) -> Result<TrainingHistory> {
        self.train(train, test)
    }

    fn predict(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.model.predict(x)
    }

    fn params(&self) -> &[f32] {
        self.model.params()
    }
}
