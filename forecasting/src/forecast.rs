use log::info;
use ndarray::Array2;

use crate::{
    ForecastErr, Result,
    dataset::{Dataset, MinMaxScaler},
    specs::ForecastSpec,
    training::{Trainer, TrainerBuilder, TrainingHistory, generate_rng},
};

/// The outcome of a `forecast` run.
pub struct ForecastReport {
    history: TrainingHistory,
    train_len: usize,
    test_len: usize,
    scaler: MinMaxScaler,
    trainer: Box<dyn Trainer>,
}

impl ForecastReport {
    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Returns the amount of samples the model was trained on.
    pub fn train_len(&self) -> usize {
        self.train_len
    }

    /// Returns the amount of samples held out for validation.
    pub fn test_len(&self) -> usize {
        self.test_len
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    /// Returns the trained model's parameters.
    pub fn params(&self) -> &[f32] {
        self.trainer.params()
    }

    /// Predicts the values that follow `window`, both in the series' original units.
    ///
    /// # Errors
    /// `DimensionMismatch` if `window` isn't as long as the model's input.
    pub fn predict_next(&self, window: &[f32]) -> Result<Vec<f32>> {
        let x: Vec<f32> = window.iter().map(|&v| self.scaler.scale(v)).collect();
        let x = Array2::from_shape_vec((1, window.len()), x)
            .map_err(|e| ForecastErr::config(e.to_string()))?;

        let y = self.trainer.predict(x.view())?;
        Ok(self.scaler.inverse_transform(&y).iter().copied().collect())
    }
}

/// Runs a whole forecast on a raw series: windowing, splitting, scaling and training.
///
/// The scaler is fitted on the train subset only. When the split leaves no test samples the
/// model is trained without validation.
///
/// # Arguments
/// * `spec` - The specification of the run.
/// * `series` - The raw series, oldest value first.
///
/// # Returns
/// The report of the run or the first error encountered.
pub fn forecast(spec: &ForecastSpec, series: &[f32]) -> Result<ForecastReport> {
    let dataset = Dataset::from_series(series, spec.window, spec.horizon)?;
    info!(
        "windowed {} values into {} samples (window={}, horizon={})",
        series.len(),
        dataset.len(),
        spec.window,
        spec.horizon
    );

    let mut rng = generate_rng(spec.trainer.seed);
    let (train, test) = dataset.split(spec.split.ratio, spec.split.mode, &mut rng)?;
    if train.is_empty() {
        return Err(ForecastErr::EmptyDataset("training"));
    }

    let scaler = MinMaxScaler::fit(&train)?;
    let train = scaler.transform(&train);
    let test = scaler.transform(&test);

    // Weights and shuffling continue the stream the split drew from.
    let mut trainer = TrainerBuilder::new().build_with_rng(
        &spec.trainer,
        (spec.window, spec.horizon),
        &mut rng,
    )?;
    let validation = (!test.is_empty()).then_some(&test);
    let history = trainer.train(&train, validation)?;

    Ok(ForecastReport {
        history,
        train_len: train.len(),
        test_len: test.len(),
        scaler,
        trainer,
    })
}
