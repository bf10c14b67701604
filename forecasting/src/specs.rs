//! Serializable descriptions of every configurable piece of a forecast.

use serde::{Deserialize, Serialize};

use crate::dataset::SplitMode;

/// The specification for the `ActFn` enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    #[default]
    Tanh,
    Sigmoid {
        amp: f32,
    },
}

/// The specification for the `ParamInit` enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitSpec {
    #[default]
    XavierUniform,
    LecunNormal,
    Const {
        value: f32,
    },
}

/// The specification for the `Model` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    /// A multi-layer perceptron. Its input and output widths come from the window length and
    /// the horizon, only the hidden widths are given here.
    Mlp {
        hidden: Vec<usize>,
        #[serde(default)]
        act_fn: ActFnSpec,
        #[serde(default)]
        init: InitSpec,
    },
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self::Mlp {
            hidden: vec![16],
            act_fn: ActFnSpec::default(),
            init: InitSpec::default(),
        }
    }
}

/// The specification for the `Optimizer` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    Adam {
        learning_rate: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    },
    GradientDescent {
        learning_rate: f32,
    },
    GradientDescentWithMomentum {
        learning_rate: f32,
        momentum: f32,
    },
}

impl Default for OptimizerSpec {
    fn default() -> Self {
        Self::Adam {
            learning_rate: 0.005,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

/// The specification for the `LossFn` trait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFnSpec {
    #[default]
    Mse,
}

/// How the windowed samples are partitioned into train and test sets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSpec {
    /// The fraction of samples that go to the train set.
    pub ratio: f32,
    pub mode: SplitMode,
}

impl Default for SplitSpec {
    fn default() -> Self {
        Self {
            ratio: 0.8,
            mode: SplitMode::Chronological,
        }
    }
}

/// The specification for the `Trainer` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerSpec {
    pub model: ModelSpec,
    pub optimizer: OptimizerSpec,
    pub loss: LossFnSpec,
    pub epochs: usize,
    pub batch_size: usize,
    /// `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TrainerSpec {
    fn default() -> Self {
        Self {
            model: ModelSpec::default(),
            optimizer: OptimizerSpec::default(),
            loss: LossFnSpec::default(),
            epochs: 100,
            batch_size: 32,
            seed: Some(42),
        }
    }
}

/// The specification of a whole forecast, from the raw series to the trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSpec {
    /// The amount of past values the model sees.
    pub window: usize,
    /// The amount of future values the model predicts.
    pub horizon: usize,
    pub split: SplitSpec,
    pub trainer: TrainerSpec,
}

impl Default for ForecastSpec {
    fn default() -> Self {
        Self {
            window: 10,
            horizon: 1,
            split: SplitSpec::default(),
            trainer: TrainerSpec::default(),
        }
    }
}
