//! Multilayer perceptron forecasting of daily closing prices.
//!
//! A series is turned into supervised samples by a sliding window, split into train and test
//! subsets and used to fit a feed-forward network with minibatch gradient descent.

pub mod arch;
pub mod dataset;
pub mod error;
mod forecast;
pub mod optimization;
pub mod specs;
pub mod training;

pub use error::{ForecastErr, Result};
pub use forecast::{ForecastReport, forecast};
