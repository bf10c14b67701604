mod samples;
mod scaler;
mod split;
mod window;

pub use samples::Dataset;
pub use scaler::MinMaxScaler;
pub use split::SplitMode;
