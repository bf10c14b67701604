mod builder;
mod history;
mod model_trainer;
mod trainer;

pub use builder::{TrainerBuilder, generate_rng};
pub use history::TrainingHistory;
pub use model_trainer::ModelTrainer;
pub use trainer::Trainer;
