pub mod activations;
mod init;
pub mod layers;
pub mod loss;
mod model;
mod params;
mod sequential;

pub use init::ParamInit;
pub use model::{Model, PassStats};
pub use params::{BackIter, FrontIter, ParamStore};
pub use sequential::Sequential;
