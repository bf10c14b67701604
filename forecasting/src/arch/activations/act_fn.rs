use super::{Sigmoid, Tanh};

/// The non-linearity applied after a hidden `Dense` layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActFn {
    Tanh(Tanh),
    Sigmoid(Sigmoid),
}

impl ActFn {
    pub fn tanh() -> Self {
        Self::Tanh(Tanh)
    }

    pub fn sigmoid(amp: f32) -> Self {
        Self::Sigmoid(Sigmoid::new(amp))
    }

    /// Evaluates the function at `z`.
    pub fn f(&self, z: f32) -> f32 {
        match self {
            Self::Tanh(a) => a.f(z),
            Self::Sigmoid(a) => a.f(z),
        }
    }

    /// Evaluates the derivative at `z`.
    pub fn df(&self, z: f32) -> f32 {
        match self {
            Self::Tanh(a) => a.df(z),
            Self::Sigmoid(a) => a.df(z),
        }
    }
}

impl Default for ActFn {
    fn default() -> Self {
        Self::tanh()
    }
}
