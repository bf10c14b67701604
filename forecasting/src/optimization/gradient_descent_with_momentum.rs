use ndarray::{ArrayView1, ArrayViewMut1, Zip};

use super::{Optimizer, optimizer::check_len};
use crate::Result;

/// Gradient descent that keeps a decaying sum of past gradients as its step direction.
#[derive(Debug, Clone)]
pub struct GradientDescentWithMomentum {
    learning_rate: f32,
    momentum: f32,
    velocity: Box<[f32]>,
}

impl GradientDescentWithMomentum {
    /// Creates a new `GradientDescentWithMomentum` optimizer.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    /// * `momentum` - The fraction of the previous velocity kept on each update.
    pub fn new(len: usize, learning_rate: f32, momentum: f32) -> Self {
        Self {
            learning_rate,
            momentum,
            velocity: vec![0.; len].into_boxed_slice(),
        }
    }
}

impl Optimizer for GradientDescentWithMomentum {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        check_len(grad, params)?;
        check_len(&self.velocity, params)?;

        let (lr, mu) = (self.learning_rate, self.momentum);

        Zip::from(ArrayViewMut1::from(params))
            .and(ArrayView1::from(grad))
            .and(ArrayViewMut1::from(&mut self.velocity[..]))
            .for_each(|p, &g, v| {
                *v = mu * *v + g;
                *p -= lr * *v;
            });

        Ok(())
    }
}
