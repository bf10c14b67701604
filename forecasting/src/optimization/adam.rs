use ndarray::{ArrayView1, ArrayViewMut1, Zip};

use super::{Optimizer, optimizer::check_len};
use crate::Result;

/// Adam, gradient descent scaled by bias-corrected running moments of the gradient.
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    step: i32,
    // First and second moment estimates, one per parameter.
    m: Box<[f32]>,
    v: Box<[f32]>,
}

impl Adam {
    /// Creates a new `Adam` optimizer.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    /// * `beta1`, `beta2` - The decay rates of the first and second moment estimates.
    /// * `epsilon` - Keeps the update finite when the second moment is close to zero.
    pub fn new(len: usize, learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            step: 0,
            m: vec![0.; len].into_boxed_slice(),
            v: vec![0.; len].into_boxed_slice(),
        }
    }

    /// Creates a new `Adam` optimizer with the usual `0.9`, `0.999` and `1e-8` hyperparameters.
    pub fn with_defaults(len: usize, learning_rate: f32) -> Self {
        Self::new(len, learning_rate, 0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        check_len(grad, params)?;
        check_len(&self.m, params)?;

        self.step = self.step.saturating_add(1);

        let (lr, b1, b2, eps) = (self.learning_rate, self.beta1, self.beta2, self.epsilon);
        let m_correction = 1. / (1. - b1.powi(self.step));
        let v_correction = 1. / (1. - b2.powi(self.step));

        Zip::from(ArrayViewMut1::from(params))
            .and(ArrayView1::from(grad))
            .and(ArrayViewMut1::from(&mut self.m[..]))
            .and(ArrayViewMut1::from(&mut self.v[..]))
            .for_each(|p, &g, m, v| {
                *m = b1 * *m + (1. - b1) * g;
                *v = b2 * *v + (1. - b2) * g * g;

                let m_hat = *m * m_correction;
                let v_hat = *v * v_correction;
                *p -= lr * m_hat / (v_hat.sqrt() + eps);
            });

        Ok(())
    }
}
