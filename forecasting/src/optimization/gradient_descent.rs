use super::{Optimizer, optimizer::check_len};
use crate::Result;

/// Gradient descent optimization algorithm.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Creates a new `GradientDescent` optimizer.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    /// Makes a step in the opposite direction of the gradient, with a length of `learning_rate`.
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        check_len(grad, params)?;

        let lr = self.learning_rate;

        for (p, g) in params.iter_mut().zip(grad) {
            *p -= lr * g;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ForecastErr;

    #[test]
    fn steps_against_the_gradient() {
        let mut gd = GradientDescent::new(0.5);
        let mut params = [1.0, -1.0];

        gd.update_params(&[2.0, -4.0], &mut params).unwrap();
        assert_eq!(params, [0.0, 1.0]);
    }

    #[test]
    fn length_mismatch_fails() {
        let mut gd = GradientDescent::new(0.5);
        let mut params = [1.0, -1.0];

        assert!(matches!(
            gd.update_params(&[2.0], &mut params),
            Err(ForecastErr::DimensionMismatch { .. })
        ));
    }
}
