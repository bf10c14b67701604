use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::{ForecastErr, Result};

/// How the weights of a `Dense` layer are drawn. Biases always start at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ParamInit {
    /// Uniform within `±sqrt(6 / (fan_in + fan_out))`.
    #[default]
    XavierUniform,
    /// Normal with a standard deviation of `sqrt(1 / fan_in)`.
    LecunNormal,
    /// Every weight takes the same value.
    Const(f32),
}

impl ParamInit {
    /// Samples the `fan_in * fan_out` weights of a layer.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `fan_in` - The number of input units of the layer.
    /// * `fan_out` - The number of output units of the layer.
    ///
    /// # Returns
    /// The weights or `InvalidConfiguration` if the distribution can't be built.
    pub fn sample<R>(&self, rng: &mut R, fan_in: usize, fan_out: usize) -> Result<Vec<f32>>
    where
        R: Rng + ?Sized,
    {
        let n = fan_in * fan_out;

        match *self {
            ParamInit::XavierUniform => {
                let range = (6. / (fan_in + fan_out) as f32).sqrt();
                let distribution = Uniform::new(-range, range)
                    .map_err(|e| ForecastErr::config(format!("xavier uniform init: {e}")))?;
                Ok(sample_n(&distribution, rng, n))
            }
            ParamInit::LecunNormal => {
                let std_dev = (1. / fan_in as f32).sqrt();
                let distribution = Normal::new(0., std_dev)
                    .map_err(|e| ForecastErr::config(format!("lecun normal init: {e}")))?;
                Ok(sample_n(&distribution, rng, n))
            }
            ParamInit::Const(value) => Ok(vec![value; n]),
        }
    }
}

fn sample_n<D, R>(distribution: &D, rng: &mut R, n: usize) -> Vec<f32>
where
    D: Distribution<f32>,
    R: Rng + ?Sized,
{
    (0..n).map(|_| distribution.sample(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn xavier_uniform_stays_within_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let weights = ParamInit::XavierUniform.sample(&mut rng, 4, 2).unwrap();
        let range = (6f32 / 6.).sqrt();

        assert_eq!(weights.len(), 8);
        assert!(weights.iter().all(|w| w.abs() <= range));
    }

    #[test]
    fn same_seed_same_weights() {
        let a = ParamInit::LecunNormal
            .sample(&mut StdRng::seed_from_u64(1), 3, 3)
            .unwrap();
        let b = ParamInit::LecunNormal
            .sample(&mut StdRng::seed_from_u64(1), 3, 3)
            .unwrap();

        assert_eq!(a, b);
    }
}
