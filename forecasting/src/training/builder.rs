use rand::{SeedableRng, rngs::StdRng};

use super::{ModelTrainer, Trainer};
use crate::{
    ForecastErr, Result,
    arch::{
        Model, ParamInit, Sequential,
        activations::ActFn,
        loss::{LossFn, Mse},
    },
    optimization::{Adam, GradientDescent, GradientDescentWithMomentum, Optimizer},
    specs::{ActFnSpec, InitSpec, LossFnSpec, ModelSpec, OptimizerSpec, TrainerSpec},
};

/// Builds `Trainer`s given a specification.
#[derive(Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `Trainer` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the trainer.
    /// * `dim` - The (input, output) widths of the model, the window length and the horizon.
    ///
    /// # Returns
    /// A boxed trainer or `InvalidConfiguration` if any part of the spec is out of its domain.
    pub fn build(&self, spec: &TrainerSpec, dim: (usize, usize)) -> Result<Box<dyn Trainer>> {
        let mut rng = generate_rng(spec.seed);
        self.build_with_rng(spec, dim, &mut rng)
    }

    /// Builds a new `Trainer` drawing its weights and shuffling stream from `rng` instead of
    /// seeding a new one from `spec.seed`.
    pub fn build_with_rng(
        &self,
        spec: &TrainerSpec,
        dim: (usize, usize),
        rng: &mut StdRng,
    ) -> Result<Box<dyn Trainer>> {
        self.resolve_model(spec, dim, rng)
    }

    fn resolve_model(
        &self,
        spec: &TrainerSpec,
        (input, output): (usize, usize),
        rng: &mut StdRng,
    ) -> Result<Box<dyn Trainer>> {
        match &spec.model {
            ModelSpec::Mlp {
                hidden,
                act_fn,
                init,
            } => {
                let widths: Vec<usize> = std::iter::once(input)
                    .chain(hidden.iter().copied())
                    .chain(std::iter::once(output))
                    .collect();

                let act_fn = self.resolve_act_fn(*act_fn);
                let init = self.resolve_init(*init);
                let model = Sequential::mlp(&widths, act_fn, init, rng)?;
                self.resolve_optimizer(spec, model, rng)
            }
        }
    }

    fn resolve_act_fn(&self, spec: ActFnSpec) -> ActFn {
        match spec {
            ActFnSpec::Tanh => ActFn::tanh(),
            ActFnSpec::Sigmoid { amp } => ActFn::sigmoid(amp),
        }
    }

    fn resolve_init(&self, spec: InitSpec) -> ParamInit {
        match spec {
            InitSpec::XavierUniform => ParamInit::XavierUniform,
            InitSpec::LecunNormal => ParamInit::LecunNormal,
            InitSpec::Const { value } => ParamInit::Const(value),
        }
    }

    fn resolve_optimizer<M>(
        &self,
        spec: &TrainerSpec,
        model: M,
        rng: &mut StdRng,
    ) -> Result<Box<dyn Trainer>>
    where
        M: Model + 'static,
    {
        let len = model.size();

        match spec.optimizer {
            OptimizerSpec::GradientDescent { learning_rate } => {
                check_learning_rate(learning_rate)?;
                let optimizer = GradientDescent::new(learning_rate);
                self.resolve_loss(spec, model, optimizer, rng)
            }
            OptimizerSpec::GradientDescentWithMomentum {
                learning_rate,
                momentum,
            } => {
                check_learning_rate(learning_rate)?;
                check_unit_interval("momentum", momentum)?;
                let optimizer = GradientDescentWithMomentum::new(len, learning_rate, momentum);
                self.resolve_loss(spec, model, optimizer, rng)
            }
            OptimizerSpec::Adam {
                learning_rate,
                beta1,
                beta2,
                epsilon,
            } => {
                check_learning_rate(learning_rate)?;
                check_unit_interval("beta1", beta1)?;
                check_unit_interval("beta2", beta2)?;
                if !(epsilon.is_finite() && epsilon > 0.) {
                    return Err(ForecastErr::config(format!(
                        "epsilon must be a positive number, got {epsilon}"
                    )));
                }

                let optimizer = Adam::new(len, learning_rate, beta1, beta2, epsilon);
                self.resolve_loss(spec, model, optimizer, rng)
            }
        }
    }

    fn resolve_loss<M, O>(
        &self,
        spec: &TrainerSpec,
        model: M,
        optimizer: O,
        rng: &mut StdRng,
    ) -> Result<Box<dyn Trainer>>
    where
        M: Model + 'static,
        O: Optimizer + 'static,
    {
        match spec.loss {
            LossFnSpec::Mse => {
                let loss = Mse::new();
                self.terminate_build(spec, model, optimizer, loss, rng)
            }
        }
    }

    fn terminate_build<M, O, L>(
        &self,
        spec: &TrainerSpec,
        model: M,
        optimizer: O,
        loss: L,
        rng: &mut StdRng,
    ) -> Result<Box<dyn Trainer>>
    where
        M: Model + 'static,
        O: Optimizer + 'static,
        L: LossFn + 'static,
    {
        // The shuffling stream continues where initialization left off.
        let rng = StdRng::from_rng(rng);

        let trainer = ModelTrainer::new(
            model,
            optimizer,
            loss,
            spec.epochs,
            spec.batch_size,
            rng,
        )?;

        Ok(Box::new(trainer))
    }
}

/// Creates the random number generator for a run, seeded from the OS when `seed` is `None`.
pub fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn check_learning_rate(learning_rate: f32) -> Result<()> {
    if !(learning_rate.is_finite() && learning_rate > 0.) {
        return Err(ForecastErr::config(format!(
            "learning_rate must be a positive number, got {learning_rate}"
        )));
    }

    Ok(())
}

fn check_unit_interval(name: &str, value: f32) -> Result<()> {
    if !(0. ..1.).contains(&value) {
        return Err(ForecastErr::config(format!(
            "{name} must be within [0, 1), got {value}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use rand::seq::SliceRandom;

    fn spec() -> TrainerSpec {
        TrainerSpec {
            model: ModelSpec::Mlp {
                hidden: vec![4],
                act_fn: ActFnSpec::Tanh,
                init: InitSpec::XavierUniform,
            },
            optimizer: OptimizerSpec::GradientDescent { learning_rate: 0.1 },
            loss: LossFnSpec::Mse,
            epochs: 2,
            batch_size: 4,
            seed: Some(1),
        }
    }

    #[test]
    fn builds_a_model_with_the_given_widths() {
        let trainer = TrainerBuilder::new().build(&spec(), (3, 2)).unwrap();

        assert_eq!(trainer.params().len(), (3 + 1) * 4 + (4 + 1) * 2);
    }

    #[test]
    fn same_seed_same_initial_model() {
        let a = TrainerBuilder::new().build(&spec(), (3, 1)).unwrap();
        let b = TrainerBuilder::new().build(&spec(), (3, 1)).unwrap();

        assert_eq!(a.params(), b.params());
    }

    #[test]
    fn build_with_rng_continues_the_given_stream() {
        let builder = TrainerBuilder::new();
        let fresh = builder.build(&spec(), (3, 1)).unwrap();

        let mut rng = generate_rng(spec().seed);
        let same = builder.build_with_rng(&spec(), (3, 1), &mut rng).unwrap();
        assert_eq!(fresh.params(), same.params());

        let mut rng = generate_rng(spec().seed);
        let mut order: Vec<usize> = (0..10).collect();
        order.shuffle(&mut rng);
        let advanced = builder.build_with_rng(&spec(), (3, 1), &mut rng).unwrap();
        assert_ne!(fresh.params(), advanced.params());
    }

    #[test]
    fn invalid_hyperparameters_fail() {
        let builder = TrainerBuilder::new();
        let optimizers = [
            OptimizerSpec::GradientDescent { learning_rate: 0. },
            OptimizerSpec::GradientDescent {
                learning_rate: f32::NAN,
            },
            OptimizerSpec::GradientDescentWithMomentum {
                learning_rate: 0.1,
                momentum: 1.,
            },
            OptimizerSpec::Adam {
                learning_rate: 0.1,
                beta1: 0.9,
                beta2: 0.999,
                epsilon: 0.,
            },
        ];

        for optimizer in optimizers {
            let spec = TrainerSpec {
                optimizer,
                ..spec()
            };

            assert!(matches!(
                builder.build(&spec, (3, 1)),
                Err(ForecastErr::InvalidConfiguration(_))
            ));
        }

        let spec = TrainerSpec {
            epochs: 0,
            ..spec()
        };
        assert!(matches!(
            builder.build(&spec, (3, 1)),
            Err(ForecastErr::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn built_trainer_trains() {
        let mut trainer = TrainerBuilder::new().build(&spec(), (2, 1)).unwrap();
        let data = vec![0.1, 0.2, 0.3, 0.2, 0.3, 0.4, 0.3, 0.4, 0.5];
        let dataset = Dataset::new(data, 2, 1).unwrap();

        let history = trainer.train(&dataset, None).unwrap();
        assert_eq!(history.epochs(), 2);
    }
}
