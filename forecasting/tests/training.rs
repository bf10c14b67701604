use forecasting::{
    ForecastErr,
    arch::{Model, ParamInit, Sequential, activations::ActFn, loss::Mse},
    dataset::{Dataset, SplitMode},
    optimization::{Adam, GradientDescent},
    training::ModelTrainer,
};
use rand::{SeedableRng, rngs::StdRng};

fn linear_dataset() -> Dataset {
    let steps = [0.0_f32, 0.25, 0.5, 0.75, 1.0];
    let data = steps
        .iter()
        .flat_map(|&x1| steps.iter().map(move |&x2| [x1, x2, 2. * x1 - 3. * x2 + 0.5]))
        .flatten()
        .collect();

    Dataset::new(data, 2, 1).unwrap()
}

#[test]
fn no_hidden_layers_recovers_linear_coefficients() {
    let mut rng = StdRng::seed_from_u64(11);
    let model = Sequential::mlp(&[2, 1], ActFn::tanh(), ParamInit::default(), &mut rng).unwrap();
    let mut trainer =
        ModelTrainer::new(model, GradientDescent::new(0.1), Mse, 500, 8, rng).unwrap();

    let history = trainer.train(&linear_dataset(), None).unwrap();

    // [w1, w2, b]
    let params = trainer.model().params();
    let expected = [2., -3., 0.5];
    for (got, want) in params.iter().zip(expected) {
        assert!((got - want).abs() < 1e-2, "got {params:?}, want {expected:?}");
    }
    assert!(history.last_train_loss().unwrap() < 1e-4);
}

#[test]
fn loss_decreases_on_a_sine_wave() {
    let series: Vec<f32> = (0..200).map(|t| (t as f32 * 0.1).sin()).collect();
    let dataset = Dataset::from_series(&series, 10, 1).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let (train, test) = dataset
        .split(0.8, SplitMode::Chronological, &mut rng)
        .unwrap();

    let model = Sequential::mlp(&[10, 8, 1], ActFn::tanh(), ParamInit::default(), &mut rng).unwrap();
    let optimizer = Adam::with_defaults(model.size(), 0.01);
    let mut trainer = ModelTrainer::new(model, optimizer, Mse, 30, 16, rng).unwrap();

    let history = trainer.train(&train, Some(&test)).unwrap();
    let losses = history.train_losses();

    assert_eq!(losses.len(), 30);
    assert_eq!(history.val_losses().len(), 30);
    assert!(losses.iter().all(|&l| l >= 0.));
    assert!(losses[29] < losses[0], "losses: {losses:?}");
}

#[test]
fn invalid_trainer_settings_fail_before_training() {
    let mut rng = StdRng::seed_from_u64(0);
    let model = Sequential::mlp(&[2, 1], ActFn::tanh(), ParamInit::default(), &mut rng).unwrap();

    let err = ModelTrainer::new(model.clone(), GradientDescent::new(0.1), Mse, 0, 8, rng.clone())
        .err()
        .unwrap();
    assert!(matches!(err, ForecastErr::InvalidConfiguration(_)));

    let err = ModelTrainer::new(model, GradientDescent::new(0.1), Mse, 10, 0, rng)
        .err()
        .unwrap();
    assert!(matches!(err, ForecastErr::InvalidConfiguration(_)));
}

#[test]
fn batch_larger_than_dataset_is_a_single_step() {
    let mut rng = StdRng::seed_from_u64(2);
    let model = Sequential::mlp(&[2, 3, 1], ActFn::tanh(), ParamInit::default(), &mut rng).unwrap();
    let mut trainer =
        ModelTrainer::new(model, GradientDescent::new(0.1), Mse, 4, 1000, rng).unwrap();

    let history = trainer.train(&linear_dataset(), None).unwrap();
    assert_eq!(history.batches(), [1; 4]);
    assert_eq!(history.samples(), [25; 4]);
}
