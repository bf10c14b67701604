use forecasting::{
    ForecastErr, forecast,
    specs::{ForecastSpec, ModelSpec, OptimizerSpec, SplitSpec, TrainerSpec},
};

fn prices(len: usize) -> Vec<f32> {
    (0..len)
        .map(|t| {
            let t = t as f32;
            100. + 0.05 * t + 3. * (t * 0.2).sin()
        })
        .collect()
}

fn spec() -> ForecastSpec {
    ForecastSpec {
        window: 8,
        horizon: 1,
        split: SplitSpec::default(),
        trainer: TrainerSpec {
            model: ModelSpec::Mlp {
                hidden: vec![6],
                act_fn: Default::default(),
                init: Default::default(),
            },
            optimizer: OptimizerSpec::Adam {
                learning_rate: 0.01,
                beta1: 0.9,
                beta2: 0.999,
                epsilon: 1e-8,
            },
            epochs: 15,
            batch_size: 16,
            seed: Some(3),
            ..Default::default()
        },
    }
}

#[test]
fn forecast_trains_and_predicts_in_price_units() {
    let series = prices(120);
    let report = forecast(&spec(), &series).unwrap();

    assert_eq!(report.train_len() + report.test_len(), 120 - 8);
    assert_eq!(report.train_len(), (0.8 * 112.0_f32).floor() as usize);
    assert_eq!(report.history().epochs(), 15);
    assert_eq!(report.history().val_losses().len(), 15);

    let next = report.predict_next(&series[series.len() - 8..]).unwrap();
    assert_eq!(next.len(), 1);
    assert!(next[0].is_finite());
    assert!(next[0] > 50. && next[0] < 150., "prediction {next:?}");
}

#[test]
fn same_seed_same_report() {
    let series = prices(80);
    let a = forecast(&spec(), &series).unwrap();
    let b = forecast(&spec(), &series).unwrap();

    assert_eq!(a.history(), b.history());
    assert_eq!(a.params(), b.params());
}

#[test]
fn full_train_split_skips_validation() {
    let spec = ForecastSpec {
        split: SplitSpec {
            ratio: 1.0,
            ..Default::default()
        },
        ..spec()
    };
    let report = forecast(&spec, &prices(60)).unwrap();

    assert_eq!(report.test_len(), 0);
    assert!(report.history().val_losses().is_empty());
}

#[test]
fn series_shorter_than_a_window_fails() {
    let err = forecast(&spec(), &prices(5)).err().unwrap();
    assert!(matches!(err, ForecastErr::InvalidConfiguration(_)));
}

#[test]
fn predict_next_checks_the_window_length() {
    let report = forecast(&spec(), &prices(60)).unwrap();

    assert!(matches!(
        report.predict_next(&[1.0, 2.0]),
        Err(ForecastErr::DimensionMismatch { .. })
    ));
}

#[test]
fn zero_ratio_leaves_nothing_to_train_on() {
    let spec = ForecastSpec {
        split: SplitSpec {
            ratio: 0.0,
            ..Default::default()
        },
        ..spec()
    };

    assert_eq!(
        forecast(&spec, &prices(60)).err(),
        Some(ForecastErr::EmptyDataset("training"))
    );
}
