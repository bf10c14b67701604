mod synthetic;

use std::{env, fs};

use anyhow::Context;
use forecasting::{forecast, specs::ForecastSpec};
use log::info;
use serde::Serialize;

use synthetic::PriceModel;

const SERIES_DAYS: usize = 500;
const SERIES_SEED: u64 = 7;

#[derive(Serialize)]
struct Summary<'a> {
    train_samples: usize,
    test_samples: usize,
    train_losses: &'a [f32],
    val_losses: &'a [f32],
    last_close: f32,
    next_close: &'a [f32],
}

fn load_spec() -> anyhow::Result<ForecastSpec> {
    let Some(path) = env::args().nth(1) else {
        info!("no config given, using defaults");
        return Ok(ForecastSpec::default());
    };

    let raw = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let spec = serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;
    info!("loaded config from {path}");
    Ok(spec)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = load_spec()?;
    let series = PriceModel::default().generate(SERIES_DAYS, SERIES_SEED)?;
    info!("generated {} synthetic closing prices", series.len());

    let report = forecast(&spec, &series)?;

    for (epoch, loss) in report.history().train_losses().iter().enumerate() {
        match report.history().val_losses().get(epoch) {
            Some(val) => info!("epoch {epoch}: train_loss={loss:.6} val_loss={val:.6}"),
            None => info!("epoch {epoch}: train_loss={loss:.6}"),
        }
    }

    let last_window = &series[series.len() - spec.window..];
    let next_close = report.predict_next(last_window)?;

    let summary = Summary {
        train_samples: report.train_len(),
        test_samples: report.test_len(),
        train_losses: report.history().train_losses(),
        val_losses: report.history().val_losses(),
        last_close: series[series.len() - 1],
        next_close: &next_close,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
