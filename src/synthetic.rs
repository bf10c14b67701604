use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

/// Shape of a synthetic daily closing price series.
pub struct PriceModel {
    pub start: f32,
    /// Drift per day.
    pub trend: f32,
    /// Amplitude and period, in days, of the seasonal component.
    pub season: (f32, f32),
    /// Standard deviation of the daily noise.
    pub noise: f32,
}

impl Default for PriceModel {
    fn default() -> Self {
        Self {
            start: 100.,
            trend: 0.05,
            season: (4., 30.),
            noise: 0.5,
        }
    }
}

impl PriceModel {
    /// Generates `days` closing prices, the same ones for the same `seed`.
    pub fn generate(&self, days: usize, seed: u64) -> anyhow::Result<Vec<f32>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0., self.noise)?;
        let (amp, period) = self.season;

        let series = (0..days)
            .map(|day| {
                let t = day as f32;
                let seasonal = amp * (2. * std::f32::consts::PI * t / period).sin();
                self.start + self.trend * t + seasonal + noise.sample(&mut rng)
            })
            .collect();

        Ok(series)
    }
}
