use log::info;
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use super::Dataset;
use crate::{ForecastErr, Result};

/// How samples are assigned to the train and test subsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// The earliest samples train, the latest ones test. No look-ahead.
    #[default]
    Chronological,
    /// Samples are assigned after a random permutation.
    ///
    /// On a time series this leaks future values into training, since overlapping
    /// windows from after a test sample may land in the train subset.
    Shuffled,
}

impl Dataset {
    /// Partitions the samples into a train and a test subset.
    ///
    /// The train subset gets `floor(ratio * len)` samples and the test subset the rest, so
    /// no sample is dropped or duplicated.
    ///
    /// # Arguments
    /// * `ratio` - The fraction of samples that goes to the train subset, within `[0, 1]`.
    /// * `mode` - The assignment policy.
    /// * `rng` - The random source, only consumed by `SplitMode::Shuffled`.
    ///
    /// # Returns
    /// A tuple of (train, test) or `InvalidConfiguration` if the ratio is out of range.
    pub fn split<R>(&self, ratio: f32, mode: SplitMode, rng: &mut R) -> Result<(Self, Self)>
    where
        R: Rng + ?Sized,
    {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ForecastErr::config(format!(
                "split ratio ({ratio}) must be within [0, 1]"
            )));
        }

        let len = self.len();
        let train_len = ((ratio as f64) * len as f64).floor() as usize;
        let mut order: Vec<usize> = (0..len).collect();

        if mode == SplitMode::Shuffled {
            order.shuffle(rng);
        }

        let (train, test) = order.split_at(train_len);
        info!(
            "split dataset ({mode:?}): train={} test={}",
            train.len(),
            test.len()
        );

        Ok((self.subset(train), self.subset(test)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn dataset() -> Dataset {
        let series: Vec<f32> = (0..53).map(|v| v as f32).collect();
        Dataset::from_series(&series, 3, 1).unwrap()
    }

    #[test]
    fn chronological_split_keeps_time_order() {
        let ds = dataset();
        let mut rng = StdRng::seed_from_u64(7);
        let (train, test) = ds.split(0.8, SplitMode::Chronological, &mut rng).unwrap();

        assert_eq!(train.len(), 40);
        assert_eq!(test.len(), 10);

        let (_, last_train) = train.get(train.len() - 1).unwrap();
        let (_, first_test) = test.get(0).unwrap();
        assert!(last_train[0] < first_test[0]);
        assert_eq!(first_test[0], 43.0);
    }

    #[test]
    fn split_sizes_always_add_up() {
        let ds = dataset();
        let mut rng = StdRng::seed_from_u64(11);

        for mode in [SplitMode::Chronological, SplitMode::Shuffled] {
            for step in 0..=20 {
                let ratio = step as f32 / 20.0;
                let (train, test) = ds.split(ratio, mode, &mut rng).unwrap();
                assert_eq!(train.len() + test.len(), ds.len());
            }
        }
    }

    #[test]
    fn shuffled_split_neither_drops_nor_duplicates() {
        let ds = dataset();
        let mut rng = StdRng::seed_from_u64(3);
        let (train, test) = ds.split(0.5, SplitMode::Shuffled, &mut rng).unwrap();

        let mut targets: Vec<f32> = train.y().iter().chain(test.y().iter()).copied().collect();
        targets.sort_by(f32::total_cmp);

        let expected: Vec<f32> = ds.y().iter().copied().collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn ratio_out_of_range_fails() {
        let ds = dataset();
        let mut rng = StdRng::seed_from_u64(0);

        for ratio in [-0.1, 1.5, f32::NAN] {
            assert!(matches!(
                ds.split(ratio, SplitMode::Chronological, &mut rng),
                Err(ForecastErr::InvalidConfiguration(_))
            ));
        }
    }
}
