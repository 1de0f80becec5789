use std::cmp::Ordering;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use envconfig::Envconfig;

use crate::error::ConfigError;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(default = "data")]
    pub data_dir: PathBuf,

    // Browse range for total_spend, customers outside it are hidden by default.
    #[envconfig(default = "0")]
    pub spend_range_min: f64,
    #[envconfig(default = "5000")]
    pub spend_range_max: f64,

    #[envconfig(default = "10")]
    pub suggestion_pool: usize,
    #[envconfig(default = "5")]
    pub suggestion_count: usize,

    #[envconfig(default = "5")]
    pub interest_pool: usize,
    #[envconfig(default = "3")]
    pub interest_count: usize,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.spend_range_min.partial_cmp(&self.spend_range_max);
        if matches!(ordered, None | Some(Ordering::Greater)) {
            return Err(ConfigError::InvertedSpendRange {
                min: self.spend_range_min,
                max: self.spend_range_max,
            });
        }
        for (name, value) in [
            ("SUGGESTION_POOL", self.suggestion_pool),
            ("SUGGESTION_COUNT", self.suggestion_count),
            ("INTEREST_POOL", self.interest_pool),
            ("INTEREST_COUNT", self.interest_count),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroSize(name));
            }
        }
        Ok(())
    }

    pub fn spend_range(&self) -> RangeInclusive<f64> {
        self.spend_range_min..=self.spend_range_max
    }

    pub fn sampler_policy(&self) -> crate::recommend::SamplerPolicy {
        crate::recommend::SamplerPolicy {
            pool: self.suggestion_pool,
            count: self.suggestion_count,
        }
    }

    pub fn default_test_config() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            spend_range_min: 0.0,
            spend_range_max: 5000.0,
            suggestion_pool: 10,
            suggestion_count: 5,
            interest_pool: 5,
            interest_count: 3,
        }
    }
}
