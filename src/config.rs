use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Gameplay tuning parameters.
///
/// Loaded from a TOML file and validated before use.
/// Every section and field is optional and falls back to [`Config::default`].
#[derive(Debug, PartialEq, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub start: StartConfig,
    pub prices: PriceConfig,
    pub rules: RuleConfig,
}

/// State of a freshly opened zoo.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    pub money: i64,
    pub food: u32,
    pub popularity: i32,
}

/// Fixed prices charged by purchase and building actions.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct PriceConfig {
    /// Price of one unit of food.
    pub food: i64,
    pub advertisement: i64,
    /// Price of a manual shop refresh.
    pub shop_refresh: i64,
    pub enclosure: i64,
    pub breeding_enclosure: i64,
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Day on which the game is won.
    pub win_day: u32,
    /// Maximum number of employees, director included.
    pub max_employees: usize,
    /// Day from which animal purchases are rationed.
    pub purchase_limit_day: u32,
    /// Animals that may be bought per day once rationing applies.
    pub animals_per_day: u32,

    /// Death probability of each animal on a day without enough food.
    pub starvation_death_prob: f64,
    /// Probability of each healthy animal falling sick on a given day.
    pub sickness_prob: f64,
    /// Death probability of each sick animal in an enclosure with a sick majority.
    pub epidemic_death_prob: f64,

    pub advertisement_popularity: i32,
    pub advertisement_visitors: i32,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            money: 100_000,
            food: 10,
            popularity: 50,
        }
    }
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            food: 5,
            advertisement: 1000,
            shop_refresh: 1000,
            enclosure: 500,
            breeding_enclosure: 800,
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            win_day: 30,
            max_employees: 5,
            purchase_limit_day: 10,
            animals_per_day: 1,
            starvation_death_prob: 0.1,
            sickness_prob: 0.1,
            epidemic_death_prob: 0.5,
            advertisement_popularity: 5,
            advertisement_visitors: 10,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a [`Config`] from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_num(self.start.money, 0..=1_000_000_000).context("invalid starting money")?;
        check_num(self.start.food, 0..=1_000_000).context("invalid starting food")?;
        check_num(self.start.popularity, 10..=100).context("invalid starting popularity")?;

        check_num(self.prices.food, 1..=10_000).context("invalid food price")?;
        check_num(self.prices.advertisement, 0..=1_000_000)
            .context("invalid advertisement price")?;
        check_num(self.prices.shop_refresh, 0..=1_000_000)
            .context("invalid shop refresh price")?;
        check_num(self.prices.enclosure, 0..=1_000_000).context("invalid enclosure price")?;
        check_num(self.prices.breeding_enclosure, 0..=1_000_000)
            .context("invalid breeding enclosure price")?;

        check_num(self.rules.win_day, 1..=10_000).context("invalid win day")?;
        check_num(self.rules.max_employees, 1..=100).context("invalid maximum employees")?;
        check_num(self.rules.purchase_limit_day, 0..=10_000)
            .context("invalid purchase limit day")?;
        check_num(self.rules.animals_per_day, 1..=100).context("invalid animals per day")?;

        check_num(self.rules.starvation_death_prob, 0.0..=1.0)
            .context("invalid starvation death probability")?;
        check_num(self.rules.sickness_prob, 0.0..=1.0)
            .context("invalid sickness probability")?;
        check_num(self.rules.epidemic_death_prob, 0.0..=1.0)
            .context("invalid epidemic death probability")?;

        check_num(self.rules.advertisement_popularity, 0..=100)
            .context("invalid advertisement popularity boost")?;
        check_num(self.rules.advertisement_visitors, 0..=10_000)
            .context("invalid advertisement visitor boost")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
