use anyhow::{Context, Result};
use clap::Parser;
use market_pulse::models::ForestConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Symbols and history windows
    #[serde(default)]
    pub market: MarketConfig,

    /// Direction classifier parameters
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub backtest: BacktestConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Symbol the model is trained on and the report describes
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Volatility gauge symbol
    #[serde(default = "default_volatility_symbol")]
    pub volatility_symbol: String,

    /// Directory holding one `<symbol>.txt` history file per symbol
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Calendar days of history used for training and backtesting
    #[serde(default = "default_training_lookback_days")]
    pub training_lookback_days: u32,

    /// Calendar days of history used for the trend/levels outlook
    #[serde(default = "default_outlook_lookback_days")]
    pub outlook_lookback_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Trailing rows held out for testing and backtesting
    #[serde(default = "default_test_days")]
    pub test_days: usize,

    #[serde(default = "default_n_trees")]
    pub n_trees: usize,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for the report and backtest files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_symbol() -> String {
    "SPY".to_string()
}

fn default_volatility_symbol() -> String {
    "VXX".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_training_lookback_days() -> u32 {
    3 * 365
}

fn default_outlook_lookback_days() -> u32 {
    2 * 365
}

fn default_test_days() -> usize {
    180
}

fn default_n_trees() -> usize {
    ForestConfig::default().n_trees
}

fn default_max_depth() -> usize {
    ForestConfig::default().max_depth
}

fn default_seed() -> u64 {
    ForestConfig::default().seed
}

fn default_initial_capital() -> f64 {
    100_000.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            volatility_symbol: default_volatility_symbol(),
            data_dir: default_data_dir(),
            training_lookback_days: default_training_lookback_days(),
            outlook_lookback_days: default_outlook_lookback_days(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            test_days: default_test_days(),
            n_trees: default_n_trees(),
            max_depth: default_max_depth(),
            seed: default_seed(),
        }
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: default_initial_capital(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "daily_outlook")]
#[command(about = "Daily market outlook: indicators, direction model, backtest and key levels")]
pub struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory with market history files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Symbol to analyze
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Trailing days held out for testing and backtesting
    #[arg(long)]
    pub test_days: Option<usize>,

    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the config file named by `args` (or defaults), apply command-line
    /// overrides and validate the result.
    pub fn load(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Command-line values take precedence over file values
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(dir) = &args.data_dir {
            self.market.data_dir = dir.clone();
        }
        if let Some(symbol) = &args.symbol {
            self.market.symbol = symbol.clone();
        }
        if let Some(test_days) = args.test_days {
            self.model.test_days = test_days;
        }
        if let Some(dir) = &args.output_dir {
            self.output.output_dir = dir.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.market.symbol.trim().is_empty() {
            anyhow::bail!("symbol must not be empty");
        }
        if self.market.volatility_symbol.trim().is_empty() {
            anyhow::bail!("volatility_symbol must not be empty");
        }
        if self.market.training_lookback_days == 0 {
            anyhow::bail!("training_lookback_days must be greater than 0");
        }
        if self.market.outlook_lookback_days == 0 {
            anyhow::bail!("outlook_lookback_days must be greater than 0");
        }
        if self.model.test_days == 0 {
            anyhow::bail!("test_days must be greater than 0");
        }
        if self.model.n_trees == 0 {
            anyhow::bail!("n_trees must be greater than 0");
        }
        if self.model.max_depth == 0 {
            anyhow::bail!("max_depth must be greater than 0");
        }
        if !(self.backtest.initial_capital > 0.0) || !self.backtest.initial_capital.is_finite() {
            anyhow::bail!(
                "initial_capital must be positive, got {}",
                self.backtest.initial_capital
            );
        }
        Ok(())
    }

    /// Random forest settings for the direction classifier
    pub fn forest(&self) -> ForestConfig {
        ForestConfig {
            n_trees: self.model.n_trees,
            max_depth: self.model.max_depth,
            seed: self.model.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.market.symbol, "SPY");
        assert_eq!(config.market.volatility_symbol, "VXX");
        assert_eq!(config.market.training_lookback_days, 1095);
        assert_eq!(config.market.outlook_lookback_days, 730);
        assert_eq!(config.model.test_days, 180);
        assert_eq!(config.backtest.initial_capital, 100_000.0);
        assert_eq!(config.forest(), ForestConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[market]
symbol = "QQQ"
data_dir = "/tmp/bars"

[model]
test_days = 60
n_trees = 25
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.market.symbol, "QQQ");
        assert_eq!(config.market.volatility_symbol, "VXX");
        assert_eq!(config.market.data_dir, PathBuf::from("/tmp/bars"));
        assert_eq!(config.model.test_days, 60);
        assert_eq!(config.model.n_trees, 25);
        assert_eq!(config.model.max_depth, 5);
        assert_eq!(config.output.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/outlook.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_args_override_file() {
        let mut config = Config::default();
        let args = Args {
            symbol: Some("IWM".to_string()),
            test_days: Some(30),
            output_dir: Some(PathBuf::from("reports")),
            ..Default::default()
        };
        config.apply_args(&args);

        assert_eq!(config.market.symbol, "IWM");
        assert_eq!(config.model.test_days, 30);
        assert_eq!(config.output.output_dir, PathBuf::from("reports"));
        assert_eq!(config.market.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.market.symbol = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model.test_days = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.backtest.initial_capital = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.backtest.initial_capital = f64::INFINITY;
        assert!(config.validate().is_err());
    }
}
