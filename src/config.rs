//! Environment-driven configuration, loaded once at startup.
//!
//! Every knob has a default except the broadcast channel id. Anything
//! present but unparsable is a startup error rather than a silent default,
//! so a typo'd threshold cannot run the engine with surprise values.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_WATCH_LIST: &[&str] = &["BTC-USD", "ETH-USD", "AAPL", "GOOGL", "MSFT"];

/// Deployment environment name, used to pick log formatting.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "development".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Identifier of the shared broadcast channel. Required.
    pub broadcast_channel_id: String,
    /// Symbols analyzed every cycle.
    pub watch_list: Vec<String>,
    /// Candles requested per symbol per cycle.
    pub lookback_bars: usize,

    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,

    pub trial_days: i64,
    pub warning_days: i64,

    /// Gap between consecutive analysis cycles.
    pub analysis_interval: Duration,
    /// Local wall-clock time of the daily expiry sweep.
    pub sweep_hour: u32,
    pub sweep_minute: u32,
    /// Pause between consecutive signal distributions.
    pub signal_pacing: Duration,

    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let broadcast_channel_id = env::var("BROADCAST_CHANNEL_ID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("BROADCAST_CHANNEL_ID"))?;

        let watch_list = match env::var("WATCH_LIST") {
            Ok(raw) => {
                let symbols: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if symbols.is_empty() {
                    return Err(ConfigError::Invalid {
                        name: "WATCH_LIST",
                        value: raw,
                        reason: "no symbols after parsing".to_string(),
                    });
                }
                symbols
            }
            Err(_) => DEFAULT_WATCH_LIST.iter().map(|s| s.to_string()).collect(),
        };

        let lookback_bars = parse_or("LOOKBACK_BARS", 250usize)?;

        let rsi_period = parse_or("RSI_PERIOD", 14usize)?;
        let rsi_overbought = parse_or("RSI_OVERBOUGHT", 70.0f64)?;
        let rsi_oversold = parse_or("RSI_OVERSOLD", 30.0f64)?;
        let macd_fast = parse_or("MACD_FAST", 12usize)?;
        let macd_slow = parse_or("MACD_SLOW", 26usize)?;
        let macd_signal = parse_or("MACD_SIGNAL", 9usize)?;
        let bollinger_period = parse_or("BOLLINGER_PERIOD", 20usize)?;
        let bollinger_std_dev = parse_or("BOLLINGER_STD_DEV", 2.0f64)?;

        let trial_days = parse_or("TRIAL_DAYS", 3i64)?;
        let warning_days = parse_or("WARNING_DAYS", 1i64)?;

        let analysis_interval_seconds = parse_or("ANALYSIS_INTERVAL_SECONDS", 3600u64)?;
        let sweep_time = env::var("EXPIRY_SWEEP_TIME").unwrap_or_else(|_| "09:00".to_string());
        let (sweep_hour, sweep_minute) = parse_sweep_time(&sweep_time)?;
        let pacing_seconds = parse_or("SIGNAL_PACING_SECONDS", 2u64)?;

        let http_port = parse_or("PORT", 8080u16)?;

        let config = Self {
            broadcast_channel_id,
            watch_list,
            lookback_bars,
            rsi_period,
            rsi_overbought,
            rsi_oversold,
            macd_fast,
            macd_slow,
            macd_signal,
            bollinger_period,
            bollinger_std_dev,
            trial_days,
            warning_days,
            analysis_interval: Duration::from_secs(analysis_interval_seconds),
            sweep_hour,
            sweep_minute,
            signal_pacing: Duration::from_secs(pacing_seconds),
            http_port,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rsi_period == 0 {
            return Err(invalid("RSI_PERIOD", self.rsi_period, "must be > 0"));
        }
        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
        {
            return Err(invalid(
                "RSI_OVERSOLD",
                format!("{}/{}", self.rsi_oversold, self.rsi_overbought),
                "thresholds must lie within 0..=100",
            ));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(invalid(
                "RSI_OVERSOLD",
                format!("{}/{}", self.rsi_oversold, self.rsi_overbought),
                "oversold must be below overbought",
            ));
        }
        if self.macd_fast == 0 || self.macd_signal == 0 {
            return Err(invalid("MACD_FAST", self.macd_fast, "periods must be > 0"));
        }
        if self.macd_slow <= self.macd_fast {
            return Err(invalid(
                "MACD_SLOW",
                format!("{}/{}", self.macd_fast, self.macd_slow),
                "slow period must exceed fast period",
            ));
        }
        if self.bollinger_period == 0 {
            return Err(invalid(
                "BOLLINGER_PERIOD",
                self.bollinger_period,
                "must be > 0",
            ));
        }
        if self.bollinger_std_dev <= 0.0 {
            return Err(invalid(
                "BOLLINGER_STD_DEV",
                self.bollinger_std_dev,
                "must be > 0",
            ));
        }
        if self.trial_days <= 0 {
            return Err(invalid("TRIAL_DAYS", self.trial_days, "must be > 0"));
        }
        if self.warning_days < 0 {
            return Err(invalid("WARNING_DAYS", self.warning_days, "must be >= 0"));
        }
        if self.analysis_interval.is_zero() {
            return Err(invalid(
                "ANALYSIS_INTERVAL_SECONDS",
                self.analysis_interval.as_secs(),
                "must be > 0",
            ));
        }
        if self.lookback_bars == 0 {
            return Err(invalid("LOOKBACK_BARS", self.lookback_bars, "must be > 0"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
            reason: "could not parse".to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Parse "HH:MM" into an hour and minute pair.
fn parse_sweep_time(raw: &str) -> Result<(u32, u32), ConfigError> {
    let bad = |reason: &str| ConfigError::Invalid {
        name: "EXPIRY_SWEEP_TIME",
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let (hour, minute) = raw.split_once(':').ok_or_else(|| bad("expected HH:MM"))?;
    let hour: u32 = hour.trim().parse().map_err(|_| bad("hour is not numeric"))?;
    let minute: u32 = minute
        .trim()
        .parse()
        .map_err(|_| bad("minute is not numeric"))?;
    if hour > 23 || minute > 59 {
        return Err(bad("hour must be 0-23 and minute 0-59"));
    }
    Ok((hour, minute))
}
