//! Unit tests for the four signal rules

use chrono::Utc;
use signalpost::models::indicators::{BollingerBands, IndicatorSet, MacdIndicator};
use signalpost::models::signal::{SignalDirection, SignalStrength};
use signalpost::signals::rules::{bollinger_rule, ema_rule, macd_rule, rsi_rule};
use signalpost::signals::SignalConfig;

fn set(close: f64) -> IndicatorSet {
    IndicatorSet::new("BTC-USD", Utc::now(), close)
}

#[test]
fn rsi_oversold_yields_medium_buy() {
    let set = set(100.0).with_rsi(Some(25.0));
    let candidate = rsi_rule(&set, &SignalConfig::default()).unwrap();
    assert_eq!(candidate.direction, SignalDirection::Buy);
    assert_eq!(candidate.strategy, "RSI Oversold");
    assert_eq!(candidate.strength, SignalStrength::Medium);
    assert_eq!(candidate.rationale, "RSI (25.00) below oversold threshold (30)");
    assert_eq!(candidate.price, 100.0);
}

#[test]
fn rsi_deeply_oversold_upgrades_to_strong() {
    let set = set(100.0).with_rsi(Some(18.4));
    let candidate = rsi_rule(&set, &SignalConfig::default()).unwrap();
    assert_eq!(candidate.strength, SignalStrength::Strong);
}

#[test]
fn rsi_overbought_yields_sell() {
    let set = set(100.0).with_rsi(Some(75.0));
    let candidate = rsi_rule(&set, &SignalConfig::default()).unwrap();
    assert_eq!(candidate.direction, SignalDirection::Sell);
    assert_eq!(candidate.strategy, "RSI Overbought");
    assert_eq!(candidate.strength, SignalStrength::Medium);
    assert_eq!(
        candidate.rationale,
        "RSI (75.00) above overbought threshold (70)"
    );
}

#[test]
fn rsi_above_eighty_is_strong_sell() {
    let set = set(100.0).with_rsi(Some(85.0));
    let candidate = rsi_rule(&set, &SignalConfig::default()).unwrap();
    assert_eq!(candidate.strength, SignalStrength::Strong);
}

#[test]
fn rsi_thresholds_are_strict() {
    let config = SignalConfig::default();
    assert!(rsi_rule(&set(100.0).with_rsi(Some(30.0)), &config).is_none());
    assert!(rsi_rule(&set(100.0).with_rsi(Some(70.0)), &config).is_none());
    // exactly at the strong cutoffs the reading is still only medium
    let candidate = rsi_rule(&set(100.0).with_rsi(Some(20.0)), &config).unwrap();
    assert_eq!(candidate.strength, SignalStrength::Medium);
    let candidate = rsi_rule(&set(100.0).with_rsi(Some(80.0)), &config).unwrap();
    assert_eq!(candidate.strength, SignalStrength::Medium);
}

#[test]
fn rsi_rule_is_silent_without_rsi() {
    assert!(rsi_rule(&set(100.0), &SignalConfig::default()).is_none());
}

#[test]
fn macd_bullish_needs_line_and_histogram_agreement() {
    let bullish = set(100.0).with_macd(Some(MacdIndicator {
        line: 0.5,
        signal: 0.3,
        histogram: 0.2,
    }));
    let candidate = macd_rule(&bullish).unwrap();
    assert_eq!(candidate.direction, SignalDirection::Buy);
    assert_eq!(candidate.strategy, "MACD Bullish");
    assert_eq!(candidate.strength, SignalStrength::Medium);
}

#[test]
fn macd_bearish_needs_both_negative() {
    let bearish = set(100.0).with_macd(Some(MacdIndicator {
        line: -0.4,
        signal: -0.1,
        histogram: -0.3,
    }));
    let candidate = macd_rule(&bearish).unwrap();
    assert_eq!(candidate.direction, SignalDirection::Sell);
    assert_eq!(candidate.strategy, "MACD Bearish");
}

#[test]
fn macd_mixed_readings_stay_silent() {
    // line above signal but histogram not positive
    let mixed = set(100.0).with_macd(Some(MacdIndicator {
        line: 0.5,
        signal: 0.3,
        histogram: 0.0,
    }));
    assert!(macd_rule(&mixed).is_none());

    // line below signal but histogram positive
    let mixed = set(100.0).with_macd(Some(MacdIndicator {
        line: 0.1,
        signal: 0.3,
        histogram: 0.2,
    }));
    assert!(macd_rule(&mixed).is_none());
}

#[test]
fn bollinger_breach_includes_touching_the_band() {
    let bands = BollingerBands {
        upper: 110.0,
        middle: 100.0,
        lower: 90.0,
    };
    let buy = bollinger_rule(&set(90.0).with_bollinger(Some(bands))).unwrap();
    assert_eq!(buy.direction, SignalDirection::Buy);
    assert_eq!(buy.strategy, "Bollinger Bands");

    let sell = bollinger_rule(&set(110.0).with_bollinger(Some(bands))).unwrap();
    assert_eq!(sell.direction, SignalDirection::Sell);

    assert!(bollinger_rule(&set(100.0).with_bollinger(Some(bands))).is_none());
}

#[test]
fn ema_crossover_is_always_weak() {
    let buy = ema_rule(&set(100.0).with_emas(Some(105.0), Some(100.0))).unwrap();
    assert_eq!(buy.direction, SignalDirection::Buy);
    assert_eq!(buy.strategy, "EMA Crossover");
    assert_eq!(buy.strength, SignalStrength::Weak);

    let sell = ema_rule(&set(100.0).with_emas(Some(95.0), Some(100.0))).unwrap();
    assert_eq!(sell.direction, SignalDirection::Sell);
    assert_eq!(sell.strength, SignalStrength::Weak);
}

#[test]
fn ema_rule_is_silent_when_legs_are_equal_or_missing() {
    assert!(ema_rule(&set(100.0).with_emas(Some(100.0), Some(100.0))).is_none());
    assert!(ema_rule(&set(100.0).with_emas(Some(100.0), None)).is_none());
    assert!(ema_rule(&set(100.0)).is_none());
}
