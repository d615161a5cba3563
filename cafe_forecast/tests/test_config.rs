use cafe_forecast::config::{CafeConfig, DashboardConfig, ForecastConfig, ShopConfig};
use cafe_forecast::ForecastError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let config = CafeConfig::default();

    assert_eq!(config.forecast.trend_band_percent, 5.0);
    assert_eq!(config.dashboard.lookback_days, 30);
    assert_eq!(config.dashboard.top_products, 5);
    assert_eq!(config.dashboard.recent_transactions, 8);
    assert_eq!(config.shop.utc_offset_hours, 7);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = CafeConfig::from_json_str(r#"{ "forecast": { "trend_band_percent": 2.5 } }"#)
        .unwrap();

    assert_eq!(
        config,
        CafeConfig {
            forecast: ForecastConfig {
                trend_band_percent: 2.5
            },
            dashboard: DashboardConfig::default(),
            shop: ShopConfig::default(),
        }
    );
}

#[test]
fn test_from_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "dashboard": {{ "lookback_days": 14, "top_products": 3 }}, "shop": {{ "utc_offset_hours": -5 }} }}"#
    )
    .unwrap();

    let config = CafeConfig::from_json_file(file.path()).unwrap();

    assert_eq!(config.dashboard.lookback_days, 14);
    assert_eq!(config.dashboard.top_products, 3);
    assert_eq!(config.dashboard.recent_transactions, 8);
    assert_eq!(config.shop.offset().unwrap().local_minus_utc(), -5 * 3600);
}

#[rstest]
#[case::negative_band(r#"{ "forecast": { "trend_band_percent": -1.0 } }"#)]
#[case::zero_lookback(r#"{ "dashboard": { "lookback_days": 0 } }"#)]
#[case::huge_lookback(r#"{ "dashboard": { "lookback_days": 100000000 } }"#)]
#[case::offset_out_of_range(r#"{ "shop": { "utc_offset_hours": 20 } }"#)]
#[case::unknown_key(r#"{ "forecast": { "horizon": 14 } }"#)]
#[case::not_json("trend_band_percent = 5")]
fn test_invalid_config(#[case] json: &str) {
    assert!(matches!(
        CafeConfig::from_json_str(json),
        Err(ForecastError::ConfigError(_))
    ));
}

#[test]
fn test_missing_config_file() {
    assert!(matches!(
        CafeConfig::from_json_file("/nonexistent/cafe.json"),
        Err(ForecastError::IoError(_))
    ));
}

#[test]
fn test_local_now_uses_offset() {
    let shop = ShopConfig {
        utc_offset_hours: 7,
    };
    let now = shop.local_now().unwrap();
    assert_eq!(now.offset().local_minus_utc(), 7 * 3600);
}
