use approx::assert_relative_eq;
use cafe_forecast::config::ForecastConfig;
use cafe_forecast::forecaster::{forecast, RollingForecaster, FORECAST_HORIZON, HISTORY_WINDOW};
use cafe_forecast::models::{Feature, FeatureRow, LinearModel, PredictFn};
use cafe_forecast::{DailySalesPoint, ForecastError, Trend};
use chrono::{Days, NaiveDate};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Monday
fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn series_from(first: NaiveDate, totals: &[f64]) -> Vec<DailySalesPoint> {
    totals
        .iter()
        .enumerate()
        .map(|(i, &total)| DailySalesPoint::new(first + Days::new(i as u64), total))
        .collect()
}

fn series(totals: &[f64]) -> Vec<DailySalesPoint> {
    series_from(start(), totals)
}

fn constant(value: f64) -> PredictFn<impl Fn(&FeatureRow) -> cafe_forecast::Result<f64> + Send + Sync> {
    PredictFn::new("constant", move |_| Ok(value))
}

#[test]
fn test_compounding_dependency() {
    let model = PredictFn::new("lag1 + 1", |row: &FeatureRow| Ok(row.sales_lag1 + 1.0));
    let history = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

    let result = forecast(&history, &model).unwrap();

    assert_eq!(
        result.values(),
        vec![8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0]
    );
    assert_relative_eq!(result.avg_past_7, 4.0);
    assert_relative_eq!(result.avg_future_7, 11.0);
    assert_relative_eq!(result.trend_percent, 175.0);
    assert_eq!(result.trend, Trend::Growing);
}

#[test]
fn test_forecast_dates_follow_last_date() {
    let history = series(&[10.0; 12]);
    let last_date = history.last().unwrap().date;

    let result = forecast(&history, &constant(10.0)).unwrap();

    assert_eq!(result.points.len(), FORECAST_HORIZON);
    for (i, point) in result.points.iter().enumerate() {
        assert_eq!(point.date, last_date + Days::new(i as u64 + 1));
    }
    assert!(result.dates().windows(2).all(|pair| pair[0] < pair[1]));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(6)]
fn test_insufficient_history(#[case] days: usize) {
    let calls = AtomicUsize::new(0);
    let model = PredictFn::new("counting", |_: &FeatureRow| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(1.0)
    });
    let history = series(&vec![5.0; days]);

    let result = forecast(&history, &model);

    match result {
        Err(ForecastError::InsufficientHistory {
            required,
            available,
        }) => {
            assert_eq!(required, HISTORY_WINDOW);
            assert_eq!(available, days);
        }
        other => panic!("Expected InsufficientHistory, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_exactly_seven_days_is_enough() {
    let calls = AtomicUsize::new(0);
    let model = PredictFn::new("counting", |_: &FeatureRow| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(1.0)
    });

    let result = forecast(&series(&[5.0; 7]), &model).unwrap();

    assert_eq!(result.points.len(), 7);
    assert_eq!(calls.load(Ordering::SeqCst), 7);
}

#[test]
fn test_determinism() {
    let mut rng = StdRng::seed_from_u64(7);
    let totals: Vec<f64> = (0..45).map(|_| rng.gen_range(50.0..500.0)).collect();
    let history = series(&totals);
    let model = LinearModel::new(
        Feature::ALL.to_vec(),
        vec![3.0, 1.5, 40.0, 0.4, 0.2, 0.3],
        12.0,
    )
    .unwrap();

    let first = forecast(&history, &model).unwrap();
    let second = forecast(&history, &model).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_rolling_window_holds_seven_values_at_every_step() {
    let rows = Mutex::new(Vec::new());
    let model = PredictFn::new("recording", |row: &FeatureRow| {
        rows.lock().unwrap().push(*row);
        Ok(row.rolling_mean_7 * 1.1 + 2.0)
    });
    let seed = [3.0, 9.0, 4.0, 12.0, 7.0, 5.0, 8.0];

    let result = forecast(&series(&seed), &model).unwrap();
    let rows = rows.into_inner().unwrap();

    // Actual history followed by each prediction, in order
    let mut combined = seed.to_vec();
    combined.extend(result.values());

    assert_eq!(rows.len(), FORECAST_HORIZON);
    for (i, row) in rows.iter().enumerate() {
        let window = &combined[i..i + HISTORY_WINDOW];
        assert_eq!(window.len(), 7);
        assert_relative_eq!(row.sales_lag7, window[0]);
        assert_relative_eq!(row.sales_lag1, window[6]);
        assert_eq!(row.rolling_mean_7, window.iter().sum::<f64>() / 7.0);
    }
}

#[test]
fn test_rolling_mean_recovers_after_outlier_leaves_window() {
    let rows = Mutex::new(Vec::new());
    let model = PredictFn::new("constant", |row: &FeatureRow| {
        rows.lock().unwrap().push(*row);
        Ok(1.0)
    });
    let seed = [1e16, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];

    forecast(&series(&seed), &model).unwrap();
    let rows = rows.into_inner().unwrap();

    // The outlier is evicted by the first prediction
    for row in &rows[1..] {
        assert_eq!(row.rolling_mean_7, 1.0);
        assert_eq!(row.sales_lag7, 1.0);
    }
}

#[test]
fn test_calendar_features() {
    // Last actual day is Wednesday 2024-01-31
    let first = NaiveDate::from_ymd_opt(2024, 1, 25).unwrap();
    let rows = Mutex::new(Vec::new());
    let model = PredictFn::new("recording", |row: &FeatureRow| {
        rows.lock().unwrap().push(*row);
        Ok(50.0)
    });

    forecast(&series_from(first, &[50.0; 7]), &model).unwrap();
    let rows = rows.into_inner().unwrap();

    let days: Vec<u32> = rows.iter().map(|r| r.day_of_week).collect();
    let weekend: Vec<bool> = rows.iter().map(|r| r.is_weekend).collect();
    assert_eq!(days, vec![3, 4, 5, 6, 0, 1, 2]);
    assert_eq!(weekend, vec![false, false, true, true, false, false, false]);
    assert!(rows.iter().all(|r| r.month == 2));
}

#[test]
fn test_only_last_seven_days_matter() {
    let model = PredictFn::new("mean", |row: &FeatureRow| Ok(row.rolling_mean_7));
    let tail = [20.0, 22.0, 21.0, 25.0, 30.0, 28.0, 24.0];

    let mut long = vec![999.0, 1.0, 0.0, 500.0];
    long.extend_from_slice(&tail);

    let short_result = forecast(&series(&tail), &model).unwrap();
    let long_result = forecast(&series(&long), &model).unwrap();

    assert_eq!(short_result.values(), long_result.values());
    assert_relative_eq!(short_result.avg_past_7, long_result.avg_past_7);
}

#[rstest]
#[case(105.0, Trend::Stable)]
#[case(105.01, Trend::Growing)]
#[case(95.0, Trend::Stable)]
#[case(94.99, Trend::Declining)]
#[case(100.0, Trend::Stable)]
fn test_trend_band_boundaries(#[case] prediction: f64, #[case] expected: Trend) {
    let result = forecast(&series(&[100.0; 7]), &constant(prediction)).unwrap();
    assert_eq!(result.trend, expected);
}

#[test]
fn test_trend_percent_at_band_edge() {
    let result = forecast(&series(&[100.0; 7]), &constant(105.0)).unwrap();
    assert_eq!(result.trend_percent, 5.0);
    assert_eq!(result.trend, Trend::Stable);
}

#[test]
fn test_custom_trend_band() {
    let forecaster = RollingForecaster::with_trend_band(10.0).unwrap();
    assert_eq!(forecaster.trend_band(), 10.0);

    let result = forecaster
        .forecast(&series(&[100.0; 7]), &constant(108.0))
        .unwrap();
    assert_eq!(result.trend, Trend::Stable);

    let forecaster = RollingForecaster::new(&ForecastConfig {
        trend_band_percent: 1.0,
    })
    .unwrap();
    let result = forecaster
        .forecast(&series(&[100.0; 7]), &constant(98.0))
        .unwrap();
    assert_eq!(result.trend, Trend::Declining);
}

#[test]
fn test_invalid_trend_band() {
    assert!(matches!(
        RollingForecaster::with_trend_band(-5.0),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_zero_baseline_is_division_undefined() {
    let calls = AtomicUsize::new(0);
    let model = PredictFn::new("counting", |_: &FeatureRow| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(10.0)
    });
    let history = series(&[40.0, 30.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

    let result = forecast(&history, &model);

    assert!(matches!(result, Err(ForecastError::DivisionUndefined(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_baseline_cancelling_to_zero() {
    let history = series(&[-3.0, 3.0, -2.0, 2.0, -1.0, 1.0, 0.0]);
    let result = forecast(&history, &constant(1.0));
    assert!(matches!(result, Err(ForecastError::DivisionUndefined(_))));
}

#[test]
fn test_model_failure_aborts_forecast() {
    let calls = AtomicUsize::new(0);
    let model = PredictFn::new("fails on step 3", |_: &FeatureRow| {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == 3 {
            Err(ForecastError::ValidationError("feature vector rejected".to_string()))
        } else {
            Ok(10.0)
        }
    });

    let result = forecast(&series(&[10.0; 7]), &model);

    match result {
        Err(ForecastError::ModelInferenceError { step, reason }) => {
            assert_eq!(step, 3);
            assert!(reason.contains("feature vector rejected"));
        }
        other => panic!("Expected ModelInferenceError, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_model_reported_step_is_replaced_by_forecast_step() {
    let calls = AtomicUsize::new(0);
    let model = PredictFn::new("reports its own step", |_: &FeatureRow| {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == 5 {
            Err(ForecastError::ModelInferenceError {
                step: 99,
                reason: "tree index out of range".to_string(),
            })
        } else {
            Ok(10.0)
        }
    });

    let result = forecast(&series(&[10.0; 7]), &model);

    match result {
        Err(ForecastError::ModelInferenceError { step, reason }) => {
            assert_eq!(step, 5);
            assert_eq!(reason, "tree index out of range");
        }
        other => panic!("Expected ModelInferenceError, got {:?}", other),
    }
}

#[rstest]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
#[case(f64::NEG_INFINITY)]
fn test_non_finite_prediction_is_inference_error(#[case] value: f64) {
    let result = forecast(&series(&[10.0; 7]), &constant(value));
    assert!(matches!(
        result,
        Err(ForecastError::ModelInferenceError { step: 1, .. })
    ));
}

#[test]
fn test_unordered_series_rejected() {
    let mut history = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    history.swap(2, 5);

    let result = forecast(&history, &constant(1.0));
    assert!(matches!(result, Err(ForecastError::ValidationError(_))));
}

#[test]
fn test_duplicate_dates_rejected() {
    let mut history = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    history[7].date = history[6].date;

    let result = forecast(&history, &constant(1.0));
    assert!(matches!(result, Err(ForecastError::ValidationError(_))));
}

#[test]
fn test_non_finite_history_rejected() {
    let mut history = series(&[1.0; 8]);
    history[4].total = f64::NAN;

    let result = forecast(&history, &constant(1.0));
    assert!(matches!(result, Err(ForecastError::ValidationError(_))));
}

#[test]
fn test_concurrent_forecasts_are_independent() {
    let model = LinearModel::new(
        vec![Feature::SalesLag1, Feature::SalesLag7, Feature::IsWeekend],
        vec![0.6, 0.3, 25.0],
        5.0,
    )
    .unwrap();
    let history = series(&[80.0, 95.0, 120.0, 70.0, 88.0, 140.0, 150.0, 90.0]);
    let expected = forecast(&history, &model).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| forecast(&history, &model).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_dyn_model() {
    let model: Box<dyn cafe_forecast::SalesModel> = Box::new(constant(12.0));
    let result = forecast(&series(&[10.0; 7]), model.as_ref()).unwrap();
    assert_relative_eq!(result.trend_percent, 20.0);
}
