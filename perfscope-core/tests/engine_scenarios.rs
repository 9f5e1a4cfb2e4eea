//! Scenario tests for the metrics engine's tiers, field sets and interval
//! selection.

use std::collections::{BTreeMap, BTreeSet};

use perfscope_core::{
    compute_metrics, Aggregator, DataQuality, IntervalMethod, MetricsRecord, Tier,
};

fn keys(record: &MetricsRecord) -> BTreeSet<String> {
    record.to_fields().into_keys().collect()
}

fn key_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// `inner` samples alternating ±1 around zero plus `outliers` samples split
/// between ±100, all symmetric so the mean stays at zero.
fn with_outliers(inner: usize, outliers: usize) -> Vec<f64> {
    let mut data: Vec<f64> = (0..inner)
        .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    data.extend((0..outliers).map(|i| if i % 2 == 0 { 100.0 } else { -100.0 }));
    data
}

#[test]
fn empty_record_has_exactly_two_fields() {
    let record = compute_metrics(&[]).unwrap();
    assert_eq!(record, MetricsRecord::Empty);
    assert_eq!(keys(&record), key_set(&["count", "insufficient_data"]));
}

const INSUFFICIENT_KEYS: [&str; 7] = [
    "count",
    "mean",
    "median",
    "min",
    "max",
    "insufficient_data",
    "data_status",
];

#[test]
fn severe_records_carry_location_only() {
    for n in 1..=4 {
        let data: Vec<f64> = (0..n).map(|i| i as f64 * 1.5).collect();
        let record = compute_metrics(&data).unwrap();
        assert_eq!(record.tier(), Tier::Severe);
        assert_eq!(keys(&record), key_set(&INSUFFICIENT_KEYS), "n = {n}");
        let fields = record.to_fields();
        assert_eq!(fields["data_status"].as_str(), Some("severe"));
    }
}

#[test]
fn low_records_report_low_status() {
    for n in 5..=9 {
        let data: Vec<f64> = (1..=n).map(f64::from).collect();
        let record = compute_metrics(&data).unwrap();
        assert_eq!(record.tier(), Tier::Low);
        assert_eq!(keys(&record), key_set(&INSUFFICIENT_KEYS), "n = {n}");
        let fields = record.to_fields();
        assert_eq!(fields["data_status"].as_str(), Some("low"));
        let median = f64::from(n + 1) / 2.0;
        assert!((fields["median"].as_f64().unwrap() - median).abs() < 1e-12);
    }
}

#[test]
fn basic_tier_has_three_point_percentiles_and_no_sigma() {
    for n in [10, 15, 19] {
        let data: Vec<f64> = (0..n).map(|i| (i * 3 % 7) as f64).collect();
        let record = compute_metrics(&data).unwrap();
        let k = keys(&record);
        for present in ["std", "variance", "p5", "p50", "p95", "data_quality"] {
            assert!(k.contains(present), "n = {n} missing {present}");
        }
        for absent in ["p1", "p25", "sigma_2_lower", "within_3sigma", "insufficient_data"] {
            assert!(!k.contains(absent), "n = {n} unexpectedly has {absent}");
        }
    }

    let mid = compute_metrics(&(0..25).map(f64::from).collect::<Vec<_>>()).unwrap();
    let k = keys(&mid);
    assert!(k.contains("p25") && k.contains("p75"));
    assert!(!k.contains("p1"));
}

#[test]
fn constant_ten_samples() {
    let record = compute_metrics(&[5.0; 10]).unwrap();
    assert_eq!(record.tier(), Tier::Basic);
    let spread = record.spread().unwrap();
    assert_eq!(spread.std, 0.0);
    assert_eq!(spread.variance, 0.0);
    assert!(record.percentiles().unwrap().iter().all(|p| p.value == 5.0));
    assert!(record.sigma().is_none());
}

#[test]
fn degenerate_sigma_collapses_to_constant() {
    for c in [7.25, 0.1, -3.0] {
        let record = compute_metrics(&vec![c; 40]).unwrap();
        let sigma = record.sigma().unwrap();
        for row in sigma.iter() {
            assert_eq!(row.lower, c);
            assert_eq!(row.upper, c);
            assert_eq!(row.within, 100.0);
        }
    }
}

#[test]
fn exactly_ninety_nine_percent_routes_to_percentiles() {
    let data = with_outliers(990, 10);
    let record = compute_metrics(&data).unwrap();
    let sigma = record.sigma().unwrap();
    let within3 = sigma.within(3).unwrap();
    assert!(within3 <= 99.0 && within3 > 98.99, "within3 = {within3}");

    let iv = record.intervals().unwrap();
    assert_eq!(iv.recommended.method, IntervalMethod::PercentileBand);
    assert_eq!(iv.strict.method, IntervalMethod::StrictPercentile);
    let fields = record.to_fields();
    assert_eq!(
        fields["interval_method"].as_str(),
        Some("Percentile (P5–P95)")
    );
}

#[test]
fn above_ninety_nine_percent_routes_to_two_sigma() {
    let data = with_outliers(994, 6);
    let record = compute_metrics(&data).unwrap();
    assert!((record.sigma().unwrap().within(3).unwrap() - 99.4).abs() < 1e-9);

    let iv = record.intervals().unwrap();
    assert_eq!(iv.recommended.method, IntervalMethod::TwoSigma);
    let two = record.sigma().unwrap().get(2).unwrap();
    assert_eq!(iv.recommended.lower, two.lower.max(-100.0));
    assert_eq!(iv.recommended.upper, two.upper.min(100.0));
    assert_eq!(record.quality(), Some(DataQuality::Excellent));
}

#[test]
fn full_record_intervals_never_leave_observed_range() {
    let data: Vec<f64> = (0..300).map(|i| ((i * 37) % 101) as f64 / 3.0).collect();
    let record = compute_metrics(&data).unwrap();
    let summary = record.summary().unwrap();
    let iv = record.intervals().unwrap();
    for interval in [iv.recommended, iv.strict] {
        assert!(interval.lower >= summary.min);
        assert!(interval.upper <= summary.max);
        assert!(interval.within > 0.0 && interval.within <= 100.0);
    }
    let k = keys(&record);
    for name in [
        "recommended_lower",
        "recommended_upper",
        "within_recommended",
        "interval_method",
        "strict_lower",
        "strict_upper",
        "within_strict",
        "strict_method",
        "sigma_6_upper",
        "within_2sigma",
        "p1",
        "p99",
    ] {
        assert!(k.contains(name), "missing {name}");
    }
}

#[test]
fn pooled_mean_is_weighted() {
    let a: Vec<f64> = (0..50).map(|i| 10.0 + (i % 5) as f64).collect();
    let b: Vec<f64> = (0..150).map(|i| 40.0 + (i % 3) as f64).collect();
    let mean_a = a.iter().sum::<f64>() / a.len() as f64;
    let mean_b = b.iter().sum::<f64>() / b.len() as f64;

    let mut input = BTreeMap::new();
    input.insert("A".to_string(), a);
    input.insert("B".to_string(), b);
    let comparison = Aggregator::default().aggregate_samples(&input).unwrap();

    assert_eq!(comparison.pooled.count(), 200);
    let pooled_mean = comparison.pooled.summary().unwrap().mean;
    let weighted = (50.0 * mean_a + 150.0 * mean_b) / 200.0;
    assert!((pooled_mean - weighted).abs() < 1e-9);
    assert!((pooled_mean - (mean_a + mean_b) / 2.0).abs() > 1.0);

    assert_eq!(comparison.per_dataset["A"].tier(), Tier::SigmaEligible);
    assert_eq!(comparison.per_dataset["B"].tier(), Tier::Full);
    assert_eq!(comparison.pooled.tier(), Tier::Full);
}
