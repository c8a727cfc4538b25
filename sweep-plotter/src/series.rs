use serde::Serialize;
use sweep_types::MetricValue;
use sweep_types::MetricsRecord;
use sweep_types::Variant;

/// One bar chart's worth of data: a metric and its value under each variant,
/// in `Variant::ALL` order.
#[derive(Serialize, Debug, PartialEq)]
pub struct MetricSeries {
  pub metric: String,
  pub values: Vec<MetricValue>,
}

/// Builds one series per metric key present in the baseline (`none`) record.
/// Each series is constructed fresh for its key. A metric that the baseline
/// reports but some other variant lacks means the variant directories are not
/// comparable, which is a hard failure.
pub fn build_series(records: &[(Variant, MetricsRecord)]) -> Vec<MetricSeries> {
  assert_eq!(records.len(), Variant::ALL.len());
  let (baseline_variant, baseline) = &records[0];
  assert_eq!(*baseline_variant, Variant::None);

  baseline
    .keys()
    .map(|metric| {
      let values = records
        .iter()
        .map(|(variant, record)| {
          *record
            .get(metric)
            .unwrap_or_else(|| panic!("metric {metric} missing from {variant} record"))
        })
        .collect();
      MetricSeries {
        metric: metric.clone(),
        values,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(avg_latency: f64) -> MetricsRecord {
    let mut record = MetricsRecord::new();
    record.insert("avg_latency".to_string(), MetricValue::Float(avg_latency));
    record
  }

  #[test]
  fn test_series_in_fixed_variant_order() {
    let records: Vec<(Variant, MetricsRecord)> = Variant::ALL
      .into_iter()
      .zip([10.0, 12.0, 11.0, 13.0, 9.0])
      .map(|(variant, avg_latency)| (variant, record(avg_latency)))
      .collect();
    let series = build_series(&records);
    assert_eq!(series, [MetricSeries {
      metric: "avg_latency".to_string(),
      values: vec![
        MetricValue::Float(10.0),
        MetricValue::Float(12.0),
        MetricValue::Float(11.0),
        MetricValue::Float(13.0),
        MetricValue::Float(9.0),
      ],
    }]);
  }

  #[test]
  fn test_one_series_per_baseline_metric() {
    let mut baseline = record(1.0);
    baseline.insert("cpu_core_cycles".to_string(), MetricValue::Int(100));
    let records: Vec<(Variant, MetricsRecord)> = Variant::ALL
      .into_iter()
      .map(|variant| {
        let mut r = record(1.0);
        r.insert("cpu_core_cycles".to_string(), MetricValue::Int(100));
        // Extra keys outside the baseline are ignored.
        if variant != Variant::None {
          r.insert("stray".to_string(), MetricValue::Int(1));
        }
        (variant, r)
      })
      .collect();
    let series = build_series(&records);
    let metrics: Vec<&str> = series.iter().map(|s| s.metric.as_str()).collect();
    assert_eq!(metrics, ["avg_latency", "cpu_core_cycles"]);
  }

  #[test]
  #[should_panic(expected = "missing from v2 record")]
  fn test_missing_metric_in_variant_is_fatal() {
    let records: Vec<(Variant, MetricsRecord)> = Variant::ALL
      .into_iter()
      .map(|variant| {
        let r = if variant == Variant::V2 {
          MetricsRecord::new()
        } else {
          record(1.0)
        };
        (variant, r)
      })
      .collect();
    build_series(&records);
  }
}
