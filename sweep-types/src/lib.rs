use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use strum::Display;
use strum::EnumString;

/// The sysbench built-in tests, in the order the sweep runs them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TestName {
  Cpu,
  Fileio,
  Memory,
  Threads,
  Mutex,
}

impl TestName {
  pub const ALL: [TestName; 5] = [
    TestName::Cpu,
    TestName::Fileio,
    TestName::Memory,
    TestName::Threads,
    TestName::Mutex,
  ];

  /// The fileio test requires `sysbench fileio prepare` before it can run.
  pub fn requires_prepare(self) -> bool {
    self == TestName::Fileio
  }
}

/// One point in the sweep: a test plus its command-line options. The general
/// options (thread count) apply to any test; the specific options only make
/// sense for this test. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkloadConfig {
  pub test: TestName,
  pub general: Vec<String>,
  pub specific: Vec<String>,
}

impl WorkloadConfig {
  pub fn new(
    test: TestName,
    general: impl IntoIterator<Item = String>,
    specific: impl IntoIterator<Item = String>,
  ) -> Self {
    Self {
      test,
      general: general.into_iter().collect(),
      specific: specific.into_iter().collect(),
    }
  }

  /// Deterministic results filename for this configuration. Both the runner
  /// (writer) and the plotter (reader) must go through this function so that
  /// identical configurations map to identical paths across variant
  /// directories. Option order is preserved: general options first, then
  /// test-specific ones.
  pub fn file_name(&self) -> String {
    let tokens = self
      .general
      .iter()
      .chain(self.specific.iter())
      .map(|o| o.replace("--", "").replace('=', "-"))
      .collect::<Vec<_>>()
      .join("_");
    format!("sysbench_{}_{}.json", self.test, tokens)
  }
}

/// A single measured value. Counter metrics are integers and must stay
/// integers across a JSON round trip; latencies and percentages are floats.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
  Int(u64),
  Float(f64),
}

/// Flat metric name => value mapping produced by one run. Written once as the
/// run's permanent record, never mutated afterwards. BTreeMap keeps key order
/// deterministic for both the JSON output and chart iteration.
pub type MetricsRecord = BTreeMap<String, MetricValue>;

/// Which Spectre mitigation configuration produced a results directory.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Variant {
  #[strum(serialize = "none")]
  None,
  #[strum(serialize = "v1")]
  V1,
  #[strum(serialize = "v2")]
  V2,
  #[strum(serialize = "v2_1")]
  V2_1,
  #[strum(serialize = "bhi")]
  Bhi,
}

impl Variant {
  /// Fixed comparison order used everywhere a chart axis is built.
  pub const ALL: [Variant; 5] = [
    Variant::None,
    Variant::V1,
    Variant::V2,
    Variant::V2_1,
    Variant::Bhi,
  ];

  /// Name of the output directory the runner wrote this variant's files to.
  pub fn results_dir(self) -> &'static str {
    match self {
      Variant::None => "sysbench_results_no",
      Variant::V1 => "sysbench_results_v1",
      Variant::V2 => "sysbench_results_v2",
      Variant::V2_1 => "sysbench_results_v2_1",
      Variant::Bhi => "sysbench_results_bhi",
    }
  }
}
