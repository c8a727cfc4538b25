use once_cell::sync::Lazy;
use regex::Regex;
use sweep_types::MetricValue;
use sweep_types::MetricsRecord;

static AVG_LATENCY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"avg:\s+([\d.]+)").unwrap());

static INSTRUCTIONS_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"([\d,]+)\s+cpu_core/instructions:u/.*?#\s+([\d.]+)\s+insn per cycle").unwrap()
});

static CACHE_MISSES_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"([\d,]+)\s+cpu_core/cache-misses:u/.*?#\s+([\d.]+)% of all cache refs").unwrap()
});

static BRANCH_MISSES_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"([\d,]+)\s+cpu_core/branch-misses:u/.*?#\s+([\d.]+)% of all branches").unwrap()
});

// Counters that perf prints without an annotation we care about. Each entry is
// (metric key, event name as it appears in perf output).
const PLAIN_COUNTERS: &[(&str, &str)] = &[
  ("cpu_core_cycles", r"cycles"),
  ("cpu_core_baclears_any", r"baclears\.any"),
  ("cpu_core_br_inst_retired_all_branches", r"br_inst_retired\.all_branches"),
  ("cpu_core_br_misp_retired_all_branches", r"br_misp_retired\.all_branches"),
  ("cpu_core_br_inst_retired_cond", r"br_inst_retired\.cond"),
  ("cpu_core_br_misp_retired_cond", r"br_misp_retired\.cond"),
  ("cpu_core_br_inst_retired_indirect", r"br_inst_retired\.indirect"),
  ("cpu_core_br_misp_retired_indirect_call", r"br_misp_retired\.indirect_call"),
];

static PLAIN_COUNTER_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
  PLAIN_COUNTERS
    .iter()
    .map(|(key, event)| {
      let re = Regex::new(&format!(r"([\d,]+)\s+cpu_core/{event}:u/")).unwrap();
      (*key, re)
    })
    .collect()
});

// perf prints counts with thousands separators.
fn parse_count(raw: &str) -> u64 {
  raw.replace(',', "").parse().expect("count capture must be numeric")
}

fn parse_float(raw: &str) -> f64 {
  raw.parse().expect("float capture must be numeric")
}

/// Turns the interleaved sysbench + perf stat text into a flat metrics record.
/// Every pattern is independent and optional: a counter that perf did not
/// print (or printed as unsupported) simply leaves its key absent.
pub fn extract_metrics(output: &str) -> MetricsRecord {
  let mut metrics = MetricsRecord::new();

  if let Some(caps) = AVG_LATENCY_RE.captures(output) {
    metrics.insert("avg_latency".to_string(), MetricValue::Float(parse_float(&caps[1])));
  }

  if let Some(caps) = INSTRUCTIONS_RE.captures(output) {
    metrics.insert(
      "cpu_core_instructions".to_string(),
      MetricValue::Int(parse_count(&caps[1])),
    );
    metrics.insert("insn_per_cycle".to_string(), MetricValue::Float(parse_float(&caps[2])));
  }

  if let Some(caps) = CACHE_MISSES_RE.captures(output) {
    metrics.insert(
      "cpu_core_cache_misses".to_string(),
      MetricValue::Int(parse_count(&caps[1])),
    );
    metrics.insert(
      "cache_miss_percentage".to_string(),
      MetricValue::Float(parse_float(&caps[2])),
    );
  }

  if let Some(caps) = BRANCH_MISSES_RE.captures(output) {
    metrics.insert(
      "cpu_core_branch_misses".to_string(),
      MetricValue::Int(parse_count(&caps[1])),
    );
    metrics.insert(
      "branch_miss_percentage".to_string(),
      MetricValue::Float(parse_float(&caps[2])),
    );
  }

  for (key, re) in PLAIN_COUNTER_RES.iter() {
    if let Some(caps) = re.captures(output) {
      metrics.insert(key.to_string(), MetricValue::Int(parse_count(&caps[1])));
    }
  }

  metrics
}
