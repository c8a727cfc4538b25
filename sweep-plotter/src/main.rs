use clap::Parser;
use maud::html;
use maud::Markup;
use maud::PreEscaped;
use series::build_series;
use series::MetricSeries;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use sweep_types::MetricsRecord;
use sweep_types::TestName;
use sweep_types::Variant;
use sweep_types::WorkloadConfig;
use tracing::info;

mod series;

#[derive(Parser)]
struct Cli {
  /// sysbench test the configuration belongs to.
  test: TestName,

  /// General option exactly as passed to the runner (e.g. --threads=1).
  /// Repeatable, order-sensitive.
  #[arg(long = "general")]
  general: Vec<String>,

  /// Test-specific option exactly as passed to the runner. Repeatable,
  /// order-sensitive.
  #[arg(long = "specific")]
  specific: Vec<String>,

  /// Directory containing the five sysbench_results_* variant directories.
  #[arg(long, default_value = ".")]
  results_root: PathBuf,

  /// Directory the generated page is written to.
  #[arg(long, default_value = "out")]
  out: PathBuf,
}

fn load_record(path: &Path) -> MetricsRecord {
  let raw = fs::read_to_string(path)
    .unwrap_or_else(|err| panic!("read metrics file {}: {err}", path.display()));
  serde_json::from_str(&raw)
    .unwrap_or_else(|err| panic!("parse metrics file {}: {err}", path.display()))
}

/// Loads the same configuration's metrics file from every variant directory,
/// in fixed variant order. Any missing or malformed file is fatal.
fn collect_records(results_root: &Path, file_name: &str) -> Vec<(Variant, MetricsRecord)> {
  Variant::ALL
    .into_iter()
    .map(|variant| {
      let path = results_root.join(variant.results_dir()).join(file_name);
      let record = load_record(&path);
      info!(file = %path.display(), "metrics loaded");
      (variant, record)
    })
    .collect()
}

fn generate_html(config: &WorkloadConfig, series: &[MetricSeries]) -> Markup {
  let json_data = serde_json::to_string(series).expect("serialize chart data");
  // Escape for a JavaScript string literal.
  let json_escaped = json_data
    .replace('\\', r#"\\"#)
    .replace('"', r#"\""#)
    .replace('\n', r#"\n"#)
    .replace('\r', r#"\r"#)
    .replace('\t', r#"\t"#);

  let heading = format!(
    "sysbench {} {}",
    config.test,
    config
      .general
      .iter()
      .chain(config.specific.iter())
      .cloned()
      .collect::<Vec<_>>()
      .join(" ")
  );

  html! {
    (maud::DOCTYPE)
    html lang="en" {
      head {
        meta charset="UTF-8" {}
        meta name="viewport" content="width=device-width, initial-scale=1.0" {}
        title { "sysbench vs Spectre mitigations" }
        style {
          (PreEscaped(include_str!("index.css")))
        }
        script src="https://cdn.plot.ly/plotly-2.26.0.min.js" {}
        script {
          (PreEscaped(format!(r#"const data = JSON.parse("{}");"#, json_escaped)))
        }
        script {
          (PreEscaped(include_str!("index.js")))
        }
      }
      body {
        div.container {
          h1 { (heading) }
          div id="charts" {}
        }
      }
    }
  }
}

fn main() {
  tracing_subscriber::fmt::init();

  let cli = Cli::parse();

  let config = WorkloadConfig::new(cli.test, cli.general, cli.specific);
  let file_name = config.file_name();
  info!(%file_name, "comparing variants");

  let records = collect_records(&cli.results_root, &file_name);
  let series = build_series(&records);
  info!(charts = series.len(), "built chart series");

  let html = generate_html(&config, &series);
  fs::create_dir_all(&cli.out).expect("create output directory");
  let out_path = cli.out.join("index.html");
  fs::write(&out_path, html.into_string()).expect("write generated page");
  info!(file = %out_path.display(), "page generated, open it in a browser to view the charts");
}

#[cfg(test)]
mod tests {
  use super::*;
  use sweep_types::MetricValue;

  fn write_variant_records(root: &Path, file_name: &str, avg_latencies: [f64; 5]) {
    for (variant, avg_latency) in Variant::ALL.into_iter().zip(avg_latencies) {
      let dir = root.join(variant.results_dir());
      fs::create_dir_all(&dir).unwrap();
      let mut record = MetricsRecord::new();
      record.insert("avg_latency".to_string(), MetricValue::Float(avg_latency));
      fs::write(
        dir.join(file_name),
        serde_json::to_string_pretty(&record).unwrap(),
      )
      .unwrap();
    }
  }

  #[test]
  fn test_collect_records_across_variants() {
    let root = std::env::temp_dir().join(format!("sweep-plotter-{}", std::process::id()));
    let config = WorkloadConfig::new(
      TestName::Mutex,
      ["--threads=1".to_string()],
      ["--mutex-num=2048".to_string(), "--mutex-locks=10000".to_string()],
    );
    write_variant_records(&root, &config.file_name(), [10.0, 12.0, 11.0, 13.0, 9.0]);

    let records = collect_records(&root, &config.file_name());
    let series = build_series(&records);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].metric, "avg_latency");
    assert_eq!(series[0].values, vec![
      MetricValue::Float(10.0),
      MetricValue::Float(12.0),
      MetricValue::Float(11.0),
      MetricValue::Float(13.0),
      MetricValue::Float(9.0),
    ]);
    fs::remove_dir_all(&root).unwrap();
  }

  #[test]
  #[should_panic(expected = "read metrics file")]
  fn test_missing_variant_file_is_fatal() {
    let root = std::env::temp_dir().join(format!("sweep-plotter-missing-{}", std::process::id()));
    collect_records(&root, "sysbench_cpu_threads-1.json");
  }

  #[test]
  fn test_generated_page_embeds_chart_data() {
    let config = WorkloadConfig::new(TestName::Cpu, ["--threads=1".to_string()], []);
    let series = vec![MetricSeries {
      metric: "avg_latency".to_string(),
      values: vec![
        MetricValue::Float(10.0),
        MetricValue::Float(12.0),
        MetricValue::Float(11.0),
        MetricValue::Float(13.0),
        MetricValue::Float(9.0),
      ],
    }];
    let page = generate_html(&config, &series).into_string();
    assert!(page.contains("avg_latency"));
    assert!(page.contains("JSON.parse"));
    assert!(page.contains("sysbench cpu --threads=1"));
  }
}
