use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use sweep_types::TestName;
use sweep_types::WorkloadConfig;
use tracing::debug;
use tracing::error;
use tracing::info;

mod extract;
mod matrix;

// Hardware counters requested from perf stat, passed as one comma-joined -e
// argument. On hybrid machines perf reports these as cpu_core/<event>:u/,
// which is what the extractor matches on.
const PERF_EVENTS: &str = "cycles,instructions,cache-references,cache-misses,\
branch-instructions,branch-misses,baclears.any,br_inst_retired.all_branches,\
br_misp_retired.all_branches,br_inst_retired.cond,br_misp_retired.cond,\
br_inst_retired.indirect,br_misp_retired.indirect_call";

#[derive(Parser)]
struct Cli {
  /// Tests to run (comma-separated). If not specified, runs all sysbench
  /// tests in declared order.
  tests: Option<String>,

  /// Directory the per-configuration metrics files are written to.
  #[arg(long, default_value = "sysbench_results_v1")]
  output_dir: PathBuf,

  /// sysbench executable to invoke.
  #[arg(long, default_value = "sysbench")]
  sysbench: String,

  /// perf executable to wrap each run with.
  #[arg(long, default_value = "perf")]
  perf: String,
}

/// Full argv for one measurement: perf stat prefix, then the sysbench
/// invocation with general options before the test selector and specific
/// options after it.
fn build_command(config: &WorkloadConfig, perf: &str, sysbench: &str) -> Vec<String> {
  let mut argv = vec![
    perf.to_string(),
    "stat".to_string(),
    "-e".to_string(),
    PERF_EVENTS.to_string(),
    sysbench.to_string(),
  ];
  argv.extend(config.general.iter().cloned());
  argv.push(config.test.to_string());
  argv.extend(config.specific.iter().cloned());
  argv.push("run".to_string());
  argv
}

/// Runs one configuration to completion and persists its metrics. Any child
/// process failure is logged and the configuration is skipped; the sweep
/// itself keeps going. Returns whether a metrics file was written.
fn run_configuration(config: &WorkloadConfig, cli: &Cli) -> bool {
  let file_path = cli.output_dir.join(config.file_name());
  info!(file = %file_path.display(), "running configuration");

  if config.test.requires_prepare() {
    let prepare = Command::new(&cli.sysbench)
      .args(["fileio", "prepare"])
      .output()
      .expect("execute sysbench fileio prepare");
    if !prepare.status.success() {
      error!(
        status = %prepare.status,
        stderr = %String::from_utf8_lossy(&prepare.stderr),
        "fileio prepare failed, skipping configuration"
      );
      return false;
    }
  }

  let argv = build_command(config, &cli.perf, &cli.sysbench);
  let output = Command::new(&argv[0])
    .args(&argv[1..])
    .output()
    .expect("execute perf");
  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);
  if !output.status.success() {
    error!(
      command = %argv.join(" "),
      status = %output.status,
      stderr = %stderr,
      "benchmark failed, skipping configuration"
    );
    return false;
  }
  debug!(%stdout, %stderr, "captured benchmark output");

  // sysbench reports on stdout, perf stat on stderr; the extractor scans both.
  let metrics = extract::extract_metrics(&format!("{stdout}{stderr}"));

  fs::create_dir_all(&cli.output_dir).expect("create output directory");
  let json = serde_json::to_string_pretty(&metrics).expect("serialize metrics");
  fs::write(&file_path, json).expect("write metrics file");
  info!(file = %file_path.display(), metrics = metrics.len(), "metrics saved");
  true
}

fn main() {
  tracing_subscriber::fmt::init();

  let cli = Cli::parse();

  let tests: Vec<TestName> = match &cli.tests {
    Some(raw) => raw
      .split(',')
      .map(|s| s.trim().parse().expect("unknown test name"))
      .collect(),
    None => TestName::ALL.to_vec(),
  };

  let configurations = matrix::enumerate_configurations(&tests);
  info!(total = configurations.len(), "starting sweep");

  let mut written = 0usize;
  for (i, config) in configurations.iter().enumerate() {
    if run_configuration(config, &cli) {
      written += 1;
    }
    info!(processed = i + 1, "sweep progress");
  }

  info!(total = configurations.len(), written, "sweep complete");
}
