use itertools::iproduct;
use sweep_types::TestName;
use sweep_types::WorkloadConfig;

/// General option combinations swept for every test. Currently only the
/// thread count varies.
pub fn general_option_sets() -> Vec<Vec<String>> {
  [1u32, 10, 100, 1000]
    .iter()
    .map(|threads| vec![format!("--threads={threads}")])
    .collect()
}

/// Test-specific option combinations. A test with no specific options gets a
/// single empty set so it still runs once per general combination.
pub fn specific_option_sets(test: TestName) -> Vec<Vec<String>> {
  match test {
    TestName::Cpu => vec![vec![]],
    TestName::Fileio => iproduct!(
      ["seqwr", "seqrewr", "seqrd", "rndrd", "rndwr", "rndrw"],
      ["sync", "async", "mmap"]
    )
    .map(|(mode, io_mode)| {
      vec![
        format!("--file-test-mode={mode}"),
        format!("--file-io-mode={io_mode}"),
      ]
    })
    .collect(),
    TestName::Memory => iproduct!(["1K", "1M", "1G"], ["1G", "10G", "100G"])
      .map(|(block_size, total_size)| {
        vec![
          format!("--memory-block-size={block_size}"),
          format!("--memory-total-size={total_size}"),
        ]
      })
      .collect(),
    TestName::Threads => iproduct!([100u32, 1000, 10000], [4u32, 8, 16, 32])
      .map(|(yields, locks)| {
        vec![
          format!("--thread-yields={yields}"),
          format!("--thread-locks={locks}"),
        ]
      })
      .collect(),
    TestName::Mutex => iproduct!([2048u32, 4096, 8192], [10000u32, 50000, 100000])
      .map(|(num, locks)| {
        vec![format!("--mutex-num={num}"), format!("--mutex-locks={locks}")]
      })
      .collect(),
  }
}

/// Full enumeration for the given tests: declared test order, then general
/// combinations, then specific sets.
pub fn enumerate_configurations(tests: &[TestName]) -> Vec<WorkloadConfig> {
  let mut configurations = Vec::new();
  for &test in tests {
    for general in general_option_sets() {
      for specific in specific_option_sets(test) {
        configurations.push(WorkloadConfig::new(test, general.clone(), specific));
      }
    }
  }
  configurations
}
