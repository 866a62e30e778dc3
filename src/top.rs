//! Busiest-process ranking and CPU core summary.

use std::thread;

use crate::error::Result;
use crate::process::{ProcessEntry, SystemProbe};

pub const DEFAULT_TOP_COUNT: usize = 10;

/// Ranking criterion for [`top_processes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
}

/// Core counts and overall CPU usage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreInfo {
    /// `None` when the platform does not report physical cores.
    pub physical: Option<usize>,
    pub logical: usize,
    pub system_usage_percent: f32,
}

/// Refreshes `probe` twice, one minimum CPU update interval apart, so CPU
/// percentages reflect a real measurement window.
pub fn measure<P: SystemProbe>(probe: &mut P) {
    probe.refresh();
    thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    probe.refresh();
}

/// The `count` processes with the highest usage by `key`, highest first.
/// Ties keep ascending PID order.
pub fn top_processes(probe: &dyn SystemProbe, count: usize, key: SortKey) -> Vec<ProcessEntry> {
    let mut entries = probe.processes();
    entries.sort_by_key(|e| e.pid);
    entries.sort_by(|a, b| match key {
        SortKey::Cpu => b.usage.cpu_percent.total_cmp(&a.usage.cpu_percent),
        SortKey::Memory => b.usage.memory_percent.total_cmp(&a.usage.memory_percent),
    });
    entries.truncate(count);
    entries
}

pub fn core_info(probe: &dyn SystemProbe) -> Result<CoreInfo> {
    Ok(CoreInfo {
        physical: probe.physical_cpus(),
        logical: probe.logical_cpus(),
        system_usage_percent: probe.global_usage()?.cpu_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Usage;
    use crate::test_utils::FakeProbe;

    fn probe() -> FakeProbe {
        FakeProbe::new()
            .with_process(10, "idle", Usage::new(0.0, 1.0))
            .with_process(20, "compiler", Usage::new(80.0, 10.0))
            .with_process(30, "database", Usage::new(20.0, 40.0))
            .with_process(40, "browser", Usage::new(20.0, 30.0))
    }

    #[test]
    fn test_top_by_cpu() {
        let top = top_processes(&probe(), 3, SortKey::Cpu);
        let pids: Vec<u32> = top.iter().map(|e| e.pid).collect();
        assert_eq!(pids, vec![20, 30, 40]);
    }

    #[test]
    fn test_top_by_memory() {
        let top = top_processes(&probe(), 2, SortKey::Memory);
        let names: Vec<&str> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["database", "browser"]);
    }

    #[test]
    fn test_top_count_larger_than_table() {
        assert_eq!(top_processes(&probe(), 50, SortKey::Cpu).len(), 4);
        assert!(top_processes(&FakeProbe::new(), 5, SortKey::Cpu).is_empty());
    }

    #[test]
    fn test_core_info() {
        let mut probe = FakeProbe::new();
        probe.set_global(Usage::new(12.5, 40.0));

        let info = core_info(&probe).unwrap();
        assert_eq!(info.physical, Some(2));
        assert_eq!(info.logical, 4);
        assert_eq!(info.system_usage_percent, 12.5);
    }

    #[test]
    fn test_core_info_propagates_read_failure() {
        let mut probe = FakeProbe::new();
        probe.break_global();
        assert!(core_info(&probe).is_err());
    }

    #[test]
    fn test_measure_refreshes_twice() {
        let mut probe = FakeProbe::new();
        measure(&mut probe);
        assert_eq!(probe.refresh_count, 2);
    }
}
