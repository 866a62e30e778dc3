//! OS process table access using sysinfo.
//!
//! [`SystemProbe`] is the seam between the sampling core and the operating
//! system. [`SysinfoProbe`] is the real implementation; tests use a scripted
//! fake.

use std::ffi::OsStr;
use std::thread;
use std::time::{Duration, Instant};

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, MINIMUM_CPU_UPDATE_INTERVAL};

use crate::error::{ProcmonError, Result};

/// CPU and memory usage, both on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Usage {
    /// CPU usage, normalized so that 100.0 means every core is busy.
    pub cpu_percent: f32,
    /// Resident memory as a percentage of total system memory.
    pub memory_percent: f32,
}

impl Usage {
    pub fn new(cpu_percent: f32, memory_percent: f32) -> Self {
        Self {
            cpu_percent,
            memory_percent,
        }
    }
}

/// One row of the process table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub usage: Usage,
}

/// Read access to the process table and system counters.
///
/// Readings reflect the state captured by the last [`SystemProbe::refresh`].
pub trait SystemProbe {
    /// Re-reads CPU counters, memory and the process table.
    fn refresh(&mut self);

    /// PIDs of live processes whose OS-reported name equals `name`, ascending.
    fn pids_named(&self, name: &str) -> Vec<u32>;

    /// OS-reported name of `pid`, or `None` if the process is gone.
    fn process_name(&self, pid: u32) -> Option<String>;

    /// System-wide usage.
    fn global_usage(&self) -> Result<Usage>;

    /// Usage of a single process.
    fn process_usage(&self, pid: u32) -> Result<Usage>;

    /// Snapshot of every process in the table.
    fn processes(&self) -> Vec<ProcessEntry>;

    fn logical_cpus(&self) -> usize;

    fn physical_cpus(&self) -> Option<usize>;
}

/// [`SystemProbe`] backed by `sysinfo::System`.
///
/// CPU percentages are deltas between two refreshes, so the counters are
/// primed once at construction and every [`SystemProbe::refresh`] reads the
/// usage accumulated since the previous one. A refresh that comes sooner than
/// [`MINIMUM_CPU_UPDATE_INTERVAL`] after the previous one sleeps out the rest
/// of that window first, so the first tick after startup reads a real delta.
pub struct SysinfoProbe {
    system: System,
    total_memory: u64,
    logical_cpus: usize,
    last_refresh: Instant,
    cpu_window: Duration,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_cpu_usage();
        system.refresh_processes_specifics(ProcessesToUpdate::All, true, refresh_kind());

        let total_memory = system.total_memory();
        let logical_cpus = system.cpus().len().max(1);

        Self {
            system,
            total_memory,
            logical_cpus,
            last_refresh: Instant::now(),
            cpu_window: Duration::ZERO,
        }
    }

    /// Length of the measurement window behind the current CPU readings.
    pub fn cpu_window(&self) -> Duration {
        self.cpu_window
    }

    fn memory_percent(&self, bytes: u64) -> f32 {
        if self.total_memory > 0 {
            (bytes as f64 / self.total_memory as f64 * 100.0) as f32
        } else {
            0.0
        }
    }

    fn normalize_cpu(&self, cpu: f32) -> f32 {
        cpu / self.logical_cpus as f32
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing().with_cpu().with_memory()
}

impl SystemProbe for SysinfoProbe {
    fn refresh(&mut self) {
        let elapsed = self.last_refresh.elapsed();
        if elapsed < MINIMUM_CPU_UPDATE_INTERVAL {
            thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL - elapsed);
        }
        self.cpu_window = self.last_refresh.elapsed();
        self.last_refresh = Instant::now();

        self.system.refresh_memory();
        self.system.refresh_cpu_usage();
        // Dead processes are dropped from the table so liveness checks see them go.
        self.system
            .refresh_processes_specifics(ProcessesToUpdate::All, true, refresh_kind());
        self.total_memory = self.system.total_memory();
    }

    fn pids_named(&self, name: &str) -> Vec<u32> {
        let mut pids: Vec<u32> = self
            .system
            .processes_by_exact_name(OsStr::new(name))
            .map(|p| p.pid().as_u32())
            .collect();
        pids.sort_unstable();
        pids
    }

    fn process_name(&self, pid: u32) -> Option<String> {
        self.system
            .process(Pid::from_u32(pid))
            .map(|p| p.name().to_string_lossy().into_owned())
    }

    fn global_usage(&self) -> Result<Usage> {
        if self.total_memory == 0 {
            return Err(ProcmonError::SampleRead(
                "total system memory is unavailable".to_string(),
            ));
        }
        let used = self.system.used_memory();
        Ok(Usage::new(
            self.system.global_cpu_usage(),
            self.memory_percent(used),
        ))
    }

    fn process_usage(&self, pid: u32) -> Result<Usage> {
        let process = self
            .system
            .process(Pid::from_u32(pid))
            .ok_or_else(|| ProcmonError::SampleRead(format!("process {} has exited", pid)))?;

        Ok(Usage::new(
            self.normalize_cpu(process.cpu_usage()),
            self.memory_percent(process.memory()),
        ))
    }

    fn processes(&self) -> Vec<ProcessEntry> {
        self.system
            .processes()
            .values()
            .map(|p| ProcessEntry {
                pid: p.pid().as_u32(),
                name: p.name().to_string_lossy().into_owned(),
                usage: Usage::new(
                    self.normalize_cpu(p.cpu_usage()),
                    self.memory_percent(p.memory()),
                ),
            })
            .collect()
    }

    fn logical_cpus(&self) -> usize {
        self.logical_cpus
    }

    fn physical_cpus(&self) -> Option<usize> {
        self.system.physical_core_count()
    }
}
