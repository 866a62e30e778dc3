//! Test utilities shared across modules.
//!
//! [`FakeProbe`] is a scripted process table: tests add, remove and break
//! processes between ticks to drive the resolver, sampler and scheduler
//! without touching the real OS.

use std::collections::{BTreeMap, HashSet};

use crate::error::{ProcmonError, Result};
use crate::process::{ProcessEntry, SystemProbe, Usage};

#[derive(Debug, Default)]
pub struct FakeProbe {
    processes: BTreeMap<u32, (String, Usage)>,
    global: Option<Usage>,
    broken_pids: HashSet<u32>,
    pub refresh_count: usize,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self {
            global: Some(Usage::new(10.0, 50.0)),
            ..Default::default()
        }
    }

    pub fn with_process(mut self, pid: u32, name: &str, usage: Usage) -> Self {
        self.add_process(pid, name, usage);
        self
    }

    pub fn add_process(&mut self, pid: u32, name: &str, usage: Usage) {
        self.processes.insert(pid, (name.to_string(), usage));
    }

    pub fn remove_process(&mut self, pid: u32) {
        self.processes.remove(&pid);
    }

    pub fn set_global(&mut self, usage: Usage) {
        self.global = Some(usage);
    }

    /// Makes the next global reads fail.
    pub fn break_global(&mut self) {
        self.global = None;
    }

    /// Keeps `pid` in the table but makes reading its usage fail.
    pub fn break_reads(&mut self, pid: u32) {
        self.broken_pids.insert(pid);
    }
}

impl SystemProbe for FakeProbe {
    fn refresh(&mut self) {
        self.refresh_count += 1;
    }

    fn pids_named(&self, name: &str) -> Vec<u32> {
        self.processes
            .iter()
            .filter(|(_, (n, _))| n == name)
            .map(|(pid, _)| *pid)
            .collect()
    }

    fn process_name(&self, pid: u32) -> Option<String> {
        self.processes.get(&pid).map(|(name, _)| name.clone())
    }

    fn global_usage(&self) -> Result<Usage> {
        self.global
            .ok_or_else(|| ProcmonError::SampleRead("global counters unavailable".to_string()))
    }

    fn process_usage(&self, pid: u32) -> Result<Usage> {
        if self.broken_pids.contains(&pid) {
            return Err(ProcmonError::SampleRead(format!("access denied to {}", pid)));
        }
        self.processes
            .get(&pid)
            .map(|(_, usage)| *usage)
            .ok_or_else(|| ProcmonError::SampleRead(format!("process {} has exited", pid)))
    }

    fn processes(&self) -> Vec<ProcessEntry> {
        self.processes
            .iter()
            .map(|(pid, (name, usage))| ProcessEntry {
                pid: *pid,
                name: name.clone(),
                usage: *usage,
            })
            .collect()
    }

    fn logical_cpus(&self) -> usize {
        4
    }

    fn physical_cpus(&self) -> Option<usize> {
        Some(2)
    }
}
