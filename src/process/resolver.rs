//! Name-based process resolution with a self-healing handle cache.
//!
//! PIDs are not stable across restarts, so a handle is only trusted while the
//! process it points at is still alive and still carries the same name. A dead
//! or invalidated handle is re-derived from the process table on the next
//! resolve.

use std::collections::HashMap;

use tracing::{debug, info};

use super::probe::SystemProbe;

/// Reference to a running OS process matching a target name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pid: u32,
    name: String,
    alive: bool,
}

impl ProcessHandle {
    pub fn new(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
            alive: true,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last-known liveness, as of the most recent check.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Re-checks liveness against the probe. A PID reused by a differently
    /// named process counts as dead.
    fn check_alive(&mut self, probe: &dyn SystemProbe) -> bool {
        self.alive = probe
            .process_name(self.pid)
            .is_some_and(|current| current == self.name);
        self.alive
    }
}

/// Maps process names to live handles, caching the last match per name.
#[derive(Debug, Default)]
pub struct ProcessResolver {
    cache: HashMap<String, ProcessHandle>,
}

impl ProcessResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a live handle for `name`, or `None` when no process carries it.
    ///
    /// A cached handle is reused while it passes the liveness check; otherwise
    /// the process table is scanned and the lowest matching PID is cached.
    pub fn resolve(&mut self, name: &str, probe: &dyn SystemProbe) -> Option<ProcessHandle> {
        if let Some(handle) = self.cache.get_mut(name) {
            if handle.check_alive(probe) {
                return Some(handle.clone());
            }
            debug!("Cached PID {} for '{}' is gone", handle.pid, name);
        }

        let previous = self.cache.remove(name).map(|h| h.pid);

        let pid = probe.pids_named(name).into_iter().next()?;
        if previous != Some(pid) {
            info!("Resolved process '{}' to PID {}", name, pid);
        }

        let handle = ProcessHandle::new(pid, name);
        self.cache.insert(name.to_string(), handle.clone());
        Some(handle)
    }

    /// Drops the cached handle so the next resolve rescans the process table.
    pub fn invalidate(&mut self, name: &str) {
        if let Some(mut handle) = self.cache.remove(name) {
            handle.alive = false;
            debug!("Invalidated handle for '{}' (PID {})", name, handle.pid);
        }
    }

    /// Currently cached handle for `name`, without re-checking liveness.
    pub fn cached(&self, name: &str) -> Option<&ProcessHandle> {
        self.cache.get(name)
    }
}
