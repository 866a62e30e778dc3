//! Monitoring targets.
//!
//! A target is either the whole system (`global`) or a process name. The set
//! of targets is fixed once the configuration is loaded.

use std::fmt;

/// Reserved name of the system-wide target.
pub const GLOBAL_TARGET: &str = "global";

/// What a target measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Global,
    NamedProcess,
}

/// A monitored target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// System-wide CPU and memory usage.
    Global,
    /// Every reading resolves the process by this exact name.
    Process(String),
}

impl Target {
    /// Builds a target from its display name. `"global"` maps to [`Target::Global`].
    pub fn from_name(name: &str) -> Self {
        if name == GLOBAL_TARGET {
            Target::Global
        } else {
            Target::Process(name.to_string())
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Global => TargetKind::Global,
            Target::Process(_) => TargetKind::NamedProcess,
        }
    }

    /// Display name, as accepted by `--list <TARGET>`.
    pub fn name(&self) -> &str {
        match self {
            Target::Global => GLOBAL_TARGET,
            Target::Process(name) => name,
        }
    }

    /// Prefix prepended to the log filename: empty for global, `{name}_` otherwise.
    pub fn file_prefix(&self) -> String {
        match self {
            Target::Global => String::new(),
            Target::Process(name) => format!("{}_", name),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the ordered target list: global first, then each process name in
/// configured order. Blank names, repeats and the reserved `global` name are skipped.
pub fn build_targets<S: AsRef<str>>(process_names: &[S]) -> Vec<Target> {
    let mut targets = vec![Target::Global];
    for name in process_names {
        let name = name.as_ref().trim();
        if name.is_empty() || name == GLOBAL_TARGET {
            continue;
        }
        let target = Target::Process(name.to_string());
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    targets
}

/// Looks a target up by display name.
pub fn find_target<'a>(targets: &'a [Target], name: &str) -> Option<&'a Target> {
    targets.iter().find(|t| t.name() == name)
}
