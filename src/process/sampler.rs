//! One CPU/memory reading per target per tick.

use chrono::{DateTime, Local};

use super::probe::{SystemProbe, Usage};
use super::resolver::ProcessHandle;
use crate::logfile::LogLevel;
use crate::target::Target;

/// Outcome of a reading.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleStatus {
    Ok,
    /// No process with the target's name was running.
    NotFound,
    /// The read failed; carries the reason.
    Error(String),
}

/// A single reading, consumed immediately by the log writer.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Local>,
    pub target: Target,
    pub status: SampleStatus,
    pub usage: Usage,
    /// PID the reading was taken from, for process targets.
    pub pid: Option<u32>,
}

impl Sample {
    fn new(timestamp: DateTime<Local>, target: &Target, status: SampleStatus) -> Self {
        Self {
            timestamp,
            target: target.clone(),
            status,
            usage: Usage::default(),
            pid: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == SampleStatus::Ok
    }

    pub fn level(&self) -> LogLevel {
        match self.status {
            SampleStatus::Ok => LogLevel::Info,
            SampleStatus::NotFound => LogLevel::Warning,
            SampleStatus::Error(_) => LogLevel::Error,
        }
    }

    /// Log message body for this reading.
    pub fn message(&self) -> String {
        match (&self.status, &self.target) {
            (SampleStatus::Ok, _) => format!(
                "Uso CPU: {:.1}% | Uso Memória: {:.1}%",
                self.usage.cpu_percent, self.usage.memory_percent
            ),
            (SampleStatus::NotFound, target) => {
                format!("Processo '{}' não encontrado.", target.name())
            }
            (SampleStatus::Error(reason), Target::Global) => {
                format!("Falha ao coletar estatísticas globais: {}", reason)
            }
            (SampleStatus::Error(reason), Target::Process(name)) => match self.pid {
                Some(pid) => format!(
                    "Falha ao ler métricas do processo '{}' (PID {}): {}",
                    name, pid, reason
                ),
                None => format!("Falha ao ler métricas do processo '{}': {}", name, reason),
            },
        }
    }
}

/// Reads one sample for `target`.
///
/// The global target ignores `handle`. A process target without a handle is
/// reported as [`SampleStatus::NotFound`]; a handle whose process died since
/// resolution yields [`SampleStatus::Error`]. Never panics or propagates.
pub fn sample(
    probe: &dyn SystemProbe,
    target: &Target,
    handle: Option<&ProcessHandle>,
    timestamp: DateTime<Local>,
) -> Sample {
    let result = match (target, handle) {
        (Target::Global, _) => probe.global_usage(),
        (Target::Process(_), None) => {
            return Sample::new(timestamp, target, SampleStatus::NotFound);
        }
        (Target::Process(_), Some(handle)) => probe.process_usage(handle.pid()),
    };

    let mut sample = match result {
        Ok(usage) => Sample {
            usage,
            ..Sample::new(timestamp, target, SampleStatus::Ok)
        },
        Err(e) => Sample::new(timestamp, target, SampleStatus::Error(e.to_string())),
    };
    if let Target::Process(_) = target {
        sample.pid = handle.map(ProcessHandle::pid);
    }
    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeProbe;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 3, h, m, s).unwrap()
    }

    #[test]
    fn test_sample_global_ok() {
        let mut probe = FakeProbe::new();
        probe.set_global(Usage::new(15.24, 30.46));

        let s = sample(&probe, &Target::Global, None, at(18, 0, 5));
        assert!(s.is_ok());
        assert_eq!(s.level(), LogLevel::Info);
        assert_eq!(s.pid, None);
        assert_eq!(s.message(), "Uso CPU: 15.2% | Uso Memória: 30.5%");
    }

    #[test]
    fn test_sample_global_error() {
        let mut probe = FakeProbe::new();
        probe.break_global();

        let s = sample(&probe, &Target::Global, None, at(18, 0, 5));
        assert!(matches!(s.status, SampleStatus::Error(_)));
        assert_eq!(s.level(), LogLevel::Error);
        assert!(s.message().starts_with("Falha ao coletar estatísticas globais"));
    }

    #[test]
    fn test_sample_process_ok() {
        let probe = FakeProbe::new().with_process(42, "mysqld", Usage::new(15.2, 30.5));
        let target = Target::from_name("mysqld");
        let handle = ProcessHandle::new(42, "mysqld");

        let s = sample(&probe, &target, Some(&handle), at(18, 0, 5));
        assert!(s.is_ok());
        assert_eq!(s.pid, Some(42));
        assert_eq!(s.usage, Usage::new(15.2, 30.5));
    }

    #[test]
    fn test_sample_process_without_handle_is_not_found() {
        let probe = FakeProbe::new();
        let target = Target::from_name("httpd");

        let s = sample(&probe, &target, None, at(18, 0, 5));
        assert_eq!(s.status, SampleStatus::NotFound);
        assert_eq!(s.level(), LogLevel::Warning);
        assert_eq!(s.message(), "Processo 'httpd' não encontrado.");
    }

    #[test]
    fn test_sample_process_died_after_resolution_is_error() {
        let probe = FakeProbe::new();
        let target = Target::from_name("mysqld");
        let handle = ProcessHandle::new(42, "mysqld");

        let s = sample(&probe, &target, Some(&handle), at(18, 0, 5));
        assert!(matches!(s.status, SampleStatus::Error(_)));
        assert!(s.message().contains("(PID 42)"));
    }

    #[test]
    fn test_sample_message_rounds_to_one_decimal() {
        let mut probe = FakeProbe::new();
        probe.set_global(Usage::new(0.04, 99.96));

        let s = sample(&probe, &Target::Global, None, at(9, 0, 0));
        assert_eq!(s.message(), "Uso CPU: 0.0% | Uso Memória: 100.0%");
    }
}
