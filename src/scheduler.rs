//! Fixed-interval sampling loop.
//!
//! Each tick refreshes the process table once, then walks the targets in
//! order (global first): resolve, sample, write. A failure on one target is
//! turned into a log line and never stops the others. Deadlines advance by
//! whole intervals from the first tick, so slow ticks do not accumulate drift;
//! a tick that overruns its interval is followed immediately by the next one,
//! never by a burst of catch-up ticks.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::ProcmonError;
use crate::logfile::{LogLevel, LogWriter};
use crate::process::{sample, ProcessResolver, Sample, SampleStatus, SystemProbe};
use crate::signal::SignalHandler;
use crate::target::Target;

/// Where the scheduler is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Tick,
    Sampling,
    Logging,
    Stopped,
}

/// Outcome counts for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Lines successfully appended.
    pub written: usize,
    pub not_found: usize,
    pub read_errors: usize,
    /// Targets whose line could not be written.
    pub write_failures: usize,
}

/// Next tick deadline after the one scheduled at `previous`.
///
/// Normally `previous + interval`; if that moment has already passed, the
/// next tick is due `now`. An interval too large for the clock saturates to
/// `now + interval`, or to `now` when even that overflows.
pub fn next_deadline(previous: Instant, interval: Duration, now: Instant) -> Instant {
    previous
        .checked_add(interval)
        .or_else(|| now.checked_add(interval))
        .unwrap_or(now)
        .max(now)
}

pub struct Scheduler<P: SystemProbe> {
    probe: P,
    resolver: ProcessResolver,
    writer: LogWriter,
    targets: Vec<Target>,
    interval: Duration,
    state: SchedulerState,
}

impl<P: SystemProbe> Scheduler<P> {
    pub fn new(probe: P, writer: LogWriter, targets: Vec<Target>, interval: Duration) -> Self {
        Self {
            probe,
            resolver: ProcessResolver::new(),
            writer,
            targets,
            interval,
            state: SchedulerState::Idle,
        }
    }

    /// Builds a scheduler for the configured targets, log directory and interval.
    pub fn from_config(config: &Config, probe: P) -> Self {
        let writer = LogWriter::new(&config.log_dir, &config.filename_template);
        Self::new(probe, writer, config.targets(), config.interval())
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn writer(&self) -> &LogWriter {
        &self.writer
    }

    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Runs until `shutdown` is requested. The first tick fires immediately.
    ///
    /// A stop request is honored between ticks, so an in-flight tick always
    /// finishes its writes. All log files are closed before returning.
    pub fn run(&mut self, shutdown: &SignalHandler) {
        info!(
            "Monitoring {} target(s) every {}s, logs in {}",
            self.targets.len(),
            self.interval.as_secs_f64(),
            self.writer.log_dir().display()
        );

        let mut deadline = Instant::now();
        while !shutdown.wait_until(deadline) {
            self.run_tick(Local::now());
            deadline = next_deadline(deadline, self.interval, Instant::now());
        }

        self.stop();
    }

    /// Samples every target once, stamping all lines with `now`.
    pub fn run_tick(&mut self, now: DateTime<Local>) -> TickReport {
        self.state = SchedulerState::Tick;
        self.probe.refresh();

        let mut report = TickReport::default();
        let targets = self.targets.clone();
        for target in &targets {
            self.state = SchedulerState::Sampling;
            let reading = self.sample_target(target, now);
            match reading.status {
                SampleStatus::Ok => {}
                SampleStatus::NotFound => report.not_found += 1,
                SampleStatus::Error(_) => report.read_errors += 1,
            }

            self.state = SchedulerState::Logging;
            match self.writer.write_sample(&reading) {
                Ok(()) => report.written += 1,
                Err(e) => {
                    report.write_failures += 1;
                    self.report_write_failure(target, now, &e);
                }
            }
        }

        if !targets.is_empty() && report.write_failures == targets.len() {
            error!(
                "No target could be written this tick; log directory {} is unusable",
                self.writer.log_dir().display()
            );
        }

        self.state = SchedulerState::Idle;
        report
    }

    fn sample_target(&mut self, target: &Target, now: DateTime<Local>) -> Sample {
        let name = match target {
            Target::Global => return sample(&self.probe, target, None, now),
            Target::Process(name) => name,
        };

        let handle = self.resolver.resolve(name, &self.probe);
        let reading = sample(&self.probe, target, handle.as_ref(), now);
        match &reading.status {
            SampleStatus::Ok => debug!(
                "{}: cpu={:.1}% mem={:.1}%",
                name, reading.usage.cpu_percent, reading.usage.memory_percent
            ),
            SampleStatus::NotFound => warn!("Process '{}' not found", name),
            SampleStatus::Error(reason) => {
                warn!("Failed to sample '{}': {}", name, reason);
                self.resolver.invalidate(name);
            }
        }
        reading
    }

    /// Reports a failed write loudly: a diagnostic, plus a CRITICAL line in
    /// the global file when the failing target is a process.
    fn report_write_failure(&mut self, target: &Target, now: DateTime<Local>, err: &ProcmonError) {
        error!("Failed to write log for '{}': {}", target, err);

        if *target == Target::Global {
            return;
        }
        let message = format!("Falha ao gravar log do alvo '{}': {}", target, err);
        if let Err(e) = self
            .writer
            .write(&Target::Global, &now, LogLevel::Critical, &message)
        {
            debug!("Could not record write failure in global log: {}", e);
        }
    }

    /// Closes every log file and enters the terminal state.
    pub fn stop(&mut self) {
        self.writer.close_all();
        self.state = SchedulerState::Stopped;
        info!("Monitoring stopped");
    }
}
