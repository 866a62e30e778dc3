//! End-to-end checks of the sampling loop against a scripted process table.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone};
use procmon::logfile::{find_latest_log, parse_log_line, tail_lines};
use procmon::process::{ProcessEntry, Usage};
use procmon::{Config, LogWriter, ProcmonError, Result, Scheduler, SystemProbe, Target};
use tempfile::TempDir;

#[derive(Default)]
struct ScriptedProbe {
    processes: BTreeMap<u32, String>,
}

impl ScriptedProbe {
    fn start(&mut self, pid: u32, name: &str) {
        self.processes.insert(pid, name.to_string());
    }

    fn kill(&mut self, pid: u32) {
        self.processes.remove(&pid);
    }
}

impl SystemProbe for ScriptedProbe {
    fn refresh(&mut self) {}

    fn pids_named(&self, name: &str) -> Vec<u32> {
        self.processes
            .iter()
            .filter(|(_, n)| n.as_str() == name)
            .map(|(pid, _)| *pid)
            .collect()
    }

    fn process_name(&self, pid: u32) -> Option<String> {
        self.processes.get(&pid).cloned()
    }

    fn global_usage(&self) -> Result<Usage> {
        Ok(Usage::new(25.0, 60.0))
    }

    fn process_usage(&self, pid: u32) -> Result<Usage> {
        self.processes
            .get(&pid)
            .map(|_| Usage::new(pid as f32 / 100.0, 1.5))
            .ok_or_else(|| ProcmonError::SampleRead(format!("process {} has exited", pid)))
    }

    fn processes(&self) -> Vec<ProcessEntry> {
        Vec::new()
    }

    fn logical_cpus(&self) -> usize {
        1
    }

    fn physical_cpus(&self) -> Option<usize> {
        Some(1)
    }
}

fn config(dir: &Path, processes: &[&str]) -> Config {
    Config {
        log_dir: dir.to_path_buf(),
        processes: processes.iter().map(|p| p.to_string()).collect(),
        ..Default::default()
    }
}

/// Three minutes before the top of the hour.
fn start_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 5, 3, 18, 57, 30).unwrap()
}

fn mid_hour() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 5, 3, 18, 20, 0).unwrap()
}

fn files_for(dir: &Path, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with(prefix))
        .collect();
    names.sort();
    names
}

#[test]
fn rotation_splits_lines_by_hour_without_loss() {
    let temp_dir = TempDir::new().unwrap();
    let mut probe = ScriptedProbe::default();
    probe.start(1500, "mysqld");
    let mut scheduler = Scheduler::from_config(&config(temp_dir.path(), &["mysqld"]), probe);

    // Ten ticks one minute apart, crossing 19:00
    let ticks = 10;
    for i in 0..ticks {
        scheduler.run_tick(start_time() + ChronoDuration::minutes(i));
    }
    scheduler.stop();

    let files = files_for(temp_dir.path(), "mysqld_");
    assert_eq!(
        files,
        vec![
            "mysqld_PROCESSMONITOR_202505031800.log",
            "mysqld_PROCESSMONITOR_202505031900.log"
        ]
    );

    let mut total = 0;
    for (name, hour) in files.iter().zip(["18", "19"]) {
        let content = fs::read_to_string(temp_dir.path().join(name)).unwrap();
        for line in content.lines() {
            let entry = parse_log_line(line).unwrap();
            assert_eq!(&entry.timestamp[11..13], hour, "{} in {}", line, name);
            assert_eq!(entry.cpu_percent, Some(15.0));
            total += 1;
        }
    }
    assert_eq!(total, ticks as usize);
}

#[test]
fn restarted_process_is_picked_up_within_one_tick() {
    let temp_dir = TempDir::new().unwrap();
    let mut probe = ScriptedProbe::default();
    probe.start(100, "httpd");
    let mut scheduler = Scheduler::from_config(&config(temp_dir.path(), &["httpd"]), probe);

    let t0 = mid_hour();
    scheduler.run_tick(t0);
    scheduler.probe_mut().kill(100);
    scheduler.run_tick(t0 + ChronoDuration::seconds(60));
    scheduler.run_tick(t0 + ChronoDuration::seconds(120));
    scheduler.probe_mut().start(900, "httpd");
    scheduler.run_tick(t0 + ChronoDuration::seconds(180));
    scheduler.stop();

    let template = "PROCESSMONITOR_%DATAHORA%.log";
    let path = find_latest_log(temp_dir.path(), template, &Target::from_name("httpd"))
        .unwrap()
        .unwrap();
    assert!(path.ends_with("httpd_PROCESSMONITOR_202505031800.log"));
    let levels: Vec<String> = tail_lines(&path, 10)
        .unwrap()
        .iter()
        .map(|l| parse_log_line(l).unwrap().level)
        .collect();
    assert_eq!(levels, vec!["INFO", "WARNING", "WARNING", "INFO"]);
}

#[test]
fn global_only_when_no_processes_configured() {
    let temp_dir = TempDir::new().unwrap();
    let cfg = config(temp_dir.path(), &[]);
    let mut scheduler = Scheduler::from_config(&cfg, ScriptedProbe::default());

    let report = scheduler.run_tick(start_time());
    scheduler.stop();

    assert_eq!(report.written, 1);
    assert_eq!(
        files_for(temp_dir.path(), ""),
        vec!["PROCESSMONITOR_202505031800.log"]
    );
}

#[test]
fn target_list_is_global_first_without_duplicates() {
    let cfg = config(Path::new("logs"), &["mysqld", "httpd", "mysqld"]);
    let names: Vec<String> = cfg.targets().iter().map(|t| t.name().to_string()).collect();
    assert_eq!(names, vec!["global", "mysqld", "httpd"]);
}

#[test]
fn writer_current_path_matches_latest_log() {
    let temp_dir = TempDir::new().unwrap();
    let mut writer = LogWriter::new(temp_dir.path(), "PROCESSMONITOR_%DATAHORA%.log");
    let target = Target::from_name("mysqld");

    writer
        .write(&target, &start_time(), procmon::LogLevel::Info, "x")
        .unwrap();
    let current = writer.current_path(&target).unwrap().to_path_buf();
    writer.close_all();

    let latest = find_latest_log(temp_dir.path(), writer.template(), &target).unwrap();
    assert_eq!(latest, Some(current));
}
