//! Reports for the informational CLI commands.

use std::path::Path;

use super::colors::*;
use super::table::render_table;
use crate::logfile::parse_log_line;
use crate::process::ProcessEntry;
use crate::target::Target;
use crate::top::CoreInfo;

const NOT_AVAILABLE: &str = "N/A";

/// Print the monitoring targets, one per line, in monitoring order.
pub fn print_targets(targets: &[Target]) {
    println!("Alvos de monitoramento configurados:");
    for target in targets {
        println!("- {}", target);
    }
}

/// Table rows for log lines: timestamp, level, CPU and memory.
///
/// Lines that are not log entries are skipped; entries without a reading
/// show `N/A` for CPU and memory.
pub fn log_summary_rows(lines: &[String]) -> Vec<Vec<String>> {
    let percent = |value: Option<f32>| {
        value
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    lines
        .iter()
        .filter_map(|line| parse_log_line(line))
        .map(|entry| {
            vec![
                entry.timestamp,
                entry.level,
                percent(entry.cpu_percent),
                percent(entry.memory_percent),
            ]
        })
        .collect()
}

/// Print the last entries of a target's most recent log file as a table.
pub fn print_log_summary(target: &Target, path: &Path, lines: &[String]) {
    println!(
        "Exibindo as últimas {} entradas do log mais recente para '{BOLD}{}{RESET}':",
        lines.len(),
        target
    );
    println!("{GRAY}Arquivo: {}{RESET}", path.display());

    if lines.is_empty() {
        println!("Log vazio.");
        return;
    }

    let rows = log_summary_rows(lines);
    if rows.is_empty() {
        println!("Não foi possível interpretar as linhas do log.");
        return;
    }
    print!(
        "{}",
        render_table(&["Timestamp", "Nível", "CPU (%)", "Memória (%)"], &rows)
    );
}

pub fn print_top_processes(entries: &[ProcessEntry]) {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.pid.to_string(),
                e.name.clone(),
                format!("{:.1}", e.usage.cpu_percent),
                format!("{:.1}", e.usage.memory_percent),
            ]
        })
        .collect();
    print!(
        "{}",
        render_table(&["PID", "Nome", "CPU (%)", "Memória (%)"], &rows)
    );
}

pub fn print_core_info(info: &CoreInfo) {
    let physical = info
        .physical
        .map(|n| n.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    println!("{BLUE}Núcleos físicos:{RESET} {}", physical);
    println!("{BLUE}Núcleos lógicos:{RESET} {}", info.logical);
    println!(
        "{BLUE}Uso total da CPU:{RESET} {:.1}%",
        info.system_usage_percent
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_summary_rows() {
        let lines = vec![
            "2025-05-03 18:00:05 :: INFO :: Uso CPU: 15.2% | Uso Memória: 30.5%".to_string(),
            "2025-05-03 18:01:05 :: WARNING :: Processo 'mysqld' não encontrado.".to_string(),
            "garbage".to_string(),
        ];

        let rows = log_summary_rows(&lines);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["2025-05-03 18:00:05", "INFO", "15.2", "30.5"]);
        assert_eq!(rows[1], vec!["2025-05-03 18:01:05", "WARNING", "N/A", "N/A"]);
    }

    #[test]
    fn test_print_reports_smoke() {
        print_targets(&[Target::Global, Target::from_name("mysqld")]);
        print_log_summary(&Target::Global, Path::new("logs/x.log"), &[]);
        print_core_info(&CoreInfo {
            physical: None,
            logical: 8,
            system_usage_percent: 3.0,
        });
    }
}
