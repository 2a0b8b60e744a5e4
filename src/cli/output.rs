//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::RunEntry;
use crate::migrate::MigrationSummary;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the migration summary, plus per-record failure details when
/// there are any.
pub fn print_summary_table(summary: &MigrationSummary) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Total", "Migrated", "Skipped", "Failed"]);
    table.add_row(vec![
        summary.total.to_string(),
        summary.migrated.to_string(),
        summary.skipped.to_string(),
        summary.failed.to_string(),
    ]);
    println!("{table}");

    if summary.failures.is_empty() {
        return;
    }

    println!(
        "{}",
        style(format!("{} failed record(s):", summary.failures.len())).bold()
    );

    let mut failures = Table::new();
    failures.set_content_arrangement(ContentArrangement::Dynamic);
    failures.set_header(vec!["Id", "Account", "Reason"]);
    for f in &summary.failures {
        failures.add_row(vec![
            f.id.to_string(),
            f.identifier.clone(),
            f.reason.clone(),
        ]);
    }
    println!("{failures}");
}

/// Print past migration runs in a formatted table.
pub fn print_history_table(entries: &[RunEntry]) {
    println!(
        "{}",
        style(format!("{} recorded run(s):", entries.len())).bold()
    );

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Total", "Migrated", "Skipped", "Failed"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.total.to_string(),
            entry.migrated.to_string(),
            entry.skipped.to_string(),
            entry.failed.to_string(),
        ]);
    }

    println!("{table}");
}
