use crate::installer::HookState;
use crate::orchestrator::HookStatus;
use crossterm::style::Stylize;
use std::io::IsTerminal;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Ok,
    Warn,
    Error,
}

fn describe(state: &HookState) -> (Severity, String) {
    match state {
        HookState::Absent => (Severity::Error, "missing".to_string()),
        HookState::ForeignOnly => (
            Severity::Error,
            "not installed (existing hook left untouched)".to_string(),
        ),
        HookState::Managed {
            current: true,
            executable: true,
        } => (Severity::Ok, "ok".to_string()),
        HookState::Managed {
            current: false,
            executable,
        } => {
            let mut label = "stale, run `linthook install`".to_string();
            if !executable {
                label.push_str(" (not executable)");
            }
            (Severity::Warn, label)
        }
        HookState::Managed {
            current: true,
            executable: false,
        } => (Severity::Warn, "not executable".to_string()),
        HookState::Corrupt { reason } => (Severity::Error, format!("corrupt: {reason}")),
    }
}

/// True when any hook is missing, stale or corrupt.
pub fn needs_attention(statuses: &[HookStatus]) -> bool {
    statuses.iter().any(|s| !s.state.is_installed_and_current())
}

/// Plain-text listing, one hook per line.
pub fn render(statuses: &[HookStatus], work_tree: &Path) -> String {
    let mut out = String::new();
    for status in statuses {
        let (_, label) = describe(&status.state);
        out.push_str(&format!(
            "{:<10} {} ({})\n",
            status.kind.file_name(),
            label,
            display_path(&status.path, work_tree)
        ));
    }
    out
}

pub fn render_json(statuses: &[HookStatus]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(statuses)
}

pub fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal()
}

pub fn print_status(statuses: &[HookStatus], work_tree: &Path, color: bool) {
    if !color {
        print!("{}", render(statuses, work_tree));
        return;
    }

    for status in statuses {
        let (severity, label) = describe(&status.state);
        let label = match severity {
            Severity::Ok => label.green(),
            Severity::Warn => label.yellow(),
            Severity::Error => label.red(),
        };
        println!(
            "{:<10} {} ({})",
            status.kind.file_name().bold(),
            label,
            display_path(&status.path, work_tree)
        );
    }
}

fn display_path(path: &Path, work_tree: &Path) -> String {
    match path.strip_prefix(work_tree) {
        Ok(rest) => rest.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}
