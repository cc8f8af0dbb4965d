use crate::script::HookKind;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootConfig {
    #[serde(default)]
    pub hook: HookConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookConfig {
    /// Build wrapper, relative to the project directory.
    #[serde(default = "default_wrapper")]
    pub wrapper: String,
    #[serde(default = "default_lint_task")]
    pub lint_task: String,
    #[serde(default = "default_format_task")]
    pub format_task: String,
    #[serde(default = "default_staged_pattern")]
    pub staged_pattern: String,
    #[serde(default = "default_kinds")]
    pub kinds: Vec<HookKind>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            wrapper: default_wrapper(),
            lint_task: default_lint_task(),
            format_task: default_format_task(),
            staged_pattern: default_staged_pattern(),
            kinds: default_kinds(),
        }
    }
}

fn default_wrapper() -> String {
    "gradlew".to_string()
}

fn default_lint_task() -> String {
    "lintKotlin".to_string()
}

fn default_format_task() -> String {
    "formatKotlin".to_string()
}

fn default_staged_pattern() -> String {
    r"\.kts?$".to_string()
}

fn default_kinds() -> Vec<HookKind> {
    vec![HookKind::PrePush]
}

/// Characters that would break out of the double-quoted `WRAPPER=` line or
/// the bare task arguments in the rendered scripts.
pub(crate) const SHELL_UNSAFE: &[char] = &['"', '\'', '`', '$', '\\', ';', '&', '|', '<', '>', '\n', '\r'];

pub fn validate_hook_config(hook: &HookConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if hook.wrapper.trim().is_empty() {
        errors.push("hook.wrapper must not be empty".to_string());
    } else if hook.wrapper.contains(SHELL_UNSAFE) {
        errors.push(format!(
            "hook.wrapper '{}' contains shell metacharacters",
            hook.wrapper
        ));
    } else if hook.wrapper.starts_with('/') {
        errors.push(format!(
            "hook.wrapper '{}' must be relative to the project directory",
            hook.wrapper
        ));
    }

    for (key, task) in [("lint_task", &hook.lint_task), ("format_task", &hook.format_task)] {
        if task.trim().is_empty() {
            errors.push(format!("hook.{key} must not be empty"));
        } else if task.contains(SHELL_UNSAFE) || task.contains(char::is_whitespace) {
            errors.push(format!(
                "hook.{key} '{task}' must be a single task name without shell metacharacters"
            ));
        }
    }

    if hook.staged_pattern.is_empty() {
        errors.push("hook.staged_pattern must not be empty".to_string());
    } else if hook.staged_pattern.contains(['\'', '/', '\n', '\r']) {
        errors.push(format!(
            "hook.staged_pattern '{}' must not contain quotes, slashes or newlines",
            hook.staged_pattern
        ));
    }

    if hook.kinds.is_empty() {
        errors.push("hook.kinds must name at least one hook".to_string());
    }

    errors
}
