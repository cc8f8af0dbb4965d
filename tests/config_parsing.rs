use linthook::config::{validate_hook_config, RootConfig};
use linthook::loader::ConfigLoader;
use linthook::HookKind;
use tempfile::TempDir;

#[test]
fn empty_config_uses_defaults() {
    let config: RootConfig = toml::from_str("").unwrap();
    assert_eq!(config.hook.wrapper, "gradlew");
    assert_eq!(config.hook.lint_task, "lintKotlin");
    assert_eq!(config.hook.format_task, "formatKotlin");
    assert_eq!(config.hook.staged_pattern, r"\.kts?$");
    assert_eq!(config.hook.kinds, vec![HookKind::PrePush]);
}

#[test]
fn parse_full_hook_section() {
    let toml_str = r#"
[hook]
wrapper = "tools/gradlew"
lint_task = "ktlintCheck"
format_task = "ktlintFormat"
staged_pattern = '\.kt$'
kinds = ["pre-push", "pre-commit"]
"#;
    let config: RootConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.hook.wrapper, "tools/gradlew");
    assert_eq!(config.hook.lint_task, "ktlintCheck");
    assert_eq!(config.hook.staged_pattern, r"\.kt$");
    assert_eq!(config.hook.kinds, vec![HookKind::PrePush, HookKind::PreCommit]);
    assert!(validate_hook_config(&config.hook).is_empty());
}

#[test]
fn unknown_keys_are_rejected() {
    let result: Result<RootConfig, _> = toml::from_str("[hook]\nwrapperr = \"gradlew\"\n");
    assert!(result.is_err());
}

#[test]
fn unknown_hook_kind_is_rejected() {
    let result: Result<RootConfig, _> = toml::from_str("[hook]\nkinds = [\"post-merge\"]\n");
    assert!(result.is_err());
}

#[test]
fn validation_flags_unsafe_values() {
    let config: RootConfig = toml::from_str(
        r#"
[hook]
wrapper = "$(rm -rf /)"
lint_task = "lint; echo"
format_task = ""
staged_pattern = "a/b"
kinds = []
"#,
    )
    .unwrap();

    let errors = validate_hook_config(&config.hook);
    assert_eq!(errors.len(), 5, "errors: {errors:?}");
    assert!(errors.iter().any(|e| e.contains("hook.wrapper")));
    assert!(errors.iter().any(|e| e.contains("hook.lint_task")));
    assert!(errors.iter().any(|e| e.contains("hook.format_task must not be empty")));
    assert!(errors.iter().any(|e| e.contains("hook.staged_pattern")));
    assert!(errors.iter().any(|e| e.contains("hook.kinds")));
}

#[test]
fn absolute_wrapper_is_rejected() {
    let config: RootConfig = toml::from_str("[hook]\nwrapper = \"/usr/bin/gradle\"\n").unwrap();
    let errors = validate_hook_config(&config.hook);
    assert!(errors[0].contains("relative"));
}

#[test]
fn loader_without_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::new(dir.path()).unwrap();
    assert_eq!(loader.hook().wrapper, "gradlew");
    assert_eq!(loader.hook().kinds, vec![HookKind::PrePush]);
}

#[test]
fn loader_reports_invalid_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("linthook.toml"), "[hook]\nkinds = []\n").unwrap();

    let err = ConfigLoader::new(dir.path()).err().unwrap();
    assert!(err.to_string().contains("invalid configuration"));
}

#[test]
fn loader_reports_parse_errors_with_path() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("linthook.toml"), "[hook\n").unwrap();

    let err = ConfigLoader::new(dir.path()).err().unwrap();
    assert!(err.to_string().contains("failed to parse"));
}
