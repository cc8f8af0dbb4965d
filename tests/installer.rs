use linthook::block::{END_MARKER, START_MARKER};
use linthook::{HookError, HookInstaller, HookState, InstallOutcome, UninstallOutcome};
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

const COMMAND: &str = "WRAPPER=\"$(git rev-parse --show-toplevel)/gradlew\"\n\"$WRAPPER\" formatKotlin";

fn mode(path: &std::path::Path) -> u32 {
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

// --- install ---

#[test]
fn installs_hook_without_hook_directory() {
    let repo = TempDir::new().unwrap();
    std::fs::create_dir(repo.path().join(".git")).unwrap();
    let hook = repo.path().join(".git/hooks/pre-push");

    let outcome = HookInstaller::default().install(&hook, COMMAND).unwrap();

    assert_eq!(outcome, InstallOutcome::Created);
    let content = std::fs::read_to_string(&hook).unwrap();
    assert!(content.starts_with("#!/bin/sh\n"));
    assert!(content.contains("\"$WRAPPER\" formatKotlin"));
    assert_eq!(mode(&hook), 0o755);
}

#[test]
fn installs_hook_after_existing_foreign_hook() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let existing = "#!/bin/bash\nThis is some existing hook";
    std::fs::write(&hook, existing).unwrap();

    let outcome = HookInstaller::default().install(&hook, COMMAND).unwrap();

    assert_eq!(outcome, InstallOutcome::Updated);
    let content = std::fs::read_to_string(&hook).unwrap();
    assert!(content.starts_with(existing));
    assert!(content.contains("\"$WRAPPER\" formatKotlin"));
    assert_eq!(content.matches(START_MARKER).count(), 1);
}

#[test]
fn updates_previously_installed_block() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let placeholder = "Not actually the hook, just a placeholder";
    std::fs::write(&hook, format!("{START_MARKER}\n{placeholder}\n{END_MARKER}")).unwrap();

    HookInstaller::default().install(&hook, COMMAND).unwrap();

    let content = std::fs::read_to_string(&hook).unwrap();
    assert!(!content.contains(placeholder));
    assert!(content.contains("\"$WRAPPER\" formatKotlin"));
    assert_eq!(content.matches(START_MARKER).count(), 1);
    assert_eq!(content.matches(END_MARKER).count(), 1);
}

#[test]
fn second_install_is_up_to_date_and_byte_identical() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("hooks/pre-push");
    let installer = HookInstaller::default();

    assert_eq!(installer.install(&hook, COMMAND).unwrap(), InstallOutcome::Created);
    let first = std::fs::read(&hook).unwrap();
    let first_mtime = std::fs::metadata(&hook).unwrap().modified().unwrap();

    assert_eq!(installer.install(&hook, COMMAND).unwrap(), InstallOutcome::UpToDate);
    assert_eq!(std::fs::read(&hook).unwrap(), first);
    assert_eq!(std::fs::metadata(&hook).unwrap().modified().unwrap(), first_mtime);
}

#[test]
fn changed_command_replaces_block_and_keeps_surroundings() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let before = "#!/bin/bash\necho before\n";
    let after = "echo after\n";
    std::fs::write(
        &hook,
        format!("{before}{START_MARKER}\nold-command\n{END_MARKER}\n{after}"),
    )
    .unwrap();

    let outcome = HookInstaller::default().install(&hook, "new-command").unwrap();

    assert_eq!(outcome, InstallOutcome::Updated);
    assert_eq!(
        std::fs::read_to_string(&hook).unwrap(),
        format!("{before}{START_MARKER}\nnew-command\n{END_MARKER}\n{after}")
    );
}

#[test]
fn up_to_date_install_restores_executable_bit() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let installer = HookInstaller::default();
    installer.install(&hook, COMMAND).unwrap();
    std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(installer.install(&hook, COMMAND).unwrap(), InstallOutcome::UpToDate);
    assert_eq!(mode(&hook), 0o755);
}

#[test]
fn empty_existing_file_gets_shebang() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    std::fs::write(&hook, "").unwrap();

    HookInstaller::default().install(&hook, "lint").unwrap();

    assert_eq!(
        std::fs::read_to_string(&hook).unwrap(),
        format!("#!/bin/sh\n{START_MARKER}\nlint\n{END_MARKER}\n")
    );
}

#[test]
fn no_temp_files_are_left_behind() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    HookInstaller::default().install(&hook, "lint").unwrap();
    HookInstaller::default().install(&hook, "lint --again").unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["pre-push".to_string()]);
}

#[test]
fn symlinked_hook_keeps_the_link() {
    let dir = TempDir::new().unwrap();
    let shared = dir.path().join("shared-pre-push");
    std::fs::write(&shared, "#!/bin/sh\necho shared\n").unwrap();
    let hooks = dir.path().join("hooks");
    std::fs::create_dir(&hooks).unwrap();
    let link = hooks.join("pre-push");
    std::os::unix::fs::symlink(&shared, &link).unwrap();

    HookInstaller::default().install(&link, "lint").unwrap();

    assert!(link.is_symlink());
    let content = std::fs::read_to_string(&shared).unwrap();
    assert!(content.starts_with("#!/bin/sh\necho shared\n"));
    assert!(content.contains("lint"));
}

#[test]
fn empty_command_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");

    let err = HookInstaller::default().install(&hook, "   ").unwrap_err();

    assert!(matches!(err, HookError::InvalidInput(_)));
    assert!(!hook.exists());
}

#[test]
fn command_containing_end_marker_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let command = format!("echo hi\n{END_MARKER}");

    let err = HookInstaller::default().install(&hook, &command).unwrap_err();
    assert!(matches!(err, HookError::InvalidInput(_)));
}

#[test]
fn duplicate_blocks_are_corrupt_and_left_untouched() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let corrupt = format!("{START_MARKER}\na\n{END_MARKER}\n{START_MARKER}\nb\n{END_MARKER}\n");
    std::fs::write(&hook, &corrupt).unwrap();

    let err = HookInstaller::default().install(&hook, "lint").unwrap_err();

    assert!(matches!(err, HookError::CorruptHook { .. }));
    assert_eq!(std::fs::read_to_string(&hook).unwrap(), corrupt);
}

#[test]
fn unwritable_directory_is_io_failure() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    let err = HookInstaller::default()
        .install(&blocker.join("pre-push"), "lint")
        .unwrap_err();

    assert!(matches!(err, HookError::Io { .. }));
}

#[test]
fn non_utf8_foreign_content_is_carried_through() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let foreign: &[u8] = b"#!/bin/sh\n# caf\xe9\necho hi\n";
    std::fs::write(&hook, foreign).unwrap();
    let installer = HookInstaller::default();

    assert_eq!(installer.install(&hook, "lint").unwrap(), InstallOutcome::Updated);
    let content = std::fs::read(&hook).unwrap();
    assert!(content.starts_with(foreign));
    assert_eq!(&content[foreign.len()..], format!("{START_MARKER}\nlint\n{END_MARKER}\n").as_bytes());

    assert_eq!(installer.install(&hook, "lint").unwrap(), InstallOutcome::UpToDate);
    assert!(installer.inspect(&hook, "lint").unwrap().is_installed_and_current());

    assert_eq!(installer.uninstall(&hook).unwrap(), UninstallOutcome::Removed);
    assert_eq!(std::fs::read(&hook).unwrap(), foreign);
}

// --- uninstall ---

#[test]
fn uninstall_restores_foreign_content() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let original = "#!/bin/bash\necho mine\n";
    std::fs::write(&hook, original).unwrap();
    let installer = HookInstaller::default();
    installer.install(&hook, "lint").unwrap();

    assert_eq!(installer.uninstall(&hook).unwrap(), UninstallOutcome::Removed);
    assert_eq!(std::fs::read_to_string(&hook).unwrap(), original);
}

#[test]
fn uninstall_deletes_hook_that_only_held_the_block() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let installer = HookInstaller::default();
    installer.install(&hook, "lint").unwrap();

    assert_eq!(installer.uninstall(&hook).unwrap(), UninstallOutcome::Deleted);
    assert!(!hook.exists());
}

#[test]
fn uninstall_without_block_is_noop() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let installer = HookInstaller::default();
    assert_eq!(installer.uninstall(&hook).unwrap(), UninstallOutcome::NotInstalled);

    std::fs::write(&hook, "#!/bin/sh\necho hi\n").unwrap();
    assert_eq!(installer.uninstall(&hook).unwrap(), UninstallOutcome::NotInstalled);
    assert_eq!(std::fs::read_to_string(&hook).unwrap(), "#!/bin/sh\necho hi\n");
}

// --- inspect ---

#[test]
fn inspect_follows_the_hook_lifecycle() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let installer = HookInstaller::default();

    assert_eq!(installer.inspect(&hook, "lint").unwrap(), HookState::Absent);

    std::fs::write(&hook, "#!/bin/sh\necho hi\n").unwrap();
    assert_eq!(installer.inspect(&hook, "lint").unwrap(), HookState::ForeignOnly);

    installer.install(&hook, "lint").unwrap();
    assert_eq!(
        installer.inspect(&hook, "lint").unwrap(),
        HookState::Managed {
            current: true,
            executable: true
        }
    );
    assert_eq!(
        installer.inspect(&hook, "lint --strict").unwrap(),
        HookState::Managed {
            current: false,
            executable: true
        }
    );
}

#[test]
fn inspect_reports_corruption_without_failing() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    std::fs::write(&hook, format!("{START_MARKER}\nlint\n")).unwrap();

    let state = HookInstaller::default().inspect(&hook, "lint").unwrap();
    assert!(matches!(state, HookState::Corrupt { .. }));
}

#[test]
fn custom_markers_delimit_the_block() {
    let dir = TempDir::new().unwrap();
    let hook = dir.path().join("pre-push");
    let installer = HookInstaller::with_markers(linthook::block::Markers {
        start: "# BEGIN lint",
        end: "# END lint",
    });
    assert_eq!(installer.markers().start, "# BEGIN lint");

    installer.install(&hook, "lint").unwrap();

    assert_eq!(
        std::fs::read_to_string(&hook).unwrap(),
        "#!/bin/sh\n# BEGIN lint\nlint\n# END lint\n"
    );
}
