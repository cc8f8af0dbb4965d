use crate::config::SHELL_UNSAFE;
use crate::diff;
use crate::installer::{
    self, HookInstaller, HookState, InstallOutcome, UninstallOutcome, HOOK_MODE,
};
use crate::loader::ConfigLoader;
use crate::repo::RepoLayout;
use crate::script::{HookKind, ScriptContext};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub struct Orchestrator {
    loader: ConfigLoader,
    project_dir: PathBuf,
    layout: RepoLayout,
    installer: HookInstaller<'static>,
    command_override: Option<String>,
}

#[derive(Debug, Default)]
pub struct InstallReport {
    pub created: Vec<PathBuf>,
    pub updated: Vec<PathBuf>,
    pub up_to_date: Vec<PathBuf>,
    /// Dry runs only: hooks that would change, with a unified diff each.
    pub previews: Vec<(PathBuf, String)>,
}

#[derive(Debug, Default)]
pub struct UninstallReport {
    pub removed: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub not_installed: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HookStatus {
    pub kind: HookKind,
    pub path: PathBuf,
    #[serde(flatten)]
    pub state: HookState,
}

impl Orchestrator {
    pub fn new(project_dir: &Path) -> Result<Self> {
        let loader = ConfigLoader::new(project_dir)?;
        let layout = RepoLayout::locate(project_dir)?;
        let project_dir = std::fs::canonicalize(project_dir)
            .with_context(|| format!("failed to resolve project directory: {}", project_dir.display()))?;
        tracing::debug!(
            work_tree = %layout.work_tree.display(),
            hooks_dir = %layout.hooks_dir.display(),
            "located repository"
        );

        Ok(Self {
            loader,
            project_dir,
            layout,
            installer: HookInstaller::default(),
            command_override: None,
        })
    }

    /// Use `command` verbatim as the block body instead of the rendered script.
    pub fn with_command(mut self, command: Option<String>) -> Self {
        self.command_override = command;
        self
    }

    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }

    /// The requested kinds, or the configured ones when none were requested.
    pub fn kinds(&self, requested: &[HookKind]) -> Vec<HookKind> {
        let mut kinds = if requested.is_empty() {
            self.loader.hook().kinds.clone()
        } else {
            requested.to_vec()
        };
        kinds.sort();
        kinds.dedup();
        kinds
    }

    pub fn hook_path(&self, kind: HookKind) -> PathBuf {
        self.layout.hook_path(kind.file_name())
    }

    /// Block body for `kind`: the override if set, otherwise the rendered script.
    pub fn command_for(&self, kind: HookKind) -> Result<String> {
        if let Some(command) = &self.command_override {
            return Ok(command.clone());
        }

        let hook = self.loader.hook();
        let project_rel = self.layout.relative_to_root(&self.project_dir)?;
        if project_rel.contains(SHELL_UNSAFE) {
            bail!("project directory '{project_rel}' contains shell metacharacters");
        }

        let ctx = ScriptContext {
            project_dir: &project_rel,
            wrapper: &hook.wrapper,
            lint_task: &hook.lint_task,
            format_task: &hook.format_task,
            staged_pattern: &hook.staged_pattern,
        };
        Ok(kind.render(&ctx))
    }

    pub fn install(&self, requested: &[HookKind], dry_run: bool) -> Result<InstallReport> {
        let mut report = InstallReport::default();

        for kind in self.kinds(requested) {
            let path = self.hook_path(kind);
            let command = self.command_for(kind)?;

            if dry_run {
                match self.preview(&path, &command, kind)? {
                    Some(preview) => report.previews.push((path, preview)),
                    None => report.up_to_date.push(path),
                }
                continue;
            }

            let outcome = self
                .installer
                .install(&path, &command)
                .with_context(|| format!("failed to install {kind} hook"))?;
            match outcome {
                InstallOutcome::Created => report.created.push(path),
                InstallOutcome::Updated => report.updated.push(path),
                InstallOutcome::UpToDate => report.up_to_date.push(path),
            }
        }

        Ok(report)
    }

    /// What an install of `kind` would change, or `None` when the hook is
    /// already current and executable.
    fn preview(&self, path: &Path, command: &str, kind: HookKind) -> Result<Option<String>> {
        let current = installer::read_existing(path)?;
        let planned = self
            .installer
            .plan(path, current.as_deref(), command)
            .with_context(|| format!("failed to plan {kind} hook"))?;

        if current.as_deref() != Some(planned.as_slice()) {
            return Ok(Some(diff::preview(path, current.as_deref(), &planned)));
        }

        let mode = std::fs::metadata(path)
            .with_context(|| format!("failed to read hook: {}", path.display()))?
            .permissions()
            .mode()
            & 0o7777;
        if mode != HOOK_MODE {
            return Ok(Some(diff::mode_change(path, mode, HOOK_MODE)));
        }
        Ok(None)
    }

    pub fn uninstall(&self, requested: &[HookKind]) -> Result<UninstallReport> {
        let mut report = UninstallReport::default();

        for kind in self.kinds(requested) {
            let path = self.hook_path(kind);
            let outcome = self
                .installer
                .uninstall(&path)
                .with_context(|| format!("failed to uninstall {kind} hook"))?;
            match outcome {
                UninstallOutcome::Removed => report.removed.push(path),
                UninstallOutcome::Deleted => report.deleted.push(path),
                UninstallOutcome::NotInstalled => report.not_installed.push(path),
            }
        }

        Ok(report)
    }

    pub fn status(&self, requested: &[HookKind]) -> Result<Vec<HookStatus>> {
        self.kinds(requested)
            .into_iter()
            .map(|kind| -> Result<HookStatus> {
                let path = self.hook_path(kind);
                let command = self.command_for(kind)?;
                let state = self
                    .installer
                    .inspect(&path, &command)
                    .with_context(|| format!("failed to inspect {kind} hook"))?;
                Ok(HookStatus { kind, path, state })
            })
            .collect()
    }
}
