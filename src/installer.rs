use crate::block::{self, Markers};
use crate::error::{HookError, Result};
use serde::Serialize;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Mode applied to every hook file the installer writes.
pub const HOOK_MODE: u32 = 0o755;

/// Symlink hops followed before giving up on a hook path.
const MAX_LINK_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Created,
    Updated,
    UpToDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// The block was stripped and the remaining user content written back.
    Removed,
    /// Nothing but a shebang was left, so the file was deleted.
    Deleted,
    NotInstalled,
}

/// Observable state of a hook file relative to the command that would be installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HookState {
    Absent,
    ForeignOnly,
    Managed { current: bool, executable: bool },
    Corrupt { reason: String },
}

impl HookState {
    pub fn is_installed_and_current(&self) -> bool {
        matches!(
            self,
            HookState::Managed {
                current: true,
                executable: true
            }
        )
    }
}

/// Writes, updates and removes the managed block in a single hook file.
///
/// Every write goes through a temporary file in the hook's own directory
/// that is renamed over the target, so readers never see a partial script.
#[derive(Debug, Clone, Copy)]
pub struct HookInstaller<'a> {
    markers: Markers<'a>,
}

impl Default for HookInstaller<'static> {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
        }
    }
}

impl<'a> HookInstaller<'a> {
    pub fn with_markers(markers: Markers<'a>) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> Markers<'a> {
        self.markers
    }

    /// Desired file content given the current content (`None` if the file
    /// does not exist) and the command. `path` is only used in errors.
    pub fn plan(&self, path: &Path, existing: Option<&[u8]>, command: &str) -> Result<Vec<u8>> {
        block::validate_body(command, self.markers)?;
        block::apply_block(existing.unwrap_or_default(), self.markers, command)
            .map_err(|e| e.at(path))
    }

    /// Ensure `path` exists, is executable and holds exactly one managed
    /// block containing `command`.
    pub fn install(&self, path: &Path, command: &str) -> Result<InstallOutcome> {
        block::validate_body(command, self.markers)?;
        let target = resolve_link(path)?;

        let parent = parent_dir(&target);
        std::fs::create_dir_all(parent).map_err(|e| HookError::io(parent, e))?;

        let existing = read_existing(&target)?;
        let desired = self.plan(&target, existing.as_deref(), command)?;

        let outcome = match existing.as_deref() {
            None => InstallOutcome::Created,
            Some(current) if current == desired.as_slice() => InstallOutcome::UpToDate,
            Some(_) => InstallOutcome::Updated,
        };

        if outcome == InstallOutcome::UpToDate {
            debug!(path = %target.display(), "hook content unchanged, skipping write");
            set_hook_mode(&target)?;
        } else {
            write_atomic(&target, &desired)?;
            info!(path = %target.display(), ?outcome, "hook written");
        }

        Ok(outcome)
    }

    /// Strip the managed block from `path`, leaving user content alone.
    pub fn uninstall(&self, path: &Path) -> Result<UninstallOutcome> {
        let target = resolve_link(path)?;
        let Some(existing) = read_existing(&target)? else {
            return Ok(UninstallOutcome::NotInstalled);
        };
        let Some(stripped) =
            block::strip_block(&existing, self.markers).map_err(|e| e.at(&target))?
        else {
            return Ok(UninstallOutcome::NotInstalled);
        };

        if block::is_empty_script(&stripped) {
            std::fs::remove_file(&target).map_err(|e| HookError::io(&target, e))?;
            if target != path {
                std::fs::remove_file(path).map_err(|e| HookError::io(path, e))?;
            }
            info!(path = %target.display(), "hook deleted");
            return Ok(UninstallOutcome::Deleted);
        }

        write_atomic(&target, &stripped)?;
        info!(path = %target.display(), "managed block removed");
        Ok(UninstallOutcome::Removed)
    }

    /// Read-only classification of `path` against `command`.
    pub fn inspect(&self, path: &Path, command: &str) -> Result<HookState> {
        block::validate_body(command, self.markers)?;
        let target = resolve_link(path)?;
        let Some(existing) = read_existing(&target)? else {
            return Ok(HookState::Absent);
        };

        match block::find_block(&existing, self.markers) {
            Err(corrupt) => Ok(HookState::Corrupt { reason: corrupt.0 }),
            Ok(None) => Ok(HookState::ForeignOnly),
            Ok(Some(_)) => {
                let desired = self.plan(&target, Some(existing.as_slice()), command)?;
                Ok(HookState::Managed {
                    current: desired == existing,
                    executable: is_executable(&target)?,
                })
            }
        }
    }
}

/// Follow symlinks so the link itself survives the rename in `write_atomic`.
/// Dangling links resolve to their (missing) target, which is then created.
fn resolve_link(path: &Path) -> Result<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_LINK_DEPTH {
        match std::fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let dest = std::fs::read_link(&current).map_err(|e| HookError::io(&current, e))?;
                current = if dest.is_absolute() {
                    dest
                } else {
                    parent_dir(&current).join(dest)
                };
            }
            Ok(_) => return Ok(current),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(current),
            Err(e) => return Err(HookError::io(&current, e)),
        }
    }
    Err(HookError::io(
        path,
        std::io::Error::other("too many levels of symbolic links"),
    ))
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Raw bytes of the hook, `None` when it does not exist. Foreign content is
/// not required to be UTF-8.
pub(crate) fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(HookError::io(path, e)),
    }
}

/// Write `content` to a sibling temp file, mark it executable, then rename
/// it over `path`.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = parent_dir(path);
    let mut tmp = tempfile::Builder::new()
        .prefix(".linthook-")
        .tempfile_in(dir)
        .map_err(|e| HookError::io(dir, e))?;

    tmp.write_all(content)
        .map_err(|e| HookError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| HookError::io(tmp.path(), e))?;
    tmp.as_file()
        .set_permissions(std::fs::Permissions::from_mode(HOOK_MODE))
        .map_err(|e| HookError::io(tmp.path(), e))?;

    tmp.persist(path).map_err(|e| HookError::io(path, e.error))?;
    Ok(())
}

fn set_hook_mode(path: &Path) -> Result<()> {
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(HOOK_MODE))
        .map_err(|e| HookError::io(path, e))
}

fn is_executable(path: &Path) -> Result<bool> {
    let meta = std::fs::metadata(path).map_err(|e| HookError::io(path, e))?;
    Ok(meta.permissions().mode() & 0o111 != 0)
}
