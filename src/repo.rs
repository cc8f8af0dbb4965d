use anyhow::{anyhow, Context, Result};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Where a repository keeps its work tree and hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    pub work_tree: PathBuf,
    pub hooks_dir: PathBuf,
}

impl RepoLayout {
    /// Locate the repository containing `project_dir`.
    ///
    /// Real repositories are opened with gix, which honours `core.hooksPath`
    /// and linked worktrees. A bare `.git` directory that git itself would
    /// reject (a freshly scaffolded project, say) still counts; its hooks go
    /// in `.git/hooks`.
    pub fn locate(project_dir: &Path) -> Result<Self> {
        let project_dir = std::fs::canonicalize(project_dir)
            .with_context(|| format!("failed to resolve project directory: {}", project_dir.display()))?;
        let nearest = find_dot_git_dir(&project_dir);

        match gix::discover(&project_dir) {
            Ok(repo) => {
                let layout = Self::from_repo(&repo)?;
                match nearest {
                    Some(nearer)
                        if nearer.work_tree != layout.work_tree
                            && nearer.work_tree.starts_with(&layout.work_tree) =>
                    {
                        Ok(nearer)
                    }
                    _ => Ok(layout),
                }
            }
            Err(err) => {
                debug!(error = %err, "gix discovery failed, falling back to .git scan");
                nearest.ok_or_else(|| {
                    anyhow!(
                        "not a git repository (or any parent directory): {}",
                        project_dir.display()
                    )
                })
            }
        }
    }

    fn from_repo(repo: &gix::Repository) -> Result<Self> {
        let workdir = repo
            .workdir()
            .ok_or_else(|| anyhow!("bare repository has no working directory"))?;
        let work_tree = std::fs::canonicalize(workdir)
            .with_context(|| format!("failed to resolve work tree: {}", workdir.display()))?;

        let snapshot = repo.config_snapshot();
        let configured = snapshot.string("core.hooksPath").map(|v| v.to_string());
        let hooks_dir = match configured {
            Some(value) => {
                let path = PathBuf::from(expand_tilde(&value));
                if path.is_absolute() {
                    path
                } else {
                    work_tree.join(path)
                }
            }
            None => repo.common_dir().join("hooks"),
        };

        Ok(Self {
            work_tree,
            hooks_dir,
        })
    }

    /// Path of a hook file inside this repository's hooks directory.
    pub fn hook_path(&self, file_name: &str) -> PathBuf {
        self.hooks_dir.join(file_name)
    }

    /// `path` relative to the work tree, `/`-separated for use in shell scripts.
    pub fn relative_to_root(&self, path: &Path) -> Result<String> {
        let rel = path.strip_prefix(&self.work_tree).with_context(|| {
            format!(
                "{} is outside the repository work tree {}",
                path.display(),
                self.work_tree.display()
            )
        })?;

        let mut parts = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(part) => parts.push(
                    part.to_str()
                        .ok_or_else(|| anyhow!("non UTF-8 path component in {}", path.display()))?
                        .to_string(),
                ),
                Component::CurDir => {}
                other => return Err(anyhow!("unexpected path component {other:?} in {}", path.display())),
            }
        }
        Ok(parts.join("/"))
    }
}

fn find_dot_git_dir(start: &Path) -> Option<RepoLayout> {
    start.ancestors().find_map(|dir| {
        let git_dir = dir.join(".git");
        git_dir.is_dir().then(|| RepoLayout {
            work_tree: dir.to_path_buf(),
            hooks_dir: git_dir.join("hooks"),
        })
    })
}

fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") || path == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}
