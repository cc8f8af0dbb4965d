use serde::{Deserialize, Serialize};
use std::fmt;

/// Git hooks linthook knows how to render a body for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum HookKind {
    /// Lint the project before pushing; on failure run the formatter and abort.
    PrePush,
    /// Format staged files before committing and re-stage them.
    PreCommit,
}

impl HookKind {
    pub const ALL: [HookKind; 2] = [HookKind::PrePush, HookKind::PreCommit];

    /// File name under the hooks directory.
    pub fn file_name(self) -> &'static str {
        match self {
            HookKind::PrePush => "pre-push",
            HookKind::PreCommit => "pre-commit",
        }
    }

    pub fn render(self, ctx: &ScriptContext) -> String {
        match self {
            HookKind::PrePush => render_pre_push(ctx),
            HookKind::PreCommit => render_pre_commit(ctx),
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Inputs to a hook body. Rendering is a pure function of these fields.
#[derive(Debug, Clone)]
pub struct ScriptContext<'a> {
    /// Project directory relative to the work tree root, `/`-separated; empty
    /// when the project is the root itself.
    pub project_dir: &'a str,
    /// Wrapper path relative to `project_dir`.
    pub wrapper: &'a str,
    pub lint_task: &'a str,
    pub format_task: &'a str,
    /// awk regex matched against staged paths (pre-commit only).
    pub staged_pattern: &'a str,
}

/// git runs hooks from the work tree root, but build wrappers look for their
/// build in the current directory, so tasks run from a subshell inside the
/// project.
fn location_lines(ctx: &ScriptContext) -> String {
    let project = if ctx.project_dir.is_empty() {
        String::new()
    } else {
        format!("/{}", ctx.project_dir)
    };
    format!(
        "PROJECT_DIR=\"$(git rev-parse --show-toplevel){project}\"\nWRAPPER=\"$PROJECT_DIR/{}\"",
        ctx.wrapper
    )
}

fn render_pre_push(ctx: &ScriptContext) -> String {
    let lint = ctx.lint_task;
    let format = ctx.format_task;
    format!(
        r#"{location}
if ! (cd "$PROJECT_DIR" && "$WRAPPER" {lint}) ; then
    echo 1>&2 "{lint} found problems, running {format}; commit the result and re-push"
    (cd "$PROJECT_DIR" && "$WRAPPER" {format})
    exit 1
fi"#,
        location = location_lines(ctx),
    )
}

fn render_pre_commit(ctx: &ScriptContext) -> String {
    let format = ctx.format_task;
    let pattern = ctx.staged_pattern;
    format!(
        r#"{location}
CHANGED_FILES="$(git --no-pager diff --name-status --no-color --cached | awk '$1 != "D" && $NF ~ /{pattern}/ {{ print $NF }}')"
if [ -z "$CHANGED_FILES" ]; then
    echo "No staged files to format."
    exit 0
fi
echo "Running {format} over these files:"
echo "$CHANGED_FILES"
diff="$(git rev-parse --git-dir)/unstaged-linthook.diff"
git diff --color=never > "$diff"
if [ -s "$diff" ]; then
    git apply -R "$diff"
fi
(cd "$PROJECT_DIR" && "$WRAPPER" {format})
format_status=$?
echo "Completed {format} run."
echo "$CHANGED_FILES" | while read -r file; do
    if [ -f "$file" ]; then
        git add "$file"
    fi
done
if [ -s "$diff" ]; then
    git apply --ignore-whitespace "$diff"
fi
rm "$diff"
unset diff
exit $format_status"#,
        location = location_lines(ctx),
    )
}
