use similar::TextDiff;
use std::fmt::Write;
use std::path::Path;

/// Unified diff between the current hook file (`None` when absent) and the
/// content an install would write. Bytes that are not UTF-8 are shown lossily.
pub fn preview(path: &Path, current: Option<&[u8]>, planned: &[u8]) -> String {
    let before_label = match current {
        Some(_) => format!("a/{}", path.display()),
        None => "/dev/null".to_string(),
    };
    let after_label = format!("b/{}", path.display());

    let old = String::from_utf8_lossy(current.unwrap_or_default());
    let new = String::from_utf8_lossy(planned);
    let diff = TextDiff::from_lines(old.as_ref(), new.as_ref());
    let mut output = String::new();
    let _ = writeln!(output, "--- {before_label}");
    let _ = writeln!(output, "+++ {after_label}");
    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        let _ = write!(output, "{hunk}");
    }
    output
}

/// Header for a hook whose content is current but whose mode would change,
/// in the shape `git diff` uses for mode-only changes.
pub fn mode_change(path: &Path, old_mode: u32, new_mode: u32) -> String {
    format!(
        "--- a/{path}\n+++ b/{path}\nold mode {old:o}\nnew mode {new:o}\n",
        path = path.display(),
        old = 0o100000 | (old_mode & 0o7777),
        new = 0o100000 | (new_mode & 0o7777),
    )
}
