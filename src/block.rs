//! Pure text transforms for the managed block inside a hook script.
//!
//! A managed block is the region between a start marker line and an end
//! marker line. Everything outside it belongs to the user and is carried
//! through byte-for-byte. None of these functions touch the file system.

use crate::error::{CorruptBlock, HookError};

pub const START_MARKER: &str = "# >>> linthook >>>";
pub const END_MARKER: &str = "# <<< linthook <<<";

/// First line of a hook file created from scratch.
pub const SHEBANG: &str = "#!/bin/sh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

impl Default for Markers<'static> {
    fn default() -> Self {
        Self {
            start: START_MARKER,
            end: END_MARKER,
        }
    }
}

/// Byte range of a located block: from the first byte of the start marker
/// line up to and including the newline that terminates the end marker line
/// (or end of text when that line has no newline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start: usize,
    pub end: usize,
}

/// Reject command text that would produce an unusable or undetectable block.
pub fn validate_body(body: &str, markers: Markers) -> Result<(), HookError> {
    if body.trim().is_empty() {
        return Err(HookError::InvalidInput("command is empty".to_string()));
    }
    for marker in [markers.start, markers.end] {
        if body.contains(marker) {
            return Err(HookError::InvalidInput(format!(
                "command contains the block marker '{marker}'"
            )));
        }
    }
    Ok(())
}

/// Scan `text` for the marker lines.
///
/// Marker lines match after trailing whitespace (including `\r`) is trimmed.
/// Exactly one start marker followed later by exactly one end marker is a
/// block; no markers at all is `None`; anything else is corrupt. The text
/// need not be UTF-8: the markers are compared as bytes.
pub fn find_block(text: &[u8], markers: Markers) -> Result<Option<BlockSpan>, CorruptBlock> {
    let mut start: Option<(usize, usize)> = None;
    let mut end: Option<usize> = None;
    let mut offset = 0;

    for (index, line) in text.split_inclusive(|&b| b == b'\n').enumerate() {
        let line_start = offset;
        offset += line.len();
        let line_no = index + 1;
        let trimmed = line.trim_ascii_end();

        if trimmed == markers.start.as_bytes() {
            if let Some((_, first)) = start {
                return Err(CorruptBlock(format!(
                    "start marker appears on line {first} and again on line {line_no}"
                )));
            }
            start = Some((line_start, line_no));
        } else if trimmed == markers.end.as_bytes() {
            if start.is_none() {
                return Err(CorruptBlock(format!(
                    "end marker on line {line_no} has no preceding start marker"
                )));
            }
            if end.is_some() {
                return Err(CorruptBlock(format!(
                    "end marker appears more than once (again on line {line_no})"
                )));
            }
            end = Some(offset);
        }
    }

    match (start, end) {
        (Some((start, _)), Some(end)) => Ok(Some(BlockSpan { start, end })),
        (Some((_, line_no)), None) => Err(CorruptBlock(format!(
            "start marker on line {line_no} has no matching end marker"
        ))),
        _ => Ok(None),
    }
}

/// Render a complete block, newline-terminated.
pub fn render_block(body: &str, markers: Markers) -> String {
    let body = body.trim_end_matches(['\n', '\r']);
    format!("{}\n{}\n{}\n", markers.start, body, markers.end)
}

/// Replace the existing block in `text` with a fresh one, or append one.
///
/// Empty `text` is treated as a new file and gets [`SHEBANG`] first. When
/// appending to non-empty text that lacks a trailing newline, one is added so
/// the start marker lands on its own line.
pub fn apply_block(text: &[u8], markers: Markers, body: &str) -> Result<Vec<u8>, CorruptBlock> {
    let block = render_block(body, markers);

    let out = match find_block(text, markers)? {
        Some(span) => {
            let mut out = Vec::with_capacity(text.len() + block.len());
            out.extend_from_slice(&text[..span.start]);
            out.extend_from_slice(block.as_bytes());
            out.extend_from_slice(&text[span.end..]);
            out
        }
        None if text.is_empty() => format!("{SHEBANG}\n{block}").into_bytes(),
        None => {
            let mut out = Vec::with_capacity(text.len() + block.len() + 1);
            out.extend_from_slice(text);
            if !text.ends_with(b"\n") {
                out.push(b'\n');
            }
            out.extend_from_slice(block.as_bytes());
            out
        }
    };

    Ok(out)
}

/// Remove the block from `text`. Returns `None` when there is no block.
pub fn strip_block(text: &[u8], markers: Markers) -> Result<Option<Vec<u8>>, CorruptBlock> {
    let Some(span) = find_block(text, markers)? else {
        return Ok(None);
    };
    let mut out = Vec::with_capacity(text.len() - (span.end - span.start));
    out.extend_from_slice(&text[..span.start]);
    out.extend_from_slice(&text[span.end..]);
    Ok(Some(out))
}

/// True when `text` holds nothing but an optional shebang and blank lines.
pub fn is_empty_script(text: &[u8]) -> bool {
    text.split(|&b| b == b'\n').enumerate().all(|(index, line)| {
        let line = line.trim_ascii();
        line.is_empty() || (index == 0 && line.starts_with(b"#!"))
    })
}
