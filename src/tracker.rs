use std::collections::{BTreeMap, BTreeSet};

use crate::rules::MutationKind;

/// Per-line accumulator: 0-indexed line number to the set of kinds that
/// altered it. Threaded explicitly through composition, never shared.
pub type LineKinds = BTreeMap<usize, BTreeSet<MutationKind>>;

pub const ANNOTATION_MARKER: &str = "// @ MUTATION:";

/// Record which lines differ between two buffer states, unioning `kind` into
/// each differing line's set. Comparison runs to the longer text's line
/// count; a line missing on one side counts as empty.
pub fn track_line_diffs(before: &str, after: &str, kind: MutationKind, line_kinds: &mut LineKinds) {
    let before_lines: Vec<&str> = before.lines().collect();
    let after_lines: Vec<&str> = after.lines().collect();
    let max = before_lines.len().max(after_lines.len());
    for i in 0..max {
        let b = before_lines.get(i).copied().unwrap_or("");
        let a = after_lines.get(i).copied().unwrap_or("");
        if b != a {
            line_kinds.entry(i).or_default().insert(kind);
        }
    }
}

/// Append `// @ MUTATION: <kinds>` to each tracked line, at most once per
/// line. Lines already carrying an annotation are left alone, so re-invoking
/// on annotated text is a no-op.
pub fn emit_tracking_comments(text: &str, line_kinds: &LineKinds) -> String {
    let mut lines: Vec<String> = text.lines().map(|l| l.to_string()).collect();
    for (&index, kinds) in line_kinds {
        let Some(line) = lines.get_mut(index) else {
            continue;
        };
        if line.contains(ANNOTATION_MARKER) {
            continue;
        }
        let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
        line.push_str(&format!(" {} {}", ANNOTATION_MARKER, names.join(",")));
    }
    let mut result = lines.join("\n");
    if text.ends_with('\n') {
        result.push('\n');
    }
    result
}
