use std::path::{Path, PathBuf};

use crate::engine;
use crate::line_range::LineRange;
use crate::output;
use crate::rules::{MutationKind, MutationRule};
use crate::tracker::{self, LineKinds};

/// Result of one mutation pass. Immutable once produced. `kind` is `None`
/// for a cumulative artifact, which represents all requested kinds at once.
#[derive(Debug, Clone)]
pub struct MutatedArtifact {
    pub mutated_code: String,
    pub kind: Option<MutationKind>,
    pub output_path: Option<PathBuf>,
}

/// Mutant file name next to the original: `<stem>_mutated<ext>` for
/// cumulative mode, `<stem>_<kind>_mutated<ext>` for isolated mode.
pub fn mutant_file_name(source_path: &Path, kind: Option<MutationKind>) -> String {
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "source".to_string());
    let ext = source_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    match kind {
        Some(k) => format!("{stem}_{}_mutated{ext}", k.name()),
        None => format!("{stem}_mutated{ext}"),
    }
}

fn effective_range(source: &str, range: Option<LineRange>) -> Option<LineRange> {
    let range = range?;
    if range.is_valid(source.lines().count()) {
        Some(range)
    } else {
        output::print_warning(&format!(
            "Line range {}:{} is out of bounds, mutating the whole file",
            range.start, range.end
        ));
        None
    }
}

fn dedup_by_kind(rules: &[MutationRule]) -> Vec<&MutationRule> {
    let mut seen: Vec<MutationKind> = Vec::new();
    let mut result = Vec::new();
    for rule in rules {
        if !seen.contains(&rule.kind) {
            seen.push(rule.kind);
            result.push(rule);
        }
    }
    result
}

fn persist(code: &str, path: &Path) -> Option<PathBuf> {
    match std::fs::write(path, code) {
        Ok(()) => Some(path.to_path_buf()),
        Err(e) => {
            output::print_warning(&format!(
                "Could not write mutant to {}: {}",
                path.display(),
                e
            ));
            None
        }
    }
}

/// Apply every requested kind in sequence onto a running buffer, producing
/// one artifact containing all applied mutations. Later kinds see earlier
/// kinds' changes. Returns `None` if no kind changed anything.
pub fn compose_cumulative(
    source: &str,
    rules: &[MutationRule],
    range: Option<LineRange>,
    track: bool,
    output_path: Option<&Path>,
) -> Option<MutatedArtifact> {
    let range = effective_range(source, range);
    let mut buffer = source.to_string();
    let mut line_kinds = LineKinds::new();
    let mut changed = false;

    for rule in dedup_by_kind(rules) {
        let (mutated, _) = engine::apply_in_range(&buffer, rule, range);
        if let Some(mutated) = mutated {
            tracker::track_line_diffs(&buffer, &mutated, rule.kind, &mut line_kinds);
            buffer = mutated;
            changed = true;
        }
    }

    if !changed {
        return None;
    }
    if track {
        buffer = tracker::emit_tracking_comments(&buffer, &line_kinds);
    }

    let written = output_path.and_then(|p| persist(&buffer, p));
    Some(MutatedArtifact {
        mutated_code: buffer,
        kind: None,
        output_path: written,
    })
}

/// Produce one independent artifact per distinct rule kind, each mutating a
/// fresh copy of the original. Kinds that change nothing are omitted.
/// `output_dir` receives one kind-suffixed file per artifact.
pub fn compose_isolated(
    source: &str,
    source_path: &Path,
    rules: &[MutationRule],
    range: Option<LineRange>,
    track: bool,
    output_dir: Option<&Path>,
) -> Vec<MutatedArtifact> {
    let range = effective_range(source, range);
    let mut artifacts = Vec::new();

    for rule in dedup_by_kind(rules) {
        let (mutated, _) = engine::apply_in_range(source, rule, range);
        let Some(mutated) = mutated else {
            continue;
        };
        let mut code = mutated;
        if track {
            let mut line_kinds = LineKinds::new();
            tracker::track_line_diffs(source, &code, rule.kind, &mut line_kinds);
            code = tracker::emit_tracking_comments(&code, &line_kinds);
        }
        let written = output_dir.and_then(|dir| {
            persist(&code, &dir.join(mutant_file_name(source_path, Some(rule.kind))))
        });
        artifacts.push(MutatedArtifact {
            mutated_code: code,
            kind: Some(rule.kind),
            output_path: written,
        });
    }

    artifacts
}
