pub mod composer;
pub mod engine;
pub mod line_range;
pub mod output;
pub mod pattern;
pub mod report;
pub mod rules;
pub mod runner;
pub mod safety;
pub mod state;
pub mod tracker;

use rules::MutationKind;

/// Parse a comma-separated kind list (e.g. "arithmetic,logical"). Returns
/// `Err` with the offending name on the first unknown kind.
pub fn parse_kinds(spec: &str) -> Result<Vec<MutationKind>, String> {
    spec.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|name| MutationKind::parse(name).ok_or_else(|| name.to_string()))
        .collect()
}
