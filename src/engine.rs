use crate::line_range::{self, LineRange};
use crate::pattern;
use crate::rules::MutationRule;

/// Apply one rule to the source: scan the rule's operator table in order,
/// take the first operator whose boundary pattern matches anywhere, and
/// replace that first occurrence with the operator's first replacement
/// candidate. All other occurrences stay untouched.
///
/// Returns `None` for empty source, an empty rule, or no match — the normal
/// "nothing to mutate" outcome, not an error.
pub fn apply(source: &str, rule: &MutationRule) -> Option<String> {
    if source.is_empty() || rule.is_empty() {
        return None;
    }
    for (operator, replacements) in &rule.mutations {
        let Some(replacement) = replacements.first() else {
            continue;
        };
        if let Some((start, end)) = pattern::find_operator(rule.kind, operator, source) {
            let mut mutated = String::with_capacity(source.len());
            mutated.push_str(&source[..start]);
            mutated.push_str(replacement);
            mutated.push_str(&source[end..]);
            return Some(mutated);
        }
    }
    None
}

/// Apply one rule scoped to a line range. The range is selected out, mutated,
/// and spliced back so the returned text always carries full-document line
/// numbering. `range_valid` is false when the range had to be ignored.
pub fn apply_in_range(
    source: &str,
    rule: &MutationRule,
    range: Option<LineRange>,
) -> (Option<String>, bool) {
    let Some(range) = range else {
        return (apply(source, rule), true);
    };
    let (sub, valid) = line_range::select(source, range);
    if !valid {
        return (apply(source, rule), false);
    }
    let mutated_sub = apply(&sub, rule);
    (
        mutated_sub.map(|m| line_range::reconstruct(source, &m, range)),
        true,
    )
}
