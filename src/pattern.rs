use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use regex::Regex;

use crate::rules::MutationKind;

static CACHE: OnceLock<RwLock<HashMap<String, Arc<Regex>>>> = OnceLock::new();

fn cache() -> &'static RwLock<HashMap<String, Arc<Regex>>> {
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Get-or-compile a regex, keyed by the literal pattern string. The cache is
/// append-only and lazily populated; concurrent readers share compiled
/// patterns, and a race between two identical first compiles is harmless.
pub fn cached(pattern: &str) -> Arc<Regex> {
    if let Some(re) = cache().read().expect("pattern cache poisoned").get(pattern) {
        return Arc::clone(re);
    }
    let re = Arc::new(Regex::new(pattern).expect("invalid mutation pattern"));
    let mut map = cache().write().expect("pattern cache poisoned");
    Arc::clone(map.entry(pattern.to_string()).or_insert(re))
}

/// Build the token-boundary pattern for one operator of one kind. The
/// operator occurrence is always a capture group so the caller can locate
/// exactly the span to replace.
///
/// Boundary shapes:
/// - arithmetic / logical / relational: binary operators flanked by a
///   word-or-closing character and a word-or-opening character, whitespace
///   allowed in between. The flanks keep `<` from matching inside `<=` and
///   `==` from matching inside `===`.
/// - dataType / functionCall: whole-word identifier tokens.
/// - increment: `++`/`--` attached as prefix or suffix to an identifier.
pub fn operator_pattern(kind: MutationKind, operator: &str) -> String {
    let esc = regex::escape(operator);
    match kind {
        MutationKind::Arithmetic | MutationKind::Logical | MutationKind::Relational => {
            format!(r"[\w\)\]]\s*({esc})\s*[\w\(\[]")
        }
        MutationKind::DataType | MutationKind::FunctionCall => {
            format!(r"\b({esc})\b")
        }
        MutationKind::Increment => {
            format!(r"(?:({esc})[A-Za-z_][A-Za-z0-9_]*|[A-Za-z_][A-Za-z0-9_]*({esc}))")
        }
    }
}

/// Find the first occurrence of `operator` in `text` under the kind's
/// boundary pattern, returning the byte span of the operator itself.
pub fn find_operator(kind: MutationKind, operator: &str, text: &str) -> Option<(usize, usize)> {
    let re = cached(&operator_pattern(kind, operator));
    let caps = re.captures(text)?;
    // The operator is whichever capture group participated in the match
    // (increment patterns have one group per alternation arm).
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| (m.start(), m.end()))
        .next()
}
