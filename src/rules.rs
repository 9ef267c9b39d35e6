use serde::{Deserialize, Serialize};

/// The closed set of mutation categories. Names are fixed: they appear in
/// tracking annotations, mutant file names, and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    Arithmetic,
    Logical,
    Relational,
    DataType,
    Increment,
    FunctionCall,
}

impl MutationKind {
    pub const ALL: [MutationKind; 6] = [
        MutationKind::Arithmetic,
        MutationKind::Logical,
        MutationKind::Relational,
        MutationKind::DataType,
        MutationKind::Increment,
        MutationKind::FunctionCall,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::Arithmetic => "arithmetic",
            MutationKind::Logical => "logical",
            MutationKind::Relational => "relational",
            MutationKind::DataType => "dataType",
            MutationKind::Increment => "increment",
            MutationKind::FunctionCall => "functionCall",
        }
    }

    pub fn parse(name: &str) -> Option<MutationKind> {
        MutationKind::ALL.iter().copied().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One mutation rule: an ordered operator table for a single kind.
/// Search order is the table's order; the first replacement candidate is the
/// one applied. Two rules of the same kind are the same rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationRule {
    pub kind: MutationKind,
    pub mutations: Vec<(String, Vec<String>)>,
}

impl PartialEq for MutationRule {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for MutationRule {}

impl MutationRule {
    pub fn new(kind: MutationKind, table: &[(&str, &[&str])]) -> MutationRule {
        MutationRule {
            kind,
            mutations: table
                .iter()
                .map(|(op, reps)| {
                    (op.to_string(), reps.iter().map(|r| r.to_string()).collect())
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

fn arithmetic_rule() -> MutationRule {
    MutationRule::new(
        MutationKind::Arithmetic,
        &[
            ("+", &["-", "*", "/", "%"]),
            ("-", &["+", "*", "/", "%"]),
            ("*", &["/", "+", "-", "%"]),
            ("/", &["*", "+", "-", "%"]),
            ("%", &["+", "-", "*", "/"]),
        ],
    )
}

fn logical_rule() -> MutationRule {
    MutationRule::new(
        MutationKind::Logical,
        &[("&&", &["||"]), ("||", &["&&"])],
    )
}

fn relational_rule() -> MutationRule {
    // Longer operators first so `<=` is considered before `<`.
    MutationRule::new(
        MutationKind::Relational,
        &[
            ("===", &["!==", "=="]),
            ("!==", &["===", "!="]),
            ("==", &["!=", "<", ">"]),
            ("!=", &["==", "<", ">"]),
            ("<=", &["<", ">", ">="]),
            (">=", &[">", "<", "<="]),
            ("<", &["<=", ">", ">="]),
            (">", &[">=", "<", "<="]),
        ],
    )
}

fn data_type_rule() -> MutationRule {
    MutationRule::new(
        MutationKind::DataType,
        &[
            ("let", &["var", "const"]),
            ("const", &["let", "var"]),
            ("var", &["let", "const"]),
            ("int", &["long", "short", "float"]),
            ("float", &["double", "int"]),
            ("double", &["float", "int"]),
        ],
    )
}

fn increment_rule() -> MutationRule {
    MutationRule::new(
        MutationKind::Increment,
        &[("++", &["--"]), ("--", &["++"])],
    )
}

fn function_call_rule() -> MutationRule {
    MutationRule::new(
        MutationKind::FunctionCall,
        &[
            ("min", &["max"]),
            ("max", &["min"]),
            ("floor", &["ceil", "round"]),
            ("ceil", &["floor", "round"]),
            ("push", &["pop", "shift"]),
            ("pop", &["push"]),
        ],
    )
}

/// The standard catalog: one rule per kind, in a fixed order. Built once at
/// startup and passed by reference; never mutated afterwards. Customization
/// means constructing new rule values, not editing these.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<MutationRule>,
}

impl RuleCatalog {
    pub fn standard() -> RuleCatalog {
        RuleCatalog {
            rules: vec![
                arithmetic_rule(),
                logical_rule(),
                relational_rule(),
                data_type_rule(),
                increment_rule(),
                function_call_rule(),
            ],
        }
    }

    pub fn rules(&self) -> &[MutationRule] {
        &self.rules
    }

    pub fn rule_for(&self, kind: MutationKind) -> Option<&MutationRule> {
        self.rules.iter().find(|r| r.kind == kind)
    }

    /// Select rules for the requested kinds, preserving catalog order and
    /// deduplicating by kind.
    pub fn rules_for(&self, kinds: &[MutationKind]) -> Vec<MutationRule> {
        self.rules
            .iter()
            .filter(|r| kinds.contains(&r.kind))
            .cloned()
            .collect()
    }
}
