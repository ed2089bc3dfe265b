//! Diagnostics recorded during synthesis
//!
//! None of these abort a run. Each one is logged when recorded and kept so
//! callers can print or inspect them afterwards.

use std::collections::BTreeSet;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepRule {
    /// The kept row's packages strictly include the other row's.
    Superset,
    /// Both rows list exactly the same packages.
    IdenticalPackages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    TooManyRows(usize),
    /// The row with more packages does not include these from the other row.
    NotSuperset { only_in_smaller: BTreeSet<String> },
    NoPackages,
    DifferentPackages {
        only_in_first: BTreeSet<String>,
        only_in_second: BTreeSet<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// `row` is the position within the group, in table order.
    Keep { row: usize, rule: KeepRule },
    Unresolved(UnresolvedReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDecision {
    LocalEnum,
    ImportedEnum,
    ImportedClass,
    /// A canonical class shares its name with a package; the package wins.
    ClassNameConflict,
    PrimitiveType,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Duplicate {
        name: String,
        rows: usize,
        resolution: Resolution,
    },
    DuplicatedPermissibleValues {
        field: String,
        values: Vec<String>,
    },
    UnusedVocabulary {
        field: String,
    },
    Range {
        range: String,
        decision: RangeDecision,
    },
    ParentSlotShadowed {
        category: String,
    },
}

impl Diagnostic {
    pub fn is_warning(&self) -> bool {
        match self {
            Diagnostic::Duplicate { resolution, .. } => {
                matches!(resolution, Resolution::Unresolved(_))
            }
            Diagnostic::DuplicatedPermissibleValues { .. }
            | Diagnostic::UnusedVocabulary { .. }
            | Diagnostic::ParentSlotShadowed { .. } => true,
            Diagnostic::Range { decision, .. } => {
                matches!(decision, RangeDecision::ClassNameConflict)
            }
        }
    }
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Duplicate {
                name,
                rows,
                resolution,
            } => {
                write!(f, "{} defined on {} rows: ", name, rows)?;
                match resolution {
                    Resolution::Keep {
                        row,
                        rule: KeepRule::Superset,
                    } => write!(
                        f,
                        "row {} has more packages and includes all of the other row's; keeping it",
                        row
                    ),
                    Resolution::Keep {
                        row,
                        rule: KeepRule::IdenticalPackages,
                    } => write!(f, "both rows contain the same packages; keeping row {}", row),
                    Resolution::Unresolved(UnresolvedReason::TooManyRows(n)) => {
                        write!(f, "more than two rows ({}); discarding all", n)
                    }
                    Resolution::Unresolved(UnresolvedReason::NotSuperset { only_in_smaller }) => {
                        write!(
                            f,
                            "discarding both because only the smaller row contains {}",
                            join(only_in_smaller)
                        )
                    }
                    Resolution::Unresolved(UnresolvedReason::NoPackages) => {
                        write!(f, "both rows have 0 packages; discarding both")
                    }
                    Resolution::Unresolved(UnresolvedReason::DifferentPackages {
                        only_in_first,
                        only_in_second,
                    }) => write!(
                        f,
                        "same number of packages but row 0 only has [{}] and row 1 only has [{}]; discarding both",
                        join(only_in_first),
                        join(only_in_second)
                    ),
                }
            }
            Diagnostic::DuplicatedPermissibleValues { field, values } => write!(
                f,
                "{} has duplicated enumerated values: {}",
                field,
                values.join(", ")
            ),
            Diagnostic::UnusedVocabulary { field } => write!(
                f,
                "{} has controlled vocabulary but is not a slot of any package",
                field
            ),
            Diagnostic::Range { range, decision } => match decision {
                RangeDecision::LocalEnum => write!(f, "{} defined locally as an enum", range),
                RangeDecision::ImportedEnum => {
                    write!(f, "{} only defined in the canonical schema; imported enum", range)
                }
                RangeDecision::ImportedClass => {
                    write!(f, "{} is a canonical class; imported class", range)
                }
                RangeDecision::ClassNameConflict => write!(
                    f,
                    "{} is a canonical class but a package has the same name; keeping the package",
                    range
                ),
                RangeDecision::PrimitiveType => write!(f, "{} is a type; nothing to import", range),
                RangeDecision::Unresolved => {
                    write!(f, "{} not defined locally or canonically; left as is", range)
                }
            },
            Diagnostic::ParentSlotShadowed { category } => write!(
                f,
                "category {} is also a field name; not emitting a parent slot for it",
                category
            ),
        }
    }
}

/// Accumulates diagnostics, logging each as it arrives.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            warn!("{}", diagnostic);
        } else {
            info!("{}", diagnostic);
        }
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
