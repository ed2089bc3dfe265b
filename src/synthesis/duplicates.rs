//! Duplicate-name resolution
//!
//! Rows sharing a field name are only ever selected whole, never merged.
//! A pair resolves when one row's packages strictly include the other's, or
//! both list the same packages. Anything else goes to the unresolved report.

use super::diagnostics::{Diagnostic, Diagnostics, KeepRule, Resolution, UnresolvedReason};
use super::packages::{NormalizedRow, PackageMembership};
use std::collections::{BTreeMap, BTreeSet};

/// At most one row per field name, plus every row of each unresolved group.
#[derive(Debug, Clone, Default)]
pub struct ResolvedFieldSet<'a> {
    /// Surviving rows in source table order.
    pub rows: Vec<NormalizedRow<'a>>,
    /// Rows of unresolved groups, grouped by name in sorted order.
    pub unresolved: Vec<NormalizedRow<'a>>,
}

impl<'a> ResolvedFieldSet<'a> {
    pub fn get(&self, name: &str) -> Option<&NormalizedRow<'a>> {
        self.rows.iter().find(|r| r.name() == name)
    }
}

fn difference(a: &PackageMembership, b: &PackageMembership) -> BTreeSet<String> {
    a.difference(b).cloned().collect()
}

/// Decide a two-row group; `first` and `second` are in table order.
pub fn resolve_pair(first: &PackageMembership, second: &PackageMembership) -> Resolution {
    if first.len() > second.len() {
        let only_in_smaller = difference(second, first);
        if only_in_smaller.is_empty() {
            Resolution::Keep {
                row: 0,
                rule: KeepRule::Superset,
            }
        } else {
            Resolution::Unresolved(UnresolvedReason::NotSuperset { only_in_smaller })
        }
    } else if second.len() > first.len() {
        let only_in_smaller = difference(first, second);
        if only_in_smaller.is_empty() {
            Resolution::Keep {
                row: 1,
                rule: KeepRule::Superset,
            }
        } else {
            Resolution::Unresolved(UnresolvedReason::NotSuperset { only_in_smaller })
        }
    } else if first.is_empty() {
        Resolution::Unresolved(UnresolvedReason::NoPackages)
    } else if first == second {
        Resolution::Keep {
            row: 0,
            rule: KeepRule::IdenticalPackages,
        }
    } else {
        Resolution::Unresolved(UnresolvedReason::DifferentPackages {
            only_in_first: difference(first, second),
            only_in_second: difference(second, first),
        })
    }
}

pub fn resolve_group(group: &[NormalizedRow<'_>]) -> Resolution {
    match group {
        [first, second] => resolve_pair(&first.packages, &second.packages),
        _ => Resolution::Unresolved(UnresolvedReason::TooManyRows(group.len())),
    }
}

pub fn resolve_duplicates<'a>(
    rows: Vec<NormalizedRow<'a>>,
    diagnostics: &mut Diagnostics,
) -> ResolvedFieldSet<'a> {
    let mut groups: BTreeMap<String, Vec<NormalizedRow<'a>>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.name().to_string()).or_default().push(row);
    }

    let mut resolved = ResolvedFieldSet::default();
    for (name, mut group) in groups {
        if group.len() == 1 {
            resolved.rows.extend(group);
            continue;
        }

        let resolution = resolve_group(&group);
        diagnostics.record(Diagnostic::Duplicate {
            name,
            rows: group.len(),
            resolution: resolution.clone(),
        });

        match resolution {
            Resolution::Keep { row, .. } => resolved.rows.push(group.swap_remove(row)),
            Resolution::Unresolved(_) => resolved.unresolved.extend(group),
        }
    }

    resolved.rows.sort_by_key(|r| r.index);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::packages::normalize;
    use crate::term::TermRow;

    fn set(packages: &[&str]) -> PackageMembership {
        packages.iter().map(|p| p.to_string()).collect()
    }

    fn row(name: &str, packages: &str, definition: &str) -> TermRow {
        TermRow {
            package_membership_raw: Some(packages.to_string()),
            definition: Some(definition.to_string()),
            ..TermRow::new(name)
        }
    }

    #[test]
    fn test_superset_row_is_kept() {
        let resolution = resolve_pair(&set(&["p1", "p2", "p3"]), &set(&["p1", "p2"]));
        assert_eq!(
            resolution,
            Resolution::Keep {
                row: 0,
                rule: KeepRule::Superset
            }
        );

        let resolution = resolve_pair(&set(&["p1"]), &set(&["p1", "p2"]));
        assert_eq!(
            resolution,
            Resolution::Keep {
                row: 1,
                rule: KeepRule::Superset
            }
        );
    }

    #[test]
    fn test_larger_but_not_superset_is_unresolved() {
        let resolution = resolve_pair(&set(&["p1", "p2", "p3"]), &set(&["p4"]));
        assert_eq!(
            resolution,
            Resolution::Unresolved(UnresolvedReason::NotSuperset {
                only_in_smaller: set(&["p4"])
            })
        );
    }

    #[test]
    fn test_equal_size_different_sets_is_unresolved() {
        let resolution = resolve_pair(&set(&["p1", "p2"]), &set(&["p2", "p3"]));
        assert!(matches!(
            resolution,
            Resolution::Unresolved(UnresolvedReason::DifferentPackages { .. })
        ));
    }

    #[test]
    fn test_identical_sets_keep_first_row() {
        let resolution = resolve_pair(&set(&["p1", "p2"]), &set(&["p2", "p1"]));
        assert_eq!(
            resolution,
            Resolution::Keep {
                row: 0,
                rule: KeepRule::IdenticalPackages
            }
        );
    }

    #[test]
    fn test_row_with_packages_beats_row_without() {
        assert_eq!(
            resolve_pair(&set(&["p1"]), &set(&[])),
            Resolution::Keep {
                row: 0,
                rule: KeepRule::Superset
            }
        );
    }

    #[test]
    fn test_both_empty_is_unresolved() {
        assert_eq!(
            resolve_pair(&set(&[]), &set(&[])),
            Resolution::Unresolved(UnresolvedReason::NoPackages)
        );
    }

    #[test]
    fn test_resolution_keeps_whole_row_and_table_order() {
        let rows = vec![
            row("depth", "p1; p2", "smaller"),
            row("alt", "p1", "unique"),
            row("depth", "p1; p2; p3", "larger"),
        ];
        let (normalized, _) = normalize(&rows, "all");
        let mut diagnostics = Diagnostics::new();
        let resolved = resolve_duplicates(normalized, &mut diagnostics);

        assert_eq!(resolved.rows.len(), 2);
        assert_eq!(resolved.rows[0].name(), "alt");
        assert_eq!(resolved.rows[1].name(), "depth");
        assert_eq!(resolved.rows[1].row.definition.as_deref(), Some("larger"));
        assert_eq!(resolved.rows[1].index, 2);
        assert!(resolved.unresolved.is_empty());
        assert_eq!(diagnostics.entries().len(), 1);
    }

    #[test]
    fn test_groups_larger_than_two_are_reported() {
        let rows = vec![
            row("ph", "p1", "a"),
            row("ph", "p1", "b"),
            row("ph", "p1", "c"),
            row("temp", "p1", "d"),
        ];
        let (normalized, _) = normalize(&rows, "all");
        let mut diagnostics = Diagnostics::new();
        let resolved = resolve_duplicates(normalized, &mut diagnostics);

        assert_eq!(resolved.rows.len(), 1);
        assert_eq!(resolved.unresolved.len(), 3);
        assert!(resolved.get("ph").is_none());
        assert!(diagnostics.entries()[0].is_warning());
    }
}
