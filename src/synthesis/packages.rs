//! Package-list normalization
//!
//! The package universe is computed once over the whole table and frozen
//! before any row is expanded or any duplicate is resolved.

use crate::term::TermRow;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    static ref PACKAGE_DELIMITER: Regex = Regex::new(r";\s*").unwrap();
}

pub type PackageMembership = BTreeSet<String>;

/// Sorted set of every explicitly named package in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageUniverse {
    packages: BTreeSet<String>,
}

impl PackageUniverse {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.packages
    }
}

/// A term row paired with its expanded package membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow<'a> {
    /// Position in the source table.
    pub index: usize,
    pub row: &'a TermRow,
    pub packages: PackageMembership,
}

impl NormalizedRow<'_> {
    pub fn name(&self) -> &str {
        &self.row.local_name
    }
}

pub fn split_packages(raw: &str) -> impl Iterator<Item = &str> {
    PACKAGE_DELIMITER
        .split(raw)
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

fn is_all_token(raw: Option<&str>, all_token: &str) -> bool {
    raw.map(str::trim) == Some(all_token)
}

pub fn package_universe(rows: &[TermRow], all_token: &str) -> PackageUniverse {
    let packages = rows
        .iter()
        .filter_map(|row| row.package_membership_raw.as_deref())
        .filter(|raw| !is_all_token(Some(*raw), all_token))
        .flat_map(split_packages)
        .filter(|p| *p != all_token)
        .map(str::to_string)
        .collect();
    PackageUniverse { packages }
}

pub fn membership(row: &TermRow, universe: &PackageUniverse, all_token: &str) -> PackageMembership {
    let raw = row.package_membership_raw.as_deref();
    if is_all_token(raw, all_token) {
        return universe.packages.clone();
    }
    raw.map(|r| {
        split_packages(r)
            .filter(|p| *p != all_token)
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Expand every row's membership against the frozen universe.
pub fn normalize<'a>(
    rows: &'a [TermRow],
    all_token: &str,
) -> (Vec<NormalizedRow<'a>>, PackageUniverse) {
    let universe = package_universe(rows, all_token);
    let normalized = rows
        .iter()
        .enumerate()
        .map(|(index, row)| NormalizedRow {
            index,
            row,
            packages: membership(row, &universe, all_token),
        })
        .collect();
    (normalized, universe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, packages: Option<&str>) -> TermRow {
        TermRow {
            package_membership_raw: packages.map(str::to_string),
            ..TermRow::new(name)
        }
    }

    #[test]
    fn test_split_tolerates_spacing() {
        let parts: Vec<&str> = split_packages("soil;water;  sediment ; ").collect();
        assert_eq!(parts, vec!["soil", "water", "sediment"]);
    }

    #[test]
    fn test_universe_is_sorted_and_excludes_all() {
        let rows = vec![
            row("a", Some("water; soil")),
            row("b", Some("all")),
            row("c", Some("air")),
            row("d", None),
            row("e", Some("")),
        ];
        let universe = package_universe(&rows, "all");
        let packages: Vec<&str> = universe.iter().collect();
        assert_eq!(packages, vec!["air", "soil", "water"]);
    }

    #[test]
    fn test_all_expands_to_full_universe() {
        let rows = vec![
            row("a", Some("all")),
            row("b", Some("soil; water")),
            row("c", Some("air")),
        ];
        let (normalized, universe) = normalize(&rows, "all");
        assert_eq!(&normalized[0].packages, universe.as_set());
        assert_eq!(normalized[0].packages.len(), 3);
    }

    #[test]
    fn test_all_token_inside_a_list_is_dropped() {
        let rows = vec![row("a", Some("all; soil")), row("b", Some("water"))];
        let (normalized, universe) = normalize(&rows, "all");
        let packages: Vec<&str> = universe.iter().collect();
        assert_eq!(packages, vec!["soil", "water"]);
        assert_eq!(normalized[0].packages, ["soil".to_string()].into());
    }

    #[test]
    fn test_empty_membership_is_empty_set() {
        let rows = vec![row("a", None), row("b", Some("")), row("c", Some("soil"))];
        let (normalized, _) = normalize(&rows, "all");
        assert!(normalized[0].packages.is_empty());
        assert!(normalized[1].packages.is_empty());
        assert_eq!(normalized[2].index, 2);
    }
}
