//! Package -> field list assembly

use super::duplicates::ResolvedFieldSet;
use super::packages::PackageUniverse;
use crate::schema::{ClassDefinition, ClassModel};
use itertools::Itertools;

/// One class per package in universe order, each listing its fields sorted.
/// Packages no surviving row belongs to get an empty list.
pub fn assemble_classes(resolved: &ResolvedFieldSet<'_>, universe: &PackageUniverse) -> ClassModel {
    // one (package, field) pair per membership
    let exploded: Vec<(&str, &str)> = resolved
        .rows
        .iter()
        .flat_map(|r| r.packages.iter().map(move |p| (p.as_str(), r.name())))
        .collect();

    universe
        .iter()
        .map(|package| {
            let slots = exploded
                .iter()
                .filter(|(p, _)| *p == package)
                .map(|(_, field)| field.to_string())
                .sorted()
                .collect();
            (package.to_string(), ClassDefinition::Package { slots })
        })
        .collect()
}
