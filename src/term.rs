//! Term table records
//!
//! One `TermRow` per row of the glossary ("Index of Terms"). Rows are
//! immutable inputs: the synthesis pass only derives new structures from them.

use serde::{Deserialize, Serialize};

/// Column headers of the term table, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermColumn {
    DisplayName,
    LocalName,
    CanonicalName,
    Definition,
    Guidance,
    Category,
    Origin,
    Notes,
    TicketRef,
    SyntaxPattern,
    PackageMembership,
}

impl TermColumn {
    pub const ALL: [TermColumn; 11] = [
        TermColumn::DisplayName,
        TermColumn::LocalName,
        TermColumn::CanonicalName,
        TermColumn::Definition,
        TermColumn::Guidance,
        TermColumn::Category,
        TermColumn::Origin,
        TermColumn::Notes,
        TermColumn::TicketRef,
        TermColumn::SyntaxPattern,
        TermColumn::PackageMembership,
    ];

    /// Header text as it appears in the source sheet.
    pub fn header(&self) -> &'static str {
        match self {
            TermColumn::DisplayName => "Column Header",
            TermColumn::LocalName => "name",
            TermColumn::CanonicalName => "mixs_6_slot_name",
            TermColumn::Definition => "Definition",
            TermColumn::Guidance => "Guidance",
            TermColumn::Category => "Category",
            TermColumn::Origin => "Origin",
            TermColumn::Notes => "Notes",
            TermColumn::TicketRef => "GitHub Ticket",
            TermColumn::SyntaxPattern => "syntax",
            TermColumn::PackageMembership => "Associated Packages",
        }
    }

    /// Columns whose absence from the header row is fatal.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            TermColumn::LocalName | TermColumn::Category | TermColumn::PackageMembership
        )
    }
}

/// One source record.
///
/// Optional columns keep the difference between a missing cell (`None`) and
/// an empty one (`Some("")`). Use the `*_text` helpers when the rule only
/// cares whether a value was supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRow {
    pub display_name: Option<String>,
    pub local_name: String,
    pub canonical_name: Option<String>,
    pub definition: Option<String>,
    pub guidance: Option<String>,
    pub category: Option<String>,
    pub origin: Option<String>,
    pub notes: Option<String>,
    pub ticket_ref: Option<String>,
    pub syntax_pattern: Option<String>,
    pub package_membership_raw: Option<String>,
}

impl TermRow {
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, column: TermColumn) -> Option<&str> {
        match column {
            TermColumn::DisplayName => self.display_name.as_deref(),
            TermColumn::LocalName => Some(self.local_name.as_str()),
            TermColumn::CanonicalName => self.canonical_name.as_deref(),
            TermColumn::Definition => self.definition.as_deref(),
            TermColumn::Guidance => self.guidance.as_deref(),
            TermColumn::Category => self.category.as_deref(),
            TermColumn::Origin => self.origin.as_deref(),
            TermColumn::Notes => self.notes.as_deref(),
            TermColumn::TicketRef => self.ticket_ref.as_deref(),
            TermColumn::SyntaxPattern => self.syntax_pattern.as_deref(),
            TermColumn::PackageMembership => self.package_membership_raw.as_deref(),
        }
    }

    pub fn set(&mut self, column: TermColumn, value: Option<String>) {
        match column {
            TermColumn::DisplayName => self.display_name = value,
            TermColumn::LocalName => self.local_name = value.unwrap_or_default(),
            TermColumn::CanonicalName => self.canonical_name = value,
            TermColumn::Definition => self.definition = value,
            TermColumn::Guidance => self.guidance = value,
            TermColumn::Category => self.category = value,
            TermColumn::Origin => self.origin = value,
            TermColumn::Notes => self.notes = value,
            TermColumn::TicketRef => self.ticket_ref = value,
            TermColumn::SyntaxPattern => self.syntax_pattern = value,
            TermColumn::PackageMembership => self.package_membership_raw = value,
        }
    }

    /// The column value when present and non-empty.
    pub fn text(&self, column: TermColumn) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    pub fn display_text(&self) -> Option<&str> {
        self.text(TermColumn::DisplayName)
    }

    pub fn category_text(&self) -> Option<&str> {
        self.text(TermColumn::Category)
    }

    pub fn guidance_text(&self) -> Option<&str> {
        self.text(TermColumn::Guidance)
    }

    pub fn ticket_text(&self) -> Option<&str> {
        self.text(TermColumn::TicketRef)
    }

    /// Canonical name when it names something other than the local field.
    pub fn alias(&self) -> Option<&str> {
        self.text(TermColumn::CanonicalName)
            .filter(|canonical| *canonical != self.local_name)
    }
}
