//! Column resolution
//!
//! Sales sheets are maintained by hand, so the same concept turns up as
//! "Order Date", "Day", "Qty Sold" or "Gross". Each canonical [`Role`] owns a
//! list of lowercase synonyms; a role binds to the first column whose label
//! contains any of them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical meaning a column can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Date,
    Item,
    Quantity,
    Revenue,
    Category,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Date,
        Role::Item,
        Role::Quantity,
        Role::Revenue,
        Role::Category,
    ];

    /// Lowercase substrings that identify this role, in priority order
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Role::Date => &["date", "day", "order date", "trans date"],
            Role::Item => &["item", "product", "name", "menu item"],
            Role::Quantity => &["quantity", "qty", "count", "sold", "units"],
            Role::Revenue => &["revenue", "amount", "total", "sales", "price", "gross"],
            Role::Category => &["category", "type", "group", "section"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Date => "date",
            Role::Item => "item",
            Role::Quantity => "quantity",
            Role::Revenue => "revenue",
            Role::Category => "category",
        }
    }

    /// Whether a column label satisfies this role
    pub fn matches(self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.synonyms().iter().any(|syn| label.contains(syn))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role → column label. Unresolved roles are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMap {
    roles: BTreeMap<Role, String>,
}

impl ColumnMap {
    /// Bind a role by hand, bypassing synonym matching
    pub fn with(mut self, role: Role, label: impl Into<String>) -> Self {
        self.roles.insert(role, label.into());
        self
    }

    /// Column label bound to `role`
    pub fn get(&self, role: Role) -> Option<&str> {
        self.roles.get(&role).map(String::as_str)
    }

    pub fn is_resolved(&self, role: Role) -> bool {
        self.roles.contains_key(&role)
    }

    /// Roles no column matched
    pub fn unresolved(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| !self.is_resolved(*role))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        self.roles.iter().map(|(role, label)| (*role, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Resolve every role against the dataset's column labels.
///
/// Roles are independent: one column may serve several roles, and each role
/// takes the first column (in dataset order) that matches.
pub fn resolve_columns<S: AsRef<str>>(columns: &[S]) -> ColumnMap {
    let roles = Role::ALL
        .into_iter()
        .filter_map(|role| {
            columns
                .iter()
                .map(AsRef::as_ref)
                .find(|label| role.matches(label))
                .map(|label| (role, label.to_string()))
        })
        .collect();

    ColumnMap { roles }
}
