//! Domain types representing budget categories.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::NamedEntity;

/// Classifies transactions for grouping and expense reports.
///
/// `parent_name` is carried alongside `parent_id` so a child can still be
/// labelled when its parent is not part of the list being processed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            parent_id: None,
            parent_name: None,
        }
    }

    /// Attaches this category beneath `parent`, copying its name.
    pub fn with_parent(mut self, parent: &Category) -> Self {
        self.parent_id = Some(parent.id);
        self.parent_name = Some(parent.name.clone());
        self
    }

    /// Points at a parent by id and name without requiring the parent itself.
    pub fn with_parent_ref(mut self, parent_id: Uuid, parent_name: Option<String>) -> Self {
        self.parent_id = Some(parent_id);
        self.parent_name = parent_name;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_expense(&self) -> bool {
        self.kind == CategoryKind::Expense
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Income => "Income",
            CategoryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}
