use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::collation::Collator;
use crate::core::stores::CategoryStore;
use crate::domain::category::Category;
use crate::domain::common::NamedEntity;
use crate::errors::ReportResult;

/// One optgroup-style entry of a category picker.
///
/// A group without a label is a single ungrouped category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySelectGroup {
    label: Option<String>,
    categories: Vec<Category>,
}

impl CategorySelectGroup {
    pub fn new(label: Option<String>, categories: Vec<Category>) -> Self {
        let label = label.filter(|value| !value.trim().is_empty());
        Self { label, categories }
    }

    pub fn single(category: Category) -> Self {
        Self::new(None, vec![category])
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn has_label(&self) -> bool {
        self.label.is_some()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Label when present, otherwise the name of the sole category.
    pub fn sort_key(&self) -> &str {
        match &self.label {
            Some(label) => label,
            None => self
                .categories
                .first()
                .map(|category| category.name.as_str())
                .unwrap_or(""),
        }
    }
}

pub struct CategorySelectService;

impl CategorySelectService {
    /// Groups child categories under their root for a single-level picker.
    ///
    /// Roots with children become labelled groups holding only the children,
    /// childless roots become unlabelled singletons. Children whose parent is
    /// not among the roots are grouped by their nominal parent name. Members
    /// and groups are ordered with `collator` using a stable sort.
    pub fn group_by_root<C>(categories: &[Category], collator: &C) -> Vec<CategorySelectGroup>
    where
        C: Collator + ?Sized,
    {
        let mut children_by_parent: HashMap<Uuid, Vec<&Category>> = HashMap::new();
        for category in categories {
            if let Some(parent_id) = category.parent_id {
                children_by_parent.entry(parent_id).or_default().push(category);
            }
        }

        let mut groups = Vec::new();
        let mut grouped_roots: HashSet<Uuid> = HashSet::new();

        for root in categories.iter().filter(|category| category.is_root()) {
            match children_by_parent.get(&root.id) {
                Some(children) if !children.is_empty() => {
                    let members = sorted_members(children.iter().copied(), collator);
                    groups.push(CategorySelectGroup::new(Some(root.name.clone()), members));
                    grouped_roots.insert(root.id);
                }
                _ => groups.push(CategorySelectGroup::single(root.clone())),
            }
        }

        let mut orphan_order: Vec<String> = Vec::new();
        let mut orphans_by_parent_name: HashMap<String, Vec<&Category>> = HashMap::new();
        for orphan in categories.iter().filter(|category| {
            category
                .parent_id
                .map_or(false, |parent_id| !grouped_roots.contains(&parent_id))
        }) {
            match orphan
                .parent_name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
            {
                Some(parent_name) => {
                    let members = orphans_by_parent_name
                        .entry(parent_name.to_string())
                        .or_insert_with(|| {
                            orphan_order.push(parent_name.to_string());
                            Vec::new()
                        });
                    members.push(orphan);
                }
                None => groups.push(CategorySelectGroup::single(orphan.clone())),
            }
        }

        for parent_name in orphan_order {
            if let Some(members) = orphans_by_parent_name.remove(&parent_name) {
                let members = sorted_members(members.into_iter(), collator);
                groups.push(CategorySelectGroup::new(Some(parent_name), members));
            }
        }

        groups.sort_by(|a, b| compare_names(collator, a.sort_key(), b.sort_key()));
        tracing::debug!(
            categories = categories.len(),
            groups = groups.len(),
            "grouped categories for selection"
        );
        groups
    }

    /// Loads the user's categories from `store` and groups them.
    pub fn for_store<S, C>(store: &S, user_id: Uuid, collator: &C) -> ReportResult<Vec<CategorySelectGroup>>
    where
        S: CategoryStore + ?Sized,
        C: Collator + ?Sized,
    {
        let categories = store.categories_for(user_id)?;
        Ok(Self::group_by_root(&categories, collator))
    }
}

fn sorted_members<'a, C>(members: impl Iterator<Item = &'a Category>, collator: &C) -> Vec<Category>
where
    C: Collator + ?Sized,
{
    let mut members: Vec<Category> = members.cloned().collect();
    members.sort_by(|a, b| compare_names(collator, a.sort_name(), b.sort_name()));
    members
}

fn compare_names<C>(collator: &C, a: &str, b: &str) -> Ordering
where
    C: Collator + ?Sized,
{
    collator.compare(a.trim(), b.trim())
}
