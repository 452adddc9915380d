//! Tag catalog: Category → TagGroup → item identifiers.
//!
//! The catalog is loaded once per run from a JSON document and is immutable
//! thereafter. Traversal order is the document's own order, which keeps
//! pipeline output deterministic for a given catalog file.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use serde_json::Value;

use crate::error::AppError;

#[derive(Debug, Clone)]
struct GroupEntry {
    name: String,
    items: Vec<String>,
}

#[derive(Debug, Clone)]
struct CategoryEntry {
    name: String,
    groups: Vec<GroupEntry>,
}

/// In-memory catalog, in document order.
#[derive(Debug, Clone)]
pub struct TagCatalog {
    categories: Vec<CategoryEntry>,
}

/// One matching `(category, identifiers)` entry for a tag-group traversal.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSelection<'a> {
    pub category: &'a str,
    pub items: &'a [String],
}

impl TagCatalog {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::Catalog(format!("Failed to open catalog '{}': {e}", path.display()))
        })?;
        let value: Value = serde_json::from_reader(file).map_err(|e| {
            AppError::Catalog(format!("Invalid catalog JSON '{}': {e}", path.display()))
        })?;
        Self::from_value(&value)
    }

    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| AppError::Catalog(format!("Invalid catalog JSON: {e}")))?;
        Self::from_value(&value)
    }

    fn from_value(value: &Value) -> Result<Self, AppError> {
        let Some(root) = value.as_object() else {
            return Err(AppError::Catalog(
                "Catalog root must be an object mapping categories to tag groups.".to_string(),
            ));
        };

        // Each identifier must belong to exactly one (category, tag group)
        // entry within one catalog load.
        let mut seen: HashSet<&str> = HashSet::new();

        let mut categories = Vec::with_capacity(root.len());
        for (category, groups_value) in root {
            let Some(groups_obj) = groups_value.as_object() else {
                return Err(AppError::Catalog(format!(
                    "Category '{category}' must map tag groups to identifier lists."
                )));
            };

            let mut groups = Vec::with_capacity(groups_obj.len());
            for (group, items_value) in groups_obj {
                let Some(list) = items_value.as_array() else {
                    return Err(AppError::Catalog(format!(
                        "Tag group '{category}/{group}' must be a list of identifiers."
                    )));
                };

                let mut items = Vec::with_capacity(list.len());
                for item in list {
                    let Some(id) = item.as_str() else {
                        return Err(AppError::Catalog(format!(
                            "Tag group '{category}/{group}' contains a non-string identifier."
                        )));
                    };
                    if id.is_empty() {
                        return Err(AppError::Catalog(format!(
                            "Tag group '{category}/{group}' contains an empty identifier."
                        )));
                    }
                    if !seen.insert(id) {
                        return Err(AppError::Catalog(format!(
                            "Identifier '{id}' appears in more than one catalog entry."
                        )));
                    }
                    items.push(id.to_string());
                }

                groups.push(GroupEntry {
                    name: group.clone(),
                    items,
                });
            }

            categories.push(CategoryEntry {
                name: category.clone(),
                groups,
            });
        }

        Ok(Self { categories })
    }

    /// Every `(category, identifiers)` entry whose tag group matches, in
    /// catalog order. A tag group may appear under more than one category;
    /// all matches are returned.
    pub fn selections_for(&self, tag_group: &str) -> Vec<CatalogSelection<'_>> {
        let mut out = Vec::new();
        for category in &self.categories {
            for group in &category.groups {
                if group.name == tag_group {
                    out.push(CatalogSelection {
                        category: &category.name,
                        items: &group.items,
                    });
                }
            }
        }
        out
    }

    /// Category owning the given item key, if any. Used by the back-fill to
    /// re-derive the Category column of previously written files.
    pub fn category_for_item(&self, key: &str) -> Option<&str> {
        for category in &self.categories {
            for group in &category.groups {
                if group.items.iter().any(|item| item == key) {
                    return Some(&category.name);
                }
            }
        }
        None
    }

    /// Unique tag-group names in catalog order.
    pub fn tag_groups(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for category in &self.categories {
            for group in &category.groups {
                if !out.contains(&group.name.as_str()) {
                    out.push(&group.name);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Essentials": {
            "Seoudi_tags": ["al-doha-sugar-1-kg", "al-doha-rice-1-kg"],
            "Carrefour_tags": ["445800"]
        },
        "Produce": {
            "Seoudi_tags": ["mafa-baladi-tomato-1-kg"]
        }
    }"#;

    #[test]
    fn selections_union_across_categories_in_catalog_order() {
        let catalog = TagCatalog::from_json_str(SAMPLE).unwrap();
        let selections = catalog.selections_for("Seoudi_tags");
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[0].category, "Essentials");
        assert_eq!(
            selections[0].items,
            ["al-doha-sugar-1-kg", "al-doha-rice-1-kg"]
        );
        assert_eq!(selections[1].category, "Produce");
        assert_eq!(selections[1].items, ["mafa-baladi-tomato-1-kg"]);
    }

    #[test]
    fn unknown_tag_group_matches_nothing() {
        let catalog = TagCatalog::from_json_str(SAMPLE).unwrap();
        assert!(catalog.selections_for("Missing_tags").is_empty());
    }

    #[test]
    fn category_lookup_by_item_key() {
        let catalog = TagCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.category_for_item("445800"), Some("Essentials"));
        assert_eq!(
            catalog.category_for_item("mafa-baladi-tomato-1-kg"),
            Some("Produce")
        );
        assert_eq!(catalog.category_for_item("nope"), None);
    }

    #[test]
    fn tag_groups_are_unique_and_ordered() {
        let catalog = TagCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.tag_groups(), ["Seoudi_tags", "Carrefour_tags"]);
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let dup = r#"{
            "A": {"G1": ["x"]},
            "B": {"G2": ["x"]}
        }"#;
        let err = TagCatalog::from_json_str(dup).unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
        assert!(err.to_string().contains("more than one"));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        for bad in [
            "[]",
            r#"{"A": []}"#,
            r#"{"A": {"G": "not-a-list"}}"#,
            r#"{"A": {"G": [1, 2]}}"#,
            r#"{"A": {"G": [""]}}"#,
            "not json",
        ] {
            let err = TagCatalog::from_json_str(bad).unwrap_err();
            assert!(matches!(err, AppError::Catalog(_)), "input: {bad}");
        }
    }
}
