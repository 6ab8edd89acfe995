//! Run configuration.
//!
//! The column-role heuristics live in [`RoleAliases`] so callers can inject their own vocabulary
//! instead of relying on the built-in one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};

/// Ordered candidate column names per semantic role.
///
/// Candidates are compared against normalized column names; within a role the first candidate
/// present in the table wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleAliases {
    /// Price-like columns.
    pub price: Vec<String>,
    /// Quantity-like columns.
    pub quantity: Vec<String>,
    /// Grouping key columns, in priority order.
    pub group_key: Vec<String>,
}

impl Default for RoleAliases {
    fn default() -> Self {
        Self {
            price: vec!["price".to_owned(), "unit_price".to_owned()],
            quantity: vec!["quantity".to_owned(), "qty".to_owned()],
            group_key: vec!["product".to_owned(), "item".to_owned(), "category".to_owned()],
        }
    }
}

impl RoleAliases {
    /// Load aliases from a JSON file. Roles absent from the file keep their defaults.
    ///
    /// ```json
    /// { "price": ["price", "unit_cost"], "group_key": ["sku", "product"] }
    /// ```
    pub fn from_json_path(path: impl AsRef<Path>) -> LoadResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse aliases from JSON text.
    pub fn from_json_str(input: &str) -> LoadResult<Self> {
        serde_json::from_str(input).map_err(LoadError::from)
    }

    /// First price alias present among `names`.
    pub fn find_price<'a>(&self, names: &[&'a str]) -> Option<&'a str> {
        first_match(&self.price, names)
    }

    /// First quantity alias present among `names`.
    pub fn find_quantity<'a>(&self, names: &[&'a str]) -> Option<&'a str> {
        first_match(&self.quantity, names)
    }

    /// First grouping alias present among `names`.
    pub fn find_group_key<'a>(&self, names: &[&'a str]) -> Option<&'a str> {
        first_match(&self.group_key, names)
    }
}

fn first_match<'a>(candidates: &[String], names: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .find_map(|c| names.iter().copied().find(|n| *n == c.as_str()))
}

/// Artifact locations written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Cleaned + transformed table.
    pub cleaned_csv: PathBuf,
    /// Bar chart image.
    pub chart_png: PathBuf,
    /// PDF report.
    pub report_pdf: PathBuf,
}

impl OutputPaths {
    /// Default file names rooted at `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            cleaned_csv: dir.join("cleaned_output.csv"),
            chart_png: dir.join("top_products.png"),
            report_pdf: dir.join("report.pdf"),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputPaths, RoleAliases};

    #[test]
    fn partial_json_keeps_default_roles() {
        let aliases = RoleAliases::from_json_str(r#"{"price": ["cost"]}"#).unwrap();
        assert_eq!(aliases.price, vec!["cost".to_string()]);
        assert_eq!(aliases.quantity, RoleAliases::default().quantity);
        assert_eq!(aliases.group_key, RoleAliases::default().group_key);
    }

    #[test]
    fn alias_order_beats_column_order() {
        let aliases = RoleAliases::default();
        let names = ["category", "item", "product"];
        assert_eq!(aliases.find_group_key(&names), Some("product"));
        assert_eq!(aliases.find_price(&["unit_price", "x"]), Some("unit_price"));
        assert_eq!(aliases.find_quantity(&["amount"]), None);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = RoleAliases::from_json_str("{not json").unwrap_err();
        assert!(err.to_string().contains("json error"));
    }

    #[test]
    fn output_paths_use_fixed_names() {
        let p = OutputPaths::in_dir("out");
        assert!(p.cleaned_csv.ends_with("cleaned_output.csv"));
        assert!(p.chart_png.ends_with("top_products.png"));
        assert!(p.report_pdf.ends_with("report.pdf"));
    }
}
