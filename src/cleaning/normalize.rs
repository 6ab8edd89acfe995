//! Column identifier normalization.

use std::collections::HashSet;

/// Fallback identifier for names with no ASCII alphanumerics.
pub const EMPTY_NAME_FALLBACK: &str = "col";

/// Canonicalize one column name: lowercase, every run of characters outside `[a-z0-9]` collapsed
/// to a single `_`, leading/trailing `_` trimmed.
///
/// The result matches `[a-z0-9_]+` and `normalize_column_name(normalize_column_name(s))` equals
/// `normalize_column_name(s)`.
pub fn normalize_column_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        EMPTY_NAME_FALLBACK.to_string()
    } else {
        out
    }
}

/// Normalize a full header, disambiguating collisions.
///
/// The first occurrence of an identifier keeps it; later ones get the first free `_1`, `_2`, …
/// suffix. Already-normalized, collision-free headers come back unchanged.
pub fn normalize_column_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let base = normalize_column_name(name.as_ref());
        let mut candidate = base.clone();
        let mut n = 0usize;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{base}_{n}");
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{normalize_column_name, normalize_column_names};
    use proptest::prelude::*;

    #[test]
    fn lowercases_and_collapses_separators() {
        assert_eq!(normalize_column_name("Unit Price"), "unit_price");
        assert_eq!(normalize_column_name("  Order--Date (UTC) "), "order_date_utc");
        assert_eq!(normalize_column_name("__qty__"), "qty");
        assert_eq!(normalize_column_name("Café Total"), "caf_total");
    }

    #[test]
    fn empty_or_symbol_only_names_fall_back() {
        assert_eq!(normalize_column_name(""), "col");
        assert_eq!(normalize_column_name("%%"), "col");
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let names = ["Price", "price", "PRICE ", "price_1"];
        assert_eq!(
            normalize_column_names(&names),
            vec!["price", "price_1", "price_2", "price_1_1"]
        );
    }

    #[test]
    fn normalized_header_is_a_fixed_point() {
        let once = normalize_column_names(&["A b", "a-b", "", "%"]);
        assert_eq!(normalize_column_names(&once), once);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(s in ".*") {
            let once = normalize_column_name(&s);
            prop_assert_eq!(normalize_column_name(&once), once.clone());
            prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
            prop_assert!(!once.is_empty());
        }

        #[test]
        fn header_normalization_is_unique_and_idempotent(names in proptest::collection::vec(".{0,8}", 0..12)) {
            let once = normalize_column_names(&names);
            let unique: std::collections::HashSet<_> = once.iter().collect();
            prop_assert_eq!(unique.len(), once.len());
            prop_assert_eq!(normalize_column_names(&once), once);
        }
    }
}
