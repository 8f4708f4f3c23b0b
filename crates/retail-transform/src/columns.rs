//! Canonical column names.

use std::collections::BTreeSet;

/// Trim, collapse each internal whitespace run to `_`, lower-case.
///
/// ```
/// use retail_transform::canonical_column_name;
///
/// assert_eq!(canonical_column_name("  Order ID "), "order_id");
/// assert_eq!(canonical_column_name("ship-service-level"), "ship-service-level");
/// assert_eq!(canonical_column_name("Gross  Amt\tINR"), "gross_amt_inr");
/// ```
pub fn canonical_column_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// A canonical name that was already taken and had to be suffixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    pub original: String,
    pub canonical: String,
    pub assigned: String,
}

/// Canonical names for a whole header, plus the collisions resolved on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalNames {
    pub names: Vec<String>,
    pub collisions: Vec<NameCollision>,
}

/// Canonicalize every name in column order.
///
/// The first column to claim a canonical name keeps it; later ones get the
/// smallest free `_<n>` suffix (n >= 2). Names that canonicalize to nothing
/// become `column_<position>`. Already-canonical, unique input is returned
/// unchanged.
pub fn canonicalize_names<'a, I>(originals: I) -> CanonicalNames
where
    I: IntoIterator<Item = &'a str>,
{
    let originals: Vec<&str> = originals.into_iter().collect();
    let mut result = CanonicalNames::default();
    let mut taken: BTreeSet<String> = BTreeSet::new();

    let canonical: Vec<String> = originals
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let name = canonical_column_name(raw);
            if name.is_empty() {
                format!("column_{}", idx + 1)
            } else {
                name
            }
        })
        .collect();

    for (original, name) in originals.iter().zip(canonical) {
        if taken.insert(name.clone()) {
            result.names.push(name);
            continue;
        }
        let mut suffix = 2usize;
        let assigned = loop {
            let candidate = format!("{name}_{suffix}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        taken.insert(assigned.clone());
        result.collisions.push(NameCollision {
            original: (*original).to_string(),
            canonical: name,
            assigned: assigned.clone(),
        });
        result.names.push(assigned);
    }

    result
}
