//! Naming rules for scaffolded migrations.
//!
//! A raw name such as `"Add Column To Table"` is normalized to
//! `add_column_to_table`, which becomes both the file-name suffix and the
//! source of the generated type identifier `MigrationAddColumnToTable`.

/// Prefix applied to every generated migration type identifier.
pub const TYPE_PREFIX: &str = "Migration";

/// Normalize a raw migration name to `[a-z0-9_]+`.
///
/// Letters are lowercased, every run of other characters collapses to a
/// single underscore, and leading/trailing underscores are trimmed. Returns
/// `None` when nothing usable remains.
pub fn normalize_migration_name(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Convert a normalized snake_case name to PascalCase.
///
/// Digit-led segments are kept as-is: `v2_rollout` becomes `V2Rollout`.
pub fn to_pascal_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Derive the migration type identifier from a normalized name.
pub fn type_identifier(normalized: &str) -> String {
    format!("{TYPE_PREFIX}{}", to_pascal_case(normalized))
}

#[cfg(test)]
#[path = "naming_test.rs"]
mod tests;
