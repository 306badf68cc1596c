//! SQL identifier quoting utilities
//!
//! Everything the helper layer splices into generated SQL passes through
//! here: identifiers are quoted, column type definitions are screened.
//! Values are never spliced; they are bound as parameters.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and doubles any embedded double
/// quotes, following the SQL standard.
///
/// # Examples
/// ```
/// use tm_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("SiteTree"), r#""SiteTree""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name (e.g. `schema.table`).
///
/// # Examples
/// ```
/// use tm_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("Member"), r#""Member""#);
/// assert_eq!(quote_qualified("archive.Member"), r#""archive"."Member""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a potentially schema-qualified table name into (schema, table).
///
/// Uses the last `.` as the separator and defaults to the `main` schema.
///
/// # Examples
/// ```
/// use tm_core::sql_utils::split_qualified_name;
/// assert_eq!(split_qualified_name("Member"), ("main", "Member"));
/// assert_eq!(split_qualified_name("archive.Member"), ("archive", "Member"));
/// ```
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    }
}

/// Check that a column type definition can be spliced into `ALTER TABLE`.
///
/// Type definitions (`VARCHAR(255) DEFAULT 'x'`, `INTEGER NOT NULL`) cannot
/// be bound as parameters, so statement terminators and comment markers are
/// rejected outright. Returns the offending fragment on failure.
pub fn check_type_definition(definition: &str) -> Result<(), &'static str> {
    if definition.trim().is_empty() {
        return Err("empty type definition");
    }
    for forbidden in [";", "--", "/*", "*/"] {
        if definition.contains(forbidden) {
            return Err(forbidden);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_with_embedded_quotes() {
        assert_eq!(quote_ident(r#"a"b"#), r#""a""b""#);
    }

    #[test]
    fn test_quote_ident_keeps_dots_literal() {
        assert_eq!(quote_ident("schema.table"), r#""schema.table""#);
    }

    #[test]
    fn test_quote_qualified_three_parts() {
        assert_eq!(
            quote_qualified("catalog.schema.table"),
            r#""catalog"."schema"."table""#
        );
    }

    #[test]
    fn test_split_qualified_name_nested() {
        assert_eq!(
            split_qualified_name("catalog.schema.table"),
            ("catalog.schema", "table")
        );
    }

    #[test]
    fn test_check_type_definition_accepts_defaults() {
        assert!(check_type_definition("VARCHAR(255) DEFAULT 'draft'").is_ok());
        assert!(check_type_definition("INTEGER NOT NULL DEFAULT 0").is_ok());
    }

    #[test]
    fn test_check_type_definition_rejects_injection() {
        assert_eq!(
            check_type_definition("INT; DROP TABLE Member"),
            Err(";")
        );
        assert_eq!(check_type_definition("INT -- comment"), Err("--"));
        assert_eq!(check_type_definition("INT /* x */"), Err("/*"));
        assert!(check_type_definition("   ").is_err());
    }
}
