// viewsmith-core/src/domain/compiler/quoter.rs

/// Double-quote quoting for Athena (Presto/Trino) identifiers.
pub struct IdentifierQuoter;

impl IdentifierQuoter {
    /// `orders` -> `"orders"`. Embedded quotes are doubled.
    pub fn quote(ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// `"catalog"."schema"."object"`
    pub fn qualified(catalog: &str, schema: &str, object: &str) -> String {
        format!(
            "{}.{}.{}",
            Self::quote(catalog),
            Self::quote(schema),
            Self::quote(object)
        )
    }
}
