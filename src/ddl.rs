//! Schema changes on the pooled connection.
//!
//! The executor never looks inside a definition. It asks a [`DdlRenderer`] for the
//! SQL text, runs it with no parameters and treats "did not error" as success; any
//! rows the server sends back are discarded.

use tracing::debug;

use crate::error::QueryError;
use crate::pool::{ExecuteOptions, PooledExecutor};
use crate::results::ResultSet;

/// Dialect facts handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectContext {
    pub name: &'static str,
    /// Quote character pair for identifiers.
    pub quote: (char, char),
    /// Whether unique indexes should exclude NULL keys.
    pub filter_null_on_unique_indexes: bool,
}

impl Default for DialectContext {
    fn default() -> Self {
        Self {
            name: "mssql",
            quote: ('[', ']'),
            filter_null_on_unique_indexes: false,
        }
    }
}

impl DialectContext {
    #[must_use]
    pub fn quote_ident(&self, name: &str) -> String {
        let (open, close) = self.quote;
        let escaped = name.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }
}

/// Turns a schema-change definition into SQL text. Must be pure.
pub trait DdlRenderer<D: ?Sized>: Send + Sync {
    fn render_ddl(&self, definition: &D, dialect: &DialectContext) -> String;
}

impl<D: ?Sized, F> DdlRenderer<D> for F
where
    F: Fn(&D, &DialectContext) -> String + Send + Sync,
{
    fn render_ddl(&self, definition: &D, dialect: &DialectContext) -> String {
        self(definition, dialect)
    }
}

/// Render `definition` and run it once on the pooled path.
///
/// # Errors
///
/// Returns the pool or execution failure unchanged.
pub async fn execute_ddl<P, R, D>(
    repo: &P,
    renderer: &R,
    dialect: &DialectContext,
    definition: &D,
    options: &ExecuteOptions,
) -> Result<(), QueryError>
where
    P: PooledExecutor + ?Sized,
    R: DdlRenderer<D> + ?Sized,
    D: ?Sized,
{
    let sql = renderer.render_ddl(definition, dialect);
    debug!(%sql, "executing ddl");
    repo.execute(&sql, &[], options)
        .await
        .map(|_: ResultSet| ())
}

/// DDL joins whatever transaction is open; no special handling needed.
#[must_use]
pub const fn supports_ddl_transaction() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers_with_brackets() {
        let d = DialectContext::default();
        assert_eq!(d.quote_ident("users"), "[users]");
        assert_eq!(d.quote_ident("we]ird"), "[we]]ird]");
    }

    #[test]
    fn closures_render() {
        let render = |name: &str, d: &DialectContext| format!("DROP TABLE {}", d.quote_ident(name));
        assert_eq!(
            DdlRenderer::<str>::render_ddl(&render, "t", &DialectContext::default()),
            "DROP TABLE [t]"
        );
        assert!(supports_ddl_transaction());
    }
}
