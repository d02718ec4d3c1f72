//! Dialects: the configuration that parameterizes SQL rendering
//!
//! A dialect is an immutable record built once and shared process-wide:
//! identifier quoting, string escaping, offset/fetch phrasing, null
//! ordering, capability flags, and per-kind rendering overrides. The
//! override table is the dialect's half of the double dispatch: the writer
//! asks the dialect to render each call, and the dialect falls back to the
//! operator's own renderer when it has no override for that kind.

pub mod registry;
pub mod writer;

pub use registry::{lookup, register, unregister};
pub use writer::SqlWriter;

use crate::ast::{Call, Kind, Node};
use crate::operator::{CallUnparser, Precedence};
use std::collections::HashMap;
use std::sync::Arc;

/// Where NULL sorts when no explicit NULLS FIRST/LAST is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullCollation {
    High,
    Low,
    First,
    Last,
}

/// How row-limiting clauses are phrased.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitStyle {
    /// ANSI `OFFSET n ROWS FETCH NEXT m ROWS ONLY`.
    OffsetFetch,
    /// `LIMIT m OFFSET n`.
    LimitOffset,
}

pub struct Dialect {
    name: String,
    identifier_quote: (char, char),
    null_collation: NullCollation,
    limit_style: LimitStyle,
    supports_window_functions: bool,
    supports_nested_aggregations: bool,
    supports_arrays: bool,
    supports_charset_clause: bool,
    call_unparsers: HashMap<Kind, Arc<dyn CallUnparser>>,
}

impl Dialect {
    /// The ANSI-flavored default dialect.
    pub fn ansi() -> Self {
        Self {
            name: "ansi".to_string(),
            identifier_quote: ('"', '"'),
            null_collation: NullCollation::High,
            limit_style: LimitStyle::OffsetFetch,
            supports_window_functions: true,
            supports_nested_aggregations: false,
            supports_arrays: true,
            supports_charset_clause: true,
            call_unparsers: HashMap::new(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::ansi()
        }
    }

    pub fn with_identifier_quote(mut self, open: char, close: char) -> Self {
        self.identifier_quote = (open, close);
        self
    }

    pub fn with_null_collation(mut self, null_collation: NullCollation) -> Self {
        self.null_collation = null_collation;
        self
    }

    pub fn with_limit_style(mut self, limit_style: LimitStyle) -> Self {
        self.limit_style = limit_style;
        self
    }

    pub fn with_window_functions(mut self, supported: bool) -> Self {
        self.supports_window_functions = supported;
        self
    }

    pub fn with_nested_aggregations(mut self, supported: bool) -> Self {
        self.supports_nested_aggregations = supported;
        self
    }

    pub fn with_arrays(mut self, supported: bool) -> Self {
        self.supports_arrays = supported;
        self
    }

    pub fn with_charset_clause(mut self, supported: bool) -> Self {
        self.supports_charset_clause = supported;
        self
    }

    /// Installs a rendering override for calls of one kind.
    pub fn with_call_unparser(mut self, kind: Kind, unparser: Arc<dyn CallUnparser>) -> Self {
        self.call_unparsers.insert(kind, unparser);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn null_collation(&self) -> NullCollation {
        self.null_collation
    }

    pub fn limit_style(&self) -> LimitStyle {
        self.limit_style
    }

    pub fn supports_window_functions(&self) -> bool {
        self.supports_window_functions
    }

    pub fn supports_nested_aggregations(&self) -> bool {
        self.supports_nested_aggregations
    }

    pub fn supports_arrays(&self) -> bool {
        self.supports_arrays
    }

    pub fn supports_charset_clause(&self) -> bool {
        self.supports_charset_clause
    }

    /// Quotes an identifier if it needs quoting under this dialect.
    pub fn quote_identifier(&self, name: &str) -> String {
        let plain = !name.is_empty()
            && name
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if plain {
            return name.to_string();
        }
        let (open, close) = self.identifier_quote;
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(open);
        for c in name.chars() {
            quoted.push(c);
            if c == close {
                quoted.push(close);
            }
        }
        quoted.push(close);
        quoted
    }

    /// Single-quotes a string literal, doubling embedded quotes.
    pub fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// The dialect's half of the double dispatch: per-kind override first,
    /// then the operator's own renderer.
    pub fn unparse_call(
        &self,
        writer: &mut SqlWriter<'_>,
        call: &Call,
        left_prec: Precedence,
        right_prec: Precedence,
    ) {
        if let Some(unparser) = self.call_unparsers.get(&call.kind()) {
            Arc::clone(unparser).unparse_call(writer, call, left_prec, right_prec);
        } else {
            let operator = Arc::clone(call.operator());
            operator.unparse_call(writer, call, left_prec, right_prec);
        }
    }

    /// Renders a row-limiting clause in this dialect's phrasing.
    pub fn unparse_offset_fetch(
        &self,
        writer: &mut SqlWriter<'_>,
        offset: Option<&Node>,
        fetch: Option<&Node>,
    ) {
        match self.limit_style {
            LimitStyle::OffsetFetch => {
                if let Some(offset) = offset {
                    writer.keyword("OFFSET");
                    writer.unparse(offset, 0, 0);
                    writer.keyword("ROWS");
                }
                if let Some(fetch) = fetch {
                    writer.keyword("FETCH NEXT");
                    writer.unparse(fetch, 0, 0);
                    writer.keyword("ROWS ONLY");
                }
            }
            LimitStyle::LimitOffset => {
                if let Some(fetch) = fetch {
                    writer.keyword("LIMIT");
                    writer.unparse(fetch, 0, 0);
                }
                if let Some(offset) = offset {
                    writer.keyword("OFFSET");
                    writer.unparse(offset, 0, 0);
                }
            }
        }
    }

    /// Renders a tree to SQL text under this dialect.
    pub fn render(&self, node: &Node) -> String {
        let mut writer = SqlWriter::new(self);
        writer.unparse(node, 0, 0);
        writer.into_sql()
    }

    /// Renders with every expression parenthesized, making grouping
    /// explicit regardless of precedence.
    pub fn render_forced(&self, node: &Node) -> String {
        let mut writer = SqlWriter::new_forced(self);
        writer.unparse(node, 0, 0);
        writer.into_sql()
    }
}
