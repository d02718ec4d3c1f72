//! The precedence-climbing SQL writer
//!
//! Serialization runs top-down: a parent passes its left/right context
//! precedences to each child, and a call wraps itself in parentheses iff
//! the context binds tighter than the call's own operator. Forced mode
//! parenthesizes every expression node regardless, which pins grouping
//! for texts fed to less trusted downstream parsers.

use crate::ast::{Call, DataTypeSpec, Identifier, Node, NodeList, Value};
use crate::dialect::Dialect;
use crate::operator::{Operator, Precedence};

pub struct SqlWriter<'d> {
    dialect: &'d Dialect,
    buf: String,
    force_parens: bool,
    need_space: bool,
}

impl<'d> SqlWriter<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            buf: String::new(),
            force_parens: false,
            need_space: false,
        }
    }

    pub fn new_forced(dialect: &'d Dialect) -> Self {
        Self {
            force_parens: true,
            ..Self::new(dialect)
        }
    }

    pub fn dialect(&self) -> &'d Dialect {
        self.dialect
    }

    pub fn force_parens(&self) -> bool {
        self.force_parens
    }

    pub fn into_sql(self) -> String {
        self.buf
    }

    /// Emits one space-separated token.
    pub fn token(&mut self, s: &str) {
        if self.need_space && !self.buf.is_empty() {
            self.buf.push(' ');
        }
        self.buf.push_str(s);
        self.need_space = true;
    }

    pub fn keyword(&mut self, kw: &str) {
        self.token(&kw.to_uppercase());
    }

    /// Opening parenthesis hugging the preceding token, as in `F(`.
    pub fn open_call(&mut self) {
        self.buf.push('(');
        self.need_space = false;
    }

    /// Free-standing opening parenthesis, as around a grouped expression.
    pub fn open_paren(&mut self) {
        if self.need_space && !self.buf.is_empty() {
            self.buf.push(' ');
        }
        self.buf.push('(');
        self.need_space = false;
    }

    pub fn close_paren(&mut self) {
        self.buf.push(')');
        self.need_space = true;
    }

    /// Subscript brackets, as in `a[1]`.
    pub fn open_bracket(&mut self) {
        self.buf.push('[');
        self.need_space = false;
    }

    pub fn close_bracket(&mut self) {
        self.buf.push(']');
        self.need_space = true;
    }

    pub fn comma(&mut self) {
        self.buf.push(',');
        self.need_space = true;
    }

    /// Renders a node under the given context precedences.
    pub fn unparse(&mut self, node: &Node, left_prec: Precedence, right_prec: Precedence) {
        match node {
            Node::Literal(lit) => self.unparse_value(lit.value()),
            Node::Identifier(ident) => self.unparse_identifier(ident),
            Node::DynamicParam(_) => self.token("?"),
            Node::DataType(spec) => self.unparse_type_spec(spec),
            Node::List(list) => self.unparse_list(list),
            Node::Call(call) => self.unparse_call(call, left_prec, right_prec),
        }
    }

    fn unparse_call(&mut self, call: &Call, left_prec: Precedence, right_prec: Precedence) {
        let operator = call.operator();
        let wrap = left_prec > operator.left_prec()
            || (right_prec != 0 && operator.right_prec() <= right_prec)
            || (self.force_parens && call.kind().is_expression());
        let dialect = self.dialect;
        if wrap {
            self.open_paren();
            dialect.unparse_call(self, call, 0, 0);
            self.close_paren();
        } else {
            dialect.unparse_call(self, call, left_prec, right_prec);
        }
    }

    fn unparse_value(&mut self, value: &Value) {
        match value {
            Value::Str { value, charset } => {
                let quoted = self.dialect.quote_string(value);
                match charset {
                    Some(cs) if self.dialect.supports_charset_clause() => {
                        self.token(&format!("_{}{}", cs, quoted));
                    }
                    _ => self.token(&quoted),
                }
            }
            other => self.token(&other.to_string()),
        }
    }

    fn unparse_identifier(&mut self, ident: &Identifier) {
        let mut rendered = String::new();
        for (i, name) in ident.names.iter().enumerate() {
            if i > 0 {
                rendered.push('.');
            }
            rendered.push_str(&self.dialect.quote_identifier(name));
        }
        if ident.star {
            if !rendered.is_empty() {
                rendered.push('.');
            }
            rendered.push('*');
        }
        self.token(&rendered);
        if let Some(collation) = &ident.collation {
            self.keyword("COLLATE");
            self.token(&collation.name);
        }
    }

    fn unparse_type_spec(&mut self, spec: &DataTypeSpec) {
        let mut rendered = spec.type_name.to_uppercase();
        match (spec.precision, spec.scale) {
            (Some(p), Some(s)) => rendered.push_str(&format!("({}, {})", p, s)),
            (Some(p), None) => rendered.push_str(&format!("({})", p)),
            _ => {}
        }
        self.token(&rendered);
        if spec.with_timezone {
            self.keyword("WITH TIME ZONE");
        }
        if let Some(charset) = &spec.charset {
            if self.dialect.supports_charset_clause() {
                self.keyword("CHARACTER SET");
                self.token(charset);
            }
        }
        match spec.collection {
            Some(crate::ast::CollectionWrapper::Array) => self.keyword("ARRAY"),
            Some(crate::ast::CollectionWrapper::Multiset) => self.keyword("MULTISET"),
            None => {}
        }
        if spec.nullable == Some(false) {
            self.keyword("NOT NULL");
        }
    }

    /// Comma-separated rendering, the default for lists.
    pub fn unparse_list(&mut self, list: &NodeList) {
        for (i, item) in list.iter().enumerate() {
            if i > 0 {
                self.comma();
            }
            self.unparse(item, 0, 0);
        }
    }

    /// Separator-joined rendering for chained connectives (AND/OR). Each
    /// element takes asymmetric context: the separator's right precedence
    /// on its left flank and left precedence on its right flank, yielding
    /// minimal-but-correct parenthesization.
    pub fn unparse_list_separated(&mut self, list: &NodeList, separator: &Operator) {
        for (i, item) in list.iter().enumerate() {
            if i > 0 {
                self.token(separator.name());
            }
            self.unparse(item, separator.right_prec(), separator.left_prec());
        }
    }
}
