//! AST nodes: identifiers, calls, lists and dynamic parameters
//!
//! Every node carries a source position and an identity used as the key of
//! the validation session's type cache. Deep equality is tolerant of
//! not-yet-resolved operator identity: calls compare operator *names*,
//! case-insensitively, never operator object identity.

use super::data_type::DataTypeSpec;
use super::kind::Kind;
use super::literal::Literal;
use super::span::Span;
use crate::operator::Operator;
use crate::typing::Collation;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a node, used as the type-cache key. Assigned once at
/// construction; clones keep the id, so a cloned subtree still refers to
/// the same cached type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The DISTINCT/ALL quantifier of a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Distinct,
    All,
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::Distinct => write!(f, "DISTINCT"),
            Quantifier::All => write!(f, "ALL"),
        }
    }
}

/// A possibly-qualified name, with an optional trailing wildcard and an
/// optional COLLATE clause.
#[derive(Clone, Debug)]
pub struct Identifier {
    pub(super) id: NodeId,
    pub span: Span,
    pub names: Vec<String>,
    pub star: bool,
    pub collation: Option<Collation>,
}

impl Identifier {
    pub fn simple(name: impl Into<String>, span: Span) -> Self {
        Self::qualified(vec![name.into()], span)
    }

    pub fn qualified(names: Vec<String>, span: Span) -> Self {
        Self {
            id: NodeId::next(),
            span,
            names,
            star: false,
            collation: None,
        }
    }

    /// A qualified wildcard such as `t.*`; `names` may be empty for `*`.
    pub fn star(names: Vec<String>, span: Span) -> Self {
        Self {
            id: NodeId::next(),
            span,
            names,
            star: true,
            collation: None,
        }
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = Some(collation);
        self
    }

    pub fn is_simple(&self) -> bool {
        self.names.len() == 1 && !self.star
    }

    /// The dotted full name, without quoting.
    pub fn full_name(&self) -> String {
        let mut name = self.names.join(".");
        if self.star {
            if !name.is_empty() {
                name.push('.');
            }
            name.push('*');
        }
        name
    }

    pub fn eq_names_ignore_case(&self, other: &Identifier) -> bool {
        self.names.len() == other.names.len()
            && self
                .names
                .iter()
                .zip(&other.names)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

/// A dynamic parameter placeholder (`?`), 0-based.
#[derive(Clone, Debug)]
pub struct DynamicParam {
    pub(super) id: NodeId,
    pub span: Span,
    pub index: usize,
}

impl DynamicParam {
    pub fn new(index: usize, span: Span) -> Self {
        Self {
            id: NodeId::next(),
            span,
            index,
        }
    }
}

/// An operator applied to an ordered operand list.
#[derive(Clone, Debug)]
pub struct Call {
    pub(super) id: NodeId,
    pub span: Span,
    operator: Arc<Operator>,
    operands: Vec<Node>,
    quantifier: Option<Quantifier>,
}

impl Call {
    pub fn new(operator: Arc<Operator>, operands: Vec<Node>, span: Span) -> Self {
        Self {
            id: NodeId::next(),
            span,
            operator,
            operands,
            quantifier: None,
        }
    }

    pub fn with_quantifier(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = Some(quantifier);
        self
    }

    pub fn operator(&self) -> &Arc<Operator> {
        &self.operator
    }

    pub fn operands(&self) -> &[Node] {
        &self.operands
    }

    pub fn operand(&self, i: usize) -> &Node {
        &self.operands[i]
    }

    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }

    pub fn quantifier(&self) -> Option<Quantifier> {
        self.quantifier
    }

    pub fn kind(&self) -> Kind {
        self.operator.kind()
    }

    /// Signature text for resolution errors, e.g. `FOO(<INTEGER>, <CHAR(1)>)`.
    pub fn signature_text(&self, operand_types: &[crate::typing::DataType]) -> String {
        let args: Vec<String> = operand_types.iter().map(|t| format!("<{}>", t)).collect();
        format!("{}({})", self.operator.name(), args.join(", "))
    }
}

/// An ordered sequence of nodes; a node itself, so lists can appear as
/// operands (WHEN lists, column lists, IN lists).
#[derive(Clone, Debug)]
pub struct NodeList {
    pub(super) id: NodeId,
    pub span: Span,
    items: Vec<Node>,
}

impl Default for NodeList {
    fn default() -> Self {
        Self::new(Vec::new(), Span::ZERO)
    }
}

impl NodeList {
    pub fn new(items: Vec<Node>, span: Span) -> Self {
        Self {
            id: NodeId::next(),
            span,
            items,
        }
    }

    pub fn push(&mut self, node: Node) {
        self.items.push(node);
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }
}

/// An AST node. A closed variant set: new shapes become new variants, so
/// every match stays exhaustive.
#[derive(Clone, Debug)]
pub enum Node {
    Literal(Literal),
    Identifier(Identifier),
    Call(Call),
    List(NodeList),
    DynamicParam(DynamicParam),
    DataType(DataTypeSpec),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Literal(n) => n.id,
            Node::Identifier(n) => n.id,
            Node::Call(n) => n.id,
            Node::List(n) => n.id,
            Node::DynamicParam(n) => n.id,
            Node::DataType(n) => n.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Node::Literal(n) => n.span,
            Node::Identifier(n) => n.span,
            Node::Call(n) => n.span,
            Node::List(n) => n.span,
            Node::DynamicParam(n) => n.span,
            Node::DataType(n) => n.span,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Node::Literal(_) => Kind::Literal,
            Node::Identifier(_) => Kind::Identifier,
            Node::Call(call) => call.kind(),
            Node::List(_) => Kind::NodeList,
            Node::DynamicParam(_) => Kind::DynamicParam,
            Node::DataType(_) => Kind::DataType,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Node::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Node::Identifier(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&NodeList> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_data_type(&self) -> Option<&DataTypeSpec> {
        match self {
            Node::DataType(spec) => Some(spec),
            _ => None,
        }
    }

    /// Whether this node is the DEFAULT argument sentinel.
    pub fn is_default_sentinel(&self) -> bool {
        self.kind() == Kind::Default
    }

    /// Walks the tree depth-first, calling the closure for every node.
    /// Halts and returns false when the closure returns false.
    pub fn walk(&self, visitor: &mut impl FnMut(&Node) -> bool) -> bool {
        if !visitor(self) {
            return false;
        }
        match self {
            Node::Call(call) => call.operands.iter().all(|n| n.walk(visitor)),
            Node::List(list) => list.items.iter().all(|n| n.walk(visitor)),
            Node::Literal(_)
            | Node::Identifier(_)
            | Node::DynamicParam(_)
            | Node::DataType(_) => true,
        }
    }

    /// Convenience entry: derives this node's type under a validation
    /// session.
    pub fn validate_expr(
        &self,
        validator: &mut crate::typing::Validator<'_>,
        scope: &dyn crate::typing::Scope,
    ) -> crate::error::Result<crate::typing::DataType> {
        validator.derive_type(scope, self)
    }

    /// Convenience entry: renders this node under the given context
    /// precedences.
    pub fn unparse(
        &self,
        writer: &mut crate::dialect::SqlWriter<'_>,
        left_prec: crate::operator::Precedence,
        right_prec: crate::operator::Precedence,
    ) {
        writer.unparse(self, left_prec, right_prec);
    }

    /// Deep structural equality, tolerant of unresolved operator identity:
    /// calls compare operator names case-insensitively.
    pub fn deep_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Literal(a), Node::Literal(b)) => a == b,
            (Node::Identifier(a), Node::Identifier(b)) => {
                a.names == b.names && a.star == b.star && a.collation == b.collation
            }
            (Node::DynamicParam(a), Node::DynamicParam(b)) => a.index == b.index,
            (Node::DataType(a), Node::DataType(b)) => a.eq_spec(b),
            (Node::List(a), Node::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.deep_eq(y))
            }
            (Node::Call(a), Node::Call(b)) => {
                a.operator.name().eq_ignore_ascii_case(b.operator.name())
                    && a.quantifier == b.quantifier
                    && a.operand_count() == b.operand_count()
                    && a.operands
                        .iter()
                        .zip(&b.operands)
                        .all(|(x, y)| x.deep_eq(y))
            }
            _ => false,
        }
    }
}

impl From<Literal> for Node {
    fn from(literal: Literal) -> Self {
        Node::Literal(literal)
    }
}

impl From<Identifier> for Node {
    fn from(identifier: Identifier) -> Self {
        Node::Identifier(identifier)
    }
}

impl From<Call> for Node {
    fn from(call: Call) -> Self {
        Node::Call(call)
    }
}

impl From<NodeList> for Node {
    fn from(list: NodeList) -> Self {
        Node::List(list)
    }
}

impl From<DynamicParam> for Node {
    fn from(param: DynamicParam) -> Self {
        Node::DynamicParam(param)
    }
}

impl From<DataTypeSpec> for Node {
    fn from(spec: DataTypeSpec) -> Self {
        Node::DataType(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::table as ops;

    fn ident(name: &str) -> Node {
        Identifier::simple(name, Span::ZERO).into()
    }

    #[test]
    fn node_ids_are_unique_and_survive_clone() {
        let a = ident("a");
        let b = ident("b");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), a.clone().id());
    }

    #[test]
    fn walk_visits_all_nodes() {
        let call = ops::AND.create_call(vec![ident("a"), ident("b")], Span::ZERO);
        let mut count = 0;
        call.walk(&mut |_| {
            count += 1;
            true
        });
        assert_eq!(count, 3);
    }

    #[test]
    fn walk_halts_on_false() {
        let call = ops::AND.create_call(vec![ident("a"), ident("b")], Span::ZERO);
        let mut count = 0;
        call.walk(&mut |_| {
            count += 1;
            false
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn deep_eq_compares_operator_names_not_identity() {
        let left = ops::PLUS.create_call(vec![ident("a"), ident("b")], Span::ZERO);
        let right = ops::PLUS.create_call(vec![ident("a"), ident("b")], Span::new(3, 1));
        assert!(left.deep_eq(&right));

        let other = ops::MINUS.create_call(vec![ident("a"), ident("b")], Span::ZERO);
        assert!(!left.deep_eq(&other));
    }

    #[test]
    fn identifier_full_name() {
        let id = Identifier::qualified(vec!["s".into(), "t".into()], Span::ZERO);
        assert_eq!(id.full_name(), "s.t");
        let star = Identifier::star(vec!["t".into()], Span::ZERO);
        assert_eq!(star.full_name(), "t.*");
    }
}
