//! The SQL expression tree: nodes, literals, kinds and positions

pub mod data_type;
pub mod kind;
pub mod literal;
pub mod node;
pub mod span;

pub use data_type::{CollectionWrapper, DataTypeSpec};
pub use kind::Kind;
pub use literal::{Literal, LiteralTag, Value};
pub use node::{Call, DynamicParam, Identifier, Node, NodeId, NodeList, Quantifier};
pub use span::Span;
