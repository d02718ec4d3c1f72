//! The type pipeline: the SQL type model, collation coercibility,
//! operand checking/inference strategies, and the validation session.

pub mod checker;
pub mod collation;
pub mod data_type;
pub mod inference;
pub mod scope;
pub mod validator;

pub use collation::{Coercibility, Collation, DEFAULT_COLLATION_NAME};
pub use data_type::{DataType, TypeFamily, TypeName};
pub use scope::{EmptyScope, MapScope, Scope};
pub use validator::Validator;
