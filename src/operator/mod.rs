//! Operators: names, kinds, precedence, and pluggable type strategies
//!
//! An operator owns a syntax category, left/right binding strengths, and up
//! to three strategy objects: an operand checker, an operand-type inferrer
//! (for untyped positions such as dynamic parameters), and a return-type
//! inferrer. Standard operators are process-wide singletons compared by
//! (name, kind).

pub mod binding;
pub mod registry;
pub mod table;

pub use binding::CallBinding;
pub use registry::OperatorRegistry;

use crate::ast::{Call, Kind, Node, Span};
use crate::dialect::SqlWriter;
use crate::error::{Error, Result};
use crate::typing::DataType;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Binding strength. Even numbers denote associativity boundaries; an
/// operator's left and right precedence differ by one tick in the
/// direction of its associativity.
pub type Precedence = u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// Derives the (left, right) precedence pair from a level and an
/// associativity. For a left-associative operator the right side binds one
/// tick tighter, forcing left-to-right grouping without tree rebalancing.
pub fn derive_precedences(level: Precedence, assoc: Associativity) -> (Precedence, Precedence) {
    match assoc {
        Associativity::Left => (level, level + 1),
        Associativity::Right => (level + 1, level),
    }
}

/// The syntax category of an operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// `-x`, `NOT x`
    Prefix,
    /// `x + y`
    Infix,
    /// `x IS NULL`
    Postfix,
    /// `F(x, y)`
    Function,
    /// Niladic function rendered without parentheses, e.g. `CURRENT_DATE`.
    FunctionId,
    /// Keyword syntax with a custom renderer, e.g. CAST, CASE, BETWEEN.
    Special,
}

/// Function categories, used as a resolution filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionCategory {
    System,
    String,
    Numeric,
    TimeDate,
    UserDefined,
    UserDefinedConstructor,
}

/// Acceptable operand counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperandCountRange {
    pub min: usize,
    pub max: Option<usize>,
}

impl OperandCountRange {
    pub fn of(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn any() -> Self {
        Self { min: 0, max: None }
    }

    pub fn contains(&self, n: usize) -> bool {
        n >= self.min && self.max.is_none_or(|max| n <= max)
    }
}

impl fmt::Display for OperandCountRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", self.min),
            Some(max) => write!(f, "between {} and {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// Checks the shapes and types of a call's operands.
pub trait OperandTypeChecker: Send + Sync {
    /// The operand counts this checker accepts.
    fn operand_count_range(&self) -> OperandCountRange;

    /// Checks operand types. With `throw_on_failure` the checker reports a
    /// positioned error; otherwise it answers with a boolean, which the
    /// resolver uses while narrowing candidates.
    fn check_operand_types(
        &self,
        binding: &mut CallBinding<'_, '_>,
        throw_on_failure: bool,
    ) -> Result<bool>;

    /// Human-readable signatures for "cannot apply" errors.
    fn allowed_signatures(&self, op_name: &str) -> String;
}

/// Infers types for operands whose own type is unknown, e.g. dynamic
/// parameters, once the operator is resolved.
pub trait OperandTypeInference: Send + Sync {
    fn infer_operand_types(
        &self,
        binding: &mut CallBinding<'_, '_>,
        return_type: &DataType,
        operand_types: &mut [DataType],
    ) -> Result<()>;
}

/// Infers the result type of a validated call.
pub trait ReturnTypeInference: Send + Sync {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType>;
}

/// Renders a call to SQL text. Dialects install these per kind to override
/// rendering for specific operators; operators install them for keyword
/// syntax.
pub trait CallUnparser: Send + Sync {
    fn unparse_call(
        &self,
        writer: &mut SqlWriter<'_>,
        call: &Call,
        left_prec: Precedence,
        right_prec: Precedence,
    );
}

impl<F> CallUnparser for F
where
    F: Fn(&mut SqlWriter<'_>, &Call, Precedence, Precedence) + Send + Sync,
{
    fn unparse_call(
        &self,
        writer: &mut SqlWriter<'_>,
        call: &Call,
        left_prec: Precedence,
        right_prec: Precedence,
    ) {
        self(writer, call, left_prec, right_prec)
    }
}

/// Formal metadata for routines that declare parameters, i.e. user-defined
/// functions. Built-ins carry none and are matched by their checkers
/// instead.
#[derive(Clone)]
pub struct FunctionMeta {
    pub category: FunctionCategory,
    pub param_names: Vec<String>,
    pub param_types: Vec<DataType>,
    pub return_type: Option<DataType>,
}

/// A named, kinded operator.
pub struct Operator {
    name: String,
    kind: Kind,
    syntax: Syntax,
    left_prec: Precedence,
    right_prec: Precedence,
    operand_range: Option<OperandCountRange>,
    operand_checker: Option<Arc<dyn OperandTypeChecker>>,
    operand_inference: Option<Arc<dyn OperandTypeInference>>,
    return_inference: Option<Arc<dyn ReturnTypeInference>>,
    function: Option<FunctionMeta>,
    unparser: Option<Arc<dyn CallUnparser>>,
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("syntax", &self.syntax)
            .field("left_prec", &self.left_prec)
            .field("right_prec", &self.right_prec)
            .finish()
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl Eq for Operator {}

impl Hash for Operator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.kind.hash(state);
    }
}

impl Operator {
    fn new(
        name: impl Into<String>,
        kind: Kind,
        syntax: Syntax,
        left_prec: Precedence,
        right_prec: Precedence,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            syntax,
            left_prec,
            right_prec,
            operand_range: None,
            operand_checker: None,
            operand_inference: None,
            return_inference: None,
            function: None,
            unparser: None,
        }
    }

    /// A left-associative infix operator at the given (even) level.
    pub fn infix(name: impl Into<String>, kind: Kind, level: Precedence) -> Self {
        let (l, r) = derive_precedences(level, Associativity::Left);
        Self::new(name, kind, Syntax::Infix, l, r).with_operand_range(OperandCountRange::of(2))
    }

    /// A right-associative infix operator.
    pub fn infix_right(name: impl Into<String>, kind: Kind, level: Precedence) -> Self {
        let (l, r) = derive_precedences(level, Associativity::Right);
        Self::new(name, kind, Syntax::Infix, l, r).with_operand_range(OperandCountRange::of(2))
    }

    /// A prefix operator. Prefix operators are right-associative by
    /// definition; both binding strengths sit at the level itself.
    pub fn prefix(name: impl Into<String>, kind: Kind, level: Precedence) -> Self {
        Self::new(name, kind, Syntax::Prefix, level, level)
            .with_operand_range(OperandCountRange::of(1))
    }

    /// A postfix operator.
    pub fn postfix(name: impl Into<String>, kind: Kind, level: Precedence) -> Self {
        Self::new(name, kind, Syntax::Postfix, level, level)
            .with_operand_range(OperandCountRange::of(1))
    }

    /// A function-syntax operator. Function calls are atoms for
    /// parenthesization purposes.
    pub fn function(name: impl Into<String>, kind: Kind, category: FunctionCategory) -> Self {
        let mut op = Self::new(name, kind, Syntax::Function, 100, 100);
        op.function = Some(FunctionMeta {
            category,
            param_names: Vec::new(),
            param_types: Vec::new(),
            return_type: None,
        });
        op
    }

    /// A niladic function rendered without parentheses.
    pub fn function_id(name: impl Into<String>, kind: Kind, category: FunctionCategory) -> Self {
        let mut op = Self::new(name, kind, Syntax::FunctionId, 100, 100);
        op.function = Some(FunctionMeta {
            category,
            param_names: Vec::new(),
            param_types: Vec::new(),
            return_type: None,
        });
        op.with_operand_range(OperandCountRange::of(0))
    }

    /// Keyword-syntax operator with a custom renderer.
    pub fn special(name: impl Into<String>, kind: Kind) -> Self {
        Self::new(name, kind, Syntax::Special, 100, 100)
    }

    /// Keyword-syntax operator that participates in precedence, e.g.
    /// BETWEEN.
    pub fn special_with_precedence(
        name: impl Into<String>,
        kind: Kind,
        level: Precedence,
    ) -> Self {
        let (l, r) = derive_precedences(level, Associativity::Left);
        Self::new(name, kind, Syntax::Special, l, r)
    }

    pub fn with_operand_range(mut self, range: OperandCountRange) -> Self {
        self.operand_range = Some(range);
        self
    }

    pub fn with_checker(mut self, checker: Arc<dyn OperandTypeChecker>) -> Self {
        self.operand_checker = Some(checker);
        self
    }

    pub fn with_operand_inference(mut self, inference: Arc<dyn OperandTypeInference>) -> Self {
        self.operand_inference = Some(inference);
        self
    }

    pub fn with_return_inference(mut self, inference: Arc<dyn ReturnTypeInference>) -> Self {
        self.return_inference = Some(inference);
        self
    }

    pub fn with_function_meta(mut self, meta: FunctionMeta) -> Self {
        self.function = Some(meta);
        self
    }

    pub fn with_unparser(mut self, unparser: Arc<dyn CallUnparser>) -> Self {
        self.unparser = Some(unparser);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn left_prec(&self) -> Precedence {
        self.left_prec
    }

    pub fn right_prec(&self) -> Precedence {
        self.right_prec
    }

    pub fn function_meta(&self) -> Option<&FunctionMeta> {
        self.function.as_ref()
    }

    pub fn operand_checker(&self) -> Option<&Arc<dyn OperandTypeChecker>> {
        self.operand_checker.as_ref()
    }

    pub fn operand_inference(&self) -> Option<&Arc<dyn OperandTypeInference>> {
        self.operand_inference.as_ref()
    }

    pub fn return_inference(&self) -> Option<&Arc<dyn ReturnTypeInference>> {
        self.return_inference.as_ref()
    }

    /// The acceptable operand counts: an explicit range when supplied,
    /// otherwise the checker's declared range, otherwise the formal
    /// parameter list.
    pub fn operand_count_range(&self) -> OperandCountRange {
        if let Some(range) = self.operand_range {
            return range;
        }
        if let Some(checker) = &self.operand_checker {
            return checker.operand_count_range();
        }
        if let Some(meta) = &self.function {
            if !meta.param_types.is_empty() {
                return OperandCountRange::between(0, meta.param_types.len());
            }
        }
        OperandCountRange::any()
    }

    /// Structural operand-count check, reported before any type checking.
    pub fn validate_operand_count(&self, call: &Call) -> Result<()> {
        let range = self.operand_count_range();
        if range.contains(call.operand_count()) {
            Ok(())
        } else {
            Err(Error::InvalidOperandCount {
                span: call.span,
                operator: self.name.clone(),
                expected: range.to_string(),
                found: call.operand_count(),
            })
        }
    }

    /// Infers the call's result type, delegating to the strategy object or
    /// the declared return type of a user-defined routine.
    pub fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        if let Some(inference) = &self.return_inference {
            return inference.clone().infer_return_type(binding);
        }
        if let Some(meta) = &self.function
            && let Some(ty) = &meta.return_type
        {
            return Ok(ty.clone());
        }
        Err(Error::Internal(format!(
            "operator {} lacks return-type inference",
            self.name
        )))
    }

    /// Builds a call node over this operator.
    pub fn create_call(self: &Arc<Self>, operands: Vec<Node>, span: Span) -> Node {
        Node::Call(Call::new(Arc::clone(self), operands, span))
    }

    /// Renders a call. The custom unparser wins when installed; otherwise
    /// the syntax category decides the shape.
    pub fn unparse_call(
        &self,
        writer: &mut SqlWriter<'_>,
        call: &Call,
        left_prec: Precedence,
        right_prec: Precedence,
    ) {
        if let Some(unparser) = &self.unparser {
            let unparser = Arc::clone(unparser);
            unparser.unparse_call(writer, call, left_prec, right_prec);
            return;
        }
        match self.syntax {
            Syntax::Infix => {
                writer.unparse(call.operand(0), left_prec, self.left_prec);
                writer.token(&self.name);
                writer.unparse(call.operand(1), self.right_prec, right_prec);
            }
            Syntax::Prefix => {
                writer.token(&self.name);
                writer.unparse(call.operand(0), self.right_prec, right_prec);
            }
            Syntax::Postfix => {
                writer.unparse(call.operand(0), left_prec, self.left_prec);
                writer.token(&self.name);
            }
            Syntax::FunctionId if call.operand_count() == 0 => {
                writer.token(&self.name);
            }
            Syntax::Function | Syntax::FunctionId | Syntax::Special => {
                writer.token(&self.name);
                writer.open_call();
                if let Some(q) = call.quantifier() {
                    writer.keyword(&q.to_string());
                }
                for (i, operand) in call.operands().iter().enumerate() {
                    if i > 0 {
                        writer.comma();
                    }
                    writer.unparse(operand, 0, 0);
                }
                writer.close_paren();
            }
        }
    }
}
