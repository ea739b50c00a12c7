//! The tagged-variant AST node type the complex-lowering pass rewrites.

use std::fmt;
use std::rc::Rc;

use super::arena::{Allocator, NodeId};
use super::types::{Primitive, TypeDescriptor, TypeShape};

/// Where a node came from, for error reporting. Cheap to clone: synthesized nodes usually copy
/// the context of the expression they were derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceContext {
    pub file: Rc<str>,
    pub line: u32,
    pub column: u32,
}

impl SourceContext {
    pub fn new(file: impl Into<Rc<str>>, line: u32, column: u32) -> Self {
        SourceContext {
            file: file.into(),
            line,
            column,
        }
    }

    /// A placeholder context for nodes synthesized with no single attributable source location.
    pub fn synthetic() -> Self {
        SourceContext::new("<synthesized>", 0, 0)
    }
}

impl fmt::Display for SourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// `obj.real` vs `obj.imag`, pre-resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComplexMember {
    Real,
    Imag,
}

impl ComplexMember {
    pub fn field_name(self) -> &'static str {
        match self {
            ComplexMember::Real => "real",
            ComplexMember::Imag => "imag",
        }
    }
}

/// A prefix unary operator. Only [`UnaryOp::Negate`] is legal on a complex-typed operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Negate,
    /// `!x`
    LogicalNot,
    /// `~x`
    BitwiseNot,
    /// `++x`
    PreIncrement,
    /// `--x`
    PreDecrement,
}

/// An infix binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`
    Divide,
    /// `a == b`
    Equals,
    /// `a != b`
    NotEquals,
    /// `a % b`
    Modulo,
    /// `a < b`
    LessThan,
    /// `a <= b`
    LessEqual,
    /// `a > b`
    GreaterThan,
    /// `a >= b`
    GreaterEqual,
    /// `a && b`
    LogicalAnd,
    /// `a || b`
    LogicalOr,
    /// `a & b`
    BitwiseAnd,
    /// `a | b`
    BitwiseOr,
    /// `a ^ b`
    BitwiseXor,
}

impl BinaryOp {
    /// The unqualified function name the Operator Rewriter calls for this operator, if this
    /// operator is one of the six complex-valued operations the language library supports.
    pub fn complex_function_name(self) -> Option<&'static str> {
        match self {
            BinaryOp::Add => Some("add"),
            BinaryOp::Subtract => Some("subtract"),
            BinaryOp::Multiply => Some("multiply"),
            BinaryOp::Divide => Some("divide"),
            BinaryOp::Equals => Some("equals"),
            BinaryOp::NotEquals => Some("notEquals"),
            _ => None,
        }
    }
}

/// Which synthetic wrapper the Type Remapper applies around a remapped value expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetaFunctionKind {
    /// Wraps an lvalue so it is passed by reference.
    MakeReference,
    /// Wraps an rvalue so it is treated as a compile-time constant.
    MakeConst,
}

/// A numeric or composite constant, pre- or post-decomposition.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    Int(i64),
    Float32(f32),
    Float64(f64),
    Complex32 { real: f32, imag: f32 },
    Complex64 { real: f64, imag: f64 },
    Vector(Vec<ConstantValue>),
}

impl ConstantValue {
    /// The type a literal of this shape evaluates to. `None` for an empty vector literal, which
    /// carries no element type to infer from.
    pub fn inferred_type(&self) -> Option<TypeDescriptor> {
        match self {
            ConstantValue::Int(_) => Some(TypeDescriptor::primitive(Primitive::Int64)),
            ConstantValue::Float32(_) => Some(TypeDescriptor::primitive(Primitive::Float32)),
            ConstantValue::Float64(_) => Some(TypeDescriptor::primitive(Primitive::Float64)),
            ConstantValue::Complex32 { .. } => Some(TypeDescriptor::primitive(Primitive::Complex32)),
            ConstantValue::Complex64 { .. } => Some(TypeDescriptor::primitive(Primitive::Complex64)),
            ConstantValue::Vector(items) => {
                let element = items.first()?.inferred_type()?;
                match element.shape {
                    TypeShape::Primitive(p) => Some(TypeDescriptor::vector(p, items.len() as u32)),
                    _ => None,
                }
            }
        }
    }
}

/// One node of the resolved AST. Every variant carries a [`SourceContext`]. Child references are
/// [`NodeId`]s into the owning [`super::arena::Allocator`]; the arena never frees nodes, so an
/// id remains valid for the lifetime of the pass even after the node at that id is overwritten.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// An unqualified or qualified name, e.g. `add` or `soul::complex_lib32_4::ComplexType`.
    QualifiedIdentifier {
        context: SourceContext,
        path: Vec<String>,
    },
    /// A type written out in source position (a cast target, a declared variable type, ...).
    ConcreteType {
        context: SourceContext,
        ty: TypeDescriptor,
    },
    /// A comma-separated argument list, e.g. inside a constructor-style cast.
    CommaList {
        context: SourceContext,
        items: Vec<NodeId>,
    },
    /// A function call, or (once rewritten) a type-constructor call. Always unresolved: name
    /// binding happens in a later pass.
    CallOrCast {
        context: SourceContext,
        target: NodeId,
        args: Vec<NodeId>,
    },
    /// `object.member`.
    DotOperator {
        context: SourceContext,
        object: NodeId,
        member: String,
    },
    /// `object[index]`, or `object[index..sliceEnd]` when `is_slice`.
    ArrayElementRef {
        context: SourceContext,
        object: NodeId,
        object_type: Option<TypeDescriptor>,
        index: NodeId,
        slice_end: Option<NodeId>,
        is_slice: bool,
        element_type: Option<TypeDescriptor>,
    },
    /// `object.real` / `object.imag`, before the Operator Rewriter turns it into a plain
    /// [`Node::DotOperator`] (or promotes it outside an index).
    ComplexMemberRef {
        context: SourceContext,
        object: NodeId,
        member: ComplexMember,
    },
    /// A resolved type-cast expression. `source` may itself be a [`Node::CommaList`] (a
    /// constructor-style cast with several arguments) or a single expression.
    TypeCast {
        context: SourceContext,
        target_type: NodeId,
        source: NodeId,
        source_type: Option<TypeDescriptor>,
    },
    Constant {
        context: SourceContext,
        value: ConstantValue,
    },
    UnaryOperator {
        context: SourceContext,
        op: UnaryOp,
        operand: NodeId,
        result_type: Option<TypeDescriptor>,
    },
    BinaryOperator {
        context: SourceContext,
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
        operand_type: Option<TypeDescriptor>,
    },
    Assignment {
        context: SourceContext,
        target: NodeId,
        value: NodeId,
        assigned_type: Option<TypeDescriptor>,
    },
    ReturnStatement {
        context: SourceContext,
        value: Option<NodeId>,
        function_return_type: Option<TypeDescriptor>,
    },
    StructDecl {
        context: SourceContext,
        name: String,
        members: Vec<NodeId>,
        layout_changed: bool,
    },
    /// `namespace name = target::namespace(typeArgs...)`.
    NamespaceAliasDecl {
        context: SourceContext,
        name: String,
        target_namespace: Vec<String>,
        type_args: Vec<NodeId>,
    },
    /// `makeReference(T)` / `makeConst(T)`.
    MetaFunctionApply {
        context: SourceContext,
        kind: MetaFunctionKind,
        arg: NodeId,
    },
    /// `base[index]` used as a type expression, e.g. `ComplexType[4]`.
    Subscript {
        context: SourceContext,
        base: NodeId,
        index: NodeId,
    },
}

impl Node {
    pub fn context(&self) -> &SourceContext {
        match self {
            Node::QualifiedIdentifier { context, .. }
            | Node::ConcreteType { context, .. }
            | Node::CommaList { context, .. }
            | Node::CallOrCast { context, .. }
            | Node::DotOperator { context, .. }
            | Node::ArrayElementRef { context, .. }
            | Node::ComplexMemberRef { context, .. }
            | Node::TypeCast { context, .. }
            | Node::Constant { context, .. }
            | Node::UnaryOperator { context, .. }
            | Node::BinaryOperator { context, .. }
            | Node::Assignment { context, .. }
            | Node::ReturnStatement { context, .. }
            | Node::StructDecl { context, .. }
            | Node::NamespaceAliasDecl { context, .. }
            | Node::MetaFunctionApply { context, .. }
            | Node::Subscript { context, .. } => context,
        }
    }

    /// Direct child node ids, for the generic post-order walk the pass driver uses. Order
    /// matches evaluation order where one is defined.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Node::QualifiedIdentifier { .. }
            | Node::ConcreteType { .. }
            | Node::Constant { .. } => vec![],
            Node::CommaList { items, .. } => items.clone(),
            Node::CallOrCast { target, args, .. } => {
                let mut v = vec![*target];
                v.extend(args);
                v
            }
            Node::DotOperator { object, .. } => vec![*object],
            Node::ArrayElementRef {
                object,
                index,
                slice_end,
                ..
            } => {
                let mut v = vec![*object, *index];
                if let Some(e) = slice_end {
                    v.push(*e);
                }
                v
            }
            Node::ComplexMemberRef { object, .. } => vec![*object],
            Node::TypeCast {
                target_type, source, ..
            } => vec![*target_type, *source],
            Node::UnaryOperator { operand, .. } => vec![*operand],
            Node::BinaryOperator { lhs, rhs, .. } => vec![*lhs, *rhs],
            Node::Assignment { target, value, .. } => vec![*target, *value],
            Node::ReturnStatement { value, .. } => value.iter().copied().collect(),
            Node::StructDecl { members, .. } => members.clone(),
            Node::NamespaceAliasDecl { type_args, .. } => type_args.clone(),
            Node::MetaFunctionApply { arg, .. } => vec![*arg],
            Node::Subscript { base, index, .. } => vec![*base, *index],
        }
    }
}

/// The type of the expression at `id`, where it can be determined from the node itself without a
/// symbol table. Used wherever a caller holds a node's *destination* type (an operator's operand
/// type, an assignment's target type, a function's return type) and also needs that expression's
/// own type to decide whether a coercion is actually a no-op. Returns `None` for node kinds with
/// no intrinsic type of their own, e.g. a bare identifier in this unresolved-symbols model.
pub fn resolved_type(alloc: &Allocator, id: NodeId) -> Option<TypeDescriptor> {
    match alloc.get(id) {
        Node::Constant { value, .. } => value.inferred_type(),
        Node::ArrayElementRef { element_type, .. } => element_type.clone(),
        Node::UnaryOperator { result_type, .. } => result_type.clone(),
        Node::BinaryOperator { operand_type, .. } => operand_type.clone(),
        Node::Assignment { assigned_type, .. } => assigned_type.clone(),
        Node::TypeCast { target_type, .. } => match alloc.get(*target_type) {
            Node::ConcreteType { ty, .. } => Some(ty.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// A scope owning declarations, including the mutable namespace-alias list the Type Remapper
/// appends to.
#[derive(Debug, Default)]
pub struct Module {
    pub name: String,
    pub declarations: Vec<NodeId>,
    pub namespace_aliases: Vec<NodeId>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            declarations: Vec::new(),
            namespace_aliases: Vec::new(),
        }
    }
}
