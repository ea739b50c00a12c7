//! The resolved AST shape the complex-lowering pass (`crate::complex`) consumes and rewrites.
//!
//! This module has no knowledge of parsing or name resolution; it only models the tree shape a
//! resolver would have already produced, plus the arena that owns it.

pub mod arena;
pub mod node;
pub mod types;

pub use arena::{Allocator, NodeId};
pub use node::{
    resolved_type, BinaryOp, ComplexMember, ConstantValue, MetaFunctionKind, Module, Node,
    SourceContext, UnaryOp,
};
pub use types::{Primitive, TypeDescriptor, TypeShape};
