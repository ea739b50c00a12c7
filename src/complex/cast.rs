//! The Cast Synthesizer: `addCastIfRequired`, used by the Operator Rewriter and the
//! Element-Access Rewriter wherever a value must flow into a slot of a different (but
//! compatible) type.

use crate::ast::{Allocator, Node, NodeId, SourceContext, TypeDescriptor};

/// Coerce `expr` (of type `expr_type`) to `target_type`, synthesizing new nodes as needed.
///
/// - If the types already match (ignoring const/reference), `expr` is returned unchanged.
/// - If `expr_type` is complex, the result decomposes `expr` into `expr.real` / `expr.imag` and
///   reconstructs a value of `target_type` from those two components: this is what lets a
///   complex value flow into a differently-specialized complex type.
/// - Otherwise, a plain cast to `target_type` is synthesized.
pub fn add_cast_if_required(
    alloc: &mut Allocator,
    expr: NodeId,
    expr_type: &TypeDescriptor,
    target_type: &TypeDescriptor,
) -> NodeId {
    if expr_type.equals_ignoring_qualifiers(target_type) {
        return expr;
    }

    let context = alloc.get(expr).context().clone();
    let stripped_target = target_type.stripped();

    if expr_type.is_complex() {
        let real = alloc.alloc(Node::DotOperator {
            context: context.clone(),
            object: expr,
            member: "real".to_string(),
        });
        let imag = alloc.alloc(Node::DotOperator {
            context: context.clone(),
            object: expr,
            member: "imag".to_string(),
        });
        let args = alloc.alloc(Node::CommaList {
            context: context.clone(),
            items: vec![real, imag],
        });
        let target_node = alloc.alloc(Node::ConcreteType {
            context: context.clone(),
            ty: stripped_target,
        });
        alloc.alloc(Node::TypeCast {
            context,
            target_type: target_node,
            source: args,
            source_type: Some(expr_type.clone()),
        })
    } else {
        let target_node = alloc.alloc(Node::ConcreteType {
            context: context.clone(),
            ty: stripped_target,
        });
        alloc.alloc(Node::TypeCast {
            context,
            target_type: target_node,
            source: expr,
            source_type: Some(expr_type.clone()),
        })
    }
}

/// Convenience constructor used throughout the pass: a plain context-less placeholder context
/// for synthesized helper sub-expressions that don't have one source location to attribute to.
pub fn synthetic_context() -> SourceContext {
    SourceContext::synthetic()
}
