//! The Operator Rewriter: turns resolved unary/binary operators and complex member references
//! into unresolved calls, ready for the Element-Access Rewriter to see.

use crate::ast::{resolved_type, Allocator, BinaryOp, ComplexMember, Node, NodeId, SourceContext, UnaryOp};

use super::cast::add_cast_if_required;
use super::classify::requires_remapping;
use super::error::ComplexLowerError;

fn call(alloc: &mut Allocator, context: SourceContext, name: &str, args: Vec<NodeId>) -> NodeId {
    let target = alloc.alloc(Node::QualifiedIdentifier {
        context: context.clone(),
        path: vec![name.to_string()],
    });
    alloc.alloc(Node::CallOrCast {
        context,
        target,
        args,
    })
}

/// Rewrite the single node at `id`. Assumes children have already been visited (the pass
/// driver's generic walk guarantees post-order traversal).
pub fn visit_node(alloc: &mut Allocator, id: NodeId) -> Result<(), ComplexLowerError> {
    let node = alloc.get(id).clone();

    match node {
        Node::ComplexMemberRef {
            context,
            object,
            member,
        } => {
            // `a[b].real` promotes to `a.real[b]`; anything else becomes a plain dot-operator
            // for the resolver to bind against the struct field.
            if let Node::ArrayElementRef {
                context: idx_context,
                object: vector,
                index,
                slice_end,
                is_slice,
                object_type,
                element_type,
            } = alloc.get(object).clone()
            {
                let promoted_dot = alloc.alloc(Node::DotOperator {
                    context: context.clone(),
                    object: vector,
                    member: member.field_name().to_string(),
                });
                alloc.set(
                    id,
                    Node::ArrayElementRef {
                        context: idx_context,
                        object: promoted_dot,
                        object_type,
                        index,
                        slice_end,
                        is_slice,
                        element_type,
                    },
                );
            } else {
                alloc.set(
                    id,
                    Node::DotOperator {
                        context,
                        object,
                        member: member.field_name().to_string(),
                    },
                );
            }
        }

        Node::UnaryOperator {
            context,
            op,
            operand,
            result_type,
        } => {
            if let Some(ty) = &result_type {
                if requires_remapping(ty) {
                    if op != UnaryOp::Negate {
                        return Err(ComplexLowerError::UnsupportedUnaryOnComplex {
                            context,
                            op,
                        });
                    }
                    let call_node = call(alloc, context, "negate", vec![operand]);
                    let replacement = alloc.get(call_node).clone();
                    alloc.set(id, replacement);
                }
            }
        }

        Node::BinaryOperator {
            context,
            op,
            lhs,
            rhs,
            operand_type,
        } => {
            if let Some(ty) = &operand_type {
                if requires_remapping(ty) {
                    let Some(name) = op.complex_function_name() else {
                        return Err(ComplexLowerError::IllegalBinaryOnComplex { context });
                    };
                    let lhs_ty = resolved_type(alloc, lhs).unwrap_or_else(|| ty.clone());
                    let rhs_ty = resolved_type(alloc, rhs).unwrap_or_else(|| ty.clone());
                    let lhs_cast = add_cast_if_required(alloc, lhs, &lhs_ty, ty);
                    let rhs_cast = add_cast_if_required(alloc, rhs, &rhs_ty, ty);
                    let call_node = call(alloc, context, name, vec![lhs_cast, rhs_cast]);
                    let replacement = alloc.get(call_node).clone();
                    alloc.set(id, replacement);
                }
            }
        }

        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ConstantValue, Primitive, TypeDescriptor};

    fn complex_leaf(alloc: &mut Allocator) -> NodeId {
        alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Complex32 {
                real: 0.0,
                imag: 0.0,
            },
        })
    }

    #[test]
    fn binary_add_on_complex_becomes_call() {
        let mut alloc = Allocator::new();
        let lhs = complex_leaf(&mut alloc);
        let rhs = complex_leaf(&mut alloc);
        let ty = TypeDescriptor::primitive(Primitive::Complex32);
        let id = alloc.alloc(Node::BinaryOperator {
            context: SourceContext::synthetic(),
            op: BinaryOp::Add,
            lhs,
            rhs,
            operand_type: Some(ty),
        });

        visit_node(&mut alloc, id).unwrap();

        match alloc.get(id) {
            Node::CallOrCast { target, args, .. } => {
                assert_eq!(args.len(), 2);
                match alloc.get(*target) {
                    Node::QualifiedIdentifier { path, .. } => {
                        assert_eq!(path, &vec!["add".to_string()])
                    }
                    other => panic!("expected identifier, got {other:?}"),
                }
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn binary_add_with_mismatched_operand_precision_casts_the_narrower_side() {
        let mut alloc = Allocator::new();
        let lhs = alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Complex32 {
                real: 1.0,
                imag: 0.0,
            },
        });
        let rhs = alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Complex64 {
                real: 2.0,
                imag: 0.0,
            },
        });
        let ty = TypeDescriptor::primitive(Primitive::Complex64);
        let id = alloc.alloc(Node::BinaryOperator {
            context: SourceContext::synthetic(),
            op: BinaryOp::Add,
            lhs,
            rhs,
            operand_type: Some(ty),
        });

        visit_node(&mut alloc, id).unwrap();

        match alloc.get(id) {
            Node::CallOrCast { args, .. } => {
                assert!(matches!(alloc.get(args[0]), Node::TypeCast { .. }));
                assert_eq!(args[1], rhs);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn unary_negate_on_complex_becomes_call() {
        let mut alloc = Allocator::new();
        let operand = complex_leaf(&mut alloc);
        let ty = TypeDescriptor::primitive(Primitive::Complex64);
        let id = alloc.alloc(Node::UnaryOperator {
            context: SourceContext::synthetic(),
            op: UnaryOp::Negate,
            operand,
            result_type: Some(ty),
        });

        visit_node(&mut alloc, id).unwrap();

        match alloc.get(id) {
            Node::CallOrCast { target, args, .. } => {
                assert_eq!(args, &vec![operand]);
                match alloc.get(*target) {
                    Node::QualifiedIdentifier { path, .. } => {
                        assert_eq!(path, &vec!["negate".to_string()])
                    }
                    other => panic!("expected identifier, got {other:?}"),
                }
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn unary_non_negate_on_complex_is_an_error() {
        let mut alloc = Allocator::new();
        let operand = complex_leaf(&mut alloc);
        let ty = TypeDescriptor::primitive(Primitive::Complex32);
        let id = alloc.alloc(Node::UnaryOperator {
            context: SourceContext::synthetic(),
            op: UnaryOp::LogicalNot,
            operand,
            result_type: Some(ty),
        });

        let err = visit_node(&mut alloc, id).unwrap_err();
        assert!(matches!(
            err,
            ComplexLowerError::UnsupportedUnaryOnComplex { .. }
        ));
    }

    #[test]
    fn binary_modulo_on_complex_is_an_error() {
        let mut alloc = Allocator::new();
        let lhs = complex_leaf(&mut alloc);
        let rhs = complex_leaf(&mut alloc);
        let ty = TypeDescriptor::primitive(Primitive::Complex32);
        let id = alloc.alloc(Node::BinaryOperator {
            context: SourceContext::synthetic(),
            op: BinaryOp::Modulo,
            lhs,
            rhs,
            operand_type: Some(ty),
        });

        let err = visit_node(&mut alloc, id).unwrap_err();
        assert!(matches!(
            err,
            ComplexLowerError::IllegalBinaryOnComplex { .. }
        ));
    }

    #[test]
    fn non_complex_binary_operator_is_untouched() {
        let mut alloc = Allocator::new();
        let lhs = alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Float32(1.0),
        });
        let rhs = alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Float32(2.0),
        });
        let ty = TypeDescriptor::primitive(Primitive::Float32);
        let id = alloc.alloc(Node::BinaryOperator {
            context: SourceContext::synthetic(),
            op: BinaryOp::Add,
            lhs,
            rhs,
            operand_type: Some(ty),
        });

        visit_node(&mut alloc, id).unwrap();
        assert!(matches!(alloc.get(id), Node::BinaryOperator { .. }));
    }

    #[test]
    fn complex_member_ref_through_index_is_promoted() {
        let mut alloc = Allocator::new();
        let vector = alloc.alloc(Node::QualifiedIdentifier {
            context: SourceContext::synthetic(),
            path: vec!["a".into()],
        });
        let index = alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Int(3),
        });
        let elem_ref = alloc.alloc(Node::ArrayElementRef {
            context: SourceContext::synthetic(),
            object: vector,
            object_type: Some(TypeDescriptor::vector(Primitive::Complex32, 4)),
            index,
            slice_end: None,
            is_slice: false,
            element_type: Some(TypeDescriptor::primitive(Primitive::Complex32)),
        });
        let member_ref = alloc.alloc(Node::ComplexMemberRef {
            context: SourceContext::synthetic(),
            object: elem_ref,
            member: ComplexMember::Real,
        });

        visit_node(&mut alloc, member_ref).unwrap();

        match alloc.get(member_ref) {
            Node::ArrayElementRef { object, .. } => match alloc.get(*object) {
                Node::DotOperator { object, member, .. } => {
                    assert_eq!(object, &vector);
                    assert_eq!(member, "real");
                }
                other => panic!("expected dot operator, got {other:?}"),
            },
            other => panic!("expected array element ref, got {other:?}"),
        }
    }
}
