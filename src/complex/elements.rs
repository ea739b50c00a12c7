//! The Element-Access Rewriter: assignment, return, cast, and indexed-read rewriting for
//! complex-typed vectors and arrays. Runs after the Operator Rewriter, so operator expressions
//! on its input are already calls.

use crate::ast::{resolved_type, Allocator, Node, NodeId, SourceContext};

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

/// Rewrite one node in place: vector-element assignment becomes `setElement`, indexed reads on a
/// complex-typed vector become `getElement`, and assignment/return/cast sources are coerced to
/// their destination type first.
pub fn visit_node(alloc: &mut Allocator, id: NodeId) -> Result<(), ComplexLowerError> {
    let node = alloc.get(id).clone();

    match node {
        Node::Assignment {
            context,
            target,
            value,
            assigned_type,
        } => {
            let Some(ty) = assigned_type.clone() else {
                return Ok(());
            };
            if !requires_remapping(&ty) {
                return Ok(());
            }

            let value_ty = resolved_type(alloc, value).unwrap_or_else(|| ty.clone());
            let coerced_value = add_cast_if_required(alloc, value, &value_ty, &ty);

            if let Node::ArrayElementRef {
                object,
                object_type: Some(object_ty),
                index,
                ..
            } = alloc.get(target).clone()
            {
                if object_ty.is_vector() {
                    let call_node = call(
                        alloc,
                        context,
                        "setElement",
                        vec![object, index, coerced_value],
                    );
                    let replacement = alloc.get(call_node).clone();
                    alloc.set(id, replacement);
                    return Ok(());
                }
            }

            alloc.set(
                id,
                Node::Assignment {
                    context,
                    target,
                    value: coerced_value,
                    assigned_type: Some(ty),
                },
            );
        }

        Node::ReturnStatement {
            context,
            value: Some(value),
            function_return_type: Some(ret_ty),
        } => {
            if requires_remapping(&ret_ty) {
                let value_ty = resolved_type(alloc, value).unwrap_or_else(|| ret_ty.clone());
                let coerced = add_cast_if_required(alloc, value, &value_ty, &ret_ty);
                alloc.set(
                    id,
                    Node::ReturnStatement {
                        context,
                        value: Some(coerced),
                        function_return_type: Some(ret_ty),
                    },
                );
            }
        }

        Node::TypeCast {
            context,
            target_type,
            source,
            source_type: Some(source_ty),
        } => {
            let target_ty = match alloc.get(target_type) {
                Node::ConcreteType { ty, .. } => Some(ty.clone()),
                _ => None,
            };
            if let Some(target_ty) = target_ty {
                if requires_remapping(&target_ty) && requires_remapping(&source_ty) {
                    let coerced = add_cast_if_required(alloc, source, &source_ty, &target_ty);
                    alloc.set(
                        id,
                        Node::TypeCast {
                            context,
                            target_type,
                            source: coerced,
                            source_type: Some(source_ty),
                        },
                    );
                }
            }
        }

        Node::ArrayElementRef {
            context,
            object,
            object_type: Some(object_ty),
            index,
            element_type: Some(elem_ty),
            is_slice,
            slice_end,
        } => {
            if !is_slice && slice_end.is_none() && requires_remapping(&elem_ty) && object_ty.is_vector()
            {
                let call_node = call(alloc, context, "getElement", vec![object, index]);
                let replacement = alloc.get(call_node).clone();
                alloc.set(id, replacement);
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

    fn vector_complex_ref(alloc: &mut Allocator) -> (NodeId, NodeId, NodeId) {
        let vector = alloc.alloc(Node::QualifiedIdentifier {
            context: SourceContext::synthetic(),
            path: vec!["v".into()],
        });
        let index = alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Int(2),
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
        (vector, index, elem_ref)
    }

    #[test]
    fn indexed_read_of_complex_vector_becomes_get_element() {
        let mut alloc = Allocator::new();
        let (vector, index, elem_ref) = vector_complex_ref(&mut alloc);

        visit_node(&mut alloc, elem_ref).unwrap();

        match alloc.get(elem_ref) {
            Node::CallOrCast { target, args, .. } => {
                assert_eq!(args, &vec![vector, index]);
                match alloc.get(*target) {
                    Node::QualifiedIdentifier { path, .. } => {
                        assert_eq!(path, &vec!["getElement".to_string()])
                    }
                    other => panic!("expected identifier, got {other:?}"),
                }
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn indexed_read_of_complex_array_is_untouched() {
        let mut alloc = Allocator::new();
        let object = alloc.alloc(Node::QualifiedIdentifier {
            context: SourceContext::synthetic(),
            path: vec!["a".into()],
        });
        let index = alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Int(2),
        });
        let elem_ref = alloc.alloc(Node::ArrayElementRef {
            context: SourceContext::synthetic(),
            object,
            object_type: Some(TypeDescriptor::array(
                TypeDescriptor::primitive(Primitive::Complex32),
                8,
            )),
            index,
            slice_end: None,
            is_slice: false,
            element_type: Some(TypeDescriptor::primitive(Primitive::Complex32)),
        });

        visit_node(&mut alloc, elem_ref).unwrap();
        assert!(matches!(alloc.get(elem_ref), Node::ArrayElementRef { .. }));
    }

    #[test]
    fn assignment_into_complex_vector_element_becomes_set_element() {
        let mut alloc = Allocator::new();
        let (vector, index, elem_ref) = vector_complex_ref(&mut alloc);
        let value = alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Complex32 {
                real: 1.0,
                imag: 2.0,
            },
        });
        let assign = alloc.alloc(Node::Assignment {
            context: SourceContext::synthetic(),
            target: elem_ref,
            value,
            assigned_type: Some(TypeDescriptor::primitive(Primitive::Complex32)),
        });

        visit_node(&mut alloc, assign).unwrap();

        match alloc.get(assign) {
            Node::CallOrCast { target, args, .. } => {
                assert_eq!(args, &vec![vector, index, value]);
                match alloc.get(*target) {
                    Node::QualifiedIdentifier { path, .. } => {
                        assert_eq!(path, &vec!["setElement".to_string()])
                    }
                    other => panic!("expected identifier, got {other:?}"),
                }
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn assignment_coerces_a_mismatched_rhs_precision() {
        let mut alloc = Allocator::new();
        let target = alloc.alloc(Node::QualifiedIdentifier {
            context: SourceContext::synthetic(),
            path: vec!["x".into()],
        });
        let value = alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Complex32 {
                real: 1.0,
                imag: 2.0,
            },
        });
        let assign = alloc.alloc(Node::Assignment {
            context: SourceContext::synthetic(),
            target,
            value,
            assigned_type: Some(TypeDescriptor::primitive(Primitive::Complex64)),
        });

        visit_node(&mut alloc, assign).unwrap();

        match alloc.get(assign) {
            Node::Assignment { value, .. } => {
                assert!(matches!(alloc.get(*value), Node::TypeCast { .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn return_of_complex_value_is_coerced() {
        let mut alloc = Allocator::new();
        let value = alloc.alloc(Node::Constant {
            context: SourceContext::synthetic(),
            value: ConstantValue::Complex32 {
                real: 1.0,
                imag: 0.0,
            },
        });
        let ret = alloc.alloc(Node::ReturnStatement {
            context: SourceContext::synthetic(),
            value: Some(value),
            function_return_type: Some(TypeDescriptor::primitive(Primitive::Complex64)),
        });

        visit_node(&mut alloc, ret).unwrap();

        match alloc.get(ret) {
            Node::ReturnStatement { value: Some(v), .. } => {
                assert!(matches!(alloc.get(*v), Node::TypeCast { .. }));
            }
            other => panic!("expected return statement, got {other:?}"),
        }
    }
}
