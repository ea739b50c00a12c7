//! End-to-end scenarios for the complex-number lowering pass, run through [`lower_module`] rather
//! than against the individual rewriters.

use complex_dispatch_core::ast::{
    Allocator, BinaryOp, ConstantValue, Module, Node, Primitive, SourceContext, TypeDescriptor,
};
use complex_dispatch_core::complex::lower_module;

fn ctx() -> SourceContext {
    SourceContext::synthetic()
}

fn alias_name(alloc: &Allocator, library: &Module, index: usize) -> String {
    match alloc.get(library.namespace_aliases[index]) {
        Node::NamespaceAliasDecl { name, .. } => name.clone(),
        other => panic!("expected alias decl, got {other:?}"),
    }
}

/// A.1 — `x + y` on two `complex32` operands becomes `add(x, y)`, and the scalar specialization
/// alias `complex_lib32_1` is materialized.
#[test]
fn scalar_complex_add_becomes_a_named_call_with_a_scalar_alias() {
    let mut alloc = Allocator::new();
    let ty = TypeDescriptor::primitive(Primitive::Complex32);

    let x = alloc.alloc(Node::QualifiedIdentifier { context: ctx(), path: vec!["x".into()] });
    let y = alloc.alloc(Node::QualifiedIdentifier { context: ctx(), path: vec!["y".into()] });
    let add = alloc.alloc(Node::BinaryOperator {
        context: ctx(),
        op: BinaryOp::Add,
        lhs: x,
        rhs: y,
        operand_type: Some(ty),
    });

    let mut module = Module::new("test");
    module.declarations.push(add);
    let mut library = Module::new("soul");

    lower_module(&mut alloc, &module, &mut library).unwrap();

    match alloc.get(add) {
        Node::CallOrCast { target, args, .. } => {
            assert_eq!(args, &vec![x, y]);
            match alloc.get(*target) {
                Node::QualifiedIdentifier { path, .. } => assert_eq!(path, &vec!["add".to_string()]),
                other => panic!("expected identifier, got {other:?}"),
            }
        }
        other => panic!("expected call, got {other:?}"),
    }
    assert_eq!(library.namespace_aliases.len(), 1);
    assert_eq!(alias_name(&alloc, &library, 0), "complex_lib32_1");
}

/// A.2 — `v[2]` on a `vector<complex32, 4>` becomes `getElement(v, 2)`, with alias
/// `complex_lib32_4`.
#[test]
fn indexed_read_of_a_complex32_vector_becomes_get_element_with_a_width_four_alias() {
    let mut alloc = Allocator::new();
    let v = alloc.alloc(Node::QualifiedIdentifier { context: ctx(), path: vec!["v".into()] });
    let index = alloc.alloc(Node::Constant { context: ctx(), value: ConstantValue::Int(2) });
    let elem_ref = alloc.alloc(Node::ArrayElementRef {
        context: ctx(),
        object: v,
        object_type: Some(TypeDescriptor::vector(Primitive::Complex32, 4)),
        index,
        slice_end: None,
        is_slice: false,
        element_type: Some(TypeDescriptor::primitive(Primitive::Complex32)),
    });

    let mut module = Module::new("test");
    module.declarations.push(elem_ref);
    let mut library = Module::new("soul");

    lower_module(&mut alloc, &module, &mut library).unwrap();

    match alloc.get(elem_ref) {
        Node::CallOrCast { target, args, .. } => {
            assert_eq!(args, &vec![v, index]);
            match alloc.get(*target) {
                Node::QualifiedIdentifier { path, .. } => assert_eq!(path, &vec!["getElement".to_string()]),
                other => panic!("expected identifier, got {other:?}"),
            }
        }
        other => panic!("expected call, got {other:?}"),
    }
    assert_eq!(alias_name(&alloc, &library, 0), "complex_lib32_4");
}

/// A.3 — `v[2] = c` on a `vector<complex64, 4>` becomes `setElement(v, 2, c)`, with alias
/// `complex_lib64_4`.
#[test]
fn assignment_into_a_complex64_vector_element_becomes_set_element_with_a_width_four_alias() {
    let mut alloc = Allocator::new();
    let ty = TypeDescriptor::vector(Primitive::Complex64, 4);

    let v = alloc.alloc(Node::QualifiedIdentifier { context: ctx(), path: vec!["v".into()] });
    let index = alloc.alloc(Node::Constant { context: ctx(), value: ConstantValue::Int(2) });
    let elem_ref = alloc.alloc(Node::ArrayElementRef {
        context: ctx(),
        object: v,
        object_type: Some(ty.clone()),
        index,
        slice_end: None,
        is_slice: false,
        element_type: Some(TypeDescriptor::primitive(Primitive::Complex64)),
    });
    let c = alloc.alloc(Node::QualifiedIdentifier { context: ctx(), path: vec!["c".into()] });
    let assign = alloc.alloc(Node::Assignment {
        context: ctx(),
        target: elem_ref,
        value: c,
        assigned_type: Some(TypeDescriptor::primitive(Primitive::Complex64)),
    });

    let mut module = Module::new("test");
    module.declarations.push(assign);
    let mut library = Module::new("soul");

    lower_module(&mut alloc, &module, &mut library).unwrap();

    match alloc.get(assign) {
        Node::CallOrCast { target, args, .. } => {
            assert_eq!(args, &vec![v, index, c]);
            match alloc.get(*target) {
                Node::QualifiedIdentifier { path, .. } => assert_eq!(path, &vec!["setElement".to_string()]),
                other => panic!("expected identifier, got {other:?}"),
            }
        }
        other => panic!("expected call, got {other:?}"),
    }
    assert_eq!(alias_name(&alloc, &library, 0), "complex_lib64_4");
}

/// A.4 — the constant `complex32(1.5, -2.0)` decomposes into a call against the scalar alias's
/// `ComplexType`, with two plain float arguments.
#[test]
fn a_complex32_constant_decomposes_into_a_call_with_float_args() {
    let mut alloc = Allocator::new();
    let id = alloc.alloc(Node::Constant {
        context: ctx(),
        value: ConstantValue::Complex32 { real: 1.5, imag: -2.0 },
    });

    let mut module = Module::new("test");
    module.declarations.push(id);
    let mut library = Module::new("soul");

    lower_module(&mut alloc, &module, &mut library).unwrap();

    match alloc.get(id) {
        Node::CallOrCast { target, args, .. } => {
            assert_eq!(args.len(), 2);
            match alloc.get(*target) {
                Node::QualifiedIdentifier { path, .. } => {
                    assert_eq!(path, &vec!["complex_lib32_1".to_string(), "ComplexType".to_string()]);
                }
                other => panic!("expected identifier, got {other:?}"),
            }
            assert!(matches!(
                alloc.get(args[0]),
                Node::Constant { value: ConstantValue::Float32(r), .. } if *r == 1.5
            ));
            assert!(matches!(
                alloc.get(args[1]),
                Node::Constant { value: ConstantValue::Float32(i), .. } if *i == -2.0
            ));
        }
        other => panic!("expected call, got {other:?}"),
    }
}
