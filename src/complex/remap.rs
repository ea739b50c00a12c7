//! The Type Remapper: the final of the three rewriters, replacing every complex type node with
//! a reference into a generated, precision/width-specialized namespace.

use std::collections::HashSet;

use crate::ast::{
    Allocator, ConstantValue, MetaFunctionKind, Module, Node, NodeId, SourceContext,
    TypeDescriptor,
};

fn alias_name(bits: u8, vector_size: u32) -> String {
    format!("complex_lib{bits}_{vector_size}")
}

/// Decompose a complex constant into its real and imaginary halves, at the same width. Returns
/// `None` for anything that isn't (a vector of) complex values.
fn decompose_constant(value: &ConstantValue) -> Option<(u8, u32, ConstantValue, ConstantValue)> {
    match value {
        ConstantValue::Complex32 { real, imag } => {
            Some((32, 1, ConstantValue::Float32(*real), ConstantValue::Float32(*imag)))
        }
        ConstantValue::Complex64 { real, imag } => {
            Some((64, 1, ConstantValue::Float64(*real), ConstantValue::Float64(*imag)))
        }
        ConstantValue::Vector(items) if !items.is_empty() => {
            let mut bits = None;
            let mut reals = Vec::with_capacity(items.len());
            let mut imags = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    ConstantValue::Complex32 { real, imag } => {
                        bits.get_or_insert(32u8);
                        reals.push(ConstantValue::Float32(*real));
                        imags.push(ConstantValue::Float32(*imag));
                    }
                    ConstantValue::Complex64 { real, imag } => {
                        bits.get_or_insert(64u8);
                        reals.push(ConstantValue::Float64(*real));
                        imags.push(ConstantValue::Float64(*imag));
                    }
                    _ => return None,
                }
            }
            Some((
                bits?,
                items.len() as u32,
                ConstantValue::Vector(reals),
                ConstantValue::Vector(imags),
            ))
        }
        _ => None,
    }
}

/// Holds the per-pass-run remapper state: the library module new aliases are appended to, and
/// the set of concrete-type nodes rewritten so far this run (consulted when a struct declaration
/// is visited, to decide whether its layout changed).
pub struct TypeRemapper<'a> {
    alloc: &'a mut Allocator,
    library: &'a mut Module,
    remapped_members: HashSet<NodeId>,
}

impl<'a> TypeRemapper<'a> {
    pub fn new(alloc: &'a mut Allocator, library: &'a mut Module) -> Self {
        TypeRemapper {
            alloc,
            library,
            remapped_members: HashSet::new(),
        }
    }

    fn find_or_create_alias(&mut self, bits: u8, vector_size: u32, context: &SourceContext) -> String {
        let name = alias_name(bits, vector_size);
        let exists = self.library.namespace_aliases.iter().any(|id| {
            matches!(self.alloc.get(*id), Node::NamespaceAliasDecl { name: n, .. } if n == &name)
        });
        if !exists {
            log::debug!("materializing complex specialization alias {name}");
            let float_name = if bits == 32 { "float32" } else { "float64" };
            let float_arg = self.alloc.alloc(Node::QualifiedIdentifier {
                context: context.clone(),
                path: vec![float_name.to_string()],
            });
            let size_arg = self.alloc.alloc(Node::Constant {
                context: context.clone(),
                value: ConstantValue::Int(vector_size as i64),
            });
            let decl_id = self.alloc.alloc(Node::NamespaceAliasDecl {
                context: context.clone(),
                name: name.clone(),
                target_namespace: vec!["soul".to_string(), "complex_lib".to_string()],
                type_args: vec![float_arg, size_arg],
            });
            self.library.namespace_aliases.push(decl_id);
        }
        name
    }

    /// Build the `soul::complex_lib{bits}_{vectorSize}::ComplexType` expression tree for `ty`,
    /// wrapped (in fixed order: subscript, then reference, then const) as `ty`'s qualifiers
    /// require.
    fn build_type_expr(&mut self, ty: &TypeDescriptor, context: &SourceContext) -> NodeId {
        let (bits, vector_size) = ty
            .remap_key()
            .expect("build_type_expr called on a type that does not require remapping");
        let alias = self.find_or_create_alias(bits, vector_size, context);

        let mut expr = self.alloc.alloc(Node::QualifiedIdentifier {
            context: context.clone(),
            path: vec![alias, "ComplexType".to_string()],
        });

        if let Some(length) = ty.array_length() {
            let len_node = self.alloc.alloc(Node::Constant {
                context: context.clone(),
                value: ConstantValue::Int(length as i64),
            });
            expr = self.alloc.alloc(Node::Subscript {
                context: context.clone(),
                base: expr,
                index: len_node,
            });
        }
        if ty.is_reference {
            expr = self.alloc.alloc(Node::MetaFunctionApply {
                context: context.clone(),
                kind: MetaFunctionKind::MakeReference,
                arg: expr,
            });
        }
        if ty.is_const {
            expr = self.alloc.alloc(Node::MetaFunctionApply {
                context: context.clone(),
                kind: MetaFunctionKind::MakeConst,
                arg: expr,
            });
        }
        expr
    }

    /// Rewrite the single node at `id`. Like the other two rewriters, assumes a post-order walk.
    pub fn visit_node(&mut self, id: NodeId) {
        let node = self.alloc.get(id).clone();

        match node {
            Node::ConcreteType { context, ty } => {
                if ty.remap_key().is_some() {
                    let expr = self.build_type_expr(&ty, &context);
                    let replacement = self.alloc.get(expr).clone();
                    self.alloc.set(id, replacement);
                    self.remapped_members.insert(id);
                }
            }

            Node::TypeCast {
                context,
                target_type,
                source,
                source_type,
            } => {
                // The target-type child was already visited (post-order): if it required
                // remapping it is no longer a ConcreteType node.
                let target_was_remapped = !matches!(self.alloc.get(target_type), Node::ConcreteType { .. });
                if !target_was_remapped {
                    return;
                }

                let args = if let Node::CommaList { items, .. } = self.alloc.get(source).clone() {
                    items
                } else {
                    let zero_imag = self.alloc.alloc(Node::Constant {
                        context: context.clone(),
                        value: ConstantValue::Int(0),
                    });
                    vec![source, zero_imag]
                };
                let _ = source_type;

                let call_node = self.alloc.alloc(Node::CallOrCast {
                    context,
                    target: target_type,
                    args,
                });
                let replacement = self.alloc.get(call_node).clone();
                self.alloc.set(id, replacement);
            }

            Node::Constant { context, value } => {
                if let Some((bits, vector_size, real_value, imag_value)) = decompose_constant(&value)
                {
                    let alias = self.find_or_create_alias(bits, vector_size, &context);
                    let target = self.alloc.alloc(Node::QualifiedIdentifier {
                        context: context.clone(),
                        path: vec![alias, "ComplexType".to_string()],
                    });
                    let real_node = self.alloc.alloc(Node::Constant {
                        context: context.clone(),
                        value: real_value,
                    });
                    let imag_node = self.alloc.alloc(Node::Constant {
                        context: context.clone(),
                        value: imag_value,
                    });
                    self.alloc.set(
                        id,
                        Node::CallOrCast {
                            context,
                            target,
                            args: vec![real_node, imag_node],
                        },
                    );
                }
            }

            Node::StructDecl {
                context,
                name,
                members,
                layout_changed,
            } => {
                let changed = layout_changed || members.iter().any(|m| self.remapped_members.contains(m));
                if changed != layout_changed {
                    self.alloc.set(
                        id,
                        Node::StructDecl {
                            context,
                            name,
                            members,
                            layout_changed: changed,
                        },
                    );
                }
            }

            _ => {}
        }
    }
}
