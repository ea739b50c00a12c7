//! The Pass Driver: runs the three rewriters, each a full post-order walk, over a module in
//! fixed order.

use std::collections::HashSet;

use log::debug;

use crate::ast::{Allocator, Module, NodeId};

use super::elements;
use super::error::ComplexLowerError;
use super::operators;
use super::remap::TypeRemapper;

/// Every node reachable from `roots`, in post-order (children before parents, each node visited
/// once). Computed fresh for each rewriter so that nodes synthesized mid-pass are never
/// revisited within that same pass.
fn post_order(alloc: &Allocator, roots: &[NodeId]) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut visited = HashSet::new();

    fn visit(alloc: &Allocator, id: NodeId, visited: &mut HashSet<NodeId>, order: &mut Vec<NodeId>) {
        if !visited.insert(id) {
            return;
        }
        for child in alloc.get(id).children() {
            visit(alloc, child, visited, order);
        }
        order.push(id);
    }

    for &root in roots {
        visit(alloc, root, &mut visited, &mut order);
    }
    order
}

fn run_operator_rewriter(alloc: &mut Allocator, module: &Module) -> Result<(), ComplexLowerError> {
    for id in post_order(alloc, &module.declarations) {
        log::trace!("operator rewriter: visiting {id:?}");
        operators::visit_node(alloc, id)?;
    }
    Ok(())
}

fn run_element_access_rewriter(
    alloc: &mut Allocator,
    module: &Module,
) -> Result<(), ComplexLowerError> {
    for id in post_order(alloc, &module.declarations) {
        log::trace!("element-access rewriter: visiting {id:?}");
        elements::visit_node(alloc, id)?;
    }
    Ok(())
}

fn run_type_remapper(alloc: &mut Allocator, module: &Module, library: &mut Module) {
    let order = post_order(alloc, &module.declarations);
    let mut remapper = TypeRemapper::new(alloc, library);
    for id in order {
        log::trace!("type remapper: visiting {id:?}");
        remapper.visit_node(id);
    }
}

/// Run the Operator Rewriter, then the Element-Access Rewriter, then the Type Remapper, over
/// every declaration in `module`. New namespace-alias declarations the Type Remapper needs are
/// appended to `library`, which may be the same module as `module` itself.
///
/// The two earlier rewriters can fail (an unsupported unary operator, an illegal binary operator
/// on a complex operand); the Type Remapper cannot fail on its own, since by the time it runs
/// every remaining complex-typed node is a type reference or constant, never an operator.
pub fn lower_module(
    alloc: &mut Allocator,
    module: &Module,
    library: &mut Module,
) -> Result<(), ComplexLowerError> {
    debug!("lowering module '{}': operator rewriter", module.name);
    run_operator_rewriter(alloc, module)?;

    debug!("lowering module '{}': element-access rewriter", module.name);
    run_element_access_rewriter(alloc, module)?;

    debug!("lowering module '{}': type remapper", module.name);
    run_type_remapper(alloc, module, library);

    Ok(())
}
