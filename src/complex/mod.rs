//! The complex-number lowering pass: rewrites a resolved AST so every complex-typed primitive use
//! becomes a call against, or member access on, a library struct-based complex type.
//!
//! Run [`lower_module`] once per module, after name resolution and before codegen. The three
//! rewriters it drives — [`operators`], [`elements`], [`remap`] — run in that fixed order; see
//! [`pass`] for the driver itself.

pub mod cast;
pub mod classify;
pub mod elements;
pub mod error;
pub mod operators;
pub mod pass;
pub mod remap;

pub use classify::requires_remapping;
pub use error::ComplexLowerError;
pub use pass::lower_module;
pub use remap::TypeRemapper;
