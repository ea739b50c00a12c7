#![deny(missing_docs, unused_imports)]

//! Two coupled pieces of a domain-specific audio programming language toolchain.
//!
//! # Complex-number lowering ([`complex`])
//!
//! A compiler pass that rewrites a resolved AST so every primitive use of a complex-number type
//! becomes a call against, or a member access on, a library struct-based complex type. Run
//! [`complex::lower_module`] once per module, after name resolution and before codegen.
//!
//! ```no_run
//! use complex_dispatch_core::ast::{Allocator, Module};
//! use complex_dispatch_core::complex::lower_module;
//!
//! fn lower(alloc: &mut Allocator, module: &Module, library: &mut Module) {
//!     lower_module(alloc, module, library).expect("lowering failed");
//! }
//! ```
//!
//! # Realtime dispatch core ([`dispatch`])
//!
//! A realtime-safe wrapper that drives an opaque, block-by-block [`dispatch::Performer`]: binding
//! tables map its endpoints to audio channels, parameters, MIDI, and timeline fields, and
//! [`dispatch::DispatchCore::render`] pumps it forward one render call at a time, chunking
//! internally to honor a negotiated maximum block size and to keep mid-block events aligned to
//! sample-accurate boundaries.

#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;

pub mod ast;
pub mod complex;
pub mod dispatch;

pub mod prelude;
