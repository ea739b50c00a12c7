//! A collection of commonly used items

#[doc(no_inline)]
pub use crate::ast::{Allocator, Module, Node, NodeId};
#[doc(no_inline)]
pub use crate::complex::{lower_module, ComplexLowerError};
#[doc(no_inline)]
pub use crate::dispatch::{
    DispatchCore, DispatchError, EndpointFlags, EndpointHandle, EventValue, MidiEvent, Performer,
    RenderConfig,
};
