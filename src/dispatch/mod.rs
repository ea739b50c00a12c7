//! Realtime audio/MIDI/parameter dispatch core: a realtime-safe wrapper driving an opaque
//! [`performer::Performer`] block-by-block.

pub mod buffer;
pub mod chunking;
pub mod error;
pub mod events;
pub mod fifo;
pub mod midi;
pub mod parameter;
pub mod performer;
pub mod render;
pub mod timeline;
pub mod value;

pub use buffer::{channel_count_matches, AudioInputBinding, AudioOutputBinding, Inputs, Outputs};
pub use error::DispatchError;
pub use events::EventOutputAggregator;
pub use fifo::{ChunkEvent, EventFifo};
pub use midi::{MidiEvent, MidiEventInputList};
pub use parameter::{ParameterBinding, ParameterList};
pub use performer::{EndpointFlags, EndpointHandle, EndpointInfo, FrameType, Performer};
pub use render::{DispatchCore, RenderConfig};
pub use timeline::TimelineSender;
pub use value::{EventValue, Position, RampHolder, TimeSignature, TransportState};
