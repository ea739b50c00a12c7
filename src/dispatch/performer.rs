//! The opaque block-by-block engine this crate wraps, and the endpoint metadata the binding
//! tables classify at `prepare` time.

use bitflags::bitflags;

use super::value::EventValue;

/// An opaque handle addressing one performer port. Stable for the lifetime of a prepared
/// performer; never reused across a `reset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EndpointHandle(pub u32);

bitflags! {
    /// Direction, kind, and role packed into a single mask, mirroring how the underlying
    /// performer describes its own endpoints.
    pub struct EndpointFlags: u16 {
        const INPUT       = 1 << 0;
        const OUTPUT      = 1 << 1;

        const STREAM      = 1 << 2;
        const EVENT       = 1 << 3;
        const VALUE       = 1 << 4;

        const AUDIO       = 1 << 5;
        const MIDI        = 1 << 6;
        const PARAMETER   = 1 << 7;
        const TIMELINE    = 1 << 8;
        const FREE_EVENT  = 1 << 9;
    }
}

/// The frame type declared for a stream endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameType {
    FloatScalar,
    FloatVector(u32),
    Midi,
    Other,
}

/// One performer endpoint's static metadata, as discovered at binding-initialisation time.
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointInfo {
    /// Stable handle used to address this endpoint in every other call.
    pub handle: EndpointHandle,
    /// The performer's name for this endpoint; used to identify reserved timeline endpoints.
    pub name: String,
    /// Direction, kind, and role, packed into one mask.
    pub flags: EndpointFlags,
    /// The declared frame type, for stream endpoints (audio or MIDI).
    pub frame_type: FrameType,
}

impl EndpointInfo {
    pub fn is_input(&self) -> bool {
        self.flags.contains(EndpointFlags::INPUT)
    }

    pub fn is_output(&self) -> bool {
        self.flags.contains(EndpointFlags::OUTPUT)
    }

    pub fn is_stream(&self) -> bool {
        self.flags.contains(EndpointFlags::STREAM)
    }

    pub fn is_event(&self) -> bool {
        self.flags.contains(EndpointFlags::EVENT)
    }

    pub fn is_value(&self) -> bool {
        self.flags.contains(EndpointFlags::VALUE)
    }

    pub fn is_audio(&self) -> bool {
        self.flags.contains(EndpointFlags::AUDIO)
    }

    pub fn is_midi(&self) -> bool {
        self.flags.contains(EndpointFlags::MIDI)
    }

    pub fn is_parameter(&self) -> bool {
        self.flags.contains(EndpointFlags::PARAMETER)
    }

    pub fn is_timeline(&self) -> bool {
        self.flags.contains(EndpointFlags::TIMELINE)
    }

    pub fn is_free_event(&self) -> bool {
        self.flags.contains(EndpointFlags::FREE_EVENT)
    }

    /// The declared vector width of a stream endpoint's frame type; `1` for a scalar.
    pub fn channel_count(&self) -> Option<u32> {
        match self.frame_type {
            FrameType::FloatScalar => Some(1),
            FrameType::FloatVector(n) => Some(n),
            _ => None,
        }
    }
}

/// The block-by-block engine the dispatch core drives. Implementors own the actual DSP graph;
/// this crate never inspects it beyond this contract.
///
/// None of these methods may block, allocate, or panic on the realtime path once `prepare` (the
/// binding-initialisation call, not [`Performer::prepare`] itself) has returned to the caller of
/// [`crate::dispatch::render::DispatchCore::prepare`].
pub trait Performer {
    fn endpoints(&self) -> &[EndpointInfo];

    /// Declare that the next [`Performer::advance`] call will process `num_frames` frames.
    fn prepare(&mut self, num_frames: u32);

    /// Run the chunk declared by the most recent `prepare` call.
    fn advance(&mut self);

    fn set_next_input_stream_frames(&mut self, endpoint: EndpointHandle, frames: &[f32]);

    fn set_sparse_input_stream_target(&mut self, endpoint: EndpointHandle, target: f32, ramp_frames: u32);

    fn add_input_event(&mut self, endpoint: EndpointHandle, value: EventValue);

    fn set_input_value(&mut self, endpoint: EndpointHandle, value: f32);

    /// The frames produced by the most recent `advance` for a stream-output endpoint, interleaved
    /// if the endpoint's frame type is a vector.
    fn output_stream_frames(&self, endpoint: EndpointHandle) -> &[f32];

    /// Drain every event-output emitted during the most recent `advance` for `endpoint`, calling
    /// `callback(frame_offset, value)` once per event in emission order.
    fn iterate_output_events(
        &mut self,
        endpoint: EndpointHandle,
        callback: &mut dyn FnMut(u32, EventValue),
    );
}
