//! Binding initialisation and the render loop: the two halves that turn a bare
//! [`Performer`] into something a host can hand audio, MIDI, and parameter changes to.

use super::buffer::{channel_count_matches, AudioInputBinding, AudioOutputBinding, Inputs, Outputs};
use super::error::DispatchError;
use super::events::EventOutputAggregator;
use super::fifo::{ChunkEvent, EventFifo};
use super::midi::MidiEvent;
use super::parameter::{ParameterBinding, ParameterList};
use super::performer::{EndpointHandle, EndpointInfo, FrameType, Performer};
use super::timeline::TimelineSender;
use super::value::EventValue;

/// A stream-kind parameter endpoint ramps its target over this many frames. Chosen to match the
/// smoothing window real hosts commonly request for control-rate parameters.
const DEFAULT_PARAMETER_RAMP_FRAMES: u32 = 256;

/// Configuration fixed at [`DispatchCore::prepare`] time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// The largest chunk the performer is ever asked to `advance` in one call. A `render` call
    /// larger than this is split by the chunking wrapper.
    pub max_internal_block_size: u32,
    /// Capacity of the input event FIFO (audio-input feeding aside; see [`super::buffer`]).
    pub input_fifo_capacity: usize,
    /// Capacity of the [`super::events::EventOutputAggregator`]'s internal FIFO.
    pub output_fifo_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            max_internal_block_size: 512,
            input_fifo_capacity: 4096,
            output_fifo_capacity: 4096,
        }
    }
}

/// Binds a performer's endpoints to concrete audio channels, parameter indices, and timeline
/// fields, then drives it block-by-block. Everything reachable from [`DispatchCore::render`] is
/// realtime-safe; [`DispatchCore::prepare`] is not and should be called off the audio thread.
pub struct DispatchCore<P: Performer> {
    performer: P,
    endpoints: Vec<EndpointInfo>,
    max_block_size: u32,

    audio_inputs: Vec<AudioInputBinding>,
    audio_outputs: Vec<AudioOutputBinding>,
    midi_in_endpoint: Option<EndpointHandle>,
    midi_out_endpoint: Option<EndpointHandle>,

    parameters: ParameterList,
    timeline: TimelineSender,
    event_outputs: EventOutputAggregator,

    input_fifo: EventFifo,
    total_frames_rendered: u64,
}

impl<P: Performer> DispatchCore<P> {
    /// Binding initialisation: enumerate the performer's endpoints, classify each by its
    /// flags, assign audio channel ranges in declaration order, and assert that every audio
    /// endpoint's frame type is a float scalar or a vector of floats.
    pub fn prepare(mut performer: P, caller_max_block_size: u32, config: RenderConfig) -> Result<Self, DispatchError> {
        let max_block_size = caller_max_block_size.min(config.max_internal_block_size).max(1);
        log::debug!("preparing dispatch core: negotiated block size {max_block_size}");

        let endpoints: Vec<EndpointInfo> = performer.endpoints().to_vec();

        let mut audio_inputs = Vec::new();
        let mut audio_outputs = Vec::new();
        let mut midi_in_endpoint = None;
        let mut midi_out_endpoint = None;
        let mut parameter_bindings = Vec::new();
        let mut free_event_outputs = Vec::new();
        let mut time_signature_endpoint = None;
        let mut tempo_endpoint = None;
        let mut transport_state_endpoint = None;
        let mut position_endpoint = None;

        let mut next_input_channel = 0usize;
        let mut next_output_channel = 0usize;

        for info in &endpoints {
            if info.is_audio() {
                let num_channels = info.channel_count().unwrap_or(0);
                if num_channels == 0 || !channel_count_matches(info.frame_type, num_channels) {
                    return Err(DispatchError::ChannelCountMismatch {
                        endpoint: info.handle,
                        frame_type: info.frame_type,
                        requested_channels: num_channels,
                    });
                }
                if info.is_input() {
                    audio_inputs.push(AudioInputBinding::new(
                        info.handle,
                        next_input_channel,
                        num_channels,
                        max_block_size as usize,
                    ));
                    next_input_channel += num_channels as usize;
                } else if info.is_output() {
                    audio_outputs.push(AudioOutputBinding::new(info.handle, next_output_channel, num_channels));
                    next_output_channel += num_channels as usize;
                }
            } else if info.is_midi() {
                if info.is_input() {
                    midi_in_endpoint = Some(info.handle);
                } else if info.is_output() {
                    midi_out_endpoint = Some(info.handle);
                }
            } else if info.is_parameter() {
                let ramp_frames = if info.is_stream() { DEFAULT_PARAMETER_RAMP_FRAMES } else { 0 };
                parameter_bindings.push(ParameterBinding { endpoint: info.handle, ramp_frames });
            } else if info.is_timeline() {
                match info.name.as_str() {
                    "timeSignature" => time_signature_endpoint = Some(info.handle),
                    "tempo" => tempo_endpoint = Some(info.handle),
                    "transportState" => transport_state_endpoint = Some(info.handle),
                    "position" => position_endpoint = Some(info.handle),
                    _ => {}
                }
            } else if info.is_free_event() {
                free_event_outputs.push(info.handle);
            }
        }

        Ok(DispatchCore {
            performer,
            endpoints,
            max_block_size,
            audio_inputs,
            audio_outputs,
            midi_in_endpoint,
            midi_out_endpoint,
            parameters: ParameterList::new(parameter_bindings),
            timeline: TimelineSender::new(
                time_signature_endpoint,
                tempo_endpoint,
                transport_state_endpoint,
                position_endpoint,
            ),
            event_outputs: EventOutputAggregator::new(config.output_fifo_capacity, free_event_outputs),
            input_fifo: EventFifo::new(config.input_fifo_capacity),
            total_frames_rendered: 0,
        })
    }

    pub fn parameters(&self) -> &ParameterList {
        &self.parameters
    }

    pub fn timeline(&mut self) -> &mut TimelineSender {
        &mut self.timeline
    }

    pub fn event_outputs(&mut self) -> &mut EventOutputAggregator {
        &mut self.event_outputs
    }

    pub fn total_frames_rendered(&self) -> u64 {
        self.total_frames_rendered
    }

    pub fn max_block_size(&self) -> u32 {
        self.max_block_size
    }

    /// The bound performer, for diagnostics or host-specific introspection the dispatch core
    /// itself doesn't expose.
    pub fn performer(&self) -> &P {
        &self.performer
    }

    /// Render `output.frames()` frames, consuming `input` and `midi_in` and appending any
    /// generated MIDI to `midi_out`. Delegates to the chunking wrapper when the call is larger
    /// than the negotiated block size; otherwise renders the whole call as one pass through
    /// [`EventFifo::iterate_chunks`].
    pub fn render(&mut self, input: &Inputs, output: &mut Outputs, midi_in: &[MidiEvent], midi_out: &mut Vec<MidiEvent>) {
        let num_frames = output.frames() as u32;
        debug_assert!(
            input.is_empty() || input.frames() == output.frames(),
            "render: input.frames() ({}) must equal output.frames() ({}) when audio inputs are bound",
            input.frames(),
            output.frames()
        );
        debug_assert!(self.max_block_size != 0, "render: negotiated max_block_size must be nonzero");
        if num_frames > self.max_block_size {
            super::chunking::render_in_chunks(self, input, output, midi_in, midi_out);
            return;
        }
        self.render_block(input, output, midi_in, midi_out, num_frames);
    }

    pub(crate) fn render_block(
        &mut self,
        input: &Inputs,
        output: &mut Outputs,
        midi_in: &[MidiEvent],
        midi_out: &mut Vec<MidiEvent>,
        num_frames: u32,
    ) {
        let start_time = self.total_frames_rendered;

        for binding in self.audio_inputs.iter_mut() {
            binding.feed(&mut self.performer, input, 0, num_frames as usize);
        }

        if let Some(midi_ep) = self.midi_in_endpoint {
            for event in midi_in {
                let time = start_time + event.frame_index as u64;
                if !self.input_fifo.push(midi_ep, time, EventValue::Midi(*event)) {
                    log::warn!("midi input dropped: input FIFO is full");
                }
            }
        }

        self.parameters.flush(&mut self.input_fifo, start_time);
        self.timeline.flush(&mut self.input_fifo, start_time);

        let max_block_size = self.max_block_size;
        let mut frames_done = 0u32;

        let input_fifo = &mut self.input_fifo;
        let performer = &mut self.performer;
        let endpoints = &self.endpoints;
        let audio_outputs = &self.audio_outputs;
        let midi_out_endpoint = self.midi_out_endpoint;
        let event_outputs = &mut self.event_outputs;

        input_fifo.iterate_chunks(start_time, num_frames, max_block_size, |event| match event {
            ChunkEvent::Begin(n) => performer.prepare(n),
            ChunkEvent::Input(endpoint, _, value) => deliver_value_to_endpoint(performer, endpoints, endpoint, value),
            ChunkEvent::End(n) => {
                performer.advance();

                for binding in audio_outputs {
                    binding.copy(performer, output, frames_done as usize, n as usize);
                }

                if let Some(midi_ep) = midi_out_endpoint {
                    performer.iterate_output_events(midi_ep, &mut |frame_offset, value| {
                        if let EventValue::Midi(mut ev) = value {
                            ev.frame_index = frames_done + frame_offset;
                            midi_out.push(ev);
                        }
                    });
                }

                event_outputs.post_output_events(performer, start_time + frames_done as u64);
                frames_done += n;
            }
        });

        self.total_frames_rendered += frames_done as u64;
    }
}

/// Dispatches a single queued value to its endpoint according to the endpoint's kind: a stream
/// endpoint takes a ramp or a held constant, a value endpoint takes a plain float, anything else
/// is a discrete input event.
fn deliver_value_to_endpoint<P: Performer + ?Sized>(
    performer: &mut P,
    endpoints: &[EndpointInfo],
    endpoint: EndpointHandle,
    value: EventValue,
) {
    let info = endpoints.iter().find(|e| e.handle == endpoint);

    if info.map_or(false, EndpointInfo::is_stream) {
        match value {
            EventValue::Ramp(ramp) => performer.set_sparse_input_stream_target(endpoint, ramp.target, ramp.ramp_frames),
            EventValue::Float(v) => performer.set_next_input_stream_frames(endpoint, &[v]),
            _ => {}
        }
    } else if info.map_or(false, EndpointInfo::is_value) {
        if let EventValue::Float(v) = value {
            performer.set_input_value(endpoint, v);
        }
    } else {
        performer.add_input_event(endpoint, value);
    }
}
