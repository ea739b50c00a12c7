//! Audio buffers and the endpoint bindings that move samples between a caller's channel-major
//! buffers and the performer's (possibly interleaved, vector-frame) stream endpoints.
//!
//! `Inputs`/`Outputs` are borrowed safe slices rather than raw pointers: this crate owns both
//! ends of the call (no FFI boundary to cross), so there is no need for unsafe buffer access.

use super::performer::{EndpointHandle, FrameType, Performer};

/// Channel-major input audio, one slice per channel, all the same length.
pub struct Inputs<'a> {
    channels: Vec<&'a [f32]>,
}

impl<'a> Inputs<'a> {
    pub fn new(channels: Vec<&'a [f32]>) -> Self {
        Inputs { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn get(&self, i: usize) -> &'a [f32] {
        self.channels[i]
    }

    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// A sub-view over `[start, start + len)` of every channel. Used by the chunking wrapper to
    /// hand each sub-render exactly its slice of a caller-supplied buffer larger than the
    /// negotiated block size; not part of the steady-state render path.
    pub fn slice(&self, start: usize, len: usize) -> Inputs<'a> {
        Inputs {
            channels: self.channels.iter().map(|c| &c[start..start + len]).collect(),
        }
    }
}

/// Channel-major output audio, one mutable slice per channel, all the same length.
pub struct Outputs<'a> {
    channels: Vec<&'a mut [f32]>,
}

impl<'a> Outputs<'a> {
    pub fn new(channels: Vec<&'a mut [f32]>) -> Self {
        Outputs { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn get_mut(&mut self, i: usize) -> &mut [f32] {
        self.channels[i]
    }

    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// A mutable sub-view over `[start, start + len)` of every channel. See [`Inputs::slice`].
    pub fn slice(&mut self, start: usize, len: usize) -> Outputs<'_> {
        Outputs {
            channels: self.channels.iter_mut().map(|c| &mut c[start..start + len]).collect(),
        }
    }
}

/// `{ endpoint, startChannelIndex, numChannels, scratch interleaved buffer }`. The scratch
/// buffer is present iff `numChannels > 1`: the performer's vector-frame stream endpoints expect
/// interleaved samples, so a multi-channel caller buffer must be interleaved into it first.
pub struct AudioInputBinding {
    pub endpoint: EndpointHandle,
    pub start_channel_index: usize,
    pub num_channels: u32,
    scratch: Option<Vec<f32>>,
}

impl AudioInputBinding {
    pub fn new(endpoint: EndpointHandle, start_channel_index: usize, num_channels: u32, max_block_size: usize) -> Self {
        let scratch = (num_channels > 1).then(|| vec![0.0f32; max_block_size * num_channels as usize]);
        AudioInputBinding {
            endpoint,
            start_channel_index,
            num_channels,
            scratch,
        }
    }

    /// Feed this binding's channel range of `input`, starting at caller-frame `frame_offset` for
    /// `n` frames, to `performer`'s stream endpoint.
    pub fn feed<P: Performer + ?Sized>(&mut self, performer: &mut P, input: &Inputs, frame_offset: usize, n: usize) {
        if self.num_channels == 1 {
            let channel = input.get(self.start_channel_index);
            performer.set_next_input_stream_frames(self.endpoint, &channel[frame_offset..frame_offset + n]);
            return;
        }

        let scratch = self
            .scratch
            .as_mut()
            .expect("multi-channel binding always allocates scratch");
        for frame in 0..n {
            for ch in 0..self.num_channels as usize {
                let channel = input.get(self.start_channel_index + ch);
                scratch[frame * self.num_channels as usize + ch] = channel[frame_offset + frame];
            }
        }
        performer.set_next_input_stream_frames(self.endpoint, &scratch[..n * self.num_channels as usize]);
    }
}

/// `{ endpoint, startChannelIndex, numChannels }`.
pub struct AudioOutputBinding {
    pub endpoint: EndpointHandle,
    pub start_channel_index: usize,
    pub num_channels: u32,
}

impl AudioOutputBinding {
    pub fn new(endpoint: EndpointHandle, start_channel_index: usize, num_channels: u32) -> Self {
        AudioOutputBinding {
            endpoint,
            start_channel_index,
            num_channels,
        }
    }

    /// Copy the `n` frames the performer just produced into `output`'s channel range, starting
    /// at caller-frame `frame_offset`.
    pub fn copy<P: Performer + ?Sized>(&self, performer: &P, output: &mut Outputs, frame_offset: usize, n: usize) {
        let produced = performer.output_stream_frames(self.endpoint);

        if self.num_channels == 1 {
            let channel = output.get_mut(self.start_channel_index);
            channel[frame_offset..frame_offset + n].copy_from_slice(&produced[..n]);
            return;
        }

        for frame in 0..n {
            for ch in 0..self.num_channels as usize {
                let sample = produced[frame * self.num_channels as usize + ch];
                output.get_mut(self.start_channel_index + ch)[frame_offset + frame] = sample;
            }
        }
    }
}

/// Asserted at binding initialisation: an audio endpoint's declared frame type must be a float
/// scalar or a vector of floats, and the caller-provided channel count must match (1 for a
/// scalar, the vector width otherwise).
pub fn channel_count_matches(frame_type: FrameType, num_channels: u32) -> bool {
    match frame_type {
        FrameType::FloatScalar => num_channels == 1,
        FrameType::FloatVector(width) => num_channels == width,
        _ => false,
    }
}
