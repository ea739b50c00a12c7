//! The value vocabulary that flows through the input/output FIFOs: plain samples, ramped
//! parameter targets, MIDI messages, and the structured timeline values.

use super::midi::MidiEvent;

/// A sparse stream-target write: ramp to `target` over `ramp_frames` frames. The repository this
/// is modeled on recognizes this by the class name `_RampHolder` on a structured value; here it
/// is simply a variant of [`EventValue`], which is the more direct way to express the same
/// discriminated write in Rust.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RampHolder {
    pub ramp_frames: u32,
    pub target: f32,
}

/// A musical time signature, `numerator / denominator`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSignature {
    /// Beats per bar.
    pub numerator: u32,
    /// Note value of one beat (4 = quarter note).
    pub denominator: u32,
}

/// The host transport's play state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    /// Not advancing.
    Stopped,
    /// Advancing, not recording.
    Playing,
    /// Advancing and recording.
    Recording,
}

/// A point on the host's timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    /// Absolute sample position since the transport's origin.
    pub current_frame: i64,
    /// Position in quarter notes since the transport's origin.
    pub current_quarter_note: f64,
    /// The quarter-note position of the start of the current bar.
    pub last_bar_start_quarter_note: f64,
}

/// Any value the dispatch core can carry through its multi-endpoint FIFOs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventValue {
    Float(f32),
    Ramp(RampHolder),
    Midi(MidiEvent),
    TimeSignature(TimeSignature),
    Tempo(f64),
    TransportState(TransportState),
    Position(Position),
}
