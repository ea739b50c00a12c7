//! Timeline Event Sender: buffers pending transport/tempo/time-signature/position updates and
//! emits them on the next flush. An endpoint missing at binding time makes applying that kind a
//! no-op, since there is nowhere to deliver it.

use super::fifo::EventFifo;
use super::performer::EndpointHandle;
use super::value::{EventValue, Position, TimeSignature, TransportState};

#[derive(Default)]
struct Pending {
    time_signature: bool,
    tempo: bool,
    transport_state: bool,
    position: bool,
}

/// The cached timeline state plus the four independent pending flags. `apply_*` updates the
/// cache and sets the flag (or does nothing, if the corresponding endpoint was never bound);
/// `flush` drains every set flag into the input FIFO.
pub struct TimelineSender {
    time_signature_endpoint: Option<EndpointHandle>,
    tempo_endpoint: Option<EndpointHandle>,
    transport_state_endpoint: Option<EndpointHandle>,
    position_endpoint: Option<EndpointHandle>,

    time_signature: TimeSignature,
    tempo: f64,
    transport_state: TransportState,
    position: Position,

    pending: Pending,
}

impl TimelineSender {
    pub fn new(
        time_signature_endpoint: Option<EndpointHandle>,
        tempo_endpoint: Option<EndpointHandle>,
        transport_state_endpoint: Option<EndpointHandle>,
        position_endpoint: Option<EndpointHandle>,
    ) -> Self {
        TimelineSender {
            time_signature_endpoint,
            tempo_endpoint,
            transport_state_endpoint,
            position_endpoint,
            time_signature: TimeSignature { numerator: 4, denominator: 4 },
            tempo: 120.0,
            transport_state: TransportState::Stopped,
            position: Position {
                current_frame: 0,
                current_quarter_note: 0.0,
                last_bar_start_quarter_note: 0.0,
            },
            pending: Pending::default(),
        }
    }

    pub fn apply_time_signature(&mut self, value: TimeSignature) {
        if self.time_signature_endpoint.is_none() {
            return;
        }
        self.time_signature = value;
        self.pending.time_signature = true;
    }

    pub fn apply_tempo(&mut self, value: f64) {
        if self.tempo_endpoint.is_none() {
            return;
        }
        self.tempo = value;
        self.pending.tempo = true;
    }

    pub fn apply_transport_state(&mut self, value: TransportState) {
        if self.transport_state_endpoint.is_none() {
            return;
        }
        self.transport_state = value;
        self.pending.transport_state = true;
    }

    pub fn apply_position(&mut self, value: Position) {
        if self.position_endpoint.is_none() {
            return;
        }
        self.position = value;
        self.pending.position = true;
    }

    /// Emit every pending change at `time`, and clear the flags regardless of whether the FIFO
    /// had room (a dropped timeline event is not retried).
    pub fn flush(&mut self, fifo: &mut EventFifo, time: u64) {
        if self.pending.time_signature {
            self.pending.time_signature = false;
            let endpoint = self.time_signature_endpoint.expect("flag only set when bound");
            if !fifo.push(endpoint, time, EventValue::TimeSignature(self.time_signature)) {
                log::warn!("timeline flush dropped a time-signature event: input FIFO is full");
            }
        }
        if self.pending.tempo {
            self.pending.tempo = false;
            let endpoint = self.tempo_endpoint.expect("flag only set when bound");
            if !fifo.push(endpoint, time, EventValue::Tempo(self.tempo)) {
                log::warn!("timeline flush dropped a tempo event: input FIFO is full");
            }
        }
        if self.pending.transport_state {
            self.pending.transport_state = false;
            let endpoint = self.transport_state_endpoint.expect("flag only set when bound");
            if !fifo.push(endpoint, time, EventValue::TransportState(self.transport_state)) {
                log::warn!("timeline flush dropped a transport-state event: input FIFO is full");
            }
        }
        if self.pending.position {
            self.pending.position = false;
            let endpoint = self.position_endpoint.expect("flag only set when bound");
            if !fifo.push(endpoint, time, EventValue::Position(self.position)) {
                log::warn!("timeline flush dropped a position event: input FIFO is full");
            }
        }
    }
}
