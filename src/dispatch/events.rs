//! Event Output Aggregator: drains per-block outgoing events from the performer's free-event
//! output endpoints into an internal FIFO for asynchronous delivery to the host.

use super::fifo::EventFifo;
use super::performer::{EndpointHandle, Performer};

/// Drains every free-event-output endpoint's per-block events into one time-ordered queue for
/// asynchronous delivery to the host.
pub struct EventOutputAggregator {
    fifo: EventFifo,
    /// Free-event-output endpoints only; MIDI-out is delivered synchronously by the render loop
    /// and audio-out is copied directly, so neither passes through here.
    endpoints: Vec<EndpointHandle>,
}

impl EventOutputAggregator {
    pub fn new(capacity: usize, endpoints: Vec<EndpointHandle>) -> Self {
        EventOutputAggregator {
            fifo: EventFifo::new(capacity),
            endpoints,
        }
    }

    /// Drain every event-output endpoint's pending events from `performer`, tagging each with
    /// `time + frame_offset`. Returns `false` if any enqueue failed (the FIFO was full), logging
    /// a `warn!` for each dropped event before returning.
    pub fn post_output_events<P: Performer + ?Sized>(&mut self, performer: &mut P, time: u64) -> bool {
        let mut all_enqueued = true;
        for &endpoint in &self.endpoints {
            let fifo = &mut self.fifo;
            performer.iterate_output_events(endpoint, &mut |frame_offset, value| {
                let absolute_time = time + frame_offset as u64;
                if !fifo.push(endpoint, absolute_time, value) {
                    log::warn!(
                        "event output dropped for endpoint {:?}: output FIFO is full",
                        endpoint
                    );
                    all_enqueued = false;
                }
            });
        }
        all_enqueued
    }

    /// Drain every queued output event to the host, resolving `endpoint` via `resolve_name`.
    pub fn deliver_pending_events(
        &mut self,
        resolve_name: impl Fn(EndpointHandle) -> String,
        mut callback: impl FnMut(&str, super::value::EventValue),
    ) {
        self.fifo.drain_all(|endpoint, value| {
            callback(&resolve_name(endpoint), value);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::performer::{EndpointFlags, EndpointInfo, FrameType};
    use crate::dispatch::value::EventValue;

    struct StubPerformer {
        info: Vec<EndpointInfo>,
        pending: Vec<(u32, EventValue)>,
    }

    impl Performer for StubPerformer {
        fn endpoints(&self) -> &[EndpointInfo] {
            &self.info
        }
        fn prepare(&mut self, _num_frames: u32) {}
        fn advance(&mut self) {}
        fn set_next_input_stream_frames(&mut self, _endpoint: EndpointHandle, _frames: &[f32]) {}
        fn set_sparse_input_stream_target(&mut self, _endpoint: EndpointHandle, _target: f32, _ramp_frames: u32) {}
        fn add_input_event(&mut self, _endpoint: EndpointHandle, _value: EventValue) {}
        fn set_input_value(&mut self, _endpoint: EndpointHandle, _value: f32) {}
        fn output_stream_frames(&self, _endpoint: EndpointHandle) -> &[f32] {
            &[]
        }
        fn iterate_output_events(
            &mut self,
            _endpoint: EndpointHandle,
            callback: &mut dyn FnMut(u32, EventValue),
        ) {
            for (offset, value) in self.pending.drain(..) {
                callback(offset, value);
            }
        }
    }

    #[test]
    fn drained_events_are_tagged_with_time_plus_frame_offset() {
        let mut performer = StubPerformer {
            info: vec![EndpointInfo {
                handle: EndpointHandle(0),
                name: "freeOut".into(),
                flags: EndpointFlags::OUTPUT | EndpointFlags::EVENT | EndpointFlags::FREE_EVENT,
                frame_type: FrameType::Other,
            }],
            pending: vec![(5, EventValue::Float(1.0)), (10, EventValue::Float(2.0))],
        };

        let mut aggregator = EventOutputAggregator::new(16, vec![EndpointHandle(0)]);
        assert!(aggregator.post_output_events(&mut performer, 1000));

        let mut delivered = vec![];
        aggregator.deliver_pending_events(
            |_| "freeOut".to_string(),
            |name, value| delivered.push((name.to_string(), value)),
        );
        assert_eq!(
            delivered,
            vec![
                ("freeOut".to_string(), EventValue::Float(1.0)),
                ("freeOut".to_string(), EventValue::Float(2.0)),
            ]
        );
    }

    #[test]
    fn overflow_reports_false() {
        let mut performer = StubPerformer {
            info: vec![],
            pending: vec![(0, EventValue::Float(1.0)), (0, EventValue::Float(2.0))],
        };
        let mut aggregator = EventOutputAggregator::new(1, vec![EndpointHandle(0)]);
        assert!(!aggregator.post_output_events(&mut performer, 0));
    }
}
