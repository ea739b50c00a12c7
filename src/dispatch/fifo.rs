//! The multi-endpoint FIFO: a time-ordered queue of `(endpoint, time, value)` triples, with the
//! chunked-iteration scheme the render loop uses to drive the performer block-by-block.

use std::collections::VecDeque;

use super::performer::EndpointHandle;
use super::value::EventValue;

struct QueuedEvent {
    endpoint: EndpointHandle,
    time: u64,
    value: EventValue,
}

/// A bounded, time-ordered queue of pending events. `push` fails (returns `false`) once the
/// queue is at capacity — the realtime-safe way to report overflow without allocating.
pub struct EventFifo {
    capacity: usize,
    queue: VecDeque<QueuedEvent>,
}

impl EventFifo {
    pub fn new(capacity: usize) -> Self {
        EventFifo {
            capacity,
            queue: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, endpoint: EndpointHandle, time: u64, value: EventValue) -> bool {
        if self.queue.len() >= self.capacity {
            return false;
        }
        self.queue.push_back(QueuedEvent { endpoint, time, value });
        true
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drain every queued event in FIFO order, calling `callback(endpoint, value)` for each.
    pub fn drain_all(&mut self, mut callback: impl FnMut(EndpointHandle, EventValue)) {
        while let Some(ev) = self.queue.pop_front() {
            callback(ev.endpoint, ev.value);
        }
    }

    /// Partition `[start_time, start_time + total_size)` into sub-intervals no larger than
    /// `max_chunk`, further cut so that no queued event with `time` inside `[start_time,
    /// start_time + total_size)` falls strictly inside a sub-interval. For each sub-interval,
    /// calls `step(ChunkEvent::Begin(n))`, then `step(ChunkEvent::Input(..))` for every queued
    /// event whose `time` lies exactly at the sub-interval's starting boundary (removing it from
    /// the queue, in original enqueue order), then `step(ChunkEvent::End(n))`.
    ///
    /// Driven through a single callback, rather than one per phase, so a caller that needs
    /// exclusive access to shared state (the performer, in practice) across all three phases only
    /// has to capture it once.
    pub fn iterate_chunks(&mut self, start_time: u64, total_size: u32, max_chunk: u32, mut step: impl FnMut(ChunkEvent)) {
        let mut boundaries: Vec<u32> = self
            .queue
            .iter()
            .filter_map(|ev| {
                if ev.time >= start_time && ev.time < start_time + total_size as u64 {
                    Some((ev.time - start_time) as u32)
                } else {
                    None
                }
            })
            .filter(|&offset| offset > 0)
            .collect();
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut cursor = 0u32;
        let mut boundary_idx = 0usize;

        while cursor < total_size {
            let mut next = (cursor.saturating_add(max_chunk)).min(total_size);
            while boundary_idx < boundaries.len() && boundaries[boundary_idx] <= cursor {
                boundary_idx += 1;
            }
            if boundary_idx < boundaries.len() && boundaries[boundary_idx] < next {
                next = boundaries[boundary_idx];
            }
            let n = next - cursor;
            step(ChunkEvent::Begin(n));

            let boundary_time = start_time + cursor as u64;
            let mut i = 0;
            while i < self.queue.len() {
                if self.queue[i].time == boundary_time {
                    let ev = self.queue.remove(i).expect("index bounded by len() above");
                    step(ChunkEvent::Input(ev.endpoint, ev.time, ev.value));
                } else {
                    i += 1;
                }
            }

            step(ChunkEvent::End(n));
            cursor = next;
        }
    }
}

/// One phase of a single sub-interval produced by [`EventFifo::iterate_chunks`].
pub enum ChunkEvent {
    /// The performer should be told to prepare for `n` frames.
    Begin(u32),
    /// A queued event landed exactly at this sub-interval's start boundary.
    Input(EndpointHandle, u64, EventValue),
    /// The performer should be advanced and this sub-interval's `n` frames of output collected.
    End(u32),
}
