//! Parameter State List with Dirty Set: the latest caller-provided value per parameter, plus an
//! efficient "what changed since last flush" iteration, using a packed bitset of atomically
//! flagged words so a control thread can mark parameters dirty while the render thread flushes.

use std::mem::size_of;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use super::fifo::EventFifo;
use super::performer::EndpointHandle;
use super::value::{EventValue, RampHolder};

const USIZE_BITS: usize = size_of::<usize>() * 8;

fn word_and_bit(index: usize) -> (usize, usize) {
    (index / USIZE_BITS, 1usize << (index & (USIZE_BITS - 1)))
}

/// Where a parameter's flushed value lands, and how it should ramp when it does.
#[derive(Clone, Copy, Debug)]
pub struct ParameterBinding {
    pub endpoint: EndpointHandle,
    /// Nonzero iff this parameter's performer endpoint is a stream, in which case every flushed
    /// write is a [`RampHolder`] requesting a smoothed transition over this many frames.
    pub ramp_frames: u32,
}

/// The parameter state list. Safe to update from a control thread concurrently with `flush`
/// running on the render thread: every value and dirty flag is stored atomically.
pub struct ParameterList {
    bindings: Vec<ParameterBinding>,
    values: Vec<AtomicU32>,
    changed: Vec<AtomicUsize>,
}

impl ParameterList {
    pub fn new(bindings: Vec<ParameterBinding>) -> Self {
        let count = bindings.len();
        let bit_words = (count + USIZE_BITS - 1) / USIZE_BITS;
        ParameterList {
            bindings,
            values: (0..count).map(|_| AtomicU32::new(0)).collect(),
            changed: (0..bit_words).map(|_| AtomicUsize::new(0)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get_parameter(&self, index: usize) -> f32 {
        f32::from_bits(self.values[index].load(Ordering::Relaxed))
    }

    /// Update `index`'s value and mark it dirty, but only if the value actually changed.
    pub fn set_parameter(&self, index: usize, value: f32) {
        if self.get_parameter(index) == value {
            return;
        }
        let (word, bit) = word_and_bit(index);
        self.values[index].store(value.to_bits(), Ordering::Relaxed);
        self.changed[word].fetch_or(bit, Ordering::AcqRel);
    }

    /// Mark `index` dirty unconditionally, without changing its value.
    pub fn mark_as_changed(&self, index: usize) {
        let (word, bit) = word_and_bit(index);
        self.changed[word].fetch_or(bit, Ordering::AcqRel);
    }

    /// Drain every dirty parameter, emitting one input event per parameter at `time`. Plain
    /// parameters emit a bare float; ramped parameters emit a [`RampHolder`]. Empties the dirty
    /// set as it goes, even if a push fails because `fifo` is full.
    pub fn flush(&self, fifo: &mut EventFifo, time: u64) {
        for (index, value) in self.iterate(true) {
            let binding = self.bindings[index];
            let event = if binding.ramp_frames == 0 {
                EventValue::Float(value)
            } else {
                EventValue::Ramp(RampHolder {
                    ramp_frames: binding.ramp_frames,
                    target: value,
                })
            };
            if !fifo.push(binding.endpoint, time, event) {
                log::warn!(
                    "parameter flush dropped an event for endpoint {:?}: input FIFO is full",
                    binding.endpoint
                );
            }
        }
    }

    /// Iterate over all parameters marked as changed. If `acquire` is `true`, mark all returned
    /// parameters as no longer changed.
    pub fn iterate(&self, acquire: bool) -> ParameterListIterator<'_> {
        ParameterListIterator {
            list: self,
            word: 0,
            bit: 1,
            acquire,
        }
    }
}

/// Iterator returned by [`ParameterList::iterate`]: yields `(index, value)` for every parameter
/// currently marked dirty.
pub struct ParameterListIterator<'a> {
    list: &'a ParameterList,
    word: usize,
    bit: usize,
    acquire: bool,
}

impl<'a> Iterator for ParameterListIterator<'a> {
    type Item = (usize, f32);

    fn next(&mut self) -> Option<(usize, f32)> {
        let bits = loop {
            if self.word == self.list.changed.len() {
                return None;
            }
            let bits = self.list.changed[self.word].load(Ordering::Acquire) & self.bit.wrapping_neg();
            if bits != 0 {
                break bits;
            }
            self.word += 1;
            self.bit = 1;
        };

        let bit_index = bits.trailing_zeros() as usize;
        let bit = 1usize << bit_index;
        let index = self.word * USIZE_BITS + bit_index;

        if self.acquire {
            self.list.changed[self.word].fetch_and(!bit, Ordering::AcqRel);
        }

        let next_bit = bit << 1;
        if next_bit == 0 {
            self.word += 1;
            self.bit = 1;
        } else {
            self.bit = next_bit;
        }

        Some((index, self.list.get_parameter(index)))
    }
}
