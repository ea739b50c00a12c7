//! The Chunking Wrapper: splits a `render` call larger than the negotiated block size
//! into successive sub-renders, handing each one exactly its slice of audio and MIDI.

use super::buffer::{Inputs, Outputs};
use super::midi::{MidiEvent, MidiEventInputList};
use super::performer::Performer;
use super::render::DispatchCore;

/// Called by [`DispatchCore::render`] once it has determined `output.frames() >
/// core.max_block_size()`. Walks the call in `max_block_size`-sized steps (the final step
/// shorter), slicing `input`/`output` by frame range and `midi_in` by
/// [`MidiEventInputList::remove_events_before`] so each sub-render only sees the MIDI events that
/// belong to it.
pub fn render_in_chunks<P: Performer>(
    core: &mut DispatchCore<P>,
    input: &Inputs,
    output: &mut Outputs,
    midi_in: &[MidiEvent],
    midi_out: &mut Vec<MidiEvent>,
) {
    let total_frames = output.frames();
    let step = core.max_block_size() as usize;
    let mut midi_remaining = MidiEventInputList::new(midi_in);

    let mut offset = 0usize;
    while offset < total_frames {
        let n = step.min(total_frames - offset);

        let sub_input = input.slice(offset, n);
        let mut sub_output = output.slice(offset, n);

        let sub_midi_owned: Vec<MidiEvent> = midi_remaining
            .remove_events_before((offset + n) as u32)
            .iter()
            .map(|ev| MidiEvent {
                frame_index: ev.frame_index - offset as u32,
                midi_bytes: ev.midi_bytes,
            })
            .collect();

        let midi_out_before = midi_out.len();
        core.render_block(&sub_input, &mut sub_output, &sub_midi_owned, midi_out, n as u32);
        for ev in &mut midi_out[midi_out_before..] {
            ev.frame_index += offset as u32;
        }

        offset += n;
    }
}
