//! `SGLookup`: the per-input-sequence interval map from Side Graph
//! coordinates to Sequence Graph `(sequence, offset, strand)` ranges.
//!
//! The shape is lifted straight from `liftover::LiftoverIndexed`: a
//! sorted, contiguous array of intervals per source sequence, queried
//! with `partition_point` instead of a general interval tree, because
//! intervals here are always gap-free and non-overlapping by
//! construction (every input base belongs to exactly one fragment).

use crate::error::InternalInvariantError;
use crate::position::{Position, Segment, Side};

#[derive(Debug, Clone, Copy)]
struct Interval {
    /// Input-sequence offset this interval starts at.
    start: usize,
    length: usize,
    out_seq_id: usize,
    /// Output-sequence offset the interval starts at. The core always
    /// emits whole fragments, so this is always 0 in practice, but the
    /// structure doesn't assume it.
    out_offset: usize,
    reversed: bool,
}
impl Interval {
    fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Translates input-sequence positions/segments to output-sequence
/// segments. One ordered, `[0, len)`-covering interval list per input
/// sequence.
#[derive(Debug, Clone, Default)]
pub struct SGLookup {
    sequences: Vec<Vec<Interval>>,
}
impl SGLookup {
    /// Reserves empty interval lists for `num_input_sequences` input
    /// sequences.
    pub fn init(num_input_sequences: usize) -> Self {
        Self {
            sequences: vec![Vec::new(); num_input_sequences],
        }
    }

    /// Records that input positions `[in_pos.pos, in_pos.pos + length)`
    /// of sequence `in_pos.seq_id` map onto `length` consecutive bases
    /// of `out_pos_start.seq_id` starting at `out_pos_start.pos`.
    /// Intervals for a sequence must be appended in increasing,
    /// contiguous order — the core only ever does this, walking cut
    /// sides left to right.
    pub fn add_interval(
        &mut self,
        in_pos: Position,
        out_pos_start: Position,
        length: usize,
        reversed: bool,
    ) {
        let list = &mut self.sequences[in_pos.seq_id];
        debug_assert_eq!(
            list.last().map(Interval::end).unwrap_or(0),
            in_pos.pos,
            "SGLookup intervals must be contiguous"
        );
        list.push(Interval {
            start: in_pos.pos,
            length,
            out_seq_id: out_pos_start.seq_id,
            out_offset: out_pos_start.pos,
            reversed,
        });
    }

    fn interval_containing(
        list: &[Interval],
        pos: usize,
    ) -> Option<(usize, &Interval)> {
        let idx = list.partition_point(|iv| iv.end() <= pos);
        let iv = list.get(idx)?;
        (iv.start <= pos && pos < iv.end()).then_some((idx, iv))
    }

    /// Maps a single input position to the output `Side` it lives at.
    /// The returned side's strand reflects the image strand of the
    /// interval (always forward, for intervals the core itself adds).
    pub fn map_position(
        &self,
        in_pos: Position,
    ) -> Result<Side, InternalInvariantError> {
        let list = self.sequences.get(in_pos.seq_id).map(Vec::as_slice).unwrap_or(&[]);
        let (_, iv) = Self::interval_containing(list, in_pos.pos).ok_or(
            InternalInvariantError::IncompleteIntervalMap {
                seq_id: in_pos.seq_id,
                pos: in_pos.pos,
            },
        )?;
        let offset = in_pos.pos - iv.start;
        let (out_pos, out_forward) = if iv.reversed {
            (iv.out_offset + iv.length - 1 - offset, false)
        } else {
            (iv.out_offset + offset, true)
        };
        Ok(Side::new(Position::new(iv.out_seq_id, out_pos), out_forward))
    }

    /// Appends to `out` the ordered output `Segment`s that together
    /// cover `length` input bases of sequence `start.seq_id` starting at
    /// `start.pos`, traversing forward (increasing positions) or
    /// backward (decreasing positions, i.e. reverse strand) per
    /// `forward`.
    ///
    /// Consecutive emitted segments are guaranteed to land on output
    /// sequences that are chain-adjacent, because each interval is
    /// itself one whole output fragment and consecutive fragments of
    /// the same input sequence are always chain-joined by the
    /// Converter.
    pub fn get_path(
        &self,
        start: Position,
        length: usize,
        forward: bool,
        out: &mut Vec<Segment>,
    ) -> Result<(), InternalInvariantError> {
        if length == 0 {
            return Ok(());
        }
        let list = self.sequences.get(start.seq_id).map(Vec::as_slice).unwrap_or(&[]);
        let err = |pos: usize| InternalInvariantError::IncompleteIntervalMap {
            seq_id: start.seq_id,
            pos,
        };

        let mut remaining = length;
        let mut cur = start.pos;
        let (mut idx, _) = Self::interval_containing(list, cur).ok_or_else(|| err(cur))?;

        if forward {
            loop {
                let iv = list.get(idx).ok_or_else(|| err(cur))?;
                let offset = cur - iv.start;
                let avail = iv.length - offset;
                let take = avail.min(remaining);

                let side = Side::new(Position::new(iv.out_seq_id, iv.out_offset + offset), true);
                out.push(Segment::new(side, take));

                remaining -= take;
                if remaining == 0 {
                    break;
                }
                cur += take;
                idx += 1;
            }
        } else {
            loop {
                let iv = list.get(idx).ok_or_else(|| err(cur))?;
                let offset = cur - iv.start;
                let take = (offset + 1).min(remaining);

                let side = Side::new(Position::new(iv.out_seq_id, iv.out_offset + offset), false);
                out.push(Segment::new(side, take));

                remaining -= take;
                if remaining == 0 {
                    break;
                }
                if take > offset {
                    idx = idx.checked_sub(1).ok_or_else(|| err(cur))?;
                    let piv = list.get(idx).ok_or_else(|| err(cur))?;
                    cur = piv.end() - 1;
                } else {
                    cur -= take;
                }
            }
        }

        Ok(())
    }
}
