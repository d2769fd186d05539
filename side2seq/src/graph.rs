//! The Side Graph: a sequence set plus a dual-indexed join set.
//!
//! Mirrors the shape of `liftover`'s indexed lookup tables (sorted
//! arrays queried with binary search / `range`) rather than reaching for
//! a general graph crate: a Side Graph only ever needs "all joins
//! incident to a range of sides, from either side", which a pair of
//! `BTreeSet`s gives directly.

use std::collections::BTreeSet;

use crate::error::InputShapeError;
use crate::position::Side;

/// `(id, length, name)`. `id` always matches this sequence's index in
/// its owning [`SideGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: usize,
    pub length: usize,
    pub name: String,
}

/// An unordered edge between two [`Side`]s, canonically stored with
/// `side1 <= side2` under `Side`'s total order. Self-loops (`side1 ==
/// side2`) are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Join {
    pub side1: Side,
    pub side2: Side,
}
impl Join {
    pub fn new(a: Side, b: Side) -> Self {
        if a <= b {
            Self {
                side1: a,
                side2: b,
            }
        } else {
            Self {
                side1: b,
                side2: a,
            }
        }
    }
}

/// Ordered by `(side2, side1)`, the tie-break the reverse join index
/// needs to answer "what's incident to this side from the side2 end".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JoinBySide2(Join);
impl PartialOrd for JoinBySide2 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for JoinBySide2 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.0.side2, self.0.side1).cmp(&(other.0.side2, other.0.side1))
    }
}

/// Owns a dense sequence vector and a deduplicating, dual-indexed join
/// set. Sequences and joins are append-only; the graph as a whole is
/// dropped when the owner (typically a [`crate::converter::Converter`])
/// is dropped or reset.
#[derive(Debug, Clone, Default)]
pub struct SideGraph {
    sequences: Vec<Sequence>,
    by_side1: BTreeSet<Join>,
    by_side2: BTreeSet<JoinBySide2>,
}
impl SideGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sequence, assigning it the next dense id.
    pub fn add_sequence(&mut self, name: impl Into<String>, length: usize) -> usize {
        let id = self.sequences.len();
        self.sequences.push(Sequence {
            id,
            length,
            name: name.into(),
        });
        id
    }

    /// Appends a sequence whose id is supplied by the caller (e.g. a
    /// loader reading a pre-numbered input graph), validating it is the
    /// next dense id.
    pub fn add_sequence_checked(
        &mut self,
        id: usize,
        name: impl Into<String>,
        length: usize,
    ) -> std::result::Result<usize, InputShapeError> {
        let expected = self.sequences.len();
        if id != expected {
            return Err(InputShapeError::NonContiguousSequenceId {
                expected,
                got: id,
                current_len: expected,
            });
        }
        if length == 0 {
            return Err(InputShapeError::EmptySequence { seq_id: id, length });
        }
        Ok(self.add_sequence(name, length))
    }

    pub fn get_sequence(&self, id: usize) -> Option<&Sequence> {
        self.sequences.get(id)
    }
    pub fn num_sequences(&self) -> usize {
        self.sequences.len()
    }

    /// Adds a join between `a` and `b`, deduplicating by canonical
    /// value. Returns the (possibly pre-existing) canonical `Join`.
    ///
    /// Validates both sides reference a known sequence and a position
    /// within that sequence's length.
    pub fn add_join(
        &mut self,
        a: Side,
        b: Side,
    ) -> std::result::Result<Join, InputShapeError> {
        for side in [a, b] {
            let seq = self.get_sequence(side.seq_id()).ok_or(
                InputShapeError::JoinReferencesUnknownSequence {
                    seq_id: side.seq_id(),
                    num_sequences: self.num_sequences(),
                },
            )?;
            if side.pos.pos >= seq.length {
                return Err(InputShapeError::PositionOutOfRange {
                    pos: side.pos,
                    seq_id: seq.id,
                    length: seq.length,
                });
            }
        }

        let join = Join::new(a, b);
        if let Some(existing) = self.by_side1.get(&join) {
            return Ok(*existing);
        }
        self.by_side1.insert(join);
        self.by_side2.insert(JoinBySide2(join));
        Ok(join)
    }

    /// Value-based lookup: finds the join equal (under canonical
    /// ordering) to `{a, b}`, regardless of insertion order.
    pub fn get_join(&self, a: Side, b: Side) -> Option<Join> {
        self.by_side1.get(&Join::new(a, b)).copied()
    }

    /// All joins, ordered by `side1` (tie-break `side2`).
    pub fn joins(&self) -> impl Iterator<Item = Join> + '_ {
        self.by_side1.iter().copied()
    }

    pub fn num_joins(&self) -> usize {
        self.by_side1.len()
    }

    /// Joins with `side1 >= from`, ordered by `side1`. Seed `from` with
    /// [`Side::min`] to avoid excluding a join whose `side2` sorts below
    /// the point you actually care about (see `CutPlanner`).
    pub fn joins_from_side1(&self, from: Side) -> impl Iterator<Item = Join> + '_ {
        let key = Join::new(from, Side::min());
        self.by_side1.range(key..).copied()
    }

    /// Joins with `side2 >= from`, ordered by `side2`.
    pub fn joins_from_side2(&self, from: Side) -> impl Iterator<Item = Join> + '_ {
        let key = JoinBySide2(Join::new(Side::min(), from));
        self.by_side2.range(key..).map(|j| j.0)
    }
}
