//! Computes the sorted set of cut sides for one input sequence: the
//! sides where it must be fragmented so no join or path endpoint ends
//! up in a node's interior.

use std::collections::BTreeSet;

use crate::graph::SideGraph;
use crate::position::{Position, Side};

/// Collects, for `seq_id` of length `seq_len` in `graph`, every side in
/// its interior range that is incident to a join or a path endpoint,
/// plus (if `chop > 0`) synthetic cuts at regular intervals, then
/// collapses same-cut duplicates.
///
/// `path_ends` is the set of path-endpoint sides across *all* input
/// paths (first segment's `in_side`, last segment's `out_side` of
/// every path) — computed once by the caller and passed in, since it
/// doesn't vary per sequence.
pub fn cut_sides(
    graph: &SideGraph,
    seq_id: usize,
    seq_len: usize,
    path_ends: &BTreeSet<Side>,
    chop: usize,
) -> Vec<Side> {
    let mut cuts = BTreeSet::new();

    if seq_len > 1 {
        let start = Side::new(Position::new(seq_id, 0), false);
        let end = Side::new(Position::new(seq_id, seq_len - 1), true);

        for join in graph.joins_from_side1(start) {
            if join.side1 > end {
                break;
            }
            if join.side1 >= start {
                cuts.insert(join.side1);
            }
        }
        for join in graph.joins_from_side2(start) {
            if join.side2 > end {
                break;
            }
            if join.side2 >= start {
                cuts.insert(join.side2);
            }
        }
        for &side in path_ends.range(start..=end) {
            cuts.insert(side);
        }
    }

    if chop > 0 && seq_len > 1 {
        insert_chop_cuts(&mut cuts, seq_id, seq_len, chop);
    }

    clean_adjacent_same_cut(&mut cuts);

    cuts.into_iter().collect()
}

/// Brackets the cut set with the sequence's true start/end sides,
/// inserts synthetic cuts every `chop` bases between each pair of
/// adjacent sides (including the brackets), then removes the brackets
/// again. The `space - offset > 0` guard means a chop cut is only
/// inserted when there's more than `chop` bases of room left before the
/// next real cut, so the final fragment before any real cut is never
/// shorter than necessary purely due to chop rounding.
fn insert_chop_cuts(cuts: &mut BTreeSet<Side>, seq_id: usize, seq_len: usize, chop: usize) {
    let start = Side::new(Position::new(seq_id, 0), true);
    let end = Side::new(Position::new(seq_id, seq_len - 1), false);

    let mut bracketed: Vec<Side> = std::iter::once(start)
        .chain(cuts.iter().copied())
        .chain(std::iter::once(end))
        .collect();
    bracketed.sort_unstable();
    bracketed.dedup();

    let mut inserted = Vec::new();
    for pair in bracketed.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        let space = side_distance(prev, cur);
        let mut offset = chop;
        while space.saturating_sub(offset) > 0 {
            inserted.push(Side::new(
                Position::new(seq_id, prev.pos.pos + offset),
                prev.forward,
            ));
            offset += chop;
        }
    }

    cuts.extend(inserted);
}

/// Number of bases strictly between two sides, measured the way the
/// source's `SGSide::lengthTo` does: `next.pos - prev.pos`.
fn side_distance(prev: Side, cur: Side) -> usize {
    cur.pos.pos - prev.pos.pos
}

/// Drops the right-side (`forward=false`) cut of a `(right(p),
/// left(p+1))` pair, since both induce the same fragment boundary and
/// keeping both would emit a zero-length fragment.
fn clean_adjacent_same_cut(cuts: &mut BTreeSet<Side>) {
    let ordered: Vec<Side> = cuts.iter().copied().collect();
    for pair in ordered.windows(2) {
        let (cur, next) = (pair[0], pair[1]);
        if next.seq_id() == cur.seq_id()
            && next.pos.pos == cur.pos.pos + 1
            && next.forward
            && !cur.forward
        {
            cuts.remove(&cur);
        }
    }
}
