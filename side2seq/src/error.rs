//! Error taxonomy for the conversion engine.
//!
//! Every variant names the offending join/path/segment and the numeric
//! context (ids, lengths, positions) it was raised for, so a failure can
//! be triaged from the message alone.

use crate::position::{Position, Side};

/// The input graph, bases, or paths don't satisfy the invariants of
/// the Side Graph data model (spec.md §3).
#[derive(Debug, Clone, thiserror::Error)]
pub enum InputShapeError {
    #[error(
        "sequence ids must be assigned densely: expected id {expected}, got {got} \
         (graph currently has {current_len} sequences)"
    )]
    NonContiguousSequenceId {
        expected: usize,
        got: usize,
        current_len: usize,
    },
    #[error("sequence {seq_id} must have length >= 1, got {length}")]
    EmptySequence { seq_id: usize, length: usize },
    #[error("join references unknown sequence {seq_id} (graph has {num_sequences} sequences)")]
    JoinReferencesUnknownSequence { seq_id: usize, num_sequences: usize },
    #[error("position {pos:?} is out of range for sequence {seq_id} of length {length}")]
    PositionOutOfRange {
        pos: Position,
        seq_id: usize,
        length: usize,
    },
}

/// A defensive check failed: these indicate a bug in cut planning or
/// lookup, never bad input.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InternalInvariantError {
    #[error(
        "output join {side1:?} <-> {side2:?} is bad because it doesn't abut a sequence end \
         (lengths: {len1} / {len2}). This is probably a bug, please report it!"
    )]
    JoinNotAtEndpoint {
        side1: Side,
        side2: Side,
        len1: usize,
        len2: usize,
    },
    #[error(
        "error converting path \"{path_name}\": missing bridge join {prev_out:?} -> {next_in:?} \
         between consecutive fragments. This is probably a bug, please report it!"
    )]
    MissingBridgeJoin {
        path_name: String,
        prev_out: Side,
        next_in: Side,
    },
    #[error(
        "error converting path \"{path_name}\": output segment does not match input DNA \
         (input {input_len} bases, output {output_len} bases). This is probably a bug, please \
         report it!"
    )]
    PathDnaMismatch {
        path_name: String,
        input_len: usize,
        output_len: usize,
    },
    #[error("interval map for input sequence {seq_id} does not cover position {pos}")]
    IncompleteIntervalMap { seq_id: usize, pos: usize },
}

/// The API was misused (not a property of the input data).
#[derive(Debug, Clone, thiserror::Error)]
pub enum UsageError {
    #[error("Converter::convert() called before Converter::init()")]
    ConvertBeforeInit,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum Side2SeqError {
    #[error(transparent)]
    InputShape(#[from] InputShapeError),
    #[error(transparent)]
    InternalInvariant(#[from] InternalInvariantError),
    #[error(transparent)]
    Usage(#[from] UsageError),
}

pub type Result<T> = std::result::Result<T, Side2SeqError>;
