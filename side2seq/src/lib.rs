//! Converts a bidirected Side Graph -- where joins may attach anywhere
//! in a sequence's interior, on either strand -- into a Sequence Graph,
//! where every join connects only to a sequence's start or end.

pub mod converter;
pub mod cut_planner;
pub mod error;
pub mod graph;
pub mod lookup;
pub mod position;

pub use converter::{ConvertOptions, Converter, NamedPath};
pub use error::{InputShapeError, InternalInvariantError, Result, Side2SeqError, UsageError};
pub use graph::{Join, Sequence, SideGraph};
pub use lookup::SGLookup;
pub use position::{Position, Segment, Side};
