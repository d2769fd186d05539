//! Orchestrates a full Side Graph -> Sequence Graph conversion:
//! fragmenting sequences at cut sides, remapping joins, and
//! re-expressing paths in output coordinates.

use std::collections::BTreeSet;

use crate::cut_planner;
use crate::error::{InternalInvariantError, Result, Side2SeqError, UsageError};
use crate::graph::{Join, SideGraph};
use crate::lookup::SGLookup;
use crate::position::{reverse_complement, Position, Segment, Side};

/// A named, ordered list of segments: one input or output path.
pub type NamedPath = (String, Vec<Segment>);

/// Tunables for [`Converter::convert`], mirroring the source's
/// `Side2Seq::init` parameters.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Upper-case all output bases as they're extracted from the input.
    pub force_upper_case: bool,
    /// In addition to the input paths, emit one synthetic path per
    /// output-derived input sequence, covering it end to end.
    pub make_sequence_paths: bool,
    /// Name prefix for synthetic per-sequence paths.
    pub seq_path_prefix: String,
    /// If > 0, additionally cut every sequence at this many bases of
    /// spacing (on top of join- and path-induced cuts).
    pub chop: usize,
}
impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            force_upper_case: false,
            make_sequence_paths: false,
            seq_path_prefix: "&SG_".to_owned(),
            chop: 0,
        }
    }
}

/// Converts a bidirected Side Graph into a Sequence Graph whose joins
/// only ever land on sequence endpoints.
///
/// Borrows its input for the duration of `convert()`; nothing is
/// copied in by [`init`](Self::init) except `options`.
#[derive(Debug, Default)]
pub struct Converter<'a> {
    in_graph: Option<&'a SideGraph>,
    in_bases: Option<&'a [String]>,
    in_paths: Option<&'a [NamedPath]>,
    in_path_ends: BTreeSet<Side>,
    options: ConvertOptions,

    out_graph: SideGraph,
    out_bases: Vec<String>,
    out_paths: Vec<NamedPath>,
    lookup: SGLookup,
}

impl<'a> Converter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all borrowed input and converted output, returning the
    /// converter to its just-constructed state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Loads a Side Graph, its bases, and its paths. Does not copy any
    /// of them; `convert` reads straight from these borrows.
    pub fn init(
        &mut self,
        graph: &'a SideGraph,
        bases: &'a [String],
        paths: &'a [NamedPath],
        options: ConvertOptions,
    ) {
        self.reset();
        self.in_graph = Some(graph);
        self.in_bases = Some(bases);
        self.in_paths = Some(paths);
        self.options = options;

        for (_, segs) in paths {
            if let (Some(first), Some(last)) = (segs.first(), segs.last()) {
                self.in_path_ends.insert(first.in_side());
                self.in_path_ends.insert(last.out_side());
            }
        }
    }

    pub fn out_graph(&self) -> &SideGraph {
        &self.out_graph
    }
    pub fn out_bases(&self) -> &[String] {
        &self.out_bases
    }
    pub fn out_paths(&self) -> &[NamedPath] {
        &self.out_paths
    }

    /// Extracts `seg`'s bases from the *input* graph, reverse-
    /// complementing and upper-casing per `seg`'s strand and
    /// `options.force_upper_case`.
    pub fn input_dna(&self, seg: Segment) -> Result<String> {
        let bases = self.in_bases.ok_or(UsageError::ConvertBeforeInit)?;
        Ok(extract_dna(bases, seg, self.options.force_upper_case))
    }

    /// Extracts `seg`'s bases from the already-converted *output*
    /// graph.
    pub fn output_dna(&self, seg: Segment) -> Result<String> {
        if self.in_graph.is_none() {
            return Err(UsageError::ConvertBeforeInit.into());
        }
        Ok(extract_dna(&self.out_bases, seg, false))
    }

    /// Runs the full conversion. Safe to call more than once on the
    /// same loaded input: each call starts from a fresh output graph.
    pub fn convert(&mut self) -> Result<()> {
        let graph = self.in_graph.ok_or(UsageError::ConvertBeforeInit)?;
        let bases = self.in_bases.ok_or(UsageError::ConvertBeforeInit)?;
        let paths = self.in_paths.ok_or(UsageError::ConvertBeforeInit)?;

        self.out_graph = SideGraph::new();
        self.out_bases = Vec::new();
        self.out_paths = Vec::new();
        self.lookup = SGLookup::init(graph.num_sequences());

        for i in 0..graph.num_sequences() {
            let seq_id = i;
            let seq_len = graph.get_sequence(i).expect("dense sequence id").length;
            let seq_name = graph.get_sequence(i).expect("dense sequence id").name.clone();
            self.convert_sequence(graph, bases, seq_id, seq_len, &seq_name)?;
        }

        for join in graph.joins().collect::<Vec<_>>() {
            self.convert_join(join)?;
        }

        for (name, segs) in paths {
            self.convert_path(bases, name, segs)?;
        }

        if self.options.make_sequence_paths {
            for i in 0..graph.num_sequences() {
                let seq = graph.get_sequence(i).expect("dense sequence id");
                let name = format!("{}{}", self.options.seq_path_prefix, seq.name);
                let whole = vec![Segment::new(
                    Side::new(Position::new(seq.id, 0), true),
                    seq.length,
                )];
                self.convert_path(bases, &name, &whole)?;
            }
        }

        Ok(())
    }

    /// Fragments one input sequence at its cut sides, registering each
    /// fragment as a new output sequence with its bases and lookup
    /// interval, then chains the fragments back together with
    /// synthetic joins.
    fn convert_sequence(
        &mut self,
        graph: &SideGraph,
        bases: &[String],
        seq_id: usize,
        seq_len: usize,
        seq_name: &str,
    ) -> Result<()> {
        let cuts = cut_planner::cut_sides(
            graph,
            seq_id,
            seq_len,
            &self.in_path_ends,
            self.options.chop,
        );

        let first_idx = self.out_graph.num_sequences();
        let mut first = 0usize;
        for cut in cuts {
            let last = if cut.forward {
                cut.pos.pos - 1
            } else {
                cut.pos.pos
            };
            self.add_out_sequence(bases, seq_id, seq_name, first, last)?;
            first = last + 1;
        }
        self.add_out_sequence(bases, seq_id, seq_name, first, seq_len - 1)?;

        for j in (first_idx + 1)..self.out_graph.num_sequences() {
            let fs = self.out_graph.get_sequence(j - 1).expect("just added");
            let ts = self.out_graph.get_sequence(j).expect("just added");
            let side1 = Side::new(Position::new(fs.id, fs.length - 1), false);
            let side2 = Side::new(Position::new(ts.id, 0), true);
            let join = self.out_graph.add_join(side1, side2)?;
            self.verify_out_join(join)?;
        }

        Ok(())
    }

    fn add_out_sequence(
        &mut self,
        bases: &[String],
        in_seq_id: usize,
        in_seq_name: &str,
        first: usize,
        last: usize,
    ) -> Result<()> {
        let length = last - first + 1;
        let out_id = self
            .out_graph
            .add_sequence(format!("{in_seq_name}_{first}"), length);
        self.lookup.add_interval(
            Position::new(in_seq_id, first),
            Position::new(out_id, 0),
            length,
            false,
        );
        let seg = Segment::new(Side::new(Position::new(in_seq_id, first), true), length);
        let dna = extract_dna(bases, seg, self.options.force_upper_case);
        debug_assert_eq!(self.out_bases.len(), out_id);
        self.out_bases.push(dna);
        Ok(())
    }

    fn convert_join(&mut self, join: Join) -> Result<()> {
        let mapped1 = self.lookup.map_position(join.side1.pos)?;
        let mapped2 = self.lookup.map_position(join.side2.pos)?;
        // the strand the position maps to is always forward for
        // fragments the core itself built; the join's own strand is
        // what actually carries meaning here.
        let side1 = Side::new(mapped1.pos, join.side1.forward);
        let side2 = Side::new(mapped2.pos, join.side2.forward);
        let out_join = self.out_graph.add_join(side1, side2)?;
        self.verify_out_join(out_join)
    }

    fn verify_out_join(&self, join: Join) -> Result<()> {
        let s1 = self
            .out_graph
            .get_sequence(join.side1.seq_id())
            .expect("join endpoint sequence must exist in out graph");
        let s2 = self
            .out_graph
            .get_sequence(join.side2.seq_id())
            .expect("join endpoint sequence must exist in out graph");

        let at_endpoint = |side: Side, len: usize| {
            (side.pos.pos == 0 && side.forward) || (side.pos.pos == len - 1 && !side.forward)
        };

        if !at_endpoint(join.side1, s1.length) || !at_endpoint(join.side2, s2.length) {
            return Err(InternalInvariantError::JoinNotAtEndpoint {
                side1: join.side1,
                side2: join.side2,
                len1: s1.length,
                len2: s2.length,
            }
            .into());
        }
        Ok(())
    }

    fn convert_path(&mut self, bases: &[String], name: &str, segs: &[Segment]) -> Result<()> {
        let mut out_segs = Vec::new();
        let mut frag = Vec::new();

        for seg in segs {
            frag.clear();
            self.lookup
                .get_path(seg.side.pos, seg.length, seg.side.forward, &mut frag)?;

            let mut seq2 = String::new();
            for (j, fseg) in frag.iter().enumerate() {
                seq2.push_str(&extract_dna(&self.out_bases, *fseg, false));
                if j > 0 {
                    let bridge = Join::new(frag[j - 1].out_side(), fseg.in_side());
                    if self
                        .out_graph
                        .get_join(bridge.side1, bridge.side2)
                        .is_none()
                    {
                        return Err(Side2SeqError::from(InternalInvariantError::MissingBridgeJoin {
                            path_name: name.to_owned(),
                            prev_out: frag[j - 1].out_side(),
                            next_in: fseg.in_side(),
                        }));
                    }
                }
            }

            let mut seq1 = extract_dna(bases, *seg, self.options.force_upper_case);
            seq1.make_ascii_uppercase();
            seq2.make_ascii_uppercase();
            if seq1 != seq2 {
                return Err(InternalInvariantError::PathDnaMismatch {
                    path_name: name.to_owned(),
                    input_len: seq1.len(),
                    output_len: seq2.len(),
                }
                .into());
            }

            out_segs.extend_from_slice(&frag);
        }

        self.out_paths.push((name.to_owned(), out_segs));
        Ok(())
    }
}

/// Slices `seg` out of `sequences`, reverse-complementing it if `seg`
/// reads the reverse strand and upper-casing it if `force_upper` is
/// set.
fn extract_dna(sequences: &[String], seg: Segment, force_upper: bool) -> String {
    let whole = &sequences[seg.seq_id()];
    let start = seg.min_pos();
    let mut dna = whole[start..start + seg.length].to_owned();
    if !seg.side.forward {
        reverse_complement(&mut dna);
    }
    if force_upper {
        dna.make_ascii_uppercase();
    }
    dna
}
