//! End-to-end conversions against small, fully-traced Side Graphs:
//! one scenario per interesting fragmentation/chop/orientation shape.

use side2seq::{ConvertOptions, Converter, NamedPath, Position, Segment, Side, SideGraph};

fn side(seq: usize, pos: usize, forward: bool) -> Side {
    Side::new(Position::new(seq, pos), forward)
}

fn out_lengths(conv: &Converter<'_>) -> Vec<usize> {
    (0..conv.out_graph().num_sequences())
        .map(|i| conv.out_graph().get_sequence(i).unwrap().length)
        .collect()
}

#[test]
fn simple_snp() {
    let mut graph = SideGraph::new();
    graph.add_sequence("seq0", 10);
    graph.add_sequence("seq1", 1);
    graph.add_join(side(0, 3, false), side(1, 0, true)).unwrap();
    graph.add_join(side(1, 0, false), side(0, 5, true)).unwrap();

    let bases = vec!["AAAAAAAAAA".to_owned(), "G".to_owned()];
    let paths: Vec<NamedPath> = vec![
        (
            "path1".to_owned(),
            vec![Segment::new(side(0, 0, true), 10)],
        ),
        (
            "path2".to_owned(),
            vec![
                Segment::new(side(0, 0, true), 4),
                Segment::new(side(1, 0, true), 1),
                Segment::new(side(0, 5, true), 5),
            ],
        ),
    ];

    let mut conv = Converter::new();
    conv.init(&graph, &bases, &paths, ConvertOptions::default());
    conv.convert().unwrap();

    assert_eq!(out_lengths(&conv), vec![4, 1, 5, 1]);
    assert_eq!(conv.out_graph().num_joins(), 4);

    // Pin down the actual topology, not just the count: out0/out2 are
    // seq0's two fragments, out1 is the snp's own fragment, out3 is the
    // fragment chained in from the snp's far join.
    let out = conv.out_graph();
    assert!(out.get_join(side(0, 3, false), side(1, 0, true)).is_some());
    assert!(out.get_join(side(0, 3, false), side(3, 0, true)).is_some());
    assert!(out.get_join(side(1, 0, false), side(2, 0, true)).is_some());
    assert!(out.get_join(side(3, 0, false), side(2, 0, true)).is_some());

    assert_eq!(conv.out_paths().len(), 2);

    let (name, segs) = &conv.out_paths()[0];
    assert_eq!(name, "path1");
    let total: usize = segs.iter().map(|s| s.length).sum();
    assert_eq!(total, 10);

    let (name, segs) = &conv.out_paths()[1];
    assert_eq!(name, "path2");
    let total: usize = segs.iter().map(|s| s.length).sum();
    assert_eq!(total, 10);
}

#[test]
fn inversion_with_all_four_join_orientations() {
    // Every side on seq0/seq1 below is distinct and non-adjacent, so
    // each of the 4 joins contributes exactly one extra cut to each
    // sequence: 4 cuts -> 5 fragments per sequence, 4 chain joins per
    // sequence, for 4 (mapped) + 4 + 4 = 12 output joins total.
    let mut graph = SideGraph::new();
    graph.add_sequence("seq0", 20);
    graph.add_sequence("seq1", 10);

    graph.add_join(side(0, 3, false), side(1, 2, true)).unwrap(); // R -> F
    graph.add_join(side(0, 7, false), side(1, 4, false)).unwrap(); // R -> R
    graph.add_join(side(0, 12, true), side(1, 6, false)).unwrap(); // F -> R
    graph.add_join(side(0, 16, true), side(1, 8, true)).unwrap(); // F -> F

    let bases = vec![
        "ACCTGACCATAGGCATGGGC".to_owned(),
        "TCCGCCTAAA".to_owned(),
    ];
    let paths: Vec<NamedPath> = Vec::new();

    let mut conv = Converter::new();
    conv.init(&graph, &bases, &paths, ConvertOptions::default());
    conv.convert().unwrap();

    assert_eq!(out_lengths(&conv).len(), 10);
    assert_eq!(out_lengths(&conv).iter().sum::<usize>(), 30);
    assert_eq!(conv.out_graph().num_joins(), 12);
}

#[test]
fn double_cut_at_adjacent_sides_collapses_the_redundant_cut() {
    let mut graph = SideGraph::new();
    graph.add_sequence("seq0", 20);
    graph.add_join(side(0, 5, false), side(0, 10, true)).unwrap();
    graph.add_join(side(0, 6, true), side(0, 10, false)).unwrap();

    let bases = vec!["ACCTGACCATAGGCATGGGC".to_owned()];
    let paths: Vec<NamedPath> = Vec::new();

    let mut conv = Converter::new();
    conv.init(&graph, &bases, &paths, ConvertOptions::default());
    conv.convert().unwrap();

    assert_eq!(out_lengths(&conv), vec![6, 4, 1, 9]);
}

#[test]
fn two_base_reverse_snp() {
    let mut graph = SideGraph::new();
    graph.add_sequence("seq0", 20);
    graph.add_sequence("seq1", 2);
    graph.add_join(side(0, 5, true), side(1, 0, false)).unwrap();

    let bases = vec!["ACCTGACCATAGGCATGGGC".to_owned(), "TA".to_owned()];
    let paths: Vec<NamedPath> = Vec::new();

    let mut conv = Converter::new();
    conv.init(&graph, &bases, &paths, ConvertOptions::default());
    conv.convert().unwrap();

    assert_eq!(out_lengths(&conv), vec![5, 15, 1, 1]);
    assert_eq!(conv.out_graph().num_joins(), 3);
}

#[test]
fn chop_mode_cuts_at_regular_intervals() {
    let mut graph = SideGraph::new();
    graph.add_sequence("seq0", 100);
    let bases = vec!["A".repeat(100)];
    let paths: Vec<NamedPath> = Vec::new();

    let mut conv = Converter::new();
    conv.init(
        &graph,
        &bases,
        &paths,
        ConvertOptions {
            chop: 25,
            make_sequence_paths: true,
            ..ConvertOptions::default()
        },
    );
    conv.convert().unwrap();

    assert_eq!(out_lengths(&conv), vec![25, 25, 25, 25]);
    assert_eq!(conv.out_graph().num_joins(), 3);

    assert_eq!(conv.out_paths().len(), 1);
    let (name, segs) = &conv.out_paths()[0];
    assert_eq!(name, "&SG_seq0");
    assert_eq!(segs.len(), 4);
    assert_eq!(segs.iter().map(|s| s.length).sum::<usize>(), 100);
}

#[test]
fn empty_graph_converts_to_an_empty_graph() {
    let graph = SideGraph::new();
    let bases: Vec<String> = Vec::new();
    let paths: Vec<NamedPath> = Vec::new();

    let mut conv = Converter::new();
    conv.init(&graph, &bases, &paths, ConvertOptions::default());
    conv.convert().unwrap();

    assert_eq!(conv.out_graph().num_sequences(), 0);
    assert_eq!(conv.out_graph().num_joins(), 0);
    assert!(conv.out_paths().is_empty());
}

#[test]
fn reset_allows_reuse_for_a_second_unrelated_conversion() {
    let mut graph_a = SideGraph::new();
    graph_a.add_sequence("a", 4);
    let bases_a = vec!["ACGT".to_owned()];
    let paths_a: Vec<NamedPath> = Vec::new();

    let mut conv = Converter::new();
    conv.init(&graph_a, &bases_a, &paths_a, ConvertOptions::default());
    conv.convert().unwrap();
    assert_eq!(conv.out_graph().num_sequences(), 1);

    conv.reset();
    assert!(conv.convert().is_err());

    let mut graph_b = SideGraph::new();
    graph_b.add_sequence("b", 2);
    graph_b.add_sequence("c", 2);
    let bases_b = vec!["AC".to_owned(), "GT".to_owned()];
    let paths_b: Vec<NamedPath> = Vec::new();

    conv.init(&graph_b, &bases_b, &paths_b, ConvertOptions::default());
    conv.convert().unwrap();
    assert_eq!(conv.out_graph().num_sequences(), 2);
}
