use pretty_assertions::assert_eq;
use std::collections::HashSet;
use termprune_graph::{
    AnnotationMap, CleanerConfig, CleaningReport, GraphCleaner, PruneError, Relation, TermGraph,
    TermKind,
};

fn graph_of(edges: &[(&str, &str)]) -> TermGraph {
    let mut graph = TermGraph::new();
    for (specific, general) in edges {
        graph.add_edge(specific, general, Relation::IsA);
    }
    graph
}

fn annotations(entries: &[(&str, &[&str])]) -> AnnotationMap {
    entries
        .iter()
        .map(|(id, terms)| (id.to_string(), terms.iter().map(|t| t.to_string()).collect()))
        .collect()
}

fn roots(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn sorted_ids(graph: &TermGraph) -> Vec<String> {
    let mut ids = graph.term_ids();
    ids.sort();
    ids
}

fn clean(annotations: &AnnotationMap, graph: TermGraph, root_ids: &[&str]) -> CleaningReport {
    GraphCleaner::new(CleanerConfig::for_debugging())
        .expect("valid config")
        .clean(annotations, graph, &roots(root_ids))
        .expect("cleaning failed")
}

/// Three branches under R; I (layer 3) and Q (layer 3 via H, 4 via M) carry evidence.
fn branching() -> TermGraph {
    graph_of(&[
        ("A", "R"),
        ("B", "R"),
        ("C", "R"),
        ("D", "A"),
        ("E", "A"),
        ("F", "B"),
        ("G", "B"),
        ("H", "C"),
        ("I", "D"),
        ("J", "D"),
        ("K", "E"),
        ("L", "F"),
        ("M", "G"),
        ("N", "I"),
        ("O", "K"),
        ("P", "L"),
        ("Q", "M"),
        ("Q", "H"),
    ])
}

fn branching_annotations() -> AnnotationMap {
    annotations(&[("P05067", &["I"]), ("Q9Y6K9", &["Q", "GO:missing"])])
}

#[test]
fn annotated_leaf_keeps_only_its_path() {
    let graph = graph_of(&[
        ("A1", "R"),
        ("A2", "R"),
        ("B1", "A1"),
        ("B2", "A1"),
        ("B3", "A2"),
        ("X", "B1"),
        ("Y", "B1"),
        ("Z", "B2"),
    ]);

    let report = clean(&annotations(&[("P05067", &["X"])]), graph, &["R"]);
    let category = report.category("R").expect("category R");

    assert_eq!(sorted_ids(&category.graph), roots(&["A1", "B1", "R", "X"]));
    assert_eq!(category.max_layer, 3);
    assert_eq!(category.leaves, roots(&["X"]));
    assert_eq!(report.repairs, 0);
}

#[test]
fn shared_parent_survives_while_unannotated_sibling_goes() {
    let graph = graph_of(&[("P1", "R"), ("P2", "R"), ("X", "P1"), ("X", "P2"), ("U", "P2")]);

    let report = clean(&annotations(&[("P05067", &["X"])]), graph, &["R"]);
    let category = report.category("R").expect("category R");

    assert_eq!(sorted_ids(&category.graph), roots(&["P1", "P2", "R", "X"]));
    assert_eq!(category.graph.parents("X").len(), 2);
}

#[test]
fn disconnected_roots_are_joined_by_one_connector() {
    let mut graph = graph_of(&[("A", "R1"), ("B", "R2"), ("X", "A")]);
    graph.add_edge("X", "B", Relation::PartOf);

    let report = clean(&annotations(&[("P05067", &["X"])]), graph, &["R1", "R2"]);

    assert_eq!(report.repairs, 1);
    assert_eq!(report.roots, roots(&["new_connecting_node"]));
    assert_eq!(report.categories.len(), 1);

    let category = &report.categories[0];
    assert_eq!(
        category.graph.term("new_connecting_node").map(|node| node.kind),
        Some(TermKind::Connector)
    );
    assert_eq!(category.max_layer, 3);
    assert_eq!(
        sorted_ids(&category.graph),
        roots(&["A", "B", "R1", "R2", "X", "new_connecting_node"])
    );

    let rendered = category.render_graph();
    assert!(!rendered.contains("new_connecting_node"));
    assert_eq!(rendered.node_count(), 5);
    assert_eq!(rendered.edge_count(), 4);
}

#[test]
fn disconnection_without_repairs_is_fatal() {
    let mut graph = graph_of(&[("A", "R1"), ("B", "R2"), ("X", "A")]);
    graph.add_edge("X", "B", Relation::PartOf);

    let err = GraphCleaner::new(CleanerConfig {
        max_repairs: 0,
        ..CleanerConfig::default()
    })
    .expect("valid config")
    .clean(
        &annotations(&[("P05067", &["X"])]),
        graph,
        &roots(&["R1", "R2"]),
    )
    .unwrap_err();

    match err {
        PruneError::RepairExhausted {
            attempt,
            start,
            ontology,
        } => {
            assert_eq!(attempt, 0);
            assert_eq!(start, "X");
            assert_eq!(ontology, "R1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn category_without_annotations_shrinks_to_root() {
    let graph = graph_of(&[("A", "R"), ("B", "A"), ("C", "R")]);

    let report = clean(&AnnotationMap::new(), graph, &["R"]);
    let category = report.category("R").expect("category R");

    assert_eq!(category.graph.term_ids(), roots(&["R"]));
    assert!(category.leaves.is_empty());
    assert_eq!(category.max_layer, 0);
}

#[test]
fn every_remaining_term_leads_to_evidence() {
    let report = clean(&branching_annotations(), branching(), &["R"]);
    let category = report.category("R").expect("category R");
    let graph = &category.graph;

    assert_eq!(
        sorted_ids(graph),
        roots(&["A", "B", "C", "D", "G", "H", "I", "M", "Q", "R"])
    );

    for id in graph.term_ids() {
        if id == "R" || graph.is_marked(&id) {
            continue;
        }
        let mut stack = graph.children(&id);
        let mut seen = HashSet::new();
        let mut leads_to_marked = false;
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if graph.is_marked(&current) {
                leads_to_marked = true;
                break;
            }
            stack.extend(graph.children(&current));
        }
        assert!(leads_to_marked, "{id} does not lead to a marked term");
        assert!(graph.ancestors(&id).contains("R"), "{id} is cut off from R");
    }

    for leaf in &category.leaves {
        assert!(graph.contains(leaf), "frontier names removed term {leaf}");
    }
}

#[test]
fn outer_pruning_stops_at_first_marked_layer() {
    let report = clean(&branching_annotations(), branching(), &["R"]);
    let category = report.category("R").expect("category R");

    assert_eq!(category.max_layer, 3);
    for id in ["I", "Q"] {
        assert!(category.graph.contains(id), "{id} was pruned");
    }
    for id in ["N", "O", "P"] {
        assert!(!category.graph.contains(id), "{id} survived");
    }
}

#[test]
fn cleaning_twice_keeps_the_same_terms() {
    let annotations = branching_annotations();
    let first = clean(&annotations, branching(), &["R"]);
    let cleaned = first.category("R").expect("category R").graph.clone();

    let second = clean(&annotations, cleaned.clone(), &["R"]);

    assert_eq!(
        sorted_ids(&second.category("R").expect("category R").graph),
        sorted_ids(&cleaned)
    );
}

#[test]
fn unmatched_identifiers_are_traced() {
    let report = clean(
        &annotations(&[("P05067", &["I"]), ("ORPHAN", &["GO:404"])]),
        branching(),
        &["R"],
    );

    assert_eq!(report.trace.unmatched, roots(&["ORPHAN"]));
    assert_eq!(report.trace.matched["P05067"], roots(&["I"]));
}

#[test]
fn sequential_and_parallel_runs_agree() {
    let mut graph = branching();
    graph.add_edge("S", "R2", Relation::IsA);
    graph.add_edge("T", "S", Relation::IsA);
    let annotations = annotations(&[("P05067", &["I"]), ("P12345", &["T"])]);

    let parallel = GraphCleaner::default()
        .clean(&annotations, graph.clone(), &roots(&["R", "R2"]))
        .expect("parallel run");
    let sequential = clean(&annotations, graph, &["R", "R2"]);

    assert_eq!(parallel.roots, sequential.roots);
    for (a, b) in parallel.categories.iter().zip(&sequential.categories) {
        assert_eq!(a.root, b.root);
        assert_eq!(sorted_ids(&a.graph), sorted_ids(&b.graph));
    }
    assert_eq!(
        sorted_ids(&sequential.category("R2").expect("category R2").graph),
        roots(&["R2", "S", "T"])
    );
}
