use reflow_core::{Config, ElementSample, RawBox, Snapshot};
use reflow_rlg::{Failure, FailureKind, Graph, detect_failures, dump};

fn sample(path: &str, x: f64, y: f64, w: f64, h: f64) -> ElementSample {
    ElementSample::new(
        path,
        Some(RawBox {
            x,
            y,
            width: w,
            height: h,
        }),
    )
}

fn ingest_sweep(
    config: &Config,
    widths: std::ops::RangeInclusive<i32>,
    page: impl Fn(i32) -> Vec<ElementSample>,
) -> Graph {
    let mut graph = Graph::new();
    for width in widths.rev() {
        let snapshot = Snapshot {
            width,
            elements: page(width),
        };
        graph.ingest(&snapshot, config).unwrap();
    }
    graph
}

fn of_kind<'f>(failures: &'f [Failure], name: &str) -> Vec<&'f Failure> {
    failures.iter().filter(|f| f.type_name() == name).collect()
}

fn scaffold(width: i32) -> Vec<ElementSample> {
    let w = f64::from(width);
    vec![
        sample("/html", 0.0, 0.0, w, 600.0),
        sample("/html/body", 0.0, 0.0, w, 600.0),
    ]
}

#[test]
fn siblings_overlapping_at_one_width_yield_one_collision() {
    let config = Config::default();
    let graph = ingest_sweep(&config, 798..=802, |width| {
        let mut page = scaffold(width);
        page.push(sample("/html/body/div[1]", 0.0, 0.0, 300.0, 100.0));
        let div2_x = if width == 800 { 290.0 } else { 310.0 };
        page.push(sample("/html/body/div[2]", div2_x, 0.0, 300.0, 100.0));
        page
    });

    let failures = detect_failures(&graph, &config);
    let collisions = of_kind(&failures, "Collision");
    assert_eq!(collisions.len(), 1);
    let failure = collisions[0];
    assert_eq!((failure.range.min, failure.range.max), (800, 800));
    let (xpath1, xpath2) = failure.involved_paths(&graph);
    let mut pair = [xpath1, xpath2.unwrap()];
    pair.sort_unstable();
    assert_eq!(pair, ["/html/body/div[1]", "/html/body/div[2]"]);
}

#[test]
fn a_full_sweep_isolates_the_single_failing_width() {
    // 900 down to 700, overlap at exactly 800.
    let config = Config::default();
    let graph = ingest_sweep(&config, 700..=900, |width| {
        let mut page = scaffold(width);
        page.push(sample("/html/body/div[1]", 0.0, 0.0, 300.0, 100.0));
        let div2_x = if width == 800 { 290.0 } else { 310.0 };
        page.push(sample("/html/body/div[2]", div2_x, 0.0, 300.0, 100.0));
        page
    });

    let failures = detect_failures(&graph, &config);
    let collisions = of_kind(&failures, "Collision");
    assert_eq!(collisions.len(), 1);
    assert_eq!((collisions[0].range.min, collisions[0].range.max), (800, 800));
}

#[test]
fn a_stable_side_by_side_layout_produces_no_failures() {
    let config = Config::default();
    let graph = ingest_sweep(&config, 790..=810, |width| {
        let w = f64::from(width);
        let mut page = scaffold(width);
        page.push(sample("/html/body/div[1]", 0.0, 0.0, w / 2.0, 100.0));
        page.push(sample("/html/body/div[2]", w / 2.0, 0.0, w / 2.0, 100.0));
        page
    });
    assert!(detect_failures(&graph, &config).is_empty());
}

#[test]
fn transient_overlap_sliver_is_also_a_small_range() {
    // b is right of a, briefly overlaps, then drops below: the 2-width
    // overlap signature differs from both stable neighbours.
    let config = Config::default();
    let graph = ingest_sweep(&config, 890..=910, |width| {
        let mut page = scaffold(width);
        page.push(sample("/html/body/div[1]", 0.0, 0.0, 300.0, 100.0));
        let b = match width {
            903..=910 => sample("/html/body/div[2]", 310.0, 0.0, 300.0, 100.0),
            901..=902 => sample("/html/body/div[2]", 250.0, 0.0, 300.0, 100.0),
            _ => sample("/html/body/div[2]", 0.0, 150.0, 300.0, 100.0),
        };
        page.push(b);
        page
    });

    let failures = detect_failures(&graph, &config);
    let small = of_kind(&failures, "SmallRange");
    assert_eq!(small.len(), 1);
    assert_eq!((small[0].range.min, small[0].range.max), (901, 902));
    match &small[0].kind {
        FailureKind::SmallRange { signature, .. } => assert!(signature.overlapping),
        other => panic!("unexpected kind {other:?}"),
    }

    let collisions = of_kind(&failures, "Collision");
    assert_eq!(collisions.len(), 1);
    assert_eq!((collisions[0].range.min, collisions[0].range.max), (901, 902));
}

#[test]
fn a_long_lived_relation_change_is_not_a_small_range() {
    let config = Config::default();
    let graph = ingest_sweep(&config, 880..=910, |width| {
        let mut page = scaffold(width);
        page.push(sample("/html/body/div[1]", 0.0, 0.0, 300.0, 100.0));
        let b = if width >= 895 {
            sample("/html/body/div[2]", 310.0, 0.0, 300.0, 100.0)
        } else {
            sample("/html/body/div[2]", 0.0, 150.0, 300.0, 100.0)
        };
        page.push(b);
        page
    });
    assert!(of_kind(&detect_failures(&graph, &config), "SmallRange").is_empty());
}

#[test]
fn row_member_dropping_below_the_row_is_wrapping() {
    let config = Config::default();
    let graph = ingest_sweep(&config, 898..=900, |width| {
        let mut page = scaffold(width);
        page.push(sample("/html/body/div[1]", 0.0, 0.0, 300.0, 100.0));
        page.push(sample("/html/body/div[2]", 300.0, 0.0, 300.0, 100.0));
        if width >= 899 {
            page.push(sample("/html/body/div[3]", 600.0, 0.0, 300.0, 100.0));
        } else {
            page.push(sample("/html/body/div[3]", 0.0, 100.0, 300.0, 100.0));
        }
        page
    });

    let failures = detect_failures(&graph, &config);
    let wrapping = of_kind(&failures, "Wrapping");
    assert_eq!(wrapping.len(), 1);
    assert_eq!((wrapping[0].range.min, wrapping[0].range.max), (898, 898));
    match &wrapping[0].kind {
        FailureKind::Wrapping { node, row } => {
            assert_eq!(graph.path(*node), "/html/body/div[3]");
            let mut row_paths: Vec<&str> = row.iter().map(|&id| graph.path(id)).collect();
            row_paths.sort_unstable();
            assert_eq!(row_paths, ["/html/body/div[1]", "/html/body/div[2]"]);
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn wrapping_respects_the_row_threshold() {
    let config = Config {
        row_threshold: 3,
        ..Config::default()
    };
    let graph = ingest_sweep(&config, 898..=900, |width| {
        let mut page = scaffold(width);
        page.push(sample("/html/body/div[1]", 0.0, 0.0, 300.0, 100.0));
        page.push(sample("/html/body/div[2]", 300.0, 0.0, 300.0, 100.0));
        if width >= 899 {
            page.push(sample("/html/body/div[3]", 600.0, 0.0, 300.0, 100.0));
        } else {
            page.push(sample("/html/body/div[3]", 0.0, 100.0, 300.0, 100.0));
        }
        page
    });
    assert!(of_kind(&detect_failures(&graph, &config), "Wrapping").is_empty());
}

#[test]
fn escaping_a_non_root_ancestor_is_element_protrusion() {
    let config = Config::default();
    let graph = ingest_sweep(&config, 798..=800, |width| {
        let w = f64::from(width);
        let mut page = scaffold(width);
        page.push(sample("/html/body/div[1]", 0.0, 0.0, w, 200.0));
        if width >= 799 {
            page.push(sample("/html/body/div[1]/img[1]", 600.0, 10.0, 100.0, 50.0));
        } else {
            // Pokes out past every ancestor's right edge.
            page.push(sample("/html/body/div[1]/img[1]", 700.0, 10.0, 200.0, 50.0));
        }
        page
    });

    let failures = detect_failures(&graph, &config);
    let protrusions = of_kind(&failures, "ElementProtrusion");
    assert_eq!(protrusions.len(), 1);
    assert_eq!((protrusions[0].range.min, protrusions[0].range.max), (798, 798));
    match &protrusions[0].kind {
        FailureKind::ElementProtrusion { child, parent } => {
            assert_eq!(graph.path(*child), "/html/body/div[1]/img[1]");
            assert_eq!(graph.path(*parent), "/html/body/div[1]");
        }
        other => panic!("unexpected kind {other:?}"),
    }
    assert!(of_kind(&failures, "ViewportProtrusion").is_empty());
}

#[test]
fn escaping_the_document_root_is_viewport_protrusion() {
    let config = Config::default();
    let graph = ingest_sweep(&config, 798..=800, |width| {
        let w = f64::from(width);
        let body_w = if width >= 799 { w } else { 900.0 };
        vec![
            sample("/html", 0.0, 0.0, w, 600.0),
            sample("/html/body", 0.0, 0.0, body_w, 600.0),
            sample("/html/body/div[1]", 10.0, 10.0, 100.0, 50.0),
        ]
    });

    let failures = detect_failures(&graph, &config);
    let viewport = of_kind(&failures, "ViewportProtrusion");
    assert_eq!(viewport.len(), 1);
    assert_eq!((viewport[0].range.min, viewport[0].range.max), (798, 798));
    match &viewport[0].kind {
        FailureKind::ViewportProtrusion { node, root } => {
            assert_eq!(graph.path(*node), "/html/body");
            assert_eq!(graph.path(*root), "/html");
        }
        other => panic!("unexpected kind {other:?}"),
    }
    assert!(of_kind(&failures, "ElementProtrusion").is_empty());
}

#[test]
fn content_below_the_viewport_bottom_never_protrudes() {
    let config = Config::default();
    let graph = ingest_sweep(&config, 798..=800, |width| {
        let w = f64::from(width);
        vec![
            sample("/html", 0.0, 0.0, w, 600.0),
            sample("/html/body", 0.0, 0.0, w, 4000.0),
            sample("/html/body/div[1]", 0.0, 600.0, w, 3000.0),
        ]
    });
    let failures = detect_failures(&graph, &config);
    assert!(of_kind(&failures, "ViewportProtrusion").is_empty());
    assert!(of_kind(&failures, "ElementProtrusion").is_empty());
}

#[test]
fn dump_lists_nodes_with_their_edges_and_ranges() {
    let config = Config::default();
    let graph = ingest_sweep(&config, 799..=800, |width| {
        let w = f64::from(width);
        let mut page = scaffold(width);
        page.push(sample("/html/body/div[1]", 0.0, 0.0, w / 2.0, 100.0));
        page.push(sample("/html/body/div[2]", w / 2.0, 0.0, w / 2.0, 100.0));
        page
    });

    let text = dump::dump(&graph);
    assert!(text.contains("/html/body {[799, 800]}"));
    assert!(text.contains("  parent /html {[799, 800]}"));
    assert!(text.contains("  right /html/body/div[2] {[799, 800]}"));
    assert!(text.contains("  container /html/body {[799, 800]}"));
}
