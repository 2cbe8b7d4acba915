use reflow_core::{
    Config, ElementSample, Error, RawBox, Range, RepairStrategy, ScriptedDriver, WebDriver,
};
use reflow_repair::{Classification, ProbeLabel, RepairOutcome, classify, repair_failure};
use reflow_rlg::{Failure, Graph, detect_failures};

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

fn page(width: i32, div2_x: f64) -> Vec<ElementSample> {
    let w = f64::from(width);
    vec![
        sample("/html", 0.0, 0.0, w, 600.0),
        sample("/html/body", 0.0, 0.0, w, 600.0),
        sample("/html/body/div[1]", 0.0, 0.0, 300.0, 100.0),
        sample("/html/body/div[2]", div2_x, 0.0, 300.0, 100.0),
    ]
}

/// Overlap at 800 and 801, clean outside.
fn scripted_collision() -> ScriptedDriver {
    let mut driver = ScriptedDriver::new();
    for width in 799..=802 {
        let div2_x = if (800..=801).contains(&width) { 290.0 } else { 310.0 };
        driver.page(width, page(width, div2_x));
    }
    driver.style(
        "/html/body/div[2]",
        &[("display", "block"), ("margin-left", "10px")],
    );
    driver
}

fn build_graph(driver: &mut ScriptedDriver, config: &Config) -> Graph {
    let mut graph = Graph::new();
    for width in (799..=802).rev() {
        driver.set_viewport(width, config.viewport_height).unwrap();
        let snapshot = driver.snapshot().unwrap();
        graph.ingest(&snapshot, config).unwrap();
    }
    graph
}

fn detected_collision(graph: &Graph, config: &Config) -> Failure {
    detect_failures(graph, config)
        .into_iter()
        .find(|f| f.type_name() == "Collision")
        .expect("collision detected")
}

#[test]
fn a_repair_that_fixes_the_layout_is_confirmed_and_rolled_back() {
    let config = Config::default();
    let mut driver = scripted_collision();
    // With the repair stylesheet active, the page renders clean in-range.
    driver.repaired_page(800, page(800, 310.0));
    driver.repaired_page(801, page(801, 310.0));

    let graph = build_graph(&mut driver, &config);
    let failure = detected_collision(&graph, &config);
    assert_eq!(failure.range, Range::new(800, 801));

    let classification = classify(&mut driver, &graph, &failure, &config).unwrap();
    assert!(classification.is_confirmed());

    let outcome = repair_failure(&mut driver, &graph, &failure, &classification, &config).unwrap();
    match &outcome {
        RepairOutcome::Repaired {
            strategy,
            applied_to,
            repair,
            css,
        } => {
            assert_eq!(*strategy, RepairStrategy::Wider);
            assert_eq!(applied_to, "/html/body/div[2]");
            assert_eq!(repair.donor_width, 802);
            assert_eq!(repair.scope, Range::new(800, 801));
            assert!(css.contains("@media (min-width: 800px) and (max-width: 801px)"));
            assert!(css.contains("margin-left: calc((100vw/802)*10);"));
            assert!(css.contains("display: block;"));
        }
        RepairOutcome::Failed => panic!("expected a confirmed repair"),
    }
    assert!(outcome.is_repaired());

    // The stylesheet was removed again; only the CSS text survives.
    assert!(!driver.repair_active());
    assert_eq!(driver.injected.len(), 1);
}

#[test]
fn every_strategy_failing_is_a_terminal_failed_outcome() {
    let config = Config::default();
    let mut driver = scripted_collision();
    // The injected styles change nothing: the overlap persists in-range.
    driver.repaired_page(800, page(800, 290.0));
    driver.repaired_page(801, page(801, 290.0));

    let graph = build_graph(&mut driver, &config);
    let failure = detected_collision(&graph, &config);
    let classification = classify(&mut driver, &graph, &failure, &config).unwrap();

    let outcome = repair_failure(&mut driver, &graph, &failure, &classification, &config).unwrap();
    assert_eq!(outcome, RepairOutcome::Failed);
    assert!(!outcome.is_repaired());

    // Both donor strategies were tried and both stylesheets rolled back.
    assert_eq!(driver.injected.len(), 2);
    assert!(!driver.repair_active());
}

#[test]
fn a_strategy_whose_donor_width_also_fails_is_skipped() {
    let config = Config::default();
    let mut driver = scripted_collision();
    let graph = build_graph(&mut driver, &config);
    let failure = detected_collision(&graph, &config);

    // Both boundary probes came back failing: no usable donor exists.
    let classification = Classification {
        narrower: ProbeLabel::TruePositive,
        min: ProbeLabel::TruePositive,
        mid: ProbeLabel::TruePositive,
        max: ProbeLabel::TruePositive,
        wider: ProbeLabel::TruePositive,
    };
    let outcome = repair_failure(&mut driver, &graph, &failure, &classification, &config).unwrap();
    assert_eq!(outcome, RepairOutcome::Failed);
    assert!(driver.injected.is_empty());
}

#[test]
fn a_repair_whose_failure_resurfaces_on_a_descendant_is_rolled_back() {
    let config = Config::default();
    let mut driver = scripted_collision();
    // Under the stylesheet div[1] collapses away entirely, but its child now
    // reaches into div[2]'s area: the rebuilt mini-graph reports the same
    // collision one level further down the tree.
    for width in 799..=802 {
        let w = f64::from(width);
        driver.repaired_page(width, vec![
            sample("/html", 0.0, 0.0, w, 600.0),
            sample("/html/body", 0.0, 0.0, w, 600.0),
            sample("/html/body/div[1]/p[1]", 250.0, 0.0, 100.0, 100.0),
            sample("/html/body/div[2]", 310.0, 0.0, 300.0, 100.0),
        ]);
    }

    let graph = build_graph(&mut driver, &config);
    let failure = detected_collision(&graph, &config);
    let classification = classify(&mut driver, &graph, &failure, &config).unwrap();
    assert!(classification.is_confirmed());

    let outcome = repair_failure(&mut driver, &graph, &failure, &classification, &config).unwrap();
    assert_eq!(outcome, RepairOutcome::Failed);

    // Both strategies were injected, found equivalent on the descendant path
    // and rolled back.
    assert_eq!(driver.injected.len(), 2);
    assert!(!driver.repair_active());
}

#[test]
fn a_malformed_donor_length_aborts_before_injection() {
    let config = Config::default();
    let mut driver = scripted_collision();
    driver.style("/html/body/div[2]", &[("width", "calc(100% - 10px)")]);

    let graph = build_graph(&mut driver, &config);
    let failure = detected_collision(&graph, &config);
    let classification = classify(&mut driver, &graph, &failure, &config).unwrap();

    let err = repair_failure(&mut driver, &graph, &failure, &classification, &config).unwrap_err();
    assert!(matches!(err, Error::PixelUnit { .. }));
    assert!(driver.injected.is_empty());
}

#[test]
fn the_stylesheet_is_removed_even_when_confirmation_aborts() {
    let config = Config::default();
    let mut driver = ScriptedDriver::new();
    driver.page(802, page(802, 310.0));
    driver.repaired_page(800, page(800, 310.0));
    driver.style("/html/body/div[2]", &[("margin-left", "10px")]);

    let graph = {
        let mut seed = scripted_collision();
        build_graph(&mut seed, &config)
    };
    let failure = detected_collision(&graph, &config);
    let classification = Classification {
        narrower: ProbeLabel::FalsePositive,
        min: ProbeLabel::TruePositive,
        mid: ProbeLabel::TruePositive,
        max: ProbeLabel::TruePositive,
        wider: ProbeLabel::FalsePositive,
    };

    // Width 801 is unscripted, so the confirmation sweep errors out mid-way.
    let result = repair_failure(&mut driver, &graph, &failure, &classification, &config);
    assert!(result.is_err());
    assert_eq!(driver.injected.len(), 1);
    assert!(!driver.repair_active());
}

#[test]
fn the_sibling_starting_further_right_is_the_one_restyled() {
    let config = Config::default();
    let mut driver = scripted_collision();
    driver.style("/html/body/div[1]", &[("width", "300px")]);
    driver.repaired_page(800, page(800, 310.0));
    driver.repaired_page(801, page(801, 310.0));

    let graph = build_graph(&mut driver, &config);
    let failure = detected_collision(&graph, &config);
    let classification = classify(&mut driver, &graph, &failure, &config).unwrap();
    let outcome = repair_failure(&mut driver, &graph, &failure, &classification, &config).unwrap();

    match outcome {
        RepairOutcome::Repaired { applied_to, repair, .. } => {
            assert_eq!(applied_to, "/html/body/div[2]");
            assert_eq!(repair.ramp_selector, "body > div:nth-of-type(2)");
            assert_eq!(repair.ramp.len(), 2);
            assert_eq!(repair.ramp[0].width, 800);
            assert!((repair.ramp[0].ratio - 800.0 / 802.0).abs() < 1e-9);
        }
        RepairOutcome::Failed => panic!("expected a confirmed repair"),
    }
}
