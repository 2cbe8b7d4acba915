use reflow_core::Range;
use reflow_repair::css::{CssRule, Declaration, Repair};
use reflow_repair::{
    CSV_HEADER, Classification, FailureRow, ProbeLabel, RepairStatistics, css_file_name,
};

fn classification() -> Classification {
    Classification {
        narrower: ProbeLabel::FalsePositive,
        min: ProbeLabel::TruePositive,
        mid: ProbeLabel::TruePositive,
        max: ProbeLabel::FalsePositive,
        wider: ProbeLabel::FalsePositive,
    }
}

#[test]
fn header_and_rows_have_the_same_column_count() {
    assert_eq!(CSV_HEADER.split(',').count(), 15);

    let row = FailureRow {
        webpage: "shop".to_string(),
        run: 1,
        fid: 3,
        type_name: "Collision",
        range_min: 800,
        range_max: 801,
        xpath1: "/html/body/div[1]".to_string(),
        xpath2: Some("/html/body/div[2]".to_string()),
        classification: Some(classification()),
        repair_applied: "Repaired",
        repair_applied_to: Some("/html/body/div[2]".to_string()),
    };
    assert_eq!(row.to_csv().split(',').count(), 15);
    assert_eq!(
        row.to_csv(),
        "shop,1,3,Collision,800,801,/html/body/div[1],/html/body/div[2],FP,TP,TP,FP,FP,Repaired,/html/body/div[2]"
    );
}

#[test]
fn absent_fields_are_dashes() {
    let row = FailureRow {
        webpage: "shop".to_string(),
        run: 2,
        fid: 1,
        type_name: "ViewportProtrusion",
        range_min: 320,
        range_max: 330,
        xpath1: "/html/body".to_string(),
        xpath2: None,
        classification: None,
        repair_applied: "-",
        repair_applied_to: None,
    };
    assert_eq!(
        row.to_csv(),
        "shop,2,1,ViewportProtrusion,320,330,/html/body,-,-,-,-,-,-,-,-"
    );
}

#[test]
fn fields_containing_commas_or_quotes_are_quoted() {
    let row = FailureRow {
        webpage: "a,b\"c".to_string(),
        run: 1,
        fid: 1,
        type_name: "Wrapping",
        range_min: 400,
        range_max: 410,
        xpath1: "/html/body/ul[1]/li[3]".to_string(),
        xpath2: None,
        classification: None,
        repair_applied: "-",
        repair_applied_to: None,
    };
    assert!(row.to_csv().starts_with("\"a,b\"\"c\","));
}

#[test]
fn css_artifacts_are_bucketed_by_outcome() {
    assert_eq!(css_file_name("shop", 3, true), "repaired/shop-3.css");
    assert_eq!(css_file_name("shop", 4, false), "failed/shop-4.css");
}

#[test]
fn statistics_accumulate_per_category_and_in_total() {
    let mut stats = RepairStatistics::new();
    stats.record_detected("Collision");
    stats.record_detected("Collision");
    stats.record_detected("Wrapping");
    stats.record_confirmed("Collision");
    stats.record_repair("Collision", true);
    stats.record_repair("Wrapping", false);

    let collisions = stats.category("Collision");
    assert_eq!(collisions.detected, 2);
    assert_eq!(collisions.confirmed, 1);
    assert_eq!(collisions.repaired, 1);
    assert_eq!(collisions.failed, 0);
    assert_eq!(stats.category("SmallRange").detected, 0);

    let totals = stats.totals();
    assert_eq!(totals.detected, 3);
    assert_eq!(totals.repaired, 1);
    assert_eq!(totals.failed, 1);

    let text = stats.to_string();
    assert!(text.contains("Collision: detected=2 confirmed=1 repaired=1 failed=0"));
    assert!(text.contains("Wrapping: detected=1 confirmed=0 repaired=0 failed=1"));
}

#[test]
fn repairs_serialize_to_json_for_report_archives() {
    let repair = Repair {
        scope: Range::new(800, 801),
        donor_width: 802,
        rules: vec![CssRule {
            selector: "body > div:nth-of-type(2)".to_string(),
            declarations: vec![Declaration {
                property: "width".to_string(),
                value: "calc((100vw/802)*200)".to_string(),
                scaled: true,
            }],
        }],
        ramp_selector: "body > div:nth-of-type(2)".to_string(),
        ramp: Vec::new(),
    };
    let json = serde_json::to_string(&repair).unwrap();
    assert!(json.contains("\"donor_width\":802"));
    assert!(json.contains("\"scaled\":true"));
}
