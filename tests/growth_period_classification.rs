
use gradekit::growth::{classify_growth_period, GrowthPeriodKind, Term};
use test_support::{fall, spring, winter};

#[test]
fn the_three_recognized_windows_classify() {
    let within = classify_growth_period(fall(2024), spring(2024)).unwrap();
    assert_eq!(within.kind, GrowthPeriodKind::WithinYear);
    assert_eq!(within.grade_increment(), 0);
    assert_eq!(within.norm_year().to_string(), "2024-2025");

    let yearly = classify_growth_period(fall(2024), fall(2025)).unwrap();
    assert_eq!(yearly.kind, GrowthPeriodKind::YearOverYear);
    assert_eq!(yearly.grade_increment(), 1);
    assert_eq!(yearly.norm_year().to_string(), "2024-2025");
    assert_eq!(yearly.ending_year().to_string(), "2025-2026");

    let summer = classify_growth_period(spring(2024), fall(2025)).unwrap();
    assert_eq!(summer.kind, GrowthPeriodKind::Summer);
    assert_eq!(summer.grade_increment(), 1);
    assert!(!summer.kind.has_official_norm());
}

#[test]
fn everything_else_is_unrecognized() {
    let unrecognized = [
        (fall(2024), winter(2024)),
        (winter(2024), spring(2024)),
        (fall(2024), fall(2024)),
        (spring(2024), fall(2024)),   // reversed in time
        (fall(2024), spring(2025)),   // crosses a year boundary
        (fall(2024), fall(2026)),     // two-year gap
        (spring(2024), spring(2024)),
    ];
    for (from, to) in unrecognized {
        assert!(
            classify_growth_period(from, to).is_none(),
            "{from} -> {to} should not classify"
        );
    }
}

#[test]
fn records_with_unparseable_terms_never_reach_classification() {
    // The parse step is the gate: these strings produce no Term at all.
    for bad in [
        "Fall 24-25",
        "Autumn 2024-2025",
        "Fall  ",
        "2024-2025 Fall",
        "Fall 2147483647--2147483648",
    ] {
        assert_eq!(Term::parse(bad), None, "{bad:?} should not parse");
    }
    // And a good string round-trips into the classifier.
    let from = Term::parse("Fall 2024-2025").unwrap();
    let to = Term::parse("Spring 2024-2025").unwrap();
    assert!(classify_growth_period(from, to).is_some());
}
