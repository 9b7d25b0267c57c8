
use gradekit::growth::{
    class_growth_comparison, cross_grade_growth, growth_index, growth_spotlight, student_growth,
    AcademicYear, GrowthNorms, GrowthPeriodKind, Subject,
};
use test_support::{fall, in_class, norms_with, spring, subject_pair};

// When no norm covers a period there is no expected growth and no growth
// index, anywhere. A defaulted "expected = 1" would quietly turn raw RIT
// deltas into fake indexes, so every layer is checked for the absence.

#[test]
fn index_stays_absent_for_any_actual_growth() {
    for actual in [-12.0, -0.5, 0.0, 3.0, 8.0, 40.0] {
        assert_eq!(growth_index(actual, None), None);
    }
}

#[test]
fn summer_growth_reports_actual_only() {
    // A norm table rich in within-year entries proves the point: summer
    // still finds nothing.
    let norms = norms_with(2024, 4, GrowthPeriodKind::WithinYear, Subject::Reading, 8.0);
    let records = subject_pair("s-1", 4, Subject::Reading, spring(2024), 210.0, fall(2025), 206.0);
    let period = gradekit::growth::classify_growth_period(spring(2024), fall(2025)).unwrap();

    let result = student_growth(&records, "s-1", Subject::Reading, &period, &norms).unwrap();
    assert_eq!(result.actual_growth, -4.0);
    assert_eq!(result.expected_growth, None);
    assert_eq!(result.growth_index, None);
}

#[test]
fn cohorts_without_norm_coverage_average_without_indexes() {
    let mut records = Vec::new();
    records.extend(subject_pair("s-1", 4, Subject::Reading, fall(2024), 200.0, spring(2024), 209.0));
    records.extend(subject_pair("s-2", 4, Subject::LanguageUsage, fall(2024), 195.0, spring(2024), 202.0));

    // Norm exists for Reading only.
    let norms = norms_with(2024, 4, GrowthPeriodKind::WithinYear, Subject::Reading, 8.0);
    let cohorts = cross_grade_growth(
        &records,
        fall(2024),
        spring(2024),
        &norms,
        AcademicYear { start: 2024 },
    );
    assert_eq!(cohorts.len(), 1);
    let subjects = &cohorts[0].subjects;
    assert_eq!(subjects.len(), 2);

    let reading = subjects.iter().find(|s| s.subject == Subject::Reading).unwrap();
    assert_eq!(reading.expected_growth, Some(8.0));
    assert_eq!(reading.growth_index, Some(1.13));

    let language = subjects.iter().find(|s| s.subject == Subject::LanguageUsage).unwrap();
    assert_eq!(language.average_actual_growth, 7.0);
    assert_eq!(language.expected_growth, None);
    assert_eq!(language.growth_index, None);
}

#[test]
fn spotlight_and_comparison_carry_the_absence_through() {
    let no_norms = GrowthNorms::new();
    let mut records = Vec::new();
    for (id, to_score) in [("s-1", 212.0), ("s-2", 203.0)] {
        let pair = subject_pair(id, 4, Subject::Reading, fall(2024), 200.0, spring(2024), to_score);
        records.extend(pair.into_iter().map(|r| in_class(r, "4A")));
    }

    let report = growth_spotlight(
        &records,
        Subject::Reading,
        fall(2024),
        spring(2024),
        &no_norms,
        10,
        true,
    );
    for entry in report.top_growers.iter().chain(&report.needs_attention) {
        assert_eq!(entry.growth.expected_growth, None);
        assert_eq!(entry.growth.growth_index, None);
    }

    let classes = class_growth_comparison(
        &records,
        4,
        Subject::Reading,
        fall(2024),
        spring(2024),
        &no_norms,
    );
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].expected_growth, None);
    assert_eq!(classes[0].growth_index, None);
    // Positive growth with no norm is neither low nor high.
    assert_eq!(classes[0].distribution.average, 2);
    assert_eq!(classes[0].distribution.low, 0);
    assert_eq!(classes[0].distribution.high, 0);
}

#[test]
fn a_present_norm_flows_to_every_layer_identically() {
    let norms = norms_with(2024, 4, GrowthPeriodKind::WithinYear, Subject::Reading, 8.0);
    let records: Vec<_> =
        subject_pair("s-1", 4, Subject::Reading, fall(2024), 200.0, spring(2024), 210.0)
            .into_iter()
            .map(|r| in_class(r, "4A"))
            .collect();
    let period = gradekit::growth::classify_growth_period(fall(2024), spring(2024)).unwrap();

    let single = student_growth(&records, "s-1", Subject::Reading, &period, &norms).unwrap();
    assert_eq!(single.growth_index, Some(1.25));

    let cohorts = cross_grade_growth(&records, fall(2024), spring(2024), &norms, AcademicYear { start: 2024 });
    assert_eq!(cohorts[0].subjects[0].growth_index, Some(1.25));

    let classes =
        class_growth_comparison(&records, 4, Subject::Reading, fall(2024), spring(2024), &norms);
    assert_eq!(classes[0].growth_index, Some(1.25));
}
