
use gradekit::growth::{class_growth_comparison, GrowthPeriodKind, Subject, UNASSIGNED_CLASS};
use test_support::{fall, in_class, norms_with, spring, subject_pair, with_cgp};

#[test]
fn classes_are_summarized_and_ordered_by_index() {
    let norms = norms_with(2024, 4, GrowthPeriodKind::WithinYear, Subject::Reading, 8.0);
    let mut records = Vec::new();
    // 4A: +12 and +8 (average +10, index 1.25).
    // 4B: +4 and -2 (average +1, index 0.13).
    for (id, class, from, to, cgp) in [
        ("a-1", "4A", 200.0, 212.0, Some(82.0)),
        ("a-2", "4A", 195.0, 203.0, Some(64.0)),
        ("b-1", "4B", 202.0, 206.0, Some(45.0)),
        ("b-2", "4B", 207.0, 205.0, None),
    ] {
        let pair = subject_pair(id, 4, Subject::Reading, fall(2024), from, spring(2024), to);
        records.extend(pair.into_iter().map(|r| {
            let r = in_class(r, class);
            match cgp {
                Some(pct) => with_cgp(r, pct),
                None => r,
            }
        }));
    }

    let summaries = class_growth_comparison(
        &records,
        4,
        Subject::Reading,
        fall(2024),
        spring(2024),
        &norms,
    );
    assert_eq!(summaries.len(), 2);

    let best = &summaries[0];
    assert_eq!(best.class_name, "4A");
    assert_eq!(best.student_count, 2);
    assert_eq!(best.average_growth, 10.0);
    assert_eq!(best.expected_growth, Some(8.0));
    assert_eq!(best.growth_index, Some(1.25));
    assert_eq!(best.average_conditional_growth_percentile, Some(73.0));
    assert_eq!(best.distribution.high, 1); // +12 is index 1.5
    assert_eq!(best.distribution.average, 1); // +8 is index 1.0

    let worst = &summaries[1];
    assert_eq!(worst.class_name, "4B");
    assert_eq!(worst.average_growth, 1.0);
    assert_eq!(worst.growth_index, Some(0.13));
    assert_eq!(worst.average_conditional_growth_percentile, Some(45.0));
    assert_eq!(worst.distribution.negative, 1);
    assert_eq!(worst.distribution.low, 1); // +4 is index 0.5
}

#[test]
fn students_without_a_class_form_their_own_bucket() {
    let norms = norms_with(2024, 4, GrowthPeriodKind::WithinYear, Subject::Reading, 8.0);
    let mut records = Vec::new();
    records.extend(
        subject_pair("a-1", 4, Subject::Reading, fall(2024), 200.0, spring(2024), 208.0)
            .into_iter()
            .map(|r| in_class(r, "4A")),
    );
    records.extend(subject_pair(
        "stray", 4, Subject::Reading, fall(2024), 200.0, spring(2024), 216.0,
    ));

    let summaries = class_growth_comparison(
        &records,
        4,
        Subject::Reading,
        fall(2024),
        spring(2024),
        &norms,
    );
    assert_eq!(summaries.len(), 2);
    // The unassigned bucket grew +16, index 2.0: it sorts first.
    assert_eq!(summaries[0].class_name, UNASSIGNED_CLASS);
    assert_eq!(summaries[0].growth_index, Some(2.0));
    assert_eq!(summaries[1].class_name, "4A");
}

#[test]
fn comparison_is_scoped_to_one_grade_and_subject() {
    let norms = norms_with(2024, 4, GrowthPeriodKind::WithinYear, Subject::Reading, 8.0);
    let mut records = Vec::new();
    records.extend(
        subject_pair("a-1", 4, Subject::Reading, fall(2024), 200.0, spring(2024), 208.0)
            .into_iter()
            .map(|r| in_class(r, "4A")),
    );
    // Same class name, different grade: out of scope.
    records.extend(
        subject_pair("g5", 5, Subject::Reading, fall(2024), 210.0, spring(2024), 220.0)
            .into_iter()
            .map(|r| in_class(r, "4A")),
    );
    // Same student in scope, other subject: out of scope.
    records.extend(
        subject_pair("a-1", 4, Subject::LanguageUsage, fall(2024), 190.0, spring(2024), 202.0)
            .into_iter()
            .map(|r| in_class(r, "4A")),
    );

    let summaries = class_growth_comparison(
        &records,
        4,
        Subject::Reading,
        fall(2024),
        spring(2024),
        &norms,
    );
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].student_count, 1);
    assert_eq!(summaries[0].average_growth, 8.0);
}
