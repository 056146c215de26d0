use nametag_engine::*;

fn request(people: usize, preset: GridPreset) -> GenerationRequest {
    let roster = (0..people)
        .map(|i| RosterEntry::new(i.to_string()).with_field("Name", format!("Person {i}")))
        .collect();
    let mut settings = ProjectSettings::default();
    settings.export.sizing = SizingMode::Grid { preset, gap_mm: 7.0 };
    GenerationRequest::new(vec![Template::builtin()], roster, settings)
}

#[test]
fn test_page_count_matches_presets() {
    assert_eq!(calculate_page_count(10, GridPreset::TwoByTwo), 3);
    assert_eq!(calculate_page_count(7, GridPreset::TwoByThree), 2);
    assert_eq!(calculate_page_count(300, GridPreset::ThreeByThree), 34);
    assert_eq!(calculate_page_count(0, GridPreset::TwoByFour), 1);
}

#[test]
fn test_statistics_include_blanks() {
    let mut request = request(10, GridPreset::TwoByTwo);
    request.settings.export.blank_fill = BlankFill::Count(3);

    let stats = calculate_statistics(&request).unwrap();
    assert_eq!(stats.entries, 10);
    assert_eq!(stats.blank_entries, 3);
    assert_eq!(stats.total_slots, 13);
    assert_eq!(stats.per_page, 4);
    assert_eq!(stats.pages, 4);
    assert!(!stats.multi_template);
}

#[test]
fn test_statistics_agree_with_generation() {
    let request = request(7, GridPreset::TwoByThree);
    let stats = calculate_statistics(&request).unwrap();

    let report =
        compose_document(&request, &FontBook::new(), &mut (), &CancelToken::new()).unwrap();
    assert_eq!(stats.pages, report.page_count);
    assert_eq!(stats.per_page, report.per_page);
}

#[test]
fn test_statistics_reject_invalid_requests() {
    let request = request(0, GridPreset::TwoByTwo);
    assert!(matches!(
        calculate_statistics(&request),
        Err(NametagError::EmptyRoster)
    ));

    let mut request = self::request(3, GridPreset::TwoByTwo);
    request.templates.clear();
    assert!(matches!(
        calculate_statistics(&request),
        Err(NametagError::NoTemplate)
    ));
}
