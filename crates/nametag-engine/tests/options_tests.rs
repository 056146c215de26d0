use nametag_engine::*;

#[test]
fn test_default_export_config() {
    let config = ExportConfig::default();
    assert_eq!(config.paper, PaperSize::A4);
    assert_eq!(config.max_entries, 300);
    assert!(!config.crop_marks);
    assert!(config.validate().is_ok());
}

#[test]
fn test_negative_margin_rejected() {
    let config = ExportConfig {
        margin_mm: -1.0,
        ..Default::default()
    };
    match config.validate() {
        Err(NametagError::Config(msg)) => assert!(msg.contains("Margin")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_grid_preset_labels() {
    for preset in [
        GridPreset::TwoByTwo,
        GridPreset::TwoByThree,
        GridPreset::ThreeByThree,
        GridPreset::TwoByFour,
    ] {
        assert_eq!(preset.label().parse::<GridPreset>().unwrap(), preset);
        let (cols, rows) = preset.dimensions();
        assert_eq!(preset.per_page(), cols * rows);
    }
}

#[test]
fn test_first_template_is_default() {
    let request = GenerationRequest::new(
        vec![Template::image("logo", "logo.png", vec![1u8, 2, 3], 300, 200)],
        vec![RosterEntry::new("1").with_field("Name", "Kim")],
        ProjectSettings::default(),
    );
    assert_eq!(request.default_template().unwrap().id, "logo");
    assert!(!request.is_multi_template());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_settings() {
    use tempfile::NamedTempFile;

    let mut settings = ProjectSettings::default();
    settings.text_fields.push(TextFieldSpec::new("name", "Name", 50.0, 40.0));
    settings.template_column = Some("Role".to_string());
    settings.role_mapping.insert("Staff".to_string(), "staff-template".to_string());
    settings.role_colors.insert("Staff".to_string(), Rgb::parse_or_black("#ef4444"));
    settings.export.paper = PaperSize::Letter;
    settings.export.sizing = SizingMode::Fixed {
        width_mm: 90.0,
        height_mm: 55.0,
    };
    settings.export.blank_fill = BlankFill::Count(4);
    settings.export.crop_marks = true;
    settings.export.watermark = Some("DRAFT".to_string());

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    settings.save(path).await.unwrap();
    let loaded = ProjectSettings::load(path).await.unwrap();

    assert_eq!(loaded, settings);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_rejects_malformed_json() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), b"{ not json").await.unwrap();

    let result = ProjectSettings::load(temp_file.path()).await;
    assert!(matches!(result, Err(NametagError::Config(_))));
}

#[cfg(feature = "serde")]
#[test]
fn test_partial_json_uses_defaults() {
    let settings: ProjectSettings =
        serde_json::from_str(r#"{ "export": { "crop_marks": true } }"#).unwrap();
    assert!(settings.export.crop_marks);
    assert_eq!(settings.export.margin_mm, ExportConfig::default().margin_mm);
}
