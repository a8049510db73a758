mod common;

use common::fixtures::{BundleFixture, StrokeSpec};
use common::{convert_fixture, convert_input, default_options, TestResult};
use rmpdf::bundle::{BundleError, CompositionError};
use rmpdf::types::Color;
use rmpdf::{convert_file, ConvertError, ConvertOptions, FormatErrorPolicy};
use serde_json::json;

const ERASER: u32 = 6;
const FINELINER: u32 = 4;
const PEN: u32 = 2;
const BALLPOINT: u32 = 15;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn eraser_strokes_are_never_drawn() -> TestResult {
    let fixture = BundleFixture::new(1);
    fixture
        .write_descriptors()
        .write_background(1)
        .write_strokes(0, &[vec![StrokeSpec::line(ERASER)], vec![StrokeSpec::line(FINELINER)]]);

    let pdf = convert_fixture(&fixture, &default_options())?;
    assert_eq!(pdf.page_count(), 1);
    assert_eq!(pdf.stroke_count(1), 1);
    assert_eq!(pdf.layer_names(), vec!["Background", "Layer 1", "Layer 2"]);
    assert_eq!(pdf.report.pages_drawn, 1);
    Ok(())
}

#[test]
fn inserted_pages_use_the_template() -> TestResult {
    let fixture = BundleFixture::new(3).redirection(&[0, -1, 1], 2);
    fixture.write_descriptors().write_background(2);

    let pdf = convert_fixture(&fixture, &default_options())?;
    assert_eq!(pdf.page_count(), 3);
    assert_eq!(pdf.report.inserted_pages, vec![2]);
    // forms are named in import order: document page 1, template, document page 2
    assert_eq!(pdf.forms(1), vec!["Bg0"]);
    assert_eq!(pdf.forms(2), vec!["Bg1"]);
    assert_eq!(pdf.forms(3), vec!["Bg2"]);
    Ok(())
}

#[test]
fn bundles_without_a_document_reuse_one_template_page() -> TestResult {
    let fixture = BundleFixture::new(3);
    fixture.write_descriptors();

    let pdf = convert_fixture(&fixture, &default_options())?;
    assert_eq!(pdf.page_count(), 3);
    for page in 1..=3 {
        assert_eq!(pdf.forms(page), vec!["Bg0"]);
    }
    assert!(pdf.report.inserted_pages.is_empty());
    Ok(())
}

#[test]
fn missing_template_is_a_configuration_error() {
    let fixture = BundleFixture::new(1);
    fixture.write_descriptors();

    let err = convert_fixture(&fixture, &ConvertOptions::new()).err();
    assert!(matches!(err, Some(ConvertError::MissingTemplate)));
}

#[test]
fn real_backgrounds_need_no_template() -> TestResult {
    let fixture = BundleFixture::new(2);
    fixture.write_descriptors().write_background(2);

    let pdf = convert_fixture(&fixture, &ConvertOptions::new())?;
    assert_eq!(pdf.page_count(), 2);
    assert_eq!(pdf.forms(2), vec!["Bg1"]);
    Ok(())
}

#[test]
fn unreadable_stroke_files_are_skipped_by_default() -> TestResult {
    let fixture = BundleFixture::new(2);
    fixture
        .write_descriptors()
        .write_background(2)
        .write_raw_strokes("page-0", b"not a stroke file at all, just some text padding it out")
        .write_strokes(1, &[vec![StrokeSpec::line(PEN)]]);

    let pdf = convert_fixture(&fixture, &default_options())?;
    assert_eq!(pdf.page_count(), 2);
    assert_eq!(pdf.report.pages_skipped, 1);
    assert_eq!(pdf.report.pages_drawn, 1);
    assert_eq!(pdf.stroke_count(1), 0);
    assert_eq!(pdf.stroke_count(2), 1);
    Ok(())
}

#[test]
fn strict_policy_aborts_on_unreadable_stroke_files() {
    let fixture = BundleFixture::new(2);
    fixture
        .write_descriptors()
        .write_background(2)
        .write_raw_strokes("page-1", b"reMarkable .lines file, version=6          \0\0\0\0");

    let options = default_options().with_format_policy(FormatErrorPolicy::Abort);
    let err = convert_fixture(&fixture, &options).err();
    assert!(matches!(err, Some(ConvertError::Format { page: 2, .. })));
}

#[test]
fn truncated_stroke_files_keep_complete_strokes() -> TestResult {
    let fixture = BundleFixture::new(1);
    let full = common::fixtures::encode_lines(&[vec![StrokeSpec::line(PEN), StrokeSpec::line(PEN)]]);
    // drop the second stroke's final segment
    let cut = &full[..full.len() - 10];
    fixture.write_descriptors().write_background(1).write_raw_strokes("page-0", cut);

    let pdf = convert_fixture(&fixture, &default_options())?;
    assert_eq!(pdf.report.truncated_files, 1);
    assert_eq!(pdf.report.pages_drawn, 1);
    assert_eq!(pdf.stroke_count(1), 1);
    Ok(())
}

#[test]
fn layer_names_come_from_page_metadata_and_are_shared() -> TestResult {
    let fixture = BundleFixture::new(2);
    fixture
        .write_descriptors()
        .write_background(2)
        .write_strokes(0, &[vec![StrokeSpec::line(PEN)], vec![]])
        .write_layer_names(0, &["Ink", "Notes"])
        .write_strokes(1, &[vec![StrokeSpec::line(PEN)]])
        .write_layer_names(1, &["Ink"]);

    let pdf = convert_fixture(&fixture, &default_options())?;
    assert_eq!(pdf.layer_names(), vec!["Background", "Ink", "Notes"]);
    Ok(())
}

#[test]
fn stroke_files_named_by_index_are_found() -> TestResult {
    let fixture = BundleFixture::new(2);
    let lines = common::fixtures::encode_lines(&[vec![StrokeSpec::line(PEN)]]);
    fixture
        .write_descriptors()
        .write_background(2)
        .write_raw_strokes("1", &lines);

    let pdf = convert_fixture(&fixture, &default_options())?;
    assert_eq!(pdf.stroke_count(1), 0);
    assert_eq!(pdf.stroke_count(2), 1);
    Ok(())
}

#[test]
fn landscape_pages_swap_dimensions() -> TestResult {
    let fixture = BundleFixture::new(1).landscape();
    fixture.write_descriptors().write_background(1);

    let pdf = convert_fixture(&fixture, &default_options())?;
    let (width, height) = common::pdf_assertions::media_box_size(&pdf.doc, 1).ok_or("no media box")?;
    assert!(width > height);
    assert!((height - 631.07).abs() < 0.05);
    Ok(())
}

#[test]
fn unknown_pens_are_drawn_and_reported() -> TestResult {
    let fixture = BundleFixture::new(1);
    fixture
        .write_descriptors()
        .write_strokes(0, &[vec![StrokeSpec::line(99), StrokeSpec::line(99), StrokeSpec::line(PEN)]]);

    let pdf = convert_fixture(&fixture, &default_options())?;
    assert_eq!(pdf.stroke_count(1), 3);
    assert_eq!(pdf.report.unknown_pens.get(&99), Some(&2));
    assert_eq!(pdf.report.unknown_pens.len(), 1);
    Ok(())
}

#[test]
fn settings_file_overrides_pen_widths() -> TestResult {
    let fixture = BundleFixture::new(1);
    fixture
        .write_descriptors()
        .write_strokes(0, &[vec![
            StrokeSpec::new(FINELINER, 2.0, &[(0.0, 0.0), (10.0, 10.0)]),
            StrokeSpec::new(FINELINER, 2.125, &[(0.0, 0.0), (10.0, 10.0)]),
        ]])
        .write_json(
            "settings.json",
            &json!({
                "all": [{ "pen": "fineliner", "weight": "standard", "width": 4.0, "opacity": 1.0 }]
            }),
        );

    let options = default_options().with_settings_file(fixture.root().join("settings.json"))?;
    let pdf = convert_fixture(&fixture, &options)?;
    let widths: Vec<f32> = pdf.operands(1, "w").into_iter().filter_map(|o| o.first().copied()).collect();
    assert_eq!(widths.len(), 2);
    assert!(approx(widths[0], 4.0));
    // broad is derived from the standard entry
    assert!(approx(widths[1], 4.0 * 2.125 / 2.0));
    Ok(())
}

#[test]
fn yaml_settings_apply_per_layer() -> TestResult {
    let fixture = BundleFixture::new(1);
    fixture.write_descriptors().write_strokes(0, &[
        vec![StrokeSpec::new(FINELINER, 2.0, &[(0.0, 0.0), (10.0, 10.0)])],
        vec![StrokeSpec::new(FINELINER, 2.0, &[(0.0, 0.0), (10.0, 10.0)])],
    ]);
    let settings = fixture.output("settings.yaml");
    std::fs::write(
        &settings,
        "all:\n  - pen: fineliner\n    weight: standard\n    width: 4.0\n\
         \"2\":\n  - pen: fineliner\n    weight: standard\n    width: 0.5\n",
    )?;

    let options = default_options().with_settings_file(&settings)?;
    let pdf = convert_fixture(&fixture, &options)?;
    let widths: Vec<f32> = pdf.operands(1, "w").into_iter().filter_map(|o| o.first().copied()).collect();
    assert_eq!(widths.len(), 2);
    assert!(approx(widths[0], 4.0));
    assert!(approx(widths[1], 0.5));
    Ok(())
}

#[test]
fn invalid_settings_fail_before_conversion() {
    let fixture = BundleFixture::new(1);
    fixture.write_json(
        "settings.json",
        &json!({ "all": [{ "pen": "quill", "weight": "standard", "width": 1.0, "opacity": 1.0 }] }),
    );
    let err = ConvertOptions::new()
        .with_settings_file(fixture.root().join("settings.json"))
        .err();
    assert!(matches!(err, Some(ConvertError::StyleConfig(_))));
}

#[test]
fn layer_colours_apply_to_overridable_pens_only() -> TestResult {
    let fixture = BundleFixture::new(1);
    fixture
        .write_descriptors()
        .write_strokes(0, &[vec![StrokeSpec::line(PEN), StrokeSpec::line(BALLPOINT)]]);

    let options = default_options().with_layer_colors(vec![Some(Color::rgb(255, 0, 0))]);
    let pdf = convert_fixture(&fixture, &options)?;
    let colors = pdf.operands(1, "RG");
    assert_eq!(colors.len(), 2);
    assert!(approx(colors[0][0], 1.0) && approx(colors[0][1], 0.0) && approx(colors[0][2], 0.0));
    // ballpoint keeps slate grey
    assert!(approx(colors[1][0], 112.0 / 255.0));
    Ok(())
}

#[test]
fn translucent_pens_set_and_reset_alpha() -> TestResult {
    let fixture = BundleFixture::new(1);
    fixture
        .write_descriptors()
        .write_strokes(0, &[vec![StrokeSpec::line(5)]]);

    let pdf = convert_fixture(&fixture, &default_options())?;
    let alpha_ops = pdf.operators(1).iter().filter(|op| op.as_str() == "gs").count();
    assert_eq!(alpha_ops, 2);
    Ok(())
}

#[test]
fn redirection_length_mismatch_aborts() {
    let fixture = BundleFixture::new(3).redirection(&[0, -1], 2);
    fixture.write_descriptors();

    let err = convert_fixture(&fixture, &default_options()).err();
    assert!(matches!(
        err,
        Some(ConvertError::Composition(CompositionError::RedirectionLengthMismatch {
            expected: 3,
            found: 2
        }))
    ));
}

#[test]
fn bundles_without_content_are_rejected() {
    let fixture = BundleFixture::new(1);
    fixture.write_background(1);

    let err = convert_fixture(&fixture, &default_options()).err();
    assert!(matches!(err, Some(ConvertError::Bundle(BundleError::MissingContent(_)))));
}

#[test]
fn older_bundles_without_metadata_convert() -> TestResult {
    let fixture = BundleFixture::new(1).without_metadata();
    fixture.write_descriptors().write_strokes(0, &[vec![StrokeSpec::line(PEN)]]);

    let pdf = convert_fixture(&fixture, &default_options())?;
    assert_eq!(pdf.stroke_count(1), 1);
    Ok(())
}

#[test]
fn convert_file_writes_only_on_success() -> TestResult {
    let fixture = BundleFixture::new(1);
    fixture.write_descriptors().write_strokes(0, &[vec![StrokeSpec::line(PEN)]]);

    let output = fixture.output("out.pdf");
    let mut input = fixture.input();
    input.set_extension("pdf");
    let report = convert_file(&input, &output, &default_options())?;
    assert_eq!(report.pages, 1);
    let bytes = std::fs::read(&output)?;
    assert!(bytes.starts_with(b"%PDF-"));

    let failed = fixture.output("failed.pdf");
    let err = convert_file(fixture.input(), &failed, &ConvertOptions::new()).err();
    assert!(matches!(err, Some(ConvertError::MissingTemplate)));
    assert!(!failed.exists());
    Ok(())
}

#[test]
fn zipped_bundles_convert_like_directories() -> TestResult {
    let fixture = BundleFixture::new(3).redirection(&[0, -1, 1], 2);
    fixture
        .write_descriptors()
        .write_background(2)
        .write_strokes(0, &[vec![StrokeSpec::line(PEN)], vec![StrokeSpec::line(FINELINER)]])
        .write_layer_names(0, &["Ink", "Notes"]);

    let from_dir = convert_fixture(&fixture, &default_options())?;
    let from_zip = convert_input(fixture.zip(), &default_options())?;
    assert_eq!(from_zip.page_count(), 3);
    assert_eq!(from_zip.layer_names(), from_dir.layer_names());
    assert_eq!(from_zip.stroke_count(1), 2);
    assert_eq!(from_zip.report.inserted_pages, vec![2]);
    assert_eq!(from_zip.forms(3), vec!["Bg2"]);
    Ok(())
}

#[test]
fn zipped_bundles_without_metadata_convert() -> TestResult {
    let fixture = BundleFixture::new(1).without_metadata();
    fixture.write_descriptors().write_strokes(0, &[vec![StrokeSpec::line(PEN)]]);

    let pdf = convert_input(fixture.zip(), &default_options())?;
    assert_eq!(pdf.stroke_count(1), 1);
    assert_eq!(pdf.layer_names(), vec!["Background", "Layer 1"]);
    Ok(())
}
