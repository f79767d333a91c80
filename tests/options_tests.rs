use pdf_compose::{Align, CellStyle, Color, ComposeError, ImagePlacement, TextRegion, TextStyle};

#[test]
fn text_style_defaults() {
    let style = TextStyle::default();
    assert_eq!(style.font, "sans-serif");
    assert_eq!(style.style, "");
    assert_eq!(style.color, Color::BLACK);
    assert_eq!(style.size, 12.0);
    assert_eq!(style.pos, (0.0, 0.0));
}

#[test]
fn cell_style_defaults() {
    let cell = CellStyle::default();
    assert_eq!(cell.border, 0.0);
    assert_eq!(cell.align, Align::Justify);
    assert!(!cell.fill);
}

#[test]
fn image_placement_defaults_to_zero() {
    let placement = ImagePlacement::default();
    assert_eq!((placement.x, placement.y), (0.0, 0.0));
    assert_eq!((placement.w, placement.h), (0.0, 0.0));
}

#[test]
fn text_region_defaults() {
    let region = TextRegion::default();
    assert_eq!(region.page, 1);
    assert_eq!(region.dpi, 72);
}

#[test]
fn align_parses_flags() {
    assert_eq!(Align::from_flag("L").unwrap(), Align::Left);
    assert_eq!(Align::from_flag("C").unwrap(), Align::Center);
    assert_eq!(Align::from_flag("R").unwrap(), Align::Right);
    assert_eq!(Align::from_flag("J").unwrap(), Align::Justify);
    assert!(matches!(
        Align::from_flag("X"),
        Err(ComposeError::InvalidArgument(_))
    ));
}

#[test]
fn builder_methods_compose() {
    let style = TextStyle::default()
        .with_font("serif")
        .with_style("B")
        .with_color(Color::rgb(30, 30, 30))
        .with_size(15.0)
        .with_pos(10.0, 20.0);
    assert_eq!(style.font, "serif");
    assert_eq!(style.style, "B");
    assert_eq!(style.color, Color::rgb(30, 30, 30));
    assert_eq!(style.size, 15.0);
    assert_eq!(style.pos, (10.0, 20.0));
}

#[test]
fn signature_options_redact_the_password() {
    use pdf_compose::SignatureOptions;
    let options = SignatureOptions::new("cert.pem", "key.pem")
        .with_password("hunter2")
        .with_cert_type(1)
        .with_info("Name", "Test Signer")
        .with_approval(true);
    assert_eq!(options.cert_type, 1);
    assert!(options.approval);
    let debug = format!("{options:?}");
    assert!(debug.contains("[REDACTED]"));
    assert!(!debug.contains("hunter2"));
}

#[cfg(feature = "serde")]
#[test]
fn save_and_load_text_style() {
    use tempfile::NamedTempFile;

    let style = TextStyle::default()
        .with_font("monospace")
        .with_size(9.5)
        .with_color(Color::rgb(1, 2, 3))
        .with_pos(4.0, 5.0);

    let temp = NamedTempFile::new().unwrap();
    style.save(temp.path()).unwrap();
    let loaded = TextStyle::load(temp.path()).unwrap();
    assert_eq!(loaded, style);
}
