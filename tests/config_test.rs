use crossword::config::{
    DEFAULT_SIZE, EditorConfig, MAX_SIZE, MIN_SIZE, cell_count, clamp_size, parse_int,
};
use crossword::symmetry::SymmetryMode;

#[test]
fn integers_parse_leniently() {
    assert_eq!(parse_int(Some("12"), 15), 12);
    assert_eq!(parse_int(Some(" 12.9 "), 15), 12);
    assert_eq!(parse_int(Some("-4"), 15), -4);
    assert_eq!(parse_int(Some("abc"), 15), 15);
    assert_eq!(parse_int(Some("   "), 15), 15);
    assert_eq!(parse_int(None, 7), 7);
}

#[test]
fn sizes_clamp_to_supported_range() {
    assert_eq!(clamp_size(-4), MIN_SIZE);
    assert_eq!(clamp_size(0), 3);
    assert_eq!(clamp_size(11), 11);
    assert_eq!(clamp_size(99), MAX_SIZE);
    println!("✓ Sizes clamp into [3, 21]");
}

#[test]
fn form_params_fall_back_to_defaults() {
    let config = EditorConfig::from_params(None, None);
    assert_eq!(config, EditorConfig::default());
    assert_eq!(config.size, DEFAULT_SIZE);
    assert_eq!(config.sym, SymmetryMode::Rotational);

    let config = EditorConfig::from_params(Some("2"), Some("diagonal"));
    assert_eq!(config.size, 3);
    assert_eq!(config.sym, SymmetryMode::Rotational);

    let config = EditorConfig::from_params(Some("40"), Some("ALL"));
    assert_eq!(config.size, 21);
    assert_eq!(config.sym, SymmetryMode::All);

    let config = EditorConfig::from_params(Some("nine"), Some("v"));
    assert_eq!(config.size, DEFAULT_SIZE);
    assert_eq!(config.sym, SymmetryMode::Vertical);
    println!("✓ Create form never fails on odd input");
}

#[test]
fn cell_count_refuses_overflow() {
    assert_eq!(cell_count(21).unwrap(), 441);
    assert_eq!(cell_count(0).unwrap(), 0);
    assert!(cell_count(usize::MAX >> 1).is_err());
}
