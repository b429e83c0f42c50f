use super::*;

#[test]
fn test_parse_whole_euro() {
    assert_eq!(parse_minor_units("349€"), Ok(34900));
    assert_eq!(parse_minor_units("5 €"), Ok(500));
    assert_eq!(parse_minor_units("€12"), Ok(1200));
}

#[test]
fn test_parse_decimal_comma() {
    assert_eq!(parse_minor_units("10,99€"), Ok(1099));
    assert_eq!(parse_minor_units("0,50€"), Ok(50));
}

#[test]
fn test_parse_decimal_dot() {
    assert_eq!(parse_minor_units("10.99€"), Ok(1099));
    assert_eq!(parse_minor_units("$24.95"), Ok(2495));
}

#[test]
fn test_parse_thousands_separator() {
    // A lone separator with three trailing digits is a thousands mark
    assert_eq!(parse_minor_units("1.234€"), Ok(123400));
    assert_eq!(parse_minor_units("1,234€"), Ok(123400));
    assert_eq!(parse_minor_units("1.234,50€"), Ok(123450));
    assert_eq!(parse_minor_units("1,234.50€"), Ok(123450));
}

#[test]
fn test_parse_rounds_half_up() {
    assert_eq!(parse_minor_units("1.234,505€"), Ok(123451));
    assert_eq!(parse_minor_units("10,9999€"), Ok(1100));
}

#[test]
fn test_parse_rejects_empty_and_garbage() {
    assert_eq!(parse_minor_units(""), Err(PriceParseError::Empty));
    assert_eq!(parse_minor_units("€"), Err(PriceParseError::Empty));
    assert_eq!(parse_minor_units("free"), Err(PriceParseError::Empty));
}

#[test]
fn test_parse_rejects_non_positive() {
    assert_eq!(parse_minor_units("0€"), Err(PriceParseError::NonPositive(0)));
    assert_eq!(
        parse_minor_units("-5€"),
        Err(PriceParseError::NonPositive(-500))
    );
}

#[test]
fn test_sanitize_smart_quotes() {
    assert_eq!(sanitize_title("Kuju \u{201C}K\u{00E4}rp\u{201D}"), "Kuju \"Kärp\"");
    assert_eq!(sanitize_title("K\u{2019}ula"), "K'ula");
}

#[test]
fn test_sanitize_keeps_unicode_letters() {
    assert_eq!(sanitize_title("Käsitöö šall"), "Käsitöö šall");
}

#[test]
fn test_sanitize_drops_disallowed_symbols() {
    assert_eq!(sanitize_title("Vaas © 2024 <premium>"), "Vaas 2024 premium");
    assert_eq!(sanitize_title("Tass #3"), "Tass 3");
}

#[test]
fn test_sanitize_collapses_whitespace() {
    assert_eq!(sanitize_title("  Savi   kauss \t"), "Savi kauss");
}

#[test]
fn test_sanitize_normalizes_dashes() {
    assert_eq!(sanitize_title("Sall \u{2014} punane"), "Sall - punane");
}

#[test]
fn test_sanitize_empty_result() {
    assert_eq!(sanitize_title("©®™"), "");
}
