/// Parse a raw amount. Sign is left alone; rejecting negatives is the
/// caller's business.
pub fn parse_amount(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    s.parse::<f64>().ok().and_then(parse_amount_value)
}

/// Accept an already-numeric amount under the same rules as text input.
pub fn parse_amount_value(val: f64) -> Option<f64> {
    val.is_finite().then_some(val)
}
