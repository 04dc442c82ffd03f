//! Number formatting for the calculator display.
//!
//! Every numeric-to-display conversion goes through [`format_number`], so the
//! precision policy lives in exactly one place.

/// Decimal places kept when formatting a non-integer value.
pub const DISPLAY_PRECISION: i32 = 10;

/// Convert a value into the canonical display string.
///
/// Integral values print without a decimal point. Anything else is rounded
/// to [`DISPLAY_PRECISION`] places first, which hides binary floating point
/// noise such as `0.1 + 0.2 = 0.30000000000000004`.
///
/// # Example
///
/// ```rust
/// use reckon::core::format_number;
///
/// assert_eq!(format_number(42.0), "42");
/// assert_eq!(format_number(0.1 + 0.2), "0.3");
/// assert_eq!(format_number(-0.0), "0");
/// ```
pub fn format_number(value: f64) -> String {
    if value == value.floor() {
        return render(value);
    }

    let scale = 10f64.powi(DISPLAY_PRECISION);
    render((value * scale).round() / scale)
}

/// Parse a display string back into a number.
///
/// Text that is not a numeral (`"Error"`, a lone `"-"`) reads as zero.
///
/// # Example
///
/// ```rust
/// use reckon::core::parse_display;
///
/// assert_eq!(parse_display("12.5"), 12.5);
/// assert_eq!(parse_display("7."), 7.0);
/// assert_eq!(parse_display("Error"), 0.0);
/// ```
pub fn parse_display(display: &str) -> f64 {
    match display.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

// f64's Display never uses exponent notation and prints the shortest
// round-tripping digits, so only negative zero needs special casing.
fn render(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
