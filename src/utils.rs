//! Number formatting shared by histogram tables, tick labels and SVG output.

const SI_PREFIXES: [(f64, &str); 7] = [
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
    (1.0, ""),
    (1e-3, "m"),
    (1e-6, "µ"),
    (1e-9, "n"),
];

/// Picks the SI scale and prefix for values of the given magnitude.
///
/// Magnitudes below one nano still use the nano prefix; zero uses no prefix.
pub fn si_prefix(magnitude: f64) -> (f64, &'static str) {
    let magnitude = magnitude.abs();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return (1.0, "");
    }
    SI_PREFIXES
        .iter()
        .copied()
        .find(|&(scale, _)| magnitude >= scale)
        .unwrap_or(SI_PREFIXES[SI_PREFIXES.len() - 1])
}

/// Formats `value / scale` with at most `decimals` decimals, followed by `prefix`.
pub fn format_scaled(value: f64, (scale, prefix): (f64, &str), decimals: usize) -> String {
    let mut text = trim_decimals(format!("{:.*}", decimals, value / scale));
    if text != "0" {
        text.push_str(prefix);
    }
    text
}

/// Formats a value with its own SI prefix and up to three decimals.
pub fn format_si(value: f64) -> String {
    format_scaled(value, si_prefix(value), 3)
}

/// Formats a coordinate for vector output with two decimals, trimmed.
pub fn format_number(value: f64) -> String {
    trim_decimals(format!("{value:.2}"))
}

fn trim_decimals(mut text: String) -> String {
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}
