//! Display helpers for tiles, tooltips and the projection receipt.

const KIB: f64 = 1024.0;

/// Scales a byte count to MB, GB or TB with two decimals.
pub fn format_bytes(bytes: f64) -> String {
    let (scaled, unit) = if bytes < KIB.powi(3) {
        (bytes / KIB.powi(2), "MB")
    } else if bytes < KIB.powi(4) {
        (bytes / KIB.powi(3), "GB")
    } else {
        (bytes / KIB.powi(4), "TB")
    };
    format!("{} {}", plain_decimal(round_to(scaled, 2)), unit)
}

/// Scales a count to k/M/B/T with one decimal; small values keep digit grouping.
pub fn format_number(value: f64) -> String {
    const SCALES: [(f64, &str); 4] = [
        (1_000_000_000_000.0, "T"),
        (1_000_000_000.0, "B"),
        (1_000_000.0, "M"),
        (1_000.0, "k"),
    ];
    for (scale, suffix) in SCALES {
        if value >= scale {
            return format!("{}{}", compact_decimal(round_to(value / scale, 1)), suffix);
        }
    }
    group_thousands(&format!("{}", value.trunc() as i64))
}

/// Credits with thousands separators and two decimals, e.g. `1,234.50`.
pub fn format_credits(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    match fixed.split_once('.') {
        Some((whole, fraction)) => format!("{}.{}", group_thousands(whole), fraction),
        None => group_thousands(&fixed),
    }
}

/// Dollar amount, e.g. `$1,234.50`.
pub fn format_usd(value: f64) -> String {
    format!("${}", format_credits(value))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Shortest decimal form that always keeps a fractional part (`2` -> `2.0`).
fn plain_decimal(value: f64) -> String {
    let text = format!("{}", value);
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

/// Grouped decimal with trailing zeros dropped (`1.0` -> `1`, `1234.5` -> `1,234.5`).
fn compact_decimal(value: f64) -> String {
    let text = format!("{}", value);
    match text.split_once('.') {
        Some((whole, fraction)) => format!("{}.{}", group_thousands(whole), fraction),
        None => group_thousands(&text),
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}
