//! US-English number and currency formatting.

/// Group the digits of a non-negative integer string in threes.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format `value` with `decimals` fraction digits and grouped thousands.
/// Rounds half away from zero. Non-finite input formats as zero.
fn format_grouped(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value.abs() * scale).round() / scale;
    let negative = value < 0.0 && rounded != 0.0;

    let fixed = format!("{:.*}", decimals, rounded);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn with_dollar(formatted: String) -> String {
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", formatted),
    }
}

/// Whole-dollar price: `850000.0` → `"$850,000"`.
pub fn format_price(amount: f64) -> String {
    with_dollar(format_grouped(amount, 0))
}

/// Dollars and cents: `2528.27` → `"$2,528.27"`.
pub fn format_currency_cents(amount: f64) -> String {
    with_dollar(format_grouped(amount, 2))
}

/// Whole number with separators: `1200` → `"1,200"`.
pub fn format_number(value: f64) -> String {
    format_grouped(value, 0)
}

/// Percentage with a fixed number of decimals: `(20.0, 1)` → `"20.0%"`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{:.*}%", decimals, value)
}

/// Short label for axis ticks and badges: `$500K`, `$1.5M`.
pub fn compact_price(amount: f64) -> String {
    let abs = if amount.is_finite() { amount.abs() } else { 0.0 };
    let sign = if amount < 0.0 { "-" } else { "" };

    // Thresholds sit where one-decimal rounding reaches the next unit
    let (scaled, suffix) = if abs >= 999_950.0 {
        (abs / 1_000_000.0, "M")
    } else if abs >= 999.5 {
        (abs / 1_000.0, "K")
    } else {
        return format!("{}${}", sign, abs.round());
    };

    let text = format!("{:.1}", scaled);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}${}{}", sign, text, suffix)
}
