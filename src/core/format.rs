//! Price formatting for display (Argentine Spanish conventions).

/// Formats a price as `$` + amount with `.` thousands grouping and `,` decimals.
///
/// Up to three decimals are kept and trailing zeros dropped. Grouping only starts at
/// five integer digits (`1500` stays `1500`, `15000` becomes `15.000`).
#[must_use]
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }

    // Cast safety: finite value, magnitude far below u128::MAX / 1000 for any price
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let thousandths = (value.abs() * 1000.0).round() as u128;
    let whole = thousandths / 1000;
    let fraction = thousandths % 1000;

    let mut out = String::from("$");
    if value < 0.0 && thousandths != 0 {
        out.push('-');
    }
    out.push_str(&group_thousands(&whole.to_string()));
    if fraction != 0 {
        out.push(',');
        out.push_str(format!("{fraction:03}").trim_end_matches('0'));
    }
    out
}

fn group_thousands(digits: &str) -> String {
    if digits.len() < 5 {
        return digits.to_string();
    }
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}
