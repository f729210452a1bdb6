//! de-DE number, currency and date formatting.

use chrono::Datelike;

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `1234567` -> `1.234.567`
pub fn format_number(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Euro amounts with up to two fraction digits, trailing zeros dropped:
/// `1000000.0` -> `1.000.000 €`, `1234.5` -> `1.234,5 €`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "0 €".to_string();
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands(&(cents / 100).to_string());
    let fraction = cents % 100;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    if fraction == 0 {
        format!("{}{} €", sign, whole)
    } else {
        let fraction = format!("{:02}", fraction);
        format!("{}{},{} €", sign, whole, fraction.trim_end_matches('0'))
    }
}

/// Numeric day.month.year without zero padding, e.g. `15.3.2024`.
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{}.{}.{}", date.day(), date.month(), date.year())
}
