//! Rendering of totals for display.

use crate::core::Totals;

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// At most three fraction digits, trailing zeros dropped, integer part grouped.
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.3}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let (negative, digits) = match int_part.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, int_part),
    };
    let is_zero = digits.bytes().all(|b| b == b'0') && frac_part.is_empty();

    let mut out = String::new();
    if negative && !is_zero {
        out.push('-');
    }
    out.push_str(&group_digits(digits));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

pub fn format_cost(cost: i64) -> String {
    format!("Rp.{},-", group_thousands(cost))
}

pub fn format_hours(time: f64) -> String {
    format!("{} hours", format_decimal(time))
}

pub fn format_totals(totals: &Totals) -> String {
    format!(
        "Total Cost: {}\nTotal Time: {}",
        format_cost(totals.cost),
        format_hours(totals.time)
    )
}
