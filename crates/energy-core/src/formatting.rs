/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use energy_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // "-0.00" reads badly; only mark values that stay non-zero after rounding.
    if value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format an energy amount as `"1,234.56 kWh"`.
pub fn format_kwh(kwh: f64) -> String {
    format!("{} kWh", format_number(kwh, 2))
}

/// Format a monetary amount with `symbol` in front and two decimals.
///
/// The symbol is display-only; no conversion takes place.
///
/// ```
/// use energy_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56, "R$"), "R$1,234.56");
/// assert_eq!(format_currency(-9.99, "$"), "-$9.99");
/// ```
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let body = format_number(amount, 2);
    match body.strip_prefix('-') {
        Some(abs) => format!("-{symbol}{abs}"),
        None => format!("{symbol}{body}"),
    }
}

/// `(part / whole) * 100` rounded to `decimal_places`; `0.0` when `whole` is zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let factor = 10_f64.powi(decimal_places as i32);
    ((part / whole) * 100.0 * factor).round() / factor
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
