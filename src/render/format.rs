//! Number formatting for marker popups and the dashboard

use crate::city::MapItem;

const OKU: i64 = 100_000_000;
const MAN: i64 = 10_000;
const CHO: i64 = 1_000_000_000_000;

/// Yen amount for a marker popup: 億円 above 1e8, 万円 above 1e4, else raw
pub fn format_money(amount: i64) -> String {
    if amount >= OKU {
        format!("{:.1}億円", round_to(amount as f64 / OKU as f64, 1))
    } else if amount >= MAN {
        format!("{}万円", (amount as f64 / MAN as f64).round() as i64)
    } else {
        format!("{}円", group_thousands(amount))
    }
}

/// Compact dashboard figure: 兆, 億 and 万 without a currency suffix
pub fn format_compact(amount: i64) -> String {
    if amount >= CHO {
        format!("{:.1}兆", round_to(amount as f64 / CHO as f64, 1))
    } else if amount >= OKU {
        format!("{}億", (amount as f64 / OKU as f64).round() as i64)
    } else if amount >= MAN {
        format!("{}万", (amount as f64 / MAN as f64).round() as i64)
    } else {
        amount.to_string()
    }
}

/// Dashboard yen figure: the compact form with a 円 suffix
pub fn format_compact_yen(amount: i64) -> String {
    format!("{}円", format_compact(amount))
}

/// Integer with comma thousands separators
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Population effect line, `None` when the item has no effect
pub fn population_effect(item: &MapItem) -> Option<String> {
    match item.population_delta() {
        0 => None,
        p => Some(format!("{}{}人", sign(p), group_thousands(p.abs()))),
    }
}

/// Tax-revenue effect line, `None` when the item has no effect
pub fn tax_effect(item: &MapItem) -> Option<String> {
    match item.tax_revenue_delta() {
        0 => None,
        t if t > 0 => Some(format!("+{}", format_money(t))),
        t => Some(format!("-{}", format_money(-t))),
    }
}

/// Eight-point compass name for a bearing in degrees
pub fn compass_point(bearing: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let index = (bearing.rem_euclid(360.0) / 45.0).round() as usize % POINTS.len();
    POINTS[index]
}

fn sign(value: i64) -> char {
    if value < 0 {
        '-'
    } else {
        '+'
    }
}

// Rounds half away from zero
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
