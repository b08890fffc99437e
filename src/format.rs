// Display formatting helpers for the availability views.
// Pure functions over criteria/offer fields, no I/O and no shared state.

use chrono::NaiveDate;

/// Renders a date as "D Mon YYYY", e.g. "1 May 2024".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Whole-day span between check-in and check-out. With a validated
/// criteria (`check_in < check_out`) this is always at least 1.
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().abs()
}

pub fn night_label(count: i64) -> String {
    if count == 1 {
        format!("{} Night", count)
    } else {
        format!("{} Nights", count)
    }
}

pub fn room_label(count: i64) -> String {
    if count == 1 {
        format!("{} Room", count)
    } else {
        format!("{} Rooms", count)
    }
}

pub fn rooms_left_label(count: i64) -> String {
    format!("{} Left", room_label(count))
}

// Guest nouns are always plural, matching the live site ("1 Adults").
// Changing this to singular would diverge from the rendered pages.
pub fn guest_summary(adults: u32, children: u32) -> String {
    let mut summary = format!("{} Adults", adults);
    if children > 0 {
        summary.push_str(&format!(", {} Children", children));
    }
    summary
}

pub fn offer_count_summary(count: usize) -> String {
    let noun = if count == 1 {
        "accommodation"
    } else {
        "accommodations"
    };
    format!("We found {} exquisite {} for your stay", count, noun)
}

/// Currency sign plus a grouped-thousands amount. An absent amount
/// renders as an empty string rather than a placeholder.
pub fn format_money(symbol: &str, amount: Option<f64>) -> String {
    let amount = match amount {
        Some(amount) => amount,
        None => return String::new(),
    };

    // Round to cents up front so e.g. 1249.999 groups as 1,250.
    let cents = (amount * 100.0).round() as i64;
    let mut grouped = group_thousands(cents / 100);
    if cents % 100 != 0 {
        grouped.push_str(&format!(".{:02}", (cents % 100).abs()));
    }
    format!("{}{}", symbol, grouped)
}

fn group_thousands(value: i64) -> String {
    // Group the magnitude so the sign never collides with a separator.
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
