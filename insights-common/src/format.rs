//! Display formatting shared by both screens.

pub const CURRENCY: &str = "BRL";

/// Groups thousands with a space: `93342` -> `"93 342"`.
pub fn thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

pub fn money(value: f64) -> String {
    format!("{value:.2} {CURRENCY}")
}

pub fn millions(value: f64) -> String {
    format!("{:.2}M {CURRENCY}", value / 1_000_000.0)
}

pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// `"...` + the last 8 characters of a customer id.
pub fn short_id(customer_id: &str) -> String {
    let tail: String = customer_id
        .chars()
        .rev()
        .take(8)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("...{tail}")
}
