//! HTTP request handlers

mod budgets;
mod expenses;
mod filters;
mod meta;

pub use budgets::*;
pub use expenses::*;
pub use filters::*;
pub use meta::*;

/// Accept a number either as a JSON number or a numeric string
pub(crate) fn parse_number(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
