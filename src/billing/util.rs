// src/billing/util.rs
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Num(f64),
    Str(String),
}

/// Accepts a JSON number, a numeric string, null, or a missing field
/// (with `#[serde(default)]`), defaulting to 0.0. Billing payloads come
/// from form-style clients that send everything as strings.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Num(n)) => n,
        Some(NumberOrString::Str(s)) => s.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}
