use serde::{Deserialize, Deserializer, Serialize};

/// A monetary amount as supplied by a caller: either a number or the raw
/// text of an input field.
///
/// Amounts are never rejected. Anything that does not parse to a finite
/// number coerces to `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// The finite number this input holds, if any.
    pub fn parse(&self) -> Option<f64> {
        match self {
            AmountInput::Number(n) => Some(*n).filter(|v| v.is_finite()),
            AmountInput::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Coerce to a number, falling back to `0.0`.
    pub fn coerce(&self) -> f64 {
        self.parse().unwrap_or(0.0)
    }

    /// `true` when the coerced value is non-zero.
    pub(crate) fn is_truthy(&self) -> bool {
        self.coerce() != 0.0
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<i64> for AmountInput {
    fn from(value: i64) -> Self {
        AmountInput::Number(value as f64)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        AmountInput::Text(value)
    }
}

/// Parse the text of an amount field. Surrounding whitespace is ignored;
/// empty, non-numeric, or non-finite text yields `0.0`.
pub fn coerce_amount(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Deserialize an amount the backend may send as a number, a decimal
/// string (`"5000.00"`), or `null`.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<AmountInput>::deserialize(deserializer)?;
    Ok(raw.map(|a| a.coerce()).unwrap_or(0.0))
}

pub(crate) fn lenient_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<AmountInput>::deserialize(deserializer)?;
    Ok(raw.map(|a| a.coerce()))
}
