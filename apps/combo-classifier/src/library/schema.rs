//! On-disk shape of a template library and its resolution into templates.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::LibraryError;
use crate::combination::{
    Cardinality, CombinationTemplate, ExpirationConstraint, InstrumentType, LegTemplate, Period,
    RatioConstraint, Sign, StrikeConstraint,
};

/// Root of a library file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct LibraryDocument {
    #[serde(default)]
    pub combinations: Vec<CombinationEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum CardinalityKind {
    More,
    Fixed,
    Multiply,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct CombinationEntry {
    pub name: String,
    pub cardinality: CardinalityKind,
    #[serde(default)]
    pub min_count: Option<usize>,
    pub legs: Vec<LegEntry>,
}

/// Ratio as written: `"+"`, `"-"`, or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum RatioEntry {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Offset as written: an integer, a run of `+`/`-` signs whose length is
/// the magnitude, or (expirations only) a period such as `"2q"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum OffsetEntry {
    Integer(i32),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct LegEntry {
    #[serde(rename = "type")]
    pub instrument_type: InstrumentType,
    pub ratio: RatioEntry,
    #[serde(default)]
    pub strike: Option<char>,
    #[serde(default)]
    pub strike_offset: Option<OffsetEntry>,
    #[serde(default)]
    pub expiration: Option<char>,
    #[serde(default)]
    pub expiration_offset: Option<OffsetEntry>,
}

impl CombinationEntry {
    /// Resolve into a template. `More` entries keep only their first leg.
    pub(super) fn resolve(self) -> Result<CombinationTemplate, LibraryError> {
        let name = self.name;
        let invalid = |reason: String| LibraryError::InvalidEntry {
            name: name.clone(),
            reason,
        };

        let mut legs = self
            .legs
            .into_iter()
            .enumerate()
            .map(|(index, leg)| {
                leg.resolve()
                    .map_err(|reason| invalid(format!("leg {}: {reason}", index + 1)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cardinality = match self.cardinality {
            CardinalityKind::More => {
                let min_count = self
                    .min_count
                    .ok_or_else(|| invalid("cardinality 'more' requires min_count".to_string()))?;
                if legs.len() > 1 {
                    tracing::debug!(
                        template = %name,
                        ignored = legs.len() - 1,
                        "Cardinality 'more' uses only the first leg"
                    );
                    legs.truncate(1);
                }
                Cardinality::More { min_count }
            }
            CardinalityKind::Fixed => Cardinality::Fixed,
            CardinalityKind::Multiply => Cardinality::Multiply,
        };

        CombinationTemplate::new(name, legs, cardinality).map_err(LibraryError::from)
    }
}

impl LegEntry {
    fn resolve(self) -> Result<LegTemplate, String> {
        let ratio = resolve_ratio(&self.ratio)?;

        let strike = match (self.strike, self.strike_offset) {
            (Some(_), Some(_)) => return Err("both strike and strike_offset are set".to_string()),
            (Some(label), None) => StrikeConstraint::Label(label),
            (None, Some(OffsetEntry::Integer(offset))) => StrikeConstraint::Offset(offset),
            (None, Some(OffsetEntry::Text(text))) => StrikeConstraint::Offset(
                sign_run(&text).ok_or_else(|| format!("invalid strike_offset '{text}'"))?,
            ),
            (None, None) => StrikeConstraint::Any,
        };

        let expiration = match (self.expiration, self.expiration_offset) {
            (Some(_), Some(_)) => {
                return Err("both expiration and expiration_offset are set".to_string());
            }
            (Some(label), None) => ExpirationConstraint::Label(label),
            (None, Some(OffsetEntry::Integer(offset))) => ExpirationConstraint::Offset(offset),
            (None, Some(OffsetEntry::Text(text))) => match sign_run(&text) {
                Some(offset) => ExpirationConstraint::Offset(offset),
                None => ExpirationConstraint::Period(
                    Period::from_str(&text).map_err(|e| format!("expiration_offset: {e}"))?,
                ),
            },
            (None, None) => ExpirationConstraint::Any,
        };

        Ok(LegTemplate::new(self.instrument_type, ratio)
            .with_strike(strike)
            .with_expiration(expiration))
    }
}

fn resolve_ratio(ratio: &RatioEntry) -> Result<RatioConstraint, String> {
    match ratio {
        RatioEntry::Integer(value) => Ok(RatioConstraint::Exact(Decimal::from(*value))),
        RatioEntry::Float(value) => Decimal::try_from(*value)
            .map(RatioConstraint::Exact)
            .map_err(|_| format!("invalid ratio {value}")),
        RatioEntry::Text(text) => match text.trim() {
            "+" => Ok(RatioConstraint::Sign(Sign::Positive)),
            "-" => Ok(RatioConstraint::Sign(Sign::Negative)),
            other => Decimal::from_str(other)
                .map(RatioConstraint::Exact)
                .map_err(|_| format!("invalid ratio '{other}'")),
        },
    }
}

/// `"+"` → 1, `"++"` → 2, `"--"` → -2. Anything else is not a sign run.
fn sign_run(text: &str) -> Option<i32> {
    let text = text.trim();
    let len = i32::try_from(text.len()).ok()?;
    if len == 0 {
        None
    } else if text.bytes().all(|b| b == b'+') {
        Some(len)
    } else if text.bytes().all(|b| b == b'-') {
        Some(-len)
    } else {
        None
    }
}
