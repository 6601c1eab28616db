//! Instrument types and basket components.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ComponentParseError;
use super::expiration::Expiration;

/// Instrument type of a leg.
///
/// `Option` only appears in templates, where it stands for either a put or
/// a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InstrumentType {
    /// Futures contract.
    #[serde(rename = "F")]
    Future,
    /// Put option.
    #[serde(rename = "P")]
    Put,
    /// Call option.
    #[serde(rename = "C")]
    Call,
    /// Put or call (template wildcard).
    #[serde(rename = "O")]
    Option,
}

impl InstrumentType {
    /// Whether a template slot of this type admits a component of type `actual`.
    #[must_use]
    pub const fn admits(self, actual: Self) -> bool {
        match self {
            Self::Option => matches!(actual, Self::Put | Self::Call),
            Self::Future => matches!(actual, Self::Future),
            Self::Put => matches!(actual, Self::Put),
            Self::Call => matches!(actual, Self::Call),
        }
    }

    /// Single-letter code used in leg notation and library files.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Future => 'F',
            Self::Put => 'P',
            Self::Call => 'C',
            Self::Option => 'O',
        }
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Future => write!(f, "Future"),
            Self::Put => write!(f, "Put"),
            Self::Call => write!(f, "Call"),
            Self::Option => write!(f, "Option"),
        }
    }
}

/// One leg actually held in the basket being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Instrument type (never `Option`).
    pub instrument_type: InstrumentType,
    /// Signed position ratio; negative for short legs.
    pub ratio: Decimal,
    /// Strike price (zero for futures).
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: Expiration,
}

impl Component {
    /// Create a component.
    #[must_use]
    pub const fn new(
        instrument_type: InstrumentType,
        ratio: Decimal,
        strike: Decimal,
        expiration: Expiration,
    ) -> Self {
        Self {
            instrument_type,
            ratio,
            strike,
            expiration,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instrument_type {
            InstrumentType::Future => write!(
                f,
                "{} {} {}",
                self.instrument_type.code(),
                self.ratio,
                self.expiration
            ),
            _ => write!(
                f,
                "{} {} {} {}",
                self.instrument_type.code(),
                self.ratio,
                self.strike,
                self.expiration
            ),
        }
    }
}

/// Parses `"<TYPE> <RATIO> [<STRIKE>] <YYYY-MM-DD>"`, e.g. `"F 1 2010-09-01"`
/// or `"C -2 105.5 2010-09-17"`. The strike defaults to zero when omitted.
impl FromStr for Component {
    type Err = ComponentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let (code, ratio, strike, expiration) = match fields.as_slice() {
            [code, ratio, expiration] => (*code, *ratio, None, *expiration),
            [code, ratio, strike, expiration] => (*code, *ratio, Some(*strike), *expiration),
            other => return Err(ComponentParseError::FieldCount(other.len())),
        };

        let instrument_type = match code {
            "F" => InstrumentType::Future,
            "P" => InstrumentType::Put,
            "C" => InstrumentType::Call,
            _ => return Err(ComponentParseError::InstrumentType(code.to_string())),
        };
        let ratio = Decimal::from_str(ratio)
            .map_err(|_| ComponentParseError::Ratio(ratio.to_string()))?;
        let strike = match strike {
            Some(strike) => Decimal::from_str(strike)
                .map_err(|_| ComponentParseError::Strike(strike.to_string()))?,
            None => Decimal::ZERO,
        };
        let expiration = expiration
            .parse::<Expiration>()
            .map_err(|_| ComponentParseError::Expiration(expiration.to_string()))?;

        Ok(Self::new(instrument_type, ratio, strike, expiration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_option_admits_put_and_call() {
        assert!(InstrumentType::Option.admits(InstrumentType::Put));
        assert!(InstrumentType::Option.admits(InstrumentType::Call));
        assert!(!InstrumentType::Option.admits(InstrumentType::Future));
        assert!(InstrumentType::Call.admits(InstrumentType::Call));
        assert!(!InstrumentType::Call.admits(InstrumentType::Put));
        assert!(!InstrumentType::Future.admits(InstrumentType::Option));
    }

    #[test]
    fn test_parse_future() {
        let c: Component = "F 1 2010-09-01".parse().unwrap();
        assert_eq!(c.instrument_type, InstrumentType::Future);
        assert_eq!(c.ratio, dec!(1));
        assert_eq!(c.strike, Decimal::ZERO);
        assert_eq!(c.expiration, "2010-09-01".parse::<Expiration>().unwrap());
        assert_eq!(c.to_string(), "F 1 2010-09-01");
    }

    #[test]
    fn test_parse_option_with_strike() {
        let c: Component = "C -2 105.5 2010-09-17".parse().unwrap();
        assert_eq!(c.instrument_type, InstrumentType::Call);
        assert_eq!(c.ratio, dec!(-2));
        assert_eq!(c.strike, dec!(105.5));
        assert_eq!(c.to_string(), "C -2 105.5 2010-09-17");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "F 1".parse::<Component>(),
            Err(ComponentParseError::FieldCount(2))
        );
        assert_eq!(
            "O 1 100 2010-09-01".parse::<Component>(),
            Err(ComponentParseError::InstrumentType("O".to_string()))
        );
        assert_eq!(
            "F x 2010-09-01".parse::<Component>(),
            Err(ComponentParseError::Ratio("x".to_string()))
        );
        assert_eq!(
            "P 1 abc 2010-09-01".parse::<Component>(),
            Err(ComponentParseError::Strike("abc".to_string()))
        );
        assert_eq!(
            "F 1 2010-02-30".parse::<Component>(),
            Err(ComponentParseError::Expiration("2010-02-30".to_string()))
        );
    }
}
