//! Expiration dates and calendar periods.
//!
//! An [`Expiration`] is a plain day/month/year value ordered
//! lexicographically by year, month, then day. Period checks advance an
//! anchor expiration by a number of days, months, quarters or years and
//! test whether another leg's expiration lands where the period says it
//! should.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::PeriodParseError;

/// Calendar unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    /// Calendar days.
    Day,
    /// Calendar months.
    Month,
    /// Three-month windows.
    Quarter,
    /// Calendar years.
    Year,
}

impl PeriodUnit {
    const fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.as_bytes() {
            [b'd'] => Some(Self::Day),
            [b'm'] => Some(Self::Month),
            [b'q'] => Some(Self::Quarter),
            [b'y'] => Some(Self::Year),
            _ => None,
        }
    }

    const fn suffix(self) -> char {
        match self {
            Self::Day => 'd',
            Self::Month => 'm',
            Self::Quarter => 'q',
            Self::Year => 'y',
        }
    }
}

/// A signed distance in calendar units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Calendar unit.
    pub unit: PeriodUnit,
    /// Signed number of units.
    pub amount: i32,
}

impl Period {
    /// Create a period of `amount` units.
    #[must_use]
    pub const fn new(unit: PeriodUnit, amount: i32) -> Self {
        Self { unit, amount }
    }

    /// Shorthand for `amount` quarters.
    #[must_use]
    pub const fn quarters(amount: i32) -> Self {
        Self::new(PeriodUnit::Quarter, amount)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

/// Parses `[+|-][N]<d|m|q|y>`. A missing or zero count means one unit.
impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PeriodParseError::Empty);
        }

        let (negative, rest) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (count, suffix) = rest.split_at(digits);

        let unit = PeriodUnit::from_suffix(suffix)
            .ok_or_else(|| PeriodParseError::UnknownUnit(s.to_string()))?;

        let mut amount = if count.is_empty() {
            0
        } else {
            count
                .parse::<i32>()
                .map_err(|_| PeriodParseError::CountOutOfRange(s.to_string()))?
        };
        if amount == 0 {
            amount = 1;
        }

        Ok(Self::new(unit, if negative { -amount } else { amount }))
    }
}

/// Expiration date of a leg.
///
/// Month is stored 0-based. Values built from real dates are always valid;
/// quarter windows are compared on raw fields and may name a day past the
/// end of a month (e.g. April 31), which still orders correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expiration {
    year: i32,
    month: u32,
    day: u32,
}

impl Expiration {
    /// Create an expiration from a 1-based month. Returns `None` for
    /// dates that do not exist.
    #[must_use]
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from)
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1-based.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month + 1
    }

    /// Day of month.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Whether `target` is a valid expiration `period` away from `self`.
    ///
    /// Day, month and year periods require the normalized shifted date to
    /// equal `target` exactly. Quarter periods accept any `target` in the
    /// half-open window `[self + n quarters, self + (n + 1) quarters)`.
    #[must_use]
    pub fn satisfies_period(&self, period: Period, target: &Self) -> bool {
        let amount = i64::from(period.amount);
        match period.unit {
            PeriodUnit::Quarter => {
                let lower = self.add_months_raw(3 * amount);
                let upper = lower.add_months_raw(3);
                lower <= *target && *target < upper
            }
            PeriodUnit::Day => self.shifted(0, amount) == Some(*target),
            PeriodUnit::Month => self.shifted(amount, 0) == Some(*target),
            PeriodUnit::Year => self.shifted(12 * amount, 0) == Some(*target),
        }
    }

    /// Advance by whole months without touching the day.
    fn add_months_raw(self, months: i64) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) + months;
        Self {
            year: total.div_euclid(12) as i32,
            month: total.rem_euclid(12) as u32,
            day: self.day,
        }
    }

    /// Shift by months and days, letting day overflow roll into the
    /// following months (Jan 31 + 1 month = Mar 3 in a common year).
    fn shifted(self, months: i64, days: i64) -> Option<Self> {
        let moved = self.add_months_raw(months);
        let first = NaiveDate::from_ymd_opt(moved.year, moved.month + 1, 1)?;
        let offset = TimeDelta::try_days(i64::from(moved.day) - 1 + days)?;
        first.checked_add_signed(offset).map(Self::from)
    }
}

impl From<NaiveDate> for Expiration {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
            day: date.day(),
        }
    }
}

impl FromStr for Expiration {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self::from)
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month + 1, self.day)
    }
}

impl Serialize for Expiration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Expiration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NaiveDate::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(s: &str) -> Expiration {
        s.parse().unwrap()
    }

    #[test]
    fn test_ordering_is_year_month_day() {
        assert!(date("2010-03-01") < date("2010-03-02"));
        assert!(date("2010-03-31") < date("2010-04-01"));
        assert!(date("2009-12-31") < date("2010-01-01"));
        assert!(date("2010-06-01") >= date("2010-06-01"));
        assert!(date("2010-06-01") <= date("2010-06-01"));
        assert_ne!(date("2010-06-01"), date("2010-06-02"));
        assert!(date("2011-01-01") > date("2010-12-31"));
    }

    #[test]
    fn test_accessors_are_one_based_month() {
        let e = date("2010-03-15");
        assert_eq!((e.year(), e.month(), e.day()), (2010, 3, 15));
        assert_eq!(e.to_string(), "2010-03-15");
        assert_eq!(Expiration::new(2010, 3, 15), Some(e));
        assert_eq!(Expiration::new(2010, 2, 30), None);
    }

    #[test_case("2010-06-01", true ; "window start")]
    #[test_case("2010-07-15", true ; "inside window")]
    #[test_case("2010-08-31", true ; "last day of window")]
    #[test_case("2010-09-01", false ; "window end is exclusive")]
    #[test_case("2010-05-31", false ; "before window")]
    fn test_quarter_window(target: &str, expected: bool) {
        let anchor = date("2010-03-01");
        assert_eq!(
            anchor.satisfies_period(Period::quarters(1), &date(target)),
            expected
        );
    }

    #[test]
    fn test_quarter_rolls_year() {
        let anchor = date("2010-12-01");
        assert!(anchor.satisfies_period(Period::quarters(1), &date("2011-03-01")));
        assert!(anchor.satisfies_period(Period::quarters(4), &date("2011-12-20")));
        assert!(!anchor.satisfies_period(Period::quarters(1), &date("2011-06-01")));
    }

    #[test]
    fn test_negative_quarter() {
        let anchor = date("2010-03-01");
        assert!(anchor.satisfies_period(Period::quarters(-1), &date("2009-12-01")));
        assert!(anchor.satisfies_period(Period::quarters(-1), &date("2010-02-28")));
        assert!(!anchor.satisfies_period(Period::quarters(-1), &date("2010-03-01")));
    }

    #[test_case(PeriodUnit::Day, 1, "2010-03-02" ; "one day")]
    #[test_case(PeriodUnit::Day, 31, "2010-04-01" ; "day overflow rolls month")]
    #[test_case(PeriodUnit::Month, 1, "2010-04-01" ; "one month")]
    #[test_case(PeriodUnit::Month, 10, "2011-01-01" ; "month overflow rolls year")]
    #[test_case(PeriodUnit::Year, 2, "2012-03-01" ; "two years")]
    #[test_case(PeriodUnit::Month, -3, "2009-12-01" ; "negative months")]
    fn test_exact_periods(unit: PeriodUnit, amount: i32, target: &str) {
        let anchor = date("2010-03-01");
        assert!(anchor.satisfies_period(Period::new(unit, amount), &date(target)));
        assert!(!anchor.satisfies_period(Period::new(unit, amount), &date("2010-03-01")));
    }

    #[test]
    fn test_month_end_normalizes_like_calendar_arithmetic() {
        let anchor = date("2010-01-31");
        let one_month = Period::new(PeriodUnit::Month, 1);
        assert!(anchor.satisfies_period(one_month, &date("2010-03-03")));
        assert!(!anchor.satisfies_period(one_month, &date("2010-02-28")));
    }

    #[test]
    fn test_leap_day_plus_year() {
        let anchor = date("2012-02-29");
        let one_year = Period::new(PeriodUnit::Year, 1);
        assert!(anchor.satisfies_period(one_year, &date("2013-03-01")));
    }

    #[test_case("1q", Period::quarters(1))]
    #[test_case("q", Period::quarters(1))]
    #[test_case("0q", Period::quarters(1))]
    #[test_case("3m", Period::new(PeriodUnit::Month, 3))]
    #[test_case("-2y", Period::new(PeriodUnit::Year, -2))]
    #[test_case("+10d", Period::new(PeriodUnit::Day, 10))]
    fn test_period_parse(input: &str, expected: Period) {
        assert_eq!(input.parse::<Period>(), Ok(expected));
    }

    #[test]
    fn test_period_parse_errors() {
        assert_eq!("".parse::<Period>(), Err(PeriodParseError::Empty));
        assert!(matches!(
            "2w".parse::<Period>(),
            Err(PeriodParseError::UnknownUnit(_))
        ));
        assert!(matches!(
            "99999999999q".parse::<Period>(),
            Err(PeriodParseError::CountOutOfRange(_))
        ));
    }

    #[test]
    fn test_serde_uses_iso_dates() {
        let e = date("2010-09-01");
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, "\"2010-09-01\"");
        let back: Expiration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
