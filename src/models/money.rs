//! Money type for representing currency amounts
//!
//! Internally stores amounts in céntimos (i64) to avoid floating-point
//! precision issues. Provides safe arithmetic operations and formatting with
//! thousands separators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Default currency symbol (Costa Rican colón)
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₡";

/// Represents a monetary amount stored as céntimos (hundredths of the unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from céntimos
    ///
    /// # Examples
    /// ```
    /// use billetera::models::Money;
    /// let amount = Money::from_cents(100_050); // ₡1,000.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units and céntimos
    ///
    /// # Examples
    /// ```
    /// use billetera::models::Money;
    /// let amount = Money::from_units_cents(509_015, 40); // ₡509,015.40
    /// ```
    pub const fn from_units_cents(units: i64, cents: i64) -> Self {
        Self(units * 100 + cents)
    }

    /// Create a Money amount from whole units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in céntimos
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the céntimos portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Addition that reports overflow instead of wrapping
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Sum that reports overflow instead of wrapping
    pub fn checked_sum<I: IntoIterator<Item = Self>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .try_fold(Self::zero(), |acc, value| acc.checked_add(value))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "1000", "1000.50", "-25", "₡1,000.50", "$10.5".
    /// Commas are treated as thousands separators.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };

        let rest = rest
            .trim_start_matches(DEFAULT_CURRENCY_SYMBOL)
            .trim_start_matches('$')
            .trim();
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let cents = match cleaned.split_once('.') {
            Some((units_str, cents_str)) => {
                let units: i64 = if units_str.is_empty() {
                    0
                } else {
                    units_str.parse().map_err(|_| invalid())?
                };
                if cents_str.contains('.') || !cents_str.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let cents: i64 = match cents_str.len() {
                    0 => 0,
                    1 => cents_str.parse::<i64>().map_err(|_| invalid())? * 10,
                    _ => cents_str[..2].parse().map_err(|_| invalid())?,
                };
                units
                    .checked_mul(100)
                    .and_then(|u| u.checked_add(cents))
                    .ok_or_else(invalid)?
            }
            None => cleaned
                .parse::<i64>()
                .ok()
                .and_then(|u| u.checked_mul(100))
                .ok_or_else(invalid)?,
        };

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol and thousands separators
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_thousands(self.units().unsigned_abs()),
            self.cents_part()
        )
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol(DEFAULT_CURRENCY_SYMBOL))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Formato de monto inválido: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(50_901_540);
        assert_eq!(m.units(), 509_015);
        assert_eq!(m.cents_part(), 40);
        assert_eq!(Money::from_units_cents(509_015, 40), m);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(50_901_540).to_string(), "₡509,015.40");
        assert_eq!(Money::from_cents(0).to_string(), "₡0.00");
        assert_eq!(Money::from_cents(-105_000).to_string(), "-₡1,050.00");
        assert_eq!(Money::from_cents(5).to_string(), "₡0.05");
        assert_eq!(Money::from_units(1_000_000).to_string(), "₡1,000,000.00");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(123_456).format_with_symbol("$"), "$1,234.56");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(1000);
        let b = Money::from_units(500);

        assert_eq!((a + b).cents(), 150_000);
        assert_eq!((a - b).cents(), 50_000);
        assert_eq!((-a).cents(), -100_000);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("1000").unwrap().cents(), 100_000);
        assert_eq!(Money::parse("1000.5").unwrap().cents(), 100_050);
        assert_eq!(Money::parse("₡1,000.50").unwrap().cents(), 100_050);
        assert_eq!(Money::parse("-25").unwrap().cents(), -2_500);
        assert_eq!(Money::parse("$0.05").unwrap().cents(), 5);
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
    }

    #[test]
    fn test_parse_rejects_repeated_sign() {
        assert!(Money::parse("--5").is_err());
        assert!(Money::parse("+5").is_err());
        assert!(Money::parse("-+5").is_err());
        assert!(Money::parse("5.-1").is_err());
    }

    #[test]
    fn test_checked_sum_overflow() {
        let big = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(Money::checked_sum([big, big]), None);
        assert_eq!(
            Money::checked_sum([Money::from_units(1), Money::from_units(2)]),
            Some(Money::from_units(3))
        );
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)), None);
    }

    #[test]
    fn test_sum() {
        let total: Money = vec![Money::from_units(1), Money::from_units(2)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_units(3));
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
