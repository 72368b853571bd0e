//! Newtype wrappers for exact probability arithmetic.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, Mul},
    str::FromStr,
};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// An exact probability backed by an arbitrary-precision rational.
///
/// Probabilities are never rounded; the only lossy views are [`Probability::to_f64`]
/// and [`Probability::to_decimal`], both intended for display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Probability(BigRational);

impl Probability {
    /// The impossible event.
    pub fn zero() -> Self {
        Probability(BigRational::zero())
    }

    /// The certain event.
    pub fn one() -> Self {
        Probability(BigRational::one())
    }

    /// `count / total`, or `None` when `total` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafia_odds::types::Probability;
    ///
    /// let third = Probability::ratio(2, 6).unwrap();
    /// assert_eq!(third.to_string(), "1/3");
    /// assert!(Probability::ratio(1, 0).is_none());
    /// ```
    pub fn ratio(count: u32, total: u32) -> Option<Self> {
        if total == 0 {
            return None;
        }
        Some(Probability(BigRational::new(
            BigInt::from(count),
            BigInt::from(total),
        )))
    }

    /// Wrap a rational without range validation.
    pub fn from_rational(value: BigRational) -> Self {
        Probability(value)
    }

    pub fn as_rational(&self) -> &BigRational {
        &self.0
    }

    pub fn into_inner(self) -> BigRational {
        self.0
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    /// Whether the value lies in the closed interval [0, 1].
    pub fn is_valid(&self) -> bool {
        !self.0.is_negative() && self.0 <= BigRational::one()
    }

    /// Nearest `f64`, for colour scales and sampling only.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Exact decimal expansion rounded half up to `digits` fractional digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use mafia_odds::types::Probability;
    ///
    /// let p = Probability::ratio(2, 3).unwrap();
    /// assert_eq!(p.to_decimal(4), "0.6667");
    /// assert_eq!(Probability::one().to_decimal(2), "1.00");
    /// ```
    pub fn to_decimal(&self, digits: usize) -> String {
        let sign = if self.0.is_negative() { "-" } else { "" };
        let numer = self.0.numer().abs();
        let denom = self.0.denom().clone();

        let scale: BigInt = num_traits::pow(BigInt::from(10u8), digits);
        let two = BigInt::from(2u8);
        let scaled = (numer * &scale * &two + &denom) / (denom * two);

        if digits == 0 {
            return format!("{sign}{scaled}");
        }

        let whole = &scaled / &scale;
        let fraction = (&scaled % &scale).to_string();
        format!("{sign}{whole}.{fraction:0>digits$}")
    }
}

impl Default for Probability {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.denom().is_one() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl FromStr for Probability {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || crate::Error::InvalidConfiguration {
            message: format!("'{s}' is not a fraction of the form n/d"),
        };

        let (numer, denom) = match s.trim().split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s.trim(), "1"),
        };
        let numer: BigInt = numer.parse().map_err(|_| invalid())?;
        let denom: BigInt = denom.parse().map_err(|_| invalid())?;
        if denom.is_zero() {
            return Err(invalid());
        }
        Ok(Probability(BigRational::new(numer, denom)))
    }
}

impl Serialize for Probability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Probability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl Add for Probability {
    type Output = Probability;

    fn add(self, rhs: Probability) -> Probability {
        Probability(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Probability> for Probability {
    type Output = Probability;

    fn add(self, rhs: &'a Probability) -> Probability {
        Probability(self.0 + &rhs.0)
    }
}

impl<'a> Mul<&'a Probability> for &'a Probability {
    type Output = Probability;

    fn mul(self, rhs: &'a Probability) -> Probability {
        Probability(&self.0 * &rhs.0)
    }
}

impl Sum for Probability {
    fn sum<I: Iterator<Item = Probability>>(iter: I) -> Self {
        iter.fold(Probability::zero(), |acc, p| acc + p)
    }
}

impl<'a> Sum<&'a Probability> for Probability {
    fn sum<I: Iterator<Item = &'a Probability>>(iter: I) -> Self {
        iter.fold(Probability::zero(), |acc, p| acc + p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_drops_unit_denominator() {
        assert_eq!(Probability::one().to_string(), "1");
        assert_eq!(Probability::zero().to_string(), "0");
        assert_eq!(Probability::ratio(3, 12).unwrap().to_string(), "1/4");
    }

    #[test]
    fn parse_accepts_integers_and_fractions() {
        assert_eq!("1".parse::<Probability>().unwrap(), Probability::one());
        assert_eq!(
            " 17 / 30 ".parse::<Probability>().unwrap(),
            Probability::ratio(17, 30).unwrap()
        );
        assert!("1/0".parse::<Probability>().is_err());
        assert!("half".parse::<Probability>().is_err());
    }

    #[test]
    fn decimal_rounds_half_up() {
        assert_eq!(Probability::ratio(1, 8).unwrap().to_decimal(2), "0.13");
        assert_eq!(Probability::ratio(1, 3).unwrap().to_decimal(6), "0.333333");
        assert_eq!(Probability::ratio(1, 20).unwrap().to_decimal(3), "0.050");
        assert_eq!(Probability::ratio(1, 2).unwrap().to_decimal(0), "1");
    }

    #[test]
    fn sums_stay_exact() {
        let parts = [
            Probability::ratio(1, 3).unwrap(),
            Probability::ratio(1, 6).unwrap(),
            Probability::ratio(1, 2).unwrap(),
        ];
        let total: Probability = parts.iter().sum();
        assert!(total.is_one());
    }

    #[test]
    fn unit_interval_check() {
        assert!(Probability::zero().is_valid());
        assert!(Probability::one().is_valid());
        let over: Probability = "4/3".parse().unwrap();
        assert!(!over.is_valid());
        let under: Probability = "-1/3".parse().unwrap();
        assert!(!under.is_valid());
    }

    #[test]
    fn serde_uses_fraction_strings() {
        let p = Probability::ratio(2, 3).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"2/3\"");
        let back: Probability = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
