//! Arbitrary-precision decimal amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! A `DecimalAmount` is an unbounded integer plus a scale, so addition,
//! subtraction and multiplication are always exact. Only division and
//! rescaling can lose digits, and both take an explicit [`RoundingMode`].

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::{Mul, Neg};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::rounding::RoundingMode;
use crate::error::{MoneyError, MoneyResult};

/// Largest absolute scale an operation accepts or produces.
///
/// Rescaling, division, exact arithmetic and parsing fail with
/// `ScaleOutOfRange` outside `-MAX_SCALE..=MAX_SCALE`.
pub const MAX_SCALE: i64 = 100_000;

/// Largest power of ten a single operation builds.
///
/// Division shifts by up to three in-range scales.
pub const MAX_SCALE_SHIFT: u64 = 3 * MAX_SCALE.unsigned_abs();

/// Signed decimal number: `unscaled × 10^(-scale)`.
///
/// Equality, hashing and ordering compare the numeric value, so `1.0` and
/// `1.00` are equal even though their scales differ.
#[derive(Debug, Clone)]
pub struct DecimalAmount {
    unscaled: BigInt,
    scale: i64,
}

/// Fails with `ScaleOutOfRange` unless `scale` is within `MAX_SCALE`.
fn check_scale(scale: i64) -> MoneyResult<i64> {
    if scale.unsigned_abs() > MAX_SCALE.unsigned_abs() {
        return Err(MoneyError::ScaleOutOfRange(scale));
    }
    Ok(scale)
}

/// Returns `10^exp`.
fn pow10(exp: u64) -> MoneyResult<BigInt> {
    if exp > MAX_SCALE_SHIFT {
        return Err(MoneyError::ArithmeticOverflow("power of ten"));
    }
    let exp = u32::try_from(exp).map_err(|_| MoneyError::ArithmeticOverflow("power of ten"))?;
    Ok(BigInt::from(10u8).pow(exp))
}

/// Divides `num` by `den`, rounding the integer quotient with `mode`.
///
/// `scale` is only used to report which scale needed rounding.
fn divide_rounded(
    num: &BigInt,
    den: &BigInt,
    mode: RoundingMode,
    scale: i64,
) -> MoneyResult<BigInt> {
    if den.is_zero() {
        return Err(MoneyError::DivisionByZero);
    }

    let (quotient, remainder) = num.div_rem(den);
    if remainder.is_zero() {
        return Ok(quotient);
    }

    let negative = num.is_negative() != den.is_negative();
    let half = (remainder.abs() * 2u32).cmp(&den.abs());
    let step = mode
        .increments(negative, half, quotient.is_odd())
        .ok_or(MoneyError::RoundingNecessary(scale))?;

    Ok(match (step, negative) {
        (false, _) => quotient,
        (true, false) => quotient + 1u32,
        (true, true) => quotient - 1u32,
    })
}

impl DecimalAmount {
    /// Creates an amount from an unscaled integer and a scale.
    ///
    /// Any scale is stored, but operations that touch a scale outside
    /// `MAX_SCALE` fail with `ScaleOutOfRange`.
    #[must_use]
    pub fn new(unscaled: impl Into<BigInt>, scale: i64) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }

    /// Zero at scale 0.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    /// One at scale 0.
    #[must_use]
    pub fn one() -> Self {
        Self::new(1, 0)
    }

    /// The unscaled integer.
    #[must_use]
    pub const fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Digits after the decimal point (negative for multiples of ten).
    #[must_use]
    pub const fn scale(&self) -> i64 {
        self.scale
    }

    /// Returns -1, 0 or 1.
    #[must_use]
    pub fn signum(&self) -> i32 {
        if self.unscaled.is_zero() {
            0
        } else if self.unscaled.is_negative() {
            -1
        } else {
            1
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.unscaled.is_positive()
    }

    /// Returns true if the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    /// Absolute value, same scale.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::new(self.unscaled.abs(), self.scale)
    }

    /// Both unscaled values brought to the larger of the two scales.
    fn aligned(&self, other: &Self) -> MoneyResult<(BigInt, BigInt, i64)> {
        check_scale(self.scale)?;
        check_scale(other.scale)?;
        let shift = pow10(self.scale.abs_diff(other.scale))?;
        Ok(match self.scale.cmp(&other.scale) {
            Ordering::Equal => (self.unscaled.clone(), other.unscaled.clone(), self.scale),
            Ordering::Less => (&self.unscaled * shift, other.unscaled.clone(), other.scale),
            Ordering::Greater => (self.unscaled.clone(), &other.unscaled * shift, self.scale),
        })
    }

    /// Exact sum; the scale is the larger of the two.
    ///
    /// # Errors
    ///
    /// Returns `ScaleOutOfRange` if either scale is outside `MAX_SCALE`.
    pub fn checked_add(&self, other: &Self) -> MoneyResult<Self> {
        let (left, right, scale) = self.aligned(other)?;
        Ok(Self::new(left + right, scale))
    }

    /// Exact difference; the scale is the larger of the two.
    ///
    /// # Errors
    ///
    /// Returns `ScaleOutOfRange` if either scale is outside `MAX_SCALE`.
    pub fn checked_sub(&self, other: &Self) -> MoneyResult<Self> {
        let (left, right, scale) = self.aligned(other)?;
        Ok(Self::new(left - right, scale))
    }

    /// Exact product; the scales add up.
    ///
    /// # Errors
    ///
    /// Returns `ScaleOutOfRange` if the product's scale is outside `MAX_SCALE`.
    pub fn checked_mul(&self, other: &Self) -> MoneyResult<Self> {
        let scale = check_scale(self.scale)? + check_scale(other.scale)?;
        Ok(Self::new(&self.unscaled * &other.unscaled, check_scale(scale)?))
    }

    /// Rescales to `scale`, rounding with `mode` when digits are dropped.
    ///
    /// Increasing the scale is always exact.
    ///
    /// # Errors
    ///
    /// Returns `RoundingNecessary` if `mode` is `Unnecessary` and non-zero
    /// digits would be discarded, and `ScaleOutOfRange` if either scale is
    /// outside `MAX_SCALE`.
    pub fn with_scale(&self, scale: i64, mode: RoundingMode) -> MoneyResult<Self> {
        check_scale(scale)?;
        check_scale(self.scale)?;
        match scale.cmp(&self.scale) {
            Ordering::Equal => Ok(self.clone()),
            Ordering::Greater => Ok(Self::new(
                &self.unscaled * pow10(scale.abs_diff(self.scale))?,
                scale,
            )),
            Ordering::Less => {
                let den = pow10(scale.abs_diff(self.scale))?;
                let unscaled = divide_rounded(&self.unscaled, &den, mode, scale)?;
                Ok(Self::new(unscaled, scale))
            }
        }
    }

    /// Divides by `divisor`, producing a result at `scale`.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero` for a zero divisor, `RoundingNecessary` if
    /// the quotient is inexact under `Unnecessary`, and `ScaleOutOfRange` if
    /// any scale involved is outside `MAX_SCALE`.
    pub fn divide(&self, divisor: &Self, scale: i64, mode: RoundingMode) -> MoneyResult<Self> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }

        // q = ua * 10^(scale - sa + sb) / ub
        let shift = check_scale(scale)? - check_scale(self.scale)? + check_scale(divisor.scale)?;
        let exp = pow10(shift.unsigned_abs())?;
        let unscaled = if shift >= 0 {
            divide_rounded(&(&self.unscaled * exp), &divisor.unscaled, mode, scale)?
        } else {
            divide_rounded(&self.unscaled, &(&divisor.unscaled * exp), mode, scale)?
        };
        Ok(Self::new(unscaled, scale))
    }

    /// Divides by an integer, producing a result at `scale`.
    ///
    /// # Errors
    ///
    /// Same as [`DecimalAmount::divide`].
    pub fn divide_i64(&self, divisor: i64, scale: i64, mode: RoundingMode) -> MoneyResult<Self> {
        self.divide(&Self::from(divisor), scale, mode)
    }

    /// The reciprocal `1 / self` at `scale`.
    ///
    /// # Errors
    ///
    /// Same as [`DecimalAmount::divide`].
    pub fn reciprocal(&self, scale: i64, mode: RoundingMode) -> MoneyResult<Self> {
        Self::one().divide(self, scale, mode)
    }

    /// Removes trailing zeros, possibly producing a negative scale.
    ///
    /// Zero normalizes to `0` at scale 0.
    #[must_use]
    pub fn strip_trailing_zeros(&self) -> Self {
        if self.unscaled.is_zero() {
            return Self::zero();
        }

        let ten = BigInt::from(10u8);
        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        loop {
            let (quotient, remainder) = unscaled.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            unscaled = quotient;
            scale -= 1;
        }
        Self::new(unscaled, scale)
    }

    /// Orders two non-zero amounts of the same sign by their digits, without
    /// building a power of ten.
    #[allow(clippy::cast_possible_wrap)]
    fn cmp_digits(&self, other: &Self) -> Ordering {
        let left = self.unscaled.magnitude().to_string();
        let right = other.unscaled.magnitude().to_string();
        // Position of the leading digit relative to the decimal point.
        let leading = |digits: &str, scale: i64| digits.len() as i128 - i128::from(scale);
        let by_magnitude = leading(left.as_str(), self.scale)
            .cmp(&leading(right.as_str(), other.scale))
            .then_with(|| left.trim_end_matches('0').cmp(right.trim_end_matches('0')));
        if self.is_negative() {
            by_magnitude.reverse()
        } else {
            by_magnitude
        }
    }

    /// Converts to `i64` when the value is integral and in range.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.with_scale(0, RoundingMode::Unnecessary)
            .ok()?
            .unscaled
            .to_i64()
    }

    /// Returns true if the value is exactly one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        *self == Self::one()
    }
}

impl Default for DecimalAmount {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for DecimalAmount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DecimalAmount {}

impl PartialOrd for DecimalAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DecimalAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_sign = self.signum().cmp(&other.signum());
        if by_sign != Ordering::Equal || self.is_zero() {
            return by_sign;
        }
        match self.aligned(other) {
            Ok((left, right, _)) => left.cmp(&right),
            Err(_) => self.cmp_digits(other),
        }
    }
}

impl Hash for DecimalAmount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let normalized = self.strip_trailing_zeros();
        normalized.unscaled.hash(state);
        normalized.scale.hash(state);
    }
}

impl Mul<i64> for &DecimalAmount {
    type Output = DecimalAmount;

    fn mul(self, rhs: i64) -> DecimalAmount {
        DecimalAmount::new(&self.unscaled * rhs, self.scale)
    }
}

impl Neg for &DecimalAmount {
    type Output = DecimalAmount;

    fn neg(self) -> DecimalAmount {
        DecimalAmount::new(-&self.unscaled, self.scale)
    }
}

impl Neg for DecimalAmount {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

impl From<i64> for DecimalAmount {
    fn from(value: i64) -> Self {
        Self::new(value, 0)
    }
}

impl From<i32> for DecimalAmount {
    fn from(value: i32) -> Self {
        Self::new(value, 0)
    }
}

impl From<Decimal> for DecimalAmount {
    fn from(value: Decimal) -> Self {
        Self::new(value.mantissa(), i64::from(value.scale()))
    }
}

impl TryFrom<&DecimalAmount> for Decimal {
    type Error = MoneyError;

    fn try_from(value: &DecimalAmount) -> Result<Self, Self::Error> {
        let mut value = if value.scale > 28 {
            value.strip_trailing_zeros()
        } else {
            value.clone()
        };
        if value.scale < 0 {
            value = value.with_scale(0, RoundingMode::Unnecessary)?;
        }
        let overflow = || MoneyError::ArithmeticOverflow("decimal conversion");
        let mantissa = value.unscaled.to_i128().ok_or_else(overflow)?;
        let scale = u32::try_from(value.scale).map_err(|_| overflow())?;
        Decimal::try_from_i128_with_scale(mantissa, scale).map_err(|_| overflow())
    }
}

impl std::str::FromStr for DecimalAmount {
    type Err = MoneyError;

    /// Parses `[+-]?DIGITS(.DIGITS)?`. No exponent, no whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, body) = match s.as_bytes().first() {
            None => return Err(MoneyError::invalid_format(s, "empty amount")),
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            Some(_) => (false, s),
        };

        let (integer, fraction) = match body.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (body, ""),
        };
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer) || (body.contains('.') && !all_digits(fraction)) {
            return Err(MoneyError::invalid_format(s, "expected decimal digits"));
        }

        let scale = i64::try_from(fraction.len())
            .map_err(|_| MoneyError::invalid_format(s, "too many digits"))
            .and_then(check_scale)?;
        let magnitude: BigInt = format!("{integer}{fraction}")
            .parse()
            .map_err(|_| MoneyError::invalid_format(s, "expected decimal digits"))?;

        Ok(Self::new(if negative { -magnitude } else { magnitude }, scale))
    }
}

impl std::fmt::Display for DecimalAmount {
    #[allow(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.unscaled.is_negative() { "-" } else { "" };
        let digits = self.unscaled.magnitude().to_string();

        let text = if check_scale(self.scale).is_err() {
            format!("{sign}{digits}E{}", -i128::from(self.scale))
        } else if self.scale <= 0 {
            if self.unscaled.is_zero() {
                "0".to_string()
            } else {
                let zeros = "0".repeat(self.scale.unsigned_abs() as usize);
                format!("{sign}{digits}{zeros}")
            }
        } else {
            let scale = self.scale.unsigned_abs() as usize;
            let padded = if digits.len() <= scale {
                format!("{}{digits}", "0".repeat(scale - digits.len() + 1))
            } else {
                digits
            };
            let (integer, fraction) = padded.split_at(padded.len() - scale);
            format!("{sign}{integer}.{fraction}")
        };
        f.pad(&text)
    }
}

impl Serialize for DecimalAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DecimalAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
