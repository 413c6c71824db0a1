//! Monetary value types.
//!
//! Amounts are stored in the smallest currency unit (e.g. cents) as signed
//! integers; tax rates are basis points. All arithmetic is checked so totals
//! cannot silently wrap.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Amount in smallest currency unit (e.g. cents). Signed so that discounts
/// and adjustments can be expressed as negative amounts.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money addition overflow"))
    }

    pub fn checked_sub(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money subtraction overflow"))
    }

    /// Multiply by a unitless quantity (line total = unit price × quantity).
    pub fn checked_mul(self, quantity: i64) -> DomainResult<Money> {
        self.0
            .checked_mul(quantity)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money multiplication overflow"))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Tax rate in basis points (1/100th of a percent): 2000 = 20%.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaxRate(u16);

impl TaxRate {
    pub const ZERO: TaxRate = TaxRate(0);

    /// Construct from basis points; rates above 100% are rejected.
    pub fn from_basis_points(bp: u16) -> DomainResult<Self> {
        if bp > 10_000 {
            return Err(DomainError::validation(format!(
                "tax rate {bp}bp exceeds 100%"
            )));
        }
        Ok(Self(bp))
    }

    pub const fn basis_points(self) -> u16 {
        self.0
    }

    /// Tax owed on a net amount, rounded towards zero.
    pub fn tax_on(self, net: Money) -> DomainResult<Money> {
        let scaled = net
            .minor()
            .checked_mul(i64::from(self.0))
            .ok_or_else(|| DomainError::invariant("tax computation overflow"))?;
        Ok(Money::from_minor(scaled / 10_000))
    }
}
