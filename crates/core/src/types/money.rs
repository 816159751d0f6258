//! Revenue amounts using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A revenue total in the property's reporting currency.
///
/// Amounts are summed as [`Decimal`] so totals stay exact regardless of how
/// many rows contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revenue(Decimal);

impl Revenue {
    /// Zero revenue.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a revenue amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Add an amount, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, amount: Decimal) -> Option<Self> {
        self.0.checked_add(amount).map(Self)
    }

    /// Format for display (e.g., "$1,234.56").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.0.round_dp(2);
        let text = format!("{:.2}", rounded.abs());
        let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}${}.{cents}", group_digits(whole))
    }
}

impl fmt::Display for Revenue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Revenue {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Format a count with thousands separators (e.g., "12,345").
#[must_use]
pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
