//! [`Amount`]-related definitions.

use std::{fmt, iter::Sum, str::FromStr};

use rust_decimal::Decimal;

/// Non-negative monetary amount.
///
/// Currency is implied by the deployment and is not modeled.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "Decimal", into = "Decimal")
)]
pub struct Amount(Decimal);

impl Amount {
    /// An [`Amount`] of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Amount`] if the given `value` is non-negative.
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        (!value.is_sign_negative()).then_some(Self(value))
    }

    /// Returns the inner [`Decimal`] of this [`Amount`].
    #[must_use]
    pub fn get(self) -> Decimal {
        self.0
    }

    /// Adds the `other` [`Amount`] to this one, saturating at the maximum
    /// representable value.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Amount {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s).map_err(|_| "invalid amount")?;
        Self::new(value).ok_or("negative amount")
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = &'static str;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("negative amount")
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.get()
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Self(value.into())
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

#[cfg(feature = "postgres")]
mod postgres {
    //! Module providing integration with [`postgres_types`] crate.

    use std::error::Error as StdError;

    use postgres_types::{
        private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
    };
    use rust_decimal::Decimal;

    use super::Amount;

    impl FromSql<'_> for Amount {
        fn from_sql(
            ty: &Type,
            raw: &[u8],
        ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
            Self::new(Decimal::from_sql(ty, raw)?)
                .ok_or_else(|| "negative `Amount`".into())
        }

        fn accepts(ty: &Type) -> bool {
            <Decimal as FromSql<'_>>::accepts(ty)
        }
    }

    impl ToSql for Amount {
        to_sql_checked!();

        fn to_sql(
            &self,
            ty: &Type,
            w: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
            self.0.to_sql(ty, w)
        }

        fn accepts(ty: &Type) -> bool {
            <Decimal as ToSql>::accepts(ty)
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Amount;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_negative() {
        assert!(Amount::new(decimal("-0.01")).is_none());
        assert!(Amount::from_str("-5000").is_err());

        assert!(Amount::new(decimal("0")).is_some());
        assert!(Amount::new(decimal("5000")).is_some());
    }

    #[test]
    fn sums() {
        let total: Amount = [
            Amount::from(5000),
            Amount::from(5000),
            Amount::ZERO,
        ]
        .into_iter()
        .sum();

        assert_eq!(total, Amount::from(10000));
    }

    #[test]
    fn to_string() {
        assert_eq!(Amount::from(5000).to_string(), "5000");
        assert_eq!(
            Amount::new(decimal("4999.50")).unwrap().to_string(),
            "4999.50",
        );
    }
}
