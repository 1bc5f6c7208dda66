//! [`RatePair`] definitions.

use common::{currency::Code, define_kind, Money};
use derive_more::{Display, Into};
use rust_decimal::Decimal;

/// Buy/sell quote of an office for converting one currency into another.
///
/// An office holds at most one active [`RatePair`] per ordered
/// (base, target) pair at a time, maintained by the rate-history
/// collaborator.
#[derive(Clone, Debug)]
pub struct RatePair {
    /// Base currency of this pair.
    pub base: Code,

    /// Target currency of this pair.
    pub target: Code,

    /// [`Rate`] applying when the customer buys the target currency.
    pub buy: Rate,

    /// [`Rate`] applying when the customer sells the target currency.
    pub sell: Rate,

    /// Indicator whether this [`RatePair`] is active.
    pub is_active: bool,
}

impl RatePair {
    /// Returns the [`Rate`] of this pair applying to the provided
    /// [`Direction`].
    #[must_use]
    pub fn rate(&self, direction: Direction) -> Rate {
        match direction {
            Direction::Buy => self.buy,
            Direction::Sell => self.sell,
        }
    }
}

/// Positive exchange rate of a [`RatePair`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct Rate(Decimal);

impl Rate {
    /// Creates a new [`Rate`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `rate` is positive.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(rate: Decimal) -> Self {
        Self(rate)
    }

    /// Creates a new [`Rate`] if the given `rate` is positive.
    #[must_use]
    pub fn new(rate: Decimal) -> Option<Self> {
        (rate.is_sign_positive() && !rate.is_zero()).then_some(Self(rate))
    }

    /// Returns the [`Decimal`] value of this [`Rate`].
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }
}

define_kind! {
    #[doc = "Direction a rate applies to: the customer buying or selling \
             the target currency."]
    enum Direction {
        #[doc = "Customer buys the target currency."]
        Buy = 1,

        #[doc = "Customer sells the target currency."]
        Sell = 2,
    }
}

/// Resolves the [`Quote`] an office gives for converting the `base`
/// currency into the `target` one.
///
/// Active pairs are matched in either orientation: a pair stored as
/// (target, base) yields an inverted [`Quote`]. [`None`] means the office
/// holds no active pair for the combination, which only omits the
/// converted amount and never disqualifies the office itself.
#[must_use]
pub fn resolve(
    pairs: &[RatePair],
    base: &Code,
    target: &Code,
    direction: Direction,
) -> Option<Quote> {
    pairs.iter().filter(|p| p.is_active).find_map(|p| {
        if (&p.base, &p.target) == (base, target) {
            Some(Quote {
                rate: p.rate(direction),
                direction,
                inverted: false,
            })
        } else if (&p.base, &p.target) == (target, base) {
            Some(Quote {
                rate: p.rate(direction),
                direction,
                inverted: true,
            })
        } else {
            None
        }
    })
}

/// [`Rate`] resolved for a concrete conversion request.
#[derive(Clone, Copy, Debug)]
pub struct Quote {
    /// [`Rate`] to convert with.
    pub rate: Rate,

    /// [`Direction`] the rate was picked by.
    pub direction: Direction,

    /// Indicator whether the pair is stored in the opposite orientation,
    /// so amounts are divided by the rate instead of multiplied.
    pub inverted: bool,
}

impl Quote {
    /// Converts the provided amount of the base currency into the `target`
    /// one, rounding to the currency's display precision with midpoints
    /// going away from zero.
    #[must_use]
    pub fn convert(
        &self,
        amount: Decimal,
        target: Code,
        decimal_digits: u32,
    ) -> Money {
        let amount = if self.inverted {
            amount / self.rate.get()
        } else {
            amount * self.rate.get()
        };
        Money {
            amount,
            currency: target,
        }
        .round(decimal_digits)
    }
}
