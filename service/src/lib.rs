//! Office discovery and rate-ranking engine of a currency-exchange
//! comparison platform.
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use smart_default::SmartDefault;

use self::domain::rate;

pub use self::query::Query;

/// [`Engine`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// [`rate::Direction`] applied to a conversion request not specifying
    /// one.
    ///
    /// The shipped default assumes the customer buys the target currency,
    /// paying with the base one.
    #[default(rate::Direction::Buy)]
    pub default_rate_direction: rate::Direction,

    /// Number of items on a list page when a query does not specify it.
    #[default(12)]
    pub default_limit: usize,

    /// Maximum number of items on a list page.
    #[default(50)]
    pub max_limit: usize,
}

/// Engine executing office discovery queries.
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    /// Configuration of this [`Engine`].
    config: Config,
}

impl Engine {
    /// Creates a new [`Engine`] with the provided [`Config`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns [`Config`] of this [`Engine`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
