//! Raw records, as the persistence collaborator supplies them.
//!
//! Records arrive already scoped to the requested city. All parsing and
//! validation of their stringly fields happens in the [`TryFrom`]
//! conversions here, so malformed data never reaches the domain types: a
//! record failing conversion is skipped by the caller, never aborting the
//! whole batch.

use common::{
    currency,
    daytime::{self, Weekday},
};
use derive_more::{Display, Error as DeriveError};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{self, office, rate, schedule};

/// Raw [`domain::Office`] row.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    /// ID of the office.
    pub id: Uuid,

    /// Display name of the office.
    pub name: String,

    /// Full address of the office.
    pub address: String,

    /// City the office is located in.
    pub city: String,

    /// Country the office is located in.
    pub country: String,

    /// Latitude of the office, in degrees.
    pub latitude: f64,

    /// Longitude of the office, in degrees.
    pub longitude: f64,

    /// Indicator whether the office is active.
    pub is_active: bool,

    /// Indicator whether the office has passed verification.
    pub is_verified: bool,

    /// Indicator whether the office is featured.
    pub is_featured: bool,

    /// Popularity counter of the office.
    #[serde(default)]
    pub popularity: u64,

    /// Rate pairs the office quotes.
    #[serde(default)]
    pub rates: Vec<RatePair>,

    /// Weekly operating hours of the office.
    #[serde(default)]
    pub schedule: Vec<DaySchedule>,

    /// Unix timestamp of the office creation.
    pub created_at: i64,

    /// Distance from the query point, when the collaborator's geospatial
    /// capability computed one.
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Raw [`domain::RatePair`] row of an [`Office`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePair {
    /// Base currency code of the pair.
    pub base_currency_code: String,

    /// Target currency code of the pair.
    pub target_currency_code: String,

    /// Rate applying when the customer buys the target currency.
    pub buy_rate: Decimal,

    /// Rate applying when the customer sells the target currency.
    pub sell_rate: Decimal,

    /// Indicator whether the pair is active.
    pub is_active: bool,
}

/// Raw [`domain::DaySchedule`] row of an [`Office`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// ISO 8601 number of the day of week, 1 being Monday.
    pub day_of_week: u8,

    /// Indicator whether the office opens on this day.
    pub is_active: bool,

    /// Time the office opens at, as a `HH:MM[:SS]` string.
    pub from_time: String,

    /// Time the office closes at, as a `HH:MM[:SS]` string.
    pub to_time: String,

    /// Indicator whether the office takes a midday break.
    pub has_break: bool,

    /// Time the break starts at.
    ///
    /// Ignored unless `has_break` is set.
    #[serde(default)]
    pub break_from_time: Option<String>,

    /// Time the break ends at.
    ///
    /// Ignored unless `has_break` is set.
    #[serde(default)]
    pub break_to_time: Option<String>,
}

impl TryFrom<Office> for domain::Office {
    type Error = Error;

    fn try_from(rec: Office) -> Result<Self, Self::Error> {
        let rates = rec
            .rates
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?;
        let schedule = rec
            .schedule
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: rec.id.into(),
            name: office::Name::new(rec.name).ok_or(Error::Name)?,
            address: office::Address::new(rec.address).ok_or(Error::Address)?,
            city: office::City::new(rec.city).ok_or(Error::City)?,
            country: office::Country::new(rec.country).ok_or(Error::Country)?,
            location: office::Location::new(rec.latitude, rec.longitude)
                .ok_or(Error::Location)?,
            is_active: rec.is_active,
            is_verified: rec.is_verified,
            is_featured: rec.is_featured,
            popularity: rec.popularity,
            rates,
            schedule: schedule::WeekSchedule::new(schedule),
            created_at: office::CreationDateTime::from_unix_timestamp(
                rec.created_at,
            )
            .ok_or(Error::CreatedAt)?,
        })
    }
}

impl TryFrom<RatePair> for domain::RatePair {
    type Error = Error;

    fn try_from(rec: RatePair) -> Result<Self, Self::Error> {
        Ok(Self {
            base: currency::Code::new(&rec.base_currency_code)
                .ok_or(Error::Currency(rec.base_currency_code))?,
            target: currency::Code::new(&rec.target_currency_code)
                .ok_or(Error::Currency(rec.target_currency_code))?,
            buy: rate::Rate::new(rec.buy_rate)
                .ok_or(Error::Rate(rec.buy_rate))?,
            sell: rate::Rate::new(rec.sell_rate)
                .ok_or(Error::Rate(rec.sell_rate))?,
            is_active: rec.is_active,
        })
    }
}

impl TryFrom<DaySchedule> for domain::DaySchedule {
    type Error = Error;

    fn try_from(rec: DaySchedule) -> Result<Self, Self::Error> {
        let break_time = if rec.has_break {
            let (from, to) = rec
                .break_from_time
                .zip(rec.break_to_time)
                .ok_or(Error::IncompleteBreak)?;
            Some(schedule::BreakTime {
                from: from.parse().map_err(Error::Time)?,
                to: to.parse().map_err(Error::Time)?,
            })
        } else {
            None
        };

        Ok(Self {
            day: weekday(rec.day_of_week)?,
            is_active: rec.is_active,
            opens_at: rec.from_time.parse().map_err(Error::Time)?,
            closes_at: rec.to_time.parse().map_err(Error::Time)?,
            break_time,
        })
    }
}

/// Maps an ISO 8601 day of week number (1 is Monday) onto a [`Weekday`].
fn weekday(num: u8) -> Result<Weekday, Error> {
    Ok(match num {
        1 => Weekday::Monday,
        2 => Weekday::Tuesday,
        3 => Weekday::Wednesday,
        4 => Weekday::Thursday,
        5 => Weekday::Friday,
        6 => Weekday::Saturday,
        7 => Weekday::Sunday,
        n => return Err(Error::Day(n)),
    })
}

/// Error of converting a raw record into its domain representation.
#[derive(Clone, Debug, Display, DeriveError)]
pub enum Error {
    /// Office name is malformed.
    #[display("malformed office name")]
    Name,

    /// Office address is malformed.
    #[display("malformed office address")]
    Address,

    /// City name is malformed.
    #[display("malformed city name")]
    City,

    /// Country name is malformed.
    #[display("malformed country name")]
    Country,

    /// Office coordinates are out of their ranges.
    #[display("office coordinates are out of range")]
    Location,

    /// A currency code of a rate pair is malformed.
    #[display("malformed currency code: {_0}")]
    Currency(#[error(not(source))] String),

    /// An exchange rate is not positive.
    #[display("non-positive exchange rate: {_0}")]
    Rate(#[error(not(source))] Decimal),

    /// A wall-clock time of a schedule is malformed.
    #[display("malformed schedule time: {_0}")]
    Time(daytime::ParseError),

    /// A day of week number is out of its range.
    #[display("unknown day of week: {_0}")]
    Day(#[error(not(source))] u8),

    /// A break is enabled without both of its bounds.
    #[display("break is enabled but its bounds are not set")]
    IncompleteBreak,

    /// Creation timestamp is out of its range.
    #[display("invalid creation timestamp")]
    CreatedAt,
}

#[cfg(test)]
mod spec {
    use common::daytime::Weekday;

    use crate::domain;

    use super::{DaySchedule, Error, Office, RatePair};

    fn office() -> Office {
        Office {
            id: uuid::Uuid::from_u128(1),
            name: "Atlas Exchange".to_owned(),
            address: "12 Rue du Commerce".to_owned(),
            city: "Casablanca".to_owned(),
            country: "Morocco".to_owned(),
            latitude: 33.59,
            longitude: -7.61,
            is_active: true,
            is_verified: true,
            is_featured: false,
            popularity: 42,
            rates: vec![RatePair {
                base_currency_code: "EUR".to_owned(),
                target_currency_code: "MAD".to_owned(),
                buy_rate: "10.5".parse().unwrap(),
                sell_rate: "10.9".parse().unwrap(),
                is_active: true,
            }],
            schedule: vec![DaySchedule {
                day_of_week: 1,
                is_active: true,
                from_time: "09:00".to_owned(),
                to_time: "18:00:00".to_owned(),
                has_break: true,
                break_from_time: Some("13:00".to_owned()),
                break_to_time: Some("14:00".to_owned()),
            }],
            created_at: 1_700_000_000,
            distance: None,
        }
    }

    #[test]
    fn converts_well_formed_record() {
        let office = domain::Office::try_from(office()).unwrap();

        assert_eq!(office.name.to_string(), "Atlas Exchange");
        assert_eq!(office.rates.len(), 1);
        let day = office.schedule.day(Weekday::Monday).unwrap();
        assert_eq!(day.opens_at.to_string(), "09:00");
        assert_eq!(day.closes_at.to_string(), "18:00");
        assert!(day.break_time.is_some());
    }

    #[test]
    fn rejects_malformed_time() {
        let mut rec = office();
        rec.schedule[0].from_time = "whenever".to_owned();

        assert!(matches!(
            domain::Office::try_from(rec),
            Err(Error::Time(_)),
        ));
    }

    #[test]
    fn rejects_incomplete_break() {
        let mut rec = office();
        rec.schedule[0].break_to_time = None;

        assert!(matches!(
            domain::Office::try_from(rec),
            Err(Error::IncompleteBreak),
        ));
    }

    #[test]
    fn ignores_break_fields_without_the_flag() {
        let mut rec = office();
        rec.schedule[0].has_break = false;
        rec.schedule[0].break_from_time = Some("garbage".to_owned());
        rec.schedule[0].break_to_time = None;

        let office = domain::Office::try_from(rec).unwrap();
        let day = office.schedule.day(Weekday::Monday).unwrap();
        assert!(day.break_time.is_none());
    }

    #[test]
    fn rejects_non_positive_rate() {
        let mut rec = office();
        rec.rates[0].buy_rate = "-1".parse().unwrap();

        assert!(matches!(
            domain::Office::try_from(rec),
            Err(Error::Rate(_)),
        ));
    }

    #[test]
    fn rejects_unknown_day_of_week() {
        let mut rec = office();
        rec.schedule[0].day_of_week = 8;

        assert!(matches!(domain::Office::try_from(rec), Err(Error::Day(8))));
    }
}
