//! [`Query`] collection related to the multiple [`Office`]s.

use common::{pagination, Moment};
use serde::Deserialize;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{rate, Office},
    infra::records,
    read::office::{list, IsOpen},
    Engine, Query,
};

/// Queries a [`list::Page`] of [`Office`]s matching the provided
/// parameters.
#[derive(Clone, Debug)]
pub struct List {
    /// City-scoped [`Snapshot`] to discover [`Office`]s in.
    pub snapshot: Snapshot,

    /// Raw [`params::Params`] of the request.
    pub params: params::Params,

    /// [`Moment`] to evaluate open-now verdicts against.
    ///
    /// Selecting "today" out of the wall clock is the caller's concern.
    pub at: Moment,
}

/// City-scoped batch of raw [`Office`] records, as the persistence
/// collaborator supplies it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Raw [`records::Office`] rows.
    pub offices: Vec<records::Office>,

    /// Count of [`Office`]s in the city scope before any filtering.
    pub total_count: usize,
}

impl Query<List> for Engine {
    type Ok = list::Page;
    type Err = Traced<ExecutionError>;

    fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        let List { snapshot, params, at } = query;

        let selector = params
            .validate(self.config())
            .map_err(|e| tracerr::new!(e))?;

        let mut items: Vec<_> = snapshot
            .offices
            .into_iter()
            .filter_map(|rec| {
                let id = rec.id;
                let distance = rec.distance;
                Office::try_from(rec)
                    .map(|office| (office, distance.map(Into::into)))
                    .map_err(|e| {
                        log::warn!(office = %id, "skipping malformed record: {e}");
                    })
                    .ok()
            })
            .filter(|(office, _)| selector.filter.qualifies(office, at))
            .map(|(office, distance)| {
                let is_open = IsOpen(office.schedule.is_open_at(at));
                let exchange = selector.conversion.as_ref().and_then(|c| {
                    let direction = c
                        .direction
                        .unwrap_or(self.config().default_rate_direction);
                    rate::resolve(&office.rates, &c.base, &c.target, direction)
                        .map(|quote| list::Exchange {
                            amount: quote.convert(
                                c.amount,
                                c.target.clone(),
                                c.decimal_digits,
                            ),
                            direction,
                        })
                });
                list::Item::new(office, is_open, exchange, distance)
            })
            .collect();

        items.sort_by(selector.sorting.comparator());

        let page = pagination::Page::new(
            selector.arguments,
            items,
            snapshot.total_count,
        );
        Ok(list::Page::new(page, selector.applied_filters))
    }
}

/// Error of [`List`] [`Query`] execution.
pub type ExecutionError = params::Error;

pub mod params {
    //! Raw parameters of an [`Office`] list request.

    use std::collections::HashSet;

    use common::{currency::Code, pagination};
    use derive_more::{Display, Error as DeriveError};
    use rust_decimal::Decimal;
    use serde::Deserialize;

    #[cfg(doc)]
    use crate::domain::Office;
    use crate::{read::office::list, Config};

    /// Raw parameters of an [`Office`] list request, as parsed from its
    /// query string.
    #[derive(Clone, Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Params {
        /// 1-based number of the requested page.
        pub page: Option<usize>,

        /// Number of items on the page.
        pub limit: Option<usize>,

        /// Active flag to filter by.
        pub is_active: Option<bool>,

        /// Verified flag to filter by.
        pub is_verified: Option<bool>,

        /// Featured flag to filter by.
        pub is_featured: Option<bool>,

        /// Comma-separated currency codes to filter by, any match.
        pub available_currencies: Option<String>,

        /// Indicator whether only the offices open right now qualify.
        pub show_only_open_now: Option<bool>,

        /// Sort key of the list.
        pub sort_by: Option<String>,

        /// Sort order of the list.
        pub sort_order: Option<String>,

        /// Base currency of the conversion request.
        pub base_currency: Option<String>,

        /// Target currency of the conversion request.
        pub target_currency: Option<String>,

        /// Amount of the base currency to convert.
        pub target_currency_rate: Option<Decimal>,

        /// Direction of the rate to convert with.
        pub rate_direction: Option<String>,

        /// Display precision of the target currency, as the caller's
        /// currency registry defines it.
        pub decimal_digits: Option<u32>,
    }

    impl Params {
        /// Validates these [`Params`] into a [`list::Selector`].
        ///
        /// # Errors
        ///
        /// If any parameter is out of its range or fails to parse. The
        /// whole request is rejected here, before any filtering or ranking
        /// begins, so the pipeline always receives well-typed input.
        pub fn validate(
            self,
            config: &Config,
        ) -> Result<list::Selector, Error> {
            let page = self.page.unwrap_or(1);
            if page < 1 {
                return Err(Error::Page);
            }
            let limit = self.limit.unwrap_or(config.default_limit);
            let arguments =
                pagination::Arguments::new(page, limit, config.max_limit)
                    .ok_or(Error::Limit(config.max_limit))?;

            let currencies = self
                .available_currencies
                .as_deref()
                .map(currencies)
                .transpose()?
                .flatten();

            let sort_by = self
                .sort_by
                .as_deref()
                .map(|s| {
                    s.parse().map_err(|_| Error::SortBy(s.to_owned()))
                })
                .transpose()?;
            let sort_order = self
                .sort_order
                .as_deref()
                .map(|s| {
                    s.parse().map_err(|_| Error::SortOrder(s.to_owned()))
                })
                .transpose()?;
            let sorting = list::Sorting {
                by: sort_by.unwrap_or(list::SortBy::Name),
                order: sort_order.unwrap_or(list::SortOrder::Asc),
            };

            let direction = self
                .rate_direction
                .as_deref()
                .map(|s| {
                    s.parse().map_err(|_| Error::RateDirection(s.to_owned()))
                })
                .transpose()?;

            let conversion = match (
                self.base_currency.as_deref(),
                self.target_currency.as_deref(),
            ) {
                (Some(base), Some(target)) => {
                    let base = Code::new(base)
                        .ok_or_else(|| Error::Currency(base.to_owned()))?;
                    let target = Code::new(target)
                        .ok_or_else(|| Error::Currency(target.to_owned()))?;
                    let amount =
                        self.target_currency_rate.unwrap_or(Decimal::ONE);
                    if amount <= Decimal::ZERO {
                        return Err(Error::Amount);
                    }
                    Some(list::Conversion {
                        base,
                        target,
                        amount,
                        direction,
                        decimal_digits: self.decimal_digits.unwrap_or(2),
                    })
                }
                (None, None) if self.target_currency_rate.is_some() => {
                    return Err(Error::IncompleteConversion);
                }
                (None, None) => None,
                (Some(_), None) | (None, Some(_)) => {
                    return Err(Error::IncompleteConversion);
                }
            };

            let applied_filters = list::AppliedFilters {
                is_active: self.is_active,
                is_verified: self.is_verified,
                is_featured: self.is_featured,
                available_currencies: currencies.as_ref().map(|set| {
                    let mut codes: Vec<_> = set.iter().cloned().collect();
                    codes.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
                    codes
                }),
                show_only_open_now: self.show_only_open_now.filter(|v| *v),
                sort_by,
                sort_order,
                base_currency: conversion.as_ref().map(|c| c.base.clone()),
                target_currency: conversion.as_ref().map(|c| c.target.clone()),
                target_currency_rate: conversion
                    .as_ref()
                    .map(|c| c.amount),
                rate_direction: direction,
            };

            Ok(list::Selector {
                filter: list::Filter {
                    is_active: self.is_active,
                    is_verified: self.is_verified,
                    is_featured: self.is_featured,
                    currencies,
                    open_now: self.show_only_open_now.unwrap_or(false),
                },
                sorting,
                arguments,
                conversion,
                applied_filters,
            })
        }
    }

    /// Parses the comma-separated currency codes.
    ///
    /// Empty input yields [`None`] rather than an empty set, meaning no
    /// constraint.
    fn currencies(input: &str) -> Result<Option<HashSet<Code>>, Error> {
        let mut codes = HashSet::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let code =
                Code::new(part).ok_or_else(|| Error::Currency(part.to_owned()))?;
            _ = codes.insert(code);
        }
        Ok((!codes.is_empty()).then_some(codes))
    }

    /// Error of validating [`Params`].
    #[derive(Clone, Debug, Display, Eq, DeriveError, PartialEq)]
    pub enum Error {
        /// `page` is less than 1.
        #[display("`page` must be 1 or greater")]
        Page,

        /// `limit` is out of its range.
        #[display("`limit` must be between 1 and {_0}")]
        Limit(#[error(not(source))] usize),

        /// `sortBy` is not a known sort key.
        #[display("unknown `sortBy` value: {_0}")]
        SortBy(#[error(not(source))] String),

        /// `sortOrder` is not a known order.
        #[display("unknown `sortOrder` value: {_0}")]
        SortOrder(#[error(not(source))] String),

        /// `rateDirection` is not a known direction.
        #[display("unknown `rateDirection` value: {_0}")]
        RateDirection(#[error(not(source))] String),

        /// A currency code fails to parse.
        #[display("invalid currency code: {_0}")]
        Currency(#[error(not(source))] String),

        /// A conversion request misses its base or target currency.
        #[display(
            "conversion requires both `baseCurrency` and `targetCurrency`"
        )]
        IncompleteConversion,

        /// `targetCurrencyRate` is not positive.
        #[display("`targetCurrencyRate` must be positive")]
        Amount,
    }
}

#[cfg(test)]
mod spec {
    use common::{daytime::Weekday, Moment};
    use uuid::Uuid;

    use crate::{
        domain::rate,
        infra::records,
        read::office::list,
        Config, Engine, Query as _,
    };

    use super::{
        params::{Error, Params},
        List, Snapshot,
    };

    fn record(id: u128, name: &str) -> records::Office {
        records::Office {
            id: Uuid::from_u128(id),
            name: name.to_owned(),
            address: "1 High Street".to_owned(),
            city: "Casablanca".to_owned(),
            country: "Morocco".to_owned(),
            latitude: 33.59,
            longitude: -7.61,
            is_active: true,
            is_verified: false,
            is_featured: false,
            popularity: 0,
            rates: vec![],
            schedule: vec![],
            created_at: 1_700_000_000,
            distance: None,
        }
    }

    fn rate_pair(base: &str, target: &str) -> records::RatePair {
        records::RatePair {
            base_currency_code: base.to_owned(),
            target_currency_code: target.to_owned(),
            buy_rate: "10.5".parse().unwrap(),
            sell_rate: "10.9".parse().unwrap(),
            is_active: true,
        }
    }

    fn working_day(day_of_week: u8, from: &str, to: &str) -> records::DaySchedule {
        records::DaySchedule {
            day_of_week,
            is_active: true,
            from_time: from.to_owned(),
            to_time: to.to_owned(),
            has_break: false,
            break_from_time: None,
            break_to_time: None,
        }
    }

    fn noon() -> Moment {
        Moment {
            day: Weekday::Monday,
            time: "12:00".parse().unwrap(),
        }
    }

    fn run(
        offices: Vec<records::Office>,
        params: Params,
    ) -> Result<list::Page, Error> {
        let total_count = offices.len();
        Engine::default()
            .execute(List {
                snapshot: Snapshot {
                    offices,
                    total_count,
                },
                params,
                at: noon(),
            })
            .map_err(|e| e.as_ref().clone())
    }

    #[test]
    fn filters_by_active_flag() {
        let mut b = record(2, "Baraka");
        b.is_active = false;
        let offices = vec![record(1, "Atlas"), b, record(3, "Crown")];

        let page = run(
            offices,
            Params {
                is_active: Some(true),
                ..Params::default()
            },
        )
        .unwrap();

        let names: Vec<_> =
            page.data.iter().map(|i| i.name.to_string()).collect();
        assert_eq!(names, ["Atlas", "Crown"]);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.filtered_count, 2);
    }

    #[test]
    fn skips_malformed_records_without_aborting() {
        let mut broken = record(2, "Baraka");
        broken.schedule.push(working_day(1, "whenever", "18:00"));
        let offices = vec![record(1, "Atlas"), broken, record(3, "Crown")];

        let page = run(offices, Params::default()).unwrap();

        let names: Vec<_> =
            page.data.iter().map(|i| i.name.to_string()).collect();
        assert_eq!(names, ["Atlas", "Crown"]);
    }

    #[test]
    fn missing_rate_pair_keeps_the_office_listed() {
        let mut with_pair = record(1, "Atlas");
        with_pair.rates.push(rate_pair("EUR", "MAD"));
        let without_pair = record(2, "Baraka");

        let page = run(
            vec![with_pair, without_pair],
            Params {
                base_currency: Some("EUR".to_owned()),
                target_currency: Some("MAD".to_owned()),
                target_currency_rate: Some("100".parse().unwrap()),
                ..Params::default()
            },
        )
        .unwrap();

        assert_eq!(page.data.len(), 2);
        let atlas = &page.data[0];
        let baraka = &page.data[1];
        assert_eq!(
            atlas.exchange.as_ref().unwrap().amount.to_string(),
            "1050MAD",
        );
        assert_eq!(
            atlas.exchange.as_ref().unwrap().direction,
            rate::Direction::Buy,
        );
        assert!(baraka.exchange.is_none());
    }

    #[test]
    fn conversion_resolves_inverted_orientation() {
        let mut office = record(1, "Atlas");
        office.rates.push(rate_pair("EUR", "MAD"));

        let page = run(
            vec![office],
            Params {
                base_currency: Some("MAD".to_owned()),
                target_currency: Some("EUR".to_owned()),
                target_currency_rate: Some("1050".parse().unwrap()),
                ..Params::default()
            },
        )
        .unwrap();

        assert_eq!(
            page.data[0].exchange.as_ref().unwrap().amount.to_string(),
            "100EUR",
        );
    }

    #[test]
    fn explicit_sell_direction_is_applied() {
        let mut office = record(1, "Atlas");
        office.rates.push(rate_pair("EUR", "MAD"));

        let page = run(
            vec![office],
            Params {
                base_currency: Some("EUR".to_owned()),
                target_currency: Some("MAD".to_owned()),
                target_currency_rate: Some("100".parse().unwrap()),
                rate_direction: Some("sell".to_owned()),
                ..Params::default()
            },
        )
        .unwrap();

        let exchange = page.data[0].exchange.as_ref().unwrap();
        assert_eq!(exchange.direction, rate::Direction::Sell);
        assert_eq!(exchange.amount.to_string(), "1090MAD");
    }

    #[test]
    fn open_now_excludes_closed_offices() {
        let mut open = record(1, "Atlas");
        open.schedule.push(working_day(1, "09:00", "18:00"));
        let mut closed = record(2, "Baraka");
        closed.schedule.push(working_day(1, "14:00", "18:00"));
        let unscheduled = record(3, "Crown");

        let page = run(
            vec![open, closed, unscheduled],
            Params {
                show_only_open_now: Some(true),
                ..Params::default()
            },
        )
        .unwrap();

        let names: Vec<_> =
            page.data.iter().map(|i| i.name.to_string()).collect();
        assert_eq!(names, ["Atlas"]);
        assert!(*page.data[0].is_open);
    }

    #[test]
    fn out_of_range_page_yields_empty_data() {
        let offices = (1..=12)
            .map(|n| record(n, &format!("Office {n:02}")))
            .collect();

        let page = run(
            offices,
            Params {
                page: Some(5),
                limit: Some(10),
                ..Params::default()
            },
        )
        .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.filtered_count, 12);
        assert_eq!(page.pagination.total_pages, 2);
    }

    #[test]
    fn pages_slice_the_same_ranking() {
        let offices: Vec<_> = (1..=25)
            .map(|n| record(n, &format!("Office {n:02}")))
            .collect();

        let all = run(
            offices.clone(),
            Params {
                limit: Some(50),
                ..Params::default()
            },
        )
        .unwrap();
        let second = run(
            offices,
            Params {
                page: Some(2),
                limit: Some(10),
                ..Params::default()
            },
        )
        .unwrap();

        let ids = |items: &[list::Item]| {
            items.iter().map(|i| i.id).collect::<Vec<_>>()
        };
        assert_eq!(ids(&second.data), ids(&all.data[10..20]));
    }

    #[test]
    fn sorts_by_popularity_descending() {
        let mut a = record(1, "Atlas");
        a.popularity = 5;
        let mut b = record(2, "Baraka");
        b.popularity = 90;
        let mut c = record(3, "Crown");
        c.popularity = 30;

        let page = run(
            vec![a, b, c],
            Params {
                sort_by: Some("popular".to_owned()),
                sort_order: Some("desc".to_owned()),
                ..Params::default()
            },
        )
        .unwrap();

        let names: Vec<_> =
            page.data.iter().map(|i| i.name.to_string()).collect();
        assert_eq!(names, ["Baraka", "Crown", "Atlas"]);
    }

    #[test]
    fn rejects_out_of_range_limit() {
        let over = run(
            vec![],
            Params {
                limit: Some(51),
                ..Params::default()
            },
        );
        assert_eq!(over.unwrap_err(), Error::Limit(50));

        let zero = run(
            vec![],
            Params {
                limit: Some(0),
                ..Params::default()
            },
        );
        assert_eq!(zero.unwrap_err(), Error::Limit(50));
    }

    #[test]
    fn rejects_unknown_sort_key() {
        let result = run(
            vec![],
            Params {
                sort_by: Some("distance".to_owned()),
                ..Params::default()
            },
        );
        assert_eq!(result.unwrap_err(), Error::SortBy("distance".to_owned()));
    }

    #[test]
    fn rejects_incomplete_conversion() {
        let result = run(
            vec![],
            Params {
                base_currency: Some("EUR".to_owned()),
                ..Params::default()
            },
        );
        assert_eq!(result.unwrap_err(), Error::IncompleteConversion);
    }

    #[test]
    fn rejects_malformed_currency_filter() {
        let result = run(
            vec![],
            Params {
                available_currencies: Some("EUR,EURO".to_owned()),
                ..Params::default()
            },
        );
        assert_eq!(result.unwrap_err(), Error::Currency("EURO".to_owned()));
    }

    #[test]
    fn echoes_applied_filters() {
        let page = run(
            vec![record(1, "Atlas")],
            Params {
                is_verified: Some(true),
                available_currencies: Some("mad,eur".to_owned()),
                sort_by: Some("newest".to_owned()),
                ..Params::default()
            },
        )
        .unwrap();

        let applied = &page.applied_filters;
        assert_eq!(applied.is_verified, Some(true));
        assert_eq!(applied.is_active, None);
        assert_eq!(
            applied
                .available_currencies
                .as_ref()
                .unwrap()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            ["EUR", "MAD"],
        );
        assert_eq!(applied.sort_by, Some(list::SortBy::Newest));
        assert_eq!(applied.sort_order, None);
        assert_eq!(applied.show_only_open_now, None);
    }

    #[test]
    fn defaults_follow_configuration() {
        let config = Config::default();
        assert_eq!(config.default_limit, 12);
        assert_eq!(config.max_limit, 50);
        assert_eq!(config.default_rate_direction, rate::Direction::Buy);

        let offices = (1..=13).map(|n| record(n, "Same")).collect();
        let page = run(offices, Params::default()).unwrap();
        assert_eq!(page.data.len(), 12);
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, 12);
        assert_eq!(page.pagination.total_pages, 2);
    }
}
