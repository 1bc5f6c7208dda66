//! [`Office`]-related read definitions.

use derive_more::Deref;
use serde::Serialize;

#[cfg(doc)]
use crate::domain::Office;

/// Indicator whether an [`Office`] is open at the queried moment.
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq, Serialize)]
pub struct IsOpen(pub bool);

impl PartialEq<bool> for IsOpen {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

pub mod list {
    //! [`Office`] list definitions.

    use std::{cmp::Ordering, collections::HashSet};

    use common::{currency::Code, define_kind, pagination, Money, Moment};
    use derive_more::From;
    use rust_decimal::Decimal;
    use serde::Serialize;

    use crate::domain::{office, rate, Office};
    #[cfg(doc)]
    use crate::query::offices::List;

    use super::IsOpen;

    /// Item of an [`Office`] list: the office itself paired with the fields
    /// derived for the request.
    ///
    /// A new [`Item`] is built per request, the [`Office`] records
    /// themselves are never mutated.
    #[derive(Clone, Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Item {
        /// ID of the [`Office`].
        pub id: office::Id,

        /// Display name of the [`Office`].
        pub name: office::Name,

        /// Address of the [`Office`].
        pub address: office::Address,

        /// City the [`Office`] is located in.
        pub city: office::City,

        /// Country the [`Office`] is located in.
        pub country: office::Country,

        /// Geographic location of the [`Office`].
        pub location: office::Location,

        /// Indicator whether the [`Office`] is active.
        pub is_active: bool,

        /// Indicator whether the [`Office`] has passed verification.
        pub is_verified: bool,

        /// Indicator whether the [`Office`] is featured.
        pub is_featured: bool,

        /// Popularity counter of the [`Office`].
        pub popularity: office::Popularity,

        /// When the [`Office`] was created.
        #[serde(with = "common::datetime::serde::unix_timestamp")]
        pub created_at: office::CreationDateTime,

        /// Indicator whether the [`Office`] is open at the queried moment.
        pub is_open: IsOpen,

        /// [`Exchange`] the [`Office`] quotes for the requested conversion,
        /// if it holds a matching active rate pair.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub exchange: Option<Exchange>,

        /// [`Distance`] of the [`Office`] from the query point, when
        /// supplied.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub distance: Option<Distance>,
    }

    impl Item {
        /// Builds a new [`Item`] out of the provided [`Office`] and the
        /// fields derived for the request.
        #[must_use]
        pub fn new(
            office: Office,
            is_open: IsOpen,
            exchange: Option<Exchange>,
            distance: Option<Distance>,
        ) -> Self {
            let Office {
                id,
                name,
                address,
                city,
                country,
                location,
                is_active,
                is_verified,
                is_featured,
                popularity,
                rates: _,
                schedule: _,
                created_at,
            } = office;

            Self {
                id,
                name,
                address,
                city,
                country,
                location,
                is_active,
                is_verified,
                is_featured,
                popularity,
                created_at,
                is_open,
                exchange,
                distance,
            }
        }
    }

    /// Converted amount an [`Office`] quotes for the requested conversion.
    #[derive(Clone, Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Exchange {
        /// [`Money`] amount in the target currency.
        pub amount: Money,

        /// [`rate::Direction`] the amount was computed with.
        pub direction: rate::Direction,
    }

    /// Distance of an [`Office`] from the query point, as the external
    /// geospatial capability computed it.
    #[derive(Clone, Copy, Debug, From, PartialEq, Serialize)]
    pub struct Distance(f64);

    /// Filter for a [`Selector`].
    ///
    /// Every present constraint must hold for an [`Office`] to qualify.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Required active flag, if any.
        pub is_active: Option<bool>,

        /// Required verified flag, if any.
        pub is_verified: Option<bool>,

        /// Required featured flag, if any.
        pub is_featured: Option<bool>,

        /// Currency codes at least one active rate pair of an [`Office`]
        /// must mention, if any.
        pub currencies: Option<HashSet<Code>>,

        /// Indicator whether only the [`Office`]s open at the queried
        /// moment qualify.
        pub open_now: bool,
    }

    impl Filter {
        /// Checks whether the provided [`Office`] satisfies every
        /// constraint of this [`Filter`].
        #[must_use]
        pub fn qualifies(&self, office: &Office, at: Moment) -> bool {
            if self.is_active.is_some_and(|v| office.is_active != v)
                || self.is_verified.is_some_and(|v| office.is_verified != v)
                || self.is_featured.is_some_and(|v| office.is_featured != v)
            {
                return false;
            }
            if let Some(codes) = &self.currencies {
                if !office.rates.iter().any(|p| {
                    p.is_active
                        && (codes.contains(&p.base)
                            || codes.contains(&p.target))
                }) {
                    return false;
                }
            }
            !self.open_now || office.schedule.is_open_at(at)
        }
    }

    define_kind! {
        #[doc = "Sort key of an [`Office`] list."]
        enum SortBy {
            #[doc = "By display name, case-insensitively."]
            Name = 1,

            #[doc = "By creation date and time."]
            Newest = 2,

            #[doc = "By verified flag."]
            Verified = 3,

            #[doc = "By featured flag."]
            Featured = 4,

            #[doc = "By popularity counter."]
            Popular = 5,
        }
    }

    define_kind! {
        #[doc = "Order of an [`Office`] list sorting."]
        enum SortOrder {
            #[doc = "Ascending order."]
            Asc = 1,

            #[doc = "Descending order."]
            Desc = 2,
        }
    }

    impl SortBy {
        /// Returns the comparator of this sort key.
        ///
        /// One comparator per key, picked once per request, so the ranking
        /// loop itself never branches on the key.
        #[must_use]
        pub fn comparator(self) -> fn(&Item, &Item) -> Ordering {
            match self {
                Self::Name => |a, b| {
                    let a: &str = a.name.as_ref();
                    let b: &str = b.name.as_ref();
                    a.to_lowercase().cmp(&b.to_lowercase())
                },
                Self::Newest => |a, b| a.created_at.cmp(&b.created_at),
                Self::Verified => |a, b| a.is_verified.cmp(&b.is_verified),
                Self::Featured => |a, b| a.is_featured.cmp(&b.is_featured),
                Self::Popular => |a, b| a.popularity.cmp(&b.popularity),
            }
        }
    }

    /// Sorting of an [`Office`] list.
    #[derive(Clone, Copy, Debug)]
    pub struct Sorting {
        /// Key to sort by.
        pub by: SortBy,

        /// Order to sort in.
        pub order: SortOrder,
    }

    impl Sorting {
        /// Returns the total-order comparator of this [`Sorting`].
        ///
        /// The [`SortOrder`] inverts the primary key only. Equal keys fall
        /// back to the [`office::Id`], never inverted, keeping the ordering
        /// deterministic and the pages stable across requests.
        #[must_use]
        pub fn comparator(self) -> impl Fn(&Item, &Item) -> Ordering {
            let primary = self.by.comparator();
            move |a, b| {
                let ordering = match self.order {
                    SortOrder::Asc => primary(a, b),
                    SortOrder::Desc => primary(a, b).reverse(),
                };
                ordering.then_with(|| a.id.cmp(&b.id))
            }
        }
    }

    /// Conversion request attached to an [`Office`] list query.
    #[derive(Clone, Debug)]
    pub struct Conversion {
        /// Currency the customer pays with.
        pub base: Code,

        /// Currency the customer requests.
        pub target: Code,

        /// Amount of the base currency to convert.
        pub amount: Decimal,

        /// [`rate::Direction`] to convert in, when the request specifies
        /// one.
        pub direction: Option<rate::Direction>,

        /// Display precision of the target currency, as the caller's
        /// currency registry defines it.
        pub decimal_digits: u32,
    }

    /// Fully validated query of a single [`Office`] list request.
    ///
    /// Built once per request, consumed by the pipeline, discarded with
    /// the response.
    #[derive(Clone, Debug)]
    pub struct Selector {
        /// [`Filter`] to qualify [`Office`]s with.
        pub filter: Filter,

        /// [`Sorting`] to rank the qualified [`Office`]s with.
        pub sorting: Sorting,

        /// Pagination [`pagination::Arguments`] of the request.
        pub arguments: pagination::Arguments,

        /// [`Conversion`] request, if any.
        pub conversion: Option<Conversion>,

        /// [`AppliedFilters`] echo to attach to the response.
        pub applied_filters: AppliedFilters,
    }

    /// Page of an [`Office`] list: the response payload of a [`List`]
    /// query.
    #[derive(Clone, Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Page {
        /// [`Item`]s of the requested page.
        pub data: Vec<Item>,

        /// Count of [`Office`]s in the city scope before any filtering.
        pub total_count: usize,

        /// Count of [`Office`]s matching the filter, across all pages.
        pub filtered_count: usize,

        /// [`PageInfo`] of this [`Page`].
        pub pagination: PageInfo,

        /// Echo of the non-default fields the list was requested with.
        pub applied_filters: AppliedFilters,
    }

    impl Page {
        /// Assembles a new [`Page`] payload out of the sliced page.
        #[must_use]
        pub fn new(
            page: pagination::Page<Item>,
            applied_filters: AppliedFilters,
        ) -> Self {
            let total_pages = page.total_pages();
            Self {
                data: page.items,
                total_count: page.total_count,
                filtered_count: page.filtered_count,
                pagination: PageInfo {
                    page: page.page,
                    limit: page.limit,
                    total_pages,
                },
                applied_filters,
            }
        }
    }

    /// Information about a [`Page`].
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageInfo {
        /// 1-based number of the page.
        pub page: usize,

        /// Maximum number of items on the page.
        pub limit: usize,

        /// Number of pages the filtered selection spans.
        pub total_pages: usize,
    }

    /// Echo of the non-default fields an [`Office`] list was requested
    /// with.
    #[derive(Clone, Debug, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppliedFilters {
        /// Requested active flag.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub is_active: Option<bool>,

        /// Requested verified flag.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub is_verified: Option<bool>,

        /// Requested featured flag.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub is_featured: Option<bool>,

        /// Requested currency codes.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub available_currencies: Option<Vec<Code>>,

        /// Indicator whether only the open offices were requested.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub show_only_open_now: Option<bool>,

        /// Requested sort key.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub sort_by: Option<SortBy>,

        /// Requested sort order.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub sort_order: Option<SortOrder>,

        /// Base currency of the requested conversion.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub base_currency: Option<Code>,

        /// Target currency of the requested conversion.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub target_currency: Option<Code>,

        /// Amount of the requested conversion.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub target_currency_rate: Option<Decimal>,

        /// Direction of the requested conversion.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub rate_direction: Option<rate::Direction>,
    }
}
