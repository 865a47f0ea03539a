//! Order list filter
//!
//! A linear pass over an in-memory list with three predicates: status,
//! an inclusive day range and a case-insensitive text search. The same
//! struct is the query string of the admin list and export endpoints.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, ErrorCode};
use crate::models::{Order, OrderStatus};

/// Status selector of the filter bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Confirmed,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Confirmed => "confirmed",
        }
    }

    pub fn accepts(&self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == OrderStatus::Pending,
            StatusFilter::Confirmed => status == OrderStatus::Confirmed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "confirmed" => Ok(StatusFilter::Confirmed),
            other => Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("unknown status filter: {other}"),
            )),
        }
    }
}

/// Filter applied to the order list
///
/// `from` / `to` are calendar days in the zone given by `offset`
/// (minutes east of UTC). Both bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    #[serde(default, deserialize_with = "status_or_all")]
    pub status: StatusFilter,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<NaiveDate>,
    #[serde(default, rename = "q", skip_serializing_if = "String::is_empty")]
    pub search: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub offset: i32,
}

impl OrderFilter {
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn with_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_offset_minutes(mut self, minutes: i32) -> Self {
        self.offset = minutes;
        self
    }

    /// True when nothing would be filtered out
    pub fn is_empty(&self) -> bool {
        self.status == StatusFilter::All
            && self.from.is_none()
            && self.to.is_none()
            && self.search.trim().is_empty()
    }

    fn zone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.offset.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    /// First instant of the `from` day
    pub fn range_start(&self) -> Option<DateTime<Utc>> {
        self.from.and_then(|day| self.day_instant(day, NaiveTime::MIN))
    }

    /// Last millisecond of the `to` day
    pub fn range_end(&self) -> Option<DateTime<Utc>> {
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
        self.to.and_then(|day| self.day_instant(day, end_of_day))
    }

    fn day_instant(&self, day: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        self.zone()
            .from_local_datetime(&day.and_time(time))
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.matches_prepared(order, &self.prepare())
    }

    /// Orders passing every predicate, in input order
    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        let prepared = self.prepare();
        orders
            .iter()
            .filter(|o| self.matches_prepared(o, &prepared))
            .cloned()
            .collect()
    }

    fn prepare(&self) -> Prepared {
        Prepared {
            start: self.range_start(),
            end: self.range_end(),
            term: self.search.trim().to_lowercase(),
        }
    }

    fn matches_prepared(&self, order: &Order, p: &Prepared) -> bool {
        if !self.status.accepts(order.status) {
            return false;
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(created) = order.created_at else {
                return false;
            };
            if p.start.is_some_and(|start| created < start) {
                return false;
            }
            if p.end.is_some_and(|end| created > end) {
                return false;
            }
        }

        if p.term.is_empty() {
            return true;
        }
        [
            &order.product_title,
            &order.name,
            &order.phone,
            &order.address,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&p.term))
    }
}

struct Prepared {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    term: String,
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

/// Browsers send `from=` for a cleared date input
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn status_or_all<'de, D>(deserializer: D) -> Result<StatusFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: AppError| serde::de::Error::custom(e.message))
}
