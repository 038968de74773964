//! System event templates.
//!
//! A template names a recurring industry date either by fixed month/day
//! or by a [`DynamicRule`]. Templates are read-only configuration; the
//! events derived from them are ephemeral.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::event::{CampaignInfo, EventPriority, Reminder, Tag};

/// Rule-computed date, resolved per year. A closed set -- unknown rule
/// kinds cannot exist by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DynamicRule {
    /// The nth (1-based) occurrence of a weekday within a month,
    /// e.g. the 2nd Sunday of May.
    NthWeekdayOfMonth { month: u32, weekday: Weekday, nth: u8 },
    /// The final occurrence of a weekday within a month.
    LastWeekdayOfMonth { month: u32, weekday: Weekday },
    /// A day offset from another template's date in the same year,
    /// e.g. the day after `thanksgiving`.
    OffsetFromTemplate { base_key: String, days: i64 },
}

impl DynamicRule {
    /// Resolve the rule against a year. `OffsetFromTemplate` is resolved
    /// by the generator, which owns the catalog; here it yields `None`.
    pub fn resolve(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            DynamicRule::NthWeekdayOfMonth { month, weekday, nth } => {
                nth_weekday_of_month(year, month, weekday, nth)
            }
            DynamicRule::LastWeekdayOfMonth { month, weekday } => {
                last_weekday_of_month(year, month, weekday)
            }
            DynamicRule::OffsetFromTemplate { .. } => None,
        }
    }
}

/// A yearly system event template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Stable identity across years; part of the generated event id.
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    /// Fixed day-of-month. Mutually exclusive with `rule`.
    pub month: u32,
    pub day: Option<u32>,
    pub rule: Option<DynamicRule>,
    pub enabled: bool,
    pub priority: EventPriority,
    pub default_tags: Vec<Tag>,
    pub default_reminders: Vec<Reminder>,
    pub campaign: Option<CampaignInfo>,
    pub marketplaces: Vec<String>,
}

fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: u8) -> Option<NaiveDate> {
    if nth == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (7 + weekday.num_days_from_monday() as i64
        - first.weekday().num_days_from_monday() as i64)
        % 7;
    let date = first + Duration::days(offset + 7 * (nth as i64 - 1));
    (date.month() == month).then_some(date)
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut date = next_month.pred_opt()?;
    while date.weekday() != weekday {
        date = date.pred_opt()?;
    }
    Some(date)
}
