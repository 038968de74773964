//! Template expansion.
//!
//! `generate_for_year` is a pure function of (catalog, year): no clock
//! reads, no randomness, so two calls yield element-wise identical
//! events. Unresolvable templates are skipped, never errors.

use chrono::NaiveDate;

use crate::event::{Event, EventKind, EventOrigin, EventStatus};

use super::template::{DynamicRule, Template};

/// Offset chains are resolved recursively up to this depth; anything
/// deeper (or cyclic) is treated as unresolvable.
const MAX_OFFSET_DEPTH: u8 = 4;

/// Resolve the concrete date a template lands on in `year`.
pub fn resolve_template_date(
    catalog: &[Template],
    template: &Template,
    year: i32,
) -> Option<NaiveDate> {
    resolve_at_depth(catalog, template, year, 0)
}

fn resolve_at_depth(
    catalog: &[Template],
    template: &Template,
    year: i32,
    depth: u8,
) -> Option<NaiveDate> {
    if depth >= MAX_OFFSET_DEPTH {
        return None;
    }
    match (&template.day, &template.rule) {
        (Some(day), None) => NaiveDate::from_ymd_opt(year, template.month, *day),
        (None, Some(DynamicRule::OffsetFromTemplate { base_key, days })) => {
            let base = catalog.iter().find(|t| t.key == *base_key)?;
            let base_date = resolve_at_depth(catalog, base, year, depth + 1)?;
            base_date.checked_add_signed(chrono::Duration::days(*days))
        }
        (None, Some(rule)) => rule.resolve(year),
        // day and rule are mutually exclusive; anything else is malformed
        // configuration and resolves to nothing.
        _ => None,
    }
}

/// Expand every enabled template into a concrete all-day event for `year`.
pub fn generate_for_year(catalog: &[Template], year: i32) -> Vec<Event> {
    catalog
        .iter()
        .filter(|t| t.enabled)
        .filter_map(|t| {
            let date = resolve_template_date(catalog, t, year)?;
            Some(event_for(t, year, date))
        })
        .collect()
}

/// Concatenated generation over an inclusive year range -- the typical
/// "current year plus next" call pattern.
pub fn generate_window(catalog: &[Template], first_year: i32, last_year: i32) -> Vec<Event> {
    (first_year..=last_year)
        .flat_map(|year| generate_for_year(catalog, year))
        .collect()
}

fn event_for(template: &Template, year: i32, date: NaiveDate) -> Event {
    let start_at = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let end_at = date.and_hms_opt(23, 59, 59).unwrap().and_utc();
    Event {
        // Idempotent regeneration depends on this id pattern.
        id: format!("system-{}-{}", template.key, year),
        kind: EventKind::System,
        origin: EventOrigin::Local,
        title: template.name.clone(),
        description: template.description.clone(),
        start_at,
        end_at,
        all_day: true,
        status: EventStatus::Pending,
        priority: template.priority,
        tags: template.default_tags.clone(),
        book_ids: Vec::new(),
        checklist: Vec::new(),
        reminders: template.default_reminders.clone(),
        external_id: None,
        template_key: Some(template.key.clone()),
        book_id: None,
        task_id: None,
        campaign: template.campaign.clone(),
        marketplaces: template.marketplaces.clone(),
        // Audit timestamps pinned to the date itself: a wall-clock read
        // here would break generation idempotence.
        created_at: start_at,
        updated_at: start_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventPriority;
    use crate::system_events::default_catalog;
    use chrono::{Datelike, Weekday};
    use proptest::prelude::*;

    fn fixed(key: &str, month: u32, day: u32) -> Template {
        Template {
            key: key.into(),
            name: key.into(),
            description: None,
            month,
            day: Some(day),
            rule: None,
            enabled: true,
            priority: EventPriority::Medium,
            default_tags: Vec::new(),
            default_reminders: Vec::new(),
            campaign: None,
            marketplaces: Vec::new(),
        }
    }

    #[test]
    fn mothers_day_2025_is_may_11() {
        let catalog = default_catalog();
        let events = generate_for_year(&catalog, 2025);
        let event = events
            .iter()
            .find(|e| e.id == "system-mothers_day-2025")
            .unwrap();

        assert_eq!(event.start_at.date_naive(), NaiveDate::from_ymd_opt(2025, 5, 11).unwrap());
        assert!(event.all_day);
        assert_eq!(event.start_at.format("%H:%M:%S").to_string(), "00:00:00");
        assert_eq!(event.end_at.format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[test]
    fn offset_templates_follow_their_anchor() {
        let catalog = default_catalog();
        let events = generate_for_year(&catalog, 2024);

        // Thanksgiving 2024 is Nov 28.
        let thanksgiving = events.iter().find(|e| e.id == "system-thanksgiving-2024").unwrap();
        assert_eq!(thanksgiving.start_at.date_naive(), NaiveDate::from_ymd_opt(2024, 11, 28).unwrap());

        let black_friday = events.iter().find(|e| e.id == "system-black_friday-2024").unwrap();
        assert_eq!(black_friday.start_at.date_naive(), NaiveDate::from_ymd_opt(2024, 11, 29).unwrap());

        let cyber_monday = events.iter().find(|e| e.id == "system-cyber_monday-2024").unwrap();
        assert_eq!(cyber_monday.start_at.date_naive(), NaiveDate::from_ymd_opt(2024, 12, 2).unwrap());
    }

    #[test]
    fn disabled_and_unresolvable_templates_are_skipped() {
        let bad_date = fixed("bad_date", 2, 30);
        let mut disabled = fixed("disabled", 3, 1);
        disabled.enabled = false;
        let dangling = Template {
            day: None,
            rule: Some(DynamicRule::OffsetFromTemplate {
                base_key: "nowhere".into(),
                days: 1,
            }),
            ..fixed("dangling", 4, 1)
        };

        let catalog = vec![bad_date, disabled, dangling, fixed("good", 5, 1)];
        let events = generate_for_year(&catalog, 2024);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "system-good-2024");
    }

    #[test]
    fn offset_cycles_resolve_to_nothing() {
        let a = Template {
            day: None,
            rule: Some(DynamicRule::OffsetFromTemplate {
                base_key: "b".into(),
                days: 1,
            }),
            ..fixed("a", 1, 1)
        };
        let b = Template {
            day: None,
            rule: Some(DynamicRule::OffsetFromTemplate {
                base_key: "a".into(),
                days: 1,
            }),
            ..fixed("b", 1, 1)
        };
        assert!(generate_for_year(&[a, b], 2024).is_empty());
    }

    #[test]
    fn template_defaults_are_carried_verbatim() {
        let catalog = default_catalog();
        let template = catalog.iter().find(|t| t.key == "black_friday").unwrap();
        let events = generate_for_year(&catalog, 2025);
        let event = events.iter().find(|e| e.id == "system-black_friday-2025").unwrap();

        assert_eq!(event.priority, template.priority);
        assert_eq!(event.tags, template.default_tags);
        assert_eq!(event.reminders, template.default_reminders);
        assert_eq!(event.campaign, template.campaign);
        assert_eq!(event.marketplaces, template.marketplaces);
        assert_eq!(event.status, EventStatus::Pending);
    }

    #[test]
    fn window_concatenates_years() {
        let catalog = default_catalog();
        let both = generate_window(&catalog, 2024, 2025);
        let y24 = generate_for_year(&catalog, 2024);
        let y25 = generate_for_year(&catalog, 2025);
        assert_eq!(both.len(), y24.len() + y25.len());
        assert_eq!(&both[..y24.len()], &y24[..]);
    }

    proptest! {
        #[test]
        fn generation_is_idempotent(year in 1990i32..2100) {
            let catalog = default_catalog();
            let first = generate_for_year(&catalog, year);
            let second = generate_for_year(&catalog, year);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn nth_weekday_rules_land_on_their_weekday(year in 1990i32..2100, nth in 1u8..5) {
            let rule = DynamicRule::NthWeekdayOfMonth {
                month: 5,
                weekday: Weekday::Sun,
                nth,
            };
            if let Some(date) = rule.resolve(year) {
                prop_assert_eq!(date.weekday(), Weekday::Sun);
                prop_assert_eq!(date.month(), 5);
                prop_assert_eq!((date.day() as u8 - 1) / 7 + 1, nth);
            }
        }
    }
}
