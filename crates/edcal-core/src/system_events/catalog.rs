//! Built-in template catalog.
//!
//! The yearly dates a fiction-publishing operation plans campaigns
//! around. Pure data; the generator owns all behavior.

use chrono::Weekday;

use crate::event::{CampaignInfo, EventPriority, Reminder, ReminderChannel, Tag};

use super::template::{DynamicRule, Template};

fn tag(id: &str, name: &str) -> Tag {
    Tag {
        id: id.into(),
        name: name.into(),
        color: None,
    }
}

/// One popup reminder `days` days ahead of the date.
fn days_ahead(key: &str, days: i64) -> Reminder {
    Reminder {
        id: format!("{key}-ahead-{days}d"),
        offset_minutes: days * 24 * 60,
        channel: ReminderChannel::Popup,
        enabled: true,
    }
}

fn campaign(campaign_type: &str, window_days: u32, niches: &[&str]) -> CampaignInfo {
    CampaignInfo {
        campaign_type: campaign_type.into(),
        window_days,
        niches: niches.iter().map(|n| n.to_string()).collect(),
    }
}

/// The default industry calendar.
pub fn default_catalog() -> Vec<Template> {
    let fixed = |key: &str, name: &str, month: u32, day: u32| Template {
        key: key.into(),
        name: name.into(),
        description: None,
        month,
        day: Some(day),
        rule: None,
        enabled: true,
        priority: EventPriority::Medium,
        default_tags: vec![tag("seasonal", "Seasonal")],
        default_reminders: vec![days_ahead(key, 7)],
        campaign: None,
        marketplaces: Vec::new(),
    };

    vec![
        Template {
            description: Some("New year, new releases: refresh series pages and annual plans".into()),
            campaign: Some(campaign("seasonal_sale", 14, &["all"])),
            ..fixed("new_year", "New Year", 1, 1)
        },
        Template {
            priority: EventPriority::High,
            campaign: Some(campaign("romance_push", 10, &["romance", "romcom"])),
            marketplaces: vec!["amazon".into(), "apple".into()],
            ..fixed("valentines_day", "Valentine's Day", 2, 14)
        },
        Template {
            description: Some("UNESCO World Book Day".into()),
            campaign: Some(campaign("awareness", 7, &["all"])),
            ..fixed("world_book_day", "World Book Day", 4, 23)
        },
        Template {
            key: "mothers_day".into(),
            name: "Mother's Day".into(),
            description: None,
            month: 5,
            day: None,
            rule: Some(DynamicRule::NthWeekdayOfMonth {
                month: 5,
                weekday: Weekday::Sun,
                nth: 2,
            }),
            enabled: true,
            priority: EventPriority::High,
            default_tags: vec![tag("seasonal", "Seasonal"), tag("gifting", "Gifting")],
            default_reminders: vec![days_ahead("mothers_day", 14)],
            campaign: Some(campaign("gift_guide", 14, &["womens_fiction", "cozy_mystery"])),
            marketplaces: vec!["amazon".into()],
        },
        Template {
            key: "fathers_day".into(),
            name: "Father's Day".into(),
            description: None,
            month: 6,
            day: None,
            rule: Some(DynamicRule::NthWeekdayOfMonth {
                month: 6,
                weekday: Weekday::Sun,
                nth: 3,
            }),
            enabled: true,
            priority: EventPriority::Medium,
            default_tags: vec![tag("seasonal", "Seasonal"), tag("gifting", "Gifting")],
            default_reminders: vec![days_ahead("fathers_day", 14)],
            campaign: Some(campaign("gift_guide", 14, &["thriller", "military_scifi"])),
            marketplaces: vec!["amazon".into()],
        },
        Template {
            description: Some("Kick off beach-read promotions".into()),
            campaign: Some(campaign("summer_reading", 30, &["romance", "beach_read"])),
            ..fixed("summer_reading", "Summer Reading Kickoff", 6, 1)
        },
        Template {
            campaign: Some(campaign("back_to_school", 21, &["ya", "middle_grade"])),
            ..fixed("back_to_school", "Back to School", 8, 15)
        },
        Template {
            priority: EventPriority::High,
            campaign: Some(campaign("spooky_season", 21, &["horror", "paranormal"])),
            ..fixed("halloween", "Halloween", 10, 31)
        },
        Template {
            key: "thanksgiving".into(),
            name: "Thanksgiving".into(),
            description: None,
            month: 11,
            day: None,
            rule: Some(DynamicRule::NthWeekdayOfMonth {
                month: 11,
                weekday: Weekday::Thu,
                nth: 4,
            }),
            enabled: true,
            priority: EventPriority::Medium,
            default_tags: vec![tag("seasonal", "Seasonal")],
            default_reminders: vec![days_ahead("thanksgiving", 7)],
            campaign: None,
            marketplaces: Vec::new(),
        },
        Template {
            key: "black_friday".into(),
            name: "Black Friday".into(),
            description: Some("Deepest discount window of the year".into()),
            month: 11,
            day: None,
            rule: Some(DynamicRule::OffsetFromTemplate {
                base_key: "thanksgiving".into(),
                days: 1,
            }),
            enabled: true,
            priority: EventPriority::Urgent,
            default_tags: vec![tag("sale", "Sale")],
            default_reminders: vec![days_ahead("black_friday", 21), days_ahead("black_friday", 3)],
            campaign: Some(campaign("discount_blitz", 4, &["all"])),
            marketplaces: vec!["amazon".into(), "kobo".into(), "apple".into()],
        },
        Template {
            key: "cyber_monday".into(),
            name: "Cyber Monday".into(),
            description: None,
            month: 12,
            day: None,
            rule: Some(DynamicRule::OffsetFromTemplate {
                base_key: "thanksgiving".into(),
                days: 4,
            }),
            enabled: true,
            priority: EventPriority::High,
            default_tags: vec![tag("sale", "Sale")],
            default_reminders: vec![days_ahead("cyber_monday", 7)],
            campaign: Some(campaign("ebook_push", 2, &["all"])),
            marketplaces: vec!["amazon".into(), "kobo".into()],
        },
        Template {
            priority: EventPriority::High,
            campaign: Some(campaign("holiday_gifting", 30, &["all"])),
            ..fixed("christmas", "Christmas", 12, 25)
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_are_unique() {
        let catalog = default_catalog();
        let mut keys: Vec<_> = catalog.iter().map(|t| t.key.clone()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), catalog.len());
    }

    #[test]
    fn every_template_has_day_xor_rule() {
        for template in default_catalog() {
            assert!(
                template.day.is_some() ^ template.rule.is_some(),
                "template {} must have exactly one of day/rule",
                template.key
            );
        }
    }
}
