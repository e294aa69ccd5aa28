//! Presentation helpers for job entries, shared by every renderer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::events::JobEntry;

/// Human-friendly age of a posting relative to `now`.
///
/// Missing values and the literal "recent" render as `Recent`; values that do
/// not parse as a date are returned unchanged.
#[must_use]
pub fn format_date_posted(raw: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "Recent".to_owned();
    };
    if raw.eq_ignore_ascii_case("recent") {
        return "Recent".to_owned();
    }
    let Some(posted) = parse_posted(raw) else {
        return raw.to_owned();
    };

    let elapsed = (now - posted).num_seconds();
    match elapsed {
        s if s < 60 => "Just now".to_owned(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        _ => posted.format("%B %-d, %Y").to_string(),
    }
}

fn parse_posted(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `Some(value)` when the attribute carries real information.
///
/// The service fills unknown attributes with phrases like "Not specified";
/// those are hidden along with blank values.
#[must_use]
pub fn visible_attribute(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.to_lowercase().contains("not specified") {
        None
    } else {
        Some(trimmed)
    }
}

impl JobEntry {
    /// Location, seniority, employment type and salary, minus the hidden ones.
    #[must_use]
    pub fn visible_attributes(&self) -> Vec<&str> {
        [
            Some(self.location.as_str()),
            self.seniority.as_deref(),
            self.employment_type.as_deref(),
            Some(self.salary.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter_map(visible_attribute)
        .collect()
    }

    /// Placeholder glyph shown when there is no logo.
    #[must_use]
    pub fn company_initial(&self) -> char {
        self.company.trim().chars().next().unwrap_or('J')
    }
}
