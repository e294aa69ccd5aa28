//! Payloads carried by the scouting service's event stream.

use serde::{Deserialize, Deserializer, Serialize};

/// One decoded `data:` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Progress text from the service's agents.
    Step(String),
    /// Terminal report for a successful search.
    Result(ScoutReport),
    /// Service-side failure; ends the search.
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutReport {
    /// Markdown text.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub jobs: Vec<JobEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobEntry {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub match_score: i64,
    pub match_reason: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl JobEntry {
    /// Match score clamped to the 0–100 range.
    #[must_use]
    pub fn match_percent(&self) -> u8 {
        u8::try_from(self.match_score.clamp(0, 100)).unwrap_or(0)
    }
}

/// Scores written by a language model arrive as integers, floats (`87.0`),
/// numeric strings or `null`. Floats are rounded; anything else reads as 0.
fn deserialize_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Int(i64),
        Float(f64),
        Text(String),
        Null(()),
    }

    #[allow(clippy::cast_possible_truncation)]
    fn round(value: f64) -> i64 {
        if value.is_finite() {
            value.round().clamp(-1.0e9, 1.0e9) as i64
        } else {
            0
        }
    }

    Ok(match RawScore::deserialize(deserializer)? {
        RawScore::Int(score) => score,
        RawScore::Float(score) => round(score),
        RawScore::Text(text) => text.trim().trim_end_matches('%').parse::<f64>().map_or(0, round),
        RawScore::Null(()) => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_event_decodes() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"step","content":"Scraping boards"}"#).unwrap();
        assert_eq!(event, StreamEvent::Step("Scraping boards".to_owned()));
    }

    #[test]
    fn result_event_decodes_report_with_optional_fields() {
        let raw = serde_json::json!({
            "type": "result",
            "content": {
                "summary": "Found 1 role",
                "jobs": [{
                    "title": "Backend Engineer",
                    "company": "Acme",
                    "location": "Remote",
                    "salary": "$150k",
                    "match_score": 87,
                    "match_reason": "Strong Rust background",
                    "link": "https://jobs.example.com/1",
                    "seniority": "Senior"
                }]
            }
        });

        let event: StreamEvent = serde_json::from_value(raw).unwrap();
        let StreamEvent::Result(report) = event else {
            panic!("expected result event");
        };
        assert_eq!(report.summary, "Found 1 role");
        assert_eq!(report.jobs.len(), 1);
        let job = &report.jobs[0];
        assert_eq!(job.match_score, 87);
        assert_eq!(job.seniority.as_deref(), Some("Senior"));
        assert!(job.date_posted.is_none());
        assert!(job.logo.is_none());
    }

    #[test]
    fn report_without_jobs_defaults_to_empty_list() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"result","content":{"summary":"Nothing today"}}"#)
                .unwrap();
        assert_eq!(
            event,
            StreamEvent::Result(ScoutReport {
                summary: "Nothing today".to_owned(),
                jobs: Vec::new(),
            })
        );
    }

    #[test]
    fn error_event_decodes() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"error","content":"429 RESOURCE_EXHAUSTED"}"#)
                .unwrap();
        assert_eq!(event, StreamEvent::Error("429 RESOURCE_EXHAUSTED".to_owned()));
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let result = serde_json::from_str::<StreamEvent>(r#"{"type":"ping","content":""}"#);
        assert!(result.is_err());
    }

    #[test]
    fn fractional_and_textual_scores_still_decode() {
        let raw = serde_json::json!({
            "summary": "Scores from a loose model",
            "jobs": [
                {"title": "A", "match_score": 87.0},
                {"title": "B", "match_score": 64.6},
                {"title": "C", "match_score": "91%"},
                {"title": "D", "match_score": null},
                {"title": "E"}
            ]
        });
        let report: ScoutReport = serde_json::from_value(raw).unwrap();
        let scores: Vec<i64> = report.jobs.iter().map(|j| j.match_score).collect();
        assert_eq!(scores, vec![87, 65, 91, 0, 0]);
    }

    #[test]
    fn match_percent_clamps_out_of_range_scores() {
        let mut job = JobEntry {
            match_score: 140,
            ..JobEntry::default()
        };
        assert_eq!(job.match_percent(), 100);
        job.match_score = -3;
        assert_eq!(job.match_percent(), 0);
        job.match_score = 72;
        assert_eq!(job.match_percent(), 72);
    }
}
