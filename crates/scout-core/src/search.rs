use serde::{Deserialize, Serialize};

use crate::profile::CandidateProfile;
use crate::CoreError;

/// Region filter accepted by the scouting service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[default]
    Remote,
    #[serde(rename = "USA")]
    Usa,
    Europe,
    Asia,
    Worldwide,
    Hybrid,
}

impl Location {
    pub const ALL: [Location; 6] = [
        Location::Remote,
        Location::Usa,
        Location::Europe,
        Location::Asia,
        Location::Worldwide,
        Location::Hybrid,
    ];

    /// Wire spelling, as sent in the request body.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Remote => "Remote",
            Location::Usa => "USA",
            Location::Europe => "Europe",
            Location::Asia => "Asia",
            Location::Worldwide => "Worldwide",
            Location::Hybrid => "Hybrid",
        }
    }

    /// Human label used by the search form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Location::Remote => "Remote (Global)",
            Location::Usa => "United States",
            Location::Europe => "Europe / EMEA",
            Location::Asia => "Asia / APAC",
            Location::Worldwide => "Worldwide",
            Location::Hybrid => "Hybrid / Local",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Location {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Location::ALL
            .into_iter()
            .find(|loc| loc.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownLocation(s.to_owned()))
    }
}

/// Search inputs pending submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub query: String,
    pub location: Location,
}

/// Body of `POST /api/v1/scout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub location: Location,
    pub candidate_profile: CandidateProfile,
}

impl SearchRequest {
    #[must_use]
    pub fn new(form: &SearchForm, candidate_profile: CandidateProfile) -> Self {
        Self {
            query: form.query.clone(),
            location: form.location,
            candidate_profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_serializes_with_service_spelling() {
        let encoded: Vec<String> = Location::ALL
            .iter()
            .map(|loc| serde_json::to_string(loc).unwrap())
            .collect();
        assert_eq!(
            encoded,
            vec![
                "\"Remote\"",
                "\"USA\"",
                "\"Europe\"",
                "\"Asia\"",
                "\"Worldwide\"",
                "\"Hybrid\""
            ]
        );
    }

    #[test]
    fn location_parses_case_insensitively() {
        assert_eq!("usa".parse::<Location>().unwrap(), Location::Usa);
        assert_eq!(" remote ".parse::<Location>().unwrap(), Location::Remote);
        assert_eq!("HYBRID".parse::<Location>().unwrap(), Location::Hybrid);
    }

    #[test]
    fn location_rejects_unknown_region() {
        let err = "Mars".parse::<Location>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownLocation(ref s) if s == "Mars"));
    }

    #[test]
    fn request_body_carries_form_and_full_profile() {
        let form = SearchForm {
            query: "Backend Engineer".to_owned(),
            location: Location::Remote,
        };
        let profile = CandidateProfile {
            experience: "6 years".to_owned(),
            skills: "Rust".to_owned(),
            goals: "Staff IC".to_owned(),
        };

        let body = serde_json::to_value(SearchRequest::new(&form, profile)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "query": "Backend Engineer",
                "location": "Remote",
                "candidate_profile": {
                    "experience": "6 years",
                    "skills": "Rust",
                    "goals": "Staff IC"
                }
            })
        );
    }
}
