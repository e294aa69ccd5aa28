//! Candidate profile and the store that owns it for the lifetime of a session.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{ConfigError, CoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub goals: String,
}

impl CandidateProfile {
    /// `true` iff every field has non-whitespace content.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        ProfileField::ALL
            .iter()
            .all(|field| !self.field(*field).trim().is_empty())
    }

    /// Fields that are still empty after trimming, in display order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<ProfileField> {
        ProfileField::ALL
            .into_iter()
            .filter(|field| self.field(*field).trim().is_empty())
            .collect()
    }

    #[must_use]
    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Experience => &self.experience,
            ProfileField::Skills => &self.skills,
            ProfileField::Goals => &self.goals,
        }
    }

    fn field_mut(&mut self, field: ProfileField) -> &mut String {
        match field {
            ProfileField::Experience => &mut self.experience,
            ProfileField::Skills => &mut self.skills,
            ProfileField::Goals => &mut self.goals,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Experience,
    Skills,
    Goals,
}

impl ProfileField {
    pub const ALL: [ProfileField; 3] = [
        ProfileField::Experience,
        ProfileField::Skills,
        ProfileField::Goals,
    ];
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileField::Experience => write!(f, "experience"),
            ProfileField::Skills => write!(f, "skills"),
            ProfileField::Goals => write!(f, "goals"),
        }
    }
}

impl std::str::FromStr for ProfileField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "experience" => Ok(ProfileField::Experience),
            "skills" => Ok(ProfileField::Skills),
            "goals" => Ok(ProfileField::Goals),
            _ => Err(CoreError::UnknownProfileField(s.to_owned())),
        }
    }
}

/// Single source of truth for the candidate profile.
///
/// Every mutation notifies subscribers obtained through
/// [`ProfileStore::subscribe`], whether or not the value actually changed.
#[derive(Debug)]
pub struct ProfileStore {
    tx: watch::Sender<CandidateProfile>,
}

impl ProfileStore {
    #[must_use]
    pub fn new(initial: CandidateProfile) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current profile.
    #[must_use]
    pub fn profile(&self) -> CandidateProfile {
        self.tx.borrow().clone()
    }

    /// Overwrite one field, leaving the others untouched.
    pub fn update_field(&self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        self.tx.send_modify(|profile| *profile.field_mut(field) = value);
        tracing::debug!(%field, "profile field updated");
    }

    pub fn replace(&self, profile: CandidateProfile) {
        self.tx.send_replace(profile);
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.tx.borrow().is_complete()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CandidateProfile> {
        self.tx.subscribe()
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new(CandidateProfile::default())
    }
}

/// Load a candidate profile from a YAML file.
///
/// Missing keys load as empty strings; completeness is checked by the caller.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_profile(path: &Path) -> Result<CandidateProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile: CandidateProfile = serde_yaml::from_str(&content)?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(experience: &str, skills: &str, goals: &str) -> CandidateProfile {
        CandidateProfile {
            experience: experience.to_owned(),
            skills: skills.to_owned(),
            goals: goals.to_owned(),
        }
    }

    #[test]
    fn complete_only_when_every_field_has_content() {
        let values = ["", "   ", "\n\t", "8 years of Rust"];
        for experience in values {
            for skills in values {
                for goals in values {
                    let p = profile(experience, skills, goals);
                    let expected = [experience, skills, goals]
                        .iter()
                        .all(|v| !v.trim().is_empty());
                    assert_eq!(
                        p.is_complete(),
                        expected,
                        "experience={experience:?} skills={skills:?} goals={goals:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn missing_fields_lists_blank_fields_in_order() {
        let p = profile("  ", "Rust", "");
        assert_eq!(
            p.missing_fields(),
            vec![ProfileField::Experience, ProfileField::Goals]
        );
    }

    #[test]
    fn update_field_preserves_other_fields() {
        let store = ProfileStore::new(profile("backend", "rust", "staff role"));
        store.update_field(ProfileField::Skills, "rust, tokio");

        assert_eq!(store.profile(), profile("backend", "rust, tokio", "staff role"));
    }

    #[test]
    fn update_field_notifies_subscribers() {
        let store = ProfileStore::default();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.update_field(ProfileField::Goals, "lead a platform team");

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().goals, "lead a platform team");
    }

    #[test]
    fn store_completeness_tracks_updates() {
        let store = ProfileStore::default();
        assert!(!store.is_complete());

        store.update_field(ProfileField::Experience, "10 years");
        store.update_field(ProfileField::Skills, "distributed systems");
        assert!(!store.is_complete());

        store.update_field(ProfileField::Goals, "remote IC role");
        assert!(store.is_complete());

        store.update_field(ProfileField::Goals, "   ");
        assert!(!store.is_complete());
    }

    #[test]
    fn replace_swaps_whole_profile() {
        let store = ProfileStore::new(profile("a", "b", "c"));
        store.replace(profile("x", "y", "z"));
        assert_eq!(store.profile(), profile("x", "y", "z"));
    }

    #[test]
    fn profile_field_parses_case_insensitively() {
        assert_eq!(
            "Skills".parse::<ProfileField>().unwrap(),
            ProfileField::Skills
        );
        assert!(matches!(
            "hobbies".parse::<ProfileField>(),
            Err(CoreError::UnknownProfileField(_))
        ));
    }

    #[test]
    fn profile_yaml_with_missing_keys_loads_as_empty() {
        let yaml = "experience: Senior backend engineer\nskills: Rust, Postgres\n";
        let p: CandidateProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(p.experience, "Senior backend engineer");
        assert_eq!(p.skills, "Rust, Postgres");
        assert!(p.goals.is_empty());
        assert!(!p.is_complete());
    }

    #[test]
    fn load_profile_reports_missing_file() {
        let err = load_profile(Path::new("/nonexistent/scout/profile.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileFileIo { .. }));
    }
}
