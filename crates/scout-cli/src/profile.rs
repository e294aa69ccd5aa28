//! Building the candidate profile from a YAML file and command-line flags.

use std::path::PathBuf;

use clap::Args;
use scout_core::{CandidateProfile, ProfileField, ProfileStore};

/// Profile sources. Flags win over values loaded from `--profile`.
#[derive(Debug, Clone, Default, Args)]
pub struct ProfileArgs {
    /// YAML file with `experience`, `skills` and `goals` keys
    #[arg(long, env = "SCOUT_PROFILE_PATH")]
    pub profile: Option<PathBuf>,

    /// Professional work experience
    #[arg(long)]
    pub experience: Option<String>,

    /// Primary technical and soft skills
    #[arg(long)]
    pub skills: Option<String>,

    /// Career ambitions and roles of interest
    #[arg(long)]
    pub goals: Option<String>,
}

impl ProfileArgs {
    fn overrides(&self) -> [(ProfileField, Option<&String>); 3] {
        [
            (ProfileField::Experience, self.experience.as_ref()),
            (ProfileField::Skills, self.skills.as_ref()),
            (ProfileField::Goals, self.goals.as_ref()),
        ]
    }
}

/// Assemble the profile store for this run.
///
/// # Errors
///
/// Returns an error if `--profile` names a file that cannot be read or parsed.
pub(crate) fn build_profile_store(args: &ProfileArgs) -> anyhow::Result<ProfileStore> {
    let base = match &args.profile {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading profile file");
            scout_core::load_profile(path)?
        }
        None => CandidateProfile::default(),
    };

    let store = ProfileStore::new(base);
    for (field, value) in args.overrides() {
        if let Some(value) = value {
            store.update_field(field, value.as_str());
        }
    }
    Ok(store)
}

/// Print the profile status; fails when any section is blank.
pub(crate) fn run_profile_check(args: &ProfileArgs) -> anyhow::Result<()> {
    let store = build_profile_store(args)?;
    let profile = store.profile();
    let missing = profile.missing_fields();

    for field in ProfileField::ALL {
        let status = if missing.contains(&field) {
            "missing"
        } else {
            "ok"
        };
        println!("{field:<10} {status}");
    }

    if missing.is_empty() {
        println!("profile complete");
        Ok(())
    } else {
        let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
        anyhow::bail!("profile incomplete: fill in {}", names.join(", "))
    }
}
