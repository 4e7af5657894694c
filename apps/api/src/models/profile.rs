use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The applicant profile used to fill the generated resume.
///
/// Loaded from `PROFILE_PATH` when set; otherwise the built-in default below
/// is used so the service runs without any local files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            name: "Alex Morgan".to_string(),
            email: "alex.morgan@example.com".to_string(),
            phone: "+1 555 010 4477".to_string(),
            linkedin: "https://www.linkedin.com/in/alexmorgan/".to_string(),
            summary: "Full stack developer with five years of experience across web and \
                      mobile, specialized in React, Node.js and Python."
                .to_string(),
            skills: vec![
                "React".to_string(),
                "Node.js".to_string(),
                "Python".to_string(),
                "Flask".to_string(),
                "JavaScript".to_string(),
                "HTML".to_string(),
                "CSS".to_string(),
                "SQL".to_string(),
                "NoSQL".to_string(),
                "AWS".to_string(),
                "Docker".to_string(),
            ],
            experience: "Senior Developer at Tech Solutions (2022-present), building and \
                         maintaining complex web applications. Junior Developer at Web \
                         Innovations (2020-2022), contributing new product features."
                .to_string(),
            education: "MSc in Computer Science, University of Lyon (2019)".to_string(),
        }
    }
}

impl Profile {
    /// Loads the profile from a JSON file, falling back to the built-in
    /// default when no path is configured.
    pub fn load(path: Option<&Path>) -> Result<Profile> {
        let Some(path) = path else {
            return Ok(Profile::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("profile file {} is not valid JSON", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_has_contact_fields() {
        let profile = Profile::default();
        assert!(!profile.name.is_empty());
        assert!(profile.email.contains('@'));
        assert!(!profile.skills.is_empty());
    }

    #[test]
    fn test_load_without_path_returns_default() {
        let profile = Profile::load(None).unwrap();
        assert_eq!(profile.name, Profile::default().name);
    }

    #[test]
    fn test_load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let custom = Profile {
            name: "Jamie Doe".to_string(),
            ..Profile::default()
        };
        std::fs::write(&path, serde_json::to_vec(&custom).unwrap()).unwrap();

        let loaded = Profile::load(Some(&path)).unwrap();
        assert_eq!(loaded.name, "Jamie Doe");
    }

    #[test]
    fn test_load_from_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, b"not json").unwrap();
        assert!(Profile::load(Some(&path)).is_err());
    }
}
