use super::ValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamName(String);

impl TeamName {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new(
                "Team name cannot be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > 255 {
            return Err(ValidationError::new(
                "Max team name length is 255 characters".to_string(),
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TeamName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[test]
fn test_team_name_is_trimmed() {
    let parsed = TeamName::parse("  teamA ").expect("valid team name");
    assert_eq!(parsed.as_ref(), "teamA");
}

#[test]
fn test_blank_team_names() {
    for blank in ["", "   "] {
        let result = TeamName::parse(blank);
        assert_eq!(result.unwrap_err().as_ref(), "Team name cannot be empty");
    }
}

#[test]
fn test_long_team_name() {
    let result = TeamName::parse(&"t".repeat(256));
    assert!(result.is_err());
}
