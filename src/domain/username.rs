use super::ValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        match name.chars().count() {
            0 => Err(ValidationError::new(
                "Username cannot be empty".to_string(),
            )),
            x if x > 255 => Err(ValidationError::new(
                "Max username length is 255 characters".to_string(),
            )),
            _ => Ok(Self(name.to_owned())),
        }
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
