use serde::{Deserialize, Deserializer, Serialize};

/// Optional search criteria for members. An absent field never filters.
///
/// When read from a query string, blank text and unparsable numbers count as
/// absent rather than failing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSearchCondition {
    #[serde(default, deserialize_with = "non_blank")]
    pub username: Option<String>,
    #[serde(rename = "teamName", default, deserialize_with = "non_blank")]
    pub team_name: Option<String>,
    #[serde(rename = "ageGoe", default, deserialize_with = "lenient_age")]
    pub age_goe: Option<i32>,
    #[serde(rename = "ageLoe", default, deserialize_with = "lenient_age")]
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i32),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Number(age)) => Some(age),
        Some(Raw::Text(text)) => match text.trim().parse::<i32>() {
            Ok(age) => Some(age),
            Err(e) => {
                if !text.trim().is_empty() {
                    tracing::debug!(
                        "ignoring unparsable age bound {text:?}: {e}"
                    );
                }
                None
            }
        },
        None => None,
    })
}
