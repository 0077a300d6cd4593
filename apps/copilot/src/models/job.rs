use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayName {
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryLabel {
    pub label: String,
}

/// One job search result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Job {
    /// Not unique across pages; see [`Job::row_key`].
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub company: DisplayName,
    pub location: DisplayName,
    /// May contain HTML markup.
    pub description: String,
    pub created: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub redirect_url: String,
    pub contract_type: Option<String>,
    pub category: CategoryLabel,
}

impl Job {
    /// Identity of the job within an accumulated result list.
    pub fn row_key(&self, index: usize) -> String {
        format!("{}-{}", self.id, index)
    }
}

/// Body of `POST /api/search-jobs`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobSearchRequest {
    pub role: String,
    pub location: String,
    pub page: u32,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct JobSearchResponse {
    pub results: Vec<Job>,
    pub count: u64,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}
