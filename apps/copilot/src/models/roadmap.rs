use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoadmapLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl RoadmapLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoadmapLevel::Beginner => "beginner",
            RoadmapLevel::Intermediate => "intermediate",
            RoadmapLevel::Advanced => "advanced",
        }
    }
}

impl std::str::FromStr for RoadmapLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(RoadmapLevel::Beginner),
            "intermediate" => Ok(RoadmapLevel::Intermediate),
            "advanced" => Ok(RoadmapLevel::Advanced),
            other => Err(format!(
                "unknown level '{other}' (expected beginner, intermediate or advanced)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LearningResource {
    pub title: String,
    pub platform: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub url: String,
    pub difficulty: String,
    pub duration: String,
    pub description: String,
    pub rating: String,
    pub is_free: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Prerequisite {
    pub name: String,
    pub importance: String,
    pub estimated_time: String,
    pub description: String,
    pub resources: Vec<LearningResource>,
}

/// One ordered stage of a learning path, keyed by `stage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LearningStage {
    pub stage: u32,
    pub name: String,
    pub skills: Vec<String>,
    pub topics: Vec<String>,
    pub estimated_time: String,
    pub description: String,
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PracticeProject {
    pub name: String,
    pub difficulty: String,
    pub description: String,
    pub skills_practiced: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoadmapMetadata {
    pub generated_at: String,
    pub total_prerequisites: u32,
    pub total_stages: u32,
    pub total_projects: u32,
    pub estimated_total_time: String,
}

/// Generated learning roadmap for a single skill.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Roadmap {
    pub skill: String,
    pub level: String,
    pub prerequisites: Vec<Prerequisite>,
    pub learning_path: Vec<LearningStage>,
    pub projects: Vec<PracticeProject>,
    pub resources_needed: Vec<ResourceGroup>,
    pub metadata: RoadmapMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mermaid_diagram: Option<String>,
}

impl Roadmap {
    pub fn stage(&self, number: u32) -> Option<&LearningStage> {
        self.learning_path.iter().find(|s| s.stage == number)
    }
}

/// Body of `POST /api/generate-roadmap`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoadmapRequest {
    pub skill: String,
    pub level: RoadmapLevel,
}

/// Response of `GET /api/roadmap/check-availability`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub message: Option<String>,
}
