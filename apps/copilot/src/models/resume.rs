use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parsed resume as returned by `POST /api/upload-resume`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResumeData {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl ResumeData {
    pub fn has_skills(&self) -> bool {
        !self.skills.is_empty()
    }

    /// Raw text, if the parser returned any non-blank text.
    pub fn resume_text(&self) -> Option<&str> {
        self.raw_text.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Feedback needs both a skill list and the raw text to score against.
    pub fn qualifies_for_feedback(&self) -> bool {
        self.has_skills() && self.resume_text().is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkillDensityAnalysis {
    pub score: f64,
    pub status: String,
    pub density_percentage: f64,
    pub unique_skills: u32,
    pub details: String,
    pub top_skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImpactWordsAnalysis {
    pub score: f64,
    pub status: String,
    pub found_words: BTreeMap<String, Vec<String>>,
    pub missing_words: BTreeMap<String, Vec<String>>,
    pub priority_missing: Vec<String>,
    pub total_impact_words_found: u32,
    pub categories_with_words: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormattingAnalysis {
    pub score: f64,
    pub status: String,
    pub issues: Vec<String>,
    pub word_count: u32,
    pub contact_info_found: BTreeMap<String, bool>,
    pub details: String,
    pub bullet_points: u32,
    pub sections_found: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelevanceAnalysis {
    pub score: f64,
    pub status: String,
    pub matched_skills: u32,
    pub missing_critical_skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImprovementSuggestion {
    pub category: String,
    pub priority: String,
    pub suggestion: String,
    pub impact: String,
}

/// Resume quality report from `POST /api/resume-feedback`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResumeFeedback {
    pub overall_score: f64,
    pub skill_density_analysis: SkillDensityAnalysis,
    pub impact_words_analysis: ImpactWordsAnalysis,
    pub formatting_analysis: FormattingAnalysis,
    pub relevance_analysis: RelevanceAnalysis,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
}

/// Body of `POST /api/resume-feedback`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResumeFeedbackRequest {
    pub resume_text: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
}
