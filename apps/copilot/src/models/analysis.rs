use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A skill the user already has, with its market demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchedSkill {
    pub skill: String,
    /// Either a label ("Intermediate") or a numeric level depending on the endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_level: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_demand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand_percentage: Option<f64>,
}

/// A missing skill.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkillGap {
    pub skill: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl SkillGap {
    /// Demand share in percent, whichever field the backend filled.
    pub fn demand(&self) -> Option<f64> {
        self.percentage.or(self.demand_percentage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl GapPriority {
    pub const ALL: [GapPriority; 4] = [
        GapPriority::Critical,
        GapPriority::High,
        GapPriority::Medium,
        GapPriority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GapPriority::Critical => "critical",
            GapPriority::High => "high",
            GapPriority::Medium => "medium",
            GapPriority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkillGaps {
    pub critical: Vec<SkillGap>,
    pub high: Vec<SkillGap>,
    pub medium: Vec<SkillGap>,
    pub low: Vec<SkillGap>,
}

impl SkillGaps {
    pub fn bucket(&self, priority: GapPriority) -> &[SkillGap] {
        match priority {
            GapPriority::Critical => &self.critical,
            GapPriority::High => &self.high,
            GapPriority::Medium => &self.medium,
            GapPriority::Low => &self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GapCounts {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

/// Readiness arrives either as a bare score or as a scored label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ReadinessScore {
    Detailed {
        score: f64,
        #[serde(default)]
        level: String,
        #[serde(default)]
        message: String,
    },
    Score(f64),
}

impl ReadinessScore {
    pub fn value(&self) -> f64 {
        match self {
            ReadinessScore::Detailed { score, .. } => *score,
            ReadinessScore::Score(score) => *score,
        }
    }

    pub fn level(&self) -> Option<&str> {
        match self {
            ReadinessScore::Detailed { level, .. } if !level.is_empty() => Some(level),
            _ => None,
        }
    }
}

/// Result of one gap analysis run. Each run replaces the previous one whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GapAnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    pub match_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readiness_score: Option<ReadinessScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_readiness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_required_skills: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_skills_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_skills_count: Option<u32>,
    pub matched_skills_detailed: Vec<MatchedSkill>,
    pub skill_gaps: SkillGaps,
    pub total_gaps_by_priority: GapCounts,
    pub recommendations: Vec<String>,
}

impl GapAnalysisResult {
    /// Match percentage with one decimal, e.g. `"67.5"`.
    pub fn match_display(&self) -> String {
        format!("{:.1}", self.match_percentage)
    }

    /// Readiness score with one decimal, or `"N/A"` when absent.
    pub fn readiness_display(&self) -> String {
        self.readiness_score
            .as_ref()
            .map(|r| format!("{:.1}", r.value()))
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Readiness label, from `overall_readiness` or the detailed score level.
    pub fn readiness_label(&self) -> Option<&str> {
        self.overall_readiness
            .as_deref()
            .or_else(|| self.readiness_score.as_ref().and_then(|r| r.level()))
    }

    pub fn readiness_tier(&self) -> ReadinessTier {
        ReadinessTier::classify(self.readiness_label())
    }
}

/// Coarse grouping of readiness labels used to pick a presentation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessTier {
    Strong,
    Good,
    Fair,
    Low,
    Unknown,
}

impl ReadinessTier {
    pub fn classify(label: Option<&str>) -> Self {
        let Some(label) = label.filter(|l| !l.is_empty()) else {
            return ReadinessTier::Unknown;
        };
        match label.to_lowercase().as_str() {
            "excellent" | "ready" => ReadinessTier::Strong,
            "good" | "mostly ready" => ReadinessTier::Good,
            "fair" | "needs preparation" => ReadinessTier::Fair,
            _ => ReadinessTier::Low,
        }
    }
}

/// JSON body of `POST /api/gap-analysis`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GapAnalysisRequest {
    pub user_skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    pub use_saved_market_data: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_score_accepts_both_shapes() {
        let bare: GapAnalysisResult =
            serde_json::from_str(r#"{"match_percentage": 67.46, "readiness_score": 55}"#).unwrap();
        assert_eq!(bare.readiness_score, Some(ReadinessScore::Score(55.0)));
        assert_eq!(bare.match_display(), "67.5");

        let detailed: GapAnalysisResult = serde_json::from_str(
            r#"{"readiness_score": {"score": 80.26, "level": "Ready", "message": "Go"}}"#,
        )
        .unwrap();
        assert_eq!(detailed.readiness_display(), "80.3");
        assert_eq!(detailed.readiness_label(), Some("Ready"));
        assert_eq!(detailed.readiness_tier(), ReadinessTier::Strong);
    }

    #[test]
    fn test_missing_fields_default() {
        let result: GapAnalysisResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result.match_display(), "0.0");
        assert_eq!(result.readiness_display(), "N/A");
        assert_eq!(result.readiness_tier(), ReadinessTier::Unknown);
        assert_eq!(result.skill_gaps.total(), 0);
    }

    #[test]
    fn test_readiness_tiers() {
        assert_eq!(ReadinessTier::classify(Some("Mostly Ready")), ReadinessTier::Good);
        assert_eq!(ReadinessTier::classify(Some("fair")), ReadinessTier::Fair);
        assert_eq!(ReadinessTier::classify(Some("Not Ready")), ReadinessTier::Low);
        assert_eq!(ReadinessTier::classify(Some("")), ReadinessTier::Unknown);
    }

    #[test]
    fn test_gap_buckets_by_priority() {
        let result: GapAnalysisResult = serde_json::from_str(
            r#"{"skill_gaps": {"critical": [{"skill": "Docker", "demand_percentage": 64.0}],
                               "low": [{"skill": "Go"}, {"skill": "Rust"}]}}"#,
        )
        .unwrap();
        assert_eq!(result.skill_gaps.bucket(GapPriority::Critical)[0].demand(), Some(64.0));
        assert_eq!(result.skill_gaps.bucket(GapPriority::Low).len(), 2);
        assert_eq!(result.skill_gaps.total(), 3);
    }

    #[test]
    fn test_request_omits_absent_fields() {
        let req = GapAnalysisRequest {
            user_skills: vec!["Python".into()],
            target_role: Some("Data Scientist".into()),
            job_description: None,
            use_saved_market_data: false,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("job_description").is_none());
        assert_eq!(json["use_saved_market_data"], false);
    }
}
