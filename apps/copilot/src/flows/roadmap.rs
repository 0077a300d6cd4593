use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::api_client::CareerApi;
use crate::errors::AppError;
use crate::models::roadmap::{Roadmap, RoadmapLevel, RoadmapRequest};

const UNREACHABLE: &str = "Could not connect to backend";
const UNAVAILABLE_FALLBACK: &str = "Roadmap generation is unavailable";
const GENERATE_FALLBACK: &str = "Failed to generate roadmap";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Checking,
    Available,
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoadmapTab {
    #[default]
    Overview,
    Prerequisites,
    Path,
    Projects,
}

/// Stage numbers whose panels are expanded. Kept apart from the roadmap so
/// toggling never touches roadmap content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedStages(BTreeSet<u32>);

impl ExpandedStages {
    /// Flips `stage` and leaves every other stage alone.
    pub fn toggle(&mut self, stage: u32) {
        if !self.0.remove(&stage) {
            self.0.insert(stage);
        }
    }

    pub fn contains(&self, stage: u32) -> bool {
        self.0.contains(&stage)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Roadmap viewer: availability precheck, generation, stage panels and tabs.
pub struct RoadmapPlanner {
    api: Arc<dyn CareerApi>,
    availability: Availability,
    skill: String,
    level: RoadmapLevel,
    roadmap: Option<Roadmap>,
    active_tab: RoadmapTab,
    expanded: ExpandedStages,
    loading: bool,
    error: Option<String>,
}

impl RoadmapPlanner {
    pub fn new(api: Arc<dyn CareerApi>) -> Self {
        Self {
            api,
            availability: Availability::Checking,
            skill: String::new(),
            level: RoadmapLevel::default(),
            roadmap: None,
            active_tab: RoadmapTab::default(),
            expanded: ExpandedStages::default(),
            loading: false,
            error: None,
        }
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    pub fn roadmap(&self) -> Option<&Roadmap> {
        self.roadmap.as_ref()
    }

    pub fn active_tab(&self) -> RoadmapTab {
        self.active_tab
    }

    pub fn level(&self) -> RoadmapLevel {
        self.level
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn expanded(&self) -> &ExpandedStages {
        &self.expanded
    }

    pub fn set_skill(&mut self, skill: impl Into<String>) {
        self.skill = skill.into();
    }

    pub fn set_level(&mut self, level: RoadmapLevel) {
        self.level = level;
    }

    pub fn set_active_tab(&mut self, tab: RoadmapTab) {
        self.active_tab = tab;
    }

    pub fn toggle_stage(&mut self, stage: u32) {
        self.expanded.toggle(stage);
    }

    /// Asks the backend whether generation is configured. Runs once; later
    /// calls return the settled availability without a request.
    pub async fn check_availability(&mut self) -> &Availability {
        if self.availability != Availability::Checking {
            return &self.availability;
        }

        self.availability = match self.api.check_roadmap_availability().await {
            Ok(resp) if resp.available => {
                info!("Roadmap generation available");
                Availability::Available
            }
            Ok(resp) => {
                let reason = resp
                    .message
                    .unwrap_or_else(|| UNAVAILABLE_FALLBACK.to_string());
                warn!("Roadmap generation unavailable: {reason}");
                self.error = Some(reason.clone());
                Availability::Unavailable(reason)
            }
            Err(e) => {
                warn!("Roadmap availability check failed: {e}");
                self.error = Some(UNREACHABLE.to_string());
                Availability::Unavailable(UNREACHABLE.to_string())
            }
        };
        &self.availability
    }

    /// Generation is only possible once the backend reported itself available.
    pub fn can_generate(&self) -> bool {
        self.availability == Availability::Available && !self.loading
    }

    pub async fn generate(&mut self) -> Result<&Roadmap, AppError> {
        if !self.can_generate() {
            return Err(AppError::validation(match &self.availability {
                Availability::Unavailable(reason) => reason.clone(),
                _ => "Roadmap generation is not available yet".to_string(),
            }));
        }

        let skill = self.skill.trim().to_string();
        if skill.is_empty() {
            let err = AppError::validation("Please enter a skill to learn");
            self.error = Some(err.banner(GENERATE_FALLBACK));
            return Err(err);
        }

        self.loading = true;
        self.error = None;
        info!("Generating {} roadmap for {skill}", self.level.as_str());

        let req = RoadmapRequest {
            skill,
            level: self.level,
        };
        let outcome = self.api.generate_roadmap(&req).await;
        self.loading = false;

        match outcome {
            Ok(roadmap) => {
                info!(
                    "Roadmap ready: {} stages, {} projects",
                    roadmap.learning_path.len(),
                    roadmap.projects.len()
                );
                self.active_tab = RoadmapTab::Overview;
                Ok(&*self.roadmap.insert(roadmap))
            }
            Err(e) => {
                let err = AppError::from(e);
                self.error = Some(err.banner(GENERATE_FALLBACK));
                Err(err)
            }
        }
    }
}
