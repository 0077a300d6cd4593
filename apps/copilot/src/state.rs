use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api_client::{CareerApi, HttpCareerApi};
use crate::config::Config;
use crate::flows::{ChatAssistant, GapAnalyzer, JobSearch, RoadmapPlanner};
use crate::storage::{FileStorage, Handoff, KeyValueStorage, StoredSession};

/// Shared client state. Built once at startup; every flow is constructed from it.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CareerApi>,
    pub storage: Arc<dyn KeyValueStorage>,
    pub config: Config,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let api = HttpCareerApi::new(
            config.api_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
        .context("Failed to build HTTP client")?;
        let storage = FileStorage::open(&config.state_dir).with_context(|| {
            format!("Failed to open state directory {}", config.state_dir.display())
        })?;

        Ok(Self {
            api: Arc::new(api),
            storage: Arc::new(storage),
            config,
        })
    }

    pub fn handoff(&self) -> Handoff {
        Handoff::new(self.storage.clone())
    }

    pub fn analyzer(&self) -> GapAnalyzer {
        GapAnalyzer::new(
            self.api.clone(),
            Arc::new(StoredSession::new(self.storage.clone())),
            self.handoff(),
        )
    }

    pub fn roadmap_planner(&self) -> RoadmapPlanner {
        RoadmapPlanner::new(self.api.clone())
    }

    pub fn job_search(&self) -> JobSearch {
        JobSearch::new(self.api.clone(), &self.handoff())
    }

    pub fn chat(&self) -> ChatAssistant {
        ChatAssistant::new(self.api.clone(), &self.handoff())
    }
}
