//! Client-side workflows. Each flow owns its UI state and talks to the
//! backend through [`crate::api_client::CareerApi`].

pub mod analyzer;
pub mod chat;
pub mod gap_analysis;
pub mod job_search;
pub mod locations;
pub mod resume_intake;
pub mod roadmap;

pub use analyzer::GapAnalyzer;
pub use chat::ChatAssistant;
pub use job_search::JobSearch;
pub use roadmap::RoadmapPlanner;
