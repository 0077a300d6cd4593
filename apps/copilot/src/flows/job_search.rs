use std::sync::Arc;

use tracing::{error, info};

use crate::api_client::CareerApi;
use crate::errors::AppError;
use crate::flows::locations::LocationField;
use crate::models::job::{Job, JobSearchRequest, JobSearchResponse};
use crate::storage::Handoff;

pub const DEFAULT_LOCATION: &str = "India";
const SEARCH_FALLBACK: &str = "Failed to fetch jobs";

pub const POPULAR_ROLES: &[&str] = &[
    "Software Engineer",
    "Data Scientist",
    "Python Developer",
    "Full Stack Developer",
    "Frontend Developer",
    "Backend Developer",
    "Machine Learning Engineer",
    "DevOps Engineer",
];

/// Folds one response page into the accumulated list. Page 1 starts over,
/// later pages extend it.
pub fn merge_page(results: &mut Vec<Job>, page: u32, incoming: Vec<Job>) {
    if page <= 1 {
        *results = incoming;
    } else {
        results.extend(incoming);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Query {
    role: String,
    location: String,
}

pub struct JobSearch {
    api: Arc<dyn CareerApi>,
    search_term: String,
    location: LocationField,
    results: Vec<Job>,
    total: u64,
    current_page: u32,
    last_query: Option<Query>,
    has_searched: bool,
    loading: bool,
    error: Option<String>,
}

impl JobSearch {
    /// The search box starts with the role chosen during gap analysis, if any.
    pub fn new(api: Arc<dyn CareerApi>, handoff: &Handoff) -> Self {
        Self {
            api,
            search_term: handoff.target_role().unwrap_or_default(),
            location: LocationField::default(),
            results: Vec::new(),
            total: 0,
            current_page: 1,
            last_query: None,
            has_searched: false,
            loading: false,
            error: None,
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Shortcut buttons only fill in the term; the user still has to search.
    pub fn pick_popular_role(&mut self, role: &str) {
        self.search_term = role.to_string();
    }

    pub fn location(&self) -> &LocationField {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut LocationField {
        &mut self.location
    }

    pub fn results(&self) -> &[Job] {
        &self.results
    }

    /// Results paired with their list keys.
    pub fn rows(&self) -> impl Iterator<Item = (String, &Job)> {
        self.results
            .iter()
            .enumerate()
            .map(|(i, job)| (job.row_key(i), job))
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_load_more(&self) -> bool {
        !self.results.is_empty() && (self.results.len() as u64) < self.total
    }

    /// Fresh search from page 1 with the current term and location. The page
    /// counter and last query only move once the response arrives.
    pub async fn search(&mut self) -> Result<&[Job], AppError> {
        let role = self.search_term.trim().to_string();
        if role.is_empty() {
            let err = AppError::validation("Please enter a job role to search");
            self.error = Some(err.banner(SEARCH_FALLBACK));
            return Err(err);
        }

        let location = match self.location.value().trim() {
            "" => DEFAULT_LOCATION.to_string(),
            loc => loc.to_string(),
        };

        self.fetch(Query { role, location }, 1).await
    }

    /// Next page of the last search, appended to the current results.
    pub async fn load_more(&mut self) -> Result<&[Job], AppError> {
        let query = match &self.last_query {
            Some(query) if self.can_load_more() => query.clone(),
            _ => return Ok(&self.results),
        };
        self.fetch(query, self.current_page + 1).await
    }

    async fn fetch(&mut self, query: Query, page: u32) -> Result<&[Job], AppError> {
        self.loading = true;
        self.error = None;
        info!("Searching jobs: {} in {} (page {page})", query.role, query.location);

        let req = JobSearchRequest {
            role: query.role.clone(),
            location: query.location.clone(),
            page,
        };
        let outcome = self.api.search_jobs(&req).await;
        self.loading = false;
        self.has_searched = true;

        match outcome {
            Ok(JobSearchResponse { results, count }) => {
                merge_page(&mut self.results, page, results);
                self.total = count;
                self.current_page = page;
                self.last_query = Some(query);
                info!("Showing {} of {} jobs", self.results.len(), self.total);
                Ok(&self.results)
            }
            Err(e) => {
                error!("Job search failed: {e}");
                let err = AppError::from(e);
                self.error = Some(err.banner(SEARCH_FALLBACK));
                Err(err)
            }
        }
    }
}
