use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use copilot::api_client::UploadFile;
use copilot::config::Config;
use copilot::errors::AppError;
use copilot::flows::locations::suggest_locations;
use copilot::format::{format_salary, posted_ago, preview_description, DESCRIPTION_PREVIEW_CHARS};
use copilot::models::analysis::GapPriority;
use copilot::models::roadmap::RoadmapLevel;
use copilot::models::session::{AnalysisMethod, JobDescInput};
use copilot::state::AppState;

#[derive(Parser)]
#[command(name = "copilot")]
#[command(about = "Career copilot: resume parsing, skill gaps, roadmaps and job search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload and parse a resume (PDF or DOCX)
    Upload { file: PathBuf },
    /// Run a skill gap analysis against market data or a job description
    Analyze {
        #[arg(long)]
        role: Option<String>,
        /// Job description text
        #[arg(long, conflicts_with = "jd_file")]
        jd_text: Option<String>,
        /// Job description PDF
        #[arg(long)]
        jd_file: Option<PathBuf>,
    },
    /// Forget the saved analyzer session
    Reset,
    /// Print the saved analyzer session
    Show,
    /// List roles with saved market data
    Roles,
    /// Print market skill data for a role
    MarketSkills { role: String },
    /// Generate a learning roadmap for a skill
    Roadmap {
        skill: String,
        #[arg(long, default_value = "beginner")]
        level: RoadmapLevel,
    },
    /// Search job listings
    Jobs {
        role: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Suggest locations matching a prefix
    Locations { query: String },
    /// Talk to the career assistant
    Chat {
        message: Vec<String>,
        #[arg(long, conflicts_with = "history")]
        clear: bool,
        #[arg(long)]
        history: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!(
        "Career copilot v{} using backend {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );

    let state = AppState::from_config(config)?;
    run(cli.command, &state).await
}

async fn run(command: Command, state: &AppState) -> Result<()> {
    match command {
        Command::Upload { file } => {
            let mut analyzer = state.analyzer();
            let upload = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            analyzer
                .select_resume(upload)
                .map_err(|e| surface(e, "Please select a resume file"))?;
            let resume = analyzer
                .upload_resume()
                .await
                .map_err(|e| surface(e, "Failed to upload resume"))?;

            if let Some(name) = &resume.name {
                println!("Name:   {name}");
            }
            println!("Skills: {}", resume.skills.join(", "));
            if let Some(feedback) = &analyzer.session().resume_feedback {
                println!("Resume score: {:.0}/100", feedback.overall_score);
                for tip in &feedback.improvement_suggestions {
                    println!("  - {}", tip.suggestion);
                }
            }
        }

        Command::Analyze {
            role,
            jd_text,
            jd_file,
        } => {
            let mut analyzer = state.analyzer();
            if let Some(role) = role {
                analyzer.set_target_role(role);
            }
            match (jd_text, jd_file) {
                (Some(text), _) => {
                    analyzer.set_analysis_method(AnalysisMethod::JobDescription);
                    analyzer.set_job_desc_input(JobDescInput::Text);
                    analyzer.set_job_description(text);
                }
                (None, Some(path)) => {
                    analyzer.set_analysis_method(AnalysisMethod::JobDescription);
                    analyzer.set_job_desc_input(JobDescInput::Pdf);
                    let upload = UploadFile::from_path(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    analyzer
                        .select_job_description_file(upload)
                        .map_err(|e| surface(e, "Please upload a PDF file for job description"))?;
                }
                (None, None) => analyzer.set_analysis_method(AnalysisMethod::MarketData),
            }

            let result = analyzer
                .analyze()
                .await
                .map_err(|e| surface(e, "Failed to perform gap analysis"))?;

            println!("Match:     {}%", result.match_display());
            println!(
                "Readiness: {} ({})",
                result.readiness_display(),
                result.readiness_label().unwrap_or("unrated")
            );
            for skill in &result.matched_skills_detailed {
                println!("  + {}", skill.skill);
            }
            for priority in GapPriority::ALL {
                for gap in result.skill_gaps.bucket(priority) {
                    println!("  - [{}] {}", priority.as_str(), gap.skill);
                }
            }
            for rec in &result.recommendations {
                println!("  * {rec}");
            }
        }

        Command::Reset => {
            state.analyzer().reset();
            println!("Analyzer session cleared");
        }

        Command::Show => {
            let analyzer = state.analyzer();
            println!("{}", serde_json::to_string_pretty(analyzer.session())?);
        }

        Command::Roles => {
            let roles = state
                .analyzer()
                .available_roles()
                .await
                .map_err(|e| surface(e, "Failed to load roles"))?;
            for role in roles {
                println!("{role}");
            }
        }

        Command::MarketSkills { role } => {
            let data = state
                .analyzer()
                .market_skills(&role)
                .await
                .map_err(|e| surface(e, "Failed to load market skills"))?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        Command::Roadmap { skill, level } => {
            let mut planner = state.roadmap_planner();
            planner.check_availability().await;
            planner.set_skill(skill);
            planner.set_level(level);
            let roadmap = planner
                .generate()
                .await
                .map_err(|e| surface(e, "Failed to generate roadmap"))?;

            println!("{} ({})", roadmap.skill, roadmap.level);
            for pre in &roadmap.prerequisites {
                println!("  requires {} [{}]", pre.name, pre.importance);
            }
            for stage in &roadmap.learning_path {
                println!(
                    "  {}. {} ({})",
                    stage.stage, stage.name, stage.estimated_time
                );
            }
            for project in &roadmap.projects {
                println!("  project: {}", project.name);
            }
        }

        Command::Jobs {
            role,
            location,
            pages,
        } => {
            let mut search = state.job_search();
            if let Some(role) = role {
                search.set_search_term(role);
            }
            if let Some(location) = location {
                search.location_mut().select(&location);
            }
            search
                .search()
                .await
                .map_err(|e| surface(e, "Failed to fetch jobs"))?;
            for _ in 1..pages.max(1) {
                if !search.can_load_more() {
                    break;
                }
                search
                    .load_more()
                    .await
                    .map_err(|e| surface(e, "Failed to fetch jobs"))?;
            }

            let now = Utc::now();
            println!("{} of {} jobs", search.results().len(), search.total());
            for (_, job) in search.rows() {
                println!(
                    "\n{} | {} | {}",
                    job.title, job.company.display_name, job.location.display_name
                );
                let salary = format_salary(job.salary_min, job.salary_max);
                let age = posted_ago(&job.created, now);
                match (salary, age) {
                    (Some(s), Some(a)) => println!("{s} | {a}"),
                    (Some(s), None) => println!("{s}"),
                    (None, Some(a)) => println!("{a}"),
                    (None, None) => {}
                }
                println!(
                    "{}",
                    preview_description(&job.description, DESCRIPTION_PREVIEW_CHARS)
                );
                println!("{}", job.redirect_url);
            }
        }

        Command::Locations { query } => {
            for location in suggest_locations(&query) {
                println!("{location}");
            }
        }

        Command::Chat {
            message,
            clear,
            history,
        } => {
            let mut chat = state.chat();
            if clear {
                chat.clear().await;
                println!("Conversation cleared");
            } else if history {
                let log = chat
                    .history()
                    .await
                    .map_err(|e| surface(e, "Failed to load chat history"))?;
                println!("{}", serde_json::to_string_pretty(&log)?);
            } else {
                chat.set_input(message.join(" "));
                match chat.send().await {
                    Some(reply) => println!("{}", reply.content),
                    None => return Err(anyhow!("Nothing to send")),
                }
            }
        }
    }

    Ok(())
}

/// Turns a flow error into the message the user would see on screen.
fn surface(err: AppError, fallback: &str) -> anyhow::Error {
    anyhow!(err.banner(fallback))
}
