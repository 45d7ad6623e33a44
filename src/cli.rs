use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

use crate::api::job::models::parse_applied_date;
use crate::api::job::{FilterField, FilterSet, JobDraft, JobPatch, JobStatus};
use crate::client::{ClientError, HttpJobService};
use crate::config::Config;
use crate::controller::JobCollectionController;
use crate::server;
use crate::view::{render, shell};

#[derive(Parser, Debug)]
#[command(name = "job-tracker", version, about = "Track job applications against a remote job service")]
pub struct Cli {
    /// Base URL of the job service (overrides JOB_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Partial company name
    #[arg(long)]
    pub company: Option<String>,

    /// Exact status
    #[arg(long, value_parser = parse_status)]
    pub status: Option<JobStatus>,

    /// Applied on or after (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Applied on or before (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn to_filter_set(&self) -> FilterSet {
        let date = |d: &Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        FilterSet::new()
            .with(FilterField::Company, self.company.clone().unwrap_or_default())
            .with(
                FilterField::Status,
                self.status.map(|s| s.to_string()).unwrap_or_default(),
            )
            .with(FilterField::StartDate, date(&self.from))
            .with(FilterField::EndDate, date(&self.to))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List one page of jobs
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Jobs per page (overrides PAGE_SIZE)
        #[arg(long)]
        limit: Option<u32>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Add a job application
    Add {
        #[arg(long)]
        company: String,

        #[arg(long)]
        role: String,

        #[arg(long, value_parser = parse_status, default_value = "Applied")]
        status: JobStatus,

        #[arg(long)]
        link: Option<String>,

        /// Defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Change fields of a job application
    Update {
        id: String,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long, value_parser = parse_status)]
        status: Option<JobStatus>,

        #[arg(long)]
        link: Option<String>,

        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Delete a job application and show the resulting page
    Delete {
        id: String,

        /// Page the job was listed on
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show a single job application
    Show { id: String },

    /// Counts by status
    Stats,

    /// Create jobs from a JSON file holding an array of drafts
    Import { file: PathBuf },

    /// Interactive list view
    Shell,

    /// Run the local reference job service
    Serve {
        /// Listen address (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },
}

fn parse_status(value: &str) -> Result<JobStatus, String> {
    value.parse()
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_applied_date(value)
}

/// Error reported by the binary before exiting non-zero
#[derive(Debug)]
pub enum CliError {
    Client(ClientError),
    Io(std::io::Error),
    Input(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Client(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::Input(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        CliError::Client(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

fn controller(config: &Config, api_url: &str, page_size: u32) -> Result<JobCollectionController, CliError> {
    let service = HttpJobService::new(api_url, config.request_timeout)?;
    Ok(JobCollectionController::new(Arc::new(service), page_size))
}

/// Runs one command, printing its output to stdout
pub async fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    let api_url = cli.api_url.clone().unwrap_or_else(|| config.api_url.clone());

    match cli.command {
        Command::List {
            page,
            limit,
            filters,
        } => {
            let jobs = controller(&config, &api_url, limit.unwrap_or(config.page_size))?
                .with_filters(filters.to_filter_set());
            jobs.set_page(page).await?;
            print!("{}", render::render_state(&jobs.snapshot()));
        }
        Command::Add {
            company,
            role,
            status,
            link,
            date,
        } => {
            let mut draft = JobDraft::new(company, role).with_status(status);
            draft.job_link = link;
            draft.applied_date = date;

            let job = controller(&config, &api_url, config.page_size)?
                .create(draft)
                .await?;
            print!("{}", render::render_job(&job));
        }
        Command::Update {
            id,
            company,
            role,
            status,
            link,
            date,
        } => {
            let patch = JobPatch {
                company,
                role,
                status,
                job_link: link,
                applied_date: date,
            };
            let job = controller(&config, &api_url, config.page_size)?
                .update(&id, patch)
                .await?;
            print!("{}", render::render_job(&job));
        }
        Command::Delete { id, page, filters } => {
            let jobs = controller(&config, &api_url, config.page_size)?
                .with_filters(filters.to_filter_set());
            // Load the page first so the delete sees what the user saw
            jobs.set_page(page).await?;
            let message = jobs.delete(&id).await?;
            println!("{}", message);
            print!("{}", render::render_state(&jobs.snapshot()));
        }
        Command::Show { id } => {
            let job = controller(&config, &api_url, config.page_size)?
                .get(&id)
                .await?;
            print!("{}", render::render_job(&job));
        }
        Command::Stats => {
            let stats = controller(&config, &api_url, config.page_size)?
                .stats()
                .await?;
            print!("{}", render::render_stats(&stats));
        }
        Command::Import { file } => {
            let raw = tokio::fs::read_to_string(&file).await?;
            let drafts: Vec<JobDraft> = serde_json::from_str(&raw).map_err(|e| {
                CliError::Input(format!("{} is not a JSON array of jobs: {}", file.display(), e))
            })?;
            let response = controller(&config, &api_url, config.page_size)?
                .bulk_create(drafts)
                .await?;
            print!("{}", render::render_bulk(&response));
        }
        Command::Shell => {
            let jobs = controller(&config, &api_url, config.page_size)?;
            let stdin = BufReader::new(tokio::io::stdin());
            shell::run(&jobs, stdin, tokio::io::stdout()).await?;
        }
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            server::serve(&addr, config.max_payload_size).await?;
        }
    }
    Ok(())
}
