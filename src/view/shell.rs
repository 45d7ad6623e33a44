use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use super::render;
use crate::api::job::models::parse_applied_date;
use crate::api::job::{FilterField, FilterSet, JobDraft, JobPatch, JobStatus};
use crate::client::ClientError;
use crate::controller::JobCollectionController;

const HELP: &str = "\
commands:
  list                         reload the current page
  page N | next | prev         change page
  filter key=value ...         keys: company, status, from, to
  clear                        drop all filters
  add company=.. role=.. [status=..] [link=..] [date=YYYY-MM-DD]
  edit ID key=value ...        same keys as add
  rm ID                        delete a job
  show ID                      show one job
  stats                        counts by status
  help | quit
values containing spaces go in double quotes: company=\"Acme Corp\"
";

/// A user action in the interactive shell
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    List,
    Page(u32),
    Next,
    Prev,
    Filter(FilterSet),
    Clear,
    Add(JobDraft),
    Edit { id: String, patch: JobPatch },
    Remove(String),
    Show(String),
    Stats,
    Help,
    Quit,
}

/// Splits on whitespace, keeping double-quoted runs together
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err("Unterminated quote".to_string());
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn pairs(tokens: &[String]) -> Result<Vec<(String, String)>, String> {
    tokens
        .iter()
        .map(|token| {
            token
                .split_once('=')
                .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.to_string()))
                .ok_or_else(|| format!("Expected key=value, got '{}'", token))
        })
        .collect()
}

fn draft_from_pairs(pairs: Vec<(String, String)>) -> Result<JobDraft, String> {
    let mut draft = JobDraft::default();
    for (key, value) in pairs {
        match key.as_str() {
            "company" => draft.company = value,
            "role" => draft.role = value,
            "status" => draft.status = value.parse()?,
            "link" | "joblink" => draft.job_link = Some(value),
            "date" | "applied" | "applieddate" => {
                draft.applied_date = Some(parse_applied_date(&value)?)
            }
            other => return Err(format!("Unknown field '{}'", other)),
        }
    }
    Ok(draft)
}

fn patch_from_pairs(pairs: Vec<(String, String)>) -> Result<JobPatch, String> {
    let mut patch = JobPatch::default();
    for (key, value) in pairs {
        match key.as_str() {
            "company" => patch.company = Some(value),
            "role" => patch.role = Some(value),
            "status" => patch.status = Some(value.parse()?),
            "link" | "joblink" => patch.job_link = Some(value),
            "date" | "applied" | "applieddate" => {
                patch.applied_date = Some(parse_applied_date(&value)?)
            }
            other => return Err(format!("Unknown field '{}'", other)),
        }
    }
    Ok(patch)
}

fn filters_from_pairs(pairs: Vec<(String, String)>) -> Result<FilterSet, String> {
    let mut filters = FilterSet::new();
    for (key, value) in pairs {
        let field: FilterField = key.parse()?;
        // the server matches status exactly, so send the canonical spelling
        if field == FilterField::Status && !value.trim().is_empty() {
            let status: JobStatus = value.parse()?;
            filters.set(field, status.as_str());
        } else {
            filters.set(field, value);
        }
    }
    Ok(filters)
}

fn required_id(args: &[String], command: &str) -> Result<String, String> {
    match args {
        [id] => Ok(id.clone()),
        _ => Err(format!("Usage: {} ID", command)),
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_intent(line: &str) -> Result<Option<Intent>, String> {
    let tokens = tokenize(line)?;
    let Some((command, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let intent = match command.to_ascii_lowercase().as_str() {
        "list" | "ls" | "refresh" => Intent::List,
        "page" => {
            let page = args
                .first()
                .and_then(|p| p.parse::<u32>().ok())
                .filter(|p| *p >= 1)
                .ok_or_else(|| "Usage: page N (N >= 1)".to_string())?;
            Intent::Page(page)
        }
        "next" | "n" => Intent::Next,
        "prev" | "p" => Intent::Prev,
        "filter" | "f" => Intent::Filter(filters_from_pairs(pairs(args)?)?),
        "clear" => Intent::Clear,
        "add" | "new" => Intent::Add(draft_from_pairs(pairs(args)?)?),
        "edit" | "update" => {
            let (id, rest) = args
                .split_first()
                .ok_or_else(|| "Usage: edit ID key=value ...".to_string())?;
            Intent::Edit {
                id: id.clone(),
                patch: patch_from_pairs(pairs(rest)?)?,
            }
        }
        "rm" | "delete" | "del" => Intent::Remove(required_id(args, "rm")?),
        "show" | "get" => Intent::Show(required_id(args, "show")?),
        "stats" => Intent::Stats,
        "help" | "?" => Intent::Help,
        "quit" | "exit" | "q" => Intent::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(Some(intent))
}

fn describe(err: &ClientError) -> String {
    format!("error: {}\n", err.message())
}

/// Runs an intent against the controller and returns what to print
pub async fn execute(controller: &JobCollectionController, intent: Intent) -> String {
    debug!("Shell intent: {:?}", intent);
    let list_view = |controller: &JobCollectionController| render::render_state(&controller.snapshot());

    match intent {
        Intent::List => match controller.reload().await {
            Ok(_) => list_view(controller),
            Err(e) => describe(&e) + &list_view(controller),
        },
        Intent::Page(page) => match controller.set_page(page).await {
            Ok(_) => list_view(controller),
            Err(e) => describe(&e) + &list_view(controller),
        },
        Intent::Next => match controller.next_page().await {
            Ok(true) => list_view(controller),
            Ok(false) => "Already on the last page.\n".to_string(),
            Err(e) => describe(&e) + &list_view(controller),
        },
        Intent::Prev => match controller.prev_page().await {
            Ok(true) => list_view(controller),
            Ok(false) => "Already on the first page.\n".to_string(),
            Err(e) => describe(&e) + &list_view(controller),
        },
        Intent::Filter(filters) => match controller.apply_filters(filters).await {
            Ok(_) => list_view(controller),
            Err(e) => describe(&e) + &list_view(controller),
        },
        Intent::Clear => match controller.clear_filters().await {
            Ok(_) => list_view(controller),
            Err(e) => describe(&e) + &list_view(controller),
        },
        Intent::Add(draft) => match controller.create(draft).await {
            Ok(job) => format!("Created {}\n", job.id) + &list_view(controller),
            Err(e) => describe(&e),
        },
        Intent::Edit { id, patch } => match controller.update(&id, patch).await {
            Ok(job) => format!("Updated {}\n", job.id) + &list_view(controller),
            Err(e) => describe(&e),
        },
        Intent::Remove(id) => match controller.delete(&id).await {
            Ok(message) => format!("{}\n", message) + &list_view(controller),
            Err(e) => describe(&e),
        },
        Intent::Show(id) => match controller.get(&id).await {
            Ok(job) => render::render_job(&job),
            Err(e) => describe(&e),
        },
        Intent::Stats => match controller.stats().await {
            Ok(stats) => render::render_stats(&stats),
            Err(e) => describe(&e),
        },
        Intent::Help => HELP.to_string(),
        Intent::Quit => String::new(),
    }
}

/// Interactive loop: load the first page, then read intents until quit or EOF
pub async fn run<R, W>(
    controller: &JobCollectionController,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Starting interactive shell");
    let first = execute(controller, Intent::List).await;
    writer.write_all(first.as_bytes()).await?;

    let mut lines = reader.lines();
    loop {
        writer.write_all(b"> ").await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match parse_intent(&line) {
            Ok(None) => continue,
            Ok(Some(Intent::Quit)) => break,
            Ok(Some(intent)) => execute(controller, intent).await,
            Err(msg) => format!("{}\n", msg),
        };
        writer.write_all(output.as_bytes()).await?;
    }

    writer.write_all(b"\n").await?;
    writer.flush().await?;
    info!("Shell closed");
    Ok(())
}
