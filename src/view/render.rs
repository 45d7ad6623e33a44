use std::fmt::Write;

use crate::api::job::dto::BulkResponse;
use crate::api::job::{JobRecord, JobStats};
use crate::controller::{CollectionState, Pagination};

const MAX_CELL_WIDTH: usize = 32;
const PAGER_WIDTH: u32 = 5;

/// Page numbers shown in the pager: up to five, centred on the current page
/// where possible.
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    if total_pages == 0 {
        return Vec::new();
    }
    let last_start = total_pages.saturating_sub(PAGER_WIDTH - 1).max(1);
    let start = current.saturating_sub(2).clamp(1, last_start);
    let end = (start + PAGER_WIDTH - 1).min(total_pages);
    (start..=end).collect()
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= MAX_CELL_WIDTH {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(MAX_CELL_WIDTH - 1).collect();
        cut.push('…');
        cut
    }
}

fn job_row(job: &JobRecord) -> [String; 6] {
    [
        truncate(&job.id),
        truncate(&job.company),
        truncate(&job.role),
        job.status.to_string(),
        job.applied_date.format("%Y-%m-%d").to_string(),
        job.job_link.as_deref().map(truncate).unwrap_or_default(),
    ]
}

/// Renders records as an aligned text table
pub fn render_table(jobs: &[JobRecord]) -> String {
    let header = ["ID", "COMPANY", "ROLE", "STATUS", "APPLIED", "LINK"].map(String::from);
    let rows: Vec<[String; 6]> = jobs.iter().map(job_row).collect();

    let mut widths = header.clone().map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(rows.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

pub fn render_pager(pagination: &Pagination) -> String {
    let mut out = String::new();
    out.push_str(if pagination.has_prev() { "« prev " } else { "        " });
    for page in page_window(pagination.page, pagination.total_pages) {
        if page == pagination.page {
            let _ = write!(out, "[{}] ", page);
        } else {
            let _ = write!(out, "{} ", page);
        }
    }
    if pagination.has_next() {
        out.push_str("next »");
    }
    let _ = write!(
        out,
        "   page {} of {}, {} jobs",
        pagination.page,
        pagination.last_page(),
        pagination.total_items
    );
    out
}

/// Full list view: banner, table and pager
pub fn render_state(state: &CollectionState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Job Applications   filters: {}", state.filters);

    if state.loading {
        out.push_str("Loading...\n");
    }
    if let Some(err) = &state.last_error {
        let _ = writeln!(out, "! {}", err.message());
    }

    if state.jobs.is_empty() {
        out.push_str("No job applications found.\n");
    } else {
        out.push_str(&render_table(&state.jobs));
    }
    out.push_str(&render_pager(&state.pagination));
    out.push('\n');
    out
}

pub fn render_job(job: &JobRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id:       {}", job.id);
    let _ = writeln!(out, "company:  {}", job.company);
    let _ = writeln!(out, "role:     {}", job.role);
    let _ = writeln!(out, "status:   {}", job.status);
    let _ = writeln!(out, "applied:  {}", job.applied_date.format("%Y-%m-%d"));
    if let Some(link) = &job.job_link {
        let _ = writeln!(out, "link:     {}", link);
    }
    out
}

pub fn render_stats(stats: &JobStats) -> String {
    format!(
        "total: {}\napplied: {}\ninterview: {}\noffer: {}\nrejected: {}\n",
        stats.total, stats.applied, stats.interview, stats.offer, stats.rejected
    )
}

pub fn render_bulk(response: &BulkResponse) -> String {
    let mut out = format!("{}\n", response.message);
    for error in &response.errors {
        let _ = writeln!(out, "  {}: {}", error.company, error.errors.join("; "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::{FilterField, FilterSet, JobStatus};
    use chrono::NaiveDate;

    fn job(id: &str, company: &str) -> JobRecord {
        JobRecord {
            id: id.into(),
            company: company.into(),
            role: "Engineer".into(),
            status: JobStatus::Interview,
            job_link: None,
            applied_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[test]
    fn window_follows_the_current_page() {
        assert_eq!(page_window(1, 2), vec![1, 2]);
        assert_eq!(page_window(1, 9), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(5, 9), vec![3, 4, 5, 6, 7]);
        assert_eq!(page_window(9, 9), vec![5, 6, 7, 8, 9]);
        assert_eq!(page_window(4, 4), vec![1, 2, 3, 4]);
        assert_eq!(page_window(3, 4), vec![1, 2, 3, 4]);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn table_aligns_columns() {
        let table = render_table(&[job("a1", "Acme"), job("b2", "Globex Corporation")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID  COMPANY"));
        let status_col = lines[0].find("ROLE").unwrap();
        assert_eq!(&lines[1][status_col..status_col + 8], "Engineer");
        assert_eq!(&lines[2][status_col..status_col + 8], "Engineer");
    }

    #[test]
    fn state_view_shows_filters_error_and_pager() {
        let mut state = CollectionState::new(10);
        state.filters = FilterSet::new().with(FilterField::Status, "Offer");
        state.pagination.total_pages = 2;
        state.pagination.total_items = 11;
        state.last_error = Some(crate::client::ClientError::unreachable());

        let view = render_state(&state);
        assert!(view.contains("filters: status=Offer"));
        assert!(view.contains("! No response received from server"));
        assert!(view.contains("No job applications found."));
        assert!(view.contains("[1] 2 next »"));
        assert!(view.contains("page 1 of 2, 11 jobs"));
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "x".repeat(40);
        assert_eq!(truncate(&long).chars().count(), MAX_CELL_WIDTH);
    }
}
