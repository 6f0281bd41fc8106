//! Markdown report generation
//!
//! This module generates human-readable markdown reports of a crawl,
//! including statistics, the media found, a per-page table and errors.

use crate::crawler::CrawlReport;
use crate::output::stats::{error_kind, ScanStatistics};
use crate::output::{OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Longest page table written to a report
const MAX_PAGE_ROWS: usize = 200;

/// Writes a markdown report of a finished crawl
///
/// # Arguments
///
/// * `report` - The crawl report
/// * `config_hash` - Hash of the configuration used, if any
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_markdown_report(
    report: &CrawlReport,
    config_hash: Option<&str>,
    output_path: &Path,
) -> OutputResult<()> {
    if output_path.is_dir() {
        return Err(OutputError::Write(format!(
            "{} is a directory",
            output_path.display()
        )));
    }

    let markdown = format_markdown_report(report, config_hash);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Report written to {}", output_path.display());
    Ok(())
}

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The crawl report
/// * `config_hash` - Hash of the configuration used, if any
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &CrawlReport, config_hash: Option<&str>) -> String {
    let stats = ScanStatistics::from_report(report);
    let mut md = String::new();

    md.push_str("# Medium-Scout Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", report.url));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        stats.duration_seconds
    ));
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages recorded | {} |\n", stats.total_pages));
    md.push_str(&format!("| Pages with errors | {} |\n", stats.pages_errored));
    md.push_str(&format!("| Blocked URLs | {} |\n", stats.blocked_urls));
    md.push_str(&format!("| Unique links | {} |\n", stats.unique_links));
    md.push_str(&format!("| Unique media | {} |\n", stats.unique_media));
    md.push_str(&format!(
        "\n- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    // Media
    md.push_str("## Media\n\n");
    if report.media.is_empty() {
        md.push_str("No social-media links found.\n\n");
    } else {
        for medium in &report.media {
            md.push_str(&format!("- {}\n", medium));
        }
        md.push('\n');
    }

    // Pages
    if !report.pages.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| Key | URL | Media | Links |\n");
        md.push_str("|-----|-----|-------|-------|\n");

        for page in report.pages.iter().take(MAX_PAGE_ROWS) {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                page.key,
                page.url,
                page.media.len(),
                page.links.len()
            ));
        }

        if report.pages.len() > MAX_PAGE_ROWS {
            md.push_str(&format!(
                "\n... and {} more\n",
                report.pages.len() - MAX_PAGE_ROWS
            ));
        }
        md.push('\n');
    }

    // Blocked URLs
    if !report.blocked.is_empty() {
        md.push_str("## Blocked URLs\n\n");
        for url in &report.blocked {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    // Errors
    if !report.errors.is_empty() {
        md.push_str("## Errors\n\n");
        md.push_str("| Kind | URL | Details |\n");
        md.push_str("|------|-----|---------|\n");

        for error in &report.errors {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                error_kind(error),
                error.url(),
                error.to_string().replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    md
}
