use super::table::{cells, TableBuilder, TableStyle};
use crate::pagination::Page;
use crate::types::{
    BulkResult, DiffEntry, LoadTestDataSummary, ProcessAllSummary, Report, ReportCombination,
    ReportGroup, ReportMapping,
};

/// Valid-report groups from `api/test`
pub fn groups_table(page: &Page<'_, ReportGroup>) -> String {
    let mut builder = TableBuilder::with_style(TableStyle::Listing);
    builder.headers(["#", "Sample Report ID", "Reports"]);
    for (index, group) in page.items.iter().enumerate() {
        builder.styled_row(vec![
            cells::muted((page.offset + index + 1).to_string()),
            cells::bold(group.sample_report_id.clone()),
            cells::number(group.report_count),
        ]);
    }
    builder.build()
}

/// Processed reports from `api/reports`
pub fn reports_table(page: &Page<'_, Report>) -> String {
    let mut builder = TableBuilder::with_style(TableStyle::Listing);
    builder.headers(["ID", "Bank", "Loan Scheme", "Type", "Created"]);
    for report in page.items {
        builder.styled_row(vec![
            cells::bold(report.id.to_string()),
            cells::optional(report.bank_name.clone()),
            cells::optional(report.loan_scheme_name.clone()),
            cells::normal(report.scheme_summary()),
            cells::optional(report.created_at.clone()),
        ]);
    }
    builder.build()
}

/// Report mappings from `api/report-mappings`
pub fn mappings_table(page: &Page<'_, ReportMapping>) -> String {
    let mut builder = TableBuilder::with_style(TableStyle::Listing);
    builder.headers(["ID", "Original Report", "Inserted ID", "Status", "Error", "Created"]);
    for mapping in page.items {
        builder.styled_row(vec![
            cells::bold(mapping.id.to_string()),
            cells::normal(mapping.original_report_name.clone()),
            cells::optional(mapping.inserted_report_id.map(|id| id.to_string())),
            cells::status(&mapping.status),
            cells::optional(mapping.error_message.clone()),
            cells::optional(mapping.created_at.clone()),
        ]);
    }
    builder.build()
}

/// Dashboard summary counts
pub fn summary_table(combinations: &[ReportCombination]) -> String {
    let mut builder = TableBuilder::with_style(TableStyle::Listing);
    builder.headers(["Report Combination", "Count"]);
    for combination in combinations {
        builder.styled_row(vec![
            cells::normal(combination.report_combination.clone()),
            cells::number(combination.report_count),
        ]);
    }
    let total: i64 = combinations.iter().map(|c| c.report_count).sum();
    builder.styled_row(vec![cells::bold("Total"), cells::number(total)]);
    builder.build()
}

/// Numbered diff entries, values shown as-is
pub fn diff_table(entries: &[DiffEntry]) -> String {
    let mut builder = TableBuilder::with_style(TableStyle::Diff);
    builder.headers(["#", "Path", "Report 1", "Report 2"]);
    for (index, entry) in entries.iter().enumerate() {
        builder.styled_row(vec![
            cells::muted((index + 1).to_string()),
            cells::bold(entry.diff_key_path.clone()),
            cells::optional(Some(entry.display_value_1())),
            cells::optional(Some(entry.display_value_2())),
        ]);
    }
    builder.build()
}

/// Per-item results of a completed bulk batch
pub fn bulk_results_table(results: &[BulkResult]) -> String {
    let mut builder = TableBuilder::with_style(TableStyle::Listing);
    builder.headers(["Report", "Status", "Report ID", "Error"]);
    for result in results {
        builder.styled_row(vec![
            cells::normal(result.report_name.clone()),
            cells::status(&result.status),
            cells::optional(result.report_id.map(|id| id.to_string())),
            cells::optional(result.error.clone()),
        ]);
    }
    builder.build()
}

/// Processed and failed lists from `api/load-test-data`
pub fn load_test_data_tables(summary: &LoadTestDataSummary) -> String {
    let mut out = format!(
        "Processed: {}  Failed: {}\n",
        summary.processed_count, summary.failed_count
    );
    if !summary.processed_reports.is_empty() {
        out.push_str(&bulk_results_table(&summary.processed_reports));
        out.push('\n');
    }
    if !summary.failed_reports.is_empty() {
        out.push_str(&failures_table(
            summary
                .failed_reports
                .iter()
                .map(|f| (f.report_name.as_str(), f.error.as_deref())),
        ));
        out.push('\n');
    }
    out
}

/// Processed and failed lists from `api/process-all-reports`
pub fn process_all_tables(summary: &ProcessAllSummary) -> String {
    let mut out = format!(
        "Processed: {}  Failed: {}\n",
        summary.processed.len(),
        summary.failed.len()
    );
    if !summary.processed.is_empty() {
        let mut builder = TableBuilder::with_style(TableStyle::Listing);
        builder.headers(["Report", "Report ID"]);
        for report in &summary.processed {
            builder.styled_row(vec![
                cells::optional(report.report_name.clone()),
                cells::bold(report.report_id.to_string()),
            ]);
        }
        out.push_str(&builder.build());
        out.push('\n');
    }
    if !summary.failed.is_empty() {
        out.push_str(&failures_table(
            summary
                .failed
                .iter()
                .map(|f| (f.report_name.as_str(), f.error.as_deref())),
        ));
        out.push('\n');
    }
    out
}

fn failures_table<'a, I>(failures: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut builder = TableBuilder::with_style(TableStyle::Listing);
    builder.headers(["Failed Report", "Error"]);
    for (name, error) in failures {
        builder.styled_row(vec![cells::normal(name), cells::optional(error)]);
    }
    builder.build()
}
