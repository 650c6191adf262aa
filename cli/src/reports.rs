use crate::cli::{GlobalArgs, ReportsView};
use crate::context::{self, AppContext};
use crate::error::{Result, ResultExt};
use crate::progress::with_spinner;
use crate::ui;
use report_api::renderers::{groups_table, load_test_data_tables, mappings_table, reports_table};
use report_api::{Page, Pager};

pub fn execute(global: &GlobalArgs, view: ReportsView) -> Result<()> {
    let ctx = AppContext::load(global)?;
    context::block_on(async {
        match view {
            ReportsView::Valid { page } => {
                let groups = with_spinner("Loading valid reports", ctx.client.valid_reports())
                    .await
                    .with_context(|| "Failed to load valid reports")?;
                let page = pager_at(&ctx, page).page(&groups);
                ui::section_header("Valid Reports");
                print_page(&page, groups_table);
            }
            ReportsView::LoadTestData => {
                let summary = with_spinner("Loading test data", ctx.client.load_test_data())
                    .await
                    .with_context(|| "Failed to load test data")?;
                ui::section_header("Test Data");
                ui::block(&load_test_data_tables(&summary));
                if summary.failed_count > 0 {
                    ui::warning_message(&format!("{} reports failed", summary.failed_count));
                } else {
                    ui::success_message("Test data loaded");
                }
            }
            ReportsView::List { page } => {
                let reports = with_spinner("Loading reports", ctx.client.reports())
                    .await
                    .with_context(|| "Failed to load reports")?;
                let page = pager_at(&ctx, page).page(&reports);
                ui::section_header("Processed Reports");
                print_page(&page, reports_table);
            }
            ReportsView::Mappings { page } => {
                let mappings = with_spinner("Loading report mappings", ctx.client.report_mappings())
                    .await
                    .with_context(|| "Failed to load report mappings")?;
                let page = pager_at(&ctx, page).page(&mappings);
                ui::section_header("Report Mappings");
                print_page(&page, mappings_table);
            }
        }
        Ok(())
    })
}

fn pager_at(ctx: &AppContext, page: usize) -> Pager {
    let mut pager = Pager::new(ctx.config.page_size());
    pager.go_to(page);
    pager
}

fn print_page<T>(page: &Page<'_, T>, render: fn(&Page<'_, T>) -> String) {
    if page.total_items == 0 {
        ui::info_message("Nothing to show");
        return;
    }
    if page.is_empty() {
        ui::warning_message(&format!(
            "Page {} is past the end, there are {} pages",
            page.number, page.total_pages
        ));
        return;
    }

    ui::block(&render(page));
    ui::info_message(&format!(
        "{} (page {} of {})",
        page.range_label(),
        page.number,
        page.total_pages
    ));
    if page.has_next() {
        ui::info_message(&format!("Next page: --page {}", page.number + 1));
    }
}
