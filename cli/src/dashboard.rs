use crate::cli::GlobalArgs;
use crate::context::{self, AppContext};
use crate::error::{Result, ResultExt};
use crate::progress::with_spinner;
use crate::ui;
use report_api::renderers::{bar_chart, pie_shares, render_shares, summary_table};

const BAR_WIDTH: usize = 40;

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    context::block_on(async {
        let combinations = with_spinner("Loading report summary", ctx.client.report_summary())
            .await
            .with_context(|| "Failed to load dashboard data")?;

        ui::section_header("Report Dashboard");
        if combinations.is_empty() {
            ui::info_message("No processed reports yet");
            return Ok(());
        }

        ui::block(&summary_table(&combinations));

        ui::section_header("Reports per Combination");
        ui::block(&bar_chart(&combinations, BAR_WIDTH));

        ui::section_header("Share of Reports");
        ui::block(&render_shares(&pie_shares(&combinations)));
        Ok(())
    })
}
