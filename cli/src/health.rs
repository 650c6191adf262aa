use crate::cli::GlobalArgs;
use crate::context::{self, AppContext};
use crate::error::Result;
use crate::progress::with_spinner;
use crate::ui;

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    context::block_on(async {
        let health = with_spinner("Contacting backend", ctx.client.health()).await?;

        ui::success_message(
            health
                .message
                .as_deref()
                .unwrap_or("Backend is running"),
        );
        if let Some(timestamp) = health.timestamp.as_deref() {
            ctx.verbose(&format!("Server time: {timestamp}"));
        }
        Ok(())
    })
}
