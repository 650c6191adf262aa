use crate::cli::GlobalArgs;
use crate::context;
use crate::error::{Result, ResultExt};
use crate::ui;
use report_api::config::ensure_config_file_exists;

pub fn execute(global: &GlobalArgs, force: bool) -> Result<()> {
    let path = context::init_target(global);
    ui::section_header("mdfive Configuration Setup");

    let written = ensure_config_file_exists(&path, force)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if written {
        ui::success_message(&format!("Created {}", path.display()));
        ui::info_message("Set api.base_url to point at your report backend");
    } else {
        ui::warning_message(&format!(
            "{} already exists, use --force to overwrite it",
            path.display()
        ));
    }
    Ok(())
}
