pub mod types;
pub mod loader;
pub mod builder;
pub mod templates;

pub use types::{
    ApiConfig, AutomationConfig, DisplayConfig, MdfiveConfig, PollingConfig, BASE_URL_ENV,
    DEFAULT_AUTOMATION_URL, DEFAULT_BASE_URL,
};
pub use loader::{load_sheet_rows, ConfigLoader, DefaultConfigLoader, SheetRow};
pub use builder::MdfiveConfigBuilder;
pub use templates::{
    ensure_config_file_exists, generate_default_config_template, generate_forgot_sheet,
    generate_signin_sheet, generate_signup_sheet,
};
