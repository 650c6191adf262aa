use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "mdfive")]
#[command(
    author,
    version,
    about = "Terminal dashboard for the MD5 report backend"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Configuration file path (defaults to ./mdfive.toml, then the user config directory)
    #[clap(short, long, global = true)]
    pub config: Option<String>,

    /// Backend base URL, overrides the configuration file and MDFIVE_API_BASE_URL
    #[clap(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose output with additional information
    #[clap(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default mdfive.toml
    Init {
        /// Overwrite an existing file
        #[clap(long, default_value_t = false)]
        force: bool,
    },

    /// Check that the backend is reachable
    Health,

    /// Report counts per loan/scheme combination
    Dashboard,

    /// Browse report data
    Reports {
        #[clap(subcommand)]
        view: ReportsView,
    },

    /// Process reports by name
    Process {
        #[clap(subcommand)]
        action: ProcessAction,
    },

    /// Download report PDFs
    Download {
        #[clap(subcommand)]
        target: DownloadTarget,
    },

    /// Compare two reports field by field
    Compare {
        #[clap(subcommand)]
        target: CompareTarget,
    },

    /// Browser automation flows run by the backend
    Automation {
        #[clap(subcommand)]
        flow: Option<AutomationFlow>,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ReportsView {
    /// Test-data groups available for processing
    Valid {
        #[clap(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Load the backend's test data and process it
    #[clap(name = "load-test-data")]
    LoadTestData,

    /// Processed reports
    List {
        #[clap(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Original report names and the report ids they produced
    Mappings {
        #[clap(short, long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ProcessAction {
    /// Process one report by name
    Single {
        /// Report name, e.g. Report_1366_latest
        report_name: String,
    },

    /// Submit a batch of report names and wait for the results
    Bulk {
        /// Report names
        report_names: Vec<String>,

        /// File with one report name per line
        #[clap(short, long)]
        file: Option<String>,

        /// Print the batch id and return without polling
        #[clap(long, default_value_t = false)]
        no_wait: bool,
    },

    /// Process every pending report on the backend
    All,

    /// Poll an existing batch until it finishes
    Status {
        batch_id: String,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum DownloadTarget {
    /// Download one report as PDF
    Single {
        report_id: i64,

        #[clap(flatten)]
        auth: DownloadAuth,
    },

    /// Download several reports as one ZIP archive
    Bulk {
        #[clap(required = true)]
        report_ids: Vec<i64>,

        #[clap(flatten)]
        auth: DownloadAuth,
    },
}

#[derive(Args, Clone, Debug)]
pub struct DownloadAuth {
    /// Account used by the backend to generate the PDF
    #[clap(long)]
    pub email: String,

    /// Prompted for when omitted
    #[clap(long)]
    pub password: Option<String>,

    /// Directory the file is written to
    #[clap(short, long, default_value = ".")]
    pub output: String,
}

#[derive(Subcommand, Clone, Debug)]
pub enum CompareTarget {
    /// Compare two report ids
    Reports {
        report_id_1: i64,
        report_id_2: i64,

        /// Project report stage of the first report
        #[clap(long)]
        stage1: Option<i64>,

        /// Project report stage of the second report
        #[clap(long)]
        stage2: Option<i64>,

        /// Ask the backend to store the comparison
        #[clap(long, default_value_t = false)]
        insert: bool,
    },

    /// Compare a mapping's sample report with the report it produced
    Mapping {
        mapping_id: i64,

        #[clap(long, default_value_t = false)]
        insert: bool,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct AutomationTarget {
    /// Sheet (.csv, .xlsx, .xls) with one row per run
    #[clap(short, long)]
    pub sheet: Option<String>,

    /// Show the browser window
    #[clap(long, default_value_t = false)]
    pub headed: bool,

    /// Site to automate (defaults to automation.target_url)
    #[clap(long)]
    pub url: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum AutomationFlow {
    /// Sign in to the target site
    Signin {
        #[clap(long)]
        email: Option<String>,

        /// Prompted for when omitted
        #[clap(long)]
        password: Option<String>,

        #[clap(flatten)]
        target: AutomationTarget,
    },

    /// Create an account on the target site
    Signup {
        #[clap(long)]
        first_name: Option<String>,

        #[clap(long)]
        last_name: Option<String>,

        #[clap(long)]
        email: Option<String>,

        #[clap(long)]
        mobile: Option<String>,

        /// Prompted for when omitted
        #[clap(long)]
        password: Option<String>,

        /// Defaults to the password
        #[clap(long)]
        confirm_password: Option<String>,

        #[clap(flatten)]
        target: AutomationTarget,
    },

    /// Request a password reset on the target site
    Forgot {
        #[clap(long)]
        email: Option<String>,

        #[clap(flatten)]
        target: AutomationTarget,
    },

    /// Write a sample sheet for bulk runs
    Template {
        #[clap(value_enum)]
        kind: TemplateKind,

        /// Output file (defaults to <kind>_template.csv)
        #[clap(short, long)]
        output: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    Signin,
    Signup,
    Forgot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bulk_process_parses_names_and_flags() {
        let cli = Cli::try_parse_from(["mdfive", "process", "bulk", "Report_1", "Report_2", "--no-wait"]).unwrap();
        match cli.command {
            Commands::Process {
                action: ProcessAction::Bulk { report_names, file, no_wait },
            } => {
                assert_eq!(report_names, vec!["Report_1", "Report_2"]);
                assert!(file.is_none());
                assert!(no_wait);
            }
            _ => panic!("expected process bulk"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mdfive", "compare", "reports", "100", "200", "--stage1", "7", "--base-url",
            "http://10.0.0.5:5000", "-v",
        ])
        .unwrap();
        assert!(cli.global.verbose);
        assert_eq!(cli.global.base_url.as_deref(), Some("http://10.0.0.5:5000"));
        assert!(matches!(
            cli.command,
            Commands::Compare {
                target: CompareTarget::Reports { stage1: Some(7), stage2: None, insert: false, .. }
            }
        ));
    }

    #[test]
    fn test_automation_without_flow_is_index() {
        let cli = Cli::try_parse_from(["mdfive", "automation"]).unwrap();
        assert!(matches!(cli.command, Commands::Automation { flow: None }));
    }

    #[test]
    fn test_bulk_download_requires_ids() {
        assert!(Cli::try_parse_from(["mdfive", "download", "bulk", "--email", "a@b.c"]).is_err());
    }
}
