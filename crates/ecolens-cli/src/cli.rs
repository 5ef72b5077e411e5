//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use ecolens_domain::DataSource;
use ecolens_workflow::FormInput;
use std::path::PathBuf;

/// Ecolens CLI - Capture product data and prepare it for impact analysis.
#[derive(Debug, Parser)]
#[command(name = "ecolens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Directory for config, session and history (default: ~/.ecolens)
    #[arg(long, global = true, env = "ECOLENS_HOME")]
    pub home: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the display name for this session
    Login(LoginArgs),

    /// Clear the session
    Logout,

    /// Inspect, select, load or upload datasets
    Dataset(DatasetArgs),

    /// Analyze a free-text product description
    Analyze(AnalyzeArgs),

    /// Submit product data through the structured form
    Submit(SubmitArgs),

    /// Show the stored product record
    Show,

    /// Show or change one field of the stored record
    Edit(EditArgs),

    /// Confirm the stored record and save it
    Confirm,

    /// Go back to the input stage
    Back,

    /// Manage configuration profiles
    Profile(ProfileArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the login command.
#[derive(Debug, Parser)]
pub struct LoginArgs {
    /// Display name
    pub username: String,
}

/// Arguments for dataset management.
#[derive(Debug, Parser)]
pub struct DatasetArgs {
    #[command(subcommand)]
    pub action: DatasetAction,
}

/// Dataset actions.
#[derive(Debug, Subcommand)]
pub enum DatasetAction {
    /// Show the selected data source and OpenLCA availability
    Status,

    /// Select the data source without loading it
    Select {
        /// Data source
        #[arg(value_enum)]
        source: DataSourceArg,
    },

    /// Load a dataset on the backend and select it
    Load {
        /// Data source
        #[arg(value_enum)]
        source: DataSourceArg,
    },

    /// Upload dataset files (csv, xlsx, xls, json, xml)
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Product description, e.g. "500g aluminum bottle, 30% recycled"
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

/// Arguments for the submit command.
///
/// Required fields are optional here so that local validation can report
/// every missing one at once.
#[derive(Debug, Default, Parser)]
pub struct SubmitArgs {
    /// Product name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Material type
    #[arg(short, long)]
    pub material: Option<String>,

    /// Weight
    #[arg(short, long, allow_hyphen_values = true)]
    pub weight: Option<String>,

    /// Weight unit (default: kg)
    #[arg(short, long)]
    pub unit: Option<String>,

    /// Recycled content percentage
    #[arg(short, long, allow_hyphen_values = true)]
    pub recycled: Option<String>,

    /// Lifecycle stage
    #[arg(short, long)]
    pub stage: Option<String>,

    /// Processing details
    #[arg(short, long)]
    pub details: Option<String>,
}

/// Arguments for the edit command.
#[derive(Debug, Parser)]
pub struct EditArgs {
    /// Field name (e.g. weight, recycledContent, "Lifecycle Stage")
    pub field: String,

    /// New value; omit to show the current value and allowed input
    #[arg(allow_hyphen_values = true, num_args = 0..)]
    pub value: Vec<String>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Backend URL
        #[arg(short, long)]
        url: String,
        /// Default data source
        #[arg(short, long, value_enum)]
        source: Option<DataSourceArg>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

/// Data source argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DataSourceArg {
    /// Live OpenLCA instance
    Openlca,
    /// Ecoinvent database
    Ecoinvent,
    /// Indian LCA database
    Indian,
    /// Dataset bundled with the backend
    Builtin,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<DataSourceArg> for DataSource {
    fn from(source: DataSourceArg) -> Self {
        match source {
            DataSourceArg::Openlca => DataSource::OpenLca,
            DataSourceArg::Ecoinvent => DataSource::Ecoinvent,
            DataSourceArg::Indian => DataSource::Indian,
            DataSourceArg::Builtin => DataSource::Builtin,
        }
    }
}

impl From<SubmitArgs> for FormInput {
    fn from(args: SubmitArgs) -> Self {
        FormInput {
            product_name: args.name.unwrap_or_default(),
            material_type: args.material.unwrap_or_default(),
            weight: args.weight.unwrap_or_default(),
            weight_unit: args.unit.unwrap_or_default(),
            recycled_content: args.recycled.unwrap_or_default(),
            lifecycle_stage: args.stage.unwrap_or_default(),
            processing_details: args.details.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::parse_from(["ecolens"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_analyze_joins_words() {
        let cli = Cli::parse_from(["ecolens", "analyze", "500g", "aluminum", "bottle"]);
        match cli.command {
            Some(Command::Analyze(args)) => assert_eq!(args.text.join(" "), "500g aluminum bottle"),
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_submit_accepts_negative_weight() {
        let cli = Cli::parse_from(["ecolens", "submit", "--name", "Mug", "--weight", "-5"]);
        match cli.command {
            Some(Command::Submit(args)) => {
                let form = FormInput::from(args);
                assert_eq!(form.weight, "-5");
                assert_eq!(form.product_name, "Mug");
                assert!(form.material_type.is_empty());
            }
            _ => panic!("Expected Submit command"),
        }
    }

    #[test]
    fn test_dataset_load() {
        let cli = Cli::parse_from(["ecolens", "dataset", "load", "openlca"]);
        match cli.command {
            Some(Command::Dataset(DatasetArgs {
                action: DatasetAction::Load { source },
            })) => assert_eq!(DataSource::from(source), DataSource::OpenLca),
            _ => panic!("Expected dataset load"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ecolens", "show", "--format", "json", "--no-color"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.no_color);
    }
}
