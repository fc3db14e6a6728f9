use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bleau")]
#[command(about = "Command line interface for the Tableau Server REST and Metadata APIs")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the selected profile
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Tableau server URL
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Personal access token name
    #[arg(long, global = true)]
    pub token_name: Option<String>,

    /// Personal access token secret (prompted for when unset)
    #[arg(long, global = true, env = "TABLEAU_PAT_SECRET", hide_env_values = true)]
    pub token_secret: Option<String>,

    /// Site content URL; empty for the default site
    #[arg(long, global = true)]
    pub site: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authentication commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Published workbooks
    Workbooks {
        #[command(subcommand)]
        command: WorkbookCommands,
    },
    /// Published views
    Views {
        #[command(subcommand)]
        command: ViewCommands,
    },
    /// Metadata API (GraphQL)
    Metadata {
        #[command(subcommand)]
        command: MetadataCommands,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Sign in and out again to verify the credentials
    Check,
}

#[derive(Subcommand, Debug)]
pub enum WorkbookCommands {
    /// List workbooks on the site
    List {
        /// Filter expression, e.g. name:eq:Sales
        #[arg(long)]
        filter: Option<String>,
        /// Sort expression, e.g. updatedAt:desc
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        page_number: Option<u32>,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one workbook
    Get {
        /// Workbook id
        id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ViewCommands {
    /// Show the underlying data of a view
    Data {
        /// View id
        id: String,
        /// Maximum number of rows to show
        #[arg(long, default_value = "50")]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum MetadataCommands {
    /// Run a GraphQL query; prefix with @ to read it from a file
    Query {
        query: String,
        /// Variables as a JSON object
        #[arg(long)]
        variables: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the configured profiles
    Show,
    /// Save --server, --token-name and --site into the selected profile
    Set {
        #[arg(long)]
        api_version: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}
