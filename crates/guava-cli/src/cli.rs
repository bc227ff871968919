use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use guava_core::catalog::SortOrder;

#[derive(Parser)]
#[command(name = "guava")]
#[command(about = "Browse, compare and track subscription services")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the local storage file
    #[arg(long, global = true, value_name = "PATH")]
    pub storage: Option<PathBuf>,

    /// API base URL for this invocation
    #[arg(long, global = true, value_name = "URL")]
    pub api: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, sign out and inspect the stored session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Manage bookmarked services
    #[command(alias = "bm")]
    Bookmarks {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Browse the service catalog
    Services {
        #[command(subcommand)]
        command: ServiceCommands,
    },
    /// Manage your subscriptions
    Subs {
        #[command(subcommand)]
        command: SubscriptionCommands,
    },
    /// Local preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Write the script to this file, or into this directory under the
        /// shell's usual file name (defaults to stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with username and password
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Exchange the refresh token for a new access token
    Refresh,
    /// Sign out and clear stored tokens
    Logout,
    /// Show whether a session is stored
    Status,
}

#[derive(Subcommand)]
pub enum BookmarkCommands {
    /// List bookmarked service ids
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Bookmark a service
    Add {
        /// Service id
        service_id: String,
    },
    /// Remove a bookmark
    #[command(alias = "rm")]
    Remove {
        /// Service id
        service_id: String,
    },
    /// Show the memo for a bookmark, set it when text is given, or clear it
    Memo {
        /// Service id
        service_id: String,
        /// Memo text
        text: Vec<String>,
        /// Remove the memo
        #[arg(long, conflicts_with = "text")]
        clear: bool,
    },
}

#[derive(Subcommand)]
pub enum ServiceCommands {
    /// List services
    List {
        /// Only services in this category
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive match on name or description
        #[arg(short, long)]
        query: Option<String>,
        /// Sort order
        #[arg(long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a service and its plans
    Show {
        /// Service id
        service_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare services side by side
    Compare {
        /// Service ids
        #[arg(required = true, num_args = 1..)]
        service_ids: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known categories
    Categories,
}

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// List your subscriptions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Subscribe to a service plan
    Add {
        /// Service id
        service_id: String,
        /// Plan id
        plan_id: Option<String>,
    },
    /// Cancel a subscription
    #[command(alias = "rm")]
    Remove {
        /// Subscription id
        subscription_id: String,
    },
    /// Monthly total across your subscriptions
    Total,
}

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show stored preferences
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set notification channels; omitted channels keep their value
    Notify {
        #[arg(long)]
        email: Option<bool>,
        #[arg(long)]
        push: Option<bool>,
        #[arg(long)]
        sms: Option<bool>,
    },
    /// Select a telecom carrier, or clear it when omitted
    Telecom {
        /// Telecom id
        telecom_id: Option<String>,
    },
    /// Replace the selected cards
    Cards {
        /// Card ids
        card_ids: Vec<String>,
    },
    /// Show the note for a service, set it when text is given, or clear it
    Note {
        /// Service id
        service_id: String,
        /// Note text
        text: Vec<String>,
        /// Remove the note
        #[arg(long, conflicts_with = "text")]
        clear: bool,
    },
    /// List telecom carriers known to the server
    Telecoms,
    /// List payment cards known to the server
    AvailableCards,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Update values in the config file
    Set {
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        #[arg(long, value_name = "SECONDS")]
        request_timeout_secs: Option<u64>,
        #[arg(long, value_name = "PATH")]
        storage_path: Option<PathBuf>,
        #[arg(long)]
        purge_local_on_logout: Option<bool>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Name,
    PriceAsc,
    PriceDesc,
}

impl From<SortArg> for SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => Self::Name,
            SortArg::PriceAsc => Self::PriceAscending,
            SortArg::PriceDesc => Self::PriceDescending,
        }
    }
}
