//! Clap derive structures for the `shopfront` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use shopfront_core::Locale;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shopfront -- back-office CLI for the shop catalog, reservations and sales
#[derive(Debug, Parser)]
#[command(
    name = "shopfront",
    version,
    about = "Browse and manage the shop back office from the command line",
    long_about = "A CLI for the shop back-office API.\n\n\
        Lists are normalized into consistent pages whatever shape the server\n\
        returns, and statuses are reconciled into one canonical vocabulary.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Back-office profile to use
    #[arg(long, short = 'p', env = "SHOPFRONT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "SHOPFRONT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides profile and SHOPFRONT_TOKEN)
    #[arg(long, global = true, hide_env = true)]
    pub token: Option<String>,

    /// Config file path
    #[arg(long, env = "SHOPFRONT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "SHOPFRONT_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Label language for statuses
    #[arg(long, short = 'L', global = true)]
    pub locale: Option<Locale>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SHOPFRONT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and act on reservations
    #[command(alias = "res", alias = "r")]
    Reservations(ReservationsArgs),

    /// Browse the product catalog
    #[command(alias = "prod")]
    Products(ProductsArgs),

    /// Browse product categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Browse customers
    #[command(alias = "cust")]
    Customers(CustomersArgs),

    /// Browse sales
    Sales(SalesArgs),

    /// Inspect status vocabularies (offline)
    Status(StatusArgs),

    /// Normalize a saved list response into a canonical page (offline)
    Normalize(NormalizeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination and search arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page to fetch (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Items per page [default: from profile]
    #[arg(long, short = 'l')]
    pub page_size: Option<u32>,

    /// Case-insensitive search text
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Sort expression passed to the server (e.g. "createdAt,desc")
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Record ID
    pub id: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESERVATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReservationsArgs {
    #[command(subcommand)]
    pub command: ReservationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReservationsCommand {
    /// List reservations
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by status (any spelling the server or synonym table knows)
        #[arg(long)]
        status: Option<String>,

        /// Read from the public storefront endpoint
        #[arg(long)]
        public: bool,
    },

    /// Show one reservation
    Get(GetArgs),

    /// Accept a pending reservation
    Accept(GetArgs),

    /// Cancel a reservation
    Cancel {
        /// Reservation ID
        id: String,

        /// Reason recorded with the cancellation
        #[arg(long)]
        reason: Option<String>,
    },

    /// Confirm pickup of a reservation
    Confirm(GetArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATALOG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only products in this category
        #[arg(long)]
        category: Option<String>,

        /// Only active (or only inactive) products
        #[arg(long)]
        active: Option<bool>,

        /// Read from the public storefront endpoint
        #[arg(long)]
        public: bool,
    },

    /// Show one product
    Get(GetArgs),
}

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Read from the public storefront endpoint
        #[arg(long)]
        public: bool,
    },

    /// Show one category
    Get(GetArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CUSTOMERS & SALES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one customer
    Get(GetArgs),
}

#[derive(Debug, Args)]
pub struct SalesArgs {
    #[command(subcommand)]
    pub command: SalesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SalesCommand {
    /// List sales
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by status
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one sale with its lines
    Get(GetArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STATUS & NORMALIZE (offline)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which synonym table a status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusEntity {
    Reservation,
    Sale,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[command(subcommand)]
    pub command: StatusCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatusCommand {
    /// Reconcile raw status strings into canonical statuses
    Canonicalize {
        /// Raw status values as the server sends them
        #[arg(required = true)]
        raw: Vec<String>,

        #[arg(long, short = 'e', default_value = "reservation")]
        entity: StatusEntity,
    },

    /// Show the effective synonym table (built-ins plus config overrides)
    Table {
        #[arg(long, short = 'e', default_value = "reservation")]
        entity: StatusEntity,
    },

    /// List the statuses a filter may offer, in lifecycle order
    Options,
}

/// Entity a saved payload holds, for typed normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayloadEntity {
    Reservations,
    Products,
    Categories,
    Customers,
    Sales,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// JSON file holding a list response ("-" or omitted for stdin)
    pub file: Option<PathBuf>,

    /// Page that was requested
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size that was requested
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Out-of-band total (the X-Total-Count header value)
    #[arg(long, allow_negative_numbers = true)]
    pub total: Option<i64>,

    /// Decode items as this entity and reconcile them
    #[arg(long, short = 'e')]
    pub entity: Option<PayloadEntity>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with one profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// API base URL for the profile
        #[arg(long, default_value = "http://localhost:8080")]
        url: String,

        /// Environment variable holding the bearer token
        #[arg(long)]
        token_env: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
