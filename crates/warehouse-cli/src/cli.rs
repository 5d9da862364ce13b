use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use warehouse_types::Tier;

#[derive(Parser)]
#[command(
    name = "warehouse",
    about = "File-backed JSON object cache with retention tiers and lazy expiry",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store root directory (defaults to the platform documents/caches locations)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Retention tier to operate on
    #[arg(long, global = true, default_value = "permanent")]
    pub tier: Tier,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the stored value for a key as JSON
    Get(GetArgs),
    /// Store a JSON value under a key
    Set(SetArgs),
    /// Check whether a key currently holds valid data
    Exists(KeyArgs),
    /// Delete a key's entry
    Remove(KeyArgs),
    /// List the keys present in the tier
    Keys,
    /// Delete the tier's entire directory
    Clear,
    /// Print the file path backing a key
    Path(KeyArgs),
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,

    /// Read a single field of the stored object instead of the whole value
    #[arg(long)]
    pub field: Option<String>,
}

#[derive(Args)]
pub struct SetArgs {
    pub key: String,

    /// The value to store, as JSON text
    pub value: String,

    /// Expire this many seconds after the write
    #[arg(long, conflicts_with = "at")]
    pub ttl: Option<u64>,

    /// Expire at an absolute Unix timestamp (seconds)
    #[arg(long)]
    pub at: Option<u64>,
}
