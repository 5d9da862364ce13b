use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use colored::Colorize;

use warehouse_store::{keys, remove_tier, FixedPaths, PathProvider, PlatformPaths, Warehouse};
use warehouse_types::{ExpiryPolicy, Tier, Value};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let paths: Arc<dyn PathProvider> = match &cli.root {
        Some(root) => Arc::new(FixedPaths::new(root)),
        None => Arc::new(PlatformPaths),
    };
    let tier = cli.tier;

    match cli.command {
        Command::Get(args) => cmd_get(paths, tier, args),
        Command::Set(args) => cmd_set(paths, tier, args),
        Command::Exists(args) => cmd_exists(paths, tier, args),
        Command::Remove(args) => cmd_remove(paths, tier, args),
        Command::Keys => cmd_keys(paths, tier),
        Command::Clear => cmd_clear(paths, tier),
        Command::Path(args) => cmd_path(paths, tier, args),
    }
}

fn cmd_get(paths: Arc<dyn PathProvider>, tier: Tier, args: GetArgs) -> anyhow::Result<()> {
    let w = Warehouse::with_provider(&args.key, tier, paths);
    // Existence first, so expired entries are purged rather than printed.
    if !w.exists() {
        anyhow::bail!("no entry for `{}` in the {} tier", args.key, tier);
    }
    let value = match &args.field {
        Some(field) => w
            .get::<Value>(field)
            .with_context(|| format!("`{}` has no field `{field}`", args.key))?,
        None => w
            .load()
            .with_context(|| format!("entry `{}` vanished during read", args.key))?,
    };
    let json = serde_json::to_string_pretty(&serde_json::Value::from(value))?;
    println!("{json}");
    Ok(())
}

fn cmd_set(paths: Arc<dyn PathProvider>, tier: Tier, args: SetArgs) -> anyhow::Result<()> {
    let json: serde_json::Value = serde_json::from_str(&args.value)
        .with_context(|| format!("`{}` is not valid JSON", args.value))?;
    let expiry = match (args.ttl, args.at) {
        (Some(secs), _) => ExpiryPolicy::After(Duration::from_secs(secs)),
        (None, Some(at)) => ExpiryPolicy::At(at),
        (None, None) => ExpiryPolicy::Never,
    };

    let w = Warehouse::with_provider(&args.key, tier, paths);
    w.try_write(Value::from(json), expiry)
        .with_context(|| format!("failed to store `{}`", args.key))?;

    match expiry.resolve() {
        Some(at) => println!(
            "{} Stored {} in the {} tier (expires at {})",
            "✓".green().bold(),
            args.key.yellow(),
            tier,
            at.to_string().cyan(),
        ),
        None => println!(
            "{} Stored {} in the {} tier",
            "✓".green().bold(),
            args.key.yellow(),
            tier,
        ),
    }
    Ok(())
}

fn cmd_exists(paths: Arc<dyn PathProvider>, tier: Tier, args: KeyArgs) -> anyhow::Result<()> {
    let w = Warehouse::with_provider(&args.key, tier, paths);
    if w.exists() {
        println!("{} {} is present", "✓".green(), args.key.yellow());
    } else {
        println!("{} {} is absent", "✗".red(), args.key.yellow());
    }
    Ok(())
}

fn cmd_remove(paths: Arc<dyn PathProvider>, tier: Tier, args: KeyArgs) -> anyhow::Result<()> {
    Warehouse::with_provider(&args.key, tier, paths).remove();
    println!("{} Removed {}", "✓".green(), args.key.yellow());
    Ok(())
}

fn cmd_keys(paths: Arc<dyn PathProvider>, tier: Tier) -> anyhow::Result<()> {
    let listed = keys(paths.as_ref(), tier);
    if listed.is_empty() {
        println!("No entries in the {tier} tier.");
    } else {
        for key in listed {
            println!("{key}");
        }
    }
    Ok(())
}

fn cmd_clear(paths: Arc<dyn PathProvider>, tier: Tier) -> anyhow::Result<()> {
    remove_tier(paths.as_ref(), tier);
    println!("{} Cleared the {} tier", "✓".green().bold(), tier);
    Ok(())
}

fn cmd_path(paths: Arc<dyn PathProvider>, tier: Tier, args: KeyArgs) -> anyhow::Result<()> {
    let w = Warehouse::with_provider(&args.key, tier, paths);
    match w.path() {
        Some(path) => println!("{}", path.display()),
        None => anyhow::bail!("handle has no backing file"),
    }
    Ok(())
}
