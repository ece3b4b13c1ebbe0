use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{CliError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/cli.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub base_url: String,
    pub cache_path: String,
    /// Cache key owner. Should match the subject of the token in use.
    pub user: String,
    #[serde(skip)]
    pub token: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4000".to_string(),
            cache_path: "config/expense_cache.json".to_string(),
            user: String::new(),
            token: String::new(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "expense_cli", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:4000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override cache file path.
    #[arg(long)]
    cache_path: Option<String>,
    /// Override user id used for the local cache.
    #[arg(long)]
    user: Option<String>,
    /// Bearer access token.
    #[arg(long, env = "EXPENSE_TOKEN", hide_env_values = true)]
    token: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every transaction, newest first.
    List,
    /// Show totals, balance, recent activity and spending per category.
    Summary,
    /// Record a new transaction.
    Add(DraftArgs),
    /// Replace an existing transaction.
    Update {
        id: Uuid,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Delete a transaction.
    Delete { id: Uuid },
}

#[derive(Debug, Clone, clap::Args)]
pub struct DraftArgs {
    #[arg(long = "type", value_enum, default_value_t = Kind::Expense)]
    pub kind: Kind,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub amount: f64,
    #[arg(long, value_enum, default_value_t = CategoryArg::Other)]
    pub category: CategoryArg,
    /// Date as YYYY-MM-DD; defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Food,
    Transport,
    Shopping,
    Bills,
    Income,
    Other,
}

pub fn load() -> Result<(CliConfig, Command)> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("EXPENSE_CLI"));
    let mut settings: CliConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(cache_path) = args.cache_path {
        settings.cache_path = cache_path;
    }
    if let Some(user) = args.user {
        settings.user = user;
    }
    settings.token = args.token;

    if settings.user.trim().is_empty() {
        return Err(CliError::Input(
            "no user configured; pass --user or set EXPENSE_CLI_USER".to_string(),
        ));
    }

    Ok((settings, args.command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_defaults() {
        let args = Args::try_parse_from([
            "expense_cli",
            "--token",
            "t",
            "add",
            "--title",
            "Coffee",
            "--amount",
            "4.5",
        ])
        .unwrap();

        let Command::Add(draft) = args.command else {
            panic!("expected add");
        };
        assert_eq!(draft.kind, Kind::Expense);
        assert_eq!(draft.category, CategoryArg::Other);
        assert_eq!(draft.amount, 4.5);
        assert!(draft.date.is_none());
    }

    #[test]
    fn parses_update_with_id_and_date() {
        let id = "6f1c2a4e-8a59-4d0e-9a53-1d6f0f2b7c11";
        let args = Args::try_parse_from([
            "expense_cli",
            "--token",
            "t",
            "update",
            id,
            "--type",
            "income",
            "--title",
            "Salary",
            "--amount",
            "1000",
            "--category",
            "income",
            "--date",
            "2024-01-31",
        ])
        .unwrap();

        let Command::Update { id: parsed, draft } = args.command else {
            panic!("expected update");
        };
        assert_eq!(parsed.to_string(), id);
        assert_eq!(draft.kind, Kind::Income);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn rejects_unknown_category() {
        let result = Args::try_parse_from([
            "expense_cli",
            "--token",
            "t",
            "add",
            "--title",
            "Coffee",
            "--amount",
            "1",
            "--category",
            "pets",
        ]);
        assert!(result.is_err());
    }
}
