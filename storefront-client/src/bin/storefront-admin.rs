//! storefront-admin - order administration from the terminal
//!
//! ```text
//! storefront-admin login admin@example.com --password ...
//! export STOREFRONT_TOKEN=...
//! storefront-admin orders --status pending --search rahim
//! storefront-admin confirm 7204476352315392 7204476352315393
//! storefront-admin export --from 2025-01-01 --out orders.csv
//! ```

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use shared::order::format_amount;
use storefront_client::{BulkAction, ClientConfig, HttpClient, OrderFilter, StatusFilter};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Storefront server base URL
    #[arg(long, env = "STOREFRONT_URL", default_value = "http://localhost:3000")]
    url: String,

    /// Admin token from `login`
    #[arg(long, env = "STOREFRONT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print a token for STOREFRONT_TOKEN
    Login {
        email: String,
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Revoke the current token
    Logout,
    /// List orders, newest first
    Orders(FilterArgs),
    /// Confirm one or more pending orders
    Confirm {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete one or more orders
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Write the filtered list as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file, stdout when omitted
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// all, pending or confirmed
    #[arg(long, default_value = "all")]
    status: StatusFilter,
    /// First day, YYYY-MM-DD
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day, YYYY-MM-DD
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Match product, name, phone or address
    #[arg(long, default_value = "")]
    search: String,
    /// Day boundary zone, minutes east of UTC
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i32,
}

impl From<FilterArgs> for OrderFilter {
    fn from(args: FilterArgs) -> Self {
        OrderFilter::default()
            .with_status(args.status)
            .with_range(args.from, args.to)
            .with_search(args.search)
            .with_offset_minutes(args.offset)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::new(&cli.url).with_timeout(cli.timeout);
    if let Some(token) = &cli.token {
        config = config.with_token(token);
    }
    let client = HttpClient::new(&config).context("failed to build HTTP client")?;

    match cli.command {
        Command::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            eprintln!("Signed in as {} until {}", session.email, session.expires_at);
            println!("{}", session.token);
        }
        Command::Logout => {
            client.logout().await?;
            eprintln!("Token revoked");
        }
        Command::Orders(filter) => {
            let list = client.list_orders(&filter.into()).await?;
            for order in &list.orders {
                let created = order
                    .created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<20} {:<10} {:<16} {:>4} {:>10}  {} / {}",
                    order.id,
                    order.status,
                    created,
                    order.quantity,
                    format_amount(order.total_price),
                    order.name,
                    order.phone,
                );
            }
            eprintln!(
                "{} shown, {} total, {} pending, {} confirmed",
                list.shown, list.stats.total, list.stats.pending, list.stats.confirmed
            );
        }
        Command::Confirm { ids } => bulk(&client, BulkAction::Confirm, &ids).await?,
        Command::Delete { ids } => bulk(&client, BulkAction::Delete, &ids).await?,
        Command::Export { filter, out } => {
            let csv = client.export_csv(&filter.into()).await?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, &csv)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    let rows = csv.lines().count().saturating_sub(1);
                    eprintln!("Wrote {rows} rows to {}", path.display());
                }
                None => println!("{csv}"),
            }
        }
    }
    Ok(())
}

async fn bulk(client: &HttpClient, action: BulkAction, ids: &[String]) -> anyhow::Result<()> {
    if let [id] = ids {
        let order = match action {
            BulkAction::Confirm => client.confirm_order(id).await?,
            BulkAction::Delete => client.delete_order(id).await?,
        };
        eprintln!("{} {}: {}", action.as_str(), order.id, order.status);
        return Ok(());
    }

    let result = client.bulk(action, ids).await?;
    for id in &result.affected {
        eprintln!("{} {id}", action.as_str());
    }
    for id in &result.missing {
        eprintln!("not found: {id}");
    }
    if result.affected.is_empty() && !result.missing.is_empty() {
        bail!("none of the given orders exist");
    }
    Ok(())
}
