//! # watch-orders
//!
//! Developer tool: prints today's orders, then streams order changes until
//! Ctrl-C.
//!
//! ```text
//! watch-orders [path/to/.env]
//!
//!   RUST_LOG=debug           show every request and channel message
//!   DINETAB_CURRENCY=EUR     any dinetab.toml override applies
//! ```

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dinetab_backend::{BackendClient, ClientSettings, ConfigSource, EnvConfig};
use dinetab_core::format::{format_currency, format_time};
use dinetab_core::Order;
use dinetab_realtime::{OrderChange, OrderFeed, SubscriptionStatus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let env_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".env"));

    let options = ClientSettings::load_or_default(None);
    let currency = options.display.currency.clone();

    let mut config = EnvConfig::new();
    let settings = config
        .load(ConfigSource::File(env_path.clone()))
        .await
        .with_context(|| format!("loading {}", env_path.display()))?;

    let client = BackendClient::with_options(options);
    client.init(&settings)?;

    let today = Utc::now().date_naive();
    let report = client.analytics().for_date(today).await?;
    for failure in &report.errors {
        warn!(part = ?failure.part, message = %failure.message, "Partial report");
    }
    println!("Orders on {today}: {}", report.orders.len());
    for order in &report.orders {
        println!("  {}", order_line(order, &currency));
    }
    println!(
        "  revenue: {}",
        format_currency(report.orders_revenue(), &currency)
    );

    let mut subscription = OrderFeed::subscribe(&client).await?;
    info!("Watching order changes, Ctrl-C to stop");

    loop {
        tokio::select! {
            change = subscription.next() => match change {
                Some(Ok(change)) => println!("{}", change_line(&change, &currency)),
                Some(Err(e)) => warn!(error = %e, "Order change"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                break;
            }
        }
    }

    let status = subscription.status();
    subscription.stop().await;
    if status == SubscriptionStatus::Errored {
        anyhow::bail!("order feed ended with an error");
    }
    Ok(())
}

fn order_line(order: &Order, currency: &str) -> String {
    let table = order
        .table_number()
        .map(|n| format!("table {n}"))
        .unwrap_or_else(|| "no table".to_string());
    format!(
        "{} {} {:<10} {:<8} {} ({} items)",
        format_time(&order.created_at),
        order.id,
        table,
        order.status,
        format_currency(order.total_amount, currency),
        order.items.len()
    )
}

fn change_line(change: &OrderChange, currency: &str) -> String {
    match (&change.new, &change.old) {
        (Some(order), _) => format!("{:<6} {}", change.event_type, order_line(order, currency)),
        (None, Some(old)) => format!("{:<6} {}", change.event_type, old),
        (None, None) => change.event_type.to_string(),
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dinetab=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
