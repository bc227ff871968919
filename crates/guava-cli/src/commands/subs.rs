use chrono::Utc;
use guava_core::models::Source;
use guava_core::pricing::format_price;
use guava_core::subscriptions::monthly_total;

use crate::cli::SubscriptionCommands;
use crate::commands::common::{format_relative_time, open_session, print_json, SessionOptions};
use crate::error::CliError;

pub async fn run_subscriptions(
    command: SubscriptionCommands,
    options: &SessionOptions,
) -> Result<(), CliError> {
    let session = open_session(options)?;
    let subscriptions = session.subscriptions();

    match command {
        SubscriptionCommands::List { json } => {
            let listed = subscriptions.list().await?;
            if json {
                return print_json(&listed);
            }
            if listed.subscriptions.is_empty() {
                println!("No subscriptions.");
                return Ok(());
            }

            let now = Utc::now();
            for subscription in &listed.subscriptions {
                let added = subscription
                    .created_at
                    .map(|created_at| format!("  {}", format_relative_time(created_at, now)))
                    .unwrap_or_default();
                println!(
                    "{:>4}  service {}  plan {}{}",
                    subscription.id,
                    subscription.service,
                    subscription.plan.as_deref().unwrap_or("-"),
                    added
                );
            }
            if listed.source == Source::Local {
                println!("(cached copy; server unreachable)");
            }
        }
        SubscriptionCommands::Add {
            service_id,
            plan_id,
        } => {
            let created = subscriptions
                .subscribe(service_id.trim(), plan_id.as_deref().map(str::trim))
                .await?;
            println!("Subscribed (id {})", created.id);
        }
        SubscriptionCommands::Remove { subscription_id } => {
            subscriptions.unsubscribe(subscription_id.trim()).await?;
            println!("Cancelled subscription {}", subscription_id.trim());
        }
        SubscriptionCommands::Total => {
            let listed = subscriptions.list().await?;
            let services = session.api().list_services().await?;
            let total = monthly_total(&listed.subscriptions, &services);
            println!(
                "{} / month across {} subscription(s)",
                format_price(total),
                listed.subscriptions.len()
            );
        }
    }

    Ok(())
}
