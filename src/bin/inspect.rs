use alertdash::{
    BucketIndex,
    app::{build_dashboard, open_store},
    config::AppConfig,
    inspect::{BucketStatus, audit_buckets},
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "alertdash-inspect")]
#[command(about = "Inspect the pre-aggregated dashboard documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List buckets and check the layout the dashboard relies on
    Buckets {
        #[arg(long)]
        json: bool,
    },
    /// Print one bucket exactly as /loadMoreAlerts would serve it
    Bucket {
        #[arg(long, allow_hyphen_values = true)]
        index: BucketIndex,
    },
    /// Print the recent-alerts snapshot
    Snapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let store = open_store(&config).await?;
    let dashboard = build_dashboard(store.clone(), &config);

    let outcome = match cli.command {
        Command::Buckets { json } => {
            let layout = audit_buckets(dashboard.reader()).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                println!("buckets: {}", layout.bucket_count);
                for bucket in &layout.buckets {
                    match &bucket.status {
                        BucketStatus::Found {
                            size,
                            reported_count,
                        } => println!(
                            "  {:<24} size={:<6} count={}",
                            bucket.id, size, reported_count
                        ),
                        BucketStatus::Missing => println!("  {:<24} missing", bucket.id),
                        BucketStatus::Failed { error } => {
                            println!("  {:<24} failed: {}", bucket.id, error)
                        }
                    }
                }
                println!("stored alerts: {}", layout.stored_alerts());
                for issue in &layout.issues {
                    println!("issue: {issue}");
                }
            }

            if layout.is_consistent() {
                Ok(())
            } else {
                Err(anyhow!("{} layout issue(s) found", layout.issues.len()))
            }
        }
        Command::Bucket { index } => {
            let response = dashboard.load_more(index).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Command::Snapshot => {
            let recent = dashboard.reader().recent_alerts().await;
            let alerts = recent
                .value
                .map_err(|err| anyhow!("failed to read snapshot: {err}"))?;
            println!("{}", serde_json::to_string_pretty(&alerts)?);
            Ok(())
        }
    };

    store.shutdown().await;
    outcome
}
