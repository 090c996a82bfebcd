use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the game gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the number of connected players
    PlayerCount,
    /// Start (or update) a reboot countdown
    Reboot {
        /// Minutes until the server restarts (1-255)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..))]
        minutes: u8,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::PlayerCount => {
            let res = client.get(format!("{base}/playercount")).send().await?;
            if let Some(res) = check_status(res).await? {
                let json: Value = res.json().await?;
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
        Commands::Reboot { minutes } => {
            let res = client
                .get(format!("{base}/reboot"))
                .query(&[("minutesLeft", minutes)])
                .send()
                .await?;
            if check_status(res).await?.is_some() {
                println!("Reboot alert sent: {minutes} minute(s) left");
            }
        }
    }

    Ok(())
}

async fn check_status(
    res: reqwest::Response,
) -> Result<Option<reqwest::Response>, Box<dyn std::error::Error>> {
    let status = res.status();
    if status.is_success() {
        return Ok(Some(res));
    }
    eprintln!("Error: gateway returned status {}", status);
    if let Ok(text) = res.text().await {
        eprintln!("Response: {}", text);
    }
    Ok(None)
}
