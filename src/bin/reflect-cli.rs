use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "reflect-cli")]
#[command(about = "Client for a running reflectsvc instance", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9090")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an XML event document and print the JSON
    Convert { file: PathBuf },
    /// Convert an XML event document and relay it downstream
    Submit { file: PathBuf },
    /// Reverse a string
    Reverse { s: String },
    /// Uppercase a string
    Uppercase { s: String },
    /// Count the characters of a string
    Count { s: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Convert { file } => {
            client
                .post(format!("{}/convert", base))
                .header(CONTENT_TYPE, "application/xml")
                .body(std::fs::read(file)?)
                .send()
                .await?
        }
        Commands::Submit { file } => {
            client
                .post(format!("{}/xml2json", base))
                .header(CONTENT_TYPE, "application/xml")
                .body(std::fs::read(file)?)
                .send()
                .await?
        }
        Commands::Reverse { s } => {
            client.post(format!("{}/reverse", base)).json(&json!({ "s": s })).send().await?
        }
        Commands::Uppercase { s } => {
            client.post(format!("{}/uppercase", base)).json(&json!({ "s": s })).send().await?
        }
        Commands::Count { s } => {
            client.post(format!("{}/count", base)).json(&json!({ "s": s })).send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
