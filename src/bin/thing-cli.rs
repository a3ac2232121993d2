use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Parser)]
#[command(name = "thing-cli")]
#[command(about = "Client for the thing service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:4000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call `GET /`
    Ping,
    /// Create a thing with the given name
    Create { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Ping => client.get(format!("{}/", base)).send().await?,
        Commands::Create { name } => {
            client
                .post(format!("{}/things", base))
                .json(&json!({ "name": name }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = res.text().await?;

    if status.is_success() {
        println!("{}", status);
    } else {
        eprintln!("Error: server returned status {}", status);
    }
    if let Some(id) = request_id {
        println!("Request ID: {}", id);
    }
    if !body.is_empty() {
        println!("{}", body);
    }
    Ok(())
}
