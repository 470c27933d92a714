use clap::{Parser, Subcommand};
use serde_json::{Value, json};

#[derive(Parser)]
#[command(name = "console-cli")]
#[command(about = "Management CLI for the Gateway Console API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check console status and cluster connectivity
    Status,
    /// Simulate a request against a named route
    Simulate {
        namespace: String,
        name: String,
        #[arg(short, long)]
        path: String,
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Headers as name=value pairs
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
    /// Run the route health-check pipeline
    RouteCheck {
        namespace: String,
        name: String,
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Trace a hostname and path to the winning route
    Trace {
        #[arg(long)]
        host: String,
        #[arg(short, long)]
        path: String,
        #[arg(short, long)]
        method: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/status", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Simulate {
            namespace,
            name,
            path,
            method,
            headers,
        } => {
            let mut header_map = serde_json::Map::new();
            for header in headers {
                match header.split_once('=') {
                    Some((k, v)) => {
                        header_map.insert(k.to_string(), Value::String(v.to_string()));
                    }
                    None => {
                        eprintln!("Ignoring malformed header {header:?}; expected name=value");
                    }
                }
            }

            let res = client
                .post(format!("{}/{}/{}/simulate", cli.url, namespace, name))
                .json(&json!({
                    "method": method,
                    "path": path,
                    "headers": header_map,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::RouteCheck {
            namespace,
            name,
            kind,
        } => {
            let mut body = json!({
                "namespace": namespace,
                "routeName": name,
            });
            if let Some(kind) = kind {
                body["routeKind"] = Value::String(kind);
            }

            let res = client
                .post(format!("{}/diagnostics/route-check", cli.url))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Trace { host, path, method } => {
            let mut body = json!({
                "host": host,
                "path": path,
            });
            if let Some(method) = method {
                body["method"] = Value::String(method);
            }

            let res = client
                .post(format!("{}/diagnostics/trace", cli.url))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Console API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
