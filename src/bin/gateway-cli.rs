use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, HOST, LOCATION};
use reqwest::redirect::Policy;
use serde_json::json;

use subdomain_gateway::config::{load_config, GatewayConfig};
use subdomain_gateway::dnslink::DnsLinkResolver;
use subdomain_gateway::hostname::{RequestDispatcher, RequestFacts};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Inspect hostname decisions of the subdomain gateway", long_about = None)]
struct Cli {
    /// Gateway config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the decision for a request without starting a server
    Explain {
        /// Host header value, e.g. `bafy....ipfs.dweb.link`
        host: String,
        /// Request path with optional query, e.g. `/ipfs/bafy.../?filename=x`
        #[arg(default_value = "/")]
        path: String,
        /// Treat the request as HTTPS
        #[arg(long)]
        tls: bool,
    },
    /// Send a request to a running gateway and print the response head
    Probe {
        /// Gateway base URL
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
        /// Host header value
        host: String,
        #[arg(default_value = "/")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Explain { host, path, tls } => {
            let config = match &cli.config {
                Some(path) => load_config(path)?,
                None => GatewayConfig::default(),
            };
            let dnslink = DnsLinkResolver::from_config(&config.dnslink)?;
            let dispatcher = RequestDispatcher::from_config(&config.gateway, dnslink);

            let (path, query) = match path.split_once('?') {
                Some((path, query)) => (path.to_string(), Some(query.to_string())),
                None => (path, None),
            };
            let facts = RequestFacts {
                host,
                path,
                query,
                is_tls: tls,
            };
            let decision = dispatcher.dispatch(&facts).await;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "request": {
                        "host": facts.host,
                        "path": facts.path,
                        "query": facts.query,
                        "tls": facts.is_tls,
                    },
                    "decision": decision,
                }))?
            );
        }
        Commands::Probe { url, host, path } => {
            let client = reqwest::Client::builder()
                .redirect(Policy::none())
                .timeout(Duration::from_secs(10))
                .build()?;

            let mut headers = HeaderMap::new();
            headers.insert(HOST, HeaderValue::from_str(&host)?);

            let res = client
                .get(format!("{}{}", url.trim_end_matches('/'), path))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let location = res
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = res.text().await.unwrap_or_default();

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "status": status.as_u16(),
            "location": location,
            "request_id": request_id,
            "body": body.chars().take(512).collect::<String>(),
        }))?
    );
    if status.is_client_error() || status.is_server_error() {
        std::process::exit(1);
    }
    Ok(())
}
