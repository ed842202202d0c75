use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hetzner_dns_sync::{
    AppState, api,
    config::ProviderConfig,
    endpoint::Changes,
    filter::{DomainFilter, ZoneIdFilter},
    hetzner::{DEFAULT_BASE_URL, HetznerClient},
    provider::HetznerProvider,
};
use regex::Regex;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    #[command(flatten)]
    provider: ProviderArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
#[command(rename_all = "kebab-case")]
struct ProviderArgs {
    /// Hetzner DNS API token
    #[arg(long, env = "HETZNER_API_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    api_token: String,
    /// Hetzner DNS API base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Log intended changes instead of applying them
    #[arg(long)]
    dry_run: bool,
    /// Limit to zones under this domain (repeat for multiple values)
    #[arg(long = "domain-filter", value_name = "DOMAIN")]
    domain_filter: Vec<String>,
    /// Exclude zones under this domain (repeat for multiple values)
    #[arg(long = "exclude-domains", value_name = "DOMAIN")]
    exclude_domains: Vec<String>,
    /// Regex selecting zones; overrides --domain-filter and --exclude-domains
    #[arg(long, value_name = "REGEX")]
    regex_domain_filter: Option<String>,
    /// Regex excluding zones, used with --regex-domain-filter
    #[arg(long, value_name = "REGEX", requires = "regex_domain_filter")]
    regex_domain_exclusion: Option<String>,
    /// Limit to this zone id (repeat for multiple values)
    #[arg(long = "zone-id-filter", value_name = "ID")]
    zone_id_filter: Vec<String>,
    /// Timeout for each provider API request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    request_timeout: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the external-dns webhook API
    Serve {
        /// Listen address for the HTTP server
        #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:8888")]
        listen: SocketAddr,
    },
    /// Print the observed records as JSON
    Records,
    /// Apply a changeset read from a JSON file
    Apply {
        /// Path to a changeset in external-dns webhook format
        #[arg(long, value_name = "PATH")]
        changes: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = build_provider_config(&cli.provider)?;
    info!(?config, "starting");
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.provider.request_timeout))
        .build()
        .context("failed to create HTTP client")?;
    let api = HetznerClient::with_http(http, &config.base_url, &config.api_token);
    let provider = HetznerProvider::with_api(api, config);

    match cli.command {
        Command::Serve { listen } => serve(provider, listen).await,
        Command::Records => {
            let records = provider.records().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Command::Apply { changes } => {
            let raw = std::fs::read_to_string(&changes)
                .with_context(|| format!("failed to read {}", changes.display()))?;
            let changes: Changes = serde_json::from_str(&raw)
                .with_context(|| format!("invalid changeset in {}", changes.display()))?;
            let report = provider.apply_changes(&changes).await?;
            println!(
                "created={} updated={} deleted={} skipped={} failed={} dry_run={}",
                report.created,
                report.updated,
                report.deleted,
                report.skipped,
                report.failed,
                report.dry_run
            );
            Ok(())
        }
    }
}

async fn serve(provider: HetznerProvider, listen: SocketAddr) -> Result<()> {
    let state = Arc::new(AppState { provider });
    let app = api::create_router(state);

    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind to {listen}"))?;

    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")?;

    Ok(())
}

fn build_provider_config(args: &ProviderArgs) -> Result<ProviderConfig> {
    let domain_filter = match &args.regex_domain_filter {
        Some(pattern) => {
            let regex = Regex::new(pattern)
                .with_context(|| format!("invalid regex-domain-filter '{pattern}'"))?;
            let exclusion = args
                .regex_domain_exclusion
                .as_deref()
                .map(|p| {
                    Regex::new(p).with_context(|| format!("invalid regex-domain-exclusion '{p}'"))
                })
                .transpose()?;
            DomainFilter::with_regex(regex, exclusion)
        }
        None => DomainFilter::new(&args.domain_filter, &args.exclude_domains),
    };

    Ok(ProviderConfig::new(args.api_token.trim())
        .with_base_url(args.base_url.trim_end_matches('/'))
        .with_dry_run(args.dry_run)
        .with_domain_filter(domain_filter)
        .with_zone_id_filter(ZoneIdFilter::new(args.zone_id_filter.iter().cloned())))
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to install CTRL+C handler: {err}");
    }
    info!("shutdown signal received");
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
