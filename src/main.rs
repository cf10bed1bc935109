mod config;
mod deadline;
mod error;
mod report;
mod request;
mod runner;
mod worker;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use crate::config::{BenchmarkConfig, HttpMethod, Proxy};
use crate::error::{BenchError, ExitCode};

#[derive(Parser, Debug)]
#[command(name = "httpbench")]
#[command(about = "HTTP load benchmark", long_about = None)]
struct Cli {
    /// Number of concurrent clients
    #[arg(short, long, env = "HTTPBENCH_CLIENTS", default_value = "1")]
    clients: usize,

    /// Benchmark duration in seconds
    #[arg(short = 't', long = "time", env = "HTTPBENCH_TIME", default_value = "30")]
    time: u64,

    /// Don't wait for the server reply
    #[arg(short, long)]
    force: bool,

    /// Send "Pragma: no-cache" (only meaningful with a proxy)
    #[arg(short, long)]
    reload: bool,

    /// Proxy server as host:port
    #[arg(short, long, env = "HTTPBENCH_PROXY")]
    proxy: Option<String>,

    /// HTTP request method
    #[arg(long, value_enum, default_value_t = HttpMethod::Get)]
    method: HttpMethod,

    /// Target URL, e.g. http://example.com/
    url: String,
}

fn parse_proxy(raw: &str) -> Result<Proxy, BenchError> {
    match raw.split_once(':') {
        None => Ok(Proxy {
            host: raw.to_string(),
            port: request::DEFAULT_HTTP_PORT,
        }),
        Some(("", _)) => Err(BenchError::BadParameter(format!(
            "proxy {raw}: missing host name"
        ))),
        Some((_, "")) => Err(BenchError::BadParameter(format!(
            "proxy {raw}: missing port number"
        ))),
        Some((host, port)) => {
            let port = port.parse::<u16>().map_err(|_| {
                BenchError::BadParameter(format!("proxy {raw}: invalid port number"))
            })?;
            Ok(Proxy {
                host: host.to_string(),
                port,
            })
        }
    }
}

/// Turns raw CLI input into the immutable run configuration, coercing
/// zero client/duration values to the defaults rather than rejecting them.
fn effective_config(cli: &Cli) -> Result<BenchmarkConfig, BenchError> {
    let proxy = cli.proxy.as_deref().map(parse_proxy).transpose()?;
    let clients = if cli.clients == 0 { 1 } else { cli.clients };
    let seconds = if cli.time == 0 { 30 } else { cli.time };

    Ok(BenchmarkConfig {
        method: cli.method,
        proxy,
        clients,
        duration: Duration::from_secs(seconds),
        force: cli.force,
        reload: cli.reload,
    })
}

fn print_banner(config: &BenchmarkConfig, url: &str) {
    info!("Benchmarking: {} {} using HTTP/1.1", config.method, url);

    let mut line = format!(
        "With {} client(s), running {} second(s)",
        config.clients,
        config.duration_secs()
    );
    if config.force {
        line.push_str(", early socket close");
    }
    if let Some(proxy) = &config.proxy {
        line.push_str(&format!(", via proxy server {proxy}"));
        if config.reload {
            line.push_str(", forcing reload");
        }
    }
    info!("{line}");
}

async fn run(cli: Cli) -> Result<()> {
    let config = effective_config(&cli)?;
    let built = Arc::new(request::build_request(&config, &cli.url)?);

    print_banner(&config, &cli.url);

    worker::probe(&built).await?;

    let results = worker::run_workers(&config, built).await?;
    let report = report::aggregate(&results, config.duration);
    report::print_report(&report);

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!("{err:#}");
        let code = match err.downcast_ref::<BenchError>() {
            Some(bench) => ExitCode::from(bench),
            None => ExitCode::InternalError,
        };
        std::process::exit(code.as_i32());
    }
}
