use clap::{Parser, Subcommand};
use hopdns_domain::CliOverrides;

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "hopdns", version)]
#[command(about = "Hierarchical DNS resolution simulator: root, TLD, authoritative and caching resolver over a simplified text protocol")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Bind address for server roles
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the root name server
    Root {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run a TLD name server for one zone
    Tld {
        /// TLD this server owns (e.g. com, edu)
        #[arg(long)]
        tld: String,
        #[arg(long)]
        port: u16,
        /// Authoritative server to delegate to
        #[arg(long, default_value = "127.0.0.1")]
        auth_host: String,
        #[arg(long)]
        auth_port: Option<u16>,
    },
    /// Run the authoritative name server
    Auth {
        #[arg(long)]
        port: Option<u16>,
        /// Records file (domain,ip per line)
        #[arg(long)]
        records: Option<String>,
    },
    /// Run the caching local resolver
    Local {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Resolve a domain via the local resolver; interactive when omitted
    Resolve {
        domain: Option<String>,
        /// Local resolver address (host:port)
        #[arg(long)]
        server: Option<String>,
    },
    /// Drive load against the local resolver and report latency statistics
    Bench {
        #[arg(long, default_value_t = 500)]
        queries: usize,
        #[arg(long, default_value_t = 1)]
        concurrency: usize,
        #[arg(long)]
        server: Option<String>,
        /// Records file to draw query domains from
        #[arg(long)]
        records: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
    };
    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config);

    match cli.command {
        Command::Root { port } => commands::run_root(&config, port).await,
        Command::Tld {
            tld,
            port,
            auth_host,
            auth_port,
        } => commands::run_tld(&config, &tld, port, &auth_host, auth_port).await,
        Command::Auth { port, records } => commands::run_auth(&config, port, records).await,
        Command::Local { port } => commands::run_local(&config, port).await,
        Command::Resolve { domain, server } => {
            commands::run_resolve(&config, server, domain).await
        }
        Command::Bench {
            queries,
            concurrency,
            server,
            records,
        } => commands::run_bench(&config, server, queries, concurrency, records).await,
    }
}
