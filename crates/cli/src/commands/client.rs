use hopdns_application::ports::QueryChannel;
use hopdns_domain::{Config, Message, Query, ResolveError, ResponseResult};
use hopdns_infrastructure::transport::TcpQueryChannel;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Thin client for talking to a local resolver: assigns query ids and
/// unwraps the terminal response.
pub struct ResolverClient {
    addr: String,
    channel: TcpQueryChannel,
    next_id: AtomicU64,
}

impl ResolverClient {
    pub fn new(addr: String, timeout: Duration) -> Self {
        Self {
            addr,
            channel: TcpQueryChannel::new(timeout),
            next_id: AtomicU64::new(0),
        }
    }

    pub async fn resolve(&self, domain: &str) -> Result<String, ResolveError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let query = Message::Query(Query::new(id, domain));
        match self.channel.exchange(&self.addr, &query).await? {
            Message::Response(response) => match response.result {
                ResponseResult::Ip(address) => Ok(address),
                ResponseResult::Error(reason) => Err(ResolveError::Delegation(reason)),
                ResponseResult::Ns(_) => Err(ResolveError::MalformedMessage(
                    "resolver returned a delegation instead of an address".into(),
                )),
            },
            Message::Query(_) => Err(ResolveError::MalformedMessage(
                "resolver sent a query instead of a response".into(),
            )),
        }
    }
}

pub async fn run_resolve(
    config: &Config,
    server: Option<String>,
    domain: Option<String>,
) -> anyhow::Result<()> {
    let addr = server.unwrap_or_else(|| {
        format!(
            "{}:{}",
            config.server.bind_address, config.server.local_port
        )
    });
    let client = ResolverClient::new(
        addr,
        Duration::from_secs(config.resolver.query_timeout_secs),
    );

    if let Some(domain) = domain {
        return lookup(&client, &domain).await;
    }

    // Interactive mode: one lookup per line, empty line or EOF quits.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("domain> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let domain = line.trim();
        if domain.is_empty() {
            break;
        }
        lookup(&client, domain).await?;
    }
    Ok(())
}

async fn lookup(client: &ResolverClient, domain: &str) -> anyhow::Result<()> {
    match client.resolve(domain).await {
        Ok(address) => println!("{domain} -> {address}"),
        Err(e) => println!("{domain} -> error: {e}"),
    }
    Ok(())
}
