use hopdns_application::use_cases::ResolveDomainUseCase;
use hopdns_domain::Config;
use hopdns_infrastructure::cache::ResolutionCache;
use hopdns_infrastructure::server;
use hopdns_infrastructure::transport::TcpQueryChannel;
use hopdns_infrastructure::zones::{load_records, AuthoritativeZone, RootZone, TldZone};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

fn listen_addr(config: &Config, port: u16) -> String {
    format!("{}:{}", config.server.bind_address, port)
}

pub async fn run_root(config: &Config, port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.server.root_port);
    let zone = Arc::new(RootZone::new(&config.zones.tlds)?);
    let listener = server::bind(&listen_addr(config, port)).await?;
    info!(
        port,
        tlds = ?config.zones.tlds.keys().collect::<Vec<_>>(),
        "root server started"
    );
    server::serve(listener, zone).await?;
    Ok(())
}

pub async fn run_tld(
    config: &Config,
    tld: &str,
    port: u16,
    auth_host: &str,
    auth_port: Option<u16>,
) -> anyhow::Result<()> {
    let auth_port = auth_port.unwrap_or(config.server.auth_port);
    let zone = Arc::new(TldZone::new(tld, auth_host, auth_port));
    let listener = server::bind(&listen_addr(config, port)).await?;
    info!(
        port,
        tld = zone.tld(),
        auth_server = format!("{auth_host}:{auth_port}"),
        "TLD server started"
    );
    server::serve(listener, zone).await?;
    Ok(())
}

pub async fn run_auth(
    config: &Config,
    port: Option<u16>,
    records: Option<String>,
) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.server.auth_port);
    let records_path = records.unwrap_or_else(|| config.zones.records_file.clone());
    let zone = Arc::new(AuthoritativeZone::new(load_records(Path::new(
        &records_path,
    ))));
    let listener = server::bind(&listen_addr(config, port)).await?;
    info!(port, records = zone.record_count(), "authoritative server started");
    server::serve(listener, zone).await?;
    Ok(())
}

pub async fn run_local(config: &Config, port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.server.local_port);
    let cache = Arc::new(ResolutionCache::new(
        config.cache.capacity,
        Duration::from_secs(config.cache.ttl_secs),
    ));
    let channel = Arc::new(TcpQueryChannel::new(Duration::from_secs(
        config.resolver.query_timeout_secs,
    )));
    let resolver = Arc::new(ResolveDomainUseCase::new(
        channel,
        cache,
        config.resolver.root.clone(),
    ));
    let listener = server::bind(&listen_addr(config, port)).await?;
    info!(
        port,
        root = %config.resolver.root,
        cache_capacity = config.cache.capacity,
        cache_ttl_secs = config.cache.ttl_secs,
        "local resolver started"
    );

    tokio::select! {
        result = server::serve(listener, resolver.clone()) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            let stats = resolver.stats();
            info!(
                total_queries = stats.total_queries,
                cache_hits = stats.cache_hits,
                cache_misses = stats.cache_misses,
                hit_rate = format_args!("{:.2}%", stats.hit_rate * 100.0).to_string(),
                avg_resolution_ms = format_args!("{:.2}", stats.avg_resolution_ms).to_string(),
                "local resolver shutting down"
            );
        }
    }
    Ok(())
}
