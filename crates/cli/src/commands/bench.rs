use super::client::ResolverClient;
use hopdns_domain::Config;
use hopdns_infrastructure::zones::load_records;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Fires `queries` lookups at the local resolver, domains drawn at random
/// from the records file, and reports latency and throughput.
pub async fn run_bench(
    config: &Config,
    server: Option<String>,
    queries: usize,
    concurrency: usize,
    records: Option<String>,
) -> anyhow::Result<()> {
    let records_path = records.unwrap_or_else(|| config.zones.records_file.clone());
    let domains: Arc<Vec<String>> = Arc::new(
        load_records(Path::new(&records_path))
            .into_keys()
            .collect(),
    );
    anyhow::ensure!(
        !domains.is_empty(),
        "no domains to query in {records_path}"
    );

    let addr = server.unwrap_or_else(|| {
        format!(
            "{}:{}",
            config.server.bind_address, config.server.local_port
        )
    });
    let timeout = Duration::from_secs(config.resolver.query_timeout_secs);
    let concurrency = concurrency.clamp(1, queries.max(1));
    info!(
        queries,
        concurrency,
        server = %addr,
        domains = domains.len(),
        "benchmark starting"
    );

    let started = Instant::now();
    let mut workers = Vec::with_capacity(concurrency);
    for worker in 0..concurrency {
        // Spread the remainder across the first workers.
        let count = queries / concurrency + usize::from(worker < queries % concurrency);
        let domains = Arc::clone(&domains);
        let addr = addr.clone();
        workers.push(tokio::spawn(async move {
            let client = ResolverClient::new(addr, timeout);
            let mut latencies = Vec::with_capacity(count);
            let mut failed = 0usize;
            for _ in 0..count {
                let domain = &domains[fastrand::usize(..domains.len())];
                let sent = Instant::now();
                match client.resolve(domain).await {
                    Ok(_) => latencies.push(sent.elapsed()),
                    Err(_) => failed += 1,
                }
            }
            (latencies, failed)
        }));
    }

    let mut latencies = Vec::with_capacity(queries);
    let mut failed = 0usize;
    for worker in workers {
        let (worker_latencies, worker_failed) = worker.await?;
        latencies.extend(worker_latencies);
        failed += worker_failed;
    }
    let elapsed = started.elapsed();

    let succeeded = latencies.len();
    println!("queries:    {queries} ({succeeded} ok, {failed} failed)");
    println!("elapsed:    {:.2}s", elapsed.as_secs_f64());
    println!(
        "throughput: {:.1} queries/s",
        queries as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    if !latencies.is_empty() {
        let min = latencies.iter().min().copied().unwrap_or_default();
        let max = latencies.iter().max().copied().unwrap_or_default();
        let avg = latencies.iter().sum::<Duration>() / succeeded as u32;
        println!(
            "latency:    min {:.2}ms / avg {:.2}ms / max {:.2}ms",
            min.as_secs_f64() * 1000.0,
            avg.as_secs_f64() * 1000.0,
            max.as_secs_f64() * 1000.0
        );
    }
    Ok(())
}
