//! Runs the full resolution chain in-process: root, TLD and authoritative
//! servers plus a caching local resolver, all on ephemeral ports, queried
//! over real TCP.

use hopdns_application::ports::{QueryChannel, QueryHandler};
use hopdns_application::use_cases::ResolveDomainUseCase;
use hopdns_domain::message::split_host_port;
use hopdns_domain::{Message, Query, ResponseResult};
use hopdns_infrastructure::cache::ResolutionCache;
use hopdns_infrastructure::server;
use hopdns_infrastructure::transport::TcpQueryChannel;
use hopdns_infrastructure::zones::{AuthoritativeZone, RootZone, TldZone};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const TIMEOUT: Duration = Duration::from_secs(2);

async fn start(handler: Arc<dyn QueryHandler>) -> (String, JoinHandle<()>) {
    let listener = server::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let task = tokio::spawn(async move {
        let _ = server::serve(listener, handler).await;
    });
    (addr, task)
}

struct Chain {
    resolver_addr: String,
    resolver: Arc<ResolveDomainUseCase>,
    upstream: Vec<JoinHandle<()>>,
    local: JoinHandle<()>,
}

impl Chain {
    async fn start() -> Self {
        let mut records = HashMap::new();
        records.insert("example.com".to_string(), "93.184.216.34".to_string());
        records.insert("docs.example.com".to_string(), "93.184.216.35".to_string());
        records.insert("example.org".to_string(), "23.215.0.136".to_string());
        records.insert("cs.university.edu".to_string(), "10.0.4.2".to_string());
        let (auth_addr, auth_task) = start(Arc::new(AuthoritativeZone::new(records))).await;
        let (auth_host, auth_port) = split_host_port(&auth_addr).unwrap();

        let mut upstream = vec![auth_task];
        let mut tlds = BTreeMap::new();
        for tld in ["com", "org", "edu"] {
            let (tld_addr, tld_task) =
                start(Arc::new(TldZone::new(tld, auth_host, auth_port))).await;
            tlds.insert(tld.to_string(), tld_addr);
            upstream.push(tld_task);
        }
        let (root_addr, root_task) = start(Arc::new(RootZone::new(&tlds).unwrap())).await;
        upstream.push(root_task);

        let resolver = Arc::new(ResolveDomainUseCase::new(
            Arc::new(TcpQueryChannel::new(TIMEOUT)),
            Arc::new(ResolutionCache::new(100, Duration::from_secs(60))),
            root_addr,
        ));
        let (resolver_addr, local) = start(resolver.clone()).await;

        Self {
            resolver_addr,
            resolver,
            upstream,
            local,
        }
    }

    /// Sends one query to the local resolver over TCP and returns the result.
    async fn query(&self, id: u64, domain: &str) -> ResponseResult {
        let channel = TcpQueryChannel::new(TIMEOUT);
        let reply = channel
            .exchange(&self.resolver_addr, &Message::Query(Query::new(id, domain)))
            .await
            .unwrap();
        match reply {
            Message::Response(response) => {
                assert_eq!(response.id, id);
                assert_eq!(response.domain, domain);
                response.result
            }
            Message::Query(_) => panic!("resolver sent a query"),
        }
    }

    fn stop_upstream(&mut self) {
        for task in self.upstream.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        self.stop_upstream();
        self.local.abort();
    }
}

#[tokio::test]
async fn resolves_through_all_three_hops() {
    let chain = Chain::start().await;
    assert_eq!(
        chain.query(1, "example.com").await,
        ResponseResult::Ip("93.184.216.34".to_string())
    );
    assert_eq!(
        chain.query(2, "cs.university.edu").await,
        ResponseResult::Ip("10.0.4.2".to_string())
    );
}

#[tokio::test]
async fn second_lookup_is_served_from_cache() {
    let chain = Chain::start().await;
    chain.query(1, "example.org").await;
    chain.query(2, "example.org").await;

    let stats = chain.resolver.stats();
    assert_eq!(stats.total_queries, 2);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 1);
}

#[tokio::test]
async fn cached_answer_survives_upstream_outage() {
    let mut chain = Chain::start().await;
    chain.query(1, "docs.example.com").await;
    chain.stop_upstream();

    assert_eq!(
        chain.query(2, "docs.example.com").await,
        ResponseResult::Ip("93.184.216.35".to_string())
    );
    // An uncached domain now fails at the first hop.
    assert_eq!(
        chain.query(3, "example.com").await,
        ResponseResult::Error("root server error".to_string())
    );
}

#[tokio::test]
async fn cache_lookups_are_case_insensitive() {
    let chain = Chain::start().await;
    assert_eq!(
        chain.query(1, "Example.COM").await,
        ResponseResult::Ip("93.184.216.34".to_string())
    );
    chain.query(2, "example.com").await;

    let stats = chain.resolver.stats();
    assert_eq!(stats.cache_hits, 1);
}

#[tokio::test]
async fn unknown_tld_reports_root_refusal() {
    let chain = Chain::start().await;
    assert_eq!(
        chain.query(1, "example.net").await,
        ResponseResult::Error("no TLD server for .net".to_string())
    );
}

#[tokio::test]
async fn missing_record_reports_not_found() {
    let chain = Chain::start().await;
    assert_eq!(
        chain.query(1, "nosuchname.com").await,
        ResponseResult::Error("domain not found".to_string())
    );
}

#[tokio::test]
async fn single_label_name_is_rejected() {
    let chain = Chain::start().await;
    assert_eq!(
        chain.query(1, "localhost").await,
        ResponseResult::Error("unqualified domain name".to_string())
    );
}
