//! Drives the reqwest transport against the payout API served on a real socket.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};

use pushkind_market::domain::payout::{Payout, PayoutStatus};
use pushkind_market::domain::query::{Query, Sort};
use pushkind_market::fetcher::http::HttpCollectionApi;
use pushkind_market::fetcher::{CollectionFetch, EnvelopeAdapter, RemoteCollectionFetcher};
use pushkind_market::repository::InMemoryLedger;
use pushkind_market::routes::api;
use pushkind_market::services::payouts::STATUS_FILTER;

fn start_server(ledger: InMemoryLedger) -> (SocketAddr, ServerHandle) {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(ledger.clone()))
            .service(web::scope("/api").configure(api::configure))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind to an ephemeral port");
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (addr, handle)
}

fn payouts_fetcher(
    url: String,
) -> RemoteCollectionFetcher<HttpCollectionApi, EnvelopeAdapter, Payout> {
    let api = HttpCollectionApi::new(url, Some(Duration::from_secs(5))).expect("client builds");
    RemoteCollectionFetcher::new(api, EnvelopeAdapter::new("payouts", "total"))
}

#[actix_web::test]
async fn test_http_fetch_returns_filtered_page() {
    let (addr, handle) = start_server(InMemoryLedger::seeded());
    let fetcher = payouts_fetcher(format!("http://{addr}/api/v1/payouts"));

    let query = Query::default()
        .with_filter_toggled(STATUS_FILTER, "paid")
        .with_sort(Some(Sort::desc("amount")));
    let page = fetcher.fetch(&query).await.expect("fetch succeeds");

    assert_eq!(page.total_count, 12);
    assert_eq!(page.items.len(), 12);
    assert!(page.items.iter().all(|p| p.status == PayoutStatus::Paid));
    assert!(page.items.windows(2).all(|w| w[0].amount >= w[1].amount));

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_http_fetch_passes_server_message_through() {
    let (addr, handle) = start_server(InMemoryLedger::seeded());
    let fetcher = payouts_fetcher(format!("http://{addr}/api/v1/payouts"));

    let query = Query::default().with_filter_toggled("colour", "red");
    let err = fetcher.fetch(&query).await.expect_err("unknown filter is rejected");
    assert!(err.message().contains("unknown filter"), "{err}");

    let missing = payouts_fetcher(format!("http://{addr}/api/v1/nowhere"));
    let err = missing
        .fetch(&Query::default())
        .await
        .expect_err("missing route fails");
    assert!(err.message().contains("server responded with 404"), "{err}");

    handle.stop(true).await;
}
