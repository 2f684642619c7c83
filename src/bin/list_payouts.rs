//! Fetches one page of payouts from the payout API and prints it as a table.
//!
//! Usage: `list_payouts [search=<text>] [status=<status>]... [seller=<id>]
//! [sort=<key>[:asc|desc]] [page=<n>]`

use std::env;

use config::Config;
use dotenvy::dotenv;

use pushkind_market::controller::table::{Column, Selection, Table, TableView};
use pushkind_market::controller::{ListController, ListEvent};
use pushkind_market::domain::payout::Payout;
use pushkind_market::domain::query::{FilterValue, Filters, InitialQuery, Sort};
use pushkind_market::domain::types::SortDirection;
use pushkind_market::fetcher::http::HttpCollectionApi;
use pushkind_market::fetcher::{EnvelopeAdapter, RemoteCollectionFetcher};
use pushkind_market::models::config::ClientConfig;
use pushkind_market::services::payouts::{SELLER_FILTER, STATUS_FILTER};

fn parse_args(args: impl Iterator<Item = String>) -> Result<InitialQuery, String> {
    let mut initial = InitialQuery::default();
    let mut filters = Filters::new();

    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got `{arg}`"))?;
        match key {
            "search" => initial.search = Some(value.to_string()),
            "page" => {
                let page = value
                    .parse::<u32>()
                    .map_err(|_| format!("invalid page `{value}`"))?;
                initial.page = Some(page);
            }
            "status" => {
                let entry = filters
                    .entry(STATUS_FILTER.to_string())
                    .or_insert_with(|| FilterValue::Many(Default::default()));
                if let FilterValue::Many(values) = entry {
                    values.insert(value.to_string());
                }
            }
            "seller" => {
                filters.insert(SELLER_FILTER.to_string(), FilterValue::from(value));
            }
            "sort" => {
                let (sort_key, direction) = match value.split_once(':') {
                    Some((sort_key, direction)) => (
                        sort_key,
                        direction
                            .parse::<SortDirection>()
                            .map_err(|err| err.to_string())?,
                    ),
                    None => (value, SortDirection::Asc),
                };
                initial.sort = Some(Sort::new(sort_key, direction));
            }
            other => return Err(format!("unknown argument `{other}`")),
        }
    }

    if !filters.is_empty() {
        initial.filters = Some(filters);
    }
    Ok(initial)
}

fn payouts_table() -> Table<Payout> {
    Table::new(|p: &Payout| p.id.to_string())
        .column(Column::new("id", "#", |p: &Payout| p.id.to_string()).sortable())
        .column(Column::new("reference", "Reference", |p: &Payout| {
            p.reference.clone()
        }))
        .column(Column::new("seller_id", "Seller", |p: &Payout| {
            p.seller_id.to_string()
        }))
        .column(
            Column::new("amount", "Amount", |p: &Payout| {
                format!("{}.{:02} {}", p.amount / 100, p.amount % 100, p.currency)
            })
            .sortable(),
        )
        .column(
            Column::new("status", "Status", |p: &Payout| {
                p.status.as_str().to_string()
            })
            .sortable(),
        )
        .column(Column::new("method", "Method", |p: &Payout| {
            p.method.as_str().to_string()
        }))
        .column(
            Column::new("requested_at", "Requested", |p: &Payout| {
                p.requested_at.format("%Y-%m-%d %H:%M").to_string()
            })
            .sortable(),
        )
}

fn print_view(view: &TableView) {
    if let Some(error) = &view.error {
        println!("error: {error}");
    }

    let headers: Vec<String> = view
        .headers
        .iter()
        .map(|h| match h.sorted {
            Some(SortDirection::Asc) => format!("{} ^", h.header),
            Some(SortDirection::Desc) => format!("{} v", h.header),
            None => h.header.clone(),
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in &view.rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", line(headers.as_slice()));
    for row in &view.rows {
        println!("{}", line(row.cells.as_slice()));
    }

    let pages: Vec<String> = view
        .pages
        .iter()
        .map(|page| match page {
            Some(p) if *p == view.page as usize => format!("[{p}]"),
            Some(p) => p.to_string(),
            None => "...".to_string(),
        })
        .collect();
    println!("{} payouts, pages: {}", view.total_count, pages.join(" "));
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            std::process::exit(1);
        }
    };

    let client_config = match settings.try_deserialize::<ClientConfig>() {
        Ok(client_config) => client_config,
        Err(err) => {
            log::error!("Error loading client config: {}", err);
            std::process::exit(1);
        }
    };

    let mut initial = match parse_args(env::args().skip(1)) {
        Ok(initial) => initial,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(2);
        }
    };
    initial.page_size = Some(client_config.page_size);

    let api = match HttpCollectionApi::new(
        client_config.api_base_url.clone(),
        client_config.request_timeout(),
    ) {
        Ok(api) => api,
        Err(err) => {
            log::error!("Error building HTTP client: {}", err);
            std::process::exit(1);
        }
    };

    let fetcher = RemoteCollectionFetcher::<_, _, Payout>::new(
        api,
        EnvelopeAdapter::new("payouts", "total"),
    );
    let (controller, mut events) =
        ListController::new(fetcher, initial, client_config.controller_options());

    let pending = controller.load();
    let request = pending.request();
    pending.finished().await;

    while let Ok(event) = events.try_recv() {
        match event {
            ListEvent::Settled {
                request: settled,
                total_count,
            } if settled == request => {
                log::info!("Loaded {total_count} payouts");
            }
            ListEvent::Failed { request: failed, error } if failed == request => {
                log::error!("Failed to load payouts: {error}");
            }
            other => log::debug!("Ignoring list event {other:?}"),
        }
    }

    let table = payouts_table();
    let view = table.view(&controller.snapshot(), &Selection::default());
    print_view(&view);

    if view.error.is_some() {
        std::process::exit(1);
    }
}
