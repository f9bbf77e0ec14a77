//! Reference lists and paginated history against a stub ISS.

mod common;

use approx::assert_relative_eq;
use common::{RecordedRequest, StubResponse, StubServer, iss_document};
use moexiss_fetch::{FetchError, IssClient};
use moexiss_types::{DataHandler, HistoryQuery, IssDate, ResultSink};

fn query() -> HistoryQuery {
    let date: IssDate = "2024-03-05".parse().unwrap();
    HistoryQuery::new("stock", "shares", "TQBR", date)
}

fn history_row(secid: &str, trades: &str, close: &str) -> String {
    format!(r#"SECID="{secid}" NUMTRADES="{trades}" LEGALCLOSEPRICE="{close}""#)
}

/// Serves `pages` by `start` offset; anything past the last page is empty.
fn paged_history(
    pages: Vec<(usize, Vec<String>)>,
) -> impl Fn(&RecordedRequest) -> StubResponse + Send + Sync + 'static {
    move |request: &RecordedRequest| {
        let start: usize = request
            .query_param("start")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let rows = pages
            .iter()
            .find(|(offset, _)| *offset == start)
            .map(|(_, rows)| rows.iter().map(String::as_str).collect::<Vec<_>>())
            .unwrap_or_default();
        StubResponse::ok(iss_document("history", &rows))
    }
}

#[tokio::test]
async fn test_engines_list() {
    let server = StubServer::start(|_| {
        StubResponse::ok(iss_document(
            "engines",
            &[
                r#"id="1" name="stock" title="Фондовый рынок и рынок депозитов""#,
                r#"id="2" name="state" title="Рынок ГЦБ (размещение)""#,
            ],
        ))
    })
    .await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();

    let count = client.fetch_engines(&mut handler).await.unwrap();

    assert_eq!(count, 2);
    let mut codes: Vec<_> = handler.engines.keys().cloned().collect();
    codes.sort();
    assert_eq!(codes, ["state", "stock"]);
    assert_eq!(handler.engines["stock"], "Фондовый рынок и рынок депозитов");
    assert_eq!(server.requests()[0].path, "/iss/engines.xml");
}

#[tokio::test]
async fn test_markets_and_boards_paths() {
    let server = StubServer::start(|request| {
        if request.path.ends_with("/boards.xml") {
            StubResponse::ok(iss_document(
                "boards",
                &[r#"id="57" boardid="TQBR" title="Т+: Акции и ДР""#],
            ))
        } else {
            StubResponse::ok(iss_document(
                "markets",
                &[r#"id="1" name="shares" title="Рынок акций""#],
            ))
        }
    })
    .await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();

    client.fetch_markets("stock", &mut handler).await.unwrap();
    client.fetch_boards("stock", "shares", &mut handler).await.unwrap();

    assert_eq!(handler.markets["shares"], "Рынок акций");
    assert_eq!(handler.boards["TQBR"], "Т+: Акции и ДР");
    let requests = server.requests();
    assert_eq!(requests[0].path, "/iss/engines/stock/markets.xml");
    assert_eq!(requests[1].path, "/iss/engines/stock/markets/shares/boards.xml");
}

#[tokio::test]
async fn test_missing_block_clears_previous_list() {
    let server = StubServer::start(|_| StubResponse::ok(iss_document("securities", &[]))).await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();
    handler.push_engine("stale".to_string(), "Old".to_string());

    let count = client.fetch_engines(&mut handler).await.unwrap();

    assert_eq!(count, 0);
    assert!(handler.engines.is_empty());
}

#[tokio::test]
async fn test_history_single_page() {
    let server = StubServer::start(paged_history(vec![(
        0,
        vec![
            history_row("SBER", "81236", "270.47"),
            history_row("GAZP", "40218", "163.2"),
        ],
    )]))
    .await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();

    let count = client.fetch_history(&query(), &mut handler).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(handler.history[0].secid, "SBER");
    assert_relative_eq!(handler.history[1].close_price, 163.2);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].query_param("start"), Some("0"));
    assert_eq!(requests[1].query_param("start"), Some("2"));
    assert_eq!(requests[0].query_param("date"), Some("2024-3-5"));
    assert!(
        requests[0]
            .path
            .starts_with("/iss/history/engines/stock/markets/shares/boards/TQBR/securities.xml?")
    );
}

#[tokio::test]
async fn test_history_pages_concatenate() {
    let server = StubServer::start(paged_history(vec![
        (
            0,
            vec![
                history_row("A", "1", "1.0"),
                history_row("B", "2", "2.0"),
                history_row("C", "3", "3.0"),
            ],
        ),
        (3, vec![history_row("D", "4", "4.0"), history_row("E", "5", "5.0")]),
    ]))
    .await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();

    let count = client.fetch_history(&query(), &mut handler).await.unwrap();

    assert_eq!(count, 5);
    let secids: Vec<_> = handler.history.iter().map(|r| r.secid.as_str()).collect();
    assert_eq!(secids, ["A", "B", "C", "D", "E"]);
    let starts: Vec<_> = server
        .requests()
        .iter()
        .map(|r| r.query_param("start").unwrap_or_default().to_string())
        .collect();
    assert_eq!(starts, ["0", "3", "5"]);
}

#[tokio::test]
async fn test_history_replaces_previous_rows() {
    let pages = vec![(0, vec![history_row("SBER", "1", "1.0")])];
    let server = StubServer::start(paged_history(pages)).await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();

    client.fetch_history(&query(), &mut handler).await.unwrap();
    client.fetch_history(&query(), &mut handler).await.unwrap();

    assert_eq!(handler.history.len(), 1);
    assert_eq!(server.request_count(), 4);
}

#[tokio::test]
async fn test_unparsable_close_price_is_zero() {
    let server = StubServer::start(paged_history(vec![(
        0,
        vec![history_row("SBER", "12", ""), history_row("GAZP", "7", "abc")],
    )]))
    .await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();

    let count = client.fetch_history(&query(), &mut handler).await.unwrap();

    assert_eq!(count, 2);
    assert_relative_eq!(handler.history[0].close_price, 0.0);
    assert_relative_eq!(handler.history[1].close_price, 0.0);
    assert_eq!(handler.history[1].num_trades, 7);
}

#[tokio::test]
async fn test_bad_trade_count_stops_retrieval() {
    let server = StubServer::start(paged_history(vec![
        (0, vec![history_row("SBER", "10", "1.5"), history_row("GAZP", "11", "2.5")]),
        (2, vec![history_row("LKOH", "many", "3.5")]),
    ]))
    .await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();

    let err = client.fetch_history(&query(), &mut handler).await.unwrap_err();

    assert!(matches!(err, FetchError::InvalidField { field: "NUMTRADES", .. }));
    assert_eq!(handler.history.len(), 2);
    assert_eq!(server.request_count(), 2);
}

#[tokio::test]
async fn test_server_error_status() {
    let server = StubServer::start(|_| StubResponse::status(500, "Internal Server Error")).await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();

    let err = client.fetch_engines(&mut handler).await.unwrap_err();

    assert!(matches!(err, FetchError::ServerError { status: 500 }));
}

#[tokio::test]
async fn test_malformed_xml() {
    let server = StubServer::start(|_| StubResponse::ok("<document><data id=\"engines\">")).await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();

    let err = client.fetch_engines(&mut handler).await.unwrap_err();

    assert!(matches!(err, FetchError::Xml(_)));
}

#[tokio::test]
async fn test_client_reusable_after_error() {
    let server = StubServer::start(|request| {
        if request.path.contains("/engines/broken/") {
            StubResponse::status(404, "Not Found")
        } else {
            let row = r#"name="stock" title="Фондовый рынок""#;
            StubResponse::ok(iss_document("engines", &[row]))
        }
    })
    .await;
    let client = IssClient::new(server.config()).unwrap();
    let mut handler = DataHandler::new();

    assert!(client.fetch_markets("broken", &mut handler).await.is_err());
    let count = client.fetch_engines(&mut handler).await.unwrap();

    assert_eq!(count, 1);
    assert_eq!(handler.engines["stock"], "Фондовый рынок");
}
