// ============================================================================
// Tests d'intégration : contrôleur + client HTTP contre un serveur mockito
// ============================================================================

use cryptodash::api::{HttpMarketApi, MarketApi, NOT_FOUND_MESSAGE};
use cryptodash::app::{lock_state, DashboardState, Focus};
use cryptodash::controller::{DashboardController, FetchSettings, LoadOutcome, RenderedPanels};
use mockito::{Matcher, Server, ServerGuard};

const DETAIL_JSON: &str = r#"{
    "id": "bitcoin",
    "name": "Bitcoin",
    "symbol": "btc",
    "current_price": 43250.0,
    "price_change_24h": -1.23,
    "market_cap": 850000000000.0,
    "total_volume": 21000000000.0,
    "high_24h": 44000.0,
    "low_24h": 42800.0,
    "last_updated": "2024-01-15T10:30:00"
}"#;

const ANALYSIS_JSON: &str = r#"{
    "coin_id": "bitcoin",
    "sma_20": 42000.0,
    "sma_50": 40000.0,
    "ema_12": 42500.0,
    "ema_26": 41800.0,
    "rsi": 62.5,
    "macd": 120.456,
    "signal": "compra",
    "trend": "alta",
    "support_level": 41000.0,
    "resistance_level": 45000.0
}"#;

const PREDICTION_JSON: &str = r#"{
    "coin_id": "bitcoin",
    "current_price": 43250.0,
    "predicted_price": 45000.0,
    "predicted_change": 4.05,
    "confidence": 0.784,
    "days_ahead": 7,
    "prediction_date": "2024-01-15T10:30:00",
    "model_info": {"type": "Linear Regression", "features": 5}
}"#;

const HISTORY_JSON: &str = r#"{
    "coin_id": "bitcoin",
    "period_days": 30,
    "data_points": 3,
    "prices": [
        {"timestamp": "2024-01-13T00:00:00", "price": 42000.0, "volume": 1.0},
        {"timestamp": "2024-01-14T00:00:00", "price": 42500.0, "volume": 1.0},
        {"timestamp": "2024-01-15T00:00:00", "price": 43250.0, "volume": 1.0}
    ]
}"#;

fn controller(server: &ServerGuard) -> DashboardController<HttpMarketApi> {
    let api = HttpMarketApi::with_base_url(&format!("{}/api", server.url())).unwrap();
    DashboardController::new(api, DashboardState::shared(), FetchSettings::default())
}

fn days(value: &str) -> Matcher {
    Matcher::UrlEncoded("days".into(), value.into())
}

#[tokio::test]
async fn test_trending_response_is_parsed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/trending")
        .match_query(Matcher::UrlEncoded("limit".into(), "6".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"total": 2, "cryptos": [
                {"id": "bitcoin", "symbol": "BTC", "name": "Bitcoin", "rank": 1},
                {"id": "ethereum", "symbol": "ETH", "name": "Ethereum", "rank": 2}
            ]}"#,
        )
        .create_async()
        .await;

    let controller = controller(&server);
    controller.load_trending_cryptos().await;

    mock.assert_async().await;
    let state = lock_state(controller.state());
    let symbols: Vec<&str> = state.trending.iter().map(|c| c.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTC", "ETH"]);
    assert_eq!(state.trending[1].id, "ethereum");
}

#[tokio::test]
async fn test_full_selection_renders_every_panel() {
    let mut server = Server::new_async().await;
    let detail = server
        .mock("GET", "/api/crypto/bitcoin")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DETAIL_JSON)
        .create_async()
        .await;
    let analysis = server
        .mock("GET", "/api/analysis/bitcoin")
        .with_status(200)
        .with_body(ANALYSIS_JSON)
        .create_async()
        .await;
    let prediction = server
        .mock("GET", "/api/predict/bitcoin")
        .match_query(days("7"))
        .with_status(200)
        .with_body(PREDICTION_JSON)
        .create_async()
        .await;
    let history = server
        .mock("GET", "/api/historical/bitcoin")
        .match_query(days("30"))
        .with_status(200)
        .with_body(HISTORY_JSON)
        .create_async()
        .await;

    let controller = controller(&server);
    let outcome = controller.load_crypto_data("bitcoin").await;

    detail.assert_async().await;
    analysis.assert_async().await;
    prediction.assert_async().await;
    history.assert_async().await;

    assert_eq!(
        outcome,
        LoadOutcome::Completed(RenderedPanels {
            analysis: true,
            prediction: true,
            history: true,
        })
    );

    let state = lock_state(controller.state());
    let asset = state.asset_panel.as_ref().unwrap();
    assert_eq!(asset.title, "Bitcoin (BTC)");
    assert_eq!(asset.change, "-1.23%");
    assert_eq!(state.analysis_panel.as_ref().unwrap().signal_label, "COMPRA");
    assert_eq!(state.prediction_panel.as_ref().unwrap().confidence_label, "78.4%");
    assert_eq!(state.charts.live_count(), 1);
    assert!(!state.is_loading());
    assert_eq!(state.focus, Focus::Results);
}

#[tokio::test]
async fn test_unknown_asset_alerts_and_stops() {
    let mut server = Server::new_async().await;
    let detail = server
        .mock("GET", "/api/crypto/xyz")
        .with_status(404)
        .with_body(r#"{"detail": "Crypto not found"}"#)
        .create_async()
        .await;
    let mut untouched = Vec::new();
    for endpoint in ["analysis", "predict", "historical"] {
        let mock = server
            .mock("GET", format!("/api/{}/xyz", endpoint).as_str())
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        untouched.push(mock);
    }

    let controller = controller(&server);
    let outcome = controller.load_crypto_data("xyz").await;

    detail.assert_async().await;
    for mock in &untouched {
        mock.assert_async().await;
    }

    let expected = format!("Erreur : {}", NOT_FOUND_MESSAGE);
    assert_eq!(outcome, LoadOutcome::Failed(expected.clone()));
    let state = lock_state(controller.state());
    assert_eq!(state.alert.as_deref(), Some(expected.as_str()));
    assert!(!state.is_loading());
    assert!(state.asset_panel.is_none());
}

#[tokio::test]
async fn test_analysis_failure_keeps_other_panels() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/crypto/bitcoin")
        .with_status(200)
        .with_body(DETAIL_JSON)
        .create_async()
        .await;
    server
        .mock("GET", "/api/analysis/bitcoin")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;
    server
        .mock("GET", "/api/predict/bitcoin")
        .match_query(days("7"))
        .with_status(200)
        .with_body(PREDICTION_JSON)
        .create_async()
        .await;
    server
        .mock("GET", "/api/historical/bitcoin")
        .match_query(days("30"))
        .with_status(200)
        .with_body(HISTORY_JSON)
        .create_async()
        .await;

    let controller = controller(&server);
    let outcome = controller.load_crypto_data("bitcoin").await;

    assert_eq!(
        outcome,
        LoadOutcome::Completed(RenderedPanels {
            analysis: false,
            prediction: true,
            history: true,
        })
    );

    let state = lock_state(controller.state());
    assert!(state.analysis_panel.is_none());
    assert!(state.prediction_panel.is_some());
    assert!(state.chart.is_some());
    assert!(state.alert.is_none());
}

#[tokio::test]
async fn test_search_is_normalized_before_request() {
    let mut server = Server::new_async().await;
    let detail = server
        .mock("GET", "/api/crypto/bitcoin")
        .with_status(404)
        .create_async()
        .await;

    let controller = controller(&server);
    controller.search_crypto("  BitCoin ").await;

    detail.assert_async().await;
}

#[tokio::test]
async fn test_server_error_status_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/predict/bitcoin")
        .match_query(days("7"))
        .with_status(503)
        .create_async()
        .await;

    let api = HttpMarketApi::with_base_url(&format!("{}/api", server.url())).unwrap();
    let err = api.prediction("bitcoin", 7).await.unwrap_err();
    assert!(err.to_string().contains("503"));
}
