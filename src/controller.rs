// ============================================================================
// DashboardController
// ============================================================================
// Orchestration des appels API et des mises à jour de DashboardState
//
// Séquence d'une sélection (load_crypto_data) :
// 1. begin_request : ticket + indicateur de chargement
// 2. /crypto/{id}  : obligatoire, échec → alerte et abandon
// 3. rendu du panneau principal
// 4. /analysis, /predict, /historical : optionnels, l'un après l'autre
// 5. scroll vers la zone résultats
//
// CONCEPTS RUST :
// 1. RAII (Drop) : le chargement est masqué sur tous les chemins de sortie
// 2. Lock court : jamais de MutexGuard tenu pendant un .await
// 3. Générique sur MarketApi : testable sans réseau
// ============================================================================

use tracing::{debug, error, info, instrument, warn};

use crate::api::MarketApi;
use crate::app::{lock_state, DashboardState, RequestTicket, SharedState};
use crate::config::Config;
use crate::view::{
    render_crypto_info, render_prediction, render_technical_analysis, render_trending_cards,
};

/// Message de validation d'une recherche vide
pub const EMPTY_SEARCH_MESSAGE: &str = "Veuillez saisir le nom ou le symbole d'une cryptomonnaie";

/// Panneaux optionnels effectivement affichés
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderedPanels {
    pub analysis: bool,
    pub prediction: bool,
    pub history: bool,
}

/// Résultat d'une sélection d'actif
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Recherche vide, aucun appel réseau
    Rejected,

    /// Échec de /crypto/{id}, message affiché à l'utilisateur
    Failed(String),

    /// Une sélection plus récente a pris la main
    Superseded,

    /// Panneau principal affiché, avec les panneaux optionnels obtenus
    Completed(RenderedPanels),
}

/// Paramètres des requêtes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub trending_limit: u32,
    pub prediction_days: u32,
    pub history_days: u32,
}

impl From<&Config> for FetchSettings {
    fn from(config: &Config) -> Self {
        Self {
            trending_limit: config.trending_limit,
            prediction_days: config.prediction_days,
            history_days: config.history_days,
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

// ============================================================================
// LoadingGuard
// ============================================================================
// CONCEPT RUST : Drop comme "finally"
// - Créé juste après begin_request
// - Quand il sort du scope (return, ?, fin normale), drop() s'exécute
// - finish_request ne masque que si le ticket est encore le dernier
// ============================================================================

struct LoadingGuard {
    state: SharedState,
    ticket: RequestTicket,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        lock_state(&self.state).finish_request(&self.ticket);
    }
}

/// Contrôleur du dashboard
pub struct DashboardController<A> {
    api: A,
    state: SharedState,
    settings: FetchSettings,
}

impl<A: MarketApi> DashboardController<A> {
    pub fn new(api: A, state: SharedState, settings: FetchSettings) -> Self {
        Self { api, state, settings }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Exécute une closure avec l'état verrouillé
    ///
    /// Le guard est relâché avant de retourner : impossible de le garder
    /// par erreur au-delà d'un .await.
    fn with_state<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        let mut state = lock_state(&self.state);
        f(&mut state)
    }

    fn is_current(&self, ticket: &RequestTicket) -> bool {
        let current = self.with_state(|s| s.is_current(ticket));
        if !current {
            debug!(seq = ticket.seq, coin = %ticket.coin_id, "Request superseded, remaining fetches skipped");
        }
        current
    }

    /// Charge les cartes trending
    ///
    /// Échec silencieux : log et liste inchangée, pas de retry.
    #[instrument(skip(self))]
    pub async fn load_trending_cryptos(&self) {
        match self.api.trending(self.settings.trending_limit).await {
            Ok(summaries) => {
                let cards = render_trending_cards(&summaries);
                info!(count = cards.len(), "Trending cards replaced");
                self.with_state(|s| s.replace_trending(cards));
            }
            Err(e) => {
                warn!(error = ?e, "Failed to load trending cryptos");
            }
        }
    }

    /// Recherche depuis le texte saisi
    ///
    /// Normalise (trim + minuscules) ; une saisie vide déclenche l'alerte de
    /// validation sans aucun appel réseau.
    pub async fn search_crypto(&self, input: &str) -> LoadOutcome {
        let coin_id = input.trim().to_lowercase();

        if coin_id.is_empty() {
            debug!("Empty search rejected");
            self.with_state(|s| s.show_alert(EMPTY_SEARCH_MESSAGE.to_string()));
            return LoadOutcome::Rejected;
        }

        self.load_crypto_data(&coin_id).await
    }

    /// Charge et affiche toutes les données d'un actif
    #[instrument(skip(self))]
    pub async fn load_crypto_data(&self, coin_id: &str) -> LoadOutcome {
        let ticket = self.with_state(|s| s.begin_request(coin_id));
        let _loading = LoadingGuard {
            state: self.state.clone(),
            ticket: ticket.clone(),
        };

        // 1. Données de base (obligatoires)
        let detail = match self.api.asset_detail(coin_id).await {
            Ok(detail) => detail,
            Err(e) => {
                let message = format!("Erreur : {}", e);
                error!(error = ?e, "Failed to load asset detail");

                // Une requête périmée ne dérange pas l'utilisateur
                let current = self.with_state(|s| {
                    let current = s.is_current(&ticket);
                    if current {
                        s.show_alert(message.clone());
                    }
                    current
                });
                return if current {
                    LoadOutcome::Failed(message)
                } else {
                    LoadOutcome::Superseded
                };
            }
        };

        let panel = render_crypto_info(&detail);
        if !self.with_state(|s| s.commit_asset(&ticket, panel)) {
            return LoadOutcome::Superseded;
        }

        // 2. Panneaux optionnels : chacun indépendant des autres.
        // Une requête dépassée s'arrête avant le prochain appel réseau.
        let mut rendered = RenderedPanels::default();

        if !self.is_current(&ticket) {
            return LoadOutcome::Superseded;
        }
        match self.api.technical_analysis(coin_id).await {
            Ok(analysis) => {
                let panel = render_technical_analysis(&analysis);
                rendered.analysis = self.with_state(|s| s.commit_analysis(&ticket, panel));
            }
            Err(e) => warn!(error = ?e, "Technical analysis unavailable, panel skipped"),
        }

        if !self.is_current(&ticket) {
            return LoadOutcome::Superseded;
        }
        match self.api.prediction(coin_id, self.settings.prediction_days).await {
            Ok(prediction) => {
                let panel = render_prediction(&prediction);
                rendered.prediction = self.with_state(|s| s.commit_prediction(&ticket, panel));
            }
            Err(e) => warn!(error = ?e, "Prediction unavailable, panel skipped"),
        }

        if !self.is_current(&ticket) {
            return LoadOutcome::Superseded;
        }
        match self.api.historical(coin_id, self.settings.history_days).await {
            Ok(series) => {
                rendered.history = self.with_state(|s| s.commit_history(&ticket, &series));
            }
            Err(e) => warn!(error = ?e, "Historical data unavailable, chart skipped"),
        }

        // 3. Scroll vers les résultats
        let current = self.with_state(|s| {
            let current = s.is_current(&ticket);
            if current {
                s.scroll_to_results();
            }
            current
        });

        if !current {
            return LoadOutcome::Superseded;
        }

        info!(?rendered, "Crypto data rendered");
        LoadOutcome::Completed(rendered)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use crate::api::NOT_FOUND_MESSAGE;
    use crate::app::Focus;
    use crate::models::{
        AssetDetail, AssetSummary, HistoricalSeries, ModelInfo, Prediction, PricePoint, Signal,
        TechnicalAnalysis,
    };

    /// Endpoints qui doivent échouer
    #[derive(Default, Clone, Copy)]
    struct Failures {
        trending: bool,
        detail: bool,
        analysis: bool,
        prediction: bool,
        historical: bool,
    }

    /// API en mémoire qui enregistre les appels
    #[derive(Default)]
    struct FakeApi {
        failures: Failures,
        calls: Mutex<Vec<String>>,
        /// État observé pendant l'appel /analysis (chargement visible ?)
        loading_seen: Mutex<Option<SharedState>>,
        /// (endpoint, état, actif) : une sélection plus récente arrive
        /// pendant cet appel et affiche déjà son panneau principal
        newer_selection: Mutex<Option<(&'static str, SharedState, &'static str)>>,
    }

    impl FakeApi {
        fn failing(failures: Failures) -> Self {
            Self { failures, ..Default::default() }
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn select_newer_during(&self, endpoint: &'static str, state: SharedState, coin_id: &'static str) {
            *self.newer_selection.lock().unwrap() = Some((endpoint, state, coin_id));
        }

        fn maybe_select_newer(&self, endpoint: &str) {
            let newer = self.newer_selection.lock().unwrap().take();
            match newer {
                Some((during, state, coin_id)) if during == endpoint => {
                    let mut state = lock_state(&state);
                    let ticket = state.begin_request(coin_id);
                    state.commit_asset(&ticket, render_crypto_info(&detail(coin_id)));
                }
                other => *self.newer_selection.lock().unwrap() = other,
            }
        }
    }

    fn detail(coin_id: &str) -> AssetDetail {
        AssetDetail {
            id: coin_id.to_string(),
            name: "Bitcoin".to_string(),
            symbol: "btc".to_string(),
            current_price: 43_250.0,
            price_change_24h: -1.23,
            market_cap: 850e9,
            total_volume: 21e9,
            high_24h: 44_000.0,
            low_24h: 42_800.0,
            last_updated: None,
        }
    }

    #[async_trait]
    impl MarketApi for FakeApi {
        async fn trending(&self, limit: u32) -> Result<Vec<AssetSummary>> {
            self.record(format!("trending limit={}", limit));
            if self.failures.trending {
                bail!("HTTP 500");
            }
            Ok(vec![
                AssetSummary { id: "bitcoin".into(), symbol: "BTC".into(), name: "Bitcoin".into() },
                AssetSummary { id: "ethereum".into(), symbol: "ETH".into(), name: "Ethereum".into() },
            ])
        }

        async fn asset_detail(&self, coin_id: &str) -> Result<AssetDetail> {
            self.record(format!("crypto {}", coin_id));
            self.maybe_select_newer("crypto");
            if self.failures.detail {
                bail!(NOT_FOUND_MESSAGE);
            }
            Ok(detail(coin_id))
        }

        async fn technical_analysis(&self, coin_id: &str) -> Result<TechnicalAnalysis> {
            self.record(format!("analysis {}", coin_id));
            self.maybe_select_newer("analysis");
            if let Some(state) = self.loading_seen.lock().unwrap().as_ref() {
                assert!(lock_state(state).is_loading());
            }
            if self.failures.analysis {
                bail!("HTTP 500");
            }
            Ok(TechnicalAnalysis {
                coin_id: None,
                sma_20: 42_000.0,
                sma_50: 40_000.0,
                ema_12: None,
                ema_26: None,
                rsi: 55.0,
                macd: 10.0,
                signal: Signal::from("hold".to_string()),
                trend: "lateral".to_string(),
                support_level: 39_000.0,
                resistance_level: 45_000.0,
            })
        }

        async fn prediction(&self, coin_id: &str, days: u32) -> Result<Prediction> {
            self.record(format!("predict {} days={}", coin_id, days));
            if self.failures.prediction {
                bail!("HTTP 400");
            }
            Ok(Prediction {
                coin_id: None,
                current_price: 43_250.0,
                predicted_price: 44_000.0,
                predicted_change: 1.73,
                confidence: 0.8,
                days_ahead: days,
                prediction_date: None,
                model_info: ModelInfo { kind: "RandomForestRegressor".to_string() },
            })
        }

        async fn historical(&self, coin_id: &str, days: u32) -> Result<HistoricalSeries> {
            self.record(format!("historical {} days={}", coin_id, days));
            if self.failures.historical {
                bail!("HTTP 500");
            }
            Ok(HistoricalSeries {
                coin_id: Some(coin_id.to_string()),
                period_days: Some(days),
                data_points: Some(2),
                prices: (1..=2)
                    .map(|day| PricePoint {
                        timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                            .unwrap()
                            .and_hms_opt(0, 0, 0)
                            .unwrap(),
                        price: 42_000.0 + f64::from(day),
                        volume: 0.0,
                    })
                    .collect(),
            })
        }
    }

    fn controller(api: FakeApi) -> DashboardController<FakeApi> {
        DashboardController::new(api, DashboardState::shared(), FetchSettings::default())
    }

    #[tokio::test]
    async fn test_load_trending() {
        let controller = controller(FakeApi::default());
        controller.load_trending_cryptos().await;

        assert_eq!(controller.api().calls(), vec!["trending limit=6"]);
        let state = lock_state(controller.state());
        assert_eq!(state.trending.len(), 2);
        assert_eq!(state.trending[0].symbol, "BTC");
    }

    #[tokio::test]
    async fn test_trending_failure_leaves_cards_untouched() {
        let controller = controller(FakeApi::failing(Failures { trending: true, ..Default::default() }));
        lock_state(controller.state()).replace_trending(vec![crate::view::TrendingCard {
            id: "solana".into(),
            symbol: "SOL".into(),
            name: "Solana".into(),
        }]);

        controller.load_trending_cryptos().await;

        let state = lock_state(controller.state());
        assert_eq!(state.trending.len(), 1);
        assert_eq!(state.trending[0].id, "solana");
        assert!(state.alert.is_none());
    }

    #[tokio::test]
    async fn test_full_load_sequence() {
        let controller = controller(FakeApi::default());
        *controller.api().loading_seen.lock().unwrap() = Some(controller.state().clone());

        let outcome = controller.load_crypto_data("bitcoin").await;

        assert_eq!(
            outcome,
            LoadOutcome::Completed(RenderedPanels { analysis: true, prediction: true, history: true })
        );
        assert_eq!(
            controller.api().calls(),
            vec![
                "crypto bitcoin",
                "analysis bitcoin",
                "predict bitcoin days=7",
                "historical bitcoin days=30",
            ]
        );

        let state = lock_state(controller.state());
        assert!(!state.is_loading());
        assert_eq!(state.current_coin_id.as_deref(), Some("bitcoin"));
        assert_eq!(state.focus, Focus::Results);
        assert!(state.analysis_panel.is_some());
        assert!(state.prediction_panel.is_some());
        assert_eq!(state.charts.live_count(), 1);

        let asset = state.asset_panel.as_ref().unwrap();
        assert_eq!(asset.change, "-1.23%");
        assert_eq!(asset.tone, crate::view::Tone::Negative);
    }

    #[tokio::test]
    async fn test_detail_failure_aborts_without_optional_fetches() {
        let controller = controller(FakeApi::failing(Failures { detail: true, ..Default::default() }));

        let outcome = controller.load_crypto_data("xyz").await;

        assert_eq!(outcome, LoadOutcome::Failed("Erreur : Cryptomonnaie introuvable".to_string()));
        assert_eq!(controller.api().calls(), vec!["crypto xyz"]);

        let state = lock_state(controller.state());
        assert!(!state.is_loading());
        assert!(state.alert.as_deref().unwrap().contains(NOT_FOUND_MESSAGE));
        assert!(state.asset_panel.is_none());
    }

    #[tokio::test]
    async fn test_detail_failure_keeps_previous_panels() {
        let controller = controller(FakeApi::default());
        controller.load_crypto_data("bitcoin").await;

        let failing = DashboardController::new(
            FakeApi::failing(Failures { detail: true, ..Default::default() }),
            controller.state().clone(),
            FetchSettings::default(),
        );
        failing.load_crypto_data("xyz").await;

        let state = lock_state(controller.state());
        assert_eq!(state.asset_panel.as_ref().unwrap().coin_id, "bitcoin");
        assert!(state.analysis_panel.is_some());
        assert!(state.chart.is_some());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_analysis_failure_skips_only_that_panel() {
        let controller = controller(FakeApi::failing(Failures { analysis: true, ..Default::default() }));

        let outcome = controller.load_crypto_data("bitcoin").await;

        assert_eq!(
            outcome,
            LoadOutcome::Completed(RenderedPanels { analysis: false, prediction: true, history: true })
        );
        let state = lock_state(controller.state());
        assert!(state.asset_panel.is_some());
        assert!(state.analysis_panel.is_none());
        assert!(state.prediction_panel.is_some());
        assert!(state.alert.is_none());
    }

    #[tokio::test]
    async fn test_all_optional_failures() {
        let controller = controller(FakeApi::failing(Failures {
            analysis: true,
            prediction: true,
            historical: true,
            ..Default::default()
        }));

        let outcome = controller.load_crypto_data("bitcoin").await;

        assert_eq!(outcome, LoadOutcome::Completed(RenderedPanels::default()));
        assert_eq!(controller.api().calls().len(), 4);
        let state = lock_state(controller.state());
        assert!(state.asset_panel.is_some());
        assert!(state.chart.is_none());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_new_selection_replaces_optional_panels() {
        let state = DashboardState::shared();
        let ok = DashboardController::new(FakeApi::default(), state.clone(), FetchSettings::default());
        ok.load_crypto_data("bitcoin").await;

        let partial = DashboardController::new(
            FakeApi::failing(Failures { analysis: true, historical: true, ..Default::default() }),
            state.clone(),
            FetchSettings::default(),
        );
        partial.load_crypto_data("ethereum").await;

        let state = lock_state(&state);
        assert_eq!(state.asset_panel.as_ref().unwrap().coin_id, "ethereum");
        assert!(state.analysis_panel.is_none());
        assert!(state.chart.is_none());
        assert_eq!(state.charts.live_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_search_is_rejected_without_network() {
        let controller = controller(FakeApi::default());

        let outcome = controller.search_crypto("   \t ").await;

        assert_eq!(outcome, LoadOutcome::Rejected);
        assert!(controller.api().calls().is_empty());
        let state = lock_state(controller.state());
        assert_eq!(state.alert.as_deref(), Some(EMPTY_SEARCH_MESSAGE));
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_search_normalizes_input() {
        let controller = controller(FakeApi::default());
        controller.search_crypto("  BitCoin ").await;
        assert_eq!(controller.api().calls()[0], "crypto bitcoin");
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let controller = controller(FakeApi::default());

        // Une sélection plus récente arrive avant la réponse
        let stale = lock_state(controller.state()).begin_request("dogecoin");
        controller.load_crypto_data("bitcoin").await;

        let mut state = lock_state(controller.state());
        assert!(!state.commit_asset(&stale, render_crypto_info(&AssetDetail {
            id: "dogecoin".into(),
            name: "Dogecoin".into(),
            symbol: "doge".into(),
            current_price: 0.1,
            price_change_24h: 0.0,
            market_cap: 1.0,
            total_volume: 1.0,
            high_24h: 0.1,
            low_24h: 0.1,
            last_updated: None,
        })));
        assert_eq!(state.asset_panel.as_ref().unwrap().coin_id, "bitcoin");
        state.finish_request(&stale);
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_current_asset() {
        let controller = controller(FakeApi::default());
        controller.load_crypto_data("bitcoin").await;

        let failing = DashboardController::new(
            FakeApi::failing(Failures { detail: true, ..Default::default() }),
            controller.state().clone(),
            FetchSettings::default(),
        );
        failing.load_crypto_data("xyz").await;

        let state = lock_state(controller.state());
        assert_eq!(state.current_coin_id.as_deref(), Some("bitcoin"));
        assert_eq!(state.asset_panel.as_ref().unwrap().coin_id, "bitcoin");
        assert_eq!(state.pending_coin_id, None);
    }

    #[tokio::test]
    async fn test_superseded_detail_failure_is_silent() {
        let controller = controller(FakeApi::failing(Failures { detail: true, ..Default::default() }));
        controller.api().select_newer_during("crypto", controller.state().clone(), "ethereum");

        let outcome = controller.load_crypto_data("xyz").await;

        assert_eq!(outcome, LoadOutcome::Superseded);
        let state = lock_state(controller.state());
        assert!(state.alert.is_none());
        // Le chargement appartient à la sélection plus récente
        assert!(state.is_loading());
        assert_eq!(state.current_coin_id.as_deref(), Some("ethereum"));
    }

    #[tokio::test]
    async fn test_superseded_detail_success_leaves_newer_panels() {
        let controller = controller(FakeApi::default());
        controller.api().select_newer_during("crypto", controller.state().clone(), "ethereum");

        let outcome = controller.load_crypto_data("bitcoin").await;

        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(controller.api().calls(), vec!["crypto bitcoin"]);

        let state = lock_state(controller.state());
        assert_eq!(state.asset_panel.as_ref().unwrap().coin_id, "ethereum");
        assert_eq!(state.current_coin_id.as_deref(), Some("ethereum"));
        assert!(state.analysis_panel.is_none());
        assert!(state.chart.is_none());
        assert!(state.is_loading());
        assert!(state.alert.is_none());
    }

    #[tokio::test]
    async fn test_superseded_load_skips_remaining_fetches() {
        let controller = controller(FakeApi::default());
        controller.api().select_newer_during("analysis", controller.state().clone(), "ethereum");

        let outcome = controller.load_crypto_data("bitcoin").await;

        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(controller.api().calls(), vec!["crypto bitcoin", "analysis bitcoin"]);

        let state = lock_state(controller.state());
        assert_eq!(state.asset_panel.as_ref().unwrap().coin_id, "ethereum");
        assert!(state.analysis_panel.is_none());
        assert!(state.prediction_panel.is_none());
        assert_eq!(state.focus, Focus::Trending);
    }
}
