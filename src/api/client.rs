// ============================================================================
// API Client : CryptoAnalytics
// ============================================================================
// Récupère les données depuis le backend CryptoAnalytics (HTTP GET + JSON)
//
// | Endpoint           | Query   | Réponse            |
// |--------------------|---------|--------------------|
// | /trending          | limit   | {cryptos: [...]}   |
// | /crypto/{id}       | -       | AssetDetail        |
// | /analysis/{id}     | -       | TechnicalAnalysis  |
// | /predict/{id}      | days    | Prediction         |
// | /historical/{id}   | days    | HistoricalSeries   |
//
// CONCEPTS RUST AVANCÉS :
// 1. async-trait : méthodes async dans un trait (MarketApi)
// 2. Génériques avec DeserializeOwned : une seule fonction get_json<T>
// 3. Url::path_segments_mut : encodage sûr de l'identifiant saisi
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};

use crate::config::Config;
use crate::models::{AssetDetail, AssetSummary, HistoricalSeries, Prediction, TechnicalAnalysis, TrendingResponse};

/// Message affiché quand /crypto/{id} ne répond pas 2xx
pub const NOT_FOUND_MESSAGE: &str = "Cryptomonnaie introuvable";

// ============================================================================
// Trait MarketApi
// ============================================================================
// CONCEPT RUST : Trait comme port
// - Le contrôleur est générique sur MarketApi
// - HttpMarketApi : implémentation réelle (reqwest)
// - Les tests fournissent une implémentation en mémoire
//
// Send + Sync : le contrôleur est partagé entre tâches tokio (Arc)
// ============================================================================

/// Accès aux endpoints du backend
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// Liste courte des actifs en tendance
    async fn trending(&self, limit: u32) -> Result<Vec<AssetSummary>>;

    /// Métriques de marché ; une réponse non-2xx est une erreur "introuvable"
    async fn asset_detail(&self, coin_id: &str) -> Result<AssetDetail>;

    async fn technical_analysis(&self, coin_id: &str) -> Result<TechnicalAnalysis>;

    async fn prediction(&self, coin_id: &str, days: u32) -> Result<Prediction>;

    async fn historical(&self, coin_id: &str, days: u32) -> Result<HistoricalSeries>;
}

/// Client HTTP vers l'API CryptoAnalytics
#[derive(Debug, Clone)]
pub struct HttpMarketApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpMarketApi {
    /// Crée le client depuis la configuration
    ///
    /// Échoue si l'URL de l'API est invalide ou ne peut pas servir de base.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(&config.api_url)
    }

    pub fn with_base_url(api_url: &str) -> Result<Self> {
        let base_url = Url::parse(api_url)
            .with_context(|| format!("URL d'API invalide : {}", api_url))?;

        if base_url.cannot_be_a_base() {
            anyhow::bail!("L'URL d'API ne peut pas servir de base : {}", api_url);
        }

        debug!("Creating HTTP client");
        let client = reqwest::Client::builder()
            .user_agent(concat!("cryptodash/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Construit l'URL d'un endpoint
    ///
    /// CONCEPT : Encodage des segments
    /// - "bitcoin cash" devient "bitcoin%20cash"
    /// - Un "/" saisi par l'utilisateur ne change pas de route
    fn endpoint_url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("URL d'API sans chemin : {}", self.base_url))?;
            path.pop_if_empty();
            path.extend(segments);
        }

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Envoie la requête GET et retourne la réponse brute
    async fn send(&self, url: Url) -> Result<reqwest::Response> {
        debug!(url = %url, "Sending HTTP request");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Échec de la requête HTTP vers {}", url.path()))?;

        debug!(status = %response.status(), "Received HTTP response");
        Ok(response)
    }

    /// GET + vérification du statut + parsing JSON
    ///
    /// CONCEPT RUST : Génériques
    /// - T: DeserializeOwned : n'importe quel type désérialisable
    /// - Le type est déduit à l'appel (let x: Prediction = ...)
    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint_url(segments, query)?;
        let response = self.send(url).await?;
        let status = response.status();

        if !status.is_success() {
            error!(status = %status, endpoint = segments[0], "API returned error status");
            anyhow::bail!("L'API a retourné une erreur : HTTP {}", status);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Échec du parsing JSON de la réponse /{}", segments[0]))
    }
}

#[async_trait]
impl MarketApi for HttpMarketApi {
    #[instrument(skip(self))]
    async fn trending(&self, limit: u32) -> Result<Vec<AssetSummary>> {
        let response: TrendingResponse = self
            .get_json(&["trending"], &[("limit", limit.to_string())])
            .await?;

        info!(count = response.cryptos.len(), "Fetched trending cryptos");
        Ok(response.cryptos)
    }

    #[instrument(skip(self))]
    async fn asset_detail(&self, coin_id: &str) -> Result<AssetDetail> {
        let url = self.endpoint_url(&["crypto", coin_id], &[])?;
        let response = self.send(url).await?;
        let status = response.status();

        // Toute réponse non-2xx est traitée comme "introuvable"
        if !status.is_success() {
            if status != StatusCode::NOT_FOUND {
                error!(status = %status, "Asset detail returned non-404 error status");
            }
            anyhow::bail!(NOT_FOUND_MESSAGE);
        }

        let detail: AssetDetail = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse /crypto")?;

        info!(price = detail.current_price, "Fetched asset detail");
        Ok(detail)
    }

    #[instrument(skip(self))]
    async fn technical_analysis(&self, coin_id: &str) -> Result<TechnicalAnalysis> {
        self.get_json(&["analysis", coin_id], &[]).await
    }

    #[instrument(skip(self))]
    async fn prediction(&self, coin_id: &str, days: u32) -> Result<Prediction> {
        self.get_json(&["predict", coin_id], &[("days", days.to_string())]).await
    }

    #[instrument(skip(self))]
    async fn historical(&self, coin_id: &str, days: u32) -> Result<HistoricalSeries> {
        let series: HistoricalSeries = self
            .get_json(&["historical", coin_id], &[("days", days.to_string())])
            .await?;

        info!(points = series.len(), "Fetched historical series");
        Ok(series)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
