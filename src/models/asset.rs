// ============================================================================
// Structures : AssetSummary, AssetDetail
// ============================================================================
// Réponses des endpoints /trending et /crypto/{id}
//
// CONCEPTS RUST :
// 1. #[derive(Deserialize)] : serde génère le parsing JSON
// 2. #[serde(default)] : champ optionnel dans le JSON
// 3. Les champs inconnus (ex: "rank") sont ignorés par défaut
// ============================================================================

use serde::{Deserialize, Serialize};

/// Identifie un actif échangeable (carte "trending")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSummary {
    /// Identifiant backend (ex: "bitcoin")
    pub id: String,

    /// Symbole (ex: "BTC")
    pub symbol: String,

    /// Nom complet (ex: "Bitcoin")
    pub name: String,
}

/// Réponse de /trending
#[derive(Debug, Clone, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub total: Option<usize>,

    pub cryptos: Vec<AssetSummary>,
}

/// Snapshot des métriques de marché d'un actif
///
/// Immuable une fois récupéré, remplacé à la sélection suivante.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDetail {
    pub id: String,
    pub name: String,
    pub symbol: String,

    /// Prix actuel en USD
    pub current_price: f64,

    /// Variation en pourcentage sur 24h
    pub price_change_24h: f64,

    pub market_cap: f64,
    pub total_volume: f64,
    pub high_24h: f64,
    pub low_24h: f64,

    /// Date de la dernière mise à jour côté backend
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl AssetDetail {
    /// Retourne true si l'actif est en hausse (ou stable) sur 24h
    pub fn is_positive(&self) -> bool {
        self.price_change_24h >= 0.0
    }
}
