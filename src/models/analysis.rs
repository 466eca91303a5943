// ============================================================================
// Structure : TechnicalAnalysis
// ============================================================================
// Réponse de /analysis/{id} : moyennes mobiles, RSI, MACD, signal, tendance
//
// CONCEPT RUST : #[serde(from = "String")]
// - Le JSON contient une string libre ("compra", "sell", ...)
// - serde la désérialise en String puis appelle From<String> pour Signal
// - On garde le texte brut pour l'affichage
// ============================================================================

use serde::{Deserialize, Serialize};

/// Recommandation de trading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Signal {
    Buy(String),
    Sell(String),
    Hold(String),

    /// Valeur inconnue, conservée telle quelle
    Other(String),
}

impl Signal {
    /// Texte brut reçu du backend
    pub fn raw(&self) -> &str {
        match self {
            Signal::Buy(raw) | Signal::Sell(raw) | Signal::Hold(raw) | Signal::Other(raw) => raw,
        }
    }
}

impl From<String> for Signal {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "buy" | "compra" | "achat" => Signal::Buy(raw),
            "sell" | "venda" | "vente" => Signal::Sell(raw),
            "hold" | "manutenção" | "manutencao" | "conserver" => Signal::Hold(raw),
            _ => Signal::Other(raw),
        }
    }
}

impl From<Signal> for String {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Buy(raw) | Signal::Sell(raw) | Signal::Hold(raw) | Signal::Other(raw) => raw,
        }
    }
}

/// Analyse technique d'un actif
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    #[serde(default)]
    pub coin_id: Option<String>,

    pub sma_20: f64,
    pub sma_50: f64,

    #[serde(default)]
    pub ema_12: Option<f64>,
    #[serde(default)]
    pub ema_26: Option<f64>,

    /// RSI (0-100)
    pub rsi: f64,
    pub macd: f64,

    pub signal: Signal,

    /// Tendance ("alta", "baixa", "lateral", ...)
    pub trend: String,

    pub support_level: f64,
    pub resistance_level: f64,
}
