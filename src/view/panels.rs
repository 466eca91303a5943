// ============================================================================
// View-models des panneaux
// ============================================================================
// Transforme les payloads de l'API en structures prêtes à afficher
//
// CONCEPTS :
// 1. Fonctions pures : payload → view-model, aucun effet de bord
// 2. Les classes de présentation (couleur, icône, badge) sont des enums
//    typés, la couche ui décide du rendu exact
// 3. Aucun template de string : pas de risque d'injection
// ============================================================================

use crate::models::{AssetDetail, AssetSummary, Prediction, Signal, TechnicalAnalysis};
use crate::view::format::{format_signed_percent, format_usd};

/// Tonalité d'une variation (couleur + flèche)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
}

impl Tone {
    /// ≥ 0 est positif (0 compris)
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            Tone::Positive
        } else {
            Tone::Negative
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Tone::Positive => "▲",
            Tone::Negative => "▼",
        }
    }
}

/// Style du badge de signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalTone {
    Buy,
    Sell,
    Hold,
    Neutral,
}

impl From<&Signal> for SignalTone {
    fn from(signal: &Signal) -> Self {
        match signal {
            Signal::Buy(_) => SignalTone::Buy,
            Signal::Sell(_) => SignalTone::Sell,
            Signal::Hold(_) => SignalTone::Hold,
            Signal::Other(_) => SignalTone::Neutral,
        }
    }
}

/// Carte cliquable de la liste trending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingCard {
    /// Identifiant passé à load_crypto_data
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// Panneau principal : prix et métriques de marché
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPanel {
    pub coin_id: String,

    /// "Bitcoin (BTC)"
    pub title: String,
    pub price: String,
    pub change: String,
    pub tone: Tone,
    pub market_cap: String,
    pub volume_24h: String,

    /// "$44.00K / $42.80K"
    pub high_low: String,
    pub last_updated: Option<String>,
}

/// Panneau d'analyse technique
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPanel {
    pub sma_20: String,
    pub sma_50: String,
    pub ema_12: Option<String>,
    pub ema_26: Option<String>,
    pub rsi: String,
    pub macd: String,

    /// Texte du badge, en majuscules
    pub signal_label: String,
    pub signal_tone: SignalTone,
    pub trend: String,
    pub support: String,
    pub resistance: String,
}

/// Panneau de prédiction ML
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPanel {
    /// "Prédiction à 7 jours"
    pub heading: String,
    pub predicted_price: String,
    pub change: String,
    pub tone: Tone,

    /// Ratio 0.0 - 1.0 pour la jauge
    pub confidence_ratio: f64,

    /// "85.3%"
    pub confidence_label: String,
    pub current_price: String,
    pub model: String,
    pub prediction_date: Option<String>,
}

pub fn render_trending_cards(summaries: &[AssetSummary]) -> Vec<TrendingCard> {
    summaries
        .iter()
        .map(|s| TrendingCard {
            id: s.id.clone(),
            symbol: s.symbol.clone(),
            name: s.name.clone(),
        })
        .collect()
}

/// Construit le panneau principal depuis AssetDetail
pub fn render_crypto_info(info: &AssetDetail) -> AssetPanel {
    AssetPanel {
        coin_id: info.id.clone(),
        title: format!("{} ({})", info.name, info.symbol.to_uppercase()),
        price: format_usd(info.current_price),
        change: format_signed_percent(info.price_change_24h),
        tone: Tone::from_change(info.price_change_24h),
        market_cap: format_usd(info.market_cap),
        volume_24h: format_usd(info.total_volume),
        high_low: format!("{} / {}", format_usd(info.high_24h), format_usd(info.low_24h)),
        last_updated: info.last_updated.clone(),
    }
}

/// Construit le panneau d'analyse technique
pub fn render_technical_analysis(analysis: &TechnicalAnalysis) -> AnalysisPanel {
    AnalysisPanel {
        sma_20: format_usd(analysis.sma_20),
        sma_50: format_usd(analysis.sma_50),
        ema_12: analysis.ema_12.map(format_usd),
        ema_26: analysis.ema_26.map(format_usd),
        // Le RSI est affiché tel quel (pas d'arrondi)
        rsi: analysis.rsi.to_string(),
        macd: format!("{:.2}", analysis.macd),
        signal_label: analysis.signal.raw().to_uppercase(),
        signal_tone: SignalTone::from(&analysis.signal),
        trend: analysis.trend.to_uppercase(),
        support: format_usd(analysis.support_level),
        resistance: format_usd(analysis.resistance_level),
    }
}

/// Construit le panneau de prédiction
pub fn render_prediction(prediction: &Prediction) -> PredictionPanel {
    let percent = prediction.confidence_percent();

    PredictionPanel {
        heading: format!("Prédiction à {} jours", prediction.days_ahead),
        predicted_price: format_usd(prediction.predicted_price),
        change: format_signed_percent(prediction.predicted_change),
        tone: Tone::from_change(prediction.predicted_change),
        confidence_ratio: percent / 100.0,
        confidence_label: format!("{:.1}%", percent),
        current_price: format_usd(prediction.current_price),
        model: prediction.model_info.kind.clone(),
        prediction_date: prediction.prediction_date.clone(),
    }
}
