// ============================================================================
// Structure : HistoricalSeries
// ============================================================================
// Réponse de /historical/{id}?days=N : série chronologique de prix
//
// CONCEPT : Timestamps hétérogènes
// - Le backend envoie des dates ISO-8601 sans fuseau ("2024-01-15T10:00:00")
// - D'autres sources envoient un offset ou des millisecondes epoch
// - On normalise tout en NaiveDateTime (UTC)
// ============================================================================

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Un point de la série de prix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: NaiveDateTime,

    pub price: f64,

    #[serde(default)]
    pub volume: f64,
}

/// Série historique, ordonnée chronologiquement par le backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    #[serde(default)]
    pub coin_id: Option<String>,

    #[serde(default)]
    pub period_days: Option<u32>,

    #[serde(default)]
    pub data_points: Option<usize>,

    pub prices: Vec<PricePoint>,
}

impl HistoricalSeries {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Dernier prix de la série
    pub fn last_price(&self) -> Option<f64> {
        self.prices.last().map(|p| p.price)
    }
}

/// Forme brute d'un timestamp dans le JSON
///
/// CONCEPT RUST : #[serde(untagged)]
/// - serde essaie chaque variant dans l'ordre
/// - Le premier qui parse gagne
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(ms)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp hors limites : {}", ms))),
        RawTimestamp::Text(text) => parse_timestamp_text(&text).map_err(serde::de::Error::custom),
    }
}

/// Parse une date ISO-8601 avec ou sans offset
pub fn parse_timestamp_text(text: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_utc());
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|e| format!("timestamp invalide '{}' : {}", text, e))
}
