// ============================================================================
// Structure : Prediction
// ============================================================================
// Réponse de /predict/{id}?days=N : prix prédit par le modèle ML
// ============================================================================

use serde::{Deserialize, Serialize};

/// Informations sur le modèle utilisé
///
/// Le backend envoie un dictionnaire libre, seul "type" nous intéresse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// CONCEPT RUST : #[serde(rename)]
    /// - "type" est un mot-clé Rust, on le mappe sur `kind`
    #[serde(rename = "type")]
    pub kind: String,
}

/// Prédiction de prix à N jours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub coin_id: Option<String>,

    pub current_price: f64,
    pub predicted_price: f64,

    /// Variation prédite en pourcentage
    pub predicted_change: f64,

    /// Confiance du modèle (0.0 - 1.0)
    pub confidence: f64,

    pub days_ahead: u32,

    #[serde(default)]
    pub prediction_date: Option<String>,

    pub model_info: ModelInfo,
}

impl Prediction {
    /// Confiance en pourcentage, bornée à [0, 100]
    pub fn confidence_percent(&self) -> f64 {
        (self.confidence * 100.0).clamp(0.0, 100.0)
    }
}
