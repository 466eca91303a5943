// ============================================================================
// Module : models
// ============================================================================
// Ce module contient les payloads JSON renvoyés par l'API CryptoAnalytics
//
// Ce sont des données transitoires : jamais persistées, remplacées à chaque
// nouvelle sélection d'actif.
// ============================================================================

pub mod analysis;   // /analysis/{id}
pub mod asset;      // /trending et /crypto/{id}
pub mod history;    // /historical/{id}
pub mod prediction; // /predict/{id}

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use cryptodash::models::asset::AssetDetail;
// On peut faire : use cryptodash::models::AssetDetail;
pub use analysis::{Signal, TechnicalAnalysis};
pub use asset::{AssetDetail, AssetSummary, TrendingResponse};
pub use history::{HistoricalSeries, PricePoint};
pub use prediction::{ModelInfo, Prediction};
