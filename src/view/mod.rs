// ============================================================================
// Module : view
// ============================================================================
// Logique de présentation indépendante du terminal :
// - formatage des nombres
// - view-models des panneaux (fonctions pures)
// - surface de graphique (trait + registre en mémoire)
// ============================================================================

pub mod chart;  // ChartSurface, ChartRegistry, render_historical_chart
pub mod format; // format_number, format_signed_percent
pub mod panels; // AssetPanel, AnalysisPanel, PredictionPanel, TrendingCard

pub use chart::{render_historical_chart, ChartHandle, ChartRegistry, ChartSurface};
pub use format::{format_number, format_signed_percent, format_usd};
pub use panels::{
    render_crypto_info, render_prediction, render_technical_analysis, render_trending_cards,
    AnalysisPanel, AssetPanel, PredictionPanel, SignalTone, Tone, TrendingCard,
};
