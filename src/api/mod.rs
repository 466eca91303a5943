// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client de l'API CryptoAnalytics et le trait
// MarketApi qui sert de frontière avec le contrôleur
// ============================================================================

pub mod client; // Client HTTP CryptoAnalytics

// Re-export des types principaux
pub use client::{HttpMarketApi, MarketApi, NOT_FOUND_MESSAGE};
