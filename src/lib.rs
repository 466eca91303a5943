// ============================================================================
// CryptoDash - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests d'intégration
// ============================================================================

pub mod config;     // Configuration (variables d'environnement)
pub mod models;     // Structures de données du backend
pub mod api;        // Client HTTP du backend d'analyse
pub mod view;       // View-models et formatage
pub mod app;        // État du dashboard
pub mod controller; // Orchestration des chargements
pub mod ui;         // Interface utilisateur
