// ============================================================================
// Configuration
// ============================================================================
// Lit la configuration depuis les variables d'environnement
//
// Variables reconnues :
// - CRYPTODASH_API_URL         : racine de l'API (défaut http://localhost:8000/api)
// - CRYPTODASH_TRENDING_LIMIT  : nombre de cartes trending (1-20, défaut 6)
// - CRYPTODASH_PREDICTION_DAYS : horizon de prédiction (1-30, défaut 7)
// - CRYPTODASH_HISTORY_DAYS    : fenêtre historique (1-365, défaut 30)
// - CRYPTODASH_LOG_DIR         : répertoire des logs
// ============================================================================

use std::env;
use std::fmt::Debug;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{error, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TRENDING_LIMIT: u32 = 6;
pub const DEFAULT_PREDICTION_DAYS: u32 = 7;
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Racine de l'API (sans slash final obligatoire)
    pub api_url: String,

    /// Nombre de cartes trending demandées
    pub trending_limit: u32,

    /// Nombre de jours pour la prédiction
    pub prediction_days: u32,

    /// Nombre de jours d'historique pour le graphique
    pub history_days: u32,

    /// Répertoire des fichiers de logs
    pub log_dir: PathBuf,
}

impl Config {
    /// Charge la configuration depuis l'environnement
    ///
    /// Les valeurs invalides retombent sur le défaut, les valeurs hors bornes
    /// sont ramenées dans les limites acceptées par le backend.
    pub fn from_env() -> Self {
        Self {
            api_url: get_env_or_default("CRYPTODASH_API_URL", DEFAULT_API_URL.to_string()),
            trending_limit: bounded(
                "CRYPTODASH_TRENDING_LIMIT",
                get_env_or_default("CRYPTODASH_TRENDING_LIMIT", DEFAULT_TRENDING_LIMIT),
                1,
                20,
            ),
            prediction_days: bounded(
                "CRYPTODASH_PREDICTION_DAYS",
                get_env_or_default("CRYPTODASH_PREDICTION_DAYS", DEFAULT_PREDICTION_DAYS),
                1,
                30,
            ),
            history_days: bounded(
                "CRYPTODASH_HISTORY_DAYS",
                get_env_or_default("CRYPTODASH_HISTORY_DAYS", DEFAULT_HISTORY_DAYS),
                1,
                365,
            ),
            log_dir: get_env_or_none::<PathBuf>("CRYPTODASH_LOG_DIR").unwrap_or_else(default_log_dir),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            trending_limit: DEFAULT_TRENDING_LIMIT,
            prediction_days: DEFAULT_PREDICTION_DAYS,
            history_days: DEFAULT_HISTORY_DAYS,
            log_dir: default_log_dir(),
        }
    }
}

/// Répertoire de logs par défaut
///
/// - Linux/WSL : ~/.local/share/cryptodash/logs
/// - macOS : ~/Library/Application Support/cryptodash/logs
/// - Sinon : ./logs
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("cryptodash").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Lit une variable d'environnement, ou retourne le défaut si absente ou invalide
pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|e| {
            error!(var = env_var, value = %val, error = ?e, "Failed to parse environment variable, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Lit une variable d'environnement, None si absente ou invalide
pub fn get_env_or_none<T: FromStr>(env_var: &str) -> Option<T> {
    env::var(env_var).ok().and_then(|val| val.parse::<T>().ok())
}

/// Ramène une valeur dans [min, max] en prévenant dans les logs
fn bounded(name: &str, value: u32, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(var = name, value, clamped, "Configuration value out of range, clamped");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000/api");
        assert_eq!(config.trending_limit, 6);
        assert_eq!(config.prediction_days, 7);
        assert_eq!(config.history_days, 30);
    }

    #[test]
    fn test_bounded() {
        assert_eq!(bounded("X", 0, 1, 20), 1);
        assert_eq!(bounded("X", 50, 1, 20), 20);
        assert_eq!(bounded("X", 6, 1, 20), 6);
    }

    #[test]
    fn test_get_env_or_default_with_invalid_value() {
        // Nom unique pour ne pas interférer avec les autres tests
        env::set_var("CRYPTODASH_TEST_INVALID_LIMIT", "six");
        assert_eq!(get_env_or_default("CRYPTODASH_TEST_INVALID_LIMIT", 6u32), 6);

        env::set_var("CRYPTODASH_TEST_VALID_LIMIT", "12");
        assert_eq!(get_env_or_default("CRYPTODASH_TEST_VALID_LIMIT", 6u32), 12);

        assert_eq!(get_env_or_none::<u32>("CRYPTODASH_TEST_MISSING"), None);
    }
}
