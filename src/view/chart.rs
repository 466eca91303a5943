// ============================================================================
// Surface de graphique
// ============================================================================
// Interface étroite vers la "bibliothèque de graphiques" :
// - render_series(container, points) -> ChartHandle
// - destroy(handle)
//
// ChartRegistry est l'implémentation en mémoire : elle garde les séries
// vivantes, la couche ui dessine celle dont le handle est actif.
//
// CONCEPT RUST : Trait comme frontière
// - Le contrôleur ne connaît que le trait
// - Les tests utilisent une surface qui enregistre les appels
// ============================================================================

use std::collections::HashMap;

use tracing::debug;

use crate::models::HistoricalSeries;

/// Conteneur du graphique de prix historique
pub const PRICE_CHART: &str = "priceChart";

/// Titre de la série affichée
pub const PRICE_SERIES_LABEL: &str = "Prix (USD)";

/// Format des labels de date (jour/mois/année)
pub const DATE_LABEL_FORMAT: &str = "%d/%m/%Y";

/// Référence opaque vers un graphique créé
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(u64);

/// Un point du graphique : label de date + prix
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub price: f64,
}

/// Série rendue dans un conteneur
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSeries {
    pub container_id: String,
    pub title: String,
    pub points: Vec<ChartPoint>,
}

impl RenderedSeries {
    /// Bornes (min, max) des prix, None si la série est vide
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().fold((f64::MAX, f64::MIN), |(min, max), p| {
            (min.min(p.price), max.max(p.price))
        }))
    }
}

/// Collaborateur externe : crée et détruit des graphiques
pub trait ChartSurface {
    fn render_series(&mut self, container_id: &str, points: Vec<ChartPoint>) -> ChartHandle;
    fn destroy(&mut self, handle: ChartHandle);
}

/// Implémentation en mémoire de ChartSurface
#[derive(Debug, Default)]
pub struct ChartRegistry {
    next_id: u64,
    series: HashMap<ChartHandle, RenderedSeries>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Série associée à un handle encore vivant
    pub fn get(&self, handle: ChartHandle) -> Option<&RenderedSeries> {
        self.series.get(&handle)
    }

    /// Nombre de graphiques vivants
    pub fn live_count(&self) -> usize {
        self.series.len()
    }
}

impl ChartSurface for ChartRegistry {
    fn render_series(&mut self, container_id: &str, points: Vec<ChartPoint>) -> ChartHandle {
        self.next_id += 1;
        let handle = ChartHandle(self.next_id);

        debug!(container = container_id, points = points.len(), ?handle, "Chart series rendered");
        self.series.insert(
            handle,
            RenderedSeries {
                container_id: container_id.to_string(),
                title: PRICE_SERIES_LABEL.to_string(),
                points,
            },
        );
        handle
    }

    fn destroy(&mut self, handle: ChartHandle) {
        if self.series.remove(&handle).is_some() {
            debug!(?handle, "Chart destroyed");
        }
    }
}

/// Convertit la série historique en points, dans l'ordre reçu
pub fn chart_points(series: &HistoricalSeries) -> Vec<ChartPoint> {
    series
        .prices
        .iter()
        .map(|p| ChartPoint {
            label: p.timestamp.format(DATE_LABEL_FORMAT).to_string(),
            price: p.price,
        })
        .collect()
}

/// Affiche le graphique historique
///
/// Détruit d'abord le graphique déjà lié à `slot` : appeler deux fois de
/// suite (deux actifs différents) ne laisse qu'un seul graphique vivant.
pub fn render_historical_chart<S: ChartSurface>(
    surface: &mut S,
    slot: &mut Option<ChartHandle>,
    series: &HistoricalSeries,
) -> ChartHandle {
    // CONCEPT RUST : Option::take()
    // - Sort la valeur et laisse None à la place
    if let Some(previous) = slot.take() {
        surface.destroy(previous);
    }

    let handle = surface.render_series(PRICE_CHART, chart_points(series));
    *slot = Some(handle);
    handle
}
