// ============================================================================
// Structure : DashboardState
// ============================================================================
// État unique du dashboard, partagé entre l'UI et le contrôleur
//
// CONCEPTS RUST :
// 1. State Management : tout l'état de la vue dans une seule structure
//    (pas de variables globales : coin courant, graphique, panneaux...)
// 2. Arc<Mutex<>> : partage entre le thread UI et les tâches tokio
// 3. Numéro de séquence : la dernière sélection gagne, explicitement
//
// PATTERN : "Application State"
// - L'UI lit DashboardState pour dessiner
// - Le contrôleur écrit via les méthodes commit_*
// - Chaque écriture remplace un slot entier (jamais de mutation partielle)
// ============================================================================

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::models::HistoricalSeries;
use crate::view::{
    render_historical_chart, AnalysisPanel, AssetPanel, ChartHandle, ChartRegistry, ChartSurface,
    PredictionPanel, TrendingCard,
};

/// État partagé entre threads
pub type SharedState = Arc<Mutex<DashboardState>>;

/// Verrouille l'état, même si un autre thread a paniqué en le tenant
///
/// CONCEPT RUST : Mutex poisoning
/// - Si un thread panique avec le lock, le Mutex est "empoisonné"
/// - into_inner() récupère quand même le guard : l'état reste utilisable
pub fn lock_state(state: &SharedState) -> MutexGuard<'_, DashboardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : trending + résultats
    Dashboard,

    /// Mode saisie : recherche d'une crypto
    InputMode,
}

/// Zone qui reçoit les touches de navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Trending,
    Results,
}

/// Sections de la zone résultats, dans l'ordre d'affichage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSection {
    Asset,
    Chart,
    Analysis,
    Prediction,
}

/// Identifie une sélection d'actif
///
/// Une réponse n'est appliquée que si son ticket est encore le dernier émis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub coin_id: String,
}

/// Indicateur de chargement (modal)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingIndicator {
    pub message: String,
}

/// État principal du dashboard
pub struct DashboardState {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    pub current_screen: Screen,
    pub focus: Focus,

    /// Cartes trending et carte sélectionnée
    pub trending: Vec<TrendingCard>,
    pub selected_index: usize,

    /// Buffer et prompt du mode saisie
    pub input_buffer: String,
    pub input_prompt: String,

    /// Two-step quit
    pub confirm_quit: bool,

    /// Actif "courant" : au plus un à la fois, promu par commit_asset
    pub current_coin_id: Option<String>,

    /// Actif demandé dont la fiche n'est pas encore arrivée
    pub pending_coin_id: Option<String>,

    /// Dernier numéro de séquence émis
    pub request_seq: u64,

    pub loading: Option<LoadingIndicator>,

    /// Alerte modale, fermée par la touche suivante
    pub alert: Option<String>,

    pub asset_panel: Option<AssetPanel>,
    pub analysis_panel: Option<AnalysisPanel>,
    pub prediction_panel: Option<PredictionPanel>,

    /// Graphique actuellement lié au conteneur de prix
    pub chart: Option<ChartHandle>,
    pub charts: ChartRegistry,

    /// Index de la première section affichée dans la zone résultats
    pub results_offset: usize,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            running: true,
            current_screen: Screen::Dashboard,
            focus: Focus::Trending,
            trending: Vec::new(),
            selected_index: 0,
            input_buffer: String::new(),
            input_prompt: String::new(),
            confirm_quit: false,
            current_coin_id: None,
            pending_coin_id: None,
            request_seq: 0,
            loading: None,
            alert: None,
            asset_panel: None,
            analysis_panel: None,
            prediction_panel: None,
            chart: None,
            charts: ChartRegistry::new(),
            results_offset: 0,
        }
    }

    /// Crée l'état enveloppé dans Arc<Mutex<>>
    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Trending
    // ========================================================================

    /// Remplace toute la liste de cartes
    pub fn replace_trending(&mut self, cards: Vec<TrendingCard>) {
        self.trending = cards;
        self.selected_index = 0;
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let max_index = self.trending.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    pub fn selected_card(&self) -> Option<&TrendingCard> {
        self.trending.get(self.selected_index)
    }

    // ========================================================================
    // Requêtes
    // ========================================================================

    /// Démarre une sélection d'actif
    ///
    /// Incrémente la séquence, note l'actif en attente et affiche
    /// l'indicateur de chargement. L'actif courant ne change qu'au
    /// commit_asset : un échec de /crypto/{id} laisse l'écran intact.
    pub fn begin_request(&mut self, coin_id: &str) -> RequestTicket {
        self.request_seq += 1;
        self.pending_coin_id = Some(coin_id.to_string());
        self.show_loading(format!("Chargement de {}...", coin_id));

        debug!(seq = self.request_seq, coin = coin_id, "Request started");
        RequestTicket {
            seq: self.request_seq,
            coin_id: coin_id.to_string(),
        }
    }

    /// true si aucune sélection plus récente n'a été faite
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.seq == self.request_seq
    }

    /// Termine une requête : masque le chargement si elle est la dernière
    pub fn finish_request(&mut self, ticket: &RequestTicket) {
        if self.is_current(ticket) {
            self.pending_coin_id = None;
            self.hide_loading();
        } else {
            debug!(seq = ticket.seq, latest = self.request_seq, "Superseded request finished");
        }
    }

    // ========================================================================
    // Chargement et alertes
    // ========================================================================

    pub fn show_loading(&mut self, message: String) {
        self.loading = Some(LoadingIndicator { message });
    }

    /// Masque l'indicateur ; sans effet s'il n'est pas affiché
    pub fn hide_loading(&mut self) {
        self.loading = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn show_alert(&mut self, message: String) {
        self.alert = Some(message);
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // ========================================================================
    // Panneaux
    // ========================================================================
    // CONCEPT : Commit conditionnel
    // - Chaque commit vérifie le ticket
    // - Retourne false si la réponse est périmée (rien n'est écrit)
    // ========================================================================

    /// Affiche le panneau principal d'un nouvel actif
    ///
    /// Invalide les panneaux optionnels et le graphique de l'actif précédent.
    pub fn commit_asset(&mut self, ticket: &RequestTicket, panel: AssetPanel) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.current_coin_id = Some(ticket.coin_id.clone());
        self.pending_coin_id = None;
        self.asset_panel = Some(panel);
        self.analysis_panel = None;
        self.prediction_panel = None;
        if let Some(handle) = self.chart.take() {
            self.charts.destroy(handle);
        }
        self.results_offset = 0;
        true
    }

    pub fn commit_analysis(&mut self, ticket: &RequestTicket, panel: AnalysisPanel) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.analysis_panel = Some(panel);
        true
    }

    pub fn commit_prediction(&mut self, ticket: &RequestTicket, panel: PredictionPanel) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.prediction_panel = Some(panel);
        true
    }

    pub fn commit_history(&mut self, ticket: &RequestTicket, series: &HistoricalSeries) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        render_historical_chart(&mut self.charts, &mut self.chart, series);
        true
    }

    /// Sections présentes, dans l'ordre d'affichage
    pub fn result_sections(&self) -> Vec<ResultSection> {
        let mut sections = Vec::new();
        if self.asset_panel.is_some() {
            sections.push(ResultSection::Asset);
        }
        if self.chart.is_some() {
            sections.push(ResultSection::Chart);
        }
        if self.analysis_panel.is_some() {
            sections.push(ResultSection::Analysis);
        }
        if self.prediction_panel.is_some() {
            sections.push(ResultSection::Prediction);
        }
        sections
    }

    /// Amène la vue sur la zone résultats
    pub fn scroll_to_results(&mut self) {
        self.focus = Focus::Results;
        self.results_offset = 0;
    }

    pub fn scroll_results_up(&mut self) {
        self.results_offset = self.results_offset.saturating_sub(1);
    }

    pub fn scroll_results_down(&mut self) {
        let max_offset = self.result_sections().len().saturating_sub(1);
        self.results_offset = (self.results_offset + 1).min(max_offset);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Trending => Focus::Results,
            Focus::Results => Focus::Trending,
        };
    }

    // ========================================================================
    // Quit et mode saisie
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn start_input(&mut self, prompt: String) {
        self.current_screen = Screen::InputMode;
        self.input_buffer.clear();
        self.input_prompt = prompt;
    }

    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Retourne le texte saisi et revient au dashboard
    pub fn submit_input(&mut self) -> String {
        let value = std::mem::take(&mut self.input_buffer);
        self.current_screen = Screen::Dashboard;
        self.input_prompt.clear();
        value
    }

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
