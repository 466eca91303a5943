// ============================================================================
// CryptoDash - Dashboard d'analyse de cryptomonnaies
// ============================================================================
// Programme TUI : cartes "trending", recherche, fiche détaillée, analyse
// technique, prédiction et graphique historique depuis le backend d'analyse
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : un worker thread possède le runtime tokio
// 4. État partagé : Arc<Mutex<DashboardState>> entre UI et worker
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use cryptodash::api::HttpMarketApi;
use cryptodash::app::{lock_state, DashboardState, Focus, SharedState};
use cryptodash::config::Config;
use cryptodash::controller::{DashboardController, FetchSettings, LoadOutcome};
use cryptodash::ui::{events::EventHandler, render};

/// Prompt affiché dans le footer en mode recherche
const SEARCH_PROMPT: &str = "Rechercher : ";

// ============================================================================
// AppCommand : Commandes pour le worker thread
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker lance une tâche tokio par commande
// - Les résultats sont écrits directement dans l'état partagé
// ============================================================================

/// Commandes envoyées au worker thread pour exécuter des tâches async
#[derive(Debug, Clone)]
enum AppCommand {
    /// Recharger les cartes "trending"
    LoadTrending,

    /// Charger la fiche complète d'une crypto (carte sélectionnée)
    LoadCrypto { coin_id: String },

    /// Recherche saisie par l'utilisateur (validée par le contrôleur)
    Search { query: String },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans `config.log_dir` (CRYPTODASH_LOG_DIR, sinon
/// le répertoire de données local, ex: ~/.local/share/cryptodash/logs).
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/cryptodash/logs/cryptodash.log
/// RUST_LOG=cryptodash=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir.clone();

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    // Nouveau fichier chaque jour : cryptodash.log.2024-01-15
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "cryptodash.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour cryptodash, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptodash=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // La configuration d'abord : elle fournit le répertoire de logs
    let config = Config::from_env();
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api_url = %config.api_url, "CryptoDash starting up");

    // Le client HTTP est construit avant le terminal : une URL invalide
    // s'affiche proprement sur la console
    let api = HttpMarketApi::new(&config).context("Configuration de l'API invalide")?;

    // CONCEPT RUST : Arc<Mutex<>> pour partage entre threads
    // - Le worker écrit les panneaux, l'event loop les dessine
    let state = DashboardState::shared();
    let controller = Arc::new(DashboardController::new(
        api,
        state.clone(),
        FetchSettings::from(&config),
    ));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, controller);

    // Les cartes "trending" sont chargées dès l'ouverture
    send_command(&command_tx, AppCommand::LoadTrending);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, state, &events, command_tx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Worker thread
// ============================================================================

/// Worker thread qui exécute les chargements en arrière-plan
///
/// CONCEPT RUST : Thread + async runtime
/// - std::thread::spawn() : crée un thread OS
/// - tokio::runtime::Runtime : runtime async dans ce thread
/// - runtime.spawn() : chaque commande devient une tâche indépendante,
///   deux sélections rapides se chevauchent réellement (la dernière gagne)
fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    controller: Arc<DashboardController<HttpMarketApi>>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = %e, "Failed to create tokio runtime");
                lock_state(controller.state())
                    .show_alert(format!("Erreur : impossible de démarrer le runtime ({})", e));
                return;
            }
        };

        // recv() échoue quand l'event loop a lâché son Sender : fin du worker
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");
            let controller = Arc::clone(&controller);

            runtime.spawn(async move {
                match command {
                    AppCommand::LoadTrending => controller.load_trending_cryptos().await,
                    AppCommand::LoadCrypto { coin_id } => {
                        log_outcome(&coin_id, controller.load_crypto_data(&coin_id).await);
                    }
                    AppCommand::Search { query } => {
                        log_outcome(&query, controller.search_crypto(&query).await);
                    }
                }
            });
        }

        info!("Command channel closed, worker stopping");
    });
}

fn log_outcome(request: &str, outcome: LoadOutcome) {
    match outcome {
        LoadOutcome::Completed(panels) => debug!(request, ?panels, "Load completed"),
        LoadOutcome::Superseded => debug!(request, "Load superseded by a newer request"),
        LoadOutcome::Rejected => debug!(request, "Search rejected"),
        LoadOutcome::Failed(reason) => warn!(request, %reason, "Load failed"),
    }
}

/// Envoie une commande au worker, en loggant un worker mort
fn send_command(command_tx: &mpsc::Sender<AppCommand>, command: AppCommand) {
    if let Err(e) = command_tx.send(command) {
        error!(command = ?e.0, "Worker thread disconnected, command dropped");
    }
}

// ============================================================================
// Event loop
// ============================================================================
// 1. RENDER : dessine l'état courant
// 2. INPUT  : attend un événement (tick de 250ms au plus)
// Les chargements écrivent directement dans l'état : pas de canal retour.
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: SharedState,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
) -> Result<()> {
    loop {
        // CONCEPT : Lock scope minimisé
        if !lock_state(&state).is_running() {
            break;
        }

        terminal.draw(|frame| {
            let state_lock = lock_state(&state);
            render(frame, &state_lock);
        })?;

        match events.next() {
            Ok(event) => {
                let mut state_lock = lock_state(&state);
                handle_event(&mut state_lock, event, &command_tx);
            }
            Err(e) => {
                warn!(error = %e, "Failed to read terminal event");
            }
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état du dashboard
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Le mode saisie passe en premier : 'q', 's', 'r'... y sont des lettres
/// - Une alerte ouverte absorbe la touche suivante
fn handle_event(state: &mut DashboardState, event: cryptodash::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use cryptodash::ui::events::{
        get_char_from_event, is_backspace_event, is_down_event, is_enter_event, is_escape_event,
        is_left_event, is_quit_event, is_reload_event, is_right_event, is_search_char_event,
        is_search_event, is_tab_event, is_up_event, Event,
    };

    match event {
        Event::Tick => {}

        // N'importe quelle touche ferme l'alerte
        Event::Key(_) if state.alert.is_some() => {
            debug!("User dismissed alert");
            state.dismiss_alert();
        }

        // ========================================
        // Mode saisie
        // ========================================
        Event::Key(_) if is_escape_event(&event) && state.is_in_input_mode() => {
            info!("User cancelled search");
            state.cancel_input();
        }
        Event::Key(_) if is_enter_event(&event) && state.is_in_input_mode() => {
            // Le texte brut est envoyé : le contrôleur normalise et rejette le vide
            let query = state.submit_input();
            info!(%query, "User submitted search");
            send_command(command_tx, AppCommand::Search { query });
        }
        Event::Key(_) if is_backspace_event(&event) && state.is_in_input_mode() => {
            state.backspace();
        }
        Event::Key(_) if is_search_char_event(&event) && state.is_in_input_mode() => {
            if let Some(c) = get_char_from_event(&event) {
                state.append_char(c);
            }
        }
        Event::Key(_) if state.is_in_input_mode() => {}

        // ========================================
        // Dashboard
        // ========================================
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step : première pression demande confirmation
            if state.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                state.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                state.request_quit();
            }
        }

        Event::Key(_) if is_search_event(&event) => {
            state.cancel_quit();
            info!("User opened search");
            state.start_input(SEARCH_PROMPT.to_string());
        }

        Event::Key(_) if is_reload_event(&event) => {
            state.cancel_quit();
            info!("User requested trending reload");
            send_command(command_tx, AppCommand::LoadTrending);
        }

        Event::Key(_) if is_tab_event(&event) => {
            state.cancel_quit();
            state.toggle_focus();
            debug!(focus = ?state.focus, "User toggled focus");
        }

        Event::Key(_) if is_left_event(&event) && state.focus == Focus::Trending => {
            state.cancel_quit();
            state.select_previous();
        }
        Event::Key(_) if is_right_event(&event) && state.focus == Focus::Trending => {
            state.cancel_quit();
            state.select_next();
        }

        Event::Key(_) if is_enter_event(&event) && state.focus == Focus::Trending => {
            state.cancel_quit();
            if let Some(card) = state.selected_card() {
                info!(coin_id = %card.id, "User selected trending card");
                let coin_id = card.id.clone();
                send_command(command_tx, AppCommand::LoadCrypto { coin_id });
            }
        }

        Event::Key(_) if is_up_event(&event) && state.focus == Focus::Results => {
            state.cancel_quit();
            state.scroll_results_up();
        }
        Event::Key(_) if is_down_event(&event) && state.focus == Focus::Results => {
            state.cancel_quit();
            state.scroll_results_down();
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit
            state.cancel_quit();
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
