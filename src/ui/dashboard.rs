// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine DashboardState avec les widgets de ratatui
//
// Disposition :
// ┌ header ─────────────────────────────┐
// │ cartes trending                      │
// │ résultats (panneaux présents)        │
// └ footer : raccourcis / saisie ───────┘
// + popups : chargement, alerte
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Clear : efface une zone avant d'y dessiner un popup
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{DashboardState, Focus, ResultSection, Screen};
use crate::ui::{chart, panels};

/// Hauteur minimale du graphique
const CHART_HEIGHT: u16 = 14;

/// Dessine l'interface complète
///
/// # Arguments
/// * `frame` - Surface de dessin ratatui
/// * `state` - État du dashboard (lecture seule)
pub fn render(frame: &mut Frame, state: &DashboardState) {
    let size = frame.size();
    let chunks = create_layout(size);

    render_header(frame, state, chunks[0]);
    render_trending(frame, state, chunks[1]);
    render_results(frame, state, chunks[2]);

    match state.current_screen {
        Screen::Dashboard => render_footer(frame, state, chunks[3]),
        Screen::InputMode => render_input_footer(frame, state, chunks[3]),
    }

    // Les popups passent par-dessus tout le reste
    if let Some(loading) = &state.loading {
        render_loading(frame, &loading.message, size);
    }
    if let Some(message) = &state.alert {
        render_alert(frame, message, size);
    }
}

/// Crée le layout principal (header, trending, résultats, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Cartes trending
            Constraint::Min(0),    // Résultats
            Constraint::Length(4), // Footer
        ])
        .split(area)
        .to_vec()
}

fn focus_border(state: &DashboardState, focus: Focus) -> Style {
    if state.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    }
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" CryptoDash ")
        .title_alignment(Alignment::Center);

    let current = match &state.current_coin_id {
        Some(coin) => Span::styled(format!("Actif : {}", coin), Style::default().fg(Color::White)),
        None => Span::styled("Aucun actif sélectionné", Style::default().fg(Color::Gray)),
    };

    let text = Line::from(vec![
        Span::styled(
            "🚀 Analyse et prédiction de cryptomonnaies",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        current,
    ]);

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Cartes trending
// ============================================================================

/// Dessine les cartes en ligne, la sélectionnée en inversé
///
/// CONCEPT RATATUI : Constraint::Ratio
/// - Chaque carte reçoit 1/n de la largeur
fn render_trending(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(state, Focus::Trending))
        .title(" 🔥 En tendance ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.trending.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "Aucune tendance chargée ([r] pour réessayer)",
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, inner);
        return;
    }

    let count = state.trending.len() as u32;
    let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner)
        .to_vec();

    for (index, (card, cell)) in state.trending.iter().zip(cells).enumerate() {
        let mut style = Style::default().fg(Color::White);
        if index == state.selected_index {
            style = style.add_modifier(Modifier::BOLD).add_modifier(Modifier::REVERSED);
        }

        let text = vec![
            Line::from(Span::styled(card.symbol.as_str(), style.fg(Color::Yellow))),
            Line::from(Span::styled(card.name.as_str(), style)),
        ];

        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), cell);
    }
}

// ============================================================================
// Résultats
// ============================================================================

/// Hauteur souhaitée d'une section
fn section_height(section: ResultSection) -> u16 {
    match section {
        ResultSection::Asset => panels::ASSET_PANEL_HEIGHT,
        ResultSection::Chart => CHART_HEIGHT,
        ResultSection::Analysis => panels::ANALYSIS_PANEL_HEIGHT,
        ResultSection::Prediction => panels::PREDICTION_PANEL_HEIGHT,
    }
}

/// Dessine les sections présentes à partir de results_offset
///
/// CONCEPT : Scroll par section
/// - Le graphique ne peut pas défiler ligne par ligne
/// - On saute donc des sections entières
fn render_results(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(state, Focus::Results))
        .title(" 📋 Résultats ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections: Vec<ResultSection> = state
        .result_sections()
        .into_iter()
        .skip(state.results_offset)
        .collect();

    if sections.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Sélectionnez une carte ou recherchez une cryptomonnaie ([/])",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
        return;
    }

    let mut constraints: Vec<Constraint> = sections
        .iter()
        .map(|&section| Constraint::Length(section_height(section)))
        .collect();
    constraints.push(Constraint::Min(0));

    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner)
        .to_vec();

    for (section, area) in sections.iter().zip(areas) {
        if area.height == 0 {
            break;
        }
        match section {
            ResultSection::Asset => {
                if let Some(panel) = &state.asset_panel {
                    panels::render_asset_panel(frame, panel, area);
                }
            }
            ResultSection::Chart => chart::render_price_chart(frame, state, area),
            ResultSection::Analysis => {
                if let Some(panel) = &state.analysis_panel {
                    panels::render_analysis_panel(frame, panel, area);
                }
            }
            ResultSection::Prediction => {
                if let Some(panel) = &state.prediction_panel {
                    panels::render_prediction_panel(frame, panel, area);
                }
            }
        }
    }
}

// ============================================================================
// Footer
// ============================================================================

fn shortcut(key: &str, color: Color) -> Span<'_> {
    Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = if state.is_awaiting_quit_confirmation() {
        vec![Line::from(vec![
            Span::styled("⚠  Appuyez sur ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])]
    } else {
        vec![
            Line::from(vec![
                shortcut("[q]", Color::Yellow),
                Span::raw(" Quitter  "),
                shortcut("[/]", Color::Green),
                Span::raw(" Rechercher  "),
                shortcut("[←→]", Color::Yellow),
                Span::raw(" Cartes  "),
                shortcut("[Enter]", Color::Yellow),
                Span::raw(" Charger  "),
            ]),
            Line::from(vec![
                shortcut("[Tab]", Color::Yellow),
                Span::raw(" Focus  "),
                shortcut("[↑↓ / j k]", Color::Yellow),
                Span::raw(" Défiler  "),
                shortcut("[r]", Color::Green),
                Span::raw(" Recharger tendances"),
            ]),
        ]
    };

    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Dessine le footer en mode saisie
fn render_input_footer(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let input_line = Line::from(vec![
        Span::styled(
            state.input_prompt.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(state.input_buffer.as_str(), Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK)),
    ]);

    let help_line = Line::from(vec![
        shortcut("[Enter]", Color::Green),
        Span::raw(" Valider  "),
        shortcut("[ESC]", Color::Red),
        Span::raw(" Annuler"),
    ]);

    let paragraph = Paragraph::new(vec![input_line, help_line])
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Popups
// ============================================================================

/// Zone centrée de taille fixe (bornée par la zone parente)
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_loading(frame: &mut Frame, message: &str, area: Rect) {
    let popup = centered_rect(44, 5, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" ⏳ Chargement ");

    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message)])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn render_alert(frame: &mut Frame, message: &str, area: Rect) {
    let popup = centered_rect(60, 7, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Alerte ");

    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(message, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled("[n'importe quelle touche] Fermer", Style::default().fg(Color::Gray))),
    ])
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

// ============================================================================
// Tests
// ============================================================================
