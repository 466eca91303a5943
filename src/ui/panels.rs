// ============================================================================
// Panels - Rendu des panneaux de résultats
// ============================================================================
// Chaque fonction dessine un view-model (crate::view) dans une zone
//
// CONCEPT : Séparation view-model / rendu
// - Les textes et tonalités sont déjà calculés (testables sans terminal)
// - Ici on ne choisit que les couleurs et la mise en page
// ============================================================================

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::view::{AnalysisPanel, AssetPanel, PredictionPanel, SignalTone, Tone};

/// Couleur associée à une tonalité
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => Color::Green,
        Tone::Negative => Color::Red,
    }
}

fn signal_style(tone: SignalTone) -> Style {
    let (fg, bg) = match tone {
        SignalTone::Buy => (Color::Black, Color::Green),
        SignalTone::Sell => (Color::White, Color::Red),
        SignalTone::Hold => (Color::Black, Color::Yellow),
        SignalTone::Neutral => (Color::White, Color::DarkGray),
    };
    Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD)
}

fn label(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().fg(Color::Gray))
}

fn value(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
}

/// Hauteur de chaque panneau (bordures comprises)
pub const ASSET_PANEL_HEIGHT: u16 = 7;
pub const ANALYSIS_PANEL_HEIGHT: u16 = 8;
pub const PREDICTION_PANEL_HEIGHT: u16 = 8;

/// Panneau principal : prix, variation, métriques
pub fn render_asset_panel(frame: &mut Frame, panel: &AssetPanel, area: Rect) {
    let color = tone_color(panel.tone);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" 🪙 {} ", panel.title));

    let mut lines = vec![
        Line::from(vec![
            Span::styled(panel.price.as_str(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(format!("{} {}", panel.tone.arrow(), panel.change), Style::default().fg(color)),
        ]),
        Line::from(vec![label("Market Cap   "), value(&panel.market_cap)]),
        Line::from(vec![label("Volume 24h   "), value(&panel.volume_24h)]),
        Line::from(vec![label("Haut/Bas 24h "), value(&panel.high_low)]),
    ];

    if let Some(updated) = &panel.last_updated {
        lines.push(Line::from(vec![label("Mis à jour   "), Span::raw(updated.as_str())]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Panneau d'analyse technique : moyennes, indicateurs, signal, supports
pub fn render_analysis_panel(frame: &mut Frame, panel: &AnalysisPanel, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 📊 Analyse technique ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // CONCEPT RATATUI : Layout horizontal en trois colonnes
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Percentage(35),
        ])
        .split(inner)
        .to_vec();

    let mut averages = vec![
        Line::from(Span::styled("Moyennes mobiles", Style::default().fg(Color::Cyan))),
        Line::from(vec![label("SMA 20 "), value(&panel.sma_20)]),
        Line::from(vec![label("SMA 50 "), value(&panel.sma_50)]),
    ];
    if let Some(ema) = &panel.ema_12 {
        averages.push(Line::from(vec![label("EMA 12 "), value(ema)]));
    }
    if let Some(ema) = &panel.ema_26 {
        averages.push(Line::from(vec![label("EMA 26 "), value(ema)]));
    }

    let indicators = vec![
        Line::from(Span::styled("Indicateurs", Style::default().fg(Color::Cyan))),
        Line::from(vec![label("RSI  "), value(&panel.rsi)]),
        Line::from(vec![label("MACD "), value(&panel.macd)]),
        Line::from(vec![label("Tendance "), value(&panel.trend)]),
    ];

    let signal = vec![
        Line::from(Span::styled("Signal", Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(format!(" {} ", panel.signal_label), signal_style(panel.signal_tone))),
        Line::from(vec![label("Support     "), value(&panel.support)]),
        Line::from(vec![label("Résistance  "), value(&panel.resistance)]),
    ];

    frame.render_widget(Paragraph::new(averages), columns[0]);
    frame.render_widget(Paragraph::new(indicators), columns[1]);
    frame.render_widget(Paragraph::new(signal), columns[2]);
}

/// Panneau de prédiction avec jauge de confiance
pub fn render_prediction_panel(frame: &mut Frame, panel: &PredictionPanel, area: Rect) {
    let color = tone_color(panel.tone);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!(" 🧠 {} ", panel.heading));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Prix prédit
            Constraint::Length(1), // Jauge
            Constraint::Min(0),    // Détails
        ])
        .split(inner)
        .to_vec();

    let headline = Line::from(vec![
        Span::styled(panel.predicted_price.as_str(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(format!("{} {}", panel.tone.arrow(), panel.change), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(headline), rows[0]);

    // CONCEPT RATATUI : Gauge
    // - ratio() attend une valeur dans [0, 1]
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::DarkGray))
        .ratio(panel.confidence_ratio.clamp(0.0, 1.0))
        .label(format!("Confiance du modèle {}", panel.confidence_label));
    frame.render_widget(gauge, rows[1]);

    let mut details = vec![
        Line::from(vec![label("Prix actuel "), value(&panel.current_price)]),
        Line::from(vec![label("Modèle      "), Span::raw(panel.model.as_str())]),
    ];
    if let Some(date) = &panel.prediction_date {
        details.push(Line::from(vec![label("Base        "), Span::raw(date.as_str())]));
    }
    frame.render_widget(Paragraph::new(details), rows[2]);
}
