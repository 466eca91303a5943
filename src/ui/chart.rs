// ============================================================================
// Chart - Rendu du graphique de prix historique
// ============================================================================
// Dessine la série liée au handle actif du ChartRegistry
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : configuration des axes X et Y
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::DashboardState;
use crate::view::chart::RenderedSeries;
use crate::view::format_usd;

/// Dessine le graphique de prix si un graphique est vivant
pub fn render_price_chart(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let series = state.chart.and_then(|handle| state.charts.get(handle));

    match series {
        Some(series) if !series.points.is_empty() => render_series(frame, series, area),
        _ => render_no_data(frame, area, "Pas de données historiques"),
    }
}

/// Dessine une série sous forme de ligne
///
/// CONCEPT RUST : Iterator chaining
/// - .enumerate() : l'index devient l'abscisse
/// - .map() : transforme en points (x, y)
fn render_series(frame: &mut Frame, series: &RenderedSeries, area: Rect) {
    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.price))
        .collect();

    let Some((min_price, max_price)) = series.price_bounds() else {
        render_no_data(frame, area, "Pas de données historiques");
        return;
    };

    // Marge de 5% pour que le graphique respire
    let margin = ((max_price - min_price) * 0.05).max(max_price.abs() * 0.001);
    let y_min = (min_price - margin).max(0.0);
    let y_max = max_price + margin;

    // Couleur selon l'évolution sur la période
    let first = points.first().map(|p| p.1).unwrap_or_default();
    let last = points.last().map(|p| p.1).unwrap_or_default();
    let color = if last >= first { Color::Green } else { Color::Red };

    let datasets = vec![Dataset::default()
        .name(series.title.as_str())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    // Labels X : première, milieu et dernière date
    let first_label = series.points.first().map(|p| p.label.clone()).unwrap_or_default();
    let middle_label = series.points[series.points.len() / 2].label.clone();
    let last_label = series.points.last().map(|p| p.label.clone()).unwrap_or_default();

    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (points.len().saturating_sub(1)).max(1) as f64])
        .labels(vec![
            Span::raw(first_label),
            Span::raw(middle_label),
            Span::raw(last_label),
        ]);

    let y_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format_usd(y_min)),
            Span::raw(format_usd((y_min + y_max) / 2.0)),
            Span::raw(format_usd(y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" 📈 Prix historique ({} points) ", series.points.len())),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Message quand il n'y a rien à dessiner
fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" 📈 Prix historique ");

    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(message, Style::default().fg(Color::Gray)))])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
