use insights_common::format::{millions, money, percent, thousands};
use insights_common::metrics::DashboardMetrics;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType, Paragraph, Row, Table,
    },
    Frame,
};

use super::style::panel;

const PALETTE: [Color; 8] = [
    Color::LightBlue,
    Color::LightGreen,
    Color::LightMagenta,
    Color::Yellow,
    Color::LightRed,
    Color::Cyan,
    Color::White,
    Color::LightYellow,
];

fn segment_color(metrics: &DashboardMetrics, segment: &str) -> Color {
    let index = metrics
        .segment_stats
        .iter()
        .position(|s| s.segment == segment)
        .unwrap_or(0);
    PALETTE[index % PALETTE.len()]
}

pub fn draw(frame: &mut Frame, area: Rect, metrics: &DashboardMetrics) {
    let segments = metrics.segment_stats.len() as u16;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(segments.max(1) + 2),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(segments + 3),
        ])
        .split(area);

    draw_kpis(frame, rows[0], metrics);
    draw_distributions(frame, rows[1], metrics);

    let insight = match &metrics.top_segment {
        Some(top) => Line::from(vec![
            Span::raw("Insight: the segment "),
            Span::raw(format!("'{}'", top.segment)).bold(),
            Span::raw(" generates "),
            Span::raw(format!("{:.1}%", top.share_pct)).bold(),
            Span::raw(" of total revenue."),
        ]),
        None => Line::from("No segmented customers to analyse."),
    };
    frame.render_widget(
        Paragraph::new(insight).style(Style::new().fg(Color::LightBlue)),
        rows[2],
    );

    draw_rfm(frame, rows[3], metrics);
    draw_segment_stats(frame, rows[4], metrics);
}

fn draw_kpis(frame: &mut Frame, area: Rect, metrics: &DashboardMetrics) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1); 4])
        .split(area);

    let kpis = [
        ("Total Customers", thousands(metrics.total_customers)),
        (
            "Total Revenue",
            format!("{} (Lifetime)", millions(metrics.total_revenue)),
        ),
        ("Avg. Order Value", money(metrics.avg_ticket)),
        ("Returning Clients", percent(metrics.returning_pct)),
    ];
    for ((title, value), column) in kpis.into_iter().zip(columns.iter()) {
        let paragraph = Paragraph::new(Line::from(value).bold()).block(panel(title, false));
        frame.render_widget(paragraph, *column);
    }
}

fn draw_distributions(frame: &mut Frame, area: Rect, metrics: &DashboardMetrics) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1); 2])
        .split(area);

    let counts: Vec<Bar> = metrics
        .customers_by_segment
        .iter()
        .map(|(segment, count)| {
            Bar::default()
                .value(*count as u64)
                .label(segment.as_str().into())
                .text_value(thousands(*count))
        })
        .collect();
    let revenue: Vec<Bar> = metrics
        .revenue_by_segment
        .iter()
        .map(|(segment, spend)| {
            Bar::default()
                .value(spend.max(0.0).round() as u64)
                .label(segment.as_str().into())
                .text_value(millions(*spend))
        })
        .collect();

    frame.render_widget(
        bar_chart("Customer Distribution", &counts, Color::LightBlue),
        columns[0],
    );
    frame.render_widget(
        bar_chart("Revenue Share", &revenue, Color::LightGreen),
        columns[1],
    );
}

fn bar_chart<'a>(title: &str, bars: &[Bar<'a>], color: Color) -> BarChart<'a> {
    BarChart::default()
        .block(panel(title, false))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::new().fg(color))
        .value_style(Style::new().fg(Color::Black).bg(color))
        .data(BarGroup::default().bars(bars))
}

fn draw_rfm(frame: &mut Frame, area: Rect, metrics: &DashboardMetrics) {
    let mut series: Vec<(String, Vec<(f64, f64)>)> = metrics
        .segment_stats
        .iter()
        .map(|s| (s.segment.clone(), Vec::new()))
        .collect();
    for point in &metrics.rfm_points {
        if let Some((_, points)) = series.iter_mut().find(|(s, _)| *s == point.segment) {
            points.push((f64::from(point.recency_days), point.total_spend));
        }
    }

    let max_recency = metrics
        .rfm_points
        .iter()
        .map(|p| f64::from(p.recency_days))
        .fold(1.0, f64::max);
    let max_spend = metrics
        .rfm_points
        .iter()
        .map(|p| p.total_spend)
        .fold(1.0, f64::max);

    let datasets = series
        .iter()
        .map(|(segment, points)| {
            Dataset::default()
                .name(segment.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::new().fg(segment_color(metrics, segment)))
                .data(points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(panel(
            "RFM Segmentation Matrix (Recency vs. Monetary)",
            false,
        ))
        .x_axis(
            Axis::default()
                .title("Recency (days, lower is better)")
                .style(Style::new().fg(Color::Gray))
                .bounds([0.0, max_recency])
                .labels(axis_labels(max_recency)),
        )
        .y_axis(
            Axis::default()
                .title("Monetary (BRL)")
                .style(Style::new().fg(Color::Gray))
                .bounds([0.0, max_spend])
                .labels(axis_labels(max_spend)),
        );
    frame.render_widget(chart, area);
}

fn axis_labels(max: f64) -> Vec<Span<'static>> {
    vec![
        Span::raw("0"),
        Span::raw(format!("{:.0}", max / 2.0)),
        Span::raw(format!("{max:.0}")),
    ]
}

fn draw_segment_stats(frame: &mut Frame, area: Rect, metrics: &DashboardMetrics) {
    let rows = metrics.segment_stats.iter().map(|s| {
        Row::new(vec![
            s.segment.clone(),
            format!("{:.2}", s.avg_spend),
            format!("{:.2}", s.avg_recency_days),
            format!("{:.2}", s.avg_orders),
        ])
        .style(Style::new().fg(segment_color(metrics, &s.segment)))
    });
    let table = Table::new(rows, [Constraint::Fill(1); 4])
        .header(
            Row::new(vec![
                "Segment",
                "Avg Spend (Monetary)",
                "Avg Days Ago (Recency)",
                "Avg Orders (Frequency)",
            ])
            .style(Style::new().bold().bg(Color::LightBlue)),
        )
        .block(panel("Segment statistics", false));
    frame.render_widget(table, area);
}
