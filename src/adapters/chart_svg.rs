//! Inline SVG balance chart for the web report.

use crate::adapters::web::escape_html;
use crate::domain::projection::PeriodRecord;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 240.0;
const PADDING: f64 = 40.0;

pub fn balance_chart_svg(periods: &[PeriodRecord]) -> String {
    if periods.is_empty() {
        return "<p class=\"chart-empty\">No projection data to chart.</p>".to_string();
    }

    // Zero is always inside the plotted range so the break-even line shows.
    let (min, max) = periods
        .iter()
        .flat_map(|p| [p.balance, p.available_funds])
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if periods.len() > 1 {
        plot_width / (periods.len() - 1) as f64
    } else {
        0.0
    };

    let x_at = |i: usize| PADDING + i as f64 * scale_x;
    let y_at = |v: f64| HEIGHT - PADDING - (v - min) * scale_y;

    let polyline = |value: fn(&PeriodRecord) -> f64| -> String {
        periods
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{:.1},{:.1}", x_at(i), y_at(value(p))))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let balance_points = polyline(|p: &PeriodRecord| p.balance);
    let funds_points = polyline(|p: &PeriodRecord| p.available_funds);
    let zero_y = y_at(0.0);

    let labels: String = periods
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"9\" text-anchor=\"middle\">{}</text>",
                x_at(i),
                HEIGHT - PADDING / 3.0,
                escape_html(&p.label)
            )
        })
        .collect();

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" class="balance-chart" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">
<line class="zero-line" x1="{pad:.0}" y1="{zero_y:.1}" x2="{x2:.0}" y2="{zero_y:.1}" stroke="#999" stroke-dasharray="4 3"/>
<polyline class="available-funds" fill="none" stroke="#4a90d9" stroke-width="2" points="{funds_points}"/>
<polyline class="balance" fill="none" stroke="#2e8b57" stroke-width="2" points="{balance_points}"/>
{labels}
</svg>"##,
        w = WIDTH,
        h = HEIGHT,
        pad = PADDING,
        x2 = WIDTH - PADDING,
    )
}
