use crate::report::SizeReport;
use anyhow::{anyhow, Result};
use plotters::prelude::*;
use std::path::Path;

pub type Series = (String, Vec<(f64, f64)>);

fn series<F>(reports: &[SizeReport], codes: &[String], value: F) -> Vec<Series>
where
    F: Fn(&SizeReport, &str) -> Option<f64>,
{
    codes
        .iter()
        .map(|code| {
            let points = reports
                .iter()
                .filter_map(|r| value(r, code.as_str()).map(|v| (r.size as f64, v)))
                .collect();
            (code.clone(), points)
        })
        .collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Draws one line per series into an SVG file.
pub fn line_chart<P: AsRef<Path>>(
    path: P,
    title: &str,
    y_desc: &str,
    data: &[Series],
) -> Result<()> {
    let (x_min, x_max) = bounds(data.iter().flat_map(|(_, p)| p.iter().map(|&(x, _)| x)))
        .ok_or_else(|| anyhow!("Nothing to plot for '{}'", title))?;
    let (y_min, y_max) = bounds(data.iter().flat_map(|(_, p)| p.iter().map(|&(_, y)| y)))
        .ok_or_else(|| anyhow!("Nothing to plot for '{}'", title))?;
    let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };
    let y_min = y_min.min(0.0);
    let y_max = if y_max > y_min { y_max * 1.1 } else { y_min + 1.0 };

    let root = SVGBackend::new(path.as_ref(), (960, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Size")
        .y_desc(y_desc)
        .draw()?;

    for (idx, (code, points)) in data.iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let color = Palette99::pick(idx).mix(0.9);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(code.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))?;
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

pub fn plot_times<P: AsRef<Path>>(reports: &[SizeReport], codes: &[String], path: P) -> Result<()> {
    let data = series(reports, codes, |r, code| r.mean_time(code));
    line_chart(path, "Mean solve time", "Time (s)", &data)
}

pub fn plot_gaps<P: AsRef<Path>>(reports: &[SizeReport], codes: &[String], path: P) -> Result<()> {
    let data = series(reports, codes, |r, code| r.gap(code));
    line_chart(path, "Mean gap to optimum", "Gap (%)", &data)
}
