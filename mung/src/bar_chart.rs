use crate::colormap::series_color;
use crate::common::*;
use crate::drug_index::dose_field;
use crate::fonts::FONT_FAMILY;
use crate::threshold::Thresholds;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub const PAGE_WIDTH: u32 = 1500;
pub const PAGE_HEIGHT: u32 = 500;
const LEGEND_WIDTH: u32 = 180;
const GROUP_WIDTH: f64 = 0.7;

/// Horizontal dotted line made of short segments
fn dotted_line(x0: f64, x1: f64, y: f64, color: RGBColor) -> Vec<PathElement<(f64, f64)>> {
    let step = (x1 - x0) / 200.0;
    (0..200)
        .step_by(2)
        .map(|i| {
            let a = x0 + i as f64 * step;
            PathElement::new(vec![(a, y), (a + step, y)], color.stroke_width(2))
        })
        .collect()
}

/// Dotted cutoff lines: height, color and label
fn cutoff_lines(thresholds: &Thresholds) -> [(f64, RGBColor, String); 2] {
    let t = thresholds.threshold;
    let c = thresholds.con_threshold;
    [
        (t as f64, RGBColor(255, 0, 0), format!("threshold={}", t)),
        (c as f64, RGBColor(0, 0, 255), format!("con. threshold={}", c)),
    ]
}

/// Grouped bars of one drug: clusters on x, one bar per instance
///
/// * `drug` - title
/// * `effect` - instances x clusters
/// * `with_text` - draw title, tick labels and legend text
pub fn render_drug_chart(
    drug: &str,
    effect: &NamedMat,
    thresholds: &Thresholds,
    with_text: bool,
) -> anyhow::Result<RgbPage> {
    let mut page = RgbPage::blank(PAGE_WIDTH, PAGE_HEIGHT);
    let ninst = effect.nrows();
    let nclust = effect.ncols();
    let xmax = nclust as f64 - 0.5;

    {
        let root =
            BitMapBackend::with_buffer(&mut page.rgb, (PAGE_WIDTH, PAGE_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;
        let (plot_area, legend_area) = root.split_horizontally(PAGE_WIDTH - LEGEND_WIDTH);

        let mut builder = ChartBuilder::on(&plot_area);
        builder.margin(20);
        if with_text {
            builder
                .caption(drug, (FONT_FAMILY, 24).into_font().style(FontStyle::Bold))
                .x_label_area_size(45)
                .y_label_area_size(60);
        }
        let mut chart = builder.build_cartesian_2d(-0.5..xmax, -1.0..1.0)?;

        if with_text {
            let cols = &effect.cols;
            let cluster_label = |x: &f64| {
                let k = x.round();
                if (x - k).abs() < 1e-6 && k >= 0.0 && (k as usize) < cols.len() {
                    cols[k as usize].to_string()
                } else {
                    String::new()
                }
            };
            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(nclust.max(2))
                .x_label_formatter(&cluster_label)
                .y_labels(5)
                .y_label_formatter(&|y| format!("{:.1}", y))
                .x_desc("cluster")
                .y_desc("survival rate")
                .draw()?;
        } else {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(-0.5, -1.0), (xmax, 1.0)],
                BLACK.stroke_width(1),
            )))?;
        }

        let bar_width = GROUP_WIDTH / ninst.max(1) as f64;
        let mut bars = Vec::with_capacity(ninst * nclust);
        for (k, row) in effect.mat.outer_iter().enumerate() {
            let color = series_color(k, ninst);
            for (c, &v) in row.iter().enumerate() {
                if v.is_nan() {
                    continue;
                }
                let x0 = c as f64 - GROUP_WIDTH / 2.0 + k as f64 * bar_width;
                bars.push(Rectangle::new(
                    [(x0, 0.0), (x0 + bar_width, v as f64)],
                    color.filled(),
                ));
            }
        }
        chart.draw_series(bars)?;

        chart.draw_series(LineSeries::new(
            vec![(-0.5, 0.0), (xmax, 0.0)],
            BLACK.stroke_width(1),
        ))?;

        for (y, color, label) in cutoff_lines(thresholds) {
            chart.draw_series(dotted_line(-0.5, xmax, y, color))?;
            if with_text {
                let style = (FONT_FAMILY, 15)
                    .into_font()
                    .color(&color)
                    .pos(Pos::new(HPos::Right, VPos::Bottom));
                chart.draw_series(std::iter::once(Text::new(
                    label,
                    (xmax, y),
                    style,
                )))?;
            }
        }

        for (k, id) in effect.rows.iter().enumerate() {
            let y = 30 + 22 * k as i32;
            legend_area.draw(&Rectangle::new(
                [(10, y), (30, y + 14)],
                series_color(k, ninst).filled(),
            ))?;
            if with_text {
                legend_area.draw(&Text::new(
                    format!("{} μM", dose_field(id)),
                    (36, y),
                    (FONT_FAMILY, 15).into_font(),
                ))?;
            }
        }

        root.present()?;
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn cutoff_labels() {
        let thresholds = Thresholds {
            threshold: -0.3,
            con_threshold: 0.2,
        };
        let [(t, _, t_label), (c, _, c_label)] = cutoff_lines(&thresholds);
        assert_eq!(t_label, "threshold=-0.3");
        assert_eq!(c_label, "con. threshold=0.2");
        approx::assert_abs_diff_eq!(t, -0.3, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(c, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn textless_chart_draws_bars() -> anyhow::Result<()> {
        let effect = MatWithNames {
            rows: vec!["D_10_24h".into(), "D_1_24h".into()],
            cols: vec!["0".into(), "1".into(), "2".into()],
            mat: array![[-0.8_f32, 0.4, f32::NAN], [0.2, -0.1, -0.5]],
        };
        let thresholds = Thresholds {
            threshold: -0.3,
            con_threshold: 0.2,
        };

        let page = render_drug_chart("D", &effect, &thresholds, false)?;
        assert_eq!(page.rgb.len(), (PAGE_WIDTH * PAGE_HEIGHT * 3) as usize);

        // some pixels carry the first series' yellow
        let first = series_color(0, 2);
        let found = page
            .rgb
            .chunks(3)
            .any(|p| p[0] == first.0 && p[1] == first.1 && p[2] == first.2);
        assert!(found);
        Ok(())
    }
}
