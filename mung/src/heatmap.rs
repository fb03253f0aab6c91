use crate::colormap::suppression_color;
use crate::common::*;
use crate::drug_index::drug_prefix;
use crate::fonts::FONT_FAMILY;
use fnv::FnvHashSet as HashSet;
use matrix_util::common_io::mkdir_parent;
use plotters::prelude::*;

const LIGHTGREY: RGBColor = RGBColor(211, 211, 211);
const COLORBAR_WIDTH: u32 = 110;
const COLORBAR_STEPS: usize = 100;

/// Rows of `results` requested by `names`.
///
/// If the first name contains `_`, names are instance ids and rows
/// follow the order of `names`; otherwise they are drug prefixes and
/// rows follow the table.
pub fn select_heatmap_rows(results: &NamedMat, names: &[Box<str>]) -> Option<NamedMat> {
    let first = names.first()?;

    let rows: Vec<usize> = if first.contains('_') {
        names
            .iter()
            .flat_map(move |name| {
                results
                    .rows
                    .iter()
                    .enumerate()
                    .filter(move |(_, id)| *id == name)
                    .map(|(i, _)| i)
            })
            .collect()
    } else {
        let wanted: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();
        results
            .rows
            .iter()
            .enumerate()
            .filter(|(_, id)| wanted.contains(drug_prefix(id)))
            .map(|(i, _)| i)
            .collect()
    };

    if rows.is_empty() {
        None
    } else {
        Some(results.select_rows(&rows))
    }
}

/// Only suppression is shown: positive effects become 0
pub fn clip_to_suppression(selected: &mut NamedMat) {
    selected
        .mat
        .mapv_inplace(|x| if x > 0.0 { 0.0 } else { x });
}

/// Select, clip and draw the heatmap into `png_file`.
///
/// Returns `false`, with a warning, when nothing matched `names`.
pub fn draw_selected_heatmap(
    results: &NamedMat,
    names: &[Box<str>],
    png_file: &str,
    with_text: bool,
) -> anyhow::Result<bool> {
    let Some(mut selected) = select_heatmap_rows(results, names) else {
        warn!("none of [{}] found in the results", names.join(", "));
        return Ok(false);
    };
    clip_to_suppression(&mut selected);

    mkdir_parent(png_file)?;
    render_heatmap(&selected, png_file, with_text)?;
    info!(
        "heatmap of {} x {} saved to {}",
        selected.nrows(),
        selected.ncols(),
        png_file
    );
    Ok(true)
}

fn render_heatmap(selected: &NamedMat, png_file: &str, with_text: bool) -> anyhow::Result<()> {
    let nrows = selected.nrows();
    let ncols = selected.ncols();
    let width = 1200_u32;
    let height = (80 + 24 * nrows as u32).max(300);

    let root = BitMapBackend::new(png_file, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let (main_area, bar_area) = root.split_horizontally(width - COLORBAR_WIDTH);

    let mut builder = ChartBuilder::on(&main_area);
    builder.margin(15);
    if with_text {
        builder.x_label_area_size(40).y_label_area_size(220);
    }
    let mut chart = builder.build_cartesian_2d(
        (0..ncols as i32).into_segmented(),
        (0..nrows as i32).into_segmented(),
    )?;

    if with_text {
        let cols = &selected.cols;
        let rows = &selected.rows;
        let col_label = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(j) if (*j as usize) < cols.len() => cols[*j as usize].to_string(),
            _ => String::new(),
        };
        // first row on top
        let row_label = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) if (*i as usize) < rows.len() => {
                rows[rows.len() - 1 - *i as usize].to_string()
            }
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(ncols)
            .y_labels(nrows)
            .x_label_formatter(&col_label)
            .y_label_formatter(&row_label)
            .label_style((FONT_FAMILY, 14))
            .draw()?;
    }

    let mut cells = Vec::with_capacity(nrows * ncols * 2);
    for (i, row) in selected.mat.outer_iter().enumerate() {
        let y = (nrows - 1 - i) as i32;
        for (j, &v) in row.iter().enumerate() {
            let x = j as i32;
            let corners = [
                (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
            ];
            cells.push(Rectangle::new(corners.clone(), suppression_color(v).filled()));
            cells.push(Rectangle::new(corners, LIGHTGREY.stroke_width(1)));
        }
    }
    chart.draw_series(cells)?;

    let mut bar_builder = ChartBuilder::on(&bar_area);
    bar_builder.margin_top(15).margin_bottom(55).margin_right(10);
    if with_text {
        bar_builder.right_y_label_area_size(50);
    }
    let mut bar = bar_builder.build_cartesian_2d(0.0..1.0, -1.0..0.0)?;

    let step = 1.0 / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|s| {
        let y0 = -1.0 + s as f64 * step;
        Rectangle::new(
            [(0.0, y0), (1.0, y0 + step)],
            suppression_color((y0 + step / 2.0) as f32).filled(),
        )
    }))?;
    bar.draw_series(std::iter::once(Rectangle::new(
        [(0.0, -1.0), (1.0, 0.0)],
        LIGHTGREY.stroke_width(1),
    )))?;

    if with_text {
        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_label_formatter(&|y| format!("{:.2}", y))
            .label_style((FONT_FAMILY, 14))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn results() -> NamedMat {
        MatWithNames {
            rows: vec!["A_1_24h".into(), "B_1_24h".into(), "A_10_24h".into()],
            cols: vec!["0".into(), "1".into()],
            mat: array![[0.5_f32, -0.2], [-0.9, 0.1], [0.0, -1.0]],
        }
    }

    #[test]
    fn select_by_prefix_or_instance() {
        let res = results();

        let names: Vec<Box<str>> = vec!["A".into()];
        let sel = select_heatmap_rows(&res, &names).unwrap();
        assert_eq!(sel.nrows(), 2);
        assert_eq!(sel.rows[0].as_ref(), "A_1_24h");
        assert_eq!(sel.rows[1].as_ref(), "A_10_24h");

        let names: Vec<Box<str>> = vec!["B_1_24h".into(), "A".into()];
        let sel = select_heatmap_rows(&res, &names).unwrap();
        assert_eq!(sel.nrows(), 1);
        assert_eq!(sel.rows[0].as_ref(), "B_1_24h");

        let names: Vec<Box<str>> = vec!["C".into()];
        assert!(select_heatmap_rows(&res, &names).is_none());
        assert!(select_heatmap_rows(&res, &[]).is_none());
    }

    #[test]
    fn instance_rows_follow_requested_order() {
        let res = results();
        let names: Vec<Box<str>> = vec!["A_10_24h".into(), "Z_1_24h".into(), "B_1_24h".into()];
        let sel = select_heatmap_rows(&res, &names).unwrap();
        let rows: Vec<&str> = sel.rows.iter().map(|r| r.as_ref()).collect();
        assert_eq!(rows, vec!["A_10_24h", "B_1_24h"]);
        assert_eq!(sel.mat[(0, 1)], -1.0);
        assert_eq!(sel.mat[(1, 0)], -0.9);
    }

    #[test]
    fn positive_effects_become_zero() {
        let mut sel = results();
        clip_to_suppression(&mut sel);
        assert_eq!(sel.mat[(0, 0)], 0.0);
        assert_eq!(sel.mat[(1, 1)], 0.0);
        assert_eq!(sel.mat[(1, 0)], -0.9);
        assert!(sel.mat.iter().all(|&x| x <= 0.0));
    }

    #[test]
    fn nothing_selected_writes_nothing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let png = dir.path().join("heatmap.png");
        let names: Vec<Box<str>> = vec!["Z".into()];
        assert!(!draw_selected_heatmap(&results(), &names, png.to_str().unwrap(), false)?);
        assert!(!png.exists());
        Ok(())
    }

    #[test]
    fn textless_heatmap_is_written() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let png = dir.path().join("heatmap.png");
        let names: Vec<Box<str>> = vec!["A".into()];
        assert!(draw_selected_heatmap(&results(), &names, png.to_str().unwrap(), false)?);
        assert!(png.is_file());
        Ok(())
    }
}
