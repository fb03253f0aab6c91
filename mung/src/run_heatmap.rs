use crate::common::*;
use crate::fonts::setup_fonts;
use crate::heatmap::draw_selected_heatmap;
use crate::run_report::out_file;

#[derive(Args, Debug, Clone)]
pub struct HeatmapArgs {
    /// results table written by `report`
    #[arg(short = 'e', long, default_value = REPORT_CSV_FILE)]
    pub effect: Box<str>,

    /// drugs or drug instances to show, e.g. `A,B`
    #[arg(long, value_delimiter = ',', required = true)]
    pub names: Vec<Box<str>>,

    /// output directory
    #[arg(short = 'o', long, default_value = ".")]
    pub out: Box<str>,

    /// TrueType font for chart text
    #[arg(long)]
    pub font: Option<Box<str>>,
}

/// Redraw the heatmap from an existing results table
pub fn run_heatmap(args: &HeatmapArgs) -> anyhow::Result<Option<Box<str>>> {
    let results = Mat::from_csv_with_names(&args.effect)?;
    let with_text = setup_fonts(args.font.as_deref());

    let png = out_file(&args.out, HEATMAP_PNG_FILE);
    Ok(draw_selected_heatmap(&results, &args.names, &png, with_text)?.then_some(png))
}
