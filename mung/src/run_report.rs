use crate::bar_chart::render_drug_chart;
use crate::common::*;
use crate::drug_index::DrugIndex;
use crate::effect_data::EffectData;
use crate::fonts::setup_fonts;
use crate::heatmap::draw_selected_heatmap;
use crate::pdf_pages::PdfPages;
use crate::solution_table::read_solution_drugs;
use crate::threshold::{resolve_thresholds, Thresholds};
use fnv::FnvHashMap as HashMap;
use std::path::Path;

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// directory holding `*df_effect.*` and `*DICT_DRUG_PRE.*`
    #[arg(short = 'd', long, required = true)]
    pub dir: Box<str>,

    /// solution table (`..._t<threshold>_cont<threshold>.csv`)
    #[arg(short = 't', long, required = true)]
    pub table: Box<str>,

    /// survival-rate threshold in [-1, 1] (default: from the table name)
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<f32>,

    /// consistency threshold in [-1, 1] (default: from the table name)
    #[arg(long, allow_hyphen_values = true)]
    pub conthreshold: Option<f32>,

    /// drugs or drug instances to show in a heatmap, e.g. `A,B`
    #[arg(long, value_delimiter = ',')]
    pub names: Option<Vec<Box<str>>>,

    /// output directory
    #[arg(short = 'o', long, default_value = ".")]
    pub out: Box<str>,

    /// TrueType font for chart text
    #[arg(long)]
    pub font: Option<Box<str>>,
}

/// What a report run wrote
#[derive(Debug)]
pub struct ReportSummary {
    pub pdf_file: Box<str>,
    pub csv_file: Box<str>,
    pub heatmap_file: Option<Box<str>>,
    pub num_drugs: usize,
    pub num_rows: usize,
}

pub fn out_file(out_dir: &str, name: &str) -> Box<str> {
    Path::new(out_dir)
        .join(name)
        .to_string_lossy()
        .into_owned()
        .into_boxed_str()
}

/// One PDF page per drug of the solution table, the stacked effect
/// rows as CSV, and optionally a heatmap of selected drugs
pub fn run_report(args: &ReportArgs) -> anyhow::Result<ReportSummary> {
    if !Path::new(args.dir.as_ref()).is_dir() {
        return Err(anyhow::anyhow!("The directory does not exist: {}", args.dir));
    }
    if !Path::new(args.table.as_ref()).is_file() {
        return Err(anyhow::anyhow!(
            "The solution table (.csv) does not exist: {}",
            args.table
        ));
    }

    let data = EffectData::load_dir(&args.dir)?;
    let thresholds = resolve_thresholds(&args.table, args.threshold, args.conthreshold)?;

    let drugs = read_solution_drugs(&args.table)?;
    if drugs.is_empty() {
        return Err(anyhow::anyhow!("No drug found in {}", args.table));
    }
    info!("{} unique drugs in the solution table", drugs.len());

    let with_text = setup_fonts(args.font.as_deref());
    std::fs::create_dir_all(args.out.as_ref())?;

    let (pages, results) = report_drugs(&data, &drugs, &thresholds, with_text)?;
    if pages.is_empty() {
        return Err(anyhow::anyhow!(
            "None of the {} drugs has effect rows in {}",
            drugs.len(),
            args.dir
        ));
    }

    let pdf_file = out_file(&args.out, REPORT_PDF_FILE);
    let csv_file = out_file(&args.out, REPORT_CSV_FILE);
    let num_drugs = pages.save(&pdf_file)?;
    results.to_csv(&csv_file)?;
    info!("Figures are stored in {}", pdf_file);

    let heatmap_file = match args.names.as_deref() {
        Some(names) if !names.is_empty() => {
            let png = out_file(&args.out, HEATMAP_PNG_FILE);
            draw_selected_heatmap(&results, names, &png, with_text)?.then_some(png)
        }
        _ => None,
    };

    Ok(ReportSummary {
        pdf_file,
        csv_file,
        heatmap_file,
        num_drugs,
        num_rows: results.nrows(),
    })
}

/// Render every drug with effect rows; returns the pages and the
/// stacked rows in page order
pub fn report_drugs(
    data: &EffectData,
    drugs: &[Box<str>],
    thresholds: &Thresholds,
    with_text: bool,
) -> anyhow::Result<(PdfPages, NamedMat)> {
    let index = DrugIndex::from_ids(&data.drug_keys);
    info!("{} drugs in the dictionary", index.num_drugs());
    let effect = &data.effect;
    let effect_row: HashMap<&str, usize> = effect
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.as_ref(), i))
        .collect();

    let mut pages = PdfPages::new();
    let mut results = effect.empty_like();

    for drug in drugs {
        let mut rows: Vec<usize> = index
            .instances(drug)
            .iter()
            .filter_map(|id| effect_row.get(id.as_ref()).copied())
            .collect();
        rows.reverse();

        if rows.is_empty() {
            warn!("{}: no effect rows, skipped", drug);
            continue;
        }

        let sliced = effect.select_rows(&rows);
        pages.add_page(render_drug_chart(drug, &sliced, thresholds, with_text)?);
        results.append_rows(&sliced)?;
        info!("{}: {} instance(s)", drug, rows.len());
    }

    Ok((pages, results))
}
