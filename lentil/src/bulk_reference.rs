use crate::common::*;
use crate::gctx::GctxReader;
use crate::geo_download::*;
use fnv::{FnvHashMap as HashMap, FnvHashSet as HashSet};
use matrix_util::common_io::{read_lines_of_words_delim, strip_gz};
use std::collections::BTreeMap;
use std::path::Path;

/// Local paths of the three LINCS inputs
pub struct LincsFiles {
    pub inst_info: Box<str>,
    pub gene_info: Box<str>,
    pub gctx: Box<str>,
}

impl LincsFiles {
    pub fn in_dir(data: &ReferenceDataArgs) -> Self {
        let gctx = data.data_file(LINCS_LEVEL3_GCTX.file_name);
        Self {
            inst_info: data.data_file(LINCS_INST_INFO.file_name),
            gene_info: data.data_file(LINCS_GENE_INFO.file_name),
            gctx: strip_gz(&gctx).into(),
        }
    }
}

/// integer ids are compared by value, `"780"` == `"780.0"` etc.
fn normalize_id(id: &str) -> Box<str> {
    let id = id.trim();
    match id.parse::<f64>() {
        Ok(x) if x.fract() == 0.0 && x.abs() < 1e15 => format!("{}", x as i64).into(),
        _ => id.into(),
    }
}

fn header_index(header: &[Box<str>], name: &str, file: &str) -> anyhow::Result<usize> {
    header
        .iter()
        .position(|x| x.as_ref() == name)
        .ok_or(anyhow::anyhow!("column `{}` not found in {}", name, file))
}

/// `inst_id`s profiled in `cell`, in file order
pub fn select_instances(inst_info_file: &str, cell: &str) -> anyhow::Result<Vec<Box<str>>> {
    let data = read_lines_of_words_delim(inst_info_file, "\t", 0)?;
    let inst_col = header_index(&data.header, "inst_id", inst_info_file)?;
    let cell_col = header_index(&data.header, "cell_id", inst_info_file)?;

    Ok(data
        .lines
        .into_iter()
        .filter(|w| w.len() > inst_col.max(cell_col) && w[cell_col].as_ref() == cell)
        .map(|w| w[inst_col].clone())
        .collect())
}

/// `pr_gene_id` -> `pr_gene_symbol`
pub fn read_gene_symbols(gene_info_file: &str) -> anyhow::Result<HashMap<Box<str>, Box<str>>> {
    let data = read_lines_of_words_delim(gene_info_file, "\t", 0)?;
    let id_col = header_index(&data.header, "pr_gene_id", gene_info_file)?;
    let symbol_col = header_index(&data.header, "pr_gene_symbol", gene_info_file)?;

    Ok(data
        .lines
        .into_iter()
        .filter(|w| w.len() > id_col.max(symbol_col))
        .map(|w| (normalize_id(&w[id_col]), w[symbol_col].clone()))
        .collect())
}

/// Rename rows by gene symbol and collapse duplicated symbols by the
/// maximum.
///
/// Rows without a symbol are dropped. `NaN` values are skipped by
/// the maximum, and a symbol still holding `NaN` afterwards is
/// dropped. Output rows are sorted by symbol.
pub fn collapse_by_symbol(
    row_ids: &[Box<str>],
    data: &Mat,
    symbols: &HashMap<Box<str>, Box<str>>,
) -> anyhow::Result<(Vec<Box<str>>, Mat)> {
    let ncols = data.ncols();

    let mut seen: HashSet<Box<str>> = HashSet::default();
    let mut symbol_rows: BTreeMap<Box<str>, Vec<usize>> = BTreeMap::new();

    for (i, id) in row_ids.iter().enumerate() {
        let id = normalize_id(id);
        if !seen.insert(id.clone()) {
            return Err(anyhow::anyhow!("row id {} is not unique", id));
        }
        if let Some(sym) = symbols.get(&id) {
            symbol_rows.entry(sym.clone()).or_default().push(i);
        }
    }

    let mut names = vec![];
    let mut values = vec![];

    for (sym, rows) in symbol_rows {
        let collapsed: Vec<f32> = (0..ncols)
            .map(|j| {
                rows.iter()
                    .map(|&i| data[(i, j)])
                    .filter(|x| !x.is_nan())
                    .fold(f32::NAN, f32::max)
            })
            .collect();

        if collapsed.iter().any(|x| x.is_nan()) {
            continue;
        }
        names.push(sym);
        values.extend(collapsed);
    }

    let nrows = names.len();
    Ok((names, Mat::from_shape_vec((nrows, ncols), values)?))
}

/// Build the `gene x instance` bulk reference of one cell line from
/// the LINCS level 3 matrix and write it as a tab-separated file.
///
/// Level 3 values are log2 scale; the output is back-transformed.
pub fn build_bulk_reference(
    files: &LincsFiles,
    cell: CellLine,
    out_file: &str,
) -> anyhow::Result<MatWithNames<Mat>> {
    let inst_ids = select_instances(&files.inst_info, cell.name())?;
    info!("{} instances of {} in {}", inst_ids.len(), cell, files.inst_info);

    let symbols = read_gene_symbols(&files.gene_info)?;
    let gctx = GctxReader::open(&files.gctx)?;

    let col_index: HashMap<&str, usize> = gctx
        .col_ids()
        .iter()
        .enumerate()
        .map(|(j, x)| (x.as_ref(), j))
        .collect();

    let (cols, col_pos): (Vec<Box<str>>, Vec<usize>) = inst_ids
        .iter()
        .filter_map(|x| col_index.get(x.as_ref()).map(|&j| (x.clone(), j)))
        .unzip();

    if cols.is_empty() {
        return Err(anyhow::anyhow!("no {} instance found in {}", cell, files.gctx));
    }
    if cols.len() < inst_ids.len() {
        warn!(
            "{} of {} instances are missing in the GCTX file",
            inst_ids.len() - cols.len(),
            inst_ids.len()
        );
    }

    info!("reading {} instances from {}", cols.len(), files.gctx);
    let data = gctx.read_columns(&col_pos)?;

    let (rows, mut mat) = collapse_by_symbol(gctx.row_ids(), &data, &symbols)?;
    mat.mapv_inplace(f32::exp2);

    let bulk = MatWithNames { rows, cols, mat };
    bulk.to_tsv(out_file, "pr_gene_symbol")?;
    info!(
        "wrote {} genes x {} instances: {}",
        bulk.nrows(),
        bulk.ncols(),
        out_file
    );
    Ok(bulk)
}

/// Return the cached bulk reference of `cell`, downloading the LINCS
/// inputs and building it first if needed
pub fn ensure_bulk_reference(
    data: &ReferenceDataArgs,
    cell: CellLine,
    fetcher: &impl RemoteFetch,
) -> anyhow::Result<Box<str>> {
    let bulk_path = data.bulk_reference_path(cell);

    if Path::new(bulk_path.as_ref()).is_file() {
        info!("using the bulk sample file {}", bulk_path);
        return Ok(bulk_path);
    }

    info!(
        "The bulk sample file ({}) does not exist. Generating... It may take a few hours.",
        bulk_path
    );

    acquire_lincs_files(&data.data_dir, fetcher)?;
    build_bulk_reference(&LincsFiles::in_dir(data), cell, &bulk_path)?;
    Ok(bulk_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn collapse_keeps_max_and_drops_unnamed() -> anyhow::Result<()> {
        let row_ids: Vec<Box<str>> = vec!["1".into(), "2".into(), "3".into(), "4".into()];
        let data = array![[1.0_f32, 5.0], [3.0, f32::NAN], [9.0, 9.0], [2.0, 2.0]];

        let mut symbols: HashMap<Box<str>, Box<str>> = HashMap::default();
        symbols.insert("1".into(), "TP53".into());
        symbols.insert("2".into(), "TP53".into());
        symbols.insert("4".into(), "AKT1".into());

        let (names, mat) = collapse_by_symbol(&row_ids, &data, &symbols)?;
        assert_eq!(names, vec![Box::<str>::from("AKT1"), Box::<str>::from("TP53")]);
        assert_eq!(mat.row(1).to_vec(), vec![3.0, 5.0]);
        assert_eq!(mat.row(0).to_vec(), vec![2.0, 2.0]);
        Ok(())
    }

    #[test]
    fn all_missing_symbol_is_dropped() -> anyhow::Result<()> {
        let row_ids: Vec<Box<str>> = vec!["10".into(), "11".into()];
        let data = array![[f32::NAN, 1.0], [4.0, 4.0]];

        let mut symbols: HashMap<Box<str>, Box<str>> = HashMap::default();
        symbols.insert("10".into(), "EGFR".into());
        symbols.insert("11".into(), "KRAS".into());

        let (names, _) = collapse_by_symbol(&row_ids, &data, &symbols)?;
        assert_eq!(names, vec![Box::<str>::from("KRAS")]);
        Ok(())
    }

    #[test]
    fn duplicated_row_ids_are_rejected() {
        let row_ids: Vec<Box<str>> = vec!["7".into(), "7.0".into()];
        let data = array![[1.0_f32], [2.0]];
        let symbols: HashMap<Box<str>, Box<str>> = HashMap::default();
        assert!(collapse_by_symbol(&row_ids, &data, &symbols).is_err());
    }
}
