use crate::common::*;
use fnv::FnvHashMap as HashMap;
use matrix_util::ndarray_stat::{log2_1p, pearson_correlation, row_means};
use ndarray::{ArrayView2, Axis};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Maximum number of marker genes kept per candidate cell line
pub const MAX_DEG_PER_LINE: usize = 300;

/// Outcome of matching a sample against the candidate cell lines
#[derive(Debug, Clone)]
pub struct CellLineMatch {
    pub cell_line: Box<str>,
    pub correlation: f64,
    pub num_mutual_genes: usize,
    pub num_deg: usize,
    /// one entry per candidate, in table order
    pub correlations: Vec<(Box<str>, f64)>,
}

/// Average a `gene x cell` single-cell reference sample into a
/// per-gene `log2(1 + mean)` profile
///
/// * `refsample_file` - tab-separated, header of cell names, gene
///   names in the first column
pub fn averaged_log_profile(refsample_file: &str) -> anyhow::Result<(Vec<Box<str>>, DVec)> {
    let sample = Mat::from_tsv_with_names(refsample_file)?;
    info!(
        "read {} genes x {} cells from {}",
        sample.nrows(),
        sample.ncols(),
        refsample_file
    );
    Ok((sample.rows, log2_1p(&row_means(&sample.mat))))
}

/// Candidate table: genes x cell lines, comma-separated
pub fn read_candidate_table(candidate_file: &str) -> anyhow::Result<MatWithNames<Mat>> {
    let candidates = Mat::from_csv_with_names(candidate_file)?;
    if candidates.ncols() == 0 || candidates.nrows() == 0 {
        return Err(anyhow::anyhow!("empty candidate table: {}", candidate_file));
    }
    Ok(candidates)
}

/// Marker genes of one column against all the others.
///
/// A gene scores `sum_j (x[g,col] - x[g,j])` over every other
/// column `j`. Genes with a positive score are ranked in descending
/// order (ties keep the row order) and at most `max_deg` are kept.
pub fn column_deg(xx: &ArrayView2<f32>, col: usize, max_deg: usize) -> Vec<usize> {
    let ncols = xx.ncols();

    let mut scored: Vec<(usize, f64)> = xx
        .axis_iter(Axis(0))
        .enumerate()
        .map(|(g, row)| {
            let x_i = row[col] as f64;
            let score: f64 = (0..ncols)
                .filter(|&j| j != col)
                .map(|j| x_i - row[j] as f64)
                .sum();
            (g, score)
        })
        .filter(|&(_, s)| s > 0.0)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(max_deg);
    scored.into_iter().map(|(g, _)| g).collect()
}

/// Union of `column_deg` over all columns; sorted row indexes
pub fn find_deg(xx: &ArrayView2<f32>, max_deg: usize) -> Vec<usize> {
    let per_column: Vec<Vec<usize>> = (0..xx.ncols())
        .into_par_iter()
        .map(|col| column_deg(xx, col, max_deg))
        .collect();

    per_column
        .into_iter()
        .flatten()
        .collect::<BTreeSet<usize>>()
        .into_iter()
        .collect()
}

/// Pick the candidate whose profile best correlates with the sample
/// over the marker genes of the candidate table.
///
/// * `sample_genes` - gene names of the sample profile
/// * `sample_profile` - averaged log expression
/// * `candidates` - genes x cell lines
/// * `max_deg` - marker genes kept per cell line
pub fn match_cell_line(
    sample_genes: &[Box<str>],
    sample_profile: &DVec,
    candidates: &MatWithNames<Mat>,
    max_deg: usize,
) -> anyhow::Result<CellLineMatch> {
    if sample_genes.len() != sample_profile.len() {
        return Err(anyhow::anyhow!("sample gene names and values differ in length"));
    }

    let mut candidate_row: HashMap<&str, usize> = HashMap::default();
    for (i, g) in candidates.rows.iter().enumerate() {
        candidate_row.entry(g.as_ref()).or_insert(i);
    }

    let (sample_idx, cand_idx): (Vec<usize>, Vec<usize>) = sample_genes
        .iter()
        .enumerate()
        .filter_map(|(i, g)| candidate_row.get(g.as_ref()).map(|&j| (i, j)))
        .unzip();

    if sample_idx.is_empty() {
        return Err(anyhow::anyhow!(
            "no gene is shared by the sample and the candidate table"
        ));
    }
    info!("{} mutual genes", sample_idx.len());

    let sample_sub = sample_profile.select(Axis(0), &sample_idx);
    let cand_sub = candidates.mat.select(Axis(0), &cand_idx);

    let deg = find_deg(&cand_sub.view(), max_deg);
    if deg.is_empty() {
        return Err(anyhow::anyhow!("no differentially expressed gene was found"));
    }
    info!("{} differentially expressed genes", deg.len());

    let xx = sample_sub.select(Axis(0), &deg);
    let yy = cand_sub.select(Axis(0), &deg);

    let correlations: Vec<(Box<str>, f64)> = candidates
        .cols
        .iter()
        .zip(yy.axis_iter(Axis(1)))
        .map(|(name, y)| (name.clone(), pearson_correlation(&xx, &y)))
        .collect();

    let mut best: Option<usize> = None;
    let mut max_r = f64::NEG_INFINITY;
    for (k, (_, r)) in correlations.iter().enumerate() {
        if *r > max_r {
            max_r = *r;
            best = Some(k);
        }
    }

    let best = best.ok_or(anyhow::anyhow!(
        "correlation is undefined for every candidate cell line"
    ))?;

    Ok(CellLineMatch {
        cell_line: correlations[best].0.clone(),
        correlation: max_r,
        num_mutual_genes: sample_idx.len(),
        num_deg: deg.len(),
        correlations,
    })
}

/// Read both inputs and match
pub fn determine_cell_line(
    refsample_file: &str,
    candidate_file: &str,
    max_deg: usize,
) -> anyhow::Result<CellLineMatch> {
    info!("determining the cell line...");
    let candidates = read_candidate_table(candidate_file)?;
    let (genes, profile) = averaged_log_profile(refsample_file)?;
    let matched = match_cell_line(&genes, &profile, &candidates, max_deg)?;
    info!(
        "selected cell type = {} (r = {:.4})",
        matched.cell_line, matched.correlation
    );
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn deg_score_and_cap() {
        // column 0 is high on genes 0,1; column 1 on gene 2
        let xx = array![[5.0_f32, 1.0, 1.0], [4.0, 1.0, 1.0], [0.0, 6.0, 0.0], [1.0, 1.0, 1.0]];
        let deg0 = column_deg(&xx.view(), 0, 300);
        assert_eq!(deg0, vec![0, 1]);

        let deg0_capped = column_deg(&xx.view(), 0, 1);
        assert_eq!(deg0_capped, vec![0]);

        // gene 3 is flat: score 0, never selected
        let all = find_deg(&xx.view(), 300);
        assert!(!all.contains(&3));
    }
}
