use crate::cell_line_match::*;
use crate::common::*;
use matrix_util::common_io::write_lines;

#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    /// single-cell sample file (genes x cells, tab-separated)
    #[arg(short = 'r', long, required = true)]
    pub refsample: Box<str>,

    #[command(flatten)]
    pub data: ReferenceDataArgs,

    /// maximum number of marker genes per cell line
    #[arg(long, default_value_t = MAX_DEG_PER_LINE)]
    pub max_deg: usize,

    /// output file of per-cell-line correlations (`stdout` to print)
    #[arg(short = 'o', long, default_value = "stdout")]
    pub out: Box<str>,
}

/// Report how well each candidate cell line correlates with the sample
pub fn run_match(args: &MatchArgs) -> anyhow::Result<()> {
    if args.max_deg == 0 {
        return Err(anyhow::anyhow!("max_deg must be >= 1"));
    }

    let matched = determine_cell_line(
        &args.refsample,
        &args.data.candidate_table_path(),
        args.max_deg,
    )?;

    let mut lines: Vec<Box<str>> = vec!["cell_line\tpearson_r\tselected".into()];
    lines.extend(matched.correlations.iter().map(|(c, r)| {
        let selected = c.as_ref() == matched.cell_line.as_ref();
        format!("{}\t{:.6}\t{}", c, r, selected).into_boxed_str()
    }));
    write_lines(&lines, &args.out)?;

    info!(
        "{} of {} mutual genes used for correlation",
        matched.num_deg, matched.num_mutual_genes
    );
    Ok(())
}
