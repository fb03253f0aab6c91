use crate::bulk_reference::ensure_bulk_reference;
use crate::cell_line_match::{determine_cell_line, MAX_DEG_PER_LINE};
use crate::cibersortx::*;
use crate::common::*;
use crate::geo_download::RemoteFetch;
use matrix_util::common_io::absolute_path;
use std::path::Path;

#[derive(Args, Debug, Clone)]
pub struct FractionsArgs {
    /// path to input directory
    #[arg(short = 'i', long, required = true)]
    pub input: Box<str>,

    /// path to output directory
    #[arg(short = 'o', long, default_value = "./")]
    pub output: Box<str>,

    /// email address registered on CIBERSORTx website
    #[arg(short = 'u', long, required = true)]
    pub username: Box<str>,

    /// token obtained from CIBERSORTx website
    #[arg(short = 't', long, required = true)]
    pub token: Box<str>,

    /// absolute path to the single-cell sample file
    #[arg(short = 'r', long, required = true)]
    pub refsample: Box<str>,

    /// choose a cell line; if not provided, the cell line is
    /// determined by correlation with the single-cell sample
    #[arg(long, value_enum)]
    pub celltype: Option<CellLine>,

    #[command(flatten)]
    pub data: ReferenceDataArgs,

    /// container runtime
    #[arg(long, default_value = DEFAULT_RUNTIME)]
    pub container_runtime: Box<str>,

    /// CIBERSORTx fractions image
    #[arg(long, default_value = DEFAULT_IMAGE)]
    pub image: Box<str>,

    /// print the container command instead of running it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Validate the inputs, resolve the cell line and its bulk reference,
/// and put together the container run
pub fn prepare_fractions_job(
    args: &FractionsArgs,
    fetcher: &impl RemoteFetch,
) -> anyhow::Result<FractionsJob> {
    if !Path::new(args.input.as_ref()).exists() {
        return Err(anyhow::anyhow!("The input path does not exist: {}", args.input));
    }
    if !Path::new(args.output.as_ref()).exists() {
        std::fs::create_dir_all(args.output.as_ref())?;
    }
    if !Path::new(args.refsample.as_ref()).is_file() {
        return Err(anyhow::anyhow!(
            "The single-cell sample file does not exist: {}",
            args.refsample
        ));
    }

    let cell = match args.celltype {
        Some(cell) => cell,
        None => {
            let matched = determine_cell_line(
                &args.refsample,
                &args.data.candidate_table_path(),
                MAX_DEG_PER_LINE,
            )?;
            matched.cell_line.parse::<CellLine>()?
        }
    };
    info!("cell line: {} ({})", cell, cell.description());

    let mixture = ensure_bulk_reference(&args.data, cell, fetcher)?;

    Ok(FractionsJob {
        runtime: args.container_runtime.clone(),
        image: args.image.clone(),
        input_dir: absolute_path(&args.input)?,
        output_dir: absolute_path(&args.output)?,
        username: args.username.clone(),
        token: args.token.clone(),
        refsample: args.refsample.clone(),
        mixture,
    })
}

/// Impute cell-type fractions of the LINCS bulk samples with
/// CIBERSORTx
pub fn run_fractions(args: &FractionsArgs, fetcher: &impl RemoteFetch) -> anyhow::Result<()> {
    let job = prepare_fractions_job(args, fetcher)?;

    if args.dry_run {
        println!("{}", job.masked_command_line());
        return Ok(());
    }

    job.run()
}
