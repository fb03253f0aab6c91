use crate::bulk_reference::*;
use crate::common::*;
use crate::geo_download::{acquire_lincs_files, RemoteFetch};

#[derive(Args, Debug, Clone)]
pub struct BuildBulkArgs {
    /// cell line to build the bulk reference for
    #[arg(long, value_enum, required = true)]
    pub celltype: CellLine,

    #[command(flatten)]
    pub data: ReferenceDataArgs,

    /// rebuild even if the bulk reference file exists
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

/// Download the LINCS inputs and build one bulk reference file
pub fn run_build_bulk(args: &BuildBulkArgs, fetcher: &impl RemoteFetch) -> anyhow::Result<()> {
    let bulk_path = if args.force {
        acquire_lincs_files(&args.data.data_dir, fetcher)?;
        let bulk_path = args.data.bulk_reference_path(args.celltype);
        build_bulk_reference(&LincsFiles::in_dir(&args.data), args.celltype, &bulk_path)?;
        bulk_path
    } else {
        ensure_bulk_reference(&args.data, args.celltype, fetcher)?
    };

    info!("bulk reference: {}", bulk_path);
    Ok(())
}
