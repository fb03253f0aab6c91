use lentil::common::*;
use lentil::geo_download::HttpFetch;
use lentil::run_build_bulk::*;
use lentil::run_fractions::*;
use lentil::run_match::*;

/// LINCS-based Estimation of Nearest cell lines for Imputing Lineage fractions
#[derive(Parser, Debug)]
#[command(
    version,
    about = "LENTIL",
    long_about = "Impute the fractions of previously identified cell subsets\n\
		  under each bulk sample of the LINCS L1000 database\n\
		  using the CIBERSORTx fractions container."
)]
struct Cli {
    /// verbosity
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Impute cell-type fractions of LINCS bulk samples",
        long_about = "Run CIBERSORTx fractions in three stages: \n\
		      (1) Pick the cell line best correlated with the single-cell sample\n\
		      (2) Build the LINCS L1000 bulk reference of that cell line\n\
		      (3) Run the CIBERSORTx fractions container.\n"
    )]
    Fractions(FractionsArgs),

    /// Find the cell line best correlated with a single-cell sample
    #[command(visible_alias = "match")]
    MatchCellLine(MatchArgs),

    /// Download LINCS L1000 data and build a bulk reference file
    BuildBulk(BuildBulkArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match &cli.commands {
        Commands::Fractions(args) => {
            run_fractions(args, &HttpFetch::new()?)?;
        }
        Commands::MatchCellLine(args) => {
            run_match(args)?;
        }
        Commands::BuildBulk(args) => {
            run_build_bulk(args, &HttpFetch::new()?)?;
        }
    }

    info!("Done");
    Ok(())
}
