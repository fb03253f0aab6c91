use mung::common::*;
use mung::run_heatmap::*;
use mung::run_report::*;

/// Multi-drug effect reporting for treatment selection
#[derive(Parser, Debug)]
#[command(
    version,
    about = "MUNG",
    long_about = "Report the predicted effect of each selected drug\n\
		  on every cell cluster: one bar chart per drug,\n\
		  a table of all reported instances, and a heatmap\n\
		  of the suppressive effects of chosen drugs."
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
    /// Per-drug bar charts (PDF), results table (CSV) and heatmap
    Report(ReportArgs),

    /// Heatmap of selected drugs from an existing results table
    Heatmap(HeatmapArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match &cli.commands {
        Commands::Report(args) => {
            let summary = run_report(args)?;
            info!(
                "{} drug page(s), {} row(s) in {}",
                summary.num_drugs, summary.num_rows, summary.csv_file
            );
        }
        Commands::Heatmap(args) => {
            if let Some(png) = run_heatmap(args)? {
                info!("heatmap: {}", png);
            }
        }
    }

    info!("Done");
    Ok(())
}
