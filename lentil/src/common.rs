#![allow(dead_code)]

pub use log::{info, warn};

pub use clap::{Args, Parser, Subcommand, ValueEnum};

pub use matrix_util::traits::{IoOps, MatWithNames, SelectOps};

pub type Mat = ndarray::Array2<f32>;
pub type DVec = ndarray::Array1<f32>;

pub use crate::cell_line::CellLine;

pub const DEFAULT_DATA_DIR: &str = "/single-cell-analysis/data";
pub const CANDIDATE_TABLE_FILE: &str = "bk_2021_gep.csv";

/// Where the reference data live
#[derive(Args, Debug, Clone)]
pub struct ReferenceDataArgs {
    /// directory of the candidate cell-line table, the LINCS
    /// downloads and the bulk reference files
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: Box<str>,

    /// candidate cell-line expression table (genes x cell lines,
    /// comma-separated); defaults to `{data_dir}/bk_2021_gep.csv`
    #[arg(long)]
    pub candidate_table: Option<Box<str>>,
}

impl ReferenceDataArgs {
    pub fn new(data_dir: &str) -> Self {
        Self {
            data_dir: data_dir.into(),
            candidate_table: None,
        }
    }

    pub fn candidate_table_path(&self) -> Box<str> {
        match &self.candidate_table {
            Some(x) => x.clone(),
            None => format!("{}/{}", self.data_dir, CANDIDATE_TABLE_FILE).into_boxed_str(),
        }
    }

    /// `{data_dir}/LINCS_L1000_GEP_{cell}.txt`
    pub fn bulk_reference_path(&self, cell: CellLine) -> Box<str> {
        format!("{}/LINCS_L1000_GEP_{}.txt", self.data_dir, cell).into_boxed_str()
    }

    pub fn data_file(&self, file_name: &str) -> Box<str> {
        format!("{}/{}", self.data_dir, file_name).into_boxed_str()
    }
}
