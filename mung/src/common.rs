#![allow(dead_code)]

pub use log::{info, warn};

pub use clap::{Args, Parser, Subcommand};

pub use matrix_util::traits::{IoOps, MatWithNames, SelectOps};

pub type Mat = ndarray::Array2<f32>;
pub type NamedMat = MatWithNames<Mat>;

pub const REPORT_PDF_FILE: &str = "treatment_effect.pdf";
pub const REPORT_CSV_FILE: &str = "treatment_effect.csv";
pub const HEATMAP_PNG_FILE: &str = "selected_drug_heatmap.png";

/// A rendered page, 8-bit RGB, row-major
pub struct RgbPage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl RgbPage {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgb: vec![255; (width * height * 3) as usize],
        }
    }
}
