pub mod bulk_reference;
pub mod cell_line;
pub mod cell_line_match;
pub mod cibersortx;
pub mod common;
pub mod gctx;
pub mod geo_download;
pub mod run_build_bulk;
pub mod run_fractions;
pub mod run_match;
