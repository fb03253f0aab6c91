pub mod bar_chart;
pub mod colormap;
pub mod common;
pub mod drug_index;
pub mod effect_data;
pub mod fonts;
pub mod heatmap;
pub mod pdf_pages;
pub mod run_heatmap;
pub mod run_report;
pub mod solution_table;
pub mod threshold;
