use crate::drug_index::drug_prefix;
use matrix_util::common_io::read_lines_of_words_delim;
use matrix_util::ndarray_io::parse_f32_field;
use std::collections::BTreeSet;

/// Unique drug prefixes of the solution table, sorted
///
/// The table is a header-less CSV. Every non-empty, non-numeric cell
/// names a drug instance; the text before its first `_` is the drug.
pub fn read_solution_drugs(table_file: &str) -> anyhow::Result<Vec<Box<str>>> {
    let data = read_lines_of_words_delim(table_file, ',', -1)?;

    let drugs: BTreeSet<Box<str>> = data
        .lines
        .iter()
        .flatten()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty() && parse_f32_field(cell).is_err())
        .map(|cell| drug_prefix(cell).into())
        .collect();

    Ok(drugs.into_iter().collect())
}
