use crate::common_io::Delimiter;

/// A matrix with its row and column names
#[derive(Debug, Clone)]
pub struct MatWithNames<T> {
    pub rows: Vec<Box<str>>,
    pub cols: Vec<Box<str>>,
    pub mat: T,
}

/// Read and write named matrices from and to delimited text files
///
/// The first line holds the column names; an extra leading field
/// (the row-name column label) is dropped when present. The first
/// field of each following line is the row name.
pub trait IoOps {
    type Mat;

    fn read_named_delim(
        file: &str,
        delim: impl Into<Delimiter>,
    ) -> anyhow::Result<MatWithNames<Self::Mat>>;

    fn from_tsv_with_names(tsv_file: &str) -> anyhow::Result<MatWithNames<Self::Mat>> {
        Self::read_named_delim(tsv_file, "\t")
    }

    fn from_csv_with_names(csv_file: &str) -> anyhow::Result<MatWithNames<Self::Mat>> {
        Self::read_named_delim(csv_file, ",")
    }

    /// Write with a header line `<corner><delim><col_1>...`
    fn write_named_delim(
        &self,
        file: &str,
        delim: &str,
        rows: &[Box<str>],
        cols: &[Box<str>],
        corner: &str,
    ) -> anyhow::Result<()>;
}

/// Subset rows or columns by position keeping names aligned
pub trait SelectOps {
    fn select_rows(&self, rows: &[usize]) -> Self;
    fn select_cols(&self, cols: &[usize]) -> Self;
}
