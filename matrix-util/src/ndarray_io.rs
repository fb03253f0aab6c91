use crate::common_io::{read_lines_of_words_delim, write_lines, Delimiter};
use crate::traits::{IoOps, MatWithNames, SelectOps};
use ndarray::prelude::*;
use rayon::prelude::*;

/// Parse one field; empty strings and the usual missing-value
/// spellings become `NaN`
pub fn parse_f32_field(x: &str) -> anyhow::Result<f32> {
    let x = x.trim();
    match x {
        "" | "NA" | "NaN" | "nan" | "NAN" => Ok(f32::NAN),
        _ => x
            .parse::<f32>()
            .map_err(|e| anyhow::anyhow!("failed to parse '{}': {}", x, e)),
    }
}

impl IoOps for Array2<f32> {
    type Mat = Self;

    fn read_named_delim(
        file: &str,
        delim: impl Into<Delimiter>,
    ) -> anyhow::Result<MatWithNames<Self::Mat>> {
        let data = read_lines_of_words_delim(file, delim, 0)?;

        if data.lines.is_empty() {
            return Err(anyhow::anyhow!("No data in file {}", file));
        }

        let ncols = data.lines[0].len().saturating_sub(1);
        if ncols == 0 {
            return Err(anyhow::anyhow!("No data column in file {}", file));
        }

        let mut cols = data.header;
        if cols.len() == ncols + 1 {
            cols.remove(0);
        }
        if cols.len() != ncols {
            return Err(anyhow::anyhow!(
                "{}: {} column names for {} data columns",
                file,
                cols.len(),
                ncols
            ));
        }

        let parsed = data
            .lines
            .par_iter()
            .enumerate()
            .map(|(i, words)| {
                if words.len() != ncols + 1 {
                    return Err(anyhow::anyhow!(
                        "{}: line {} has {} fields, expected {}",
                        file,
                        i + 2,
                        words.len(),
                        ncols + 1
                    ));
                }
                let values = words[1..]
                    .iter()
                    .map(|x| parse_f32_field(x))
                    .collect::<anyhow::Result<Vec<f32>>>()?;
                Ok((words[0].clone(), values))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let nrows = parsed.len();
        let mut rows = Vec::with_capacity(nrows);
        let mut values = Vec::with_capacity(nrows * ncols);
        for (name, v) in parsed {
            rows.push(name);
            values.extend(v);
        }

        Ok(MatWithNames {
            rows,
            cols,
            mat: Array2::from_shape_vec((nrows, ncols), values)?,
        })
    }

    fn write_named_delim(
        &self,
        file: &str,
        delim: &str,
        rows: &[Box<str>],
        cols: &[Box<str>],
        corner: &str,
    ) -> anyhow::Result<()> {
        if rows.len() != self.nrows() || cols.len() != self.ncols() {
            return Err(anyhow::anyhow!(
                "names ({} x {}) don't match the matrix ({} x {})",
                rows.len(),
                cols.len(),
                self.nrows(),
                self.ncols()
            ));
        }

        let mut lines: Vec<Box<str>> = Vec::with_capacity(self.nrows() + 1);
        let header = std::iter::once(corner)
            .chain(cols.iter().map(|x| x.as_ref()))
            .collect::<Vec<_>>()
            .join(delim);
        lines.push(header.into_boxed_str());

        for (name, row) in rows.iter().zip(self.rows()) {
            let line = std::iter::once(name.to_string())
                .chain(row.iter().map(|x| format!("{}", x)))
                .collect::<Vec<String>>()
                .join(delim);
            lines.push(line.into_boxed_str());
        }

        write_lines(&lines, file)
    }
}

impl MatWithNames<Array2<f32>> {
    pub fn to_tsv(&self, file: &str, corner: &str) -> anyhow::Result<()> {
        self.mat
            .write_named_delim(file, "\t", &self.rows, &self.cols, corner)
    }

    pub fn to_csv(&self, file: &str) -> anyhow::Result<()> {
        self.mat
            .write_named_delim(file, ",", &self.rows, &self.cols, "")
    }

    pub fn nrows(&self) -> usize {
        self.mat.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.mat.ncols()
    }

    /// Stack another named matrix below this one; columns must agree
    pub fn append_rows(&mut self, other: &Self) -> anyhow::Result<()> {
        if self.cols != other.cols {
            return Err(anyhow::anyhow!("column names differ"));
        }
        self.mat.append(Axis(0), other.mat.view())?;
        self.rows.extend(other.rows.iter().cloned());
        Ok(())
    }

    /// An empty matrix sharing these columns
    pub fn empty_like(&self) -> Self {
        MatWithNames {
            rows: vec![],
            cols: self.cols.clone(),
            mat: Array2::zeros((0, self.ncols())),
        }
    }
}

impl SelectOps for MatWithNames<Array2<f32>> {
    fn select_rows(&self, rows: &[usize]) -> Self {
        MatWithNames {
            rows: rows.iter().map(|&i| self.rows[i].clone()).collect(),
            cols: self.cols.clone(),
            mat: self.mat.select(Axis(0), rows),
        }
    }

    fn select_cols(&self, cols: &[usize]) -> Self {
        MatWithNames {
            rows: self.rows.clone(),
            cols: cols.iter().map(|&j| self.cols[j].clone()).collect(),
            mat: self.mat.select(Axis(1), cols),
        }
    }
}
