use crate::common::*;
use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use indicatif::ProgressBar;
use ndarray::{s, ArrayBase, Data, Dim, RawData};

const MATRIX_KEY: &str = "0/DATA/0/matrix";
const ROW_ID_KEY: &str = "0/META/ROW/id";
const COL_ID_KEY: &str = "0/META/COL/id";

/// Column-subset reader of a CMap GCTX (HDF5) file.
///
/// The matrix is stored instance-major (`n_col x n_row`), so one
/// instance is one contiguous HDF5 row.
pub struct GctxReader {
    file: hdf5::File,
    row_ids: Vec<Box<str>>,
    col_ids: Vec<Box<str>>,
}

impl GctxReader {
    pub fn open(gctx_file: &str) -> anyhow::Result<Self> {
        let file = hdf5::File::open(gctx_file)
            .map_err(|e| anyhow::anyhow!("failed to open GCTX {}: {}", gctx_file, e))?;
        let row_ids = read_hdf5_strings(file.dataset(ROW_ID_KEY)?)?;
        let col_ids = read_hdf5_strings(file.dataset(COL_ID_KEY)?)?;

        let shape = file.dataset(MATRIX_KEY)?.shape();
        if shape != [col_ids.len(), row_ids.len()] {
            return Err(anyhow::anyhow!(
                "GCTX matrix {:?} doesn't match {} columns x {} rows",
                shape,
                col_ids.len(),
                row_ids.len()
            ));
        }

        Ok(Self {
            file,
            row_ids,
            col_ids,
        })
    }

    pub fn row_ids(&self) -> &[Box<str>] {
        &self.row_ids
    }

    pub fn col_ids(&self) -> &[Box<str>] {
        &self.col_ids
    }

    /// Read the selected instances into a `row x selected` matrix
    pub fn read_columns(&self, columns: &[usize]) -> anyhow::Result<Mat> {
        let data = self.file.dataset(MATRIX_KEY)?;
        let nrow = self.row_ids.len();
        let mut ret = Mat::zeros((nrow, columns.len()));

        let pb = ProgressBar::new(columns.len() as u64);
        for (k, &c) in columns.iter().enumerate() {
            if c >= self.col_ids.len() {
                return Err(anyhow::anyhow!("column {} out of range", c));
            }
            let x_c = data.read_slice_1d::<f32, _>(s![c, ..])?;
            ret.column_mut(k).assign(&x_c);
            pb.inc(1);
        }
        pb.finish_and_clear();
        Ok(ret)
    }
}

/// Read strings from `HDF5` dataset
pub fn read_hdf5_strings(data: hdf5::Dataset) -> anyhow::Result<Vec<Box<str>>> {
    let desc = data.dtype()?.to_descriptor()?;

    let ret: Vec<Box<str>> = match desc {
        TypeDescriptor::VarLenUnicode => into_box_str(&data.read_1d::<VarLenUnicode>()?),
        TypeDescriptor::VarLenAscii => into_box_str(&data.read_1d::<VarLenAscii>()?),
        TypeDescriptor::FixedAscii(n) if n <= 32 => {
            into_box_str(&data.read_1d::<FixedAscii<32>>()?)
        }
        TypeDescriptor::FixedAscii(n) if n <= 256 => {
            into_box_str(&data.read_1d::<FixedAscii<256>>()?)
        }
        TypeDescriptor::FixedAscii(_) => into_box_str(&data.read_1d::<FixedAscii<1024>>()?),
        TypeDescriptor::FixedUnicode(n) if n <= 32 => {
            into_box_str(&data.read_1d::<FixedUnicode<32>>()?)
        }
        TypeDescriptor::FixedUnicode(_) => into_box_str(&data.read_1d::<FixedUnicode<1024>>()?),
        _ => {
            return Err(anyhow::anyhow!("unsupported string type: {:?}", desc));
        }
    };

    Ok(ret.into_iter().map(|x| x.trim().into()).collect())
}

fn into_box_str<T, U>(data: &ArrayBase<T, Dim<[usize; 1]>>) -> Vec<Box<str>>
where
    T: RawData<Elem = U> + Data,
    U: ToString,
{
    data.iter()
        .map(|x| x.to_string().into_boxed_str())
        .collect()
}
