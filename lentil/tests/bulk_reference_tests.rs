use hdf5::types::VarLenUnicode;
use lentil::bulk_reference::*;
use lentil::common::*;
use lentil::gctx::GctxReader;
use matrix_util::common_io::{read_lines, write_lines};
use ndarray::array;
use std::path::Path;

fn write(path: &Path, lines: &[&str]) -> anyhow::Result<()> {
    let lines: Vec<Box<str>> = lines.iter().map(|&l| l.into()).collect();
    write_lines(&lines, path.to_str().unwrap())
}

fn to_hdf5_strings(names: &[&str]) -> anyhow::Result<Vec<VarLenUnicode>> {
    names
        .iter()
        .map(|x| {
            x.parse::<VarLenUnicode>()
                .map_err(|e| anyhow::anyhow!("{}: {}", x, e))
        })
        .collect()
}

/// Three genes by three instances, stored instance-major
fn write_gctx(path: &Path) -> anyhow::Result<()> {
    let file = hdf5::File::create(path)?;
    let root = file.create_group("0")?;

    let meta = root.create_group("META")?;
    let row_ids = to_hdf5_strings(&["780", "5982", "7849"])?;
    meta.create_group("ROW")?
        .new_dataset::<VarLenUnicode>()
        .shape(row_ids.len())
        .create("id")?
        .write(&row_ids)?;
    let col_ids = to_hdf5_strings(&["i1", "i2", "i3"])?;
    meta.create_group("COL")?
        .new_dataset::<VarLenUnicode>()
        .shape(col_ids.len())
        .create("id")?
        .write(&col_ids)?;

    // log2 scale; rows are i1, i2, i3
    let matrix = array![[1.0_f32, 0.5, 3.0], [0.0, 0.0, 0.0], [2.0, 1.5, 3.0]];
    root.create_group("DATA")?
        .create_group("0")?
        .new_dataset::<f32>()
        .shape((3, 3))
        .create("matrix")?
        .write(&matrix)?;
    Ok(())
}

fn prepare_lincs(dir: &Path) -> anyhow::Result<LincsFiles> {
    let inst_info = dir.join("inst_info.txt.gz");
    write(
        &inst_info,
        &[
            "inst_id\tcell_id\tpert_iname",
            "i3\tMCF7\tDMSO",
            "i1\tMCF7\tDMSO",
            "i2\tA549\tDMSO",
            "i9\tMCF7\tDMSO",
        ],
    )?;

    let gene_info = dir.join("gene_info.txt.gz");
    write(
        &gene_info,
        &[
            "pr_gene_id\tpr_gene_symbol\tpr_is_lm",
            "780\tDDR1\t1",
            "5982\tRFC2\t1",
            "7849\tPAX8\t1",
        ],
    )?;

    let gctx = dir.join("level3.gctx");
    write_gctx(&gctx)?;

    Ok(LincsFiles {
        inst_info: inst_info.to_str().unwrap().into(),
        gene_info: gene_info.to_str().unwrap().into(),
        gctx: gctx.to_str().unwrap().into(),
    })
}

#[test]
fn instances_of_one_cell_line_in_file_order() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let files = prepare_lincs(dir.path())?;

    let inst = select_instances(&files.inst_info, "MCF7")?;
    let inst: Vec<&str> = inst.iter().map(|x| x.as_ref()).collect();
    assert_eq!(inst, vec!["i3", "i1", "i9"]);

    let symbols = read_gene_symbols(&files.gene_info)?;
    assert_eq!(symbols.len(), 3);
    assert_eq!(symbols.get("5982").map(|s| s.as_ref()), Some("RFC2"));
    Ok(())
}

#[test]
fn gctx_columns_are_instances() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let files = prepare_lincs(dir.path())?;

    let gctx = GctxReader::open(&files.gctx)?;
    assert_eq!(gctx.row_ids().len(), 3);
    assert_eq!(gctx.row_ids()[1].as_ref(), "5982");
    assert_eq!(gctx.col_ids()[2].as_ref(), "i3");

    let x = gctx.read_columns(&[2, 0])?;
    assert_eq!(x.dim(), (3, 2));
    assert_eq!(x.column(0).to_vec(), vec![2.0, 1.5, 3.0]);
    assert_eq!(x.column(1).to_vec(), vec![1.0, 0.5, 3.0]);

    assert!(gctx.read_columns(&[3]).is_err());
    Ok(())
}

#[test]
fn bulk_reference_of_one_cell_line() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let files = prepare_lincs(dir.path())?;
    let out = dir.path().join("MCF7_bulk.tsv");
    let out = out.to_str().unwrap();

    // i9 is not in the GCTX file
    let bulk = build_bulk_reference(&files, CellLine::MCF7, out)?;

    let cols: Vec<&str> = bulk.cols.iter().map(|c| c.as_ref()).collect();
    assert_eq!(cols, vec!["i3", "i1"]);
    let rows: Vec<&str> = bulk.rows.iter().map(|r| r.as_ref()).collect();
    assert_eq!(rows, vec!["DDR1", "PAX8", "RFC2"]);

    approx::assert_abs_diff_eq!(bulk.mat[(0, 0)], 4.0, epsilon = 1e-5);
    approx::assert_abs_diff_eq!(bulk.mat[(0, 1)], 2.0, epsilon = 1e-5);
    approx::assert_abs_diff_eq!(bulk.mat[(1, 0)], 8.0, epsilon = 1e-5);
    approx::assert_abs_diff_eq!(bulk.mat[(2, 1)], 2.0_f32.sqrt(), epsilon = 1e-5);

    let lines = read_lines(out)?;
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].as_ref(), "pr_gene_symbol\ti3\ti1");
    assert!(lines[1].starts_with("DDR1\t4"));
    Ok(())
}

#[test]
fn cell_line_without_instances_is_an_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let files = prepare_lincs(dir.path())?;
    let out = dir.path().join("PC3_bulk.tsv");

    assert!(build_bulk_reference(&files, CellLine::PC3, out.to_str().unwrap()).is_err());
    assert!(!out.exists());
    Ok(())
}
