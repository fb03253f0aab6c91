use matrix_util::common_io::*;
use matrix_util::traits::{IoOps, SelectOps};
use ndarray::Array2;

#[test]
fn named_table_gz_test() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let tsv_file = dir.path().join("table.tsv.gz");
    let tsv_file = tsv_file.to_str().unwrap();

    let lines: Vec<Box<str>> = vec![
        "gene\tc1\tc2\tc3".into(),
        "# comment lines are skipped".into(),
        "TP53\t1.5\t0\tNA".into(),
        "MYC\t2\t\"3.25\"\t4".into(),
    ];
    write_lines(&lines, tsv_file)?;

    let data = Array2::<f32>::from_tsv_with_names(tsv_file)?;
    assert_eq!(data.rows[0].as_ref(), "TP53");
    assert_eq!(data.rows[1].as_ref(), "MYC");
    assert_eq!(data.cols.len(), 3);
    assert_eq!(data.cols[0].as_ref(), "c1");
    assert_eq!(data.mat[(1, 1)], 3.25);
    assert!(data.mat[(0, 2)].is_nan());
    Ok(())
}

#[test]
fn csv_without_corner_label() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_file = dir.path().join("table.csv");
    let csv_file = csv_file.to_str().unwrap();

    let lines: Vec<Box<str>> = vec![",0,1".into(), "a,1,2".into(), "b,3,4".into()];
    write_lines(&lines, csv_file)?;

    let data = Array2::<f32>::from_csv_with_names(csv_file)?;
    assert_eq!(data.cols[0].as_ref(), "0");
    assert_eq!(data.cols[1].as_ref(), "1");
    assert_eq!(data.mat.sum(), 10.0);

    let sub = data.select_rows(&[1]);
    assert_eq!(sub.rows[0].as_ref(), "b");
    assert_eq!(sub.mat[(0, 0)], 3.0);

    let out_file = dir.path().join("out.csv");
    let out_file = out_file.to_str().unwrap();
    data.to_csv(out_file)?;
    let back = read_lines(out_file)?;
    assert_eq!(back[0].as_ref(), ",0,1");
    assert_eq!(back[2].as_ref(), "b,3,4");
    Ok(())
}

#[test]
fn ragged_rows_are_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_file = dir.path().join("bad.csv");
    let csv_file = csv_file.to_str().unwrap();
    let lines: Vec<Box<str>> = vec![",x,y".into(), "a,1,2".into(), "b,3".into()];
    write_lines(&lines, csv_file)?;

    assert!(Array2::<f32>::from_csv_with_names(csv_file).is_err());
    Ok(())
}

#[test]
fn gunzip_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let gz = dir.path().join("lines.txt.gz");
    let gz = gz.to_str().unwrap();
    let lines: Vec<Box<str>> = vec!["hello".into(), "world".into()];
    write_lines(&lines, gz)?;

    let plain = strip_gz(gz);
    assert!(plain.ends_with("lines.txt"));
    gunzip_file(gz, plain)?;
    assert_eq!(read_lines(plain)?.len(), 2);
    Ok(())
}
