use crate::common::*;
use indicatif::{ProgressBar, ProgressStyle};
use matrix_util::common_io::{gunzip_file, remove_file, strip_gz};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A file of the GEO series GSE70138 (LINCS L1000 phase II)
#[derive(Debug, Clone, Copy)]
pub struct GeoFile {
    pub file_name: &'static str,
    pub url: &'static str,
    /// keep a decompressed copy next to the download
    pub decompress: bool,
}

pub const LINCS_INST_INFO: GeoFile = GeoFile {
    file_name: "GSE70138_Broad_LINCS_inst_info_2017-03-06.txt.gz",
    url: "https://ftp.ncbi.nlm.nih.gov/geo/series/GSE70nnn/GSE70138/suppl/GSE70138%5FBroad%5FLINCS%5Finst%5Finfo%5F2017%2D03%2D06%2Etxt%2Egz",
    decompress: false,
};

pub const LINCS_GENE_INFO: GeoFile = GeoFile {
    file_name: "GSE70138_Broad_LINCS_gene_info_2017-03-06.txt.gz",
    url: "https://ftp.ncbi.nlm.nih.gov/geo/series/GSE70nnn/GSE70138/suppl/GSE70138%5FBroad%5FLINCS%5Fgene%5Finfo%5F2017%2D03%2D06%2Etxt%2Egz",
    decompress: false,
};

pub const LINCS_LEVEL3_GCTX: GeoFile = GeoFile {
    file_name: "GSE70138_Broad_LINCS_Level3_INF_mlr12k_n345976x12328_2017-03-06.gctx.gz",
    url: "https://ftp.ncbi.nlm.nih.gov/geo/series/GSE70nnn/GSE70138/suppl/GSE70138%5FBroad%5FLINCS%5FLevel3%5FINF%5Fmlr12k%5Fn345976x12328%5F2017%2D03%2D06%2Egctx%2Egz",
    decompress: true,
};

pub const LINCS_FILES: [GeoFile; 3] = [LINCS_INST_INFO, LINCS_GENE_INFO, LINCS_LEVEL3_GCTX];

/// Something that can copy a remote resource into a local file
pub trait RemoteFetch {
    /// Fetch `url` into `dest`; returns the number of bytes written
    fn fetch(&self, url: &str, dest: &str) -> anyhow::Result<u64>;
}

/// Blocking HTTP(S) download with a progress bar
pub struct HttpFetch {
    client: reqwest::blocking::Client,
}

impl HttpFetch {
    pub fn new() -> anyhow::Result<Self> {
        // the GCTX matrix is several GB; no overall deadline
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(Self { client })
    }
}

impl RemoteFetch for HttpFetch {
    fn fetch(&self, url: &str, dest: &str) -> anyhow::Result<u64> {
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP {} from {}", status, url);
            return Err(anyhow::anyhow!("failed to download {}: HTTP {}", url, status));
        }

        let pb = match response.content_length() {
            Some(nbytes) => {
                let pb = ProgressBar::new(nbytes);
                pb.set_style(ProgressStyle::with_template(
                    "{bar:40} {bytes}/{total_bytes} ({eta})",
                )?);
                pb
            }
            None => ProgressBar::new_spinner(),
        };

        let copied = (|| -> anyhow::Result<u64> {
            let mut out = BufWriter::new(File::create(dest)?);
            let nbytes = std::io::copy(&mut pb.wrap_read(response), &mut out)?;
            out.flush()?;
            Ok(nbytes)
        })();
        pb.finish_and_clear();

        copied.map_err(|e| discard_partial(dest, e))
    }
}

/// Drop a truncated `dest` so it doesn't look complete; `err` is
/// what the caller sees either way
fn discard_partial(dest: &str, err: anyhow::Error) -> anyhow::Error {
    if let Err(rm_err) = remove_file(dest) {
        warn!("can't remove the partial file {}: {}", dest, rm_err);
    }
    err
}

/// Download one GEO file into `data_dir` unless we already have it.
///
/// A compressed file is also considered present when its
/// decompressed copy exists. Returns `true` if a fetch happened.
pub fn download_if_missing(
    data_dir: &str,
    geo_file: &GeoFile,
    fetcher: &impl RemoteFetch,
) -> anyhow::Result<bool> {
    let gz_path = format!("{}/{}", data_dir, geo_file.file_name);
    let plain_path = strip_gz(&gz_path);

    let have_gz = Path::new(&gz_path).is_file();
    let have_plain = geo_file.decompress && Path::new(plain_path).is_file();

    if have_plain {
        info!("found {}", plain_path);
        return Ok(false);
    }

    let fetched = if have_gz {
        info!("found {}", gz_path);
        false
    } else {
        info!("downloading {} from the GEO website...", geo_file.file_name);
        let nbytes = fetcher.fetch(geo_file.url, &gz_path)?;
        info!("{} bytes -> {}", nbytes, gz_path);
        true
    };

    if geo_file.decompress {
        info!("decompressing {}", gz_path);
        gunzip_file(&gz_path, plain_path)?;
    }

    Ok(fetched)
}

/// Make sure all three LINCS files are in `data_dir`; returns how
/// many were fetched
pub fn acquire_lincs_files(data_dir: &str, fetcher: &impl RemoteFetch) -> anyhow::Result<usize> {
    std::fs::create_dir_all(data_dir)?;
    let mut nfetched = 0;
    for geo_file in LINCS_FILES.iter() {
        if download_if_missing(data_dir, geo_file, fetcher)? {
            nfetched += 1;
        }
    }
    Ok(nfetched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_download_is_removed() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let dest = dir.path().join("partial.gctx.gz");
        std::fs::write(&dest, b"truncated")?;
        let dest = dest.to_str().unwrap();

        let err = discard_partial(dest, anyhow::anyhow!("connection reset"));
        assert_eq!(err.to_string(), "connection reset");
        assert!(!Path::new(dest).exists());

        // nothing to remove
        let err = discard_partial(dest, anyhow::anyhow!("timed out"));
        assert_eq!(err.to_string(), "timed out");
        Ok(())
    }
}
