use crate::common::*;
use matrix_util::common_io::{open_buf_reader, read_lines_of_words_delim};
use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_pickle::{DeOptions, Value};
use std::path::Path;

const EFFECT_SUFFIXES: [&str; 4] = [
    "df_effect.tsv",
    "df_effect.tsv.gz",
    "df_effect.csv",
    "df_effect.csv.gz",
];

const EFFECT_PICKLE_SUFFIX: &str = "df_effect.pickle";

const DICT_PICKLE_SUFFIX: &str = "DICT_DRUG_PRE.pickle";
const DICT_TEXT_SUFFIXES: [&str; 2] = ["DICT_DRUG_PRE.txt", "DICT_DRUG_PRE.txt.gz"];

/// Upstream artifacts of one treatment-selection run
pub struct EffectData {
    /// drug instances x clusters, survival-rate deltas only
    pub effect: NamedMat,
    /// drug dictionary keys
    pub drug_keys: Vec<Box<str>>,
}

impl EffectData {
    /// Find and load `*df_effect.*` and `*DICT_DRUG_PRE.*` in `dir`
    pub fn load_dir(dir: &str) -> anyhow::Result<Self> {
        let effect = match find_artifact(dir, &EFFECT_SUFFIXES)? {
            Some(file) => read_effect_matrix(&file)?,
            None => match find_artifact(dir, &[EFFECT_PICKLE_SUFFIX])? {
                Some(file) => {
                    return Err(anyhow::anyhow!(
                        "pickled DataFrame {} is not supported; export it as `*df_effect.tsv` or `*df_effect.csv`",
                        file
                    ));
                }
                None => None,
            },
        }
        .ok_or(anyhow::anyhow!(
            "df_effect in {} does not exist or is empty.",
            dir
        ))?;

        let mut dict_suffixes = vec![DICT_PICKLE_SUFFIX];
        dict_suffixes.extend(DICT_TEXT_SUFFIXES);

        let drug_keys = match find_artifact(dir, &dict_suffixes)? {
            Some(file) => read_drug_keys(&file)?,
            None => vec![],
        };

        if drug_keys.is_empty() {
            return Err(anyhow::anyhow!(
                "DICT_DRUG_PRE in {} does not exist or is empty.",
                dir
            ));
        }

        info!(
            "{} drug instances x {} clusters, {} dictionary keys",
            effect.nrows(),
            effect.ncols(),
            drug_keys.len()
        );

        Ok(Self { effect, drug_keys })
    }
}

/// The first file in `dir`, by name, ending with one of `suffixes`
fn find_artifact(dir: &str, suffixes: &[&str]) -> anyhow::Result<Option<Box<str>>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map_err(|e| anyhow::anyhow!("can't read directory {}: {}", dir, e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| suffixes.iter().any(|s| name.ends_with(s)))
        .collect();
    names.sort();

    Ok(names.first().map(|name| {
        Path::new(dir)
            .join(name)
            .to_string_lossy()
            .into_owned()
            .into_boxed_str()
    }))
}

/// Keep the leading half of the columns, ordered by integer cluster
/// id. `None` if nothing is left.
pub fn read_effect_matrix(file: &str) -> anyhow::Result<Option<NamedMat>> {
    let delim = if file.contains(".csv") { ',' } else { '\t' };
    let full = Mat::read_named_delim(file, delim)?;

    let nkeep = full.ncols() / 2;
    if nkeep == 0 || full.nrows() == 0 {
        return Ok(None);
    }

    let mut cluster_order = (0..nkeep)
        .map(|j| {
            full.cols[j]
                .parse::<i64>()
                .map(|k| (k, j))
                .map_err(|_| anyhow::anyhow!("non-integer cluster id `{}` in {}", full.cols[j], file))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    cluster_order.sort();

    let cols: Vec<usize> = cluster_order.into_iter().map(|(_, j)| j).collect();
    Ok(Some(full.select_cols(&cols)))
}

/// Drug dictionary keys, from a pickled `dict` or a text export
pub fn read_drug_keys(file: &str) -> anyhow::Result<Vec<Box<str>>> {
    if file.ends_with(".pickle") {
        read_pickle_dict_keys(file)
    } else {
        let data = read_lines_of_words_delim(file, &['\t', ',', ' '], -1)?;
        Ok(data
            .lines
            .into_iter()
            .filter_map(|words| words.into_iter().next())
            .filter(|w| !w.is_empty())
            .collect())
    }
}

/// Keys of a map in stream order; values are skipped
struct OrderedKeys(Vec<Value>);

impl<'de> Deserialize<'de> for OrderedKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = OrderedKeys;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a dict")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<OrderedKeys, A::Error> {
                let mut keys = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(key) = map.next_key::<Value>()? {
                    map.next_value::<IgnoredAny>()?;
                    keys.push(key);
                }
                Ok(OrderedKeys(keys))
            }
        }

        deserializer.deserialize_map(KeysVisitor)
    }
}

/// String keys of a pickled top-level `dict`, in insertion order
fn read_pickle_dict_keys(file: &str) -> anyhow::Result<Vec<Box<str>>> {
    let reader = open_buf_reader(file)?;
    let options = DeOptions::new().replace_unresolved_globals();
    let mut de = serde_pickle::Deserializer::new(reader, options);
    let OrderedKeys(found) = OrderedKeys::deserialize(&mut de)
        .and_then(|keys| de.end().map(|_| keys))
        .map_err(|e| anyhow::anyhow!("failed to read a pickled dict in {}: {}", file, e))?;

    let mut keys = Vec::with_capacity(found.len());
    for key in found {
        match key {
            Value::String(s) => keys.push(s.into_boxed_str()),
            Value::Bytes(b) => keys.push(String::from_utf8_lossy(&b).into_owned().into_boxed_str()),
            other => warn!("skipping a non-string key {:?} in {}", other, file),
        }
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_util::common_io::write_lines;
    use serde::ser::{Serialize, Serializer};

    /// dict written in the given key order
    struct PickledDict(Vec<(&'static str, Vec<f64>)>);

    impl Serialize for PickledDict {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
        }
    }

    fn write_pickle(file: &str, dict: &PickledDict) -> anyhow::Result<()> {
        let mut out = std::fs::File::create(file)?;
        serde_pickle::to_writer(&mut out, dict, serde_pickle::SerOptions::new())?;
        Ok(())
    }

    #[test]
    fn leading_half_sorted_by_cluster() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("run_df_effect.tsv");
        let file = file.to_str().unwrap();

        let lines: Vec<Box<str>> = vec![
            "\t10\t2\t0\t10\t2\t0".into(),
            "A_1_24h\t0.1\t0.2\t0.3\t9\t9\t9".into(),
            "B_1_24h\t-0.1\t-0.2\t-0.3\t9\t9\t9".into(),
        ];
        write_lines(&lines, file)?;

        let effect = read_effect_matrix(file)?.unwrap();
        let cols: Vec<&str> = effect.cols.iter().map(|c| c.as_ref()).collect();
        assert_eq!(cols, vec!["0", "2", "10"]);
        assert_eq!(effect.mat.row(0).to_vec(), vec![0.3, 0.2, 0.1]);
        assert_eq!(effect.mat.row(1).to_vec(), vec![-0.3, -0.2, -0.1]);
        Ok(())
    }

    #[test]
    fn pickled_dict_keys_keep_insertion_order() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("run_DICT_DRUG_PRE.pickle");
        let file = file.to_str().unwrap();

        let dict = PickledDict(vec![
            ("DrugA_10.0_24h", vec![1.0]),
            ("DrugA_1.0_24h", vec![2.0]),
            ("DrugB_0.1_24h", vec![]),
            ("DrugA_0.1_24h", vec![3.0, 4.0]),
        ]);
        write_pickle(file, &dict)?;

        let keys = read_drug_keys(file)?;
        let keys: Vec<&str> = keys.iter().map(|k| k.as_ref()).collect();
        assert_eq!(
            keys,
            vec!["DrugA_10.0_24h", "DrugA_1.0_24h", "DrugB_0.1_24h", "DrugA_0.1_24h"]
        );
        Ok(())
    }

    #[test]
    fn pickled_list_is_not_a_dict() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("run_DICT_DRUG_PRE.pickle");
        let file = file.to_str().unwrap();

        let mut out = std::fs::File::create(file)?;
        serde_pickle::to_writer(&mut out, &vec!["A_1_24h"], serde_pickle::SerOptions::new())?;
        drop(out);

        assert!(read_drug_keys(file).is_err());
        Ok(())
    }

    #[test]
    fn missing_artifacts_are_errors() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let dir_name = dir.path().to_str().unwrap();

        let err = EffectData::load_dir(dir_name).err().unwrap();
        assert!(err.to_string().contains("df_effect"));

        let pickled = dir.path().join("run_df_effect.pickle");
        write_pickle(pickled.to_str().unwrap(), &PickledDict(vec![("A_1_24h", vec![0.1])]))?;
        let err = EffectData::load_dir(dir_name).err().unwrap();
        assert!(err.to_string().contains("pickled DataFrame"));
        assert!(err.to_string().contains("run_df_effect.pickle"));
        std::fs::remove_file(&pickled)?;

        let lines: Vec<Box<str>> = vec!["\t0\t0".into(), "A_1_24h\t0.1\t0.5".into()];
        write_lines(&lines, dir.path().join("df_effect.tsv").to_str().unwrap())?;

        let err = EffectData::load_dir(dir_name).err().unwrap();
        assert!(err.to_string().contains("DICT_DRUG_PRE"));
        Ok(())
    }
}
