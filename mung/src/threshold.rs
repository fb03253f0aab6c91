use crate::common::*;

/// Cutoffs used by the treatment selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// survival-rate threshold
    pub threshold: f32,
    /// consistency threshold
    pub con_threshold: f32,
}

fn in_range(x: &f32) -> bool {
    (-1.0..=1.0).contains(x)
}

/// `..._t0.3_cont0.2.csv` -> `0.3`
///
/// Split at the last two `_` and take what follows the last `t` of
/// the middle piece.
pub fn threshold_from_name(table: &str) -> anyhow::Result<f32> {
    let pieces: Vec<&str> = table.rsplitn(3, '_').collect();
    let middle = match pieces.as_slice() {
        [_, middle, _] => *middle,
        _ => {
            return Err(anyhow::anyhow!(
                "can't find `_t<threshold>_` in the table name: {}",
                table
            ))
        }
    };
    let value = middle
        .rsplit_once('t')
        .map(|(_, v)| v)
        .ok_or(anyhow::anyhow!("no `t` marker in `{}`", middle))?;
    value
        .parse::<f32>()
        .map_err(|e| anyhow::anyhow!("threshold `{}` in {}: {}", value, table, e))
}

/// `..._t0.3_cont0.2.csv` -> `0.2`
///
/// Drop the extension and take what follows the last `cont`.
pub fn con_threshold_from_name(table: &str) -> anyhow::Result<f32> {
    let stem = table.rsplit_once('.').map(|(s, _)| s).unwrap_or(table);
    let value = stem
        .rsplit_once("cont")
        .map(|(_, v)| v)
        .ok_or(anyhow::anyhow!(
            "can't find `cont<threshold>` in the table name: {}",
            table
        ))?;
    value
        .parse::<f32>()
        .map_err(|e| anyhow::anyhow!("consistency threshold `{}` in {}: {}", value, table, e))
}

/// Explicit values win when they are in `[-1, 1]`; otherwise the
/// value comes from the table's file name
pub fn resolve_thresholds(
    table: &str,
    threshold: Option<f32>,
    con_threshold: Option<f32>,
) -> anyhow::Result<Thresholds> {
    let threshold = match threshold {
        Some(x) if in_range(&x) => x,
        other => {
            if let Some(x) = other {
                warn!("ignoring threshold {} outside [-1, 1]", x);
            }
            threshold_from_name(table)?
        }
    };

    let con_threshold = match con_threshold {
        Some(x) if in_range(&x) => x,
        other => {
            if let Some(x) = other {
                warn!("ignoring consistency threshold {} outside [-1, 1]", x);
            }
            con_threshold_from_name(table)?
        }
    };

    info!(
        "threshold = {}, consistency threshold = {}",
        threshold, con_threshold
    );
    Ok(Thresholds {
        threshold,
        con_threshold,
    })
}
