use ndarray::{Array1, ArrayBase, Axis, Data, Ix1, Ix2};

/// Pearson correlation between two vectors of the same length.
///
/// Accumulates in `f64`. Returns `NaN` when either side has zero
/// variance or fewer than two elements.
pub fn pearson_correlation<S, T>(xx: &ArrayBase<S, Ix1>, yy: &ArrayBase<T, Ix1>) -> f64
where
    S: Data<Elem = f32>,
    T: Data<Elem = f32>,
{
    let n = xx.len();
    if n != yy.len() || n < 2 {
        return f64::NAN;
    }

    let nn = n as f64;
    let mx = xx.iter().map(|&x| x as f64).sum::<f64>() / nn;
    let my = yy.iter().map(|&y| y as f64).sum::<f64>() / nn;

    let (mut sxy, mut sxx, mut syy) = (0_f64, 0_f64, 0_f64);
    for (&x, &y) in xx.iter().zip(yy.iter()) {
        let dx = x as f64 - mx;
        let dy = y as f64 - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    sxy / (sxx.sqrt() * syy.sqrt())
}

/// Row-wise average of a `row x column` matrix
pub fn row_means<S>(xx: &ArrayBase<S, Ix2>) -> Array1<f32>
where
    S: Data<Elem = f32>,
{
    if xx.ncols() == 0 {
        return Array1::zeros(xx.nrows());
    }
    xx.sum_axis(Axis(1)) / xx.ncols() as f32
}

/// `log2(1 + x)` element-wise
pub fn log2_1p<S>(xx: &ArrayBase<S, Ix1>) -> Array1<f32>
where
    S: Data<Elem = f32>,
{
    xx.mapv(|x| (x + 1.0).log2())
}
