use plotters::style::RGBColor;

/// Lower half of `RdBu`, from -1 (dark red) to 0 (neutral)
const RDBU_LOWER: [(u8, u8, u8); 6] = [
    (103, 0, 31),
    (178, 24, 43),
    (214, 96, 77),
    (244, 165, 130),
    (253, 219, 199),
    (247, 247, 247),
];

fn to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Reversed `summer` at `t` in [0, 1]; yellow at 0, green at 1
pub fn summer_r(t: f64) -> RGBColor {
    let s = 1.0 - t.clamp(0.0, 1.0);
    RGBColor(to_u8(s), to_u8(0.5 + 0.5 * s), to_u8(0.4))
}

/// Colour of series `k` among `n`, spread evenly over `summer_r`
pub fn series_color(k: usize, n: usize) -> RGBColor {
    if n <= 1 {
        summer_r(0.0)
    } else {
        summer_r(k as f64 / (n - 1) as f64)
    }
}

/// Suppression colour of `x` in [-1, 0]; values outside are clamped
/// and `NaN` is white
pub fn suppression_color(x: f32) -> RGBColor {
    if x.is_nan() {
        return RGBColor(255, 255, 255);
    }
    let t = (x as f64 + 1.0).clamp(0.0, 1.0) * (RDBU_LOWER.len() - 1) as f64;
    let lb = (t.floor() as usize).min(RDBU_LOWER.len() - 2);
    let w = t - lb as f64;
    let (a, b) = (RDBU_LOWER[lb], RDBU_LOWER[lb + 1]);
    let mix = |p: u8, q: u8| ((1.0 - w) * p as f64 + w * q as f64).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}
