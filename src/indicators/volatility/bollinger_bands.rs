use crate::trend::ma::moving_average;

/// Bollinger Bands Output
#[derive(Debug, Clone)]
pub struct BollingerBandsOutput {
    /// Upper Band = Middle Band + (Multiplier * SD)
    pub upper_band: Vec<f64>,
    /// Middle Band = SMA
    pub middle_band: Vec<f64>,
    /// Lower Band = Middle Band - (Multiplier * SD)
    pub lower_band: Vec<f64>,
}

/// Computes Bollinger Bands.
///
/// The band width uses the sample standard deviation of the window
/// (denominator `period - 1`).
///
/// # Arguments
///
/// * `data` - A slice of f64 values (typically closing prices).
/// * `period` - The window size for the moving average and standard deviation (typically 20).
/// * `multiplier` - The number of standard deviations for the bands (typically 2.0).
///
/// # Returns
///
/// A `BollingerBandsOutput` struct containing the upper, middle, and lower bands.
pub fn bollinger_bands(data: &[f64], period: usize, multiplier: f64) -> BollingerBandsOutput {
    if period < 2 || period > data.len() {
        let n = data.len();
        return BollingerBandsOutput {
            upper_band: vec![f64::NAN; n],
            middle_band: moving_average(data, period),
            lower_band: vec![f64::NAN; n],
        };
    }

    let middle_band = moving_average(data, period);
    let mut upper_band = Vec::with_capacity(data.len());
    let mut lower_band = Vec::with_capacity(data.len());

    for i in 0..data.len() {
        if i < period - 1 {
            upper_band.push(f64::NAN);
            lower_band.push(f64::NAN);
            continue;
        }

        let slice = &data[i + 1 - period..=i];
        let mean = middle_band[i];

        let variance: f64 =
            slice.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (period - 1) as f64;

        let std_dev = variance.sqrt();

        upper_band.push(mean + multiplier * std_dev);
        lower_band.push(mean - multiplier * std_dev);
    }

    BollingerBandsOutput {
        upper_band,
        middle_band,
        lower_band,
    }
}
