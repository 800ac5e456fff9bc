pub mod atr;
pub mod bollinger_bands;
