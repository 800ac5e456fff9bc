mod pivot;

pub use pivot::*;
