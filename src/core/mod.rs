pub mod error;
pub mod io;

pub use error::DataError;
