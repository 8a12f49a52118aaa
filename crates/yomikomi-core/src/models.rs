mod series;

pub use series::{Category, SeriesRecord};
