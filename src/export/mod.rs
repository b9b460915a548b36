mod csv_export;
mod rated_csv;

pub use csv_export::{export_csv, PREFERRED_COLUMNS};
pub use rated_csv::export_rated_csv;
