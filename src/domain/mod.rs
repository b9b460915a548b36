mod listing;

pub use listing::{Gps, Listing};
