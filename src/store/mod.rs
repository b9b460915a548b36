pub mod listings;
pub mod ratings;

pub use listings::{load_json_array, load_jsonl, save_json_array, save_jsonl};
pub use ratings::{
    import_manual_csv, insert_rating, is_already_rated, load_ratings, save_ratings, RatingsStore,
};
