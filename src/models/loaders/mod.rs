pub mod toml_loader;

pub use toml_loader::{load_all_grading_batches, load_grading_batch};
