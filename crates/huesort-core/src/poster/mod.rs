//! Poster pipeline: locate the poster URL on a film page, download, shrink
//! and store it.

mod fetch;
mod filename;
mod locate;
mod resize;
mod store;

pub use fetch::{fetch_and_save, SaveOutcome};
pub use filename::{poster_file_name, sanitize_film_name};
pub use locate::PosterLocator;
pub use resize::{shrink_to_jpeg, shrunk_dimensions};
pub use store::PosterStore;
