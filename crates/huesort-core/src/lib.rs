pub mod batch;
pub mod config;
pub mod error;
pub mod film_list;
pub mod http;
pub mod interrupt;
pub mod logging;
pub mod poster;
pub mod progress;
