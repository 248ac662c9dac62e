//! Page acquisition: fetching markup and turning it into a [`PageCapture`].

pub mod capture;
pub mod fetch;

pub use capture::PageCapture;
pub use fetch::{FetchConfig, FileSource, HttpSource, PageSource, capture_page, normalize_url};
