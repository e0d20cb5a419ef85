pub mod error;
pub mod logging;
pub mod models;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use models::{ImageGenerator, NewsSource, TextGenerator};
pub use paths::AppPaths;
pub use types::*;
