pub mod entry;
pub mod error;
pub mod hashtag;
pub mod summary;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
