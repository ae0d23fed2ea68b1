pub mod error;
pub mod config;
pub mod note;
pub mod tool;
pub mod util;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_HASH: &str = env!("GIT_HASH");
