pub mod config;
pub mod discover;
pub mod error;
pub mod page;
pub mod serve;
pub mod site;
pub mod templates;
pub mod toc;
pub mod tree;
pub mod watch;

pub use config::CONFIG_FILE;
