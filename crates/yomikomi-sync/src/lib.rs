pub mod catalog_file;
pub mod chapter;
pub mod error;
pub mod merge;
pub mod reconcile;
pub mod scanner;
pub mod watch;
