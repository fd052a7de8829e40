mod drag;
mod lineup_file;
mod report;
pub use drag::*;
pub use lineup_file::*;
pub use report::*;
