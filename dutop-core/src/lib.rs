pub mod error;
pub mod filter;
pub mod scanner;
pub mod size;
pub mod top;

pub use error::{DutopError, ListError, Result};
pub use filter::ExclusionSet;
pub use scanner::{
    CancellationToken, FileRecord, ScanConfig, ScanMessage, ScanProgress, ScanReport, Scanner,
};
pub use size::{Unit, format_count, format_size};
pub use top::TopFiles;
