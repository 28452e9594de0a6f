mod cancel;
mod lister;
mod progress;
mod record;
mod task;
mod tokens;
mod walker;

pub use cancel::CancellationToken;
pub use lister::{DirEntryInfo, DirLister};
pub use progress::{ScanMessage, ScanProgress, ScanReport};
pub use record::FileRecord;
pub use task::{TaskBarrier, WalkTask};
pub use tokens::{Token, TokenPool};
pub use walker::{ScanConfig, Scanner};
