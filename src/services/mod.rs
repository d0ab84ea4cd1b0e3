pub mod journal;
pub mod refresh;

pub use crate::database::DatabaseService;
pub use journal::JournalService;
pub use refresh::{LogRefresh, RecordingRefresh, RefreshSink};
