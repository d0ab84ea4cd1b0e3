use log::info;
use std::sync::Mutex;

pub const COFFEES_VIEW: &str = "/coffees";
pub const BREWS_VIEW: &str = "/brews";

pub fn coffee_view(id: i32) -> String {
    format!("{COFFEES_VIEW}/{id}")
}

pub fn brew_view(id: i32) -> String {
    format!("{BREWS_VIEW}/{id}")
}

/// Receives the view paths a mutation made stale
pub trait RefreshSink: Send + Sync + std::fmt::Debug {
    fn revalidate(&self, path: &str);
}

/// Default sink: records each stale view in the log
#[derive(Debug, Default)]
pub struct LogRefresh;

impl RefreshSink for LogRefresh {
    fn revalidate(&self, path: &str) {
        info!("Revalidating view {path}");
    }
}

/// Keeps every signalled path in memory, in order
#[derive(Debug, Default)]
pub struct RecordingRefresh {
    paths: Mutex<Vec<String>>,
}

impl RecordingRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears the recorded paths
    pub fn take(&self) -> Vec<String> {
        match self.paths.lock() {
            Ok(mut paths) => std::mem::take(&mut *paths),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl RefreshSink for RecordingRefresh {
    fn revalidate(&self, path: &str) {
        match self.paths.lock() {
            Ok(mut paths) => paths.push(path.to_string()),
            Err(poisoned) => poisoned.into_inner().push(path.to_string()),
        }
    }
}
