//! Mutations of the ordered browser list.

use std::path::Path;

use crate::config::{BrowserEntry, Config};

impl BrowserEntry {
    /// Entry for a user-chosen executable. A blank name falls back to the
    /// file stem of `path`.
    pub fn from_executable(path: &Path, name: &str) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            file_stem(path)
        } else {
            name.to_string()
        };
        Self {
            name,
            path: path.to_string_lossy().into_owned(),
            args: Vec::new(),
        }
    }
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl Config {
    pub fn browser(&self, index: usize) -> Option<&BrowserEntry> {
        self.browsers.get(index)
    }

    /// The pre-selected entry, clamped into the list.
    pub fn selected_index(&self) -> Option<usize> {
        if self.browsers.is_empty() {
            None
        } else {
            Some(self.last_used.min(self.browsers.len() - 1))
        }
    }

    /// Append `entry` and make it the selection.
    pub fn add_browser(&mut self, entry: BrowserEntry) -> usize {
        log::info!("Adding browser {} ({})", entry.name, entry.path);
        self.browsers.push(entry);
        self.last_used = self.browsers.len() - 1;
        self.last_used
    }

    /// Remove the entry at `index`. The selection always goes back to the
    /// first entry, whichever one was removed.
    pub fn remove_browser(&mut self, index: usize) -> Option<BrowserEntry> {
        if index >= self.browsers.len() {
            return None;
        }
        let removed = self.browsers.remove(index);
        log::info!("Removed browser {} ({})", removed.name, removed.path);
        self.last_used = 0;
        Some(removed)
    }

    pub fn record_launch(&mut self, index: usize) -> bool {
        if index >= self.browsers.len() {
            return false;
        }
        self.last_used = index;
        true
    }
}
