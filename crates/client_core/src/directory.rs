//! Local mirror of the service's process list.

use std::sync::Arc;

use shared::domain::{Process, ProcessId};

/// Immutable snapshot of the last fetched process list. Mutations build a new
/// snapshot and swap it in, so readers holding the old `Arc` are unaffected.
#[derive(Debug, Clone)]
pub struct ProcessDirectory {
    snapshot: Arc<[Process]>,
}

impl Default for ProcessDirectory {
    fn default() -> Self {
        Self {
            snapshot: Arc::from(Vec::new()),
        }
    }
}

impl ProcessDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<[Process]> {
        Arc::clone(&self.snapshot)
    }

    pub fn replace(&mut self, processes: Vec<Process>) {
        self.snapshot = Arc::from(processes);
    }

    pub fn append(&mut self, process: Process) {
        let mut next = Vec::with_capacity(self.snapshot.len() + 1);
        next.extend(self.snapshot.iter().cloned());
        next.push(process);
        self.snapshot = Arc::from(next);
    }

    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.snapshot.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.snapshot.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(id: i64, name: &str, clock: u64) -> Process {
        Process {
            id: ProcessId(id),
            name: name.to_string(),
            logical_clock: clock,
        }
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let mut directory = ProcessDirectory::new();
        directory.replace(vec![process(1, "Alice", 0), process(2, "Bob", 0)]);
        let before = directory.snapshot();

        directory.replace(vec![process(2, "Bob", 3)]);

        assert_eq!(before.len(), 2);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.get(ProcessId(2)).map(|p| p.logical_clock), Some(3));
        assert!(!directory.contains(ProcessId(1)));
    }

    #[test]
    fn append_keeps_existing_order() {
        let mut directory = ProcessDirectory::new();
        assert!(directory.is_empty());
        directory.append(process(1, "Alice", 0));
        directory.append(process(2, "Bob", 0));

        let names: Vec<&str> = directory.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob"]);
    }
}
