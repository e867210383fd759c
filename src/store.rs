//! File-backed task store.
//!
//! The store owns the ordered task list and its JSON file. Every mutating
//! operation rewrites the whole file; a task's identity is its position in
//! the list, so removals shift every later index down by one.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::task::Task;

/// Default file name, resolved against the working directory.
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// Ordered task list plus the path it persists to.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Create an empty store bound to `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tasks: Vec::new(),
        }
    }

    /// Create a store and load it, returning the load error (if any) next to
    /// the already-reset store so the caller can report it.
    pub fn open(path: impl Into<PathBuf>) -> (Self, Option<StoreError>) {
        let mut store = Self::new(path);
        let err = store.load().err();
        (store, err)
    }

    /// Replace the in-memory list with the file contents.
    ///
    /// A missing file yields an empty list. On a read or parse failure the list
    /// is reset to empty and the error is returned; unreadable content is not
    /// partially recovered.
    pub fn load(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no task file yet, starting empty");
            self.tasks.clear();
            return Ok(());
        }

        let result = fs::read_to_string(&self.path)
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })
            .and_then(|buf| {
                serde_json::from_str::<Vec<Task>>(&buf).map_err(|source| StoreError::Parse {
                    path: self.path.clone(),
                    source,
                })
            });

        match result {
            Ok(tasks) => {
                info!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
                self.tasks = tasks;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "task file unusable, starting empty");
                self.tasks.clear();
                Err(e)
            }
        }
    }

    /// Write the full list to disk via a temporary file and a rename.
    ///
    /// When the task file is a symlink the rename lands on the file it points
    /// at, so the link itself survives the save.
    pub fn save(&self) -> Result<(), StoreError> {
        let data = self.to_json()?;
        let target = self.write_target();

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = temp_path(&target);
        let write = |tmp: &Path| -> std::io::Result<()> {
            let mut f = File::create(tmp)?;
            f.write_all(&data)?;
            f.flush()?;
            fs::rename(tmp, &target)
        };
        write(&tmp).map_err(|source| StoreError::Write {
            path: target.clone(),
            source,
        })?;

        debug!(path = %target.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    /// Add a task at the end of the list.
    pub fn append(&mut self, task: Task) -> Result<(), StoreError> {
        self.tasks.push(task);
        self.save()
    }

    /// Overwrite the task at `index` wholesale.
    pub fn replace(&mut self, index: usize, task: Task) -> Result<(), StoreError> {
        let slot = self.slot_mut(index)?;
        *slot = task;
        self.save()
    }

    /// Flip the completion flag at `index`, returning the new value.
    pub fn toggle(&mut self, index: usize) -> Result<bool, StoreError> {
        let slot = self.slot_mut(index)?;
        slot.completed = !slot.completed;
        let completed = slot.completed;
        self.save()?;
        Ok(completed)
    }

    /// Remove and return the task at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Task, StoreError> {
        self.check_index(index)?;
        let removed = self.tasks.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Drop every completed task, keeping the rest in order. Returns how many were removed.
    pub fn remove_all_completed(&mut self) -> Result<usize, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        self.save()?;
        Ok(removed)
    }

    /// All tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The task at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when there are no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.tasks.len(),
            })
        }
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Task, StoreError> {
        let len = self.tasks.len();
        self.tasks
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })
    }

    /// Pretty JSON with 4-space indentation.
    fn to_json(&self) -> Result<Vec<u8>, StoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.tasks.serialize(&mut ser)?;
        Ok(buf)
    }

    /// The file a save replaces: the symlink's resolved target, or the path itself.
    fn write_target(&self) -> PathBuf {
        let is_link = fs::symlink_metadata(&self.path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        if !is_link {
            return self.path.clone();
        }
        match fs::canonicalize(&self.path) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "dangling symlink, replacing the link");
                self.path.clone()
            }
        }
    }
}

/// Sibling `<name>.tmp` of `target`.
fn temp_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(DEFAULT_TASKS_FILE));
    name.push(".tmp");
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> TaskStore {
        TaskStore::new(dir.path().join("tasks.json"))
    }

    fn reloaded(store: &TaskStore) -> Vec<Task> {
        let mut other = TaskStore::new(store.path());
        other.load().unwrap();
        other.tasks().to_vec()
    }

    fn task(desc: &str) -> Task {
        Task::new(desc, "", Priority::Medium)
    }

    #[test]
    fn test_missing_file_loads_empty_without_error() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.load().unwrap();
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_every_mutation_round_trips_through_the_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.append(task("Buy milk")).unwrap();
        assert_eq!(reloaded(&store), store.tasks());

        store.append(Task::new("File taxes", "2025-04-15", Priority::High)).unwrap();
        assert_eq!(reloaded(&store), store.tasks());

        store.replace(0, Task::new("Buy oat milk", "2025-01-02", Priority::Low)).unwrap();
        assert_eq!(reloaded(&store), store.tasks());

        store.toggle(1).unwrap();
        assert_eq!(reloaded(&store), store.tasks());

        store.remove(0).unwrap();
        assert_eq!(reloaded(&store), store.tasks());
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].description, "File taxes");
        assert!(store.tasks()[0].completed);
    }

    #[test]
    fn test_toggle_twice_restores_flag() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(task("Walk dog")).unwrap();

        assert!(store.toggle(0).unwrap());
        assert!(!store.toggle(0).unwrap());
        assert!(!store.get(0).unwrap().completed);
    }

    #[test]
    fn test_remove_all_completed_keeps_relative_order() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for name in ["a", "b", "c", "d", "e"] {
            store.append(task(name)).unwrap();
        }
        store.toggle(1).unwrap();
        store.toggle(3).unwrap();

        assert_eq!(store.remove_all_completed().unwrap(), 2);
        let names: Vec<_> = store.tasks().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["a", "c", "e"]);

        let after_reload = reloaded(&store);
        assert_eq!(after_reload.len(), 3);
        assert!(after_reload.iter().all(|t| t.description != "b" && t.description != "d"));
    }

    #[test]
    fn test_out_of_range_index_is_rejected_without_change() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(task("only")).unwrap();

        assert!(matches!(
            store.replace(1, task("x")),
            Err(StoreError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(matches!(store.toggle(5), Err(StoreError::IndexOutOfRange { .. })));
        assert!(matches!(store.remove(1), Err(StoreError::IndexOutOfRange { .. })));
        assert_eq!(store.tasks(), &[task("only")]);
    }

    #[test]
    fn test_corrupt_file_reports_error_and_resets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = TaskStore::new(&path);
        store.tasks.push(task("stale"));
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_priority_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"task": "x", "due_date": "", "priority": "Urgent", "completed": false}]"#,
        )
        .unwrap();

        let (store, err) = TaskStore::open(&path);
        assert!(matches!(err, Some(StoreError::Parse { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_writes_four_space_indented_array() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.append(task("Buy milk")).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n    {\n        \"task\": \"Buy milk\""));
        assert!(!temp_path(store.path()).exists());
    }

    #[test]
    fn test_save_creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = TaskStore::new(dir.path().join("nested").join("tasks.json"));
        store.append(task("x")).unwrap();
        assert_eq!(reloaded(&store).len(), 1);
    }

    #[test]
    fn test_unwritable_location_reports_write_error_and_keeps_task_in_memory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut store = TaskStore::new(blocker.join("tasks.json"));

        let err = store.append(task("Buy milk")).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.tasks(), &[task("Buy milk")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_symlink_keeps_the_link() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.json");
        let link = dir.path().join("tasks.json");
        fs::write(&real, "[]").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let (mut store, err) = TaskStore::open(&link);
        assert!(err.is_none());
        store.append(task("Buy milk")).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert!(fs::read_to_string(&real).unwrap().contains("Buy milk"));
        assert_eq!(reloaded(&store), store.tasks());
    }
}
