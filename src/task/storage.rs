#![forbid(unsafe_code)]

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::task::model::{StatusFilter, Task};

const INDENT: &[u8] = b"   ";

#[derive(Debug, Default, Deserialize)]
struct TaskDocument {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct TaskDocumentRef<'a> {
    tasks: &'a [Task],
}

/// Persists the whole task collection as a single `{"tasks": [...]}`
/// document. Every read reloads the file and every write replaces it.
#[derive(Debug, Clone)]
pub struct TaskStore {
    read_path: PathBuf,
    write_path: PathBuf,
}

impl TaskStore {
    #[must_use]
    pub fn new(read_path: PathBuf, write_path: PathBuf) -> Self {
        Self {
            read_path,
            write_path,
        }
    }

    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self::new(path.clone(), path)
    }

    #[must_use]
    pub fn read_path(&self) -> &Path {
        &self.read_path
    }

    #[must_use]
    pub fn write_path(&self) -> &Path {
        &self.write_path
    }

    pub fn read_all(&self) -> Result<Vec<Task>> {
        let path = &self.read_path;
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "task document missing, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(TrackerError::IoPath {
                    path: path.clone(),
                    source,
                });
            }
        };
        let doc: TaskDocument =
            serde_json::from_slice(&data).map_err(|source| TrackerError::Malformed {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), count = doc.tasks.len(), "read tasks");
        Ok(doc.tasks)
    }

    pub fn read_by_status(&self, filter: StatusFilter) -> Result<Vec<Task>> {
        let mut tasks = self.read_all()?;
        tasks.retain(|t| filter.matches(t.status));
        Ok(tasks)
    }

    /// Position of the first task with `id`; duplicates are not repaired.
    pub fn find_index_by_id(&self, id: &str) -> Result<Option<usize>> {
        Ok(self.read_all()?.iter().position(|t| t.id == id))
    }

    pub fn write_all(&self, tasks: &[Task]) -> Result<()> {
        let path = &self.write_path;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_at(parent))?;
        }

        let mut data = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut data, formatter);
        TaskDocumentRef { tasks }
            .serialize(&mut ser)
            .map_err(|source| TrackerError::Malformed {
                path: path.clone(),
                source,
            })?;
        data.push(b'\n');

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &data).map_err(io_at(&tmp))?;
        std::fs::rename(&tmp, path).map_err(io_at(path))?;
        tracing::debug!(path = %path.display(), count = tasks.len(), "wrote tasks");
        Ok(())
    }

    #[must_use]
    pub fn new_task(&self, description: &str) -> Task {
        Task::new(description)
    }
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> TrackerError {
    let path = path.to_path_buf();
    move |source| TrackerError::IoPath { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::model::TaskStatus;

    fn fixture(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_owned(),
            description: format!("Description {id}"),
            status,
            created_at: "now".to_owned(),
            updated_at: "now".to_owned(),
        }
    }

    #[test]
    fn write_then_read_round_trips_field_for_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TaskStore::at(dir.path().join("tasks.json"));
        let tasks = vec![
            fixture("1", TaskStatus::InProgress),
            fixture("2", TaskStatus::Todo),
            store.new_task("fresh"),
        ];
        store.write_all(&tasks).unwrap();
        assert_eq!(store.read_all().unwrap(), tasks);
    }

    #[test]
    fn missing_document_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TaskStore::at(dir.path().join("nope.json"));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = TaskStore::at(path).read_all().unwrap_err();
        assert!(matches!(err, TrackerError::Malformed { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn read_by_status_filters_in_storage_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TaskStore::at(dir.path().join("tasks.json"));
        store
            .write_all(&[
                fixture("1", TaskStatus::Done),
                fixture("2", TaskStatus::Todo),
                fixture("3", TaskStatus::Done),
            ])
            .unwrap();

        let done = store
            .read_by_status(StatusFilter::Only(TaskStatus::Done))
            .unwrap();
        let ids: Vec<&str> = done.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(store.read_by_status(StatusFilter::All).unwrap().len(), 3);
    }

    #[test]
    fn find_index_returns_first_match() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TaskStore::at(dir.path().join("tasks.json"));
        store
            .write_all(&[
                fixture("1", TaskStatus::Todo),
                fixture("2", TaskStatus::Todo),
                fixture("2", TaskStatus::Done),
            ])
            .unwrap();
        assert_eq!(store.find_index_by_id("2").unwrap(), Some(1));
        assert_eq!(store.find_index_by_id("9").unwrap(), None);
    }

    #[test]
    fn document_is_pretty_printed_with_stable_field_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("tasks.json");
        let store = TaskStore::at(path.clone());
        store.write_all(&[fixture("1", TaskStatus::Todo)]).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("{\n   \"tasks\": ["));
        let id = raw.find("\"id\"").unwrap();
        let desc = raw.find("\"description\"").unwrap();
        let status = raw.find("\"status\"").unwrap();
        let created = raw.find("\"createdAt\"").unwrap();
        let updated = raw.find("\"updatedAt\"").unwrap();
        assert!(id < desc && desc < status && status < created && created < updated);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn write_failure_is_fatal_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "regular file").unwrap();
        let store = TaskStore::at(blocker.join("tasks.json"));

        let err = store.write_all(&[fixture("1", TaskStatus::Todo)]).unwrap_err();
        match &err {
            TrackerError::IoPath { path, .. } => assert_eq!(path, &blocker),
            other => panic!("expected IoPath, got {other:?}"),
        }
        assert!(!err.is_recoverable());
        assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "regular file");
    }

    #[test]
    fn separate_read_and_write_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let read = dir.path().join("in.json");
        let write = dir.path().join("out.json");
        TaskStore::at(read.clone())
            .write_all(&[fixture("1", TaskStatus::Todo)])
            .unwrap();

        let store = TaskStore::new(read, write.clone());
        let tasks = store.read_all().unwrap();
        store.write_all(&tasks[..0]).unwrap();
        assert_eq!(TaskStore::at(write).read_all().unwrap(), Vec::new());
        assert_eq!(store.read_all().unwrap().len(), 1);
    }
}
