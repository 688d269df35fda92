#![forbid(unsafe_code)]

use std::io::Write;

use crate::action::Action;
use crate::action::template::render;
use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::logger::Logger;
use crate::task::model::{StatusFilter, Task, TaskStatus};
use crate::task::storage::TaskStore;

/// Applies actions in order, one read-modify-write per action.
pub struct Executor<'a, W: Write> {
    config: &'a Config,
    store: &'a TaskStore,
    logger: &'a mut Logger<W>,
}

impl<'a, W: Write> Executor<'a, W> {
    pub fn new(config: &'a Config, store: &'a TaskStore, logger: &'a mut Logger<W>) -> Self {
        Self {
            config,
            store,
            logger,
        }
    }

    pub fn execute(&mut self, actions: &[Action]) -> Result<()> {
        for action in actions {
            self.execute_one(action)?;
        }
        Ok(())
    }

    pub fn execute_one(&mut self, action: &Action) -> Result<()> {
        tracing::debug!(?action, "executing");
        match action {
            Action::List(filter) => self.list(*filter),
            Action::Add(description) => self.add(description),
            Action::Update { id, description } => self.update(id, description),
            Action::Delete { id } => self.delete(id),
            Action::Mark { id, status } => self.mark(id, *status),
        }
    }

    fn list(&mut self, filter: StatusFilter) -> Result<()> {
        let tasks = self.store.read_by_status(filter)?;
        let messages = &self.config.messages;
        if tasks.is_empty() {
            self.logger.write(&messages.empty_list)?;
            return Ok(());
        }

        let header = render(&messages.list_of_tasks, &[&filter.as_str().to_uppercase()]);
        self.logger.write(&header)?;
        for t in &tasks {
            let line = render(
                &messages.list_item,
                &[&t.id, &t.description, t.status.as_str()],
            );
            self.logger.write(&line)?;
        }
        Ok(())
    }

    fn add(&mut self, description: &str) -> Result<()> {
        let mut tasks = self.store.read_all()?;
        let task = self.store.new_task(description);
        let id = task.id.clone();
        tasks.push(task);
        self.store.write_all(&tasks)?;

        let msg = render(&self.config.messages.task_added, &[&id]);
        self.logger.write(&msg)?;
        Ok(())
    }

    fn update(&mut self, id: &str, description: &str) -> Result<()> {
        let mut tasks = self.store.read_all()?;
        let idx = self.position(&tasks, id, &self.config.errors.upd_no_id)?;
        let task = &mut tasks[idx];
        task.description = description.to_owned();
        task.touch();
        self.store.write_all(&tasks)?;

        let msg = render(&self.config.messages.task_updated, &[id]);
        self.logger.write(&msg)?;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let mut tasks = self.store.read_all()?;
        let idx = self.position(&tasks, id, &self.config.errors.del_no_id)?;
        let removed = tasks.remove(idx);
        self.store.write_all(&tasks)?;

        let excerpt = removed.excerpt(self.config.excerpt_len);
        let msg = render(&self.config.messages.task_deleted, &[&excerpt]);
        self.logger.write(&msg)?;
        Ok(())
    }

    fn mark(&mut self, id: &str, status: TaskStatus) -> Result<()> {
        let mut tasks = self.store.read_all()?;
        let idx = self.position(&tasks, id, &self.config.errors.mark_no_id)?;
        let task = &mut tasks[idx];
        task.status = status;
        task.touch();
        let excerpt = task.excerpt(self.config.excerpt_len);
        self.store.write_all(&tasks)?;

        let msg = render(
            &self.config.messages.task_marked,
            &[&excerpt, &status.as_str().to_uppercase()],
        );
        self.logger.write(&msg)?;
        Ok(())
    }

    /// Resolves `id` against the snapshot about to be mutated.
    fn position(&self, tasks: &[Task], id: &str, template: &str) -> Result<usize> {
        tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TrackerError::UnknownTaskId {
                id: id.to_owned(),
                message: render(template, &[id]),
            })
    }
}
