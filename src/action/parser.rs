#![forbid(unsafe_code)]

use crate::action::Action;
use crate::action::template::render;
use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::task::model::{StatusFilter, TaskStatus};
use crate::task::storage::TaskStore;

const LIST: &str = "list";
const ADD: &str = "add";
const UPDATE: &str = "update";
const DELETE: &str = "delete";
const MARK: &str = "mark";
const MARK_PREFIX: &str = "mark-";

/// Walks the argument vector command by command, validating arity and task
/// ids against the store.
#[derive(Debug, Clone, Copy)]
pub struct ActionBuilder<'a> {
    config: &'a Config,
    store: &'a TaskStore,
}

impl<'a> ActionBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a Config, store: &'a TaskStore) -> Self {
        Self { config, store }
    }

    /// `args[0]` is the program name. Stops at the first invalid command.
    pub fn parse(&self, args: &[String]) -> Result<Vec<Action>> {
        if args.len() < 2 {
            return Err(TrackerError::NoArguments(
                self.config.errors.no_arguments.clone(),
            ));
        }

        let mut actions = Vec::new();
        let mut i = 1;
        while i < args.len() {
            let (action, next) = self.parse_command(args, i)?;
            tracing::debug!(action = action.name(), at = i, "parsed command");
            actions.push(action);
            i = next;
        }
        Ok(actions)
    }

    /// Returns the action for the command starting at `i` and the index of
    /// the next command.
    fn parse_command(&self, args: &[String], i: usize) -> Result<(Action, usize)> {
        let keyword = args[i].to_lowercase();
        match keyword.as_str() {
            LIST => self.parse_list(args, i),
            ADD => self.parse_add(args, i),
            UPDATE => self.parse_update(args, i),
            DELETE => self.parse_delete(args, i),
            k if k.starts_with(MARK_PREFIX) => self.parse_mark(args, i, k),
            _ => Err(TrackerError::UnknownCommand(render(
                &self.config.errors.unknown_cmd,
                &[&args[i]],
            ))),
        }
    }

    fn parse_list(&self, args: &[String], i: usize) -> Result<(Action, usize)> {
        let Some(token) = args.get(i + 1) else {
            return Ok((Action::List(StatusFilter::All), i + 1));
        };
        if !self.config.actions.list.iter().any(|t| t == token) {
            return Err(self.incorrectly_specified(LIST));
        }
        let filter = token
            .parse::<StatusFilter>()
            .map_err(|_| self.incorrectly_specified(LIST))?;
        Ok((Action::List(filter), i + 2))
    }

    fn parse_add(&self, args: &[String], i: usize) -> Result<(Action, usize)> {
        match args.get(i + 1) {
            Some(desc) if !desc.trim().is_empty() => Ok((Action::Add(desc.clone()), i + 2)),
            _ => Err(self.incorrectly_specified(ADD)),
        }
    }

    fn parse_update(&self, args: &[String], i: usize) -> Result<(Action, usize)> {
        let (Some(id), Some(description)) = (args.get(i + 1), args.get(i + 2)) else {
            return Err(self.incorrectly_specified(UPDATE));
        };
        if description.trim().is_empty() {
            return Err(self.incorrectly_specified(UPDATE));
        }
        self.ensure_exists(id, &self.config.errors.upd_no_id)?;
        let action = Action::Update {
            id: id.clone(),
            description: description.clone(),
        };
        Ok((action, i + 3))
    }

    fn parse_delete(&self, args: &[String], i: usize) -> Result<(Action, usize)> {
        let Some(id) = args.get(i + 1) else {
            return Err(self.incorrectly_specified(DELETE));
        };
        self.ensure_exists(id, &self.config.errors.del_no_id)?;
        Ok((Action::Delete { id: id.clone() }, i + 2))
    }

    fn parse_mark(&self, args: &[String], i: usize, keyword: &str) -> Result<(Action, usize)> {
        if !self.config.actions.mark.iter().any(|t| t == keyword) {
            return Err(self.incorrectly_specified(MARK));
        }
        let status =
            TaskStatus::from_mark_keyword(keyword).ok_or_else(|| self.incorrectly_specified(MARK))?;
        let Some(id) = args.get(i + 1) else {
            return Err(self.incorrectly_specified(MARK));
        };
        self.ensure_exists(id, &self.config.errors.mark_no_id)?;
        Ok((
            Action::Mark {
                id: id.clone(),
                status,
            },
            i + 2,
        ))
    }

    fn ensure_exists(&self, id: &str, template: &str) -> Result<()> {
        match self.store.find_index_by_id(id)? {
            Some(_) => Ok(()),
            None => Err(TrackerError::UnknownTaskId {
                id: id.to_owned(),
                message: render(template, &[id]),
            }),
        }
    }

    fn incorrectly_specified(&self, command: &str) -> TrackerError {
        TrackerError::InvalidArgument(format!(
            "{}{}",
            command.to_uppercase(),
            self.config.errors.incorrectly_specified
        ))
    }
}
