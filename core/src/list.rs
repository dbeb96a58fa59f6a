//! Rendered list of todo rows.
//!
//! # Design
//! `TodoListView` turns the filtered collection into rows. Rows that appear
//! play an enter transition; rows that disappear stay in place, marked
//! `Leaving`, until the transition has run. Each row owns the `ItemEditor`
//! for its id, so an editor lives exactly as long as its row. The optimistic
//! entry is rendered after the real rows and is always loading.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::item::ItemEditor;
use crate::loading::LoadingSet;
use crate::types::Todo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Present,
    Leaving,
}

/// One row as a front end would draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub loading: bool,
    pub phase: Phase,
    pub editing: bool,
    pub optimistic: bool,
}

#[derive(Debug)]
struct Row {
    todo: Todo,
    loading: bool,
    phase: Phase,
    since: Instant,
    editor: ItemEditor,
}

impl Row {
    fn to_item(&self, optimistic: bool) -> ItemRow {
        ItemRow {
            id: self.todo.id,
            title: self.todo.title.clone(),
            completed: self.todo.completed,
            loading: self.loading || optimistic,
            phase: self.phase,
            editing: self.editor.shows_title_field(),
            optimistic,
        }
    }
}

#[derive(Debug)]
pub struct TodoListView {
    rows: Vec<Row>,
    optimistic: Option<Row>,
    transition: Duration,
}

impl TodoListView {
    pub fn new(transition: Duration) -> Self {
        Self {
            rows: Vec::new(),
            optimistic: None,
            transition,
        }
    }

    /// Reconcile rows with the current filtered collection.
    pub fn sync(
        &mut self,
        todos: &[Todo],
        loading: &LoadingSet,
        optimistic: Option<&Todo>,
        now: Instant,
    ) {
        let mut previous: HashMap<i64, (usize, Row)> = self
            .rows
            .drain(..)
            .enumerate()
            .map(|(index, row)| (row.todo.id, (index, row)))
            .collect();

        let mut rows = Vec::with_capacity(todos.len());
        for todo in todos {
            let row = match previous.remove(&todo.id) {
                Some((_, mut row)) => {
                    if row.phase == Phase::Leaving {
                        row.phase = Phase::Entering;
                        row.since = now;
                    }
                    row.editor.sync_title(&todo.title);
                    row.todo = todo.clone();
                    row
                }
                None => self.new_row(todo.clone(), now),
            };
            rows.push(Row {
                loading: loading.contains(todo.id),
                ..row
            });
        }

        let mut leaving: Vec<(usize, Row)> = previous.into_values().collect();
        leaving.sort_by_key(|(index, _)| *index);
        for (index, mut row) in leaving {
            if row.phase != Phase::Leaving {
                row.phase = Phase::Leaving;
                row.since = now;
            }
            let at = index.min(rows.len());
            rows.insert(at, row);
        }
        self.rows = rows;

        match optimistic {
            Some(todo) => {
                let unchanged = self
                    .optimistic
                    .as_ref()
                    .is_some_and(|row| row.todo.id == todo.id);
                if !unchanged {
                    self.optimistic = Some(self.new_row(todo.clone(), now));
                }
            }
            None => {
                if let Some(row) = self.optimistic.as_mut() {
                    if row.phase != Phase::Leaving {
                        row.phase = Phase::Leaving;
                        row.since = now;
                    }
                }
            }
        }
    }

    /// Advance transitions and drop rows that finished leaving.
    pub fn tick(&mut self, now: Instant) {
        let transition = self.transition;
        let settle = |row: &mut Row| -> bool {
            row.editor.tick(now);
            let done = now.saturating_duration_since(row.since) >= transition;
            match row.phase {
                Phase::Entering if done => row.phase = Phase::Present,
                Phase::Leaving if done => return false,
                _ => {}
            }
            true
        };
        self.rows.retain_mut(|row| settle(row));
        if let Some(row) = self.optimistic.as_mut() {
            if !settle(row) {
                self.optimistic = None;
            }
        }
    }

    pub fn rows(&self) -> Vec<ItemRow> {
        self.rows
            .iter()
            .map(|row| row.to_item(false))
            .chain(self.optimistic.iter().map(|row| row.to_item(true)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len() + usize::from(self.optimistic.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Editors exist only for real rows that are not on their way out.
    pub fn editor_mut(&mut self, id: i64) -> Option<&mut ItemEditor> {
        self.rows
            .iter_mut()
            .find(|row| row.todo.id == id && row.phase != Phase::Leaving)
            .map(|row| &mut row.editor)
    }

    fn new_row(&self, todo: Todo, now: Instant) -> Row {
        let editor = ItemEditor::new(todo.id, todo.title.clone(), self.transition);
        Row {
            todo,
            loading: false,
            phase: Phase::Entering,
            since: now,
            editor,
        }
    }
}
