//! In-memory todo collection.
//!
//! # Design
//! Records live in a `BTreeMap` keyed by id. Ids come from a counter that
//! only ever increases, so key order and insertion order are the same thing
//! and listing needs no separate ordering index. Deleted ids are gone for
//! good: the counter is never rewound.
//!
//! The store is plain synchronous data. Callers that share it across threads
//! wrap it in a single lock so the map and the counter always move together.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::StoreError;
use crate::types::{Todo, TodoStats, UpdateTodo};

pub struct TodoStore {
    todos: BTreeMap<u64, Todo>,
    next_id: u64,
    clock: Arc<dyn Clock>,
}

impl TodoStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            todos: BTreeMap::new(),
            next_id: 1,
            clock,
        }
    }

    /// All todos, oldest first.
    pub fn list(&self) -> Vec<Todo> {
        self.todos.values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<&Todo> {
        self.todos.get(&id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn create(&mut self, text: &str) -> Result<Todo, StoreError> {
        let text = non_blank(text)?;

        let id = self.next_id;
        self.next_id += 1;

        let todo = Todo {
            id,
            text,
            completed: false,
            created_at: self.clock.now(),
            updated_at: None,
        };
        self.todos.insert(id, todo.clone());
        Ok(todo)
    }

    /// Apply a partial update. Blank text is rejected the same way `create`
    /// rejects it, and nothing is written when validation fails.
    pub fn update(&mut self, id: u64, changes: UpdateTodo) -> Result<Todo, StoreError> {
        let todo = self.todos.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if changes.is_empty() {
            return Ok(todo.clone());
        }

        let text = changes.text.as_deref().map(non_blank).transpose()?;
        if let Some(text) = text {
            todo.text = text;
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        todo.updated_at = Some(self.clock.now());
        Ok(todo.clone())
    }

    pub fn delete(&mut self, id: u64) -> Result<Todo, StoreError> {
        self.todos.remove(&id).ok_or(StoreError::NotFound(id))
    }

    pub fn stats(&self) -> TodoStats {
        let total = self.todos.len();
        let completed = self.todos.values().filter(|t| t.completed).count();
        TodoStats {
            total,
            completed,
            remaining: total - completed,
        }
    }
}

impl fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoStore")
            .field("len", &self.todos.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

fn non_blank(text: &str) -> Result<String, StoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StoreError::text_required());
    }
    Ok(trimmed.to_string())
}
