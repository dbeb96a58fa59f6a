//! The application controller.
//!
//! # Design
//! `TodoController` owns the authoritative collection and everything derived
//! from requests in flight: the optimistic slot, the loading set, the banner
//! and the global loading flag. Handles are cheap clones sharing one
//! `AppState` behind a `tokio::sync::RwLock`. The lock is only held between
//! awaits, never across a request, so a front end can fire a toggle while a
//! delete is still pending and read the loading set meanwhile.
//!
//! Every operation catches its own `ApiError`, shows exactly one banner
//! message for it and reports that message to the caller. Batches
//! (`toggle_all`, `clear_completed`) fan out with `join_all`, settle every
//! member independently and show a single message if any member failed.
//!
//! Overlapping operations on the same id are not serialized: the response
//! that settles last wins. A patch result for an id that has meanwhile left
//! the collection is dropped rather than resurrected.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::api::TodoApi;
use crate::client::TodoClient;
use crate::config::AppConfig;
use crate::error::{validate_title, ValidationError};
use crate::filter::Filter;
use crate::item::ItemCommand;
use crate::loading::LoadingSet;
use crate::notice::{ErrorBanner, ErrorMessage};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Todo, TodoPatch};

/// Side effects a front end should perform after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEffect {
    /// Move keyboard focus to the new-todo input.
    FocusInput,
}

#[derive(Debug, Default)]
struct AppState {
    todos: Vec<Todo>,
    optimistic: Option<Todo>,
    loading: LoadingSet,
    filter: Filter,
    is_loading: bool,
    load_started: bool,
    observed_len: usize,
    effects: Vec<UiEffect>,
}

impl AppState {
    /// Swap in the server's copy. Unknown ids are ignored.
    fn replace(&mut self, todo: Todo) -> bool {
        match self.todos.iter_mut().find(|t| t.id == todo.id) {
            Some(slot) => {
                *slot = todo;
                true
            }
            None => false,
        }
    }

    fn find(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Record the collection size and ask for focus if it shrank.
    fn observe_len(&mut self) {
        if self.todos.len() < self.observed_len {
            self.effects.push(UiEffect::FocusInput);
        }
        self.observed_len = self.todos.len();
    }

    fn clear_optimistic(&mut self) {
        if self.optimistic.take().is_some() {
            self.effects.push(UiEffect::FocusInput);
        }
    }
}

/// Point-in-time copy of the controller state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshot {
    pub todos: Vec<Todo>,
    pub optimistic: Option<Todo>,
    pub loading: LoadingSet,
    pub filter: Filter,
    pub error: ErrorMessage,
    pub is_loading: bool,
}

impl AppSnapshot {
    pub fn filtered_todos(&self) -> Vec<Todo> {
        self.filter.apply(&self.todos).cloned().collect()
    }

    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.len() - self.active_count()
    }

    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|t| t.completed)
    }

    pub fn has_completed(&self) -> bool {
        self.todos.iter().any(|t| t.completed)
    }

    /// New titles cannot be submitted while a create is pending.
    pub fn is_input_disabled(&self) -> bool {
        self.optimistic.is_some()
    }

    pub fn show_footer(&self) -> bool {
        !self.todos.is_empty()
    }

    pub fn items_left_label(&self) -> String {
        format!("{} items left", self.active_count())
    }

    pub fn is_item_loading(&self, id: i64) -> bool {
        self.loading.contains(id)
    }
}

pub struct TodoController<T> {
    api: Arc<TodoApi<T>>,
    state: Arc<RwLock<AppState>>,
    banner: ErrorBanner,
}

impl<T> Clone for TodoController<T> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            banner: self.banner.clone(),
        }
    }
}

impl TodoController<ReqwestTransport> {
    /// Controller talking to the configured server over HTTP.
    pub fn connect(config: &AppConfig) -> Self {
        Self::from_config(config, ReqwestTransport::new())
    }
}

impl<T: Transport> TodoController<T> {
    pub fn new(api: TodoApi<T>, error_display: Duration) -> Self {
        let state = AppState {
            // The input is focused when the app first comes up.
            effects: vec![UiEffect::FocusInput],
            ..AppState::default()
        };
        Self {
            api: Arc::new(api),
            state: Arc::new(RwLock::new(state)),
            banner: ErrorBanner::new(error_display),
        }
    }

    pub fn from_config(config: &AppConfig, transport: T) -> Self {
        let client = TodoClient::new(&config.base_url, config.user_id);
        Self::new(TodoApi::new(client, transport), config.error_display())
    }

    pub fn api(&self) -> &TodoApi<T> {
        &self.api
    }

    pub fn user_id(&self) -> i64 {
        self.api.client().user_id()
    }

    /// Fetch the collection. Only the first call does anything.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), ErrorMessage> {
        {
            let mut state = self.state.write().await;
            if state.load_started {
                debug!("load already ran");
                return Ok(());
            }
            state.load_started = true;
            state.is_loading = true;
        }

        let result = self.api.list().await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        match result {
            Ok(todos) => {
                info!(count = todos.len(), "loaded todos");
                state.todos = todos;
                state.observed_len = state.todos.len();
                Ok(())
            }
            Err(_) => {
                drop(state);
                Err(self.fail(ErrorMessage::LoadFailed))
            }
        }
    }

    /// Create a todo from user input. Returns the server's copy.
    #[instrument(skip(self))]
    pub async fn add(&self, raw_title: &str) -> Result<Todo, ErrorMessage> {
        let title = match validate_title(raw_title) {
            Ok(title) => title.to_string(),
            Err(ValidationError::EmptyTitle) => {
                debug!("rejected empty title");
                return Err(self.fail(ErrorMessage::EmptyTitle));
            }
        };

        {
            let mut state = self.state.write().await;
            state.optimistic = Some(Todo::optimistic(&title, self.user_id()));
        }

        let result = self.api.create(&title, false).await;

        let mut state = self.state.write().await;
        state.clear_optimistic();
        match result {
            Ok(todo) => {
                debug!(id = todo.id, "todo created");
                state.todos.push(todo.clone());
                state.observe_len();
                Ok(todo)
            }
            Err(_) => {
                drop(state);
                Err(self.fail(ErrorMessage::AddFailed))
            }
        }
    }

    /// Complete everything, or un-complete everything if all are done.
    #[instrument(skip(self))]
    pub async fn toggle_all(&self) -> Result<(), ErrorMessage> {
        let (selected, target) = {
            let state = self.state.read().await;
            let all_completed = state.todos.iter().all(|t| t.completed);
            let selected: Vec<i64> = state
                .todos
                .iter()
                .filter(|t| t.completed == all_completed)
                .map(|t| t.id)
                .collect();
            (selected, !all_completed)
        };
        if selected.is_empty() {
            return Ok(());
        }

        self.state.write().await.loading.extend(&selected);

        let patch = TodoPatch::completed(target);
        let results = join_all(selected.iter().map(|&id| self.api.patch(id, &patch))).await;

        let mut failed = 0usize;
        let mut state = self.state.write().await;
        for result in results {
            match result {
                Ok(todo) => {
                    state.replace(todo);
                }
                Err(_) => failed += 1,
            }
        }
        state.loading.remove_all(&selected);
        drop(state);

        debug!(selected = selected.len(), failed, target, "toggle all settled");
        if failed > 0 {
            return Err(self.fail(ErrorMessage::UpdateFailed));
        }
        Ok(())
    }

    /// Flip one item's completion. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub async fn toggle(&self, id: i64) -> Result<(), ErrorMessage> {
        let Some(completed) = self.read_todo(id).await.map(|t| t.completed) else {
            debug!("toggle on unknown id");
            return Ok(());
        };
        self.patch_one(id, TodoPatch::completed(!completed)).await
    }

    /// Retitle one item. A title that trims to nothing deletes the item.
    #[instrument(skip(self))]
    pub async fn rename(&self, id: i64, raw_title: &str) -> Result<(), ErrorMessage> {
        let title = match validate_title(raw_title) {
            Ok(title) => title,
            Err(ValidationError::EmptyTitle) => return self.delete(id).await,
        };
        let Some(current) = self.read_todo(id).await else {
            debug!("rename on unknown id");
            return Ok(());
        };
        if current.title == title {
            return Ok(());
        }
        self.patch_one(id, TodoPatch::title(title)).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ErrorMessage> {
        self.state.write().await.loading.insert(id);

        let result = self.api.delete(id).await;

        let mut state = self.state.write().await;
        state.loading.remove(id);
        match result {
            Ok(()) => {
                state.todos.retain(|t| t.id != id);
                state.observe_len();
                Ok(())
            }
            Err(_) => {
                drop(state);
                Err(self.fail(ErrorMessage::DeleteFailed))
            }
        }
    }

    /// Delete every completed item. Each delete settles on its own; only the
    /// successful ones leave the collection.
    #[instrument(skip(self))]
    pub async fn clear_completed(&self) -> Result<(), ErrorMessage> {
        let completed: Vec<i64> = {
            let mut state = self.state.write().await;
            let ids: Vec<i64> = state
                .todos
                .iter()
                .filter(|t| t.completed)
                .map(|t| t.id)
                .collect();
            state.loading.extend(&ids);
            ids
        };
        if completed.is_empty() {
            return Ok(());
        }

        let results = join_all(completed.iter().map(|&id| async move {
            (id, self.api.delete(id).await)
        }))
        .await;
        let deleted: HashSet<i64> = results
            .into_iter()
            .filter_map(|(id, result)| result.ok().map(|()| id))
            .collect();

        let mut state = self.state.write().await;
        state.todos.retain(|t| !deleted.contains(&t.id));
        state.observe_len();
        state.loading.remove_all(&completed);
        drop(state);

        debug!(attempted = completed.len(), deleted = deleted.len(), "clear completed settled");
        if deleted.len() < completed.len() {
            return Err(self.fail(ErrorMessage::DeleteFailed));
        }
        Ok(())
    }

    /// Carry out what an item editor asked for.
    pub async fn dispatch(&self, command: ItemCommand) -> Result<(), ErrorMessage> {
        match command {
            ItemCommand::Rename { id, title } => self.rename(id, &title).await,
            ItemCommand::Delete(id) => self.delete(id).await,
        }
    }

    pub async fn set_filter(&self, filter: Filter) {
        self.state.write().await.filter = filter;
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        let state = self.state.read().await;
        AppSnapshot {
            todos: state.todos.clone(),
            optimistic: state.optimistic.clone(),
            loading: state.loading.clone(),
            filter: state.filter,
            error: self.banner.current(),
            is_loading: state.is_loading,
        }
    }

    /// Drain pending UI effects in the order they were raised.
    pub async fn take_effects(&self) -> Vec<UiEffect> {
        std::mem::take(&mut self.state.write().await.effects)
    }

    pub fn error(&self) -> ErrorMessage {
        self.banner.current()
    }

    pub fn show_error(&self, message: ErrorMessage) {
        self.banner.show(message);
    }

    pub fn clear_error(&self) {
        self.banner.clear();
    }

    async fn read_todo(&self, id: i64) -> Option<Todo> {
        self.state.read().await.find(id).cloned()
    }

    async fn patch_one(&self, id: i64, patch: TodoPatch) -> Result<(), ErrorMessage> {
        self.state.write().await.loading.insert(id);

        let result = self.api.patch(id, &patch).await;

        let mut state = self.state.write().await;
        state.loading.remove(id);
        match result {
            Ok(todo) => {
                if !state.replace(todo) {
                    debug!(id, "patched todo no longer present");
                }
                Ok(())
            }
            Err(_) => {
                drop(state);
                Err(self.fail(ErrorMessage::UpdateFailed))
            }
        }
    }

    fn fail(&self, message: ErrorMessage) -> ErrorMessage {
        self.banner.show(message);
        message
    }
}
