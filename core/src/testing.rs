//! In-memory stand-in for the remote resource, used by unit tests.
//!
//! `FakeServer` answers requests the way the REST contract describes and can
//! be told to fail particular operations or ids. With `hold()` every request
//! parks until `release()` is called, which lets a test look at controller
//! state while requests are in flight.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Semaphore;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{NewTodo, Todo, TodoPatch};

pub const BASE_URL: &str = "http://fake.test";

#[derive(Default)]
struct FakeState {
    next_id: i64,
    todos: BTreeMap<i64, Todo>,
    fail_list: bool,
    fail_create: bool,
    fail_patch: HashSet<i64>,
    fail_delete: HashSet<i64>,
    requests: Vec<HttpRequest>,
}

#[derive(Clone, Default)]
pub struct FakeServer {
    state: Arc<Mutex<FakeState>>,
    gate: Arc<Mutex<Option<Arc<Semaphore>>>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, title: &str, completed: bool, user_id: i64) -> Todo {
        let mut state = self.lock();
        state.next_id += 1;
        let todo = Todo {
            id: state.next_id,
            title: title.to_string(),
            completed,
            user_id,
        };
        state.todos.insert(todo.id, todo.clone());
        todo
    }

    pub fn fail_list(&self) {
        self.lock().fail_list = true;
    }

    pub fn fail_create(&self) {
        self.lock().fail_create = true;
    }

    pub fn fail_patch(&self, id: i64) {
        self.lock().fail_patch.insert(id);
    }

    pub fn fail_delete(&self, id: i64) {
        self.lock().fail_delete.insert(id);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn stored(&self, id: i64) -> Option<Todo> {
        self.lock().todos.get(&id).cloned()
    }

    /// Park every following request until `release`.
    pub fn hold(&self) {
        *self.gate.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self) {
        if let Some(gate) = self.gate.lock().unwrap_or_else(PoisonError::into_inner).take() {
            gate.add_permits(1024);
        }
    }

    /// Yield until at least `n` requests have arrived.
    pub async fn wait_for_requests(&self, n: usize) {
        while self.request_count() < n {
            tokio::task::yield_now().await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.lock();
        let path = request.path.strip_prefix(BASE_URL).unwrap_or(&request.path);
        let (route, query) = path.split_once('?').unwrap_or((path, ""));
        let id = route.strip_prefix("/todos/").and_then(|s| s.parse::<i64>().ok());

        match (request.method, id) {
            (HttpMethod::Get, None) => {
                if state.fail_list {
                    return status(500, "list failed");
                }
                let owner = query
                    .strip_prefix("userId=")
                    .and_then(|s| s.parse::<i64>().ok());
                let todos: Vec<&Todo> = state
                    .todos
                    .values()
                    .filter(|t| owner.is_none_or(|o| t.user_id == o))
                    .collect();
                json(200, &todos)
            }
            (HttpMethod::Post, None) => {
                if state.fail_create {
                    return status(500, "create failed");
                }
                let Some(input) = body::<NewTodo>(request) else {
                    return status(422, "bad body");
                };
                state.next_id += 1;
                let todo = Todo {
                    id: state.next_id,
                    title: input.title,
                    completed: input.completed,
                    user_id: input.user_id,
                };
                state.todos.insert(todo.id, todo.clone());
                json(201, &todo)
            }
            (HttpMethod::Patch, Some(id)) => {
                if state.fail_patch.contains(&id) {
                    return status(500, "patch failed");
                }
                let Some(patch) = body::<TodoPatch>(request) else {
                    return status(422, "bad body");
                };
                let Some(todo) = state.todos.get_mut(&id) else {
                    return status(404, "");
                };
                if let Some(title) = patch.title {
                    todo.title = title;
                }
                if let Some(completed) = patch.completed {
                    todo.completed = completed;
                }
                let todo = todo.clone();
                json(200, &todo)
            }
            (HttpMethod::Delete, Some(id)) => {
                if state.fail_delete.contains(&id) {
                    return status(500, "delete failed");
                }
                match state.todos.remove(&id) {
                    Some(_) => status(204, ""),
                    None => status(404, ""),
                }
            }
            _ => status(405, ""),
        }
    }
}

impl Transport for FakeServer {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.lock().requests.push(request.clone());
        let gate = self
            .gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }
        Ok(self.respond(&request))
    }
}

fn status(code: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status: code,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

fn json<V: serde::Serialize>(code: u16, value: &V) -> HttpResponse {
    status(code, &serde_json::to_string(value).unwrap_or_default())
}

fn body<V: serde::de::DeserializeOwned>(request: &HttpRequest) -> Option<V> {
    serde_json::from_str(request.body.as_deref()?).ok()
}
