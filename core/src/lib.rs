//! Client-side core of the todo list manager.
//!
//! # Overview
//! Lists, creates, edits, completes, filters and bulk-clears todo items
//! stored behind a remote REST resource. Rendering is left to the front end:
//! this crate produces plain data (snapshots, rows, UI effects) for it.
//!
//! # Design
//! - `TodoClient` builds `HttpRequest`s and parses `HttpResponse`s without
//!   touching the network. A `Transport` performs the round-trip, and
//!   `TodoApi` joins the two into the four resource operations.
//! - `TodoController` owns the authoritative collection and orchestrates
//!   every mutation, mapping failures to a single `ErrorMessage` on the
//!   auto-dismissing `ErrorBanner`.
//! - `TodoListView` and `ItemEditor` hold per-row presentation state
//!   (transitions, edit mode) and hand commands back to the controller.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod http;
pub mod item;
pub mod list;
pub mod loading;
pub mod notice;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::TodoApi;
pub use client::{TodoClient, DEFAULT_USER_ID};
pub use config::{AppConfig, ConfigError};
pub use controller::{AppSnapshot, TodoController, UiEffect};
pub use error::{ApiError, ValidationError};
pub use filter::Filter;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use item::{EditState, ItemCommand, ItemEditor};
pub use list::{ItemRow, Phase, TodoListView};
pub use loading::LoadingSet;
pub use notice::{ErrorBanner, ErrorMessage};
pub use transport::{ReqwestTransport, Transport};
pub use types::{NewTodo, Todo, TodoPatch};
