//! View filter over the todo collection.

use crate::types::Todo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    /// Hash fragment used by the filter links: `#/`, `#/active`, `#/completed`.
    pub fn fragment(self) -> &'static str {
        match self {
            Filter::All => "#/",
            Filter::Active => "#/active",
            Filter::Completed => "#/completed",
        }
    }

    /// Unknown fragments fall back to `All`.
    pub fn from_fragment(fragment: &str) -> Self {
        let route = fragment.trim_start_matches('#').trim_start_matches('/');
        match route.to_ascii_lowercase().as_str() {
            "active" => Filter::Active,
            "completed" => Filter::Completed,
            _ => Filter::All,
        }
    }

    pub fn apply<'a>(self, todos: &'a [Todo]) -> impl Iterator<Item = &'a Todo> + 'a {
        todos.iter().filter(move |todo| self.matches(todo))
    }
}
