//! To-do item types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tutorial_core::{TodoId, TodoTitle, UserId};

/// A to-do item as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: TodoId,
    #[serde(skip)]
    pub owner: UserId,
    pub title: TodoTitle,
    pub memo: String,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub important: bool,
}

/// A validated to-do that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: TodoTitle,
    pub memo: String,
    pub important: bool,
}

/// Fields to overwrite on an existing to-do. `None` leaves a field unchanged.
///
/// `completed` is not editable here; it only changes through the toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<TodoTitle>,
    pub memo: Option<String>,
    pub important: Option<bool>,
}

impl TodoChanges {
    /// Changes that replace every editable field.
    #[must_use]
    pub fn replace_all(todo: NewTodo) -> Self {
        Self {
            title: Some(todo.title),
            memo: Some(todo.memo),
            important: Some(todo.important),
        }
    }

    /// Apply the changes in place.
    pub fn apply(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(memo) = self.memo {
            todo.memo = memo;
        }
        if let Some(important) = self.important {
            todo.important = important;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn todo() -> Todo {
        Todo {
            id: TodoId::new(7),
            owner: UserId::new(1),
            title: TodoTitle::parse("write report").unwrap(),
            memo: "quarterly".to_owned(),
            created_at: Utc::now(),
            completed: true,
            important: false,
        }
    }

    #[test]
    fn test_partial_changes_keep_other_fields() {
        let mut item = todo();
        TodoChanges {
            important: Some(true),
            ..TodoChanges::default()
        }
        .apply(&mut item);

        assert!(item.important);
        assert_eq!(item.title.as_str(), "write report");
        assert_eq!(item.memo, "quarterly");
        assert!(item.completed);
    }

    #[test]
    fn test_replace_all_clears_memo() {
        let mut item = todo();
        TodoChanges::replace_all(NewTodo {
            title: TodoTitle::parse("write summary").unwrap(),
            memo: String::new(),
            important: false,
        })
        .apply(&mut item);

        assert_eq!(item.title.as_str(), "write summary");
        assert!(item.memo.is_empty());
    }

    #[test]
    fn test_json_shape_hides_owner() {
        let json = serde_json::to_value(todo()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "write report");
        assert!(json.get("created").is_some());
        assert!(json.get("owner").is_none());
    }
}
