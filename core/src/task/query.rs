//! Query types for listing tasks
//!
//! A [`TaskQuery`] is a pure value: filter, optional sort and pagination.
//! Stores interpret it; building one never performs I/O.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;

use super::model::{Task, TaskPriority, TaskStatus};
use crate::Error;

/// Page size used when the caller does not ask for one
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    DueDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort key as written on the wire: `field` or `-field`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct TaskSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl TaskSort {
    pub const VALUES: &'static [&'static str] = &["createdAt", "-createdAt", "dueDate", "-dueDate"];

    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            order: SortOrder::Descending,
        }
    }

    /// Compare two tasks under this sort.
    ///
    /// A missing due date orders below any present one, so it comes first
    /// ascending and last descending.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::DueDate => a.due_date.cmp(&b.due_date),
        };
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for TaskSort {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (order, name) = match raw.strip_prefix('-') {
            Some(name) => (SortOrder::Descending, name),
            None => (SortOrder::Ascending, raw),
        };
        let field = match name {
            "createdAt" => SortField::CreatedAt,
            "dueDate" => SortField::DueDate,
            _ => return Err(Error::InvalidInput(format!("unsupported sort key: {raw}"))),
        };
        Ok(Self { field, order })
    }
}

impl TryFrom<String> for TaskSort {
    type Error = Error;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Equality constraints; `None` matches every value of that field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
    }
}

/// Accepted list parameters, after validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListParams {
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub sort: Option<TaskSort>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub skip: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    pub filter: TaskFilter,
    /// `None` keeps the store's default order
    pub sort: Option<TaskSort>,
    pub skip: usize,
    pub limit: usize,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            filter: TaskFilter::default(),
            sort: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl From<TaskListParams> for TaskQuery {
    fn from(params: TaskListParams) -> Self {
        Self {
            filter: TaskFilter {
                status: params.status,
                priority: params.priority,
            },
            sort: params.sort,
            skip: params.skip.unwrap_or(0),
            limit: params.limit.unwrap_or(DEFAULT_LIMIT),
        }
    }
}
