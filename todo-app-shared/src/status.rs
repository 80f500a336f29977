use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Completion state of a todo.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    pub fn is_completed(self) -> bool {
        self == Status::Completed
    }

    pub fn is_pending(self) -> bool {
        self == Status::Pending
    }

    /// Returns the opposite status, leaving `self` untouched.
    pub fn toggle(self) -> Self {
        match self {
            Status::Pending => Status::Completed,
            Status::Completed => Status::Pending,
        }
    }

    pub fn as_bool(self) -> bool {
        self.is_completed()
    }

    /// Integer flag as stored in the `completed` column.
    pub fn as_flag(self) -> i32 {
        match self {
            Status::Pending => 0,
            Status::Completed => 1,
        }
    }

    /// Any non-zero flag counts as completed.
    pub fn from_flag(flag: i32) -> Self {
        Status::from(flag != 0)
    }
}

impl From<bool> for Status {
    fn from(completed: bool) -> Self {
        match completed {
            true => Status::Completed,
            false => Status::Pending,
        }
    }
}

impl From<Status> for bool {
    fn from(status: Status) -> Self {
        status.as_bool()
    }
}
