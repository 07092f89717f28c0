//! Domain entities - the core business objects.

mod page;
mod task;
mod user;

pub use page::{DEFAULT_LIMIT, DEFAULT_OFFSET, Page};
pub use task::{NewTask, ParseTaskStateError, Task, TaskFilter, TaskPatch, TaskState};
pub use user::{NewUser, User, UserInput};
