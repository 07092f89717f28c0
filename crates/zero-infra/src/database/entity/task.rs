//! Task entity for SeaORM, stored in the `todos` table.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use zero_core::domain::{NewTask, Task, TaskState};

/// Column representation of [`TaskState`]. Any other stored string fails to
/// decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum State {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "todo")]
    Todo,
    #[sea_orm(string_value = "doing")]
    Doing,
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "trash")]
    Trash,
}

impl From<TaskState> for State {
    fn from(state: TaskState) -> Self {
        match state {
            TaskState::Draft => State::Draft,
            TaskState::Todo => State::Todo,
            TaskState::Doing => State::Doing,
            TaskState::Done => State::Done,
            TaskState::Trash => State::Trash,
        }
    }
}

impl From<State> for TaskState {
    fn from(state: State) -> Self {
        match state {
            State::Draft => TaskState::Draft,
            State::Todo => TaskState::Todo,
            State::Doing => TaskState::Doing,
            State::Done => TaskState::Done,
            State::Trash => TaskState::Trash,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub state: State,
    pub user_id: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Task.
impl From<Model> for Task {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.user_id,
            title: model.title,
            description: model.description,
            state: model.state.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Task to SeaORM ActiveModel.
impl From<Task> for ActiveModel {
    fn from(task: Task) -> Self {
        Self {
            id: Set(task.id),
            title: Set(task.title),
            description: Set(task.description),
            state: Set(task.state.into()),
            user_id: Set(task.owner_id),
            created_at: Set(task.created_at.into()),
            updated_at: Set(task.updated_at.into()),
        }
    }
}

impl From<NewTask> for ActiveModel {
    fn from(task: NewTask) -> Self {
        let now = Utc::now();
        Self {
            id: NotSet,
            title: Set(task.title),
            description: Set(task.description),
            state: Set(task.state.into()),
            user_id: Set(task.owner_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
