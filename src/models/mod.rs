pub mod project;
pub mod task;
pub mod user;

pub use project::{
    ParticipantInput, Project, ProjectInput, ProjectParticipant, ProjectView, DEFAULT_STATUS,
};
pub use task::{Task, TaskInput, TaskView};
pub use user::{NewUser, ParticipationView, User, UserUpdate};
