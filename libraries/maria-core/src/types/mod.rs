mod request;
mod user;

pub use request::{ModifyUserRequest, NewUserRequest, UserSelector};
pub use user::{UniqueField, User, UserId};
