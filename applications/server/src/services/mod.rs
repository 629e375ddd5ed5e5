/// Business services
pub mod user;

pub use user::{UserManager, UserService};

#[cfg(test)]
pub use user::MockUserManager;
