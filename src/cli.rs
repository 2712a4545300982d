pub mod manage;
pub mod query;
pub mod setup;

pub use manage::ManageCommand;
pub use query::QueryCommand;
