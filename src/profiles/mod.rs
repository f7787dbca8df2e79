pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use repo::ProfileStore;
