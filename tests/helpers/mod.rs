pub mod env_lock;
pub mod fixtures;
