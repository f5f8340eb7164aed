//! Command implementations.

pub mod config;
pub mod discover;
pub mod find;
pub mod leaderboard;
pub mod show;

pub use self::config::execute_config;
pub use self::discover::execute_discover;
pub use self::find::execute_find;
pub use self::leaderboard::execute_leaderboard;
pub use self::show::execute_show;
