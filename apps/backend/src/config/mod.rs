pub mod db;
pub mod game;

pub use db::{db_url, DbProfile};
pub use game::{GameConfig, HandVisibility};
