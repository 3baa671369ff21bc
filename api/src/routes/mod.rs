pub mod complaints;
pub mod emergency;
pub mod health;
pub mod logs;
pub mod stats;
