pub mod config;
pub mod hotel;
pub mod quote;
pub mod room;
