pub mod admin;
pub mod artists;
pub mod arts;
pub mod categories;
pub mod exhibitions;
pub mod orders;
pub mod reports;
pub mod tickets;
