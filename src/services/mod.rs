pub mod customers;
pub mod orders;
pub mod reports;
pub mod seed;
pub mod tickets;
