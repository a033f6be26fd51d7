//! Domain entities and value objects for the career fair back office.

pub mod application;
pub mod company;
pub mod participant;
pub mod position;
pub mod types;
