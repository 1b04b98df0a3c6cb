pub mod branch;
pub mod execution;
pub mod report;
pub mod ticket;
pub mod ticket_key;
