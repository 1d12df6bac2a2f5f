pub mod batches;
pub mod enquiries;
pub mod manager;
pub mod models;
pub mod packages;
pub mod subjects;
pub mod users;
