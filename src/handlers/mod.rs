pub mod auth;
pub mod batches;
pub mod enquiries;
pub mod packages;
pub mod students;
pub mod subjects;
pub mod users;
