pub mod batch;
pub mod enquiry;
pub mod package;
pub mod subject;
pub mod user;

pub use batch::Batch;
pub use enquiry::Enquiry;
pub use package::Package;
pub use subject::Subject;
pub use user::User;
