pub mod role;
pub mod status;

pub use role::Role;
pub use status::{authorize_transition, CandidateStatus, TransitionDenied};
