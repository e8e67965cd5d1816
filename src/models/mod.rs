pub mod blood_request;
pub mod donation;
pub mod enums;
pub mod filters;
pub mod profile;
pub mod user;

pub use blood_request::*;
pub use donation::*;
pub use filters::*;
pub use profile::*;
pub use user::*;
