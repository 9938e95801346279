//! Authentication: credential validation and the auth service trait.

mod credentials;
mod service;

pub use credentials::{
    LoginCredentials, MIN_NAME_LEN, MIN_PASSWORD_LEN, RegisterRequest, Registration,
    is_valid_email,
};
pub use service::{AuthService, VerifiedUser};
