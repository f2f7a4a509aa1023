pub mod models;
pub mod services;

pub use models::{AuthError, Identity, LoginRequest, LoginResponse};
pub use services::{CredentialService, PasswordService};
