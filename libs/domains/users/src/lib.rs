//! Users Domain
//!
//! Customer and specialist accounts with passwordless-style sign-in: the
//! password is checked first, then a six-digit code is mailed and exchanged
//! for a JWT access/refresh pair.
//!
//! ```text
//! signup ──► OTP mailed ──► verify-otp ──► {access, refresh}
//! signin ──► OTP mailed ──┘                     │
//!                                token/refresh ◄┤
//!                                       logout ◄┘ (both tokens blacklisted)
//! ```
//!
//! Also owns favorites (user ↔ product) and the public specialist directory.

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use config::OtpConfig;
pub use error::{UserError, UserResult};
pub use models::{ProfileResponse, User, UserResponse, UserRole};
pub use postgres::PgUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
