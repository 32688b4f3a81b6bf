//! Users Domain
//!
//! User account management: create, list, look up, edit and delete accounts,
//! with a verification email requested after every successful signup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌────────────────────┐
//! │   Service   │ ──▶ │ VerificationSender │  ← logging, or email (feature `notifications`)
//! └──────┬──────┘     └────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← in-memory or Postgres (SeaORM)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, lookups
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_users::{
//!     handlers, InMemoryUserRepository, LoggingVerificationSender, UserService,
//! };
//!
//! let service = UserService::new(
//!     InMemoryUserRepository::new(),
//!     Arc::new(LoggingVerificationSender),
//! );
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notifier;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{
    CreateUser, MessageResponse, NewUser, UpdateUser, User, UserChanges, UserCreated, UserFilter,
    UserLookup, UserResponse, normalize_email,
};
#[cfg(feature = "notifications")]
pub use notifier::EmailVerificationSender;
pub use notifier::{LoggingVerificationSender, VerificationSender};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
