//! # Gatekeep - Authentication Service Library
//!
//! This is a facade crate that re-exports all public APIs from the gatekeep
//! service components. Use this crate to get access to all authentication
//! functionality in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! gatekeep = { path = "../gatekeep" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `User`, `Otp`, etc.
//! - **Repository traits**: `UserStore`, `SignupCacheStore`, `ResetOtpStore`
//! - **Use cases**: `RegisterUseCase`, `LoginUseCase`, etc.
//! - **Adapters**: `PostgresUserStore`, `RedisSignupCache`, `PostmarkEmailClient`, etc.
//! - **Service**: `AuthService` - The main entry point for the auth service

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use gatekeep_core::*;
}

// Re-export most commonly used core types at the root level
pub use gatekeep_core::{
    DomainAllowList, Email, Otp, OtpError, Password, PendingSignup, ResetOtp, User, UserError,
    Username,
};

// ============================================================================
// Repository Traits (Ports)
// ============================================================================

/// Repository trait definitions
pub mod repositories {
    pub use gatekeep_core::{
        ActivityLogStore, ActivityLogStoreError, ResetOtpStore, ResetOtpStoreError,
        SignupCacheStore, SignupCacheStoreError, UserStore, UserStoreError,
    };
}

// Re-export repository traits at root level
pub use gatekeep_core::{
    ActivityLogStore, ActivityLogStoreError, EmailClient, ResetOtpStore, ResetOtpStoreError,
    SignupCacheStore, SignupCacheStoreError, UserStore, UserStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use gatekeep_application::*;
}

// Re-export use cases at root level
pub use gatekeep_application::{
    ChangePasswordUseCase, LoginUseCase, RegisterUseCase, RequestResetOtpUseCase,
    VerifyRegistrationUseCase, VerifyResetOtpUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers and middleware
    pub mod http {
        pub use gatekeep_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use gatekeep_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use gatekeep_adapters::email::*;
    }

    /// JWT authentication utilities
    pub mod auth {
        pub use gatekeep_adapters::auth::*;
    }

    /// Configuration
    pub mod config {
        pub use gatekeep_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use gatekeep_adapters::{
    email::{MockEmailClient, PostmarkEmailClient},
    persistence::{
        HashmapResetOtpStore, HashmapUserStore, InMemoryActivityLog, InMemorySignupCache,
        PostgresActivityLog, PostgresResetOtpStore, PostgresUserStore, RedisSignupCache,
    },
};

// ============================================================================
// Auth Service (Main Entry Point)
// ============================================================================

/// Main auth service
pub use gatekeep_auth_service::{
    AuthService, configure_postgresql, configure_redis, get_redis_client,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing repository traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
