//! Acting-user resolution
//!
//! A [`UserProvider`] answers "who is performing this change". Each adapter
//! wraps one authentication back end, reached through the narrow
//! collaborator traits below so hosts can plug in whatever they use.

mod adapters;
mod session;

pub use adapters::{
    FixedUser, GuardAdapter, IlluminateAuthAdapter, JwtAuthAdapter, SentinelAdapter,
    SentryAdapter,
};
pub use session::{EnvSession, SessionAdapter, SESSION_ENV_PREFIX};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source of the acting user's identity
///
/// Absence of a user is `None`, never an error.
pub trait UserProvider {
    /// Identifier stored in the revision's `user` column
    fn user(&self) -> Option<String>;

    /// Numeric key of the acting user, where the back end exposes one
    fn user_id(&self) -> Option<u64> {
        None
    }
}

impl<P: UserProvider + ?Sized> UserProvider for Box<P> {
    fn user(&self) -> Option<String> {
        (**self).user()
    }

    fn user_id(&self) -> Option<u64> {
        (**self).user_id()
    }
}

/// An authenticated user as seen by the auth back ends
pub trait AuthUser {
    /// Named property, stringified
    fn field(&self, name: &str) -> Option<String>;

    /// Identifier the guard authenticates by
    fn auth_identifier(&self) -> Option<String> {
        self.field("id")
    }

    /// Primary key
    fn key(&self) -> Option<u64> {
        self.auth_identifier()?.parse().ok()
    }

    /// Login name (Sentry/Sentinel)
    fn login(&self) -> Option<String> {
        self.field("email")
    }
}

/// A guard or auth manager holding the current user
pub trait Authenticator {
    fn current_user(&self) -> Option<&dyn AuthUser>;
}

/// A token-based authenticator (JWT)
pub trait TokenAuth {
    /// User the current token resolves to
    fn authenticate(&self) -> Option<&dyn AuthUser>;

    /// Subject identifier carried by the token
    fn identifier(&self) -> Option<String>;
}

/// Key/value session data
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
}

/// Which authentication back end the host wires up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UserProviderKind {
    #[default]
    Illuminate,
    Sentry,
    Sentinel,
    JwtAuth,
    Session,
}

impl UserProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Illuminate => "illuminate",
            Self::Sentry => "sentry",
            Self::Sentinel => "sentinel",
            Self::JwtAuth => "jwt-auth",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for UserProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use super::*;

    pub struct TestUser(pub HashMap<&'static str, &'static str>);

    impl TestUser {
        pub fn john() -> Self {
            Self(HashMap::from([
                ("id", "1"),
                ("email", "john@doe.com"),
                ("custom_field", "john@doe.com"),
                ("name", "John"),
            ]))
        }
    }

    impl AuthUser for TestUser {
        fn field(&self, name: &str) -> Option<String> {
            self.0.get(name).map(|v| v.to_string())
        }
    }

    pub struct TestGuard(pub Option<TestUser>);

    impl Authenticator for TestGuard {
        fn current_user(&self) -> Option<&dyn AuthUser> {
            self.0.as_ref().map(|u| u as &dyn AuthUser)
        }
    }
}
