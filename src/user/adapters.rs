//! Adapters over guard-style and token-style auth back ends

use super::{Authenticator, TokenAuth, UserProvider};

/// Guard adapter: the auth identifier, or a configured field
pub struct GuardAdapter<A> {
    auth: A,
    field: Option<String>,
}

impl<A: Authenticator> GuardAdapter<A> {
    pub fn new(auth: A, field: Option<String>) -> Self {
        Self { auth, field }
    }
}

impl<A: Authenticator> UserProvider for GuardAdapter<A> {
    fn user(&self) -> Option<String> {
        let user = self.auth.current_user()?;
        match &self.field {
            Some(field) => user.field(field),
            None => user.auth_identifier(),
        }
    }

    fn user_id(&self) -> Option<u64> {
        self.auth.current_user()?.key()
    }
}

/// Older guard adapter: always the auth identifier
pub struct IlluminateAuthAdapter<A> {
    auth: A,
}

impl<A: Authenticator> IlluminateAuthAdapter<A> {
    pub fn new(auth: A) -> Self {
        Self { auth }
    }
}

impl<A: Authenticator> UserProvider for IlluminateAuthAdapter<A> {
    fn user(&self) -> Option<String> {
        self.auth.current_user()?.auth_identifier()
    }
}

/// Sentry adapter: the user's login, or a configured field
pub struct SentryAdapter<A> {
    auth: A,
    field: Option<String>,
}

impl<A: Authenticator> SentryAdapter<A> {
    pub fn new(auth: A, field: Option<String>) -> Self {
        Self { auth, field }
    }
}

impl<A: Authenticator> UserProvider for SentryAdapter<A> {
    fn user(&self) -> Option<String> {
        let user = self.auth.current_user()?;
        match &self.field {
            Some(field) => user.field(field),
            None => user.login(),
        }
    }
}

/// Sentinel adapter: like Sentry, and exposes the user key
pub struct SentinelAdapter<A> {
    auth: A,
    field: Option<String>,
}

impl<A: Authenticator> SentinelAdapter<A> {
    pub fn new(auth: A, field: Option<String>) -> Self {
        Self { auth, field }
    }
}

impl<A: Authenticator> UserProvider for SentinelAdapter<A> {
    fn user(&self) -> Option<String> {
        let user = self.auth.current_user()?;
        match &self.field {
            Some(field) => user.field(field),
            None => user.login(),
        }
    }

    fn user_id(&self) -> Option<u64> {
        self.auth.current_user()?.key()
    }
}

/// JWT adapter: the token identifier, or a field of the token's user
pub struct JwtAuthAdapter<T> {
    auth: T,
    field: Option<String>,
}

impl<T: TokenAuth> JwtAuthAdapter<T> {
    pub fn new(auth: T, field: Option<String>) -> Self {
        Self { auth, field }
    }
}

impl<T: TokenAuth> UserProvider for JwtAuthAdapter<T> {
    fn user(&self) -> Option<String> {
        let user = self.auth.authenticate()?;
        match &self.field {
            Some(field) => user.field(field),
            None => self.auth.identifier(),
        }
    }
}

/// A fixed identity, for scripts and the command line
#[derive(Debug, Clone, Default)]
pub struct FixedUser {
    user: Option<String>,
    id: Option<u64>,
}

impl FixedUser {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            id: None,
        }
    }

    /// Nobody is acting
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

impl From<Option<String>> for FixedUser {
    fn from(user: Option<String>) -> Self {
        Self { user, id: None }
    }
}

impl UserProvider for FixedUser {
    fn user(&self) -> Option<String> {
        self.user.clone()
    }

    fn user_id(&self) -> Option<u64> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::test_support::{TestGuard, TestUser};
    use crate::user::AuthUser;

    struct TestToken {
        user: Option<TestUser>,
        subject: &'static str,
    }

    impl TokenAuth for TestToken {
        fn authenticate(&self) -> Option<&dyn AuthUser> {
            self.user.as_ref().map(|u| u as &dyn AuthUser)
        }

        fn identifier(&self) -> Option<String> {
            Some(self.subject.to_string())
        }
    }

    #[test]
    fn test_guard_default_identifier_and_key() {
        let adapter = GuardAdapter::new(TestGuard(Some(TestUser::john())), None);
        assert_eq!(adapter.user().as_deref(), Some("1"));
        assert_eq!(adapter.user_id(), Some(1));
    }

    #[test]
    fn test_guard_custom_field() {
        let adapter = GuardAdapter::new(
            TestGuard(Some(TestUser::john())),
            Some("custom_field".to_string()),
        );
        assert_eq!(adapter.user().as_deref(), Some("john@doe.com"));
    }

    #[test]
    fn test_no_user_is_none() {
        assert_eq!(GuardAdapter::new(TestGuard(None), None).user(), None);
        assert_eq!(GuardAdapter::new(TestGuard(None), None).user_id(), None);
        assert_eq!(IlluminateAuthAdapter::new(TestGuard(None)).user(), None);
        assert_eq!(SentryAdapter::new(TestGuard(None), None).user(), None);
        assert_eq!(SentinelAdapter::new(TestGuard(None), None).user(), None);
    }

    #[test]
    fn test_illuminate_auth_has_no_user_id() {
        let adapter = IlluminateAuthAdapter::new(TestGuard(Some(TestUser::john())));
        assert_eq!(adapter.user().as_deref(), Some("1"));
        assert_eq!(adapter.user_id(), None);
    }

    #[test]
    fn test_sentry_and_sentinel_use_login() {
        let sentry = SentryAdapter::new(TestGuard(Some(TestUser::john())), None);
        assert_eq!(sentry.user().as_deref(), Some("john@doe.com"));
        assert_eq!(sentry.user_id(), None);

        let sentinel = SentinelAdapter::new(
            TestGuard(Some(TestUser::john())),
            Some("name".to_string()),
        );
        assert_eq!(sentinel.user().as_deref(), Some("John"));
        assert_eq!(sentinel.user_id(), Some(1));
    }

    #[test]
    fn test_jwt_identifier_and_field() {
        let token = TestToken {
            user: Some(TestUser::john()),
            subject: "sub-1",
        };
        assert_eq!(JwtAuthAdapter::new(token, None).user().as_deref(), Some("sub-1"));

        let token = TestToken {
            user: Some(TestUser::john()),
            subject: "sub-1",
        };
        let adapter = JwtAuthAdapter::new(token, Some("custom_field".to_string()));
        assert_eq!(adapter.user().as_deref(), Some("john@doe.com"));

        let token = TestToken {
            user: None,
            subject: "sub-1",
        };
        assert_eq!(JwtAuthAdapter::new(token, None).user(), None);
    }

    #[test]
    fn test_fixed_user() {
        assert_eq!(FixedUser::new("cli").user().as_deref(), Some("cli"));
        assert_eq!(FixedUser::anonymous().user(), None);
        assert_eq!(FixedUser::from(None).user_id(), None);
    }
}
