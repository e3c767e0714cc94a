//! In-memory `IdentityProvider` with opaque UUID session tokens.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{read, write};
use crate::domain::ports::{IdentityProvider, IdentityProviderError, SubjectAttributes};
use crate::domain::{AccessToken, AuthSession, Credentials, Subject, SubjectId};

struct Account {
    subject: Subject,
    password: Zeroizing<String>,
}

#[derive(Default)]
struct Directory {
    // Keyed by lower-cased email.
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, SubjectId>,
}

/// Accounts and live sessions held in process memory.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    directory: RwLock<Directory>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account outside the sign-up flow, e.g. a seeded
    /// administrator. Replaces any account with the same email.
    pub fn register(
        &self,
        credentials: &Credentials,
        full_name: Option<&str>,
    ) -> Result<Subject, IdentityProviderError> {
        let subject = Subject {
            id: new_subject_id()?,
            email: credentials.email().to_owned(),
            full_name: full_name.map(str::to_owned),
        };
        write(&self.directory).accounts.insert(
            email_key(credentials.email()),
            Account {
                subject: subject.clone(),
                password: Zeroizing::new(credentials.password().to_owned()),
            },
        );
        Ok(subject)
    }

    /// Number of tokens currently accepted.
    pub fn live_sessions(&self) -> usize {
        read(&self.directory).sessions.len()
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn new_subject_id() -> Result<SubjectId, IdentityProviderError> {
    SubjectId::new(Uuid::new_v4().to_string())
        .map_err(|err| IdentityProviderError::transport(err.to_string()))
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        attributes: &SubjectAttributes,
    ) -> Result<Subject, IdentityProviderError> {
        let key = email_key(credentials.email());
        if read(&self.directory).accounts.contains_key(&key) {
            return Err(IdentityProviderError::rejected("User already registered"));
        }
        self.register(credentials, Some(attributes.full_name.as_str()))
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, IdentityProviderError> {
        let mut directory = write(&self.directory);
        let subject = directory
            .accounts
            .get(&email_key(credentials.email()))
            .filter(|account| account.password.as_str() == credentials.password())
            .map(|account| account.subject.clone())
            .ok_or_else(|| IdentityProviderError::invalid_credentials("Invalid login credentials"))?;

        let token = Uuid::new_v4().to_string();
        directory.sessions.insert(token.clone(), subject.id.clone());
        Ok(AuthSession {
            subject,
            access_token: AccessToken::new(token),
        })
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), IdentityProviderError> {
        write(&self.directory).sessions.remove(token.expose());
        Ok(())
    }

    async fn current_user(
        &self,
        token: &AccessToken,
    ) -> Result<Option<Subject>, IdentityProviderError> {
        let directory = read(&self.directory);
        let subject = directory.sessions.get(token.expose()).and_then(|id| {
            directory
                .accounts
                .values()
                .find(|account| &account.subject.id == id)
                .map(|account| account.subject.clone())
        });
        Ok(subject)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials::try_from_parts(email, password).expect("valid credentials")
    }

    #[fixture]
    fn provider() -> InMemoryIdentityProvider {
        let provider = InMemoryIdentityProvider::new();
        provider
            .register(&creds("ada@example.edu", "secret"), Some("Ada"))
            .expect("seeded");
        provider
    }

    #[rstest]
    #[tokio::test]
    async fn sessions_last_until_sign_out(provider: InMemoryIdentityProvider) {
        let session = provider
            .sign_in_with_password(&creds("ADA@example.edu", "secret"))
            .await
            .expect("signed in");

        let current = provider
            .current_user(&session.access_token)
            .await
            .expect("lookup");
        assert_eq!(current, Some(session.subject.clone()));

        provider.sign_out(&session.access_token).await.expect("signed out");
        assert_eq!(provider.live_sessions(), 0);
        assert_eq!(
            provider.current_user(&session.access_token).await.expect("lookup"),
            None
        );
    }

    #[rstest]
    #[case("ada@example.edu", "wrong")]
    #[case("nobody@example.edu", "secret")]
    #[tokio::test]
    async fn bad_credentials_are_refused(
        provider: InMemoryIdentityProvider,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let err = provider
            .sign_in_with_password(&creds(email, password))
            .await
            .expect_err("refused");
        assert_eq!(err.kind(), "InvalidCredentials");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_sign_ups_are_rejected(provider: InMemoryIdentityProvider) {
        let attributes = SubjectAttributes {
            full_name: "Ada Again".into(),
        };
        let err = provider
            .sign_up(&creds("ada@example.edu", "other"), &attributes)
            .await
            .expect_err("taken");
        assert_eq!(err.kind(), "Rejected");
    }
}
