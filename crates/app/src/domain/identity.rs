//! Caller Identity

/// The caller as resolved by the authentication layer in front of the core.
/// The core never authenticates; it only consumes this.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Client {
        email: String,
    },
}

impl Identity {
    /// Identity for an authenticated client. A blank email is anonymous.
    #[must_use]
    pub fn client(email: impl Into<String>) -> Self {
        let email = email.into();

        if email.trim().is_empty() {
            return Self::Anonymous;
        }

        Self::Client {
            email: email.trim().to_owned(),
        }
    }

    #[must_use]
    pub fn from_optional_email(email: Option<String>) -> Self {
        email.map_or(Self::Anonymous, Self::client)
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Client { email } => Some(email),
        }
    }
}
