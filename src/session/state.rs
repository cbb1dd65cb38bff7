//! Session state

use serde::{Deserialize, Serialize};

/// Authentication state shared by all outgoing requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token, `None` when signed out
    #[serde(default)]
    pub token: Option<String>,
}

impl Session {
    /// Create a session holding `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Whether a token is present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_default_is_signed_out() {
        let session = Session::default();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn session_serialize() {
        let session = Session::with_token("abc");
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(json, r#"{"token":"abc"}"#);

        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);

        let empty: Session = serde_json::from_str("{}").unwrap();
        assert!(!empty.is_authenticated());
    }
}
