use std::fmt;

/// Identity supplied by the surrounding application. The screening flow
/// passes these through to the backend unchanged and never stores them.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub access_token: String,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("access_token", &redact_token(&self.access_token))
            .finish()
    }
}

fn redact_token(token: &str) -> String {
    if token.len() <= 8 {
        return "****".to_string();
    }
    match (token.get(..4), token.get(token.len() - 4..)) {
        (Some(prefix), Some(suffix)) => format!("{prefix}...{suffix}"),
        _ => "****".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_token() {
        let creds = Credentials::new("42", "eyJhbGciOiJIUzI1NiJ9.payload.sig");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("\"42\""));
        assert!(rendered.contains("eyJh...sig"));
        assert!(!rendered.contains("payload"));
    }

    #[test]
    fn short_tokens_are_fully_masked() {
        let rendered = format!("{:?}", Credentials::new("1", "abc"));
        assert!(rendered.contains("****"));
        assert!(!rendered.contains("abc"));
    }
}
