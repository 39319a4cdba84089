/// Read-only access to the bearer token owned by the auth collaborator.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A token fixed at startup (env or CLI flag).
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        StaticToken(token.filter(|t| !t.trim().is_empty()))
    }
}

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
