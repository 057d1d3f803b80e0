use pedalshare_core::Username;

/// Principal context for a request (the authenticated username).
///
/// Inserted by the auth middleware; every protected handler reads it instead
/// of trusting identity fields in the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    username: Username,
}

impl PrincipalContext {
    pub fn new(username: Username) -> Self {
        Self { username }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}
