//! Route access control.

pub const DEFAULT_AUTHORITY: &str = "ROLE_USER";

/// The signed-in user as the host application knows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    pub login: String,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            authorities: Vec::new(),
        }
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authorities.push(authority.into());
        self
    }

    pub fn has_any_authority(&self, required: &[&str]) -> bool {
        self.authorities.iter().any(|a| required.contains(&a.as_str()))
    }
}

/// Decides whether a route may activate.
pub trait RouteGuard: Send + Sync {
    fn can_activate(&self, required_authorities: &[&str]) -> bool;
}

/// Grants access to an authenticated principal holding one of the required
/// authorities (any authenticated principal when none are required).
#[derive(Debug, Clone, Default)]
pub struct AuthorityGuard {
    principal: Option<Principal>,
}

impl AuthorityGuard {
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    pub fn for_principal(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }
}

impl RouteGuard for AuthorityGuard {
    fn can_activate(&self, required_authorities: &[&str]) -> bool {
        match &self.principal {
            None => false,
            Some(_) if required_authorities.is_empty() => true,
            Some(principal) => principal.has_any_authority(required_authorities),
        }
    }
}
