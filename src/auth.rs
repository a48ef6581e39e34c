/// Decides whether a presented credential grants access to protected routes.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, presented: Option<&str>) -> bool;
}

/// Single shared secret. An empty secret admits nobody.
pub struct StaticKeyAuthenticator {
    key: String,
}

impl StaticKeyAuthenticator {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Authenticator for StaticKeyAuthenticator {
    fn authenticate(&self, presented: Option<&str>) -> bool {
        match presented {
            Some(candidate) if !self.key.is_empty() => {
                constant_time_eq(candidate.as_bytes(), self.key.as_bytes())
            }
            _ => false,
        }
    }
}

/// Compares without short-circuiting on the first differing byte. Only the
/// length difference is observable.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
