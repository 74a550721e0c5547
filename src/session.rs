/// Authenticated session context.
///
/// Sign-in and sign-out live with the embedding application; the sync core
/// only consumes the resulting identity, passed explicitly at construction
/// rather than read from ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub display_name: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name,
        }
    }

    /// Name to attribute authored content to.
    pub fn author_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Anonymous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_name_falls_back_to_anonymous() {
        let named = Session::new("u1", Some("Alice".to_string()));
        assert_eq!(named.author_name(), "Alice");

        let unnamed = Session::new("u2", None);
        assert_eq!(unnamed.author_name(), "Anonymous");
    }
}
