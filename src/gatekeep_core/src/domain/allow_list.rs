use super::email::Email;

/// Email domains registration and password reset are open to.
#[derive(Debug, Clone)]
pub struct DomainAllowList {
    domains: Vec<String>,
}

impl DomainAllowList {
    pub fn new(domains: Vec<String>) -> Self {
        Self {
            domains: domains.into_iter().map(|d| d.to_lowercase()).collect(),
        }
    }

    pub fn is_allowed(&self, email: &Email) -> bool {
        let domain = email.domain();
        self.domains.iter().any(|allowed| *allowed == domain)
    }
}

impl Default for DomainAllowList {
    fn default() -> Self {
        Self::new(vec!["gmail.com".to_owned(), "jadeglobal.com".to_owned()])
    }
}
