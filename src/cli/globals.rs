use secrecy::SecretString;

/// OAuth client credentials shared across the server, read-only after startup.
#[derive(Clone)]
pub struct GlobalArgs {
    pub client_id: String,
    pub client_secret: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            client_secret: SecretString::default(),
        }
    }

    pub fn set_secret(&mut self, secret: SecretString) {
        self.client_secret = secret;
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new("client-id.apps.example.com".to_string());
        assert_eq!(args.client_id, "client-id.apps.example.com");
        assert_eq!(args.client_secret.expose_secret(), "");
    }

    #[test]
    fn test_debug_masks_secret() {
        let mut args = GlobalArgs::new("client-id".to_string());
        args.set_secret(SecretString::from("hunter2"));
        let debug = format!("{args:?}");
        assert!(debug.contains("client-id"));
        assert!(!debug.contains("hunter2"));
    }
}
