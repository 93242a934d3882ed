use serde::{Deserialize, Serialize};

/// A Git identity stored in the profiles file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique profile id
    pub id: String,
    /// Git username (user.name)
    pub name: String,
    /// Git email address (user.email)
    pub email: String,
    /// Path to the SSH private key
    pub private_key: String,
    /// GPG signing key id (user.signingKey)
    #[serde(default)]
    pub gpg_key: String,
}

/// The identity currently in effect for a repository, as read back from git config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub private_key: String,
    pub gpg_key: String,
}

impl User {
    /// Strips the profile id, leaving the fields that end up in git config
    pub fn identity(&self) -> Identity {
        Identity {
            name: self.name.clone(),
            email: self.email.clone(),
            private_key: self.private_key.clone(),
            gpg_key: self.gpg_key.clone(),
        }
    }

    /// Whether this profile is the one described by `identity`
    pub fn matches(&self, identity: &Identity) -> bool {
        self.name == identity.name
            && self.email == identity.email
            && self.private_key == identity.private_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: "a".to_string(),
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            private_key: "/k/a".to_string(),
            gpg_key: "GPGA".to_string(),
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(alice()).unwrap();
        assert_eq!(json["privateKey"], "/k/a");
        assert_eq!(json["gpgKey"], "GPGA");
        assert!(json.get("private_key").is_none());
    }

    #[test]
    fn missing_gpg_key_defaults_to_empty() {
        let user: User = serde_json::from_str(
            r#"{"id":"b","name":"Bob","email":"bob@x.com","privateKey":"/k/b"}"#,
        )
        .unwrap();
        assert_eq!(user.gpg_key, "");
    }

    #[test]
    fn matches_ignores_signing_key() {
        let user = alice();
        let mut identity = user.identity();
        assert!(user.matches(&identity));

        identity.gpg_key = "OTHER".to_string();
        assert!(user.matches(&identity));

        identity.private_key = "/k/other".to_string();
        assert!(!user.matches(&identity));
    }
}
