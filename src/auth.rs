use pbkdf2::password_hash::{PasswordHasher, SaltString};
use pbkdf2::Pbkdf2;
use rand_core::OsRng;

/// How the password field is written to the `student` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialPolicy {
    /// Stored exactly as typed.
    #[default]
    Plain,
    /// Stored as a PBKDF2 PHC string. Needs a `password` column wider than 20.
    Pbkdf2,
}

impl CredentialPolicy {
    pub fn from_flag(hash_passwords: bool) -> Self {
        if hash_passwords {
            CredentialPolicy::Pbkdf2
        } else {
            CredentialPolicy::Plain
        }
    }

    pub fn seal(self, password: &str) -> Result<String, pbkdf2::password_hash::Error> {
        match self {
            CredentialPolicy::Plain => Ok(password.to_string()),
            CredentialPolicy::Pbkdf2 => Ok(Pbkdf2
                .hash_password(password.as_bytes(), &SaltString::generate(&mut OsRng))?
                .to_string()),
        }
    }
}
