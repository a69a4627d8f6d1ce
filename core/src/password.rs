//! Client-side password hashing.
//!
//! The backend compares against an unsalted MD5 hex digest of the password,
//! sent as a query parameter on `POST /auth`. That wire format is weak (fast
//! hash, no salt, secret in the URL) but changing it needs a coordinated
//! backend change, so the client reproduces it exactly.

use md5::{Digest, Md5};

/// Lowercase hex MD5 of `password`.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Md5::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digests() {
        assert_eq!(hash_password("secret"), "5ebe2294ecd0e0f08eab7690d2a6ee69");
        assert_eq!(hash_password("admin"), "21232f297a57a5a743894a0e4a801fc3");
        assert_eq!(hash_password(""), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
