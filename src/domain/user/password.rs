use argon2::{
	password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
use rand::rngs::OsRng;

use crate::services::response::ServiceError;

/// Salted Argon2id hash in PHC string form. The plaintext is never kept.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
	pub fn hash(plaintext: &str) -> Result<Self, ServiceError> {
		let salt = SaltString::generate(&mut OsRng);
		let hash = Argon2::default()
			.hash_password(plaintext.as_bytes(), &salt)
			.map_err(|err| ServiceError::Internal(format!("password hashing failed: {err}")))?
			.to_string();
		Ok(Self(hash))
	}

	pub fn verify(
		&self,
		attempt: &str,
	) -> Result<(), ServiceError> {
		let parsed = PasswordHash::new(&self.0).map_err(|err| ServiceError::Internal(format!("invalid password hash: {err}")))?;

		match Argon2::default().verify_password(attempt.as_bytes(), &parsed) {
			Ok(()) => Ok(()),
			Err(argon2::password_hash::Error::Password) => Err(ServiceError::Authentication),
			Err(err) => Err(ServiceError::Internal(format!("password verification failed: {err}"))),
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<String> for Password {
	fn from(hash: String) -> Self {
		Self(hash)
	}
}

impl std::fmt::Debug for Password {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("Password(**redacted**)")
	}
}

#[cfg(test)]
mod test {
	use super::Password;
	use crate::services::response::ServiceError;

	#[test]
	fn test_verify_matching_password() {
		let password = Password::hash("gopher-secret").unwrap();
		assert!(password.verify("gopher-secret").is_ok());
	}

	#[test]
	fn test_verify_wrong_password() {
		let password = Password::hash("gopher-secret").unwrap();
		assert!(matches!(password.verify("gopher-secreT"), Err(ServiceError::Authentication)));
	}

	#[test]
	fn test_hash_is_salted() {
		let first = Password::hash("same").unwrap();
		let second = Password::hash("same").unwrap();
		assert_ne!(first.as_str(), second.as_str());
		assert!(!first.as_str().contains("same"));
	}

	#[test]
	fn test_debug_is_redacted() {
		let password = Password::hash("visible?").unwrap();
		assert_eq!(format!("{password:?}"), "Password(**redacted**)");
	}
}
