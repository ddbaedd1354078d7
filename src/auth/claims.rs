//! Credential payload decoding.
//!
//! The storefront never verifies credential signatures; that is the backend's job. The client
//! only reads the payload to learn which role labels the session carries. Only `roles` is
//! decoded strictly. `sub` and `exp` accept whatever shape the issuer chose and fall back to
//! `None` when they cannot be interpreted.

// crates.io
use jsonwebtoken::{
	DecodingKey, Validation,
	errors::{Error as JwtError, ErrorKind as JwtErrorKind},
};
use serde::Deserializer;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{RoleClaim, RoleSet},
};

/// Errors emitted while decoding a credential payload.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// Token is not a compact JWT with decodable header and payload segments.
	#[error("Credential is not a decodable compact JWT.")]
	Malformed {
		/// Underlying JWT failure.
		#[source]
		source: JwtError,
	},
	/// Payload JSON does not match the expected claim shape.
	#[error("Credential payload has an unexpected shape.")]
	Payload {
		/// Underlying JWT failure.
		#[source]
		source: JwtError,
	},
}
impl From<JwtError> for CredentialError {
	fn from(source: JwtError) -> Self {
		match source.kind() {
			JwtErrorKind::Json(_) => Self::Payload { source },
			_ => Self::Malformed { source },
		}
	}
}

/// Decoded credential payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialClaims {
	/// Role claim in its issued shape, if present.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub roles: Option<RoleClaim>,
	/// Subject identifier; numeric subjects are rendered as strings.
	#[serde(default, deserialize_with = "lenient_subject", skip_serializing_if = "Option::is_none")]
	pub sub: Option<String>,
	/// Expiry as unix seconds; fractional and numeric-string dates are floored.
	#[serde(
		default,
		deserialize_with = "lenient_numeric_date",
		skip_serializing_if = "Option::is_none"
	)]
	pub exp: Option<i64>,
	/// Every other claim, preserved verbatim.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl CredentialClaims {
	/// Decodes the payload of a compact JWT without checking its signature or expiry.
	pub fn decode(token: &str) -> Result<Self, CredentialError> {
		let mut validation = Validation::default();

		validation.insecure_disable_signature_validation();
		validation.required_spec_claims.clear();
		validation.validate_exp = false;
		validation.validate_aud = false;

		let data = jsonwebtoken::decode::<Self>(
			token.trim(),
			&DecodingKey::from_secret(&[]),
			&validation,
		)?;

		Ok(data.claims)
	}

	/// Canonical role set; a missing claim yields the empty set.
	pub fn role_set(&self) -> RoleSet {
		self.roles.as_ref().map(RoleClaim::normalize).unwrap_or_default()
	}

	/// Expiry instant, if the claim is present and representable.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.exp.and_then(|exp| OffsetDateTime::from_unix_timestamp(exp).ok())
	}

	/// Returns true when the credential carries an expiry at or before `now`.
	///
	/// Guards call this with their own clock so expiry can be evaluated at any instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at().is_some_and(|expires_at| expires_at <= now)
	}
}

fn lenient_subject<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::String(sub) => Some(sub),
		Value::Number(sub) => Some(sub.to_string()),
		_ => None,
	})
}

fn lenient_numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	let seconds = match Value::deserialize(deserializer)? {
		Value::Number(n) => match n.as_i64() {
			Some(whole) => return Ok(Some(whole)),
			None => n.as_f64(),
		},
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	};

	Ok(seconds.filter(|s| s.is_finite()).map(|s| s.floor() as i64))
}
