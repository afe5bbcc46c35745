use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the shared secret supplied in the `p` query parameter is checked.
///
/// The browser extension that talks to the listener historically omits `p`
/// entirely when the user has not configured a password, so the lenient
/// policy lets such requests through even when a secret is configured.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SecretPolicy {
    /// Reject only a non-empty `p` that differs from the configured secret.
    #[default]
    Lenient,
    /// Require `p` to equal the configured secret, so an empty or missing `p`
    /// is rejected whenever a secret is set.
    Strict,
}

impl SecretPolicy {
    /// Returns whether a submitted secret is acceptable for `configured`.
    ///
    /// A missing `p` parameter is passed in as the empty string.
    #[must_use]
    pub fn accepts(self, configured: &str, submitted: &str) -> bool {
        match self {
            Self::Lenient => submitted.is_empty() || submitted == configured,
            Self::Strict => submitted == configured,
        }
    }
}

/// Errors encountered while parsing a [`SecretPolicy`] from text.
pub type SecretPolicyParseError = strum::ParseError;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SecretPolicy::Lenient, "", "", true)]
    #[case(SecretPolicy::Lenient, "", "anything", false)]
    #[case(SecretPolicy::Lenient, "s3cr3t", "", true)]
    #[case(SecretPolicy::Lenient, "s3cr3t", "s3cr3t", true)]
    #[case(SecretPolicy::Lenient, "s3cr3t", "wrong", false)]
    #[case(SecretPolicy::Strict, "", "", true)]
    #[case(SecretPolicy::Strict, "", "anything", false)]
    #[case(SecretPolicy::Strict, "s3cr3t", "", false)]
    #[case(SecretPolicy::Strict, "s3cr3t", "s3cr3t", true)]
    #[case(SecretPolicy::Strict, "s3cr3t", "wrong", false)]
    fn policy_decisions(
        #[case] policy: SecretPolicy,
        #[case] configured: &str,
        #[case] submitted: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(policy.accepts(configured, submitted), expected);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("STRICT".parse::<SecretPolicy>().ok(), Some(SecretPolicy::Strict));
        assert_eq!(SecretPolicy::Lenient.to_string(), "lenient");
    }
}
