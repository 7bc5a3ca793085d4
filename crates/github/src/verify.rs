//! Webhook signature verification
//!
//! Signatures arrive as `<algorithm>=<hex digest>`, e.g. the
//! `X-Hub-Signature` header `sha1=6364b3c7...`. The digest is an HMAC of the
//! raw request body keyed with the shared secret.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

/// HMAC digest algorithms accepted in a signature header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnsupportedAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(Algorithm::Sha1),
            "sha256" => Ok(Algorithm::Sha256),
            "sha512" => Ok(Algorithm::Sha512),
            other => Err(UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Split a signature header into its algorithm name and hex digest.
///
/// Returns `None` unless the value contains exactly one `=`.
pub fn parse_signature_header(signature: &str) -> Option<(&str, &str)> {
    let (algorithm, digest) = signature.split_once('=')?;
    if digest.contains('=') {
        return None;
    }
    Some((algorithm, digest))
}

fn hmac_hex<M>(secret: &[u8], body: &[u8]) -> Option<String>
where
    M: Mac + KeyInit,
{
    let mut mac = <M as KeyInit>::new_from_slice(secret).ok()?;
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Compute the lowercase hex HMAC of `body` keyed with `secret`
pub fn compute_signature(algorithm: Algorithm, secret: &str, body: &[u8]) -> Option<String> {
    let secret = secret.as_bytes();
    match algorithm {
        Algorithm::Sha1 => hmac_hex::<Hmac<Sha1>>(secret, body),
        Algorithm::Sha256 => hmac_hex::<Hmac<Sha256>>(secret, body),
        Algorithm::Sha512 => hmac_hex::<Hmac<Sha512>>(secret, body),
    }
}

/// Format a digest as a signature header value
pub fn format_signature_header(algorithm: Algorithm, digest: &str) -> String {
    format!("{}={}", algorithm, digest)
}

/// Verify a webhook signature against the raw request body
///
/// `body` is the raw request body, exactly as received
/// `signature` is the value of the signature header, if any
/// `secret` is the key the sender is expected to have used, if any
///
/// No signature and no secret means verification is not configured and the
/// body is accepted. Any other combination has to produce a matching digest.
pub fn verify_signature(body: &[u8], signature: Option<&str>, secret: Option<&str>) -> bool {
    let (signature, secret) = match (signature, secret) {
        (None, None) => return true,
        (Some(signature), Some(secret)) => (signature, secret),
        _ => return false,
    };

    let (algorithm, digest) = match parse_signature_header(signature) {
        Some(parts) => parts,
        None => return false,
    };

    let algorithm = match algorithm.parse::<Algorithm>() {
        Ok(a) => a,
        Err(_) => return false,
    };

    let expected = match compute_signature(algorithm, secret, body) {
        Some(e) => e,
        None => return false,
    };

    // Case-sensitive: an uppercase hex digest does not match
    constant_time_eq::constant_time_eq(expected.as_bytes(), digest.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"ref": "refs/heads/18f-pages"}"#;

    fn sign(algorithm: Algorithm, secret: &str, body: &[u8]) -> String {
        let digest = compute_signature(algorithm, secret, body).unwrap();
        format_signature_header(algorithm, &digest)
    }

    #[test]
    fn test_verify_signature() {
        let signature = sign(Algorithm::Sha1, "deadbeef", BODY);
        assert!(verify_signature(BODY, Some(&signature), Some("deadbeef")));
    }

    #[test]
    fn test_known_sha1_digest() {
        assert_eq!(
            compute_signature(Algorithm::Sha1, "deadbeef", BODY).unwrap(),
            "894e964d9f6eaee51bcdb73607ccca10abb459cd"
        );
        assert!(verify_signature(
            BODY,
            Some("sha1=894e964d9f6eaee51bcdb73607ccca10abb459cd"),
            Some("deadbeef"),
        ));
    }

    #[test]
    fn test_known_sha256_and_sha512_digests() {
        assert!(verify_signature(
            b"test body",
            Some("sha256=5169ae1d30acc38c5517bd0e2262722349abf4a0e3beca66cff171625c6bdbe9"),
            Some("test-secret"),
        ));
        assert!(verify_signature(
            b"test body",
            Some(
                "sha512=7f4c38f1631b7f59b51bda10153a64837592f03507ee163ec96f00b97ab618be\
                 8abe791665df0c7e4108080c7296086fc3b78274a88f410d44e7e6ac32fcd418"
            ),
            Some("test-secret"),
        ));
    }

    #[test]
    fn test_no_signature_and_no_secret_is_accepted() {
        assert!(verify_signature(BODY, None, None));
    }

    #[test]
    fn test_signature_without_secret_is_rejected() {
        let signature = sign(Algorithm::Sha1, "deadbeef", BODY);
        assert!(!verify_signature(BODY, Some(&signature), None));
    }

    #[test]
    fn test_secret_without_signature_is_rejected() {
        assert!(!verify_signature(BODY, None, Some("deadbeef")));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let signature = sign(Algorithm::Sha1, "default secret", BODY);
        assert!(!verify_signature(BODY, Some(&signature), Some("deadbeef")));
    }

    #[test]
    fn test_every_flipped_digest_character_is_rejected() {
        let signature = sign(Algorithm::Sha1, "deadbeef", BODY);
        let prefix_len = "sha1=".len();

        for i in prefix_len..signature.len() {
            let mut tampered = signature.clone().into_bytes();
            tampered[i] = if tampered[i] == b'0' { b'1' } else { b'0' };
            let tampered = String::from_utf8(tampered).unwrap();

            assert!(
                !verify_signature(BODY, Some(&tampered), Some("deadbeef")),
                "accepted tampered signature {}",
                tampered
            );
        }
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let signature = sign(Algorithm::Sha1, "deadbeef", BODY);
        let body = br#"{"ref": "refs/heads/master"}"#;
        assert!(!verify_signature(body, Some(&signature), Some("deadbeef")));
    }

    #[test]
    fn test_malformed_signature_is_rejected() {
        for signature in [
            "",
            "894e964d9f6eaee51bcdb73607ccca10abb459cd",
            "sha1=894e964d9f6eaee51bcdb73607ccca10abb459cd=",
            "sha1==894e964d9f6eaee51bcdb73607ccca10abb459cd",
        ] {
            assert!(!verify_signature(BODY, Some(signature), Some("deadbeef")));
        }
    }

    #[test]
    fn test_unsupported_algorithm_is_rejected() {
        assert!(!verify_signature(
            BODY,
            Some("md5=894e964d9f6eaee51bcdb73607ccca10abb459cd"),
            Some("deadbeef"),
        ));
        assert!(!verify_signature(
            BODY,
            Some("SHA1=894e964d9f6eaee51bcdb73607ccca10abb459cd"),
            Some("deadbeef"),
        ));
    }

    #[test]
    fn test_uppercase_digest_is_rejected() {
        assert!(!verify_signature(
            BODY,
            Some("sha1=894E964D9F6EAEE51BCDB73607CCCA10ABB459CD"),
            Some("deadbeef"),
        ));
    }

    #[test]
    fn test_parse_signature_header() {
        assert_eq!(parse_signature_header("sha1=abc"), Some(("sha1", "abc")));
        assert_eq!(parse_signature_header("sha1"), None);
        assert_eq!(parse_signature_header("sha1=a=b"), None);
    }

    #[test]
    fn test_algorithm_round_trips_through_its_name() {
        for algorithm in [Algorithm::Sha1, Algorithm::Sha256, Algorithm::Sha512] {
            assert_eq!(algorithm.as_str().parse::<Algorithm>(), Ok(algorithm));
        }
        assert_eq!(
            "md5".parse::<Algorithm>(),
            Err(UnsupportedAlgorithm("md5".to_string()))
        );
    }
}
