//! Object storage URL broker
//!
//! Presigns time-limited S3 PUT/GET URLs locally using AWS Signature V4
//! query parameters (no SDK, no network round trip). Upload keys follow the
//! convention `posts/<userId>/<millis>-<index>-<sanitizedFilename>` and all
//! URLs expire after five minutes.
//!
//! View-URL signing is fail-open: a stored URL that cannot be parsed back to
//! a storage key is returned unchanged.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// Presigned URL lifetime in seconds
pub const URL_EXPIRY_SECS: u32 = 300;

static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid regex"));

/// Object storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

/// S3-style presigning client
#[derive(Clone)]
pub struct StorageClient {
    config: StorageConfig,
    host: String,
}

impl StorageClient {
    pub fn new(config: StorageConfig) -> Self {
        let host = format!("{}.s3.{}.amazonaws.com", config.bucket, config.region);
        Self { config, host }
    }

    /// Replace filename characters outside `[A-Za-z0-9._-]` with underscores
    pub fn sanitize_filename(name: &str) -> String {
        UNSAFE_FILENAME_CHARS.replace_all(name, "_").into_owned()
    }

    /// Build the storage key for the `index`-th file of a user's upload batch
    pub fn object_key(&self, user_id: &str, now_millis: i64, index: usize, filename: &str) -> String {
        format!(
            "posts/{}/{}-{}-{}",
            user_id,
            now_millis,
            index,
            Self::sanitize_filename(filename)
        )
    }

    /// Public (unsigned) URL for a stored object
    pub fn public_url(&self, key: &str) -> String {
        format!("https://{}/{}", self.host, key)
    }

    /// Presign a PUT of `key` with the given content type
    pub fn presign_put(&self, key: &str, content_type: &str, now: DateTime<Utc>) -> String {
        self.presign("PUT", key, Some(content_type), now)
    }

    /// Presign a GET of `key`
    pub fn presign_get(&self, key: &str, now: DateTime<Utc>) -> String {
        self.presign("GET", key, None, now)
    }

    /// Derive the key from a previously stored public URL and presign a GET.
    ///
    /// Returns `None` when the URL does not parse or has an empty path.
    pub fn sign_view_url(&self, stored_url: &str, now: DateTime<Utc>) -> Option<String> {
        let parsed = Url::parse(stored_url).ok()?;
        let key = parsed.path().trim_start_matches('/').to_string();
        if key.is_empty() {
            return None;
        }
        Some(self.presign_get(&key, now))
    }

    fn presign(
        &self,
        method: &str,
        key: &str,
        content_type: Option<&str>,
        now: DateTime<Utc>,
    ) -> String {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let datestamp = now.format("%Y%m%d").to_string();
        let scope = format!("{}/{}/s3/aws4_request", datestamp, self.config.region);
        let credential = format!("{}/{}", self.config.access_key, scope);

        let (canonical_headers, signed_headers) = match content_type {
            Some(ct) => (
                format!("content-type:{}\nhost:{}\n", ct, self.host),
                "content-type;host",
            ),
            None => (format!("host:{}\n", self.host), "host"),
        };

        // Query parameters in canonical (alphabetical) order
        let query_pairs = [
            ("X-Amz-Algorithm", "AWS4-HMAC-SHA256".to_string()),
            ("X-Amz-Credential", credential),
            ("X-Amz-Date", amz_date.clone()),
            ("X-Amz-Expires", URL_EXPIRY_SECS.to_string()),
            ("X-Amz-SignedHeaders", signed_headers.to_string()),
        ];
        let canonical_query = query_pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, uri_encode(v, true)))
            .collect::<Vec<_>>()
            .join("&");

        let canonical_uri = format!("/{}", uri_encode(key, false));
        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\nUNSIGNED-PAYLOAD",
            method, canonical_uri, canonical_query, canonical_headers, signed_headers
        );

        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = self.derive_signing_key(&datestamp);
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

        format!(
            "https://{}{}?{}&X-Amz-Signature={}",
            self.host, canonical_uri, canonical_query, signature
        )
    }

    /// AWS4 key derivation chain: date -> region -> service -> "aws4_request"
    fn derive_signing_key(&self, datestamp: &str) -> Vec<u8> {
        let secret = format!("AWS4{}", self.config.secret_key);
        let date_key = hmac_sha256(secret.as_bytes(), datestamp.as_bytes());
        let region_key = hmac_sha256(&date_key, self.config.region.as_bytes());
        let service_key = hmac_sha256(&region_key, b"s3");
        hmac_sha256(&service_key, b"aws4_request")
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// AWS-style URI encoding: unreserved characters pass through, everything
/// else becomes uppercase percent escapes. Slashes survive in paths only.
fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            b'/' if !encode_slash => out.push('/'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client() -> StorageClient {
        StorageClient::new(StorageConfig {
            bucket: "test-bucket".to_string(),
            region: "eu-west-1".to_string(),
            access_key: "AKIDEXAMPLE".to_string(),
            secret_key: "secret".to_string(),
        })
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(
            StorageClient::sanitize_filename("my photo (1).png"),
            "my_photo__1_.png"
        );
        assert_eq!(StorageClient::sanitize_filename("safe-name_1.jpg"), "safe-name_1.jpg");
    }

    #[test]
    fn object_key_follows_convention() {
        let key = client().object_key("u1", 1700000000000, 2, "a b.png");
        assert_eq!(key, "posts/u1/1700000000000-2-a_b.png");
    }

    #[test]
    fn presigned_put_has_expected_query_parameters() {
        let url = client().presign_put("posts/u1/1-0-a.png", "image/png", fixed_now());

        assert!(url.starts_with("https://test-bucket.s3.eu-west-1.amazonaws.com/posts/u1/1-0-a.png?"));
        assert!(url.contains("X-Amz-Algorithm=AWS4-HMAC-SHA256"));
        assert!(url.contains("X-Amz-Expires=300"));
        assert!(url.contains("X-Amz-Date=20240501T120000Z"));
        assert!(url.contains("20240501%2Feu-west-1%2Fs3%2Faws4_request"));
        assert!(url.contains("X-Amz-SignedHeaders=content-type%3Bhost"));

        let signature = url.split("X-Amz-Signature=").nth(1).unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn presigning_is_deterministic_for_fixed_inputs() {
        let a = client().presign_get("posts/u1/1-0-a.png", fixed_now());
        let b = client().presign_get("posts/u1/1-0-a.png", fixed_now());
        assert_eq!(a, b);

        let other_secret = StorageClient::new(StorageConfig {
            bucket: "test-bucket".to_string(),
            region: "eu-west-1".to_string(),
            access_key: "AKIDEXAMPLE".to_string(),
            secret_key: "other".to_string(),
        });
        assert_ne!(a, other_secret.presign_get("posts/u1/1-0-a.png", fixed_now()));
    }

    #[test]
    fn sign_view_url_extracts_key_and_fails_open() {
        let c = client();
        let stored = c.public_url("posts/u1/1-0-a.png");
        let signed = c.sign_view_url(&stored, fixed_now()).unwrap();
        assert!(signed.contains("/posts/u1/1-0-a.png?"));
        assert!(signed.contains("X-Amz-Signature="));

        assert!(c.sign_view_url("not a url", fixed_now()).is_none());
        assert!(c.sign_view_url("https://host.example", fixed_now()).is_none());
    }
}
