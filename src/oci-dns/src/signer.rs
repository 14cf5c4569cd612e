// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Signs requests with the [OCI HTTP Signature] scheme.
//!
//! OCI services do not use bearer tokens. Each request carries an
//! `authorization` header with an RSA-SHA256 signature over a few headers,
//! the method, and the path of the request. For requests with a body, the
//! SHA-256 hash of the body is also signed.
//!
//! ```no_run
//! # fn sample() -> anyhow::Result<()> {
//! use cloudkit_oci_dns::signer::Builder;
//! // Reads `~/.oci/config`, or the file named by `OCI_CONFIG_FILE`.
//! let builder = Builder::from_default_config()?;
//! let endpoint = builder.endpoint();
//! let credentials = builder.build()?;
//! # Ok(()) }
//! ```
//!
//! [OCI HTTP Signature]: https://docs.oracle.com/en-us/iaas/Content/API/Concepts/signingrequests.htm

use crate::config::{self, ConfigFile};
use base64::prelude::{BASE64_STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use gax::credentials::{Credentials, CredentialsProvider};
use gax::error::CredentialsError;
use http::header::{CONTENT_TYPE, HeaderName};
use http::{HeaderMap, HeaderValue, Method};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

const DATE: &str = "date";
const REQUEST_TARGET: &str = "(request-target)";
const HOST: &str = "host";
const CONTENT_SHA256: &str = "x-content-sha256";
const JSON: &str = "application/json";

/// Returns the DNS endpoint for an OCI region, such as `us-ashburn-1`.
///
/// ```
/// # use cloudkit_oci_dns::signer::endpoint;
/// assert_eq!(endpoint("us-ashburn-1"), "https://dns.us-ashburn-1.oraclecloud.com");
/// ```
pub fn endpoint(region: &str) -> String {
    format!("https://dns.{region}.oraclecloud.com")
}

/// The error type for the signer [Builder].
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// A problem finding or reading the configuration or key file.
    pub fn is_loading(&self) -> bool {
        matches!(self.0, ErrorKind::Loading(_))
    }

    /// The private key is not a PEM-encoded RSA key.
    pub fn is_parsing(&self) -> bool {
        matches!(self.0, ErrorKind::Parsing(_))
    }

    /// The profile, or one of its required keys, is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self.0, ErrorKind::Missing(_))
    }

    fn loading<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Loading(source.into()))
    }

    fn parsing<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Parsing(source.into()))
    }

    fn missing<T: Into<String>>(what: T) -> Self {
        Self(ErrorKind::Missing(what.into()))
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("cannot read the OCI configuration {0}")]
    Loading(#[source] BoxError),
    #[error("cannot parse the private key {0}")]
    Parsing(#[source] BoxError),
    #[error("missing {0} in the OCI configuration")]
    Missing(String),
}

#[derive(Clone)]
enum PrivateKey {
    Pem(String),
    File(PathBuf),
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pem(_) => f.write_str("Pem([censored])"),
            Self::File(p) => f.debug_tuple("File").field(p).finish(),
        }
    }
}

/// A builder for OCI request signing [Credentials].
///
/// ```
/// # use cloudkit_oci_dns::signer::Builder;
/// let builder = Builder::new("ocid1.tenancy.oc1..aaa", "ocid1.user.oc1..bbb", "20:3b:97:13:55")
///     .with_private_key_file("/home/me/.oci/oci_api_key.pem")
///     .with_region("us-phoenix-1");
/// assert_eq!(builder.key_id(), "ocid1.tenancy.oc1..aaa/ocid1.user.oc1..bbb/20:3b:97:13:55");
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    tenancy: String,
    user: String,
    fingerprint: String,
    private_key: Option<PrivateKey>,
    region: Option<String>,
}

impl Builder {
    /// Creates a builder for the API key with `fingerprint`, owned by `user`
    /// in `tenancy`.
    pub fn new<T, U, F>(tenancy: T, user: U, fingerprint: F) -> Self
    where
        T: Into<String>,
        U: Into<String>,
        F: Into<String>,
    {
        Self {
            tenancy: tenancy.into(),
            user: user.into(),
            fingerprint: fingerprint.into(),
            private_key: None,
            region: None,
        }
    }

    /// Loads `profile` from the configuration file at `path`.
    pub fn from_config_file<P: AsRef<Path>>(path: P, profile: &str) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(Error::loading)?;
        let file = ConfigFile::parse(&contents);
        let values = file
            .profile(profile)
            .ok_or_else(|| Error::missing(format!("profile [{profile}]")))?;
        let get = |key: &str| {
            values
                .get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| Error::missing(format!("`{key}` in profile [{profile}]")))
        };
        let builder = Self::new(get("tenancy")?, get("user")?, get("fingerprint")?);
        let key_file = config::expand_home(Path::new(&get("key_file")?));
        let builder = builder.with_private_key_file(key_file);
        Ok(match values.get("region") {
            Some(r) if !r.is_empty() => builder.with_region(r.clone()),
            _ => builder,
        })
    }

    /// Loads the default profile from the default configuration file.
    ///
    /// The file is `~/.oci/config` unless `OCI_CONFIG_FILE` is set. The
    /// profile is `DEFAULT` unless `OCI_CLI_PROFILE` is set.
    pub fn from_default_config() -> Result<Self, Error> {
        let path = config::default_path()
            .ok_or_else(|| Error::missing("a home directory to find ~/.oci/config"))?;
        Self::from_config_file(path, &config::default_profile())
    }

    /// Uses a PEM-encoded RSA private key, in PKCS#1 or PKCS#8 format.
    pub fn with_private_key_pem<T: Into<String>>(mut self, pem: T) -> Self {
        self.private_key = Some(PrivateKey::Pem(pem.into()));
        self
    }

    /// Reads the private key from a PEM file when the credentials are built.
    pub fn with_private_key_file<T: Into<PathBuf>>(mut self, path: T) -> Self {
        self.private_key = Some(PrivateKey::File(path.into()));
        self
    }

    pub fn with_region<T: Into<String>>(mut self, region: T) -> Self {
        self.region = Some(region.into());
        self
    }

    /// The region, if set or found in the configuration file.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The DNS endpoint for the region, if the region is known.
    pub fn endpoint(&self) -> Option<String> {
        self.region.as_deref().map(endpoint)
    }

    /// The `keyId` parameter of the signature.
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }

    /// Returns a [Credentials] instance that signs each request.
    ///
    /// Fails if the key cannot be read or is not an RSA key.
    pub fn build(self) -> Result<Credentials, Error> {
        let pem = match &self.private_key {
            None => return Err(Error::missing("the private key")),
            Some(PrivateKey::Pem(p)) => p.clone(),
            Some(PrivateKey::File(path)) => {
                std::fs::read_to_string(path).map_err(Error::loading)?
            }
        };
        let key = rsa::RsaPrivateKey::from_pkcs8_pem(&pem)
            .or_else(|_| rsa::RsaPrivateKey::from_pkcs1_pem(&pem))
            .map_err(Error::parsing)?;
        Ok(RequestSigner {
            key_id: self.key_id(),
            signing_key: SigningKey::<Sha256>::new(key),
        }
        .into())
    }
}

struct RequestSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_id", &self.key_id)
            .field("signing_key", &"[censored]")
            .finish()
    }
}

impl CredentialsProvider for RequestSigner {
    async fn headers(&self, request: &reqwest::Request) -> gax::credentials::Result<HeaderMap> {
        self.sign(request, Utc::now())
    }
}

impl RequestSigner {
    fn sign(
        &self,
        request: &reqwest::Request,
        now: DateTime<Utc>,
    ) -> gax::credentials::Result<HeaderMap> {
        let url = request.url();
        let host = match url.port() {
            Some(port) => format!("{}:{port}", url.host_str().unwrap_or_default()),
            None => url.host_str().unwrap_or_default().to_string(),
        };
        let target = match url.query() {
            Some(q) => format!("{} {}?{q}", request.method().as_str().to_lowercase(), url.path()),
            None => format!("{} {}", request.method().as_str().to_lowercase(), url.path()),
        };
        let date = now.format("%a, %d %b %Y %H:%M:%S GMT").to_string();

        let mut signed = vec![(DATE, date), (REQUEST_TARGET, target), (HOST, host)];
        if has_body(request.method()) {
            let body = request
                .body()
                .and_then(reqwest::Body::as_bytes)
                .unwrap_or_default();
            let content_type = request
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(JSON)
                .to_string();
            signed.push((CONTENT_SHA256, BASE64_STANDARD.encode(Sha256::digest(body))));
            signed.push(("content-type", content_type));
            signed.push(("content-length", body.len().to_string()));
        }

        let signing_string = signed
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");
        let signature = self
            .signing_key
            .try_sign(signing_string.as_bytes())
            .map_err(|e| CredentialsError::new(false, e))?;
        let names = signed
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(" ");
        let authorization = format!(
            r#"Signature version="1",keyId="{}",algorithm="rsa-sha256",headers="{names}",signature="{}""#,
            self.key_id,
            BASE64_STANDARD.encode(signature.to_bytes()),
        );

        let mut headers = HeaderMap::new();
        for (name, value) in signed {
            // The request target and host are part of the request already.
            if name == REQUEST_TARGET || name == HOST {
                continue;
            }
            headers.insert(HeaderName::from_static(name), header_value(value)?);
        }
        headers.insert(http::header::AUTHORIZATION, header_value(authorization)?);
        Ok(headers)
    }
}

fn has_body(method: &Method) -> bool {
    method == Method::POST || method == Method::PUT || method == Method::PATCH
}

fn header_value(value: String) -> gax::credentials::Result<HeaderValue> {
    HeaderValue::try_from(value).map_err(|e| CredentialsError::new(false, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use http::header::CONTENT_LENGTH;
    use rsa::pkcs1::EncodeRsaPrivateKey;
    use rsa::pkcs1v15::{Signature, VerifyingKey};
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use rsa::signature::Verifier;
    use std::io::Write;
    use test_case::test_case;

    const TENANCY: &str = "ocid1.tenancy.oc1..aaa";
    const USER: &str = "ocid1.user.oc1..bbb";
    const FINGERPRINT: &str = "20:3b:97:13:55:1c";

    fn generate_key() -> anyhow::Result<rsa::RsaPrivateKey> {
        Ok(rsa::RsaPrivateKey::new(&mut rsa::rand_core::OsRng, 2048)?)
    }

    fn signer(key: &rsa::RsaPrivateKey) -> RequestSigner {
        RequestSigner {
            key_id: format!("{TENANCY}/{USER}/{FINGERPRINT}"),
            signing_key: SigningKey::<Sha256>::new(key.clone()),
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2014, 1, 5, 21, 31, 40)
            .single()
            .unwrap_or_default()
    }

    // Splits the `authorization` header into its parameters.
    fn parameters(headers: &HeaderMap) -> anyhow::Result<Vec<(String, String)>> {
        let value = headers
            .get(http::header::AUTHORIZATION)
            .ok_or_else(|| anyhow::anyhow!("missing authorization in {headers:?}"))?
            .to_str()?;
        let params = value
            .strip_prefix("Signature ")
            .ok_or_else(|| anyhow::anyhow!("bad scheme {value}"))?;
        Ok(params
            .split(',')
            .filter_map(|p| p.split_once('='))
            .map(|(k, v)| (k.to_string(), v.trim_matches('"').to_string()))
            .collect())
    }

    fn param<'a>(params: &'a [(String, String)], name: &str) -> &'a str {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    fn verify(key: &rsa::RsaPrivateKey, signing_string: &str, signature: &str) -> anyhow::Result<()> {
        let verifier = VerifyingKey::<Sha256>::new(key.to_public_key());
        let bytes = BASE64_STANDARD.decode(signature)?;
        let signature = Signature::try_from(bytes.as_slice())?;
        verifier.verify(signing_string.as_bytes(), &signature)?;
        Ok(())
    }

    #[test]
    fn get_request() -> anyhow::Result<()> {
        let key = generate_key()?;
        let url = reqwest::Url::parse(
            "https://dns.us-ashburn-1.oraclecloud.com/20180115/zones?compartmentId=ocid1.compartment.oc1..ccc&limit=10",
        )?;
        let request = reqwest::Request::new(Method::GET, url);
        let headers = signer(&key).sign(&request, fixed_time())?;

        assert_eq!(
            headers.get(DATE),
            Some(&HeaderValue::from_static("Sun, 05 Jan 2014 21:31:40 GMT"))
        );
        assert!(headers.get(CONTENT_SHA256).is_none(), "{headers:?}");
        let params = parameters(&headers)?;
        assert_eq!(param(&params, "version"), "1");
        assert_eq!(param(&params, "keyId"), format!("{TENANCY}/{USER}/{FINGERPRINT}"));
        assert_eq!(param(&params, "algorithm"), "rsa-sha256");
        assert_eq!(param(&params, "headers"), "date (request-target) host");

        let signing_string = [
            "date: Sun, 05 Jan 2014 21:31:40 GMT",
            "(request-target): get /20180115/zones?compartmentId=ocid1.compartment.oc1..ccc&limit=10",
            "host: dns.us-ashburn-1.oraclecloud.com",
        ]
        .join("\n");
        verify(&key, &signing_string, param(&params, "signature"))?;
        Ok(())
    }

    #[test]
    fn post_request() -> anyhow::Result<()> {
        let key = generate_key()?;
        let url = reqwest::Url::parse("http://127.0.0.1:8080/20180115/zones")?;
        let body = br#"{"name":"example.com"}"#;
        let mut request = reqwest::Request::new(Method::POST, url);
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        *request.body_mut() = Some(reqwest::Body::from(body.to_vec()));
        let headers = signer(&key).sign(&request, fixed_time())?;

        let hash = BASE64_STANDARD.encode(Sha256::digest(body));
        assert_eq!(
            headers.get(CONTENT_SHA256).and_then(|v| v.to_str().ok()),
            Some(hash.as_str())
        );
        assert_eq!(
            headers.get(CONTENT_LENGTH).and_then(|v| v.to_str().ok()),
            Some(body.len().to_string().as_str())
        );
        let params = parameters(&headers)?;
        assert_eq!(
            param(&params, "headers"),
            "date (request-target) host x-content-sha256 content-type content-length"
        );
        let signing_string = [
            "date: Sun, 05 Jan 2014 21:31:40 GMT".to_string(),
            "(request-target): post /20180115/zones".to_string(),
            "host: 127.0.0.1:8080".to_string(),
            format!("x-content-sha256: {hash}"),
            "content-type: application/json".to_string(),
            format!("content-length: {}", body.len()),
        ]
        .join("\n");
        verify(&key, &signing_string, param(&params, "signature"))?;
        Ok(())
    }

    #[test_case(Method::PUT)]
    #[test_case(Method::PATCH)]
    #[test_case(Method::POST)]
    fn empty_body_is_hashed(method: Method) -> anyhow::Result<()> {
        let key = generate_key()?;
        let url = reqwest::Url::parse("https://dns.us-ashburn-1.oraclecloud.com/20180115/zones/z")?;
        let request = reqwest::Request::new(method, url);
        let headers = signer(&key).sign(&request, fixed_time())?;
        // The well-known SHA-256 of the empty string.
        assert_eq!(
            headers.get(CONTENT_SHA256).and_then(|v| v.to_str().ok()),
            Some("47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=")
        );
        assert_eq!(headers.get(CONTENT_LENGTH), Some(&HeaderValue::from_static("0")));
        assert_eq!(headers.get(CONTENT_TYPE), Some(&HeaderValue::from_static(JSON)));
        Ok(())
    }

    #[test_case(Method::GET)]
    #[test_case(Method::DELETE)]
    fn no_body_headers(method: Method) -> anyhow::Result<()> {
        let key = generate_key()?;
        let url = reqwest::Url::parse("https://dns.us-ashburn-1.oraclecloud.com/20180115/zones/z")?;
        let request = reqwest::Request::new(method, url);
        let headers = signer(&key).sign(&request, fixed_time())?;
        assert!(headers.get(CONTENT_LENGTH).is_none(), "{headers:?}");
        assert!(headers.get(CONTENT_TYPE).is_none(), "{headers:?}");
        Ok(())
    }

    #[test]
    fn build_from_pkcs1_and_pkcs8() -> anyhow::Result<()> {
        let key = generate_key()?;
        let pkcs1 = key.to_pkcs1_pem(LineEnding::LF)?;
        let pkcs8 = key.to_pkcs8_pem(LineEnding::LF)?;
        for pem in [pkcs1.to_string(), pkcs8.to_string()] {
            let _creds = Builder::new(TENANCY, USER, FINGERPRINT)
                .with_private_key_pem(pem)
                .build()?;
        }
        Ok(())
    }

    #[test]
    fn build_errors() {
        let err = Builder::new(TENANCY, USER, FINGERPRINT).build().unwrap_err();
        assert!(err.is_missing(), "{err:?}");

        let err = Builder::new(TENANCY, USER, FINGERPRINT)
            .with_private_key_pem("not a key")
            .build()
            .unwrap_err();
        assert!(err.is_parsing(), "{err:?}");

        let err = Builder::new(TENANCY, USER, FINGERPRINT)
            .with_private_key_file("/does/not/exist.pem")
            .build()
            .unwrap_err();
        assert!(err.is_loading(), "{err:?}");
    }

    #[test]
    fn debug_hides_key() {
        let builder = Builder::new(TENANCY, USER, FINGERPRINT).with_private_key_pem("secret");
        let got = format!("{builder:?}");
        assert!(!got.contains("secret"), "{got}");
    }

    #[test]
    fn from_config_file() -> anyhow::Result<()> {
        let key = generate_key()?;
        let mut key_file = tempfile::NamedTempFile::new()?;
        key_file.write_all(key.to_pkcs1_pem(LineEnding::LF)?.as_bytes())?;
        let mut config = tempfile::NamedTempFile::new()?;
        write!(
            config,
            "[DEFAULT]\ntenancy={TENANCY}\nuser={USER}\nfingerprint={FINGERPRINT}\nkey_file={}\nregion=eu-frankfurt-1\n\n[OTHER]\nregion=us-phoenix-1\n",
            key_file.path().display()
        )?;

        let builder = Builder::from_config_file(config.path(), "DEFAULT")?;
        assert_eq!(builder.key_id(), format!("{TENANCY}/{USER}/{FINGERPRINT}"));
        assert_eq!(builder.region(), Some("eu-frankfurt-1"));
        assert_eq!(
            builder.endpoint().as_deref(),
            Some("https://dns.eu-frankfurt-1.oraclecloud.com")
        );
        let _creds = builder.build()?;

        let other = Builder::from_config_file(config.path(), "OTHER")?;
        assert_eq!(other.region(), Some("us-phoenix-1"));
        Ok(())
    }

    #[test]
    fn config_file_errors() -> anyhow::Result<()> {
        let err = Builder::from_config_file("/does/not/exist", "DEFAULT").unwrap_err();
        assert!(err.is_loading(), "{err:?}");

        let mut config = tempfile::NamedTempFile::new()?;
        write!(config, "[DEFAULT]\ntenancy={TENANCY}\nuser={USER}\n")?;
        let err = Builder::from_config_file(config.path(), "DEFAULT").unwrap_err();
        assert!(err.is_missing(), "{err:?}");
        assert!(err.to_string().contains("fingerprint"), "{err}");

        let err = Builder::from_config_file(config.path(), "MISSING").unwrap_err();
        assert!(err.is_missing(), "{err:?}");
        Ok(())
    }
}
