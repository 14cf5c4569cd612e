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

//! Verify that requests are signed with the OCI API key.

#[cfg(test)]
mod tests {
    use base64::prelude::{BASE64_STANDARD, Engine as _};
    use cloudkit_oci_dns::client::Client;
    use cloudkit_oci_dns::model::CreateZoneDetails;
    use cloudkit_oci_dns::signer::Builder;
    use httptest::{Expectation, Server, all_of, matchers::*, responders::*};
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use scoped_env::ScopedEnv;
    use serde_json::json;
    use serial_test::serial;
    use sha2::{Digest, Sha256};
    use std::io::Write;

    const TENANCY: &str = "ocid1.tenancy.oc1..aaa";
    const USER: &str = "ocid1.user.oc1..bbb";
    const FINGERPRINT: &str = "20:3b:97:13:55:1c";
    const COMPARTMENT: &str = "ocid1.compartment.oc1..aaa";

    fn private_key_pem() -> anyhow::Result<String> {
        let key = rsa::RsaPrivateKey::new(&mut rsa::rand_core::OsRng, 2048)?;
        Ok(key.to_pkcs8_pem(LineEnding::LF)?.to_string())
    }

    fn signature_matcher(headers: &str) -> String {
        format!(
            r#"^Signature version="1",keyId="{TENANCY}/{USER}/{FINGERPRINT}",algorithm="rsa-sha256",headers="{}",signature="[A-Za-z0-9+/=]+"$"#,
            regex_escape(headers)
        )
    }

    fn regex_escape(s: &str) -> String {
        s.replace('(', r"\(").replace(')', r"\)").replace('.', r"\.")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn signs_get() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/20180115/zones/example.com"),
                request::headers(contains(key("date"))),
                request::headers(contains((
                    "authorization",
                    matches(&*signature_matcher("date (request-target) host")),
                ))),
                request::headers(not(contains(key("x-content-sha256")))),
            ])
            .respond_with(json_encoded(json!({"name": "example.com"}))),
        );

        let credentials = Builder::new(TENANCY, USER, FINGERPRINT)
            .with_private_key_pem(private_key_pem()?)
            .build()?;
        let client = Client::builder()
            .with_endpoint(format!("http://{}", server.addr()))
            .with_credentials(credentials)
            .build()
            .await?;
        client.get_zone("example.com").send().await?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn signs_post_body() -> anyhow::Result<()> {
        let details = CreateZoneDetails::new("example.com", COMPARTMENT);
        let body = serde_json::to_vec(&details)?;
        let hash = BASE64_STANDARD.encode(Sha256::digest(&body));

        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/20180115/zones"),
                request::headers(contains(("x-content-sha256", eq(hash)))),
                request::headers(contains(("content-length", eq(body.len().to_string())))),
                request::headers(contains((
                    "authorization",
                    matches(&*signature_matcher(
                        "date (request-target) host x-content-sha256 content-type content-length"
                    )),
                ))),
            ])
            .respond_with(json_encoded(json!({"name": "example.com"}))),
        );

        let credentials = Builder::new(TENANCY, USER, FINGERPRINT)
            .with_private_key_pem(private_key_pem()?)
            .build()?;
        let client = Client::builder()
            .with_endpoint(format!("http://{}", server.addr()))
            .with_credentials(credentials)
            .build()
            .await?;
        client.create_zone(details).send().await?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[serial]
    async fn default_credentials_from_config_file() -> anyhow::Result<()> {
        let mut key_file = tempfile::NamedTempFile::new()?;
        key_file.write_all(private_key_pem()?.as_bytes())?;
        let mut config = tempfile::NamedTempFile::new()?;
        write!(
            config,
            "[DEFAULT]\nuser={USER}\nfingerprint={FINGERPRINT}\ntenancy={TENANCY}\nkey_file={}\nregion=us-ashburn-1\n",
            key_file.path().display()
        )?;
        let _config = ScopedEnv::set("OCI_CONFIG_FILE", config.path().to_str().unwrap());
        let _profile = ScopedEnv::remove("OCI_CLI_PROFILE");

        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("DELETE", "/20180115/zones/example.com"),
                request::headers(contains((
                    "authorization",
                    matches(&*signature_matcher("date (request-target) host")),
                ))),
            ])
            .respond_with(status_code(204)),
        );

        let client = Client::builder()
            .with_endpoint(format!("http://{}", server.addr()))
            .build()
            .await?;
        client.delete_zone("example.com").send().await?;
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn missing_region_without_endpoint() -> anyhow::Result<()> {
        let mut key_file = tempfile::NamedTempFile::new()?;
        key_file.write_all(private_key_pem()?.as_bytes())?;
        let mut config = tempfile::NamedTempFile::new()?;
        write!(
            config,
            "[DEFAULT]\nuser={USER}\nfingerprint={FINGERPRINT}\ntenancy={TENANCY}\nkey_file={}\n",
            key_file.path().display()
        )?;
        let _config = ScopedEnv::set("OCI_CONFIG_FILE", config.path().to_str().unwrap());
        let _profile = ScopedEnv::remove("OCI_CLI_PROFILE");

        let result = Client::builder().build().await;
        assert!(result.is_err(), "{result:?}");
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn missing_config_file() -> anyhow::Result<()> {
        let _config = ScopedEnv::set("OCI_CONFIG_FILE", "/does/not/exist/oci-config");
        let result = Client::builder()
            .with_endpoint("https://dns.us-ashburn-1.oraclecloud.com")
            .build()
            .await;
        assert!(result.is_err(), "{result:?}");
        Ok(())
    }
}
