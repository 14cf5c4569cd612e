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

//! Verify the service account and key requests against a fake server.

#[cfg(test)]
mod tests {
    use cloudkit_iam::client::Client;
    use cloudkit_iam::model::{KeyAlgorithm, KeyType, PrivateKeyType, ServiceAccount};
    use gax::credentials::AnonymousCredentials;
    use httptest::{Expectation, Server, all_of, cycle, matchers::*, responders::*};
    use serde_json::json;

    const ACCOUNT: &str = "/v1/projects/-/serviceAccounts/sa@p.iam.gserviceaccount.com";

    async fn test_client(server: &Server) -> anyhow::Result<Client> {
        let client = Client::builder()
            .with_endpoint(format!("http://{}", server.addr()))
            .with_credentials(AnonymousCredentials::new())
            .build()
            .await?;
        Ok(client)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn list_by_item() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/v1/projects/p/serviceAccounts"),
                request::query(url_decoded(contains(("pageSize", "2")))),
            ])
            .times(2)
            .respond_with(cycle![
                json_encoded(json!({
                    "accounts": [
                        {"email": "a@p.iam.gserviceaccount.com"},
                        {"email": "b@p.iam.gserviceaccount.com"},
                    ],
                    "nextPageToken": "t1",
                })),
                json_encoded(json!({
                    "accounts": [{"email": "c@p.iam.gserviceaccount.com"}],
                })),
            ]),
        );
        let client = test_client(&server).await?;
        let mut items = client
            .list_service_accounts("p")
            .set_page_size(2)
            .by_item();
        let mut emails = Vec::new();
        while let Some(account) = items.next().await {
            emails.push(account?.email.unwrap_or_default());
        }
        assert_eq!(
            emails,
            vec![
                "a@p.iam.gserviceaccount.com",
                "b@p.iam.gserviceaccount.com",
                "c@p.iam.gserviceaccount.com",
            ]
        );
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn get_short_name() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", ACCOUNT)).respond_with(
                json_encoded(json!({
                    "name": "projects/p/serviceAccounts/sa@p.iam.gserviceaccount.com",
                    "email": "sa@p.iam.gserviceaccount.com",
                    "uniqueId": "1234",
                    "etag": "BwX=",
                })),
            ),
        );
        let client = test_client(&server).await?;
        let account = client
            .get_service_account("sa@p.iam.gserviceaccount.com")
            .send()
            .await?;
        assert_eq!(account.unique_id.as_deref(), Some("1234"));
        assert_eq!(account.etag.as_deref(), Some("BwX="));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn create() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/v1/projects/p/serviceAccounts"),
                request::body(json_decoded(eq(json!({
                    "accountId": "sa",
                    "serviceAccount": {"displayName": "My Account"},
                })))),
            ])
            .respond_with(json_encoded(json!({
                "email": "sa@p.iam.gserviceaccount.com",
                "displayName": "My Account",
            }))),
        );
        let client = test_client(&server).await?;
        let account = client
            .create_service_account("projects/p", "sa")
            .set_service_account(ServiceAccount::default().set_display_name("My Account"))
            .send()
            .await?;
        assert_eq!(account.email.as_deref(), Some("sa@p.iam.gserviceaccount.com"));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn create_is_not_retried() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/v1/projects/p/serviceAccounts"))
                .times(1)
                .respond_with(status_code(503).body(
                    json!({"error": {"code": 503, "message": "try again", "status": "UNAVAILABLE"}})
                        .to_string(),
                )),
        );
        let client = test_client(&server).await?;
        let err = client
            .create_service_account("p", "sa")
            .send()
            .await
            .unwrap_err();
        assert_eq!(err.http_status_code(), Some(503), "{err:?}");
        assert_eq!(
            err.status().and_then(|s| s.status.as_deref()),
            Some("UNAVAILABLE"),
            "{err:?}"
        );
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn patch_with_mask() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("PATCH", ACCOUNT),
                request::body(json_decoded(eq(json!({
                    "serviceAccount": {"description": "batch jobs", "etag": "BwX="},
                    "updateMask": "description",
                })))),
            ])
            .respond_with(json_encoded(json!({
                "description": "batch jobs",
                "etag": "BwY=",
            }))),
        );
        let client = test_client(&server).await?;
        let mut account = ServiceAccount::default().set_description("batch jobs");
        account.etag = Some("BwX=".into());
        let updated = client
            .patch_service_account("sa@p.iam.gserviceaccount.com", account)
            .set_update_mask(["description"])
            .send()
            .await?;
        assert_eq!(updated.etag.as_deref(), Some("BwY="));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn delete_enable_disable() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("DELETE", ACCOUNT))
                .respond_with(json_encoded(json!({}))),
        );
        server.expect(
            Expectation::matching(request::method_path("POST", format!("{ACCOUNT}:enable")))
                .respond_with(json_encoded(json!({}))),
        );
        server.expect(
            Expectation::matching(request::method_path("POST", format!("{ACCOUNT}:disable")))
                .respond_with(status_code(200)),
        );
        let client = test_client(&server).await?;
        client
            .delete_service_account("sa@p.iam.gserviceaccount.com")
            .send()
            .await?;
        client
            .enable_service_account("sa@p.iam.gserviceaccount.com")
            .send()
            .await?;
        client
            .disable_service_account("sa@p.iam.gserviceaccount.com")
            .send()
            .await?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn get_retries_unavailable() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", ACCOUNT))
                .times(2)
                .respond_with(cycle![
                    status_code(503).body("unavailable"),
                    json_encoded(json!({"email": "sa@p.iam.gserviceaccount.com"})),
                ]),
        );
        let client = test_client(&server).await?;
        let account = client
            .get_service_account("sa@p.iam.gserviceaccount.com")
            .send()
            .await?;
        assert_eq!(account.email.as_deref(), Some("sa@p.iam.gserviceaccount.com"));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn list_keys_by_type() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", format!("{ACCOUNT}/keys")),
                request::query(url_decoded(contains(("keyTypes", "USER_MANAGED")))),
            ])
            .respond_with(json_encoded(json!({
                "keys": [{
                    "name": "projects/p/serviceAccounts/sa@p.iam.gserviceaccount.com/keys/k1",
                    "keyType": "USER_MANAGED",
                    "keyAlgorithm": "KEY_ALG_RSA_2048",
                }],
            }))),
        );
        let client = test_client(&server).await?;
        let keys = client
            .list_service_account_keys("sa@p.iam.gserviceaccount.com")
            .set_key_types([KeyType::UserManaged])
            .send()
            .await?;
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key_id(), Some("k1"));
        assert_eq!(keys[0].key_type, Some(KeyType::UserManaged));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn create_and_delete_key() -> anyhow::Result<()> {
        let key_name = "projects/p/serviceAccounts/sa@p.iam.gserviceaccount.com/keys/k2";
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", format!("{ACCOUNT}/keys")),
                request::body(json_decoded(eq(json!({
                    "keyAlgorithm": "KEY_ALG_RSA_2048",
                    "privateKeyType": "TYPE_GOOGLE_CREDENTIALS_FILE",
                })))),
            ])
            .respond_with(json_encoded(json!({
                "name": key_name,
                "privateKeyData": "aGVsbG8=",
            }))),
        );
        server.expect(
            Expectation::matching(request::method_path("DELETE", format!("/v1/{key_name}")))
                .respond_with(json_encoded(json!({}))),
        );
        let client = test_client(&server).await?;
        let key = client
            .create_service_account_key("sa@p.iam.gserviceaccount.com")
            .set_key_algorithm(KeyAlgorithm::Rsa2048)
            .set_private_key_type(PrivateKeyType::GoogleCredentialsFile)
            .send()
            .await?;
        let data = key.private_key().transpose()?;
        assert_eq!(data.as_deref(), Some(b"hello".as_slice()));
        client
            .delete_service_account_key(key.name.unwrap_or_default())
            .send()
            .await?;
        Ok(())
    }
}
