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

//! Verify request-level tracing can be enabled from the environment.

#[cfg(test)]
mod tests {
    use cloudkit_gax as gax;
    use gax::client_builder::ClientConfig;
    use gax::credentials::AnonymousCredentials;
    use gax::http::ReqwestClient;
    use gax::options::RequestOptions;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use scoped_env::ScopedEnv;
    use serde_json::json;
    use tracing_subscriber::util::SubscriberInitExt;

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[serial_test::serial]
    async fn tracing_from_env() -> Result<()> {
        let _e = ScopedEnv::set("CLOUDKIT_TRACING", "true");
        let _guard = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .set_default();

        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/traced"))
                .respond_with(json_encoded(json!({"status": "done"}))),
        );
        let endpoint = format!("http://{}", server.addr());
        let config = ClientConfig {
            cred: Some(AnonymousCredentials::new().into()),
            ..ClientConfig::default()
        };
        assert!(config.tracing_enabled());
        let client = ReqwestClient::new(config, &endpoint).await?;
        let builder = client.builder(reqwest::Method::GET, "/traced".into());
        let response = client
            .execute::<gax::http::NoBody, serde_json::Value>(
                builder,
                None,
                RequestOptions::default(),
            )
            .await?;
        assert_eq!(response.into_body(), json!({"status": "done"}));
        Ok(())
    }
}
