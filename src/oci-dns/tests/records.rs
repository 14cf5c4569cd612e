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

//! Verify the OCI DNS record requests against a fake server.

#[cfg(test)]
mod tests {
    use cloudkit_oci_dns::client::Client;
    use cloudkit_oci_dns::model::{RecordDetails, RecordOperation};
    use gax::credentials::AnonymousCredentials;
    use httptest::responders::{Responder, *};
    use httptest::{Expectation, Server, all_of, matchers::*};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn test_client(server: &Server) -> anyhow::Result<Client> {
        let client = Client::builder()
            .with_endpoint(format!("http://{}", server.addr()))
            .with_credentials(AnonymousCredentials::new())
            .build()
            .await?;
        Ok(client)
    }

    fn json_response(
        body: serde_json::Value,
        headers: &[(&'static str, &'static str)],
    ) -> impl Responder + use<> {
        let mut responder = status_code(200)
            .insert_header("content-type", "application/json")
            .body(body.to_string());
        for (k, v) in headers {
            responder = responder.insert_header(*k, *v);
        }
        responder
    }

    fn record(domain: &str, rdata: &str, hash: &str) -> serde_json::Value {
        json!({
            "domain": domain,
            "rtype": "A",
            "rdata": rdata,
            "ttl": 300,
            "recordHash": hash,
            "isProtected": false,
            "rrsetVersion": "3",
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn zone_records_by_page() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/20180115/zones/example.com/records"),
                request::query(url_decoded(contains(("rtype", "A")))),
                request::query(url_decoded(not(contains(key("page"))))),
            ])
            .respond_with(json_response(
                json!({"items": [record("www.example.com", "192.0.2.1", "h1")]}),
                &[("opc-next-page", "2"), ("opc-total-items", "2")],
            )),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/20180115/zones/example.com/records"),
                request::query(url_decoded(contains(("page", "2")))),
            ])
            .respond_with(json_response(
                json!({"items": [record("api.example.com", "192.0.2.2", "h2")]}),
                &[("opc-total-items", "2")],
            )),
        );

        let client = test_client(&server).await?;
        let mut pages = client
            .get_zone_records("example.com")
            .set_rtype("A")
            .by_page();
        let mut hashes = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page?;
            assert_eq!(page.total_items, Some(2));
            hashes.extend(page.items.into_iter().filter_map(|r| r.record_hash));
        }
        assert_eq!(hashes, vec!["h1", "h2"]);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn patch_zone_records() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("PATCH", "/20180115/zones/example.com/records"),
                request::headers(contains(("if-match", "\"v3\""))),
                request::headers(contains(key("opc-retry-token"))),
                request::body(json_decoded(eq(json!({
                    "items": [
                        {
                            "domain": "www.example.com",
                            "rtype": "A",
                            "rdata": "192.0.2.9",
                            "ttl": 60,
                            "operation": "PROHIBIT",
                        },
                        {"recordHash": "h1", "operation": "REMOVE"},
                        {
                            "domain": "www.example.com",
                            "rtype": "A",
                            "rdata": "192.0.2.9",
                            "ttl": 60,
                            "operation": "ADD",
                        },
                    ],
                })))),
            ])
            .respond_with(json_response(
                json!({"items": [record("www.example.com", "192.0.2.9", "h9")]}),
                &[("etag", "\"v4\"")],
            )),
        );

        let client = test_client(&server).await?;
        let new = RecordDetails::new("www.example.com", "A", "192.0.2.9", 60);
        let response = client
            .patch_zone_records(
                "example.com",
                [
                    RecordOperation::prohibit(new.clone()),
                    RecordOperation::remove_hash("h1"),
                    RecordOperation::add(new),
                ],
            )
            .set_if_match("\"v3\"")
            .send()
            .await?;
        assert_eq!(response.etag(), Some("\"v4\""));
        assert_eq!(response.body().items.len(), 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn update_domain_records() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path(
                    "PUT",
                    "/20180115/zones/example.com/records/www.example.com"
                ),
                request::body(json_decoded(eq(json!({
                    "items": [
                        {"domain": "www.example.com", "rtype": "CNAME", "rdata": "lb.example.net.", "ttl": 30},
                    ],
                })))),
            ])
            .respond_with(json_response(json!({"items": []}), &[])),
        );

        let client = test_client(&server).await?;
        client
            .update_domain_records(
                "example.com",
                "www.example.com",
                [RecordDetails::new("www.example.com", "CNAME", "lb.example.net.", 30)],
            )
            .send()
            .await?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn rr_set_lifecycle() -> anyhow::Result<()> {
        let server = Server::run();
        let path = "/20180115/zones/example.com/records/www.example.com/A";
        server.expect(
            Expectation::matching(request::method_path("GET", path)).respond_with(json_response(
                json!({"items": [record("www.example.com", "192.0.2.1", "h1")]}),
                &[("etag", "\"v1\"")],
            )),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("PUT", path),
                request::headers(contains(("if-match", "\"v1\""))),
                request::body(json_decoded(eq(json!({
                    "items": [
                        {"domain": "www.example.com", "rtype": "A", "rdata": "192.0.2.1", "ttl": 600},
                    ],
                })))),
            ])
            .respond_with(json_response(json!({"items": []}), &[("etag", "\"v2\"")])),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("DELETE", path),
                request::headers(contains(("if-match", "\"v2\""))),
            ])
            .respond_with(status_code(204)),
        );

        let client = test_client(&server).await?;
        let current = client
            .get_rr_set("example.com", "www.example.com", "A")
            .send()
            .await?;
        let etag = current.etag().unwrap_or_default().to_string();
        let items = current
            .into_body()
            .items
            .into_iter()
            .map(|r| RecordDetails {
                ttl: 600,
                ..RecordDetails::from(r)
            });
        let updated = client
            .update_rr_set("example.com", "www.example.com", "A", items)
            .set_if_match(etag)
            .send()
            .await?;
        client
            .delete_rr_set("example.com", "www.example.com", "A")
            .set_if_match(updated.etag().unwrap_or_default())
            .send()
            .await?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn not_modified() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/20180115/zones/example.com/records/www.example.com"),
                request::headers(contains(("if-none-match", "\"v1\""))),
            ])
            .respond_with(status_code(304)),
        );

        let client = test_client(&server).await?;
        let err = client
            .get_domain_records("example.com", "www.example.com")
            .set_if_none_match("\"v1\"")
            .send()
            .await
            .expect_err("304 is not a success");
        assert_eq!(err.http_status_code(), Some(304));
        Ok(())
    }
}
