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

//! Verify the dataset, table, and job metadata requests against a fake
//! server.

#[cfg(test)]
mod tests {
    use cloudkit_bigquery::client::Client;
    use cloudkit_bigquery::model::{
        Dataset, DatasetReference, Table, TableFieldSchema, TableReference, TableSchema,
    };
    use gax::credentials::AnonymousCredentials;
    use gax::options::RequestOptionsBuilder;
    use httptest::{Expectation, Server, all_of, cycle, matchers::*, responders::*};
    use serde_json::json;

    async fn test_client(server: &Server) -> anyhow::Result<Client> {
        let client = Client::builder()
            .with_endpoint(format!("http://{}", server.addr()))
            .with_credentials(AnonymousCredentials::new())
            .build()
            .await?;
        Ok(client)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn create_dataset() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/bigquery/v2/projects/p/datasets"),
                request::body(json_decoded(eq(json!({
                    "datasetReference": {"projectId": "p", "datasetId": "d"},
                    "description": "test dataset",
                    "location": "EU",
                })))),
            ])
            .respond_with(json_encoded(json!({
                "id": "p:d",
                "etag": "etag-1",
                "datasetReference": {"projectId": "p", "datasetId": "d"},
                "location": "EU",
                "creationTime": "1700000000000",
            }))),
        );
        let client = test_client(&server).await?;
        let dataset = client
            .create_dataset("p")
            .set_dataset(
                Dataset::new(DatasetReference::new("p", "d"))
                    .set_description("test dataset")
                    .set_location("EU"),
            )
            .send()
            .await?;
        assert_eq!(dataset.etag.as_deref(), Some("etag-1"));
        assert_eq!(dataset.location.as_deref(), Some("EU"));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn update_dataset_with_etag() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("PATCH", "/bigquery/v2/projects/p/datasets/d"),
                request::headers(contains(("if-match", "etag-1"))),
            ])
            .respond_with(json_encoded(json!({
                "etag": "etag-2",
                "datasetReference": {"projectId": "p", "datasetId": "d"},
                "description": "updated",
            }))),
        );
        let client = test_client(&server).await?;
        let mut dataset = Dataset::new(DatasetReference::new("p", "d")).set_description("updated");
        dataset.etag = Some("etag-1".into());
        let updated = client
            .update_dataset("p", "d")
            .set_dataset(dataset)
            .send()
            .await?;
        assert_eq!(updated.etag.as_deref(), Some("etag-2"));
        assert_eq!(updated.description.as_deref(), Some("updated"));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn update_dataset_precondition_failed() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path(
                "PATCH",
                "/bigquery/v2/projects/p/datasets/d",
            ))
            .respond_with(status_code(412).body(
                json!({"error": {
                    "code": 412,
                    "message": "Precondition check failed.",
                    "errors": [{"reason": "conditionNotMet", "message": "Precondition check failed."}],
                }})
                .to_string(),
            )),
        );
        let client = test_client(&server).await?;
        let mut dataset = Dataset::new(DatasetReference::new("p", "d"));
        dataset.etag = Some("stale".into());
        let err = client
            .update_dataset("p", "d")
            .set_dataset(dataset)
            .send()
            .await
            .unwrap_err();
        assert_eq!(err.http_status_code(), Some(412));
        let status = err.status().expect("the error has a status");
        assert!(status.has_reason("conditionNotMet"), "{status:?}");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn get_dataset_not_found() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path(
                "GET",
                "/bigquery/v2/projects/p/datasets/missing",
            ))
            .respond_with(status_code(404).body(
                json!({"error": {
                    "code": 404,
                    "message": "Not found: Dataset p:missing",
                    "status": "NOT_FOUND",
                    "errors": [{"reason": "notFound", "message": "Not found: Dataset p:missing", "domain": "global"}],
                }})
                .to_string(),
            )),
        );
        let client = test_client(&server).await?;
        let err = client.get_dataset("p", "missing").send().await.unwrap_err();
        assert_eq!(err.http_status_code(), Some(404));
        let status = err.status().expect("the error has a status");
        assert_eq!(status.status.as_deref(), Some("NOT_FOUND"));
        assert!(status.has_reason("notFound"), "{status:?}");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn delete_dataset_with_contents() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("DELETE", "/bigquery/v2/projects/p/datasets/d"),
                request::query(url_decoded(contains(("deleteContents", "true")))),
            ])
            .respond_with(status_code(204)),
        );
        let client = test_client(&server).await?;
        client
            .delete_dataset("p", "d")
            .set_delete_contents(true)
            .send()
            .await?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn list_datasets_by_item() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/bigquery/v2/projects/p/datasets"),
                request::query(url_decoded(contains(("all", "true")))),
                request::query(url_decoded(not(contains(key("pageToken"))))),
            ])
            .respond_with(json_encoded(json!({
                "datasets": [
                    {"datasetReference": {"projectId": "p", "datasetId": "d1"}},
                    {"datasetReference": {"projectId": "p", "datasetId": "d2"}},
                ],
                "nextPageToken": "page-2",
            }))),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/bigquery/v2/projects/p/datasets"),
                request::query(url_decoded(contains(("pageToken", "page-2")))),
            ])
            .respond_with(json_encoded(json!({
                "datasets": [
                    {"datasetReference": {"projectId": "p", "datasetId": "d3"}},
                ],
            }))),
        );
        let client = test_client(&server).await?;
        let mut items = client.list_datasets("p").set_all(true).by_item();
        let mut names = Vec::new();
        while let Some(item) = items.next().await {
            let item = item?;
            names.push(item.dataset_reference.map(|r| r.dataset_id).unwrap_or_default());
        }
        assert_eq!(names, vec!["d1", "d2", "d3"]);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn create_and_get_table() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/bigquery/v2/projects/p/datasets/d/tables"),
                request::body(json_decoded(eq(json!({
                    "tableReference": {"projectId": "p", "datasetId": "d", "tableId": "t"},
                    "schema": {"fields": [
                        {"name": "name", "type": "STRING", "mode": "REQUIRED"},
                        {"name": "size", "type": "INTEGER"},
                    ]},
                })))),
            ])
            .respond_with(json_encoded(json!({
                "tableReference": {"projectId": "p", "datasetId": "d", "tableId": "t"},
                "etag": "etag-1",
            }))),
        );
        server.expect(
            Expectation::matching(request::method_path(
                "GET",
                "/bigquery/v2/projects/p/datasets/d/tables/t",
            ))
            .respond_with(json_encoded(json!({
                "tableReference": {"projectId": "p", "datasetId": "d", "tableId": "t"},
                "numRows": "42",
                "schema": {"fields": [
                    {"name": "name", "type": "STRING", "mode": "REQUIRED"},
                    {"name": "size", "type": "INTEGER"},
                ]},
            }))),
        );
        let client = test_client(&server).await?;
        let reference = TableReference::new("p", "d", "t");
        let schema = TableSchema::new([
            TableFieldSchema::new("name", "STRING").set_mode("REQUIRED"),
            TableFieldSchema::new("size", "INTEGER"),
        ]);
        let created = client
            .create_table("p", "d")
            .set_table(Table::new(reference.clone()).set_schema(schema.clone()))
            .send()
            .await?;
        assert_eq!(created.etag.as_deref(), Some("etag-1"));

        let table = client.get_table(reference).send().await?;
        assert_eq!(table.num_rows, Some(42));
        assert_eq!(table.schema, Some(schema));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn list_tables_by_page() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/bigquery/v2/projects/p/datasets/d/tables"),
                request::query(url_decoded(contains(("maxResults", "1")))),
            ])
            .times(2)
            .respond_with(cycle![
                json_encoded(json!({
                    "tables": [{"tableReference": {"projectId": "p", "datasetId": "d", "tableId": "t1"}}],
                    "nextPageToken": "next",
                    "totalItems": 2,
                })),
                json_encoded(json!({
                    "tables": [{"tableReference": {"projectId": "p", "datasetId": "d", "tableId": "t2"}}],
                    "totalItems": 2,
                })),
            ]),
        );
        let client = test_client(&server).await?;
        let mut pages = client.list_tables("p", "d").set_max_results(1).by_page();
        let mut count = 0;
        while let Some(page) = pages.next().await {
            let page = page?;
            assert_eq!(page.tables.len(), 1);
            count += 1;
        }
        assert_eq!(count, 2);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn list_jobs_query_parameters() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/bigquery/v2/projects/p/jobs"),
                request::query(url_decoded(contains(("projection", "full")))),
                request::query(url_decoded(contains(("allUsers", "true")))),
                request::query(url_decoded(contains(("stateFilter", "running")))),
                request::query(url_decoded(contains(("stateFilter", "pending")))),
            ])
            .respond_with(json_encoded(json!({
                "jobs": [{
                    "id": "p:US.job_1",
                    "jobReference": {"projectId": "p", "jobId": "job_1", "location": "US"},
                    "state": "RUNNING",
                }],
            }))),
        );
        let client = test_client(&server).await?;
        let page = client
            .list_jobs("p")
            .set_all_users(true)
            .set_state_filter(["running", "pending"])
            .send()
            .await?;
        assert_eq!(page.jobs.len(), 1);
        assert_eq!(page.jobs[0].state.as_deref(), Some("RUNNING"));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn get_job_with_location() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/bigquery/v2/projects/p/jobs/job_1"),
                request::query(url_decoded(contains(("location", "EU")))),
                request::headers(contains(("user-agent", matches("^test-agent ")))),
            ])
            .respond_with(json_encoded(json!({
                "jobReference": {"projectId": "p", "jobId": "job_1", "location": "EU"},
                "status": {"state": "DONE"},
            }))),
        );
        let client = test_client(&server).await?;
        let job = client
            .get_job("p", "job_1")
            .set_location("EU")
            .with_user_agent("test-agent")
            .send()
            .await?;
        assert_eq!(job.status.map(|s| s.state), Some("DONE".to_string()));
        Ok(())
    }
}
