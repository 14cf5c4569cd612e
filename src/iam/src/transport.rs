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

//! The REST bindings for the IAM v1 API.

use crate::Result;
use crate::model;
use gax::client_builder::ClientConfig;
use gax::http::{NoBody, ReqwestClient};
use gax::options::RequestOptions;
use gax::response::Response;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;

pub(crate) const DEFAULT_ENDPOINT: &str = "https://iam.googleapis.com";

// Resource names are paths, and service account emails appear in them.
const NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'@')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn path(name: &str) -> String {
    format!("/v1/{}", utf8_percent_encode(name, NAME))
}

fn with_page(
    builder: reqwest::RequestBuilder,
    page_size: Option<i32>,
    page_token: &str,
) -> reqwest::RequestBuilder {
    let builder = match page_size {
        Some(s) => builder.query(&[("pageSize", s)]),
        None => builder,
    };
    match page_token {
        "" => builder,
        t => builder.query(&[("pageToken", t)]),
    }
}

/// Parameters for `roles.list`.
#[derive(Clone, Debug, Default)]
pub(crate) struct ListRolesParams {
    pub view: Option<model::RoleView>,
    pub show_deleted: bool,
    pub page_size: Option<i32>,
}

/// Implements the IAM v1 REST API over [ReqwestClient].
#[derive(Clone, Debug)]
pub(crate) struct Iam {
    inner: ReqwestClient,
}

impl Iam {
    pub(crate) async fn new(config: ClientConfig) -> gax::client_builder::Result<Self> {
        let inner = ReqwestClient::new(config, DEFAULT_ENDPOINT).await?;
        Ok(Self { inner })
    }

    pub(crate) async fn list_service_accounts(
        &self,
        project: &str,
        page_size: Option<i32>,
        page_token: &str,
        options: RequestOptions,
    ) -> Result<Response<model::ListServiceAccountsResponse>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}/serviceAccounts", path(project));
        let builder = with_page(self.inner.builder(Method::GET, path), page_size, page_token);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn get_service_account(
        &self,
        name: &str,
        options: RequestOptions,
    ) -> Result<Response<model::ServiceAccount>> {
        let options = options.set_default_idempotency(true);
        let builder = self.inner.builder(Method::GET, path(name));
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn create_service_account(
        &self,
        project: &str,
        request: model::CreateServiceAccountRequest,
        options: RequestOptions,
    ) -> Result<Response<model::ServiceAccount>> {
        let options = options.set_default_idempotency(false);
        let path = format!("{}/serviceAccounts", path(project));
        let builder = self.inner.builder(Method::POST, path);
        self.inner.execute(builder, Some(request), options).await
    }

    pub(crate) async fn patch_service_account(
        &self,
        name: &str,
        request: model::PatchServiceAccountRequest,
        options: RequestOptions,
    ) -> Result<Response<model::ServiceAccount>> {
        let options = options.set_default_idempotency(request.service_account.etag.is_some());
        let builder = self.inner.builder(Method::PATCH, path(name));
        self.inner.execute(builder, Some(request), options).await
    }

    pub(crate) async fn delete(&self, name: &str, options: RequestOptions) -> Result<Response<()>> {
        let options = options.set_default_idempotency(true);
        let builder = self.inner.builder(Method::DELETE, path(name));
        self.inner
            .execute::<NoBody, serde_json::Value>(builder, None, options)
            .await
            .map(|r| r.map(|_| ()))
    }

    /// Calls a custom method without a request body, such as `:enable`.
    pub(crate) async fn custom_method(
        &self,
        name: &str,
        method: &str,
        options: RequestOptions,
    ) -> Result<Response<()>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}:{method}", path(name));
        let builder = self.inner.builder(Method::POST, path);
        self.inner
            .execute::<_, serde_json::Value>(builder, Some(serde_json::json!({})), options)
            .await
            .map(|r| r.map(|_| ()))
    }

    pub(crate) async fn list_service_account_keys(
        &self,
        name: &str,
        key_types: &[model::KeyType],
        options: RequestOptions,
    ) -> Result<Response<model::ListServiceAccountKeysResponse>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}/keys", path(name));
        let mut builder = self.inner.builder(Method::GET, path);
        for t in key_types {
            builder = builder.query(&[("keyTypes", t.name())]);
        }
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn create_service_account_key(
        &self,
        name: &str,
        request: model::CreateServiceAccountKeyRequest,
        options: RequestOptions,
    ) -> Result<Response<model::ServiceAccountKey>> {
        let options = options.set_default_idempotency(false);
        let path = format!("{}/keys", path(name));
        let builder = self.inner.builder(Method::POST, path);
        self.inner.execute(builder, Some(request), options).await
    }

    pub(crate) async fn get_iam_policy(
        &self,
        resource: &str,
        request: model::GetIamPolicyRequest,
        options: RequestOptions,
    ) -> Result<Response<model::Policy>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}:getIamPolicy", path(resource));
        let builder = self.inner.builder(Method::POST, path);
        self.inner.execute(builder, Some(request), options).await
    }

    pub(crate) async fn set_iam_policy(
        &self,
        resource: &str,
        request: model::SetIamPolicyRequest,
        options: RequestOptions,
    ) -> Result<Response<model::Policy>> {
        // Without an etag a retry could overwrite a concurrent change.
        let options = options.set_default_idempotency(request.policy.etag.is_some());
        let path = format!("{}:setIamPolicy", path(resource));
        let builder = self.inner.builder(Method::POST, path);
        self.inner.execute(builder, Some(request), options).await
    }

    pub(crate) async fn test_iam_permissions(
        &self,
        resource: &str,
        request: model::TestIamPermissions,
        options: RequestOptions,
    ) -> Result<Response<model::TestIamPermissions>> {
        let options = options.set_default_idempotency(true);
        let path = format!("{}:testIamPermissions", path(resource));
        let builder = self.inner.builder(Method::POST, path);
        self.inner.execute(builder, Some(request), options).await
    }

    pub(crate) async fn list_roles(
        &self,
        parent: &str,
        params: &ListRolesParams,
        page_token: &str,
        options: RequestOptions,
    ) -> Result<Response<model::ListRolesResponse>> {
        let options = options.set_default_idempotency(true);
        // Predefined roles have no parent.
        let path = match parent {
            "" => "/v1/roles".to_string(),
            p => format!("{}/roles", path(p)),
        };
        let mut builder = self.inner.builder(Method::GET, path);
        if let Some(view) = &params.view {
            builder = builder.query(&[("view", view.name())]);
        }
        if params.show_deleted {
            builder = builder.query(&[("showDeleted", "true")]);
        }
        let builder = with_page(builder, params.page_size, page_token);
        self.inner.execute(builder, None::<NoBody>, options).await
    }

    pub(crate) async fn get_role(
        &self,
        name: &str,
        options: RequestOptions,
    ) -> Result<Response<model::Role>> {
        let options = options.set_default_idempotency(true);
        let builder = self.inner.builder(Method::GET, path(name));
        self.inner.execute(builder, None::<NoBody>, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("projects/p", "/v1/projects/p")]
    #[test_case(
        "projects/-/serviceAccounts/sa@p.iam.gserviceaccount.com",
        "/v1/projects/-/serviceAccounts/sa@p.iam.gserviceaccount.com"
    )]
    #[test_case("roles/storage admin", "/v1/roles/storage%20admin")]
    #[test_case("projects/p?x=1", "/v1/projects/p%3Fx%3D1")]
    fn paths(name: &str, want: &str) {
        assert_eq!(path(name), want);
    }
}
