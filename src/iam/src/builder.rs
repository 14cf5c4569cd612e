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

//! Request builders for the [Client][crate::client::Client] methods.

use crate::Result;
use crate::model;
use crate::transport::{Iam, ListRolesParams};
use gax::error::Error;
use gax::options::RequestOptions;
use gax::paginator::{ItemPaginator, Paginator};
use gax::response::Response;
use std::sync::Arc;

macro_rules! request_builder {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc(hidden)]
            impl gax::options::internal::RequestBuilder for $name {
                fn request_options(&mut self) -> &mut RequestOptions {
                    &mut self.options
                }
            }
        )*
    };
}

request_builder!(
    ListServiceAccounts,
    GetServiceAccount,
    CreateServiceAccount,
    PatchServiceAccount,
    DeleteServiceAccount,
    EnableServiceAccount,
    DisableServiceAccount,
    ListServiceAccountKeys,
    CreateServiceAccountKey,
    DeleteServiceAccountKey,
    GetIamPolicy,
    SetIamPolicy,
    TestIamPermissions,
    ListRoles,
    GetRole,
);

/// The request builder for [Client::list_service_accounts][crate::client::Client::list_service_accounts] calls.
///
/// # Example
/// ```
/// # use cloudkit_iam::client::Client;
/// async fn sample(client: &Client) -> gax::Result<()> {
///     let mut items = client.list_service_accounts("my-project").by_item();
///     while let Some(account) = items.next().await {
///         println!("{:?}", account?.email);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ListServiceAccounts {
    inner: Arc<Iam>,
    project: String,
    page_size: Option<i32>,
    page_token: String,
    options: RequestOptions,
}

impl ListServiceAccounts {
    pub(crate) fn new(inner: Arc<Iam>, project: String) -> Self {
        Self {
            inner,
            project,
            page_size: None,
            page_token: String::new(),
            options: RequestOptions::default(),
        }
    }

    pub fn set_page_size(mut self, v: i32) -> Self {
        self.page_size = Some(v);
        self
    }

    pub fn set_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.page_token = v.into();
        self
    }

    /// Sends the request, returning a single page.
    pub async fn send(self) -> Result<model::ListServiceAccountsResponse> {
        self.inner
            .list_service_accounts(&self.project, self.page_size, &self.page_token, self.options)
            .await
            .map(Response::into_body)
    }

    /// Streams each page in the collection.
    pub fn by_page(self) -> Paginator<model::ListServiceAccountsResponse, Error> {
        let token = self.page_token.clone();
        let execute = move |token: String| self.clone().set_page_token(token).send();
        Paginator::new(token, execute)
    }

    /// Streams each item in the collection.
    pub fn by_item(self) -> ItemPaginator<model::ListServiceAccountsResponse, Error> {
        self.by_page().items()
    }
}

/// The request builder for [Client::get_service_account][crate::client::Client::get_service_account] calls.
#[derive(Clone, Debug)]
pub struct GetServiceAccount {
    inner: Arc<Iam>,
    name: String,
    options: RequestOptions,
}

impl GetServiceAccount {
    pub(crate) fn new(inner: Arc<Iam>, name: String) -> Self {
        Self {
            inner,
            name,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::ServiceAccount> {
        self.inner
            .get_service_account(&self.name, self.options)
            .await
            .map(Response::into_body)
    }
}

/// The request builder for [Client::create_service_account][crate::client::Client::create_service_account] calls.
///
/// # Example
/// ```
/// # use cloudkit_iam::client::Client;
/// use cloudkit_iam::model::ServiceAccount;
/// async fn sample(client: &Client) -> gax::Result<()> {
///     let account = client
///         .create_service_account("my-project", "my-account")
///         .set_service_account(ServiceAccount::default().set_display_name("My Account"))
///         .send()
///         .await?;
///     println!("{:?}", account.email);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct CreateServiceAccount {
    inner: Arc<Iam>,
    project: String,
    request: model::CreateServiceAccountRequest,
    options: RequestOptions,
}

impl CreateServiceAccount {
    pub(crate) fn new(inner: Arc<Iam>, project: String, account_id: String) -> Self {
        Self {
            inner,
            project,
            request: model::CreateServiceAccountRequest {
                account_id,
                service_account: None,
            },
            options: RequestOptions::default(),
        }
    }

    pub fn set_service_account(mut self, v: model::ServiceAccount) -> Self {
        self.request.service_account = Some(v);
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::ServiceAccount> {
        self.inner
            .create_service_account(&self.project, self.request, self.options)
            .await
            .map(Response::into_body)
    }
}

/// The request builder for [Client::patch_service_account][crate::client::Client::patch_service_account] calls.
///
/// Only the fields named in the update mask are changed.
#[derive(Clone, Debug)]
pub struct PatchServiceAccount {
    inner: Arc<Iam>,
    name: String,
    request: model::PatchServiceAccountRequest,
    options: RequestOptions,
}

impl PatchServiceAccount {
    pub(crate) fn new(inner: Arc<Iam>, name: String, account: model::ServiceAccount) -> Self {
        Self {
            inner,
            name,
            request: model::PatchServiceAccountRequest {
                service_account: account,
                update_mask: String::new(),
            },
            options: RequestOptions::default(),
        }
    }

    /// Sets the fields to update, such as `["displayName", "description"]`.
    pub fn set_update_mask<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.request.update_mask = v
            .into_iter()
            .map(Into::into)
            .collect::<Vec<String>>()
            .join(",");
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::ServiceAccount> {
        self.inner
            .patch_service_account(&self.name, self.request, self.options)
            .await
            .map(Response::into_body)
    }
}

/// The request builder for [Client::delete_service_account][crate::client::Client::delete_service_account] calls.
#[derive(Clone, Debug)]
pub struct DeleteServiceAccount {
    inner: Arc<Iam>,
    name: String,
    options: RequestOptions,
}

impl DeleteServiceAccount {
    pub(crate) fn new(inner: Arc<Iam>, name: String) -> Self {
        Self {
            inner,
            name,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<()> {
        self.inner
            .delete(&self.name, self.options)
            .await
            .map(Response::into_body)
    }
}

/// The request builder for [Client::enable_service_account][crate::client::Client::enable_service_account] calls.
#[derive(Clone, Debug)]
pub struct EnableServiceAccount {
    inner: Arc<Iam>,
    name: String,
    options: RequestOptions,
}

impl EnableServiceAccount {
    pub(crate) fn new(inner: Arc<Iam>, name: String) -> Self {
        Self {
            inner,
            name,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<()> {
        self.inner
            .custom_method(&self.name, "enable", self.options)
            .await
            .map(Response::into_body)
    }
}

/// The request builder for [Client::disable_service_account][crate::client::Client::disable_service_account] calls.
#[derive(Clone, Debug)]
pub struct DisableServiceAccount {
    inner: Arc<Iam>,
    name: String,
    options: RequestOptions,
}

impl DisableServiceAccount {
    pub(crate) fn new(inner: Arc<Iam>, name: String) -> Self {
        Self {
            inner,
            name,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<()> {
        self.inner
            .custom_method(&self.name, "disable", self.options)
            .await
            .map(Response::into_body)
    }
}

/// The request builder for [Client::list_service_account_keys][crate::client::Client::list_service_account_keys] calls.
#[derive(Clone, Debug)]
pub struct ListServiceAccountKeys {
    inner: Arc<Iam>,
    name: String,
    key_types: Vec<model::KeyType>,
    options: RequestOptions,
}

impl ListServiceAccountKeys {
    pub(crate) fn new(inner: Arc<Iam>, name: String) -> Self {
        Self {
            inner,
            name,
            key_types: Vec::new(),
            options: RequestOptions::default(),
        }
    }

    /// Only list keys of these types. All keys are listed by default.
    pub fn set_key_types<T: IntoIterator<Item = model::KeyType>>(mut self, v: T) -> Self {
        self.key_types = v.into_iter().collect();
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Vec<model::ServiceAccountKey>> {
        self.inner
            .list_service_account_keys(&self.name, &self.key_types, self.options)
            .await
            .map(|r| r.into_body().keys)
    }
}

/// The request builder for [Client::create_service_account_key][crate::client::Client::create_service_account_key] calls.
#[derive(Clone, Debug)]
pub struct CreateServiceAccountKey {
    inner: Arc<Iam>,
    name: String,
    request: model::CreateServiceAccountKeyRequest,
    options: RequestOptions,
}

impl CreateServiceAccountKey {
    pub(crate) fn new(inner: Arc<Iam>, name: String) -> Self {
        Self {
            inner,
            name,
            request: model::CreateServiceAccountKeyRequest::default(),
            options: RequestOptions::default(),
        }
    }

    pub fn set_key_algorithm(mut self, v: model::KeyAlgorithm) -> Self {
        self.request.key_algorithm = Some(v);
        self
    }

    pub fn set_private_key_type(mut self, v: model::PrivateKeyType) -> Self {
        self.request.private_key_type = Some(v);
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::ServiceAccountKey> {
        self.inner
            .create_service_account_key(&self.name, self.request, self.options)
            .await
            .map(Response::into_body)
    }
}

/// The request builder for [Client::delete_service_account_key][crate::client::Client::delete_service_account_key] calls.
#[derive(Clone, Debug)]
pub struct DeleteServiceAccountKey {
    inner: Arc<Iam>,
    name: String,
    options: RequestOptions,
}

impl DeleteServiceAccountKey {
    pub(crate) fn new(inner: Arc<Iam>, name: String) -> Self {
        Self {
            inner,
            name,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<()> {
        self.inner
            .delete(&self.name, self.options)
            .await
            .map(Response::into_body)
    }
}

/// The request builder for [Client::get_iam_policy][crate::client::Client::get_iam_policy] calls.
///
/// The request asks for policy version 3, so conditional bindings are
/// returned.
#[derive(Clone, Debug)]
pub struct GetIamPolicy {
    inner: Arc<Iam>,
    resource: String,
    request: model::GetIamPolicyRequest,
    options: RequestOptions,
}

impl GetIamPolicy {
    pub(crate) fn new(inner: Arc<Iam>, resource: String) -> Self {
        Self {
            inner,
            resource,
            request: model::GetIamPolicyRequest {
                options: Some(model::GetPolicyOptions {
                    requested_policy_version: Some(3),
                }),
            },
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Policy> {
        self.inner
            .get_iam_policy(&self.resource, self.request, self.options)
            .await
            .map(Response::into_body)
    }
}

/// The request builder for [Client::set_iam_policy][crate::client::Client::set_iam_policy] calls.
///
/// Keep the etag returned by `get_iam_policy()` in the policy, the service
/// rejects the update if the policy changed in the meantime.
#[derive(Clone, Debug)]
pub struct SetIamPolicy {
    inner: Arc<Iam>,
    resource: String,
    request: model::SetIamPolicyRequest,
    options: RequestOptions,
}

impl SetIamPolicy {
    pub(crate) fn new(inner: Arc<Iam>, resource: String) -> Self {
        Self {
            inner,
            resource,
            request: model::SetIamPolicyRequest::default(),
            options: RequestOptions::default(),
        }
    }

    pub fn set_policy(mut self, v: model::Policy) -> Self {
        self.request.policy = v;
        self
    }

    /// Only update these policy fields, `bindings,etag` if not set.
    pub fn set_update_mask<T: Into<String>>(mut self, v: T) -> Self {
        self.request.update_mask = Some(v.into());
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Policy> {
        self.inner
            .set_iam_policy(&self.resource, self.request, self.options)
            .await
            .map(Response::into_body)
    }
}

/// The request builder for [Client::test_iam_permissions][crate::client::Client::test_iam_permissions] calls.
#[derive(Clone, Debug)]
pub struct TestIamPermissions {
    inner: Arc<Iam>,
    resource: String,
    permissions: Vec<String>,
    options: RequestOptions,
}

impl TestIamPermissions {
    pub(crate) fn new(inner: Arc<Iam>, resource: String, permissions: Vec<String>) -> Self {
        Self {
            inner,
            resource,
            permissions,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request, returning the subset of permissions the caller has.
    pub async fn send(self) -> Result<Vec<String>> {
        let request = model::TestIamPermissions {
            permissions: self.permissions,
        };
        self.inner
            .test_iam_permissions(&self.resource, request, self.options)
            .await
            .map(|r| r.into_body().permissions)
    }
}

/// The request builder for [Client::list_roles][crate::client::Client::list_roles] calls.
#[derive(Clone, Debug)]
pub struct ListRoles {
    inner: Arc<Iam>,
    parent: String,
    params: ListRolesParams,
    page_token: String,
    options: RequestOptions,
}

impl ListRoles {
    pub(crate) fn new(inner: Arc<Iam>, parent: String) -> Self {
        Self {
            inner,
            parent,
            params: ListRolesParams::default(),
            page_token: String::new(),
            options: RequestOptions::default(),
        }
    }

    /// With [RoleView::Full][model::RoleView::Full] the roles include their
    /// permissions.
    pub fn set_view(mut self, v: model::RoleView) -> Self {
        self.params.view = Some(v);
        self
    }

    /// Include deleted custom roles.
    pub fn set_show_deleted(mut self, v: bool) -> Self {
        self.params.show_deleted = v;
        self
    }

    pub fn set_page_size(mut self, v: i32) -> Self {
        self.params.page_size = Some(v);
        self
    }

    pub fn set_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.page_token = v.into();
        self
    }

    /// Sends the request, returning a single page.
    pub async fn send(self) -> Result<model::ListRolesResponse> {
        self.inner
            .list_roles(&self.parent, &self.params, &self.page_token, self.options)
            .await
            .map(Response::into_body)
    }

    /// Streams each page in the collection.
    pub fn by_page(self) -> Paginator<model::ListRolesResponse, Error> {
        let token = self.page_token.clone();
        let execute = move |token: String| self.clone().set_page_token(token).send();
        Paginator::new(token, execute)
    }

    /// Streams each item in the collection.
    pub fn by_item(self) -> ItemPaginator<model::ListRolesResponse, Error> {
        self.by_page().items()
    }
}

/// The request builder for [Client::get_role][crate::client::Client::get_role] calls.
#[derive(Clone, Debug)]
pub struct GetRole {
    inner: Arc<Iam>,
    name: String,
    options: RequestOptions,
}

impl GetRole {
    pub(crate) fn new(inner: Arc<Iam>, name: String) -> Self {
        Self {
            inner,
            name,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Role> {
        self.inner
            .get_role(&self.name, self.options)
            .await
            .map(Response::into_body)
    }
}
