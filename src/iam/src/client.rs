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

//! Contains the IAM client and related types.

use crate::builder::{
    CreateServiceAccount, CreateServiceAccountKey, DeleteServiceAccount, DeleteServiceAccountKey,
    DisableServiceAccount, EnableServiceAccount, GetIamPolicy, GetRole, GetServiceAccount,
    ListRoles, ListServiceAccountKeys, ListServiceAccounts, PatchServiceAccount, SetIamPolicy,
    TestIamPermissions,
};
use crate::model::ServiceAccount;
use crate::names;
use crate::transport::Iam;
use std::sync::Arc;

/// Implements a client for the IAM v1 API.
///
/// # Example
/// ```
/// # tokio_test::block_on(async {
/// # use cloudkit_iam::client::Client;
/// # use gax::credentials::AnonymousCredentials;
/// let client = Client::builder()
///     .with_credentials(AnonymousCredentials::new())
///     .build()
///     .await?;
/// // use `client` to make requests to IAM.
/// # anyhow::Ok(()) });
/// ```
///
/// # Resource names
///
/// Methods that take a service account accept either the full resource name
/// or the short form, the account email or unique id. See
/// [names::service_account][crate::names::service_account].
///
/// # Configuration
///
/// Without credentials, the client uses the default credentials, see
/// [auth::credentials::Builder]. Without a retry policy, the client retries
/// transient errors on idempotent requests for up to 60 seconds.
///
/// # Pooling and Cloning
///
/// `Client` holds a connection pool internally, it is advised to create one
/// and then reuse it. Cloning a client is cheap, the clones share the pool.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<Iam>,
}

impl Client {
    /// Returns a builder for [Client].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new(client_builder::Factory)
    }

    pub(crate) async fn new(
        config: gax::client_builder::ClientConfig,
    ) -> gax::client_builder::Result<Self> {
        let inner = Iam::new(config).await?;
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Lists the service accounts in a project.
    pub fn list_service_accounts<P: AsRef<str>>(&self, project: P) -> ListServiceAccounts {
        ListServiceAccounts::new(self.inner.clone(), names::project(project.as_ref()))
    }

    pub fn get_service_account<N: AsRef<str>>(&self, name: N) -> GetServiceAccount {
        GetServiceAccount::new(self.inner.clone(), names::service_account(name.as_ref()))
    }

    /// Creates a service account, `account_id` becomes the first part of
    /// its email.
    pub fn create_service_account<P, A>(&self, project: P, account_id: A) -> CreateServiceAccount
    where
        P: AsRef<str>,
        A: Into<String>,
    {
        CreateServiceAccount::new(
            self.inner.clone(),
            names::project(project.as_ref()),
            account_id.into(),
        )
    }

    /// Updates the fields of `account` named in the update mask.
    ///
    /// ```
    /// # use cloudkit_iam::client::Client;
    /// use cloudkit_iam::model::ServiceAccount;
    /// async fn sample(client: &Client) -> gax::Result<()> {
    ///     let current = client.get_service_account("sa@my-project.iam.gserviceaccount.com").send().await?;
    ///     let updated = client
    ///         .patch_service_account("sa@my-project.iam.gserviceaccount.com", current.set_description("batch jobs"))
    ///         .set_update_mask(["description"])
    ///         .send()
    ///         .await?;
    ///     println!("{updated:?}");
    ///     Ok(())
    /// }
    /// ```
    pub fn patch_service_account<N: AsRef<str>>(
        &self,
        name: N,
        account: ServiceAccount,
    ) -> PatchServiceAccount {
        PatchServiceAccount::new(
            self.inner.clone(),
            names::service_account(name.as_ref()),
            account,
        )
    }

    pub fn delete_service_account<N: AsRef<str>>(&self, name: N) -> DeleteServiceAccount {
        DeleteServiceAccount::new(self.inner.clone(), names::service_account(name.as_ref()))
    }

    pub fn enable_service_account<N: AsRef<str>>(&self, name: N) -> EnableServiceAccount {
        EnableServiceAccount::new(self.inner.clone(), names::service_account(name.as_ref()))
    }

    pub fn disable_service_account<N: AsRef<str>>(&self, name: N) -> DisableServiceAccount {
        DisableServiceAccount::new(self.inner.clone(), names::service_account(name.as_ref()))
    }

    /// Lists the keys of a service account.
    pub fn list_service_account_keys<N: AsRef<str>>(&self, name: N) -> ListServiceAccountKeys {
        ListServiceAccountKeys::new(self.inner.clone(), names::service_account(name.as_ref()))
    }

    /// Creates a key for a service account.
    ///
    /// The response is the only chance to get the private key data.
    pub fn create_service_account_key<N: AsRef<str>>(&self, name: N) -> CreateServiceAccountKey {
        CreateServiceAccountKey::new(self.inner.clone(), names::service_account(name.as_ref()))
    }

    /// Deletes a key, `name` is the full key name as returned in
    /// [ServiceAccountKey::name][crate::model::ServiceAccountKey::name].
    pub fn delete_service_account_key<N: Into<String>>(&self, name: N) -> DeleteServiceAccountKey {
        DeleteServiceAccountKey::new(self.inner.clone(), name.into())
    }

    /// Gets the IAM policy of a resource, such as a service account.
    pub fn get_iam_policy<R: Into<String>>(&self, resource: R) -> GetIamPolicy {
        GetIamPolicy::new(self.inner.clone(), resource.into())
    }

    /// Replaces the IAM policy of a resource.
    ///
    /// Prefer [update_iam_policy][crate::policy::update_iam_policy], it
    /// handles concurrent changes.
    pub fn set_iam_policy<R: Into<String>>(&self, resource: R) -> SetIamPolicy {
        SetIamPolicy::new(self.inner.clone(), resource.into())
    }

    /// Returns the subset of `permissions` the caller has on the resource.
    pub fn test_iam_permissions<R, I, V>(&self, resource: R, permissions: I) -> TestIamPermissions
    where
        R: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        TestIamPermissions::new(
            self.inner.clone(),
            resource.into(),
            permissions.into_iter().map(Into::into).collect(),
        )
    }

    /// Lists roles.
    ///
    /// `parent` is empty for the predefined roles, `projects/{id}` or
    /// `organizations/{id}` for custom roles.
    pub fn list_roles<P: Into<String>>(&self, parent: P) -> ListRoles {
        ListRoles::new(self.inner.clone(), parent.into())
    }

    /// Gets a role, for example `roles/viewer`.
    pub fn get_role<N: Into<String>>(&self, name: N) -> GetRole {
        GetRole::new(self.inner.clone(), name.into())
    }
}

/// A builder for [Client].
///
/// ```
/// # tokio_test::block_on(async {
/// # use cloudkit_iam::client::Client;
/// let builder = Client::builder();
/// let client = builder
///     .with_endpoint("https://iam.googleapis.com")
///     .with_credentials(gax::credentials::AnonymousCredentials::new())
///     .build()
///     .await?;
/// # anyhow::Ok(()) });
/// ```
pub type ClientBuilder = gax::client_builder::ClientBuilder<client_builder::Factory>;

pub(crate) mod client_builder {
    use super::Client;
    use gax::client_builder::{ClientConfig, Error, Result};
    use gax::retry_policy::{Aip194Strict, RetryPolicyExt};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Debug)]
    pub struct Factory;

    impl gax::client_builder::ClientFactory for Factory {
        type Client = Client;
        async fn build(self, mut config: ClientConfig) -> Result<Self::Client> {
            if config.cred.is_none() {
                let cred = auth::credentials::Builder::default()
                    .build()
                    .map_err(Error::cred)?;
                config.cred = Some(cred);
            }
            if config.retry_policy.is_none() {
                config.retry_policy =
                    Some(Arc::new(Aip194Strict.with_time_limit(Duration::from_secs(60))));
            }
            Client::new(config).await
        }
    }
}
