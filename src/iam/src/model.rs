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

//! The IAM v1 REST resources used by this client.

use base64::Engine;
use gax::api_enum;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

api_enum! {
    /// The algorithm of a service account key.
    KeyAlgorithm {
        Unspecified => "KEY_ALG_UNSPECIFIED",
        Rsa1024 => "KEY_ALG_RSA_1024",
        Rsa2048 => "KEY_ALG_RSA_2048",
    }
}

api_enum! {
    /// The file format of a private key.
    PrivateKeyType {
        Unspecified => "TYPE_UNSPECIFIED",
        Pkcs12File => "TYPE_PKCS12_FILE",
        GoogleCredentialsFile => "TYPE_GOOGLE_CREDENTIALS_FILE",
    }
}

api_enum! {
    /// Who manages a service account key.
    KeyType {
        Unspecified => "KEY_TYPE_UNSPECIFIED",
        UserManaged => "USER_MANAGED",
        SystemManaged => "SYSTEM_MANAGED",
    }
}

api_enum! {
    /// How much of each role to return in `roles.list`.
    RoleView {
        /// Omits the permissions.
        Basic => "BASIC",
        Full => "FULL",
    }
}

api_enum! {
    /// The launch stage of a role.
    RoleLaunchStage {
        Alpha => "ALPHA",
        Beta => "BETA",
        Ga => "GA",
        Deprecated => "DEPRECATED",
        Disabled => "DISABLED",
        Eap => "EAP",
    }
}

/// An IAM service account.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceAccount {
    /// `projects/{project}/serviceAccounts/{email}`.
    pub name: Option<String>,
    pub project_id: Option<String>,
    pub unique_id: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub etag: Option<String>,
    pub oauth2_client_id: Option<String>,
    pub disabled: Option<bool>,
}

impl ServiceAccount {
    pub fn set_display_name<T: Into<String>>(mut self, v: T) -> Self {
        self.display_name = Some(v.into());
        self
    }

    pub fn set_description<T: Into<String>>(mut self, v: T) -> Self {
        self.description = Some(v.into());
        self
    }
}

/// The response of `serviceAccounts.list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListServiceAccountsResponse {
    pub accounts: Vec<ServiceAccount>,
    pub next_page_token: String,
}

impl gax::paginator::PageableResponse for ListServiceAccountsResponse {
    type PageItem = ServiceAccount;

    fn items(self) -> Vec<Self::PageItem> {
        self.accounts
    }

    fn next_page_token(&self) -> String {
        self.next_page_token.clone()
    }
}

/// The request body of `serviceAccounts.create`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateServiceAccountRequest {
    pub account_id: String,
    pub service_account: Option<ServiceAccount>,
}

/// The request body of `serviceAccounts.patch`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatchServiceAccountRequest {
    pub service_account: ServiceAccount,
    /// A comma-separated list of the fields to update, for example
    /// `displayName,description`.
    pub update_mask: String,
}

/// A key for a service account.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceAccountKey {
    /// `projects/{project}/serviceAccounts/{email}/keys/{key}`.
    pub name: Option<String>,
    pub private_key_type: Option<PrivateKeyType>,
    pub key_algorithm: Option<KeyAlgorithm>,
    /// The private key, base64 encoded. Only returned when the key is
    /// created.
    pub private_key_data: Option<String>,
    pub public_key_data: Option<String>,
    pub valid_after_time: Option<String>,
    pub valid_before_time: Option<String>,
    pub key_origin: Option<String>,
    pub key_type: Option<KeyType>,
    pub disabled: Option<bool>,
}

impl ServiceAccountKey {
    /// Decodes the private key data.
    ///
    /// For [PrivateKeyType::GoogleCredentialsFile] keys the result is a
    /// JSON key file, usable with `auth::credentials::service_account`.
    pub fn private_key(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.private_key_data
            .as_ref()
            .map(|d| base64::engine::general_purpose::STANDARD.decode(d))
    }

    /// The key id, the last component of the name.
    pub fn key_id(&self) -> Option<&str> {
        self.name.as_deref().and_then(|n| n.rsplit('/').next())
    }
}

/// The response of `serviceAccounts.keys.list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListServiceAccountKeysResponse {
    pub keys: Vec<ServiceAccountKey>,
}

/// The request body of `serviceAccounts.keys.create`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateServiceAccountKeyRequest {
    pub private_key_type: Option<PrivateKeyType>,
    pub key_algorithm: Option<KeyAlgorithm>,
}

/// A condition in a role binding, written in the Common Expression
/// Language.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Expr {
    pub expression: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl Expr {
    pub fn new<T: Into<String>>(expression: T) -> Self {
        Self {
            expression: expression.into(),
            ..Default::default()
        }
    }

    pub fn set_title<T: Into<String>>(mut self, v: T) -> Self {
        self.title = Some(v.into());
        self
    }
}

/// Grants a role to a list of members.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Binding {
    /// For example `roles/viewer`.
    pub role: String,
    /// For example `user:alice@example.com` or
    /// `serviceAccount:sa@p.iam.gserviceaccount.com`.
    pub members: Vec<String>,
    pub condition: Option<Expr>,
}

impl Binding {
    pub fn new<R: Into<String>>(role: R) -> Self {
        Self {
            role: role.into(),
            ..Default::default()
        }
    }

    pub fn set_members<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.members = v.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_condition(mut self, v: Expr) -> Self {
        self.condition = Some(v);
        self
    }
}

/// The audit logging configuration for a log type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditLogConfig {
    /// `ADMIN_READ`, `DATA_WRITE` or `DATA_READ`.
    pub log_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exempted_members: Vec<String>,
}

/// The audit logging configuration for a service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditConfig {
    /// For example `storage.googleapis.com`, or `allServices`.
    pub service: String,
    pub audit_log_configs: Vec<AuditLogConfig>,
}

/// An IAM policy: the roles granted on a resource.
///
/// See the [policy][crate::policy] module for helpers to change the
/// members of a role.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Policy {
    /// `1` or `3`. Policies with conditions must use version 3.
    pub version: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<Binding>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audit_configs: Vec<AuditConfig>,
    /// Used for optimistic concurrency control: `setIamPolicy` fails if the
    /// policy changed since this etag was read.
    pub etag: Option<String>,
}

/// Options for `getIamPolicy`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetPolicyOptions {
    pub requested_policy_version: Option<i32>,
}

/// The request body of `getIamPolicy`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetIamPolicyRequest {
    pub options: Option<GetPolicyOptions>,
}

/// The request body of `setIamPolicy`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetIamPolicyRequest {
    pub policy: Policy,
    pub update_mask: Option<String>,
}

/// The request and response body of `testIamPermissions`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestIamPermissions {
    pub permissions: Vec<String>,
}

/// A predefined or custom role.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Role {
    /// `roles/{role}`, `projects/{project}/roles/{role}` or
    /// `organizations/{org}/roles/{role}`.
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included_permissions: Vec<String>,
    pub stage: Option<RoleLaunchStage>,
    pub etag: Option<String>,
    pub deleted: Option<bool>,
}

/// The response of `roles.list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListRolesResponse {
    pub roles: Vec<Role>,
    pub next_page_token: String,
}

impl gax::paginator::PageableResponse for ListRolesResponse {
    type PageItem = Role;

    fn items(self) -> Vec<Self::PageItem> {
        self.roles
    }

    fn next_page_token(&self) -> String {
        self.next_page_token.clone()
    }
}
