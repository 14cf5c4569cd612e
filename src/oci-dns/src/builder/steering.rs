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

use super::{if_match, if_none_match, paginated, query_setters, request_builder};
use crate::Result;
use crate::model::{
    AttachmentLifecycleState, CreateSteeringPolicyAttachmentDetails, CreateSteeringPolicyDetails,
    Page, SortOrder, SteeringPolicy, SteeringPolicyAttachment, SteeringPolicyLifecycleState,
    SteeringTemplate, UpdateSteeringPolicyAttachmentDetails, UpdateSteeringPolicyDetails,
};
use crate::transport::{Conditions, Dns, Query, path};
use gax::options::RequestOptions;
use gax::response::Response;
use reqwest::Method;
use std::sync::Arc;

const POLICIES: &str = "steeringPolicies";
const ATTACHMENTS: &str = "steeringPolicyAttachments";

request_builder!(
    ListSteeringPolicies,
    CreateSteeringPolicy,
    GetSteeringPolicy,
    UpdateSteeringPolicy,
    DeleteSteeringPolicy,
    ListSteeringPolicyAttachments,
    CreateSteeringPolicyAttachment,
    GetSteeringPolicyAttachment,
    UpdateSteeringPolicyAttachment,
    DeleteSteeringPolicyAttachment,
);
if_match!(
    UpdateSteeringPolicy,
    DeleteSteeringPolicy,
    UpdateSteeringPolicyAttachment,
    DeleteSteeringPolicyAttachment,
);
if_none_match!(GetSteeringPolicy, GetSteeringPolicyAttachment);
paginated!(
    ListSteeringPolicies => SteeringPolicy,
    ListSteeringPolicyAttachments => SteeringPolicyAttachment,
);

/// The request builder for [Client::list_steering_policies][crate::client::Client::list_steering_policies] calls.
#[derive(Clone, Debug)]
pub struct ListSteeringPolicies {
    inner: Arc<Dns>,
    query: Query,
    options: RequestOptions,
}

impl ListSteeringPolicies {
    pub(crate) fn new(inner: Arc<Dns>, compartment_id: String) -> Self {
        Self {
            inner,
            query: Query::from([("compartmentId", compartment_id)]),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request, returning a single page.
    pub async fn send(self) -> Result<Page<SteeringPolicy>> {
        self.inner
            .get::<Vec<SteeringPolicy>>(
                path(&[POLICIES]),
                &self.query,
                &Conditions::default(),
                self.options,
            )
            .await
            .map(|r| Page::from_response(r, |v| v))
    }
}

query_setters!(ListSteeringPolicies {
    set_display_name: string => "displayName",
    set_display_name_contains: string => "displayNameContains",
    set_health_check_monitor_id: string => "healthCheckMonitorId",
    set_template: value<SteeringTemplate> => "template",
    set_lifecycle_state: value<SteeringPolicyLifecycleState> => "lifecycleState",
    /// `displayName`, `timeCreated` or `template`.
    set_sort_by: string => "sortBy",
    set_sort_order: value<SortOrder> => "sortOrder",
});

/// The request builder for [Client::create_steering_policy][crate::client::Client::create_steering_policy] calls.
///
/// # Example
/// ```
/// # use cloudkit_oci_dns::client::Client;
/// use cloudkit_oci_dns::model::{
///     CreateSteeringPolicyDetails, RuleType, SteeringPolicyAnswer, SteeringPolicyRule,
///     SteeringTemplate,
/// };
/// async fn sample(client: &Client) -> gax::Result<()> {
///     let details = CreateSteeringPolicyDetails::new(
///         "ocid1.compartment.oc1..aaa",
///         "load balance",
///         SteeringTemplate::LoadBalance,
///     )
///     .set_answers([
///         SteeringPolicyAnswer::new("a", "A", "192.0.2.1"),
///         SteeringPolicyAnswer::new("b", "A", "192.0.2.2"),
///     ])
///     .set_rules([SteeringPolicyRule::new(RuleType::Weighted)]);
///     let policy = client.create_steering_policy(details).send().await?;
///     println!("{:?}", policy.body().id);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct CreateSteeringPolicy {
    inner: Arc<Dns>,
    details: CreateSteeringPolicyDetails,
    options: RequestOptions,
}

impl CreateSteeringPolicy {
    pub(crate) fn new(inner: Arc<Dns>, details: CreateSteeringPolicyDetails) -> Self {
        Self {
            inner,
            details,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<SteeringPolicy>> {
        self.inner
            .mutate(
                Method::POST,
                path(&[POLICIES]),
                &Query::new(),
                Some(self.details),
                &Conditions::default(),
                self.options,
            )
            .await
    }
}

/// The request builder for [Client::get_steering_policy][crate::client::Client::get_steering_policy] calls.
#[derive(Clone, Debug)]
pub struct GetSteeringPolicy {
    inner: Arc<Dns>,
    id: String,
    conditions: Conditions,
    options: RequestOptions,
}

impl GetSteeringPolicy {
    pub(crate) fn new(inner: Arc<Dns>, id: String) -> Self {
        Self {
            inner,
            id,
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<SteeringPolicy>> {
        self.inner
            .get(
                path(&[POLICIES, self.id.as_str()]),
                &Query::new(),
                &self.conditions,
                self.options,
            )
            .await
    }
}

/// The request builder for [Client::update_steering_policy][crate::client::Client::update_steering_policy] calls.
#[derive(Clone, Debug)]
pub struct UpdateSteeringPolicy {
    inner: Arc<Dns>,
    id: String,
    details: UpdateSteeringPolicyDetails,
    conditions: Conditions,
    options: RequestOptions,
}

impl UpdateSteeringPolicy {
    pub(crate) fn new(inner: Arc<Dns>, id: String, details: UpdateSteeringPolicyDetails) -> Self {
        Self {
            inner,
            id,
            details,
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<SteeringPolicy>> {
        self.inner
            .mutate(
                Method::PUT,
                path(&[POLICIES, self.id.as_str()]),
                &Query::new(),
                Some(self.details),
                &self.conditions,
                self.options,
            )
            .await
    }
}

/// The request builder for [Client::delete_steering_policy][crate::client::Client::delete_steering_policy] calls.
///
/// A policy with attachments cannot be deleted, delete the attachments
/// first.
#[derive(Clone, Debug)]
pub struct DeleteSteeringPolicy {
    inner: Arc<Dns>,
    id: String,
    conditions: Conditions,
    options: RequestOptions,
}

impl DeleteSteeringPolicy {
    pub(crate) fn new(inner: Arc<Dns>, id: String) -> Self {
        Self {
            inner,
            id,
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<()>> {
        self.inner
            .delete(
                path(&[POLICIES, self.id.as_str()]),
                &Query::new(),
                &self.conditions,
                self.options,
            )
            .await
    }
}

/// The request builder for [Client::list_steering_policy_attachments][crate::client::Client::list_steering_policy_attachments] calls.
#[derive(Clone, Debug)]
pub struct ListSteeringPolicyAttachments {
    inner: Arc<Dns>,
    query: Query,
    options: RequestOptions,
}

impl ListSteeringPolicyAttachments {
    pub(crate) fn new(inner: Arc<Dns>, compartment_id: String) -> Self {
        Self {
            inner,
            query: Query::from([("compartmentId", compartment_id)]),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request, returning a single page.
    pub async fn send(self) -> Result<Page<SteeringPolicyAttachment>> {
        self.inner
            .get::<Vec<SteeringPolicyAttachment>>(
                path(&[ATTACHMENTS]),
                &self.query,
                &Conditions::default(),
                self.options,
            )
            .await
            .map(|r| Page::from_response(r, |v| v))
    }
}

query_setters!(ListSteeringPolicyAttachments {
    set_display_name: string => "displayName",
    set_steering_policy_id: string => "steeringPolicyId",
    set_zone_id: string => "zoneId",
    /// Only list attachments for this exact domain.
    set_domain: string => "domain",
    set_domain_contains: string => "domainContains",
    set_lifecycle_state: value<AttachmentLifecycleState> => "lifecycleState",
    /// `displayName`, `timeCreated` or `domainName`.
    set_sort_by: string => "sortBy",
    set_sort_order: value<SortOrder> => "sortOrder",
});

/// The request builder for [Client::create_steering_policy_attachment][crate::client::Client::create_steering_policy_attachment] calls.
#[derive(Clone, Debug)]
pub struct CreateSteeringPolicyAttachment {
    inner: Arc<Dns>,
    details: CreateSteeringPolicyAttachmentDetails,
    options: RequestOptions,
}

impl CreateSteeringPolicyAttachment {
    pub(crate) fn new(inner: Arc<Dns>, details: CreateSteeringPolicyAttachmentDetails) -> Self {
        Self {
            inner,
            details,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<SteeringPolicyAttachment>> {
        self.inner
            .mutate(
                Method::POST,
                path(&[ATTACHMENTS]),
                &Query::new(),
                Some(self.details),
                &Conditions::default(),
                self.options,
            )
            .await
    }
}

/// The request builder for [Client::get_steering_policy_attachment][crate::client::Client::get_steering_policy_attachment] calls.
#[derive(Clone, Debug)]
pub struct GetSteeringPolicyAttachment {
    inner: Arc<Dns>,
    id: String,
    conditions: Conditions,
    options: RequestOptions,
}

impl GetSteeringPolicyAttachment {
    pub(crate) fn new(inner: Arc<Dns>, id: String) -> Self {
        Self {
            inner,
            id,
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<SteeringPolicyAttachment>> {
        self.inner
            .get(
                path(&[ATTACHMENTS, self.id.as_str()]),
                &Query::new(),
                &self.conditions,
                self.options,
            )
            .await
    }
}

/// The request builder for [Client::update_steering_policy_attachment][crate::client::Client::update_steering_policy_attachment] calls.
#[derive(Clone, Debug)]
pub struct UpdateSteeringPolicyAttachment {
    inner: Arc<Dns>,
    id: String,
    details: UpdateSteeringPolicyAttachmentDetails,
    conditions: Conditions,
    options: RequestOptions,
}

impl UpdateSteeringPolicyAttachment {
    pub(crate) fn new(
        inner: Arc<Dns>,
        id: String,
        details: UpdateSteeringPolicyAttachmentDetails,
    ) -> Self {
        Self {
            inner,
            id,
            details,
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<SteeringPolicyAttachment>> {
        self.inner
            .mutate(
                Method::PUT,
                path(&[ATTACHMENTS, self.id.as_str()]),
                &Query::new(),
                Some(self.details),
                &self.conditions,
                self.options,
            )
            .await
    }
}

/// The request builder for [Client::delete_steering_policy_attachment][crate::client::Client::delete_steering_policy_attachment] calls.
#[derive(Clone, Debug)]
pub struct DeleteSteeringPolicyAttachment {
    inner: Arc<Dns>,
    id: String,
    conditions: Conditions,
    options: RequestOptions,
}

impl DeleteSteeringPolicyAttachment {
    pub(crate) fn new(inner: Arc<Dns>, id: String) -> Self {
        Self {
            inner,
            id,
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<()>> {
        self.inner
            .delete(
                path(&[ATTACHMENTS, self.id.as_str()]),
                &Query::new(),
                &self.conditions,
                self.options,
            )
            .await
    }
}
