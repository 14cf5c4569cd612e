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
    CreateZoneDetails, Page, Scope, SortOrder, UpdateZoneDetails, Zone, ZoneLifecycleState,
    ZoneType,
};
use crate::transport::{Conditions, Dns, Query, path};
use gax::options::RequestOptions;
use gax::response::Response;
use reqwest::Method;
use std::sync::Arc;

request_builder!(ListZones, CreateZone, GetZone, UpdateZone, DeleteZone);
if_match!(UpdateZone, DeleteZone);
if_none_match!(GetZone);
paginated!(ListZones => Zone);

/// The request builder for [Client::list_zones][crate::client::Client::list_zones] calls.
///
/// # Example
/// ```
/// # use cloudkit_oci_dns::client::Client;
/// use cloudkit_oci_dns::model::ZoneType;
/// async fn sample(client: &Client) -> gax::Result<()> {
///     let mut zones = client
///         .list_zones("ocid1.compartment.oc1..aaa")
///         .set_zone_type(ZoneType::Primary)
///         .by_item();
///     while let Some(zone) = zones.next().await {
///         println!("{:?}", zone?.name);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ListZones {
    inner: Arc<Dns>,
    query: Query,
    options: RequestOptions,
}

impl ListZones {
    pub(crate) fn new(inner: Arc<Dns>, compartment_id: String) -> Self {
        Self {
            inner,
            query: Query::from([("compartmentId", compartment_id)]),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request, returning a single page.
    pub async fn send(self) -> Result<Page<Zone>> {
        self.inner
            .get::<Vec<Zone>>(path(&["zones"]), &self.query, &Conditions::default(), self.options)
            .await
            .map(|r| Page::from_response(r, |v| v))
    }
}

query_setters!(ListZones {
    /// Only list the zone with this exact name.
    set_name: string => "name",
    set_name_contains: string => "nameContains",
    set_zone_type: value<ZoneType> => "zoneType",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
    set_lifecycle_state: value<ZoneLifecycleState> => "lifecycleState",
    /// Only list zones created at or after this time, in RFC 3339 format.
    set_time_created_greater_than_or_equal_to: string => "timeCreatedGreaterThanOrEqualTo",
    set_time_created_less_than: string => "timeCreatedLessThan",
    /// `name`, `zoneType` or `timeCreated`.
    set_sort_by: string => "sortBy",
    set_sort_order: value<SortOrder> => "sortOrder",
});

/// The request builder for [Client::create_zone][crate::client::Client::create_zone] calls.
#[derive(Clone, Debug)]
pub struct CreateZone {
    inner: Arc<Dns>,
    details: CreateZoneDetails,
    options: RequestOptions,
}

impl CreateZone {
    pub(crate) fn new(inner: Arc<Dns>, details: CreateZoneDetails) -> Self {
        Self {
            inner,
            details,
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<Zone>> {
        self.inner
            .mutate(
                Method::POST,
                path(&["zones"]),
                &Query::new(),
                Some(self.details),
                &Conditions::default(),
                self.options,
            )
            .await
    }
}

/// The request builder for [Client::get_zone][crate::client::Client::get_zone] calls.
#[derive(Clone, Debug)]
pub struct GetZone {
    inner: Arc<Dns>,
    zone: String,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl GetZone {
    pub(crate) fn new(inner: Arc<Dns>, zone: String) -> Self {
        Self {
            inner,
            zone,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<Zone>> {
        self.inner
            .get(
                path(&["zones", self.zone.as_str()]),
                &self.query,
                &self.conditions,
                self.options,
            )
            .await
    }
}

query_setters!(GetZone {
    /// Required to look up a zone by name if the name is not unique, for
    /// example a private zone.
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::update_zone][crate::client::Client::update_zone] calls.
#[derive(Clone, Debug)]
pub struct UpdateZone {
    inner: Arc<Dns>,
    zone: String,
    details: UpdateZoneDetails,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl UpdateZone {
    pub(crate) fn new(inner: Arc<Dns>, zone: String, details: UpdateZoneDetails) -> Self {
        Self {
            inner,
            zone,
            details,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<Zone>> {
        self.inner
            .mutate(
                Method::PUT,
                path(&["zones", self.zone.as_str()]),
                &self.query,
                Some(self.details),
                &self.conditions,
                self.options,
            )
            .await
    }
}

query_setters!(UpdateZone {
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
    set_compartment_id: string => "compartmentId",
});

/// The request builder for [Client::delete_zone][crate::client::Client::delete_zone] calls.
#[derive(Clone, Debug)]
pub struct DeleteZone {
    inner: Arc<Dns>,
    zone: String,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl DeleteZone {
    pub(crate) fn new(inner: Arc<Dns>, zone: String) -> Self {
        Self {
            inner,
            zone,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<()>> {
        self.inner
            .delete(
                path(&["zones", self.zone.as_str()]),
                &self.query,
                &self.conditions,
                self.options,
            )
            .await
    }
}

query_setters!(DeleteZone {
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
    set_compartment_id: string => "compartmentId",
});
