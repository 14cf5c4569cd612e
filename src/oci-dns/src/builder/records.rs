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
    Page, PatchRecordsDetails, Record, RecordCollection, RecordDetails, RecordOperation, RrSet,
    Scope, SortOrder, UpdateRecordsDetails,
};
use crate::transport::{Conditions, Dns, Query, path};
use gax::options::RequestOptions;
use gax::response::Response;
use reqwest::Method;
use std::sync::Arc;

request_builder!(
    GetZoneRecords,
    PatchZoneRecords,
    UpdateZoneRecords,
    GetDomainRecords,
    PatchDomainRecords,
    UpdateDomainRecords,
    DeleteDomainRecords,
    GetRrSet,
    PatchRrSet,
    UpdateRrSet,
    DeleteRrSet,
);
if_match!(
    PatchZoneRecords,
    UpdateZoneRecords,
    PatchDomainRecords,
    UpdateDomainRecords,
    DeleteDomainRecords,
    PatchRrSet,
    UpdateRrSet,
    DeleteRrSet,
);
if_none_match!(GetZoneRecords, GetDomainRecords, GetRrSet);
paginated!(GetZoneRecords => Record, GetDomainRecords => Record);

pub(crate) fn zone_path(zone: &str) -> String {
    path(&["zones", zone, "records"])
}

pub(crate) fn domain_path(zone: &str, domain: &str) -> String {
    path(&["zones", zone, "records", domain])
}

pub(crate) fn rrset_path(zone: &str, domain: &str, rtype: &str) -> String {
    path(&["zones", zone, "records", domain, rtype])
}

async fn get_records(
    inner: &Dns,
    path: String,
    query: &Query,
    conditions: &Conditions,
    options: RequestOptions,
) -> Result<Page<Record>> {
    inner
        .get::<RecordCollection>(path, query, conditions, options)
        .await
        .map(|r| Page::from_response(r, |c| c.items))
}

async fn patch_records(
    inner: &Dns,
    path: String,
    query: &Query,
    items: Vec<RecordOperation>,
    conditions: &Conditions,
    options: RequestOptions,
) -> Result<Response<RecordCollection>> {
    let body = PatchRecordsDetails { items };
    inner
        .mutate(Method::PATCH, path, query, Some(body), conditions, options)
        .await
}

async fn update_records(
    inner: &Dns,
    path: String,
    query: &Query,
    items: Vec<RecordDetails>,
    conditions: &Conditions,
    options: RequestOptions,
) -> Result<Response<RecordCollection>> {
    let body = UpdateRecordsDetails { items };
    inner
        .mutate(Method::PUT, path, query, Some(body), conditions, options)
        .await
}

/// The request builder for [Client::get_zone_records][crate::client::Client::get_zone_records] calls.
///
/// # Example
/// ```
/// # use cloudkit_oci_dns::client::Client;
/// async fn sample(client: &Client) -> gax::Result<()> {
///     let mut records = client
///         .get_zone_records("example.com")
///         .set_rtype("A")
///         .by_item();
///     while let Some(record) = records.next().await {
///         let record = record?;
///         println!("{} {} {}", record.domain, record.rtype, record.rdata);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct GetZoneRecords {
    inner: Arc<Dns>,
    zone: String,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl GetZoneRecords {
    pub(crate) fn new(inner: Arc<Dns>, zone: String) -> Self {
        Self {
            inner,
            zone,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request, returning a single page.
    pub async fn send(self) -> Result<Page<Record>> {
        get_records(
            &self.inner,
            zone_path(&self.zone),
            &self.query,
            &self.conditions,
            self.options,
        )
        .await
    }
}

query_setters!(GetZoneRecords {
    /// Only list records for this exact domain.
    set_domain: string => "domain",
    set_domain_contains: string => "domainContains",
    set_rtype: string => "rtype",
    /// Read the records as of this zone version.
    set_zone_version: string => "zoneVersion",
    /// `domain`, `rtype` or `ttl`.
    set_sort_by: string => "sortBy",
    set_sort_order: value<SortOrder> => "sortOrder",
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::patch_zone_records][crate::client::Client::patch_zone_records] calls.
///
/// # Example
/// ```
/// # use cloudkit_oci_dns::client::Client;
/// use cloudkit_oci_dns::model::{RecordDetails, RecordOperation};
/// async fn sample(client: &Client) -> gax::Result<()> {
///     let record = RecordDetails::new("www.example.com", "A", "192.0.2.1", 300);
///     let response = client
///         .patch_zone_records("example.com", [
///             RecordOperation::prohibit(record.clone()),
///             RecordOperation::add(record),
///         ])
///         .send()
///         .await?;
///     println!("etag={:?} records={:?}", response.etag(), response.body().items);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct PatchZoneRecords {
    inner: Arc<Dns>,
    zone: String,
    items: Vec<RecordOperation>,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl PatchZoneRecords {
    pub(crate) fn new(inner: Arc<Dns>, zone: String, items: Vec<RecordOperation>) -> Self {
        Self {
            inner,
            zone,
            items,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<RecordCollection>> {
        patch_records(
            &self.inner,
            zone_path(&self.zone),
            &self.query,
            self.items,
            &self.conditions,
            self.options,
        )
        .await
    }
}

query_setters!(PatchZoneRecords {
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::update_zone_records][crate::client::Client::update_zone_records] calls.
///
/// The records replace all the records in the zone, except the protected
/// records such as `SOA` and `NS`.
#[derive(Clone, Debug)]
pub struct UpdateZoneRecords {
    inner: Arc<Dns>,
    zone: String,
    items: Vec<RecordDetails>,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl UpdateZoneRecords {
    pub(crate) fn new(inner: Arc<Dns>, zone: String, items: Vec<RecordDetails>) -> Self {
        Self {
            inner,
            zone,
            items,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<RecordCollection>> {
        update_records(
            &self.inner,
            zone_path(&self.zone),
            &self.query,
            self.items,
            &self.conditions,
            self.options,
        )
        .await
    }
}

query_setters!(UpdateZoneRecords {
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::get_domain_records][crate::client::Client::get_domain_records] calls.
#[derive(Clone, Debug)]
pub struct GetDomainRecords {
    inner: Arc<Dns>,
    zone: String,
    domain: String,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl GetDomainRecords {
    pub(crate) fn new(inner: Arc<Dns>, zone: String, domain: String) -> Self {
        Self {
            inner,
            zone,
            domain,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request, returning a single page.
    pub async fn send(self) -> Result<Page<Record>> {
        get_records(
            &self.inner,
            domain_path(&self.zone, &self.domain),
            &self.query,
            &self.conditions,
            self.options,
        )
        .await
    }
}

query_setters!(GetDomainRecords {
    set_rtype: string => "rtype",
    set_zone_version: string => "zoneVersion",
    set_sort_by: string => "sortBy",
    set_sort_order: value<SortOrder> => "sortOrder",
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::patch_domain_records][crate::client::Client::patch_domain_records] calls.
#[derive(Clone, Debug)]
pub struct PatchDomainRecords {
    inner: Arc<Dns>,
    zone: String,
    domain: String,
    items: Vec<RecordOperation>,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl PatchDomainRecords {
    pub(crate) fn new(
        inner: Arc<Dns>,
        zone: String,
        domain: String,
        items: Vec<RecordOperation>,
    ) -> Self {
        Self {
            inner,
            zone,
            domain,
            items,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<RecordCollection>> {
        patch_records(
            &self.inner,
            domain_path(&self.zone, &self.domain),
            &self.query,
            self.items,
            &self.conditions,
            self.options,
        )
        .await
    }
}

query_setters!(PatchDomainRecords {
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::update_domain_records][crate::client::Client::update_domain_records] calls.
///
/// The records replace all the records of the domain.
#[derive(Clone, Debug)]
pub struct UpdateDomainRecords {
    inner: Arc<Dns>,
    zone: String,
    domain: String,
    items: Vec<RecordDetails>,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl UpdateDomainRecords {
    pub(crate) fn new(
        inner: Arc<Dns>,
        zone: String,
        domain: String,
        items: Vec<RecordDetails>,
    ) -> Self {
        Self {
            inner,
            zone,
            domain,
            items,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<RecordCollection>> {
        update_records(
            &self.inner,
            domain_path(&self.zone, &self.domain),
            &self.query,
            self.items,
            &self.conditions,
            self.options,
        )
        .await
    }
}

query_setters!(UpdateDomainRecords {
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::delete_domain_records][crate::client::Client::delete_domain_records] calls.
#[derive(Clone, Debug)]
pub struct DeleteDomainRecords {
    inner: Arc<Dns>,
    zone: String,
    domain: String,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl DeleteDomainRecords {
    pub(crate) fn new(inner: Arc<Dns>, zone: String, domain: String) -> Self {
        Self {
            inner,
            zone,
            domain,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<()>> {
        self.inner
            .delete(
                domain_path(&self.zone, &self.domain),
                &self.query,
                &self.conditions,
                self.options,
            )
            .await
    }
}

query_setters!(DeleteDomainRecords {
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::get_rr_set][crate::client::Client::get_rr_set] calls.
#[derive(Clone, Debug)]
pub struct GetRrSet {
    inner: Arc<Dns>,
    zone: String,
    domain: String,
    rtype: String,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl GetRrSet {
    pub(crate) fn new(inner: Arc<Dns>, zone: String, domain: String, rtype: String) -> Self {
        Self {
            inner,
            zone,
            domain,
            rtype,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<RrSet>> {
        self.inner
            .get(
                rrset_path(&self.zone, &self.domain, &self.rtype),
                &self.query,
                &self.conditions,
                self.options,
            )
            .await
    }
}

query_setters!(GetRrSet {
    set_zone_version: string => "zoneVersion",
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::patch_rr_set][crate::client::Client::patch_rr_set] calls.
#[derive(Clone, Debug)]
pub struct PatchRrSet {
    inner: Arc<Dns>,
    zone: String,
    domain: String,
    rtype: String,
    items: Vec<RecordOperation>,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl PatchRrSet {
    pub(crate) fn new(
        inner: Arc<Dns>,
        zone: String,
        domain: String,
        rtype: String,
        items: Vec<RecordOperation>,
    ) -> Self {
        Self {
            inner,
            zone,
            domain,
            rtype,
            items,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<RecordCollection>> {
        patch_records(
            &self.inner,
            rrset_path(&self.zone, &self.domain, &self.rtype),
            &self.query,
            self.items,
            &self.conditions,
            self.options,
        )
        .await
    }
}

query_setters!(PatchRrSet {
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::update_rr_set][crate::client::Client::update_rr_set] calls.
///
/// The records replace the whole RRSet.
#[derive(Clone, Debug)]
pub struct UpdateRrSet {
    inner: Arc<Dns>,
    zone: String,
    domain: String,
    rtype: String,
    items: Vec<RecordDetails>,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl UpdateRrSet {
    pub(crate) fn new(
        inner: Arc<Dns>,
        zone: String,
        domain: String,
        rtype: String,
        items: Vec<RecordDetails>,
    ) -> Self {
        Self {
            inner,
            zone,
            domain,
            rtype,
            items,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<RecordCollection>> {
        update_records(
            &self.inner,
            rrset_path(&self.zone, &self.domain, &self.rtype),
            &self.query,
            self.items,
            &self.conditions,
            self.options,
        )
        .await
    }
}

query_setters!(UpdateRrSet {
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

/// The request builder for [Client::delete_rr_set][crate::client::Client::delete_rr_set] calls.
#[derive(Clone, Debug)]
pub struct DeleteRrSet {
    inner: Arc<Dns>,
    zone: String,
    domain: String,
    rtype: String,
    query: Query,
    conditions: Conditions,
    options: RequestOptions,
}

impl DeleteRrSet {
    pub(crate) fn new(inner: Arc<Dns>, zone: String, domain: String, rtype: String) -> Self {
        Self {
            inner,
            zone,
            domain,
            rtype,
            query: Query::new(),
            conditions: Conditions::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sends the request.
    pub async fn send(self) -> Result<Response<()>> {
        self.inner
            .delete(
                rrset_path(&self.zone, &self.domain, &self.rtype),
                &self.query,
                &self.conditions,
                self.options,
            )
            .await
    }
}

query_setters!(DeleteRrSet {
    set_compartment_id: string => "compartmentId",
    set_scope: value<Scope> => "scope",
    set_view_id: string => "viewId",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        assert_eq!(zone_path("example.com"), "/20180115/zones/example.com/records");
        assert_eq!(
            domain_path("example.com", "www.example.com"),
            "/20180115/zones/example.com/records/www.example.com"
        );
        assert_eq!(
            rrset_path("example.com", "www.example.com", "AAAA"),
            "/20180115/zones/example.com/records/www.example.com/AAAA"
        );
    }
}
