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

//! The OCI DNS (`20180115`) resources used by this client.

use gax::api_enum;
use gax::response::Response;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;

/// Free-form tags, `{"Department": "Finance"}`.
pub type FreeformTags = HashMap<String, String>;

/// Defined tags, keyed by namespace and then by tag name.
pub type DefinedTags = HashMap<String, HashMap<String, serde_json::Value>>;

api_enum! {
    /// Whether the zone is authoritative or mirrors a master server.
    ZoneType {
        Primary => "PRIMARY",
        Secondary => "SECONDARY",
    }
}

api_enum! {
    /// Whether the zone is visible on the internet or only inside a VCN.
    Scope {
        Global => "GLOBAL",
        Private => "PRIVATE",
    }
}

api_enum! {
    /// The lifecycle state of a zone.
    ZoneLifecycleState {
        Active => "ACTIVE",
        Creating => "CREATING",
        Deleted => "DELETED",
        Deleting => "DELETING",
        Failed => "FAILED",
        Updating => "UPDATING",
    }
}

api_enum! {
    /// The lifecycle state of a steering policy.
    SteeringPolicyLifecycleState {
        Active => "ACTIVE",
        Creating => "CREATING",
        Deleted => "DELETED",
        Deleting => "DELETING",
    }
}

api_enum! {
    /// The lifecycle state of a steering policy attachment.
    AttachmentLifecycleState {
        Creating => "CREATING",
        Active => "ACTIVE",
        Deleting => "DELETING",
    }
}

api_enum! {
    /// What a [RecordOperation] does with its record.
    Operation {
        /// Adds the record, a no-op if it exists.
        Add => "ADD",
        /// Removes the record, matching on the record hash if set.
        Remove => "REMOVE",
        /// Fails the whole patch unless the record exists.
        Require => "REQUIRE",
        /// Fails the whole patch if the record exists.
        Prohibit => "PROHIBIT",
    }
}

api_enum! {
    /// The template a steering policy was built from.
    SteeringTemplate {
        Failover => "FAILOVER",
        LoadBalance => "LOAD_BALANCE",
        RouteByGeo => "ROUTE_BY_GEO",
        RouteByAsn => "ROUTE_BY_ASN",
        RouteByIpPrefix => "ROUTE_BY_IP_PREFIX",
        Custom => "CUSTOM",
    }
}

api_enum! {
    /// The kind of a steering policy rule.
    RuleType {
        Filter => "FILTER",
        Health => "HEALTH",
        Weighted => "WEIGHTED",
        Priority => "PRIORITY",
        Limit => "LIMIT",
    }
}

api_enum! {
    /// The sort direction of `list` calls.
    SortOrder {
        Asc => "ASC",
        Desc => "DESC",
    }
}

/// A master server for a secondary zone.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalMaster {
    pub address: String,
    pub port: Option<i32>,
    pub tsig_key_id: Option<String>,
}

impl ExternalMaster {
    pub fn new<T: Into<String>>(address: T) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }
}

/// A server receiving zone transfers from a primary zone.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalDownstream {
    pub address: String,
    pub port: Option<i32>,
    pub tsig_key_id: Option<String>,
}

/// An authoritative name server of a zone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Nameserver {
    pub hostname: String,
}

/// A DNS zone.
///
/// `list_zones()` returns the summary of each zone, without the external
/// masters and downstreams.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Zone {
    pub name: Option<String>,
    /// The OCID of the zone.
    pub id: Option<String>,
    pub zone_type: Option<ZoneType>,
    pub compartment_id: Option<String>,
    pub scope: Option<Scope>,
    pub view_id: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub freeform_tags: FreeformTags,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub defined_tags: DefinedTags,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_masters: Vec<ExternalMaster>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_downstreams: Vec<ExternalDownstream>,
    /// The canonical URL of the zone.
    #[serde(rename = "self")]
    pub self_uri: Option<String>,
    pub time_created: Option<String>,
    /// The version of the zone, changes with each record update.
    pub version: Option<String>,
    /// The SOA serial number.
    pub serial: Option<i64>,
    pub lifecycle_state: Option<ZoneLifecycleState>,
    /// Protected zones are managed by OCI and cannot be changed.
    pub is_protected: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<Nameserver>,
}

/// The request body of `create_zone()`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateZoneDetails {
    pub name: String,
    pub compartment_id: String,
    pub zone_type: Option<ZoneType>,
    pub scope: Option<Scope>,
    /// Required for private zones.
    pub view_id: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub freeform_tags: FreeformTags,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub defined_tags: DefinedTags,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_masters: Vec<ExternalMaster>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_downstreams: Vec<ExternalDownstream>,
}

impl CreateZoneDetails {
    /// A primary zone, the most common kind.
    pub fn new<N, C>(name: N, compartment_id: C) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            compartment_id: compartment_id.into(),
            zone_type: Some(ZoneType::Primary),
            ..Default::default()
        }
    }

    pub fn set_zone_type(mut self, v: ZoneType) -> Self {
        self.zone_type = Some(v);
        self
    }

    pub fn set_scope(mut self, v: Scope) -> Self {
        self.scope = Some(v);
        self
    }

    pub fn set_view_id<T: Into<String>>(mut self, v: T) -> Self {
        self.view_id = Some(v.into());
        self
    }

    pub fn set_external_masters<T: IntoIterator<Item = ExternalMaster>>(mut self, v: T) -> Self {
        self.external_masters = v.into_iter().collect();
        self
    }

    pub fn set_freeform_tags<T, K, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.freeform_tags = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }
}

/// The request body of `update_zone()`.
///
/// Fields left empty are not changed.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateZoneDetails {
    pub freeform_tags: Option<FreeformTags>,
    pub defined_tags: Option<DefinedTags>,
    pub external_masters: Option<Vec<ExternalMaster>>,
    pub external_downstreams: Option<Vec<ExternalDownstream>>,
}

/// A DNS resource record.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Record {
    /// The fully qualified domain name, `www.example.com`.
    pub domain: String,
    /// The record type, `A`, `CNAME`, `TXT`, ...
    pub rtype: String,
    /// The record data, for example `192.0.2.1` for an `A` record.
    pub rdata: String,
    pub ttl: i32,
    /// A hash of the record, unique within the zone.
    pub record_hash: Option<String>,
    pub is_protected: Option<bool>,
    /// The version of the RRSet this record belongs to.
    pub rrset_version: Option<String>,
}

/// A record to write with an `update_*_records()` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordDetails {
    pub domain: String,
    pub rtype: String,
    pub rdata: String,
    pub ttl: i32,
}

impl RecordDetails {
    /// Creates a record.
    ///
    /// ```
    /// # use cloudkit_oci_dns::model::RecordDetails;
    /// let record = RecordDetails::new("www.example.com", "A", "192.0.2.1", 300);
    /// assert_eq!(record.rtype, "A");
    /// ```
    pub fn new<D, T, R>(domain: D, rtype: T, rdata: R, ttl: i32) -> Self
    where
        D: Into<String>,
        T: Into<String>,
        R: Into<String>,
    {
        Self {
            domain: domain.into(),
            rtype: rtype.into(),
            rdata: rdata.into(),
            ttl,
        }
    }
}

impl From<Record> for RecordDetails {
    fn from(value: Record) -> Self {
        Self {
            domain: value.domain,
            rtype: value.rtype,
            rdata: value.rdata,
            ttl: value.ttl,
        }
    }
}

/// One change in a `patch_*_records()` call.
///
/// The operations in a patch are applied atomically, any failed `REQUIRE` or
/// `PROHIBIT` rejects the whole patch.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordOperation {
    pub domain: Option<String>,
    pub rtype: Option<String>,
    pub rdata: Option<String>,
    pub ttl: Option<i32>,
    pub record_hash: Option<String>,
    pub is_protected: Option<bool>,
    pub rrset_version: Option<String>,
    pub operation: Option<Operation>,
}

impl RecordOperation {
    /// Adds a record.
    pub fn add(record: RecordDetails) -> Self {
        Self::with_record(Operation::Add, record)
    }

    /// Removes a record matching the domain, type and data.
    pub fn remove(record: RecordDetails) -> Self {
        Self::with_record(Operation::Remove, record)
    }

    /// Requires the record to exist.
    pub fn require(record: RecordDetails) -> Self {
        Self::with_record(Operation::Require, record)
    }

    /// Requires the record to not exist.
    pub fn prohibit(record: RecordDetails) -> Self {
        Self::with_record(Operation::Prohibit, record)
    }

    /// Removes the record with this hash.
    pub fn remove_hash<T: Into<String>>(record_hash: T) -> Self {
        Self {
            record_hash: Some(record_hash.into()),
            operation: Some(Operation::Remove),
            ..Default::default()
        }
    }

    fn with_record(operation: Operation, record: RecordDetails) -> Self {
        Self {
            domain: Some(record.domain),
            rtype: Some(record.rtype),
            rdata: Some(record.rdata),
            ttl: Some(record.ttl),
            operation: Some(operation),
            ..Default::default()
        }
    }
}

/// The records returned by the `records` calls.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordCollection {
    pub items: Vec<Record>,
}

/// All the records with the same domain and type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RrSet {
    pub items: Vec<Record>,
}

/// The request body of the `patch_*_records()` calls.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatchRecordsDetails {
    pub items: Vec<RecordOperation>,
}

/// The request body of the `update_*_records()` calls.
///
/// The records replace all the existing records in scope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateRecordsDetails {
    pub items: Vec<RecordDetails>,
}

/// A candidate response of a steering policy.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SteeringPolicyAnswer {
    pub name: String,
    pub rtype: String,
    pub rdata: String,
    /// Answers can be grouped in pools, rules can refer to a pool.
    pub pool: Option<String>,
    pub is_disabled: Option<bool>,
}

impl SteeringPolicyAnswer {
    pub fn new<N, T, R>(name: N, rtype: T, rdata: R) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        R: Into<String>,
    {
        Self {
            name: name.into(),
            rtype: rtype.into(),
            rdata: rdata.into(),
            ..Default::default()
        }
    }

    pub fn set_pool<T: Into<String>>(mut self, v: T) -> Self {
        self.pool = Some(v.into());
        self
    }
}

/// Per-answer data in a rule, such as a weight or a priority.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnswerData {
    /// An expression selecting answers, `answer.pool == 'primary'`.
    pub answer_condition: Option<String>,
    /// Used by `FILTER` rules.
    pub should_keep: Option<bool>,
    /// The weight or priority, used by `WEIGHTED` and `PRIORITY` rules.
    pub value: Option<i32>,
}

/// A case of a rule, applied when its condition matches the query.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleCase {
    /// For example `query.client.geoKey in (1, 2)`.
    pub case_condition: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub answer_data: Vec<AnswerData>,
    /// Used by `LIMIT` rules.
    pub count: Option<i32>,
}

/// A step in the processing of a steering policy.
///
/// The service has one shape per rule type, this type holds the union of
/// their fields.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SteeringPolicyRule {
    pub rule_type: Option<RuleType>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cases: Vec<RuleCase>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_answer_data: Vec<AnswerData>,
    /// Used by `LIMIT` rules.
    pub default_count: Option<i32>,
}

impl SteeringPolicyRule {
    pub fn new(rule_type: RuleType) -> Self {
        Self {
            rule_type: Some(rule_type),
            ..Default::default()
        }
    }

    pub fn set_default_answer_data<T: IntoIterator<Item = AnswerData>>(mut self, v: T) -> Self {
        self.default_answer_data = v.into_iter().collect();
        self
    }

    pub fn set_default_count(mut self, v: i32) -> Self {
        self.default_count = Some(v);
        self
    }
}

/// A traffic management policy: rules that choose the answers to a query.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SteeringPolicy {
    /// The OCID of the policy.
    pub id: Option<String>,
    pub compartment_id: Option<String>,
    pub display_name: Option<String>,
    /// The TTL of the answers, in seconds.
    pub ttl: Option<i32>,
    pub health_check_monitor_id: Option<String>,
    pub template: Option<SteeringTemplate>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub freeform_tags: FreeformTags,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub defined_tags: DefinedTags,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<SteeringPolicyAnswer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<SteeringPolicyRule>,
    #[serde(rename = "self")]
    pub self_uri: Option<String>,
    pub time_created: Option<String>,
    pub lifecycle_state: Option<SteeringPolicyLifecycleState>,
}

/// The request body of `create_steering_policy()`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSteeringPolicyDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub template: Option<SteeringTemplate>,
    pub ttl: Option<i32>,
    pub health_check_monitor_id: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub freeform_tags: FreeformTags,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub defined_tags: DefinedTags,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<SteeringPolicyAnswer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<SteeringPolicyRule>,
}

impl CreateSteeringPolicyDetails {
    pub fn new<C, N>(compartment_id: C, display_name: N, template: SteeringTemplate) -> Self
    where
        C: Into<String>,
        N: Into<String>,
    {
        Self {
            compartment_id: compartment_id.into(),
            display_name: display_name.into(),
            template: Some(template),
            ..Default::default()
        }
    }

    pub fn set_ttl(mut self, v: i32) -> Self {
        self.ttl = Some(v);
        self
    }

    pub fn set_health_check_monitor_id<T: Into<String>>(mut self, v: T) -> Self {
        self.health_check_monitor_id = Some(v.into());
        self
    }

    pub fn set_answers<T: IntoIterator<Item = SteeringPolicyAnswer>>(mut self, v: T) -> Self {
        self.answers = v.into_iter().collect();
        self
    }

    pub fn set_rules<T: IntoIterator<Item = SteeringPolicyRule>>(mut self, v: T) -> Self {
        self.rules = v.into_iter().collect();
        self
    }
}

/// The request body of `update_steering_policy()`.
///
/// Fields left empty are not changed. `answers` and `rules`, when set,
/// replace the existing lists.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateSteeringPolicyDetails {
    pub display_name: Option<String>,
    pub template: Option<SteeringTemplate>,
    pub ttl: Option<i32>,
    pub health_check_monitor_id: Option<String>,
    pub freeform_tags: Option<FreeformTags>,
    pub defined_tags: Option<DefinedTags>,
    pub answers: Option<Vec<SteeringPolicyAnswer>>,
    pub rules: Option<Vec<SteeringPolicyRule>>,
}

/// Binds a steering policy to a domain in a zone.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SteeringPolicyAttachment {
    pub id: Option<String>,
    pub steering_policy_id: Option<String>,
    pub zone_id: Option<String>,
    pub domain_name: Option<String>,
    pub display_name: Option<String>,
    /// The record types served by the policy for this domain.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rtypes: Vec<String>,
    pub compartment_id: Option<String>,
    #[serde(rename = "self")]
    pub self_uri: Option<String>,
    pub time_created: Option<String>,
    pub lifecycle_state: Option<AttachmentLifecycleState>,
}

/// The request body of `create_steering_policy_attachment()`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSteeringPolicyAttachmentDetails {
    pub steering_policy_id: String,
    pub zone_id: String,
    pub domain_name: String,
    pub display_name: Option<String>,
}

impl CreateSteeringPolicyAttachmentDetails {
    pub fn new<P, Z, D>(steering_policy_id: P, zone_id: Z, domain_name: D) -> Self
    where
        P: Into<String>,
        Z: Into<String>,
        D: Into<String>,
    {
        Self {
            steering_policy_id: steering_policy_id.into(),
            zone_id: zone_id.into(),
            domain_name: domain_name.into(),
            display_name: None,
        }
    }

    pub fn set_display_name<T: Into<String>>(mut self, v: T) -> Self {
        self.display_name = Some(v.into());
        self
    }
}

/// The request body of `update_steering_policy_attachment()`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateSteeringPolicyAttachmentDetails {
    pub display_name: Option<String>,
}

const OPC_TOTAL_ITEMS: &str = "opc-total-items";

/// A page of results from a `list` call.
///
/// OCI returns the token for the next page in the `opc-next-page` header,
/// the page keeps it next to the items.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The value for the `page` parameter of the next call, `None` on the
    /// last page.
    pub next_page: Option<String>,
    /// The total number of items, only returned by the records calls.
    pub total_items: Option<i64>,
    pub opc_request_id: Option<String>,
}

impl<T> Page<T> {
    pub(crate) fn from_response<B, F>(response: Response<B>, items: F) -> Self
    where
        F: FnOnce(B) -> Vec<T>,
    {
        let next_page = response
            .opc_next_page()
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        let opc_request_id = response.opc_request_id().map(str::to_string);
        let total_items = response
            .headers()
            .get(OPC_TOTAL_ITEMS)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        Self {
            items: items(response.into_body()),
            next_page,
            total_items,
            opc_request_id,
        }
    }
}

impl<T: Send> gax::paginator::PageableResponse for Page<T> {
    type PageItem = T;

    fn items(self) -> Vec<Self::PageItem> {
        self.items
    }

    fn next_page_token(&self) -> String {
        self.next_page.clone().unwrap_or_default()
    }
}
