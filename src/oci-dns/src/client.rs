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

//! Contains the OCI DNS client and related types.

use crate::builder::{
    CreateSteeringPolicy, CreateSteeringPolicyAttachment, CreateZone, DeleteDomainRecords,
    DeleteRrSet, DeleteSteeringPolicy, DeleteSteeringPolicyAttachment, DeleteZone,
    GetDomainRecords, GetRrSet, GetSteeringPolicy, GetSteeringPolicyAttachment, GetZone,
    GetZoneRecords, ListSteeringPolicies, ListSteeringPolicyAttachments, ListZones,
    PatchDomainRecords, PatchRrSet, PatchZoneRecords, UpdateDomainRecords, UpdateRrSet,
    UpdateSteeringPolicy, UpdateSteeringPolicyAttachment, UpdateZone, UpdateZoneRecords,
};
use crate::model::{
    CreateSteeringPolicyAttachmentDetails, CreateSteeringPolicyDetails, CreateZoneDetails,
    RecordDetails, RecordOperation, UpdateSteeringPolicyAttachmentDetails,
    UpdateSteeringPolicyDetails, UpdateZoneDetails,
};
use crate::transport::Dns;
use std::sync::Arc;

/// Implements a client for the OCI DNS API.
///
/// # Example
/// ```
/// # tokio_test::block_on(async {
/// # use cloudkit_oci_dns::client::Client;
/// # use gax::credentials::AnonymousCredentials;
/// let client = Client::builder()
///     .with_endpoint("https://dns.us-ashburn-1.oraclecloud.com")
///     .with_credentials(AnonymousCredentials::new())
///     .build()
///     .await?;
/// // use `client` to make requests to OCI DNS.
/// # anyhow::Ok(()) });
/// ```
///
/// # Configuration
///
/// Without credentials the client loads the profile named by
/// `OCI_CLI_PROFILE` (or `DEFAULT`) from the OCI configuration file, and
/// signs each request with its API key. See
/// [signer::Builder::from_default_config][crate::signer::Builder::from_default_config].
///
/// Without an endpoint the client uses the region from the same profile.
/// Use [signer::endpoint][crate::signer::endpoint] to compute the endpoint
/// for a region.
///
/// Without a retry policy, the client retries the errors listed in
/// [OciRetry][crate::retry_policy::OciRetry] for up to 8 attempts or 10
/// minutes.
///
/// # Zones
///
/// Methods that take a zone accept either the zone name or its OCID.
///
/// # Pooling and Cloning
///
/// `Client` holds a connection pool internally, it is advised to create one
/// and then reuse it. Cloning a client is cheap, the clones share the pool.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<Dns>,
}

impl Client {
    /// Returns a builder for [Client].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new(client_builder::Factory)
    }

    pub(crate) async fn new(
        config: gax::client_builder::ClientConfig,
        endpoint: String,
    ) -> gax::client_builder::Result<Self> {
        let inner = Dns::new(config, &endpoint).await?;
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Lists the zones in a compartment.
    pub fn list_zones<C: Into<String>>(&self, compartment_id: C) -> ListZones {
        ListZones::new(self.inner.clone(), compartment_id.into())
    }

    /// Creates a zone.
    ///
    /// Secondary zones need at least one
    /// [ExternalMaster][crate::model::ExternalMaster].
    pub fn create_zone(&self, details: CreateZoneDetails) -> CreateZone {
        CreateZone::new(self.inner.clone(), details)
    }

    pub fn get_zone<Z: Into<String>>(&self, zone: Z) -> GetZone {
        GetZone::new(self.inner.clone(), zone.into())
    }

    /// Updates the zone masters, downstreams, and tags.
    pub fn update_zone<Z: Into<String>>(&self, zone: Z, details: UpdateZoneDetails) -> UpdateZone {
        UpdateZone::new(self.inner.clone(), zone.into(), details)
    }

    /// Deletes a zone and all its records.
    pub fn delete_zone<Z: Into<String>>(&self, zone: Z) -> DeleteZone {
        DeleteZone::new(self.inner.clone(), zone.into())
    }

    /// Lists all the records in a zone.
    pub fn get_zone_records<Z: Into<String>>(&self, zone: Z) -> GetZoneRecords {
        GetZoneRecords::new(self.inner.clone(), zone.into())
    }

    /// Applies a list of operations to the records in a zone.
    ///
    /// The service applies all the operations, or none of them.
    pub fn patch_zone_records<Z, I>(&self, zone: Z, items: I) -> PatchZoneRecords
    where
        Z: Into<String>,
        I: IntoIterator<Item = RecordOperation>,
    {
        PatchZoneRecords::new(self.inner.clone(), zone.into(), items.into_iter().collect())
    }

    /// Replaces all the records in a zone.
    ///
    /// The `SOA` and `NS` records at the apex cannot be removed, they are
    /// kept even if missing from `items`.
    pub fn update_zone_records<Z, I>(&self, zone: Z, items: I) -> UpdateZoneRecords
    where
        Z: Into<String>,
        I: IntoIterator<Item = RecordDetails>,
    {
        UpdateZoneRecords::new(self.inner.clone(), zone.into(), items.into_iter().collect())
    }

    /// Lists the records for a domain in a zone.
    pub fn get_domain_records<Z, D>(&self, zone: Z, domain: D) -> GetDomainRecords
    where
        Z: Into<String>,
        D: Into<String>,
    {
        GetDomainRecords::new(self.inner.clone(), zone.into(), domain.into())
    }

    /// Applies a list of operations to the records of a domain.
    pub fn patch_domain_records<Z, D, I>(&self, zone: Z, domain: D, items: I) -> PatchDomainRecords
    where
        Z: Into<String>,
        D: Into<String>,
        I: IntoIterator<Item = RecordOperation>,
    {
        PatchDomainRecords::new(
            self.inner.clone(),
            zone.into(),
            domain.into(),
            items.into_iter().collect(),
        )
    }

    /// Replaces the records of a domain.
    pub fn update_domain_records<Z, D, I>(
        &self,
        zone: Z,
        domain: D,
        items: I,
    ) -> UpdateDomainRecords
    where
        Z: Into<String>,
        D: Into<String>,
        I: IntoIterator<Item = RecordDetails>,
    {
        UpdateDomainRecords::new(
            self.inner.clone(),
            zone.into(),
            domain.into(),
            items.into_iter().collect(),
        )
    }

    /// Deletes all the records of a domain.
    pub fn delete_domain_records<Z, D>(&self, zone: Z, domain: D) -> DeleteDomainRecords
    where
        Z: Into<String>,
        D: Into<String>,
    {
        DeleteDomainRecords::new(self.inner.clone(), zone.into(), domain.into())
    }

    /// Gets the records of one type for a domain.
    ///
    /// ```
    /// # use cloudkit_oci_dns::client::Client;
    /// async fn sample(client: &Client) -> gax::Result<()> {
    ///     let rrset = client.get_rr_set("example.com", "www.example.com", "A").send().await?;
    ///     for record in &rrset.body().items {
    ///         println!("{} ttl={}", record.rdata, record.ttl);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn get_rr_set<Z, D, T>(&self, zone: Z, domain: D, rtype: T) -> GetRrSet
    where
        Z: Into<String>,
        D: Into<String>,
        T: Into<String>,
    {
        GetRrSet::new(self.inner.clone(), zone.into(), domain.into(), rtype.into())
    }

    /// Applies a list of operations to one RRSet.
    pub fn patch_rr_set<Z, D, T, I>(&self, zone: Z, domain: D, rtype: T, items: I) -> PatchRrSet
    where
        Z: Into<String>,
        D: Into<String>,
        T: Into<String>,
        I: IntoIterator<Item = RecordOperation>,
    {
        PatchRrSet::new(
            self.inner.clone(),
            zone.into(),
            domain.into(),
            rtype.into(),
            items.into_iter().collect(),
        )
    }

    /// Replaces the records in one RRSet.
    pub fn update_rr_set<Z, D, T, I>(&self, zone: Z, domain: D, rtype: T, items: I) -> UpdateRrSet
    where
        Z: Into<String>,
        D: Into<String>,
        T: Into<String>,
        I: IntoIterator<Item = RecordDetails>,
    {
        UpdateRrSet::new(
            self.inner.clone(),
            zone.into(),
            domain.into(),
            rtype.into(),
            items.into_iter().collect(),
        )
    }

    pub fn delete_rr_set<Z, D, T>(&self, zone: Z, domain: D, rtype: T) -> DeleteRrSet
    where
        Z: Into<String>,
        D: Into<String>,
        T: Into<String>,
    {
        DeleteRrSet::new(self.inner.clone(), zone.into(), domain.into(), rtype.into())
    }

    /// Lists the steering policies in a compartment.
    pub fn list_steering_policies<C: Into<String>>(&self, compartment_id: C) -> ListSteeringPolicies {
        ListSteeringPolicies::new(self.inner.clone(), compartment_id.into())
    }

    pub fn create_steering_policy(&self, details: CreateSteeringPolicyDetails) -> CreateSteeringPolicy {
        CreateSteeringPolicy::new(self.inner.clone(), details)
    }

    pub fn get_steering_policy<I: Into<String>>(&self, id: I) -> GetSteeringPolicy {
        GetSteeringPolicy::new(self.inner.clone(), id.into())
    }

    /// Updates a steering policy, `answers` and `rules` replace the existing
    /// lists when set.
    pub fn update_steering_policy<I: Into<String>>(
        &self,
        id: I,
        details: UpdateSteeringPolicyDetails,
    ) -> UpdateSteeringPolicy {
        UpdateSteeringPolicy::new(self.inner.clone(), id.into(), details)
    }

    pub fn delete_steering_policy<I: Into<String>>(&self, id: I) -> DeleteSteeringPolicy {
        DeleteSteeringPolicy::new(self.inner.clone(), id.into())
    }

    /// Lists the steering policy attachments in a compartment.
    pub fn list_steering_policy_attachments<C: Into<String>>(
        &self,
        compartment_id: C,
    ) -> ListSteeringPolicyAttachments {
        ListSteeringPolicyAttachments::new(self.inner.clone(), compartment_id.into())
    }

    /// Attaches a steering policy to a domain.
    ///
    /// The service creates the records for the domain, they cannot be
    /// changed while the attachment exists.
    pub fn create_steering_policy_attachment(
        &self,
        details: CreateSteeringPolicyAttachmentDetails,
    ) -> CreateSteeringPolicyAttachment {
        CreateSteeringPolicyAttachment::new(self.inner.clone(), details)
    }

    pub fn get_steering_policy_attachment<I: Into<String>>(
        &self,
        id: I,
    ) -> GetSteeringPolicyAttachment {
        GetSteeringPolicyAttachment::new(self.inner.clone(), id.into())
    }

    /// Renames an attachment, the only field that can change.
    pub fn update_steering_policy_attachment<I: Into<String>>(
        &self,
        id: I,
        details: UpdateSteeringPolicyAttachmentDetails,
    ) -> UpdateSteeringPolicyAttachment {
        UpdateSteeringPolicyAttachment::new(self.inner.clone(), id.into(), details)
    }

    pub fn delete_steering_policy_attachment<I: Into<String>>(
        &self,
        id: I,
    ) -> DeleteSteeringPolicyAttachment {
        DeleteSteeringPolicyAttachment::new(self.inner.clone(), id.into())
    }
}

/// A builder for [Client].
///
/// ```
/// # tokio_test::block_on(async {
/// # use cloudkit_oci_dns::client::Client;
/// use cloudkit_oci_dns::signer;
/// let builder = Client::builder();
/// let client = builder
///     .with_endpoint(signer::endpoint("eu-frankfurt-1"))
///     .with_credentials(gax::credentials::AnonymousCredentials::new())
///     .build()
///     .await?;
/// # anyhow::Ok(()) });
/// ```
pub type ClientBuilder = gax::client_builder::ClientBuilder<client_builder::Factory>;

pub(crate) mod client_builder {
    use super::Client;
    use crate::retry_policy::oci_default;
    use crate::signer;
    use gax::client_builder::{ClientConfig, Error, Result};
    use std::sync::Arc;

    #[derive(Clone, Debug)]
    pub struct Factory;

    impl gax::client_builder::ClientFactory for Factory {
        type Client = Client;
        async fn build(self, mut config: ClientConfig) -> Result<Self::Client> {
            // The profile is only needed when the credentials or the endpoint
            // are missing.
            let profile = match (&config.cred, &config.endpoint) {
                (Some(_), Some(_)) => None,
                _ => Some(signer::Builder::from_default_config().map_err(Error::cred)?),
            };
            let endpoint = match config.endpoint.clone() {
                Some(e) => e,
                None => profile
                    .as_ref()
                    .and_then(signer::Builder::endpoint)
                    .ok_or_else(|| Error::cred(NoRegion))?,
            };
            if config.cred.is_none() {
                if let Some(p) = profile {
                    config.cred = Some(p.build().map_err(Error::cred)?);
                }
            }
            if config.retry_policy.is_none() {
                config.retry_policy = Some(Arc::new(oci_default()));
            }
            tracing::debug!(endpoint = %endpoint, "creating OCI DNS client");
            Client::new(config, endpoint).await
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("no endpoint configured and the OCI profile has no region")]
    struct NoRegion;
}
