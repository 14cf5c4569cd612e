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

//! Helpers to change IAM policies.
//!
//! A policy update is a read-modify-write cycle: read the policy with
//! `get_iam_policy()`, change the bindings, and write it back with
//! `set_iam_policy()`. The policy carries an etag, the service rejects the
//! write if the policy changed after it was read. [update_iam_policy] runs
//! this cycle, retrying with a fresh copy of the policy when the write
//! fails because of a concurrent change.
//!
//! # Example
//! ```
//! # use cloudkit_iam::client::Client;
//! use cloudkit_iam::policy::{UpdateConfig, update_iam_policy};
//! async fn sample(client: &Client) -> gax::Result<()> {
//!     let resource = "projects/-/serviceAccounts/sa@my-project.iam.gserviceaccount.com";
//!     let policy = update_iam_policy(
//!         client,
//!         resource,
//!         |policy| policy.add_member("roles/iam.serviceAccountUser", "user:alice@example.com"),
//!         UpdateConfig::default(),
//!     )
//!     .await?;
//!     println!("{policy:?}");
//!     Ok(())
//! }
//! ```

use crate::Result;
use crate::client::Client;
use crate::model::{Binding, Policy};
use gax::backoff_policy::BackoffPolicy;
use gax::error::Error;
use gax::exponential_backoff::ExponentialBackoffBuilder;
use std::sync::Arc;
use std::time::{Duration, Instant};

impl Policy {
    /// Grants `role` to `member`.
    ///
    /// Returns false if the member already had the role. Conditional
    /// bindings are left alone.
    pub fn add_member(&mut self, role: &str, member: &str) -> bool {
        match self
            .bindings
            .iter_mut()
            .find(|b| b.role == role && b.condition.is_none())
        {
            Some(b) if b.members.iter().any(|m| m == member) => false,
            Some(b) => {
                b.members.push(member.to_string());
                true
            }
            None => {
                self.bindings.push(Binding::new(role).set_members([member]));
                true
            }
        }
    }

    /// Revokes `role` from `member`, in unconditional bindings.
    ///
    /// Bindings left without members are removed. Returns false if the
    /// member did not have the role.
    pub fn remove_member(&mut self, role: &str, member: &str) -> bool {
        let mut removed = false;
        for b in self
            .bindings
            .iter_mut()
            .filter(|b| b.role == role && b.condition.is_none())
        {
            let before = b.members.len();
            b.members.retain(|m| m != member);
            removed |= b.members.len() != before;
        }
        self.bindings
            .retain(|b| !(b.role == role && b.condition.is_none() && b.members.is_empty()));
        removed
    }

    /// Returns the members with `role`, in any binding.
    pub fn members(&self, role: &str) -> Vec<&str> {
        let mut members: Vec<&str> = self
            .bindings
            .iter()
            .filter(|b| b.role == role)
            .flat_map(|b| b.members.iter().map(String::as_str))
            .collect();
        members.sort_unstable();
        members.dedup();
        members
    }

    /// Returns true if `member` has `role` without conditions.
    pub fn has_member(&self, role: &str, member: &str) -> bool {
        self.bindings
            .iter()
            .filter(|b| b.role == role && b.condition.is_none())
            .any(|b| b.members.iter().any(|m| m == member))
    }

    /// Returns the roles granted to `member`.
    pub fn roles(&self, member: &str) -> Vec<&str> {
        let mut roles: Vec<&str> = self
            .bindings
            .iter()
            .filter(|b| b.members.iter().any(|m| m == member))
            .map(|b| b.role.as_str())
            .collect();
        roles.sort_unstable();
        roles.dedup();
        roles
    }
}

/// Configures [update_iam_policy].
#[derive(Clone, Debug)]
pub struct UpdateConfig {
    /// The maximum number of read-modify-write cycles.
    pub max_attempts: u32,
    /// The maximum time for all the cycles.
    pub max_duration: Duration,
    /// The delay between cycles.
    pub backoff_policy: Arc<dyn BackoffPolicy>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_maximum_delay(Duration::from_secs(10))
            .with_scaling(2.0)
            .clamp();
        Self {
            max_attempts: 10,
            max_duration: Duration::from_secs(60),
            backoff_policy: Arc::new(backoff),
        }
    }
}

/// Reads and writes IAM policies, [Client] is the only implementation
/// outside of tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub(crate) trait PolicyAccess {
    async fn get_iam_policy(&self, resource: &str) -> Result<Policy>;
    async fn set_iam_policy(&self, resource: &str, policy: Policy) -> Result<Policy>;
}

#[async_trait::async_trait]
impl PolicyAccess for Client {
    async fn get_iam_policy(&self, resource: &str) -> Result<Policy> {
        self.get_iam_policy(resource).send().await
    }

    async fn set_iam_policy(&self, resource: &str, policy: Policy) -> Result<Policy> {
        self.set_iam_policy(resource).set_policy(policy).send().await
    }
}

/// Updates the policy of `resource`, retrying on concurrent changes.
///
/// `updater` changes the policy in place, and returns false if no change is
/// needed. In that case the current policy is returned without writing it.
/// A write rejected with `ABORTED` (or HTTP 409) starts a new cycle, any
/// other error is returned immediately.
pub async fn update_iam_policy<F>(
    client: &Client,
    resource: &str,
    updater: F,
    config: UpdateConfig,
) -> Result<Policy>
where
    F: FnMut(&mut Policy) -> bool + Send,
{
    update_with(client, resource, updater, config).await
}

async fn update_with<C, F>(
    client: &C,
    resource: &str,
    mut updater: F,
    config: UpdateConfig,
) -> Result<Policy>
where
    C: PolicyAccess + Sync,
    F: FnMut(&mut Policy) -> bool + Send,
{
    let start = Instant::now();
    let mut attempt_count = 0_u32;
    loop {
        attempt_count += 1;
        let mut policy = client.get_iam_policy(resource).await?;
        if !updater(&mut policy) {
            return Ok(policy);
        }
        // Conditional bindings require version 3.
        if policy.bindings.iter().any(|b| b.condition.is_some()) {
            policy.version = Some(3);
        }
        let error = match client.set_iam_policy(resource, policy).await {
            Ok(p) => return Ok(p),
            Err(e) if is_concurrent_change(&e) => e,
            Err(e) => return Err(e),
        };
        let delay = config.backoff_policy.on_failure(start, attempt_count);
        if attempt_count >= config.max_attempts || start.elapsed() + delay > config.max_duration {
            return Err(Error::exhausted(error));
        }
        tracing::debug!(resource, attempt_count, ?delay, "policy changed concurrently, retrying");
        tokio::time::sleep(delay).await;
    }
}

fn is_concurrent_change(error: &Error) -> bool {
    error.http_status_code() == Some(409)
        || error
            .status()
            .is_some_and(|s| s.status.as_deref() == Some("ABORTED") || s.code == 409)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Expr;
    use gax::error::rpc::Status;
    use pretty_assertions::assert_eq;

    fn policy() -> Policy {
        Policy {
            version: Some(1),
            etag: Some("etag-1".into()),
            bindings: vec![
                Binding::new("roles/viewer").set_members(["user:a@example.com", "user:b@example.com"]),
                Binding::new("roles/editor").set_members(["user:a@example.com"]),
                Binding::new("roles/viewer")
                    .set_members(["user:c@example.com"])
                    .set_condition(Expr::new("request.time < timestamp('2030-01-01T00:00:00Z')")),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn add_member() {
        let mut p = policy();
        assert!(!p.add_member("roles/viewer", "user:a@example.com"));
        assert!(p.add_member("roles/viewer", "user:d@example.com"));
        assert!(p.add_member("roles/owner", "user:a@example.com"));
        assert_eq!(p.bindings[0].members.len(), 3);
        assert_eq!(p.bindings.last().map(|b| b.role.as_str()), Some("roles/owner"));
        // The conditional binding is unchanged.
        assert_eq!(p.bindings[2].members, vec!["user:c@example.com"]);
    }

    #[test]
    fn remove_member() {
        let mut p = policy();
        assert!(p.remove_member("roles/editor", "user:a@example.com"));
        assert!(p.bindings.iter().all(|b| b.role != "roles/editor"), "{p:?}");
        assert!(!p.remove_member("roles/editor", "user:a@example.com"));
        // Conditional bindings are not changed.
        assert!(!p.remove_member("roles/viewer", "user:c@example.com"));
    }

    #[test]
    fn remove_member_keeps_other_empty_bindings() {
        let mut p = policy();
        p.bindings.push(Binding::new("roles/owner"));
        p.bindings.push(
            Binding::new("roles/editor").set_condition(Expr::new("resource.name.startsWith('x')")),
        );
        assert!(p.remove_member("roles/editor", "user:a@example.com"));
        assert!(p.bindings.iter().any(|b| b.role == "roles/owner"), "{p:?}");
        assert!(
            p.bindings
                .iter()
                .any(|b| b.role == "roles/editor" && b.condition.is_some()),
            "{p:?}"
        );
        assert!(
            !p.bindings
                .iter()
                .any(|b| b.role == "roles/editor" && b.condition.is_none()),
            "{p:?}"
        );
    }

    #[test]
    fn members_and_roles() {
        let p = policy();
        assert_eq!(
            p.members("roles/viewer"),
            vec!["user:a@example.com", "user:b@example.com", "user:c@example.com"]
        );
        assert!(p.members("roles/owner").is_empty());
        assert!(p.has_member("roles/editor", "user:a@example.com"));
        assert!(!p.has_member("roles/viewer", "user:c@example.com"));
        assert_eq!(p.roles("user:a@example.com"), vec!["roles/editor", "roles/viewer"]);
    }

    fn aborted() -> Error {
        Error::service(
            Status::default()
                .set_code(409)
                .set_status("ABORTED")
                .set_message("concurrent policy changes"),
        )
    }

    fn test_config() -> UpdateConfig {
        UpdateConfig {
            max_attempts: 3,
            max_duration: Duration::from_secs(60),
            backoff_policy: Arc::new(
                ExponentialBackoffBuilder::new()
                    .with_initial_delay(Duration::from_millis(1))
                    .with_maximum_delay(Duration::from_millis(1))
                    .clamp(),
            ),
        }
    }

    #[tokio::test]
    async fn update_retries_on_conflict() -> anyhow::Result<()> {
        let mut mock = MockPolicyAccess::new();
        mock.expect_get_iam_policy()
            .times(2)
            .returning(|_| Ok(policy()));
        let mut seq = mockall::Sequence::new();
        mock.expect_set_iam_policy()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(aborted()));
        mock.expect_set_iam_policy()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, p| Ok(Policy { etag: Some("etag-2".into()), ..p }));

        let got = update_with(
            &mock,
            "projects/p",
            |p| p.add_member("roles/owner", "user:z@example.com"),
            test_config(),
        )
        .await?;
        assert_eq!(got.etag.as_deref(), Some("etag-2"));
        assert!(got.has_member("roles/owner", "user:z@example.com"), "{got:?}");
        Ok(())
    }

    #[tokio::test]
    async fn update_retries_on_http_conflict() -> anyhow::Result<()> {
        let mut mock = MockPolicyAccess::new();
        mock.expect_get_iam_policy()
            .times(2)
            .returning(|_| Ok(policy()));
        let mut seq = mockall::Sequence::new();
        mock.expect_set_iam_policy()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Err(Error::http(
                    409,
                    http::HeaderMap::new(),
                    bytes::Bytes::from_static(b"conflict"),
                ))
            });
        mock.expect_set_iam_policy()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, p| Ok(Policy { etag: Some("etag-2".into()), ..p }));

        let got = update_with(
            &mock,
            "projects/p",
            |p| p.add_member("roles/owner", "user:z@example.com"),
            test_config(),
        )
        .await?;
        assert_eq!(got.etag.as_deref(), Some("etag-2"));
        Ok(())
    }

    #[tokio::test]
    async fn update_no_change() -> anyhow::Result<()> {
        let mut mock = MockPolicyAccess::new();
        mock.expect_get_iam_policy().times(1).returning(|_| Ok(policy()));
        mock.expect_set_iam_policy().never();
        let got = update_with(
            &mock,
            "projects/p",
            |p| p.add_member("roles/viewer", "user:a@example.com"),
            test_config(),
        )
        .await?;
        assert_eq!(got, policy());
        Ok(())
    }

    #[tokio::test]
    async fn update_sets_version_for_conditions() -> anyhow::Result<()> {
        let mut mock = MockPolicyAccess::new();
        mock.expect_get_iam_policy().returning(|_| Ok(Policy::default()));
        mock.expect_set_iam_policy()
            .withf(|_, p| p.version == Some(3))
            .returning(|_, p| Ok(p));
        let got = update_with(
            &mock,
            "projects/p",
            |p| {
                p.bindings.push(
                    Binding::new("roles/viewer")
                        .set_members(["user:a@example.com"])
                        .set_condition(Expr::new("true")),
                );
                true
            },
            test_config(),
        )
        .await?;
        assert_eq!(got.version, Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn update_exhausted() -> anyhow::Result<()> {
        let mut mock = MockPolicyAccess::new();
        mock.expect_get_iam_policy().times(3).returning(|_| Ok(policy()));
        mock.expect_set_iam_policy()
            .times(3)
            .returning(|_, _| Err(aborted()));
        let err = update_with(
            &mock,
            "projects/p",
            |p| p.add_member("roles/owner", "user:z@example.com"),
            test_config(),
        )
        .await
        .unwrap_err();
        assert!(err.is_exhausted(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn update_permanent_error() -> anyhow::Result<()> {
        let mut mock = MockPolicyAccess::new();
        mock.expect_get_iam_policy().times(1).returning(|_| Ok(policy()));
        mock.expect_set_iam_policy().times(1).returning(|_, _| {
            Err(Error::service(
                Status::default()
                    .set_code(403)
                    .set_status("PERMISSION_DENIED")
                    .set_message("denied"),
            ))
        });
        let err = update_with(
            &mock,
            "projects/p",
            |p| p.add_member("roles/owner", "user:z@example.com"),
            test_config(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status().map(|s| s.code), Some(403));
        Ok(())
    }
}
