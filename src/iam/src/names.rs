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

//! Resource name helpers.

const ACCOUNT_PREFIX: &str = "projects/-/serviceAccounts/";

/// Returns the full resource name of a service account.
///
/// Accepts a full name, such as
/// `projects/my-project/serviceAccounts/sa@my-project.iam.gserviceaccount.com`,
/// or the short form: the email or the unique id of the account. The short
/// form is expanded with the `-` wildcard, the service infers the project.
///
/// ```
/// # use cloudkit_iam::names::service_account;
/// assert_eq!(
///     service_account("sa@my-project.iam.gserviceaccount.com"),
///     "projects/-/serviceAccounts/sa@my-project.iam.gserviceaccount.com"
/// );
/// assert_eq!(service_account("projects/p/serviceAccounts/123"), "projects/p/serviceAccounts/123");
/// ```
pub fn service_account(name: &str) -> String {
    if name.starts_with("projects/") {
        return name.to_string();
    }
    format!("{ACCOUNT_PREFIX}{name}")
}

/// Returns the resource name for a project, accepting `my-project` or
/// `projects/my-project`.
pub fn project(name: &str) -> String {
    if name.starts_with("projects/") {
        return name.to_string();
    }
    format!("projects/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("sa@p.iam.gserviceaccount.com", "projects/-/serviceAccounts/sa@p.iam.gserviceaccount.com")]
    #[test_case("1234567890", "projects/-/serviceAccounts/1234567890")]
    #[test_case("projects/p/serviceAccounts/x", "projects/p/serviceAccounts/x")]
    #[test_case("projects/-/serviceAccounts/x", "projects/-/serviceAccounts/x")]
    fn accounts(input: &str, want: &str) {
        assert_eq!(service_account(input), want);
    }

    #[test_case("p", "projects/p")]
    #[test_case("projects/p", "projects/p")]
    fn projects(input: &str, want: &str) {
        assert_eq!(project(input), want);
    }
}
