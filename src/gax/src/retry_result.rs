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

//! The outcome of consulting a retry or polling policy about an error.

use crate::error::Error;

/// What a retry or polling loop does after an error.
///
/// Every variant carries the error, loops that stop return it to the caller.
#[derive(Debug)]
pub enum RetryResult {
    /// Stop, the error cannot succeed on a new attempt.
    Permanent(Error),
    /// Stop, the error is retryable but a limit on the loop was reached.
    Exhausted(Error),
    /// Make another attempt.
    Continue(Error),
}

impl RetryResult {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// Turns `Continue` into `Exhausted` when `limit_reached` is true.
    ///
    /// Policy decorators use this to cap an inner policy without changing
    /// its classification of permanent errors.
    pub fn exhaust_if(self, limit_reached: bool) -> Self {
        match self {
            Self::Continue(e) if limit_reached => Self::Exhausted(e),
            other => other,
        }
    }

    /// Discards the classification and returns the error.
    pub fn into_error(self) -> Error {
        match self {
            Self::Permanent(e) | Self::Exhausted(e) | Self::Continue(e) => e,
        }
    }
}
