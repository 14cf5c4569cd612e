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

//! Request builders for the [Client][crate::client::Client] methods.
//!
//! Each builder holds the required parameters of a call, set by the client
//! method, and setters for the optional ones. `send()` makes the call.
//! `list` builders also provide `by_page()` and `by_item()` to iterate over
//! all the results.

mod records;
mod steering;
mod zones;

pub use records::*;
pub use steering::*;
pub use zones::*;

macro_rules! request_builder {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc(hidden)]
            impl gax::options::internal::RequestBuilder for $name {
                fn request_options(&mut self) -> &mut gax::options::RequestOptions {
                    &mut self.options
                }
            }
        )*
    };
}

/// Defines setters for optional query parameters.
macro_rules! query_setters {
    ($name:ident { $($(#[$meta:meta])* $setter:ident : $kind:ident $(<$ty:ty>)? => $key:literal),* $(,)? }) => {
        impl $name {
            $( query_setters!(@one $(#[$meta])* $setter $kind $(<$ty>)? $key); )*
        }
    };
    (@one $(#[$meta:meta])* $setter:ident string $key:literal) => {
        $(#[$meta])*
        pub fn $setter<T: Into<String>>(mut self, v: T) -> Self {
            self.query.insert($key, v.into());
            self
        }
    };
    (@one $(#[$meta:meta])* $setter:ident int $key:literal) => {
        $(#[$meta])*
        pub fn $setter(mut self, v: i32) -> Self {
            self.query.insert($key, v.to_string());
            self
        }
    };
    (@one $(#[$meta:meta])* $setter:ident value <$ty:ty> $key:literal) => {
        $(#[$meta])*
        pub fn $setter(mut self, v: $ty) -> Self {
            self.query.insert($key, v.name().to_string());
            self
        }
    };
}

/// Defines `set_if_match()` for builders of mutating calls.
macro_rules! if_match {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                /// Only make the change if the resource etag matches.
                ///
                /// The call fails with HTTP 412 if the resource changed.
                pub fn set_if_match<T: Into<String>>(mut self, v: T) -> Self {
                    self.conditions.if_match = Some(v.into());
                    self
                }
            }
        )*
    };
}

/// Defines `set_if_none_match()` for builders of read calls.
macro_rules! if_none_match {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                /// Skip the body if the resource etag still matches.
                ///
                /// The service returns HTTP 304, reported as an error.
                pub fn set_if_none_match<T: Into<String>>(mut self, v: T) -> Self {
                    self.conditions.if_none_match = Some(v.into());
                    self
                }
            }
        )*
    };
}

/// Defines `by_page()` and `by_item()` for `list` builders.
///
/// OCI pages with the `page` query parameter and the `opc-next-page` header.
macro_rules! paginated {
    ($($name:ident => $item:ty),* $(,)?) => {
        $(
            impl $name {
                /// Sets the page token, from the `opc-next-page` header of a
                /// previous call.
                pub fn set_page<T: Into<String>>(mut self, v: T) -> Self {
                    let v = v.into();
                    if v.is_empty() {
                        self.query.remove("page");
                    } else {
                        self.query.insert("page", v);
                    }
                    self
                }

                /// Sets the maximum number of items per page.
                pub fn set_limit(mut self, v: i32) -> Self {
                    self.query.insert("limit", v.to_string());
                    self
                }

                /// Streams each page in the collection.
                pub fn by_page(
                    self,
                ) -> gax::paginator::Paginator<crate::model::Page<$item>, gax::error::Error> {
                    let token = self.query.get("page").cloned().unwrap_or_default();
                    let execute = move |token: String| self.clone().set_page(token).send();
                    gax::paginator::Paginator::new(token, execute)
                }

                /// Streams each item in the collection.
                pub fn by_item(
                    self,
                ) -> gax::paginator::ItemPaginator<crate::model::Page<$item>, gax::error::Error> {
                    self.by_page().items()
                }
            }
        )*
    };
}

use if_match;
use if_none_match;
use paginated;
use query_setters;
use request_builder;
