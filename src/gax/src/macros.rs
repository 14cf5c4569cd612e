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

//! Helper macros for the service crates.

/// Defines an enumeration for a string-valued REST field.
///
/// The enumeration is `#[non_exhaustive]` and has an `UnknownValue` variant
/// holding any string not known to this version of the library, so new
/// values returned by the service round-trip unchanged.
///
/// ```
/// cloudkit_gax::api_enum! {
///     /// The color of a thing.
///     Color {
///         Red => "RED",
///         Blue => "BLUE",
///     }
/// }
/// assert_eq!(Color::from("RED"), Color::Red);
/// assert_eq!(Color::from("GREEN").name(), "GREEN");
/// ```
#[macro_export]
macro_rules! api_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $value:literal,)* }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
            /// A value not known to this version of the library.
            UnknownValue(String),
        }

        impl $name {
            /// The string used by the REST API.
            pub fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $value,)*
                    Self::UnknownValue(v) => v.as_str(),
                }
            }
        }

        impl std::convert::From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $($value => Self::$variant,)*
                    other => Self::UnknownValue(other.to_string()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S: $crate::__private::serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D: $crate::__private::serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
                let value = <String as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from(value.as_str()))
            }
        }
    };
}

/// Declares a newtype over `Arc<dyn Policy>`, accepted wherever client and
/// request options take a policy.
macro_rules! policy_arg {
    ($(#[$meta:meta])* $arg:ident => $policy:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $arg(pub(crate) std::sync::Arc<dyn $policy>);

        impl<T: $policy + 'static> From<T> for $arg {
            fn from(policy: T) -> Self {
                Self(std::sync::Arc::new(policy))
            }
        }

        impl From<std::sync::Arc<dyn $policy>> for $arg {
            fn from(policy: std::sync::Arc<dyn $policy>) -> Self {
                Self(policy)
            }
        }

        impl From<$arg> for std::sync::Arc<dyn $policy> {
            fn from(arg: $arg) -> Self {
                arg.0
            }
        }
    };
}
pub(crate) use policy_arg;

#[cfg(test)]
mod tests {
    crate::api_enum! {
        Shape {
            Circle => "CIRCLE",
            Square => "SQUARE",
        }
    }

    #[test]
    fn serde() -> anyhow::Result<()> {
        let got = serde_json::to_value(Shape::Circle)?;
        assert_eq!(got, serde_json::json!("CIRCLE"));
        let got = serde_json::from_value::<Shape>(serde_json::json!("TRIANGLE"))?;
        assert_eq!(got, Shape::UnknownValue("TRIANGLE".into()));
        assert_eq!(got.to_string(), "TRIANGLE");
        Ok(())
    }
}
