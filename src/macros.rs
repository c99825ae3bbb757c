/// Creates an enum whose variants are represented by strings on the wire. Written like an enum with
/// numeric discriminants, just with strings instead of numbers.
///
/// Every generated enum gets an additional `Custom(String)` variant which holds values the api
/// delivers but this crate does not know (yet), so a newly added status or type does not break
/// decoding of the whole response.
///
/// The generated enum implements [`std::fmt::Display`] (the wire value), [`Default`]
/// (`<name>::Custom("")`), [`From<String>`] (falls back to `Custom`) and
/// [`serde::Serialize`] / [`serde::Deserialize`].
macro_rules! enum_values {
    ($(#[$attribute:meta])* $v:vis enum $name:ident { $($(#[$field_attribute:meta])* $field:ident = $value:literal)* }) => {
        $(
            #[$attribute]
        )*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        $v enum $name {
            $(
                $(
                    #[$field_attribute]
                )*
                $field
            ),*,
            Custom(String)
        }

        impl $name {
            /// All known (non custom) values.
            #[allow(dead_code)]
            pub fn all() -> Vec<$name> {
                vec![$($name::$field),*]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let value = match self {
                    $(
                        $name::$field => $value
                    ),*,
                    $name::Custom(raw) => raw
                };
                write!(f, "{}", value)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::Custom("".to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $(
                        $value => $name::$field
                    ),*,
                    _ => $name::Custom(value)
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_string())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
                where D: serde::Deserializer<'de>
            {
                let value: Option<String> = serde::Deserialize::deserialize(deserializer)?;
                Ok(value.map(Self::from).unwrap_or_default())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: serde::ser::Serializer {
                serializer.serialize_str(self.to_string().as_str())
            }
        }
    };
}

/// Creates a struct which collects optional request parameters for a specific endpoint. Every
/// field is an [`Option`] which is only serialized if it's set, so the struct can be used as json
/// body as well as query string (via [`serde_urlencoded`]).
///
/// # Examples
///
/// ```ignore
/// options! {
///     /// Filter results.
///     FilterOptions;
///     limit(u32, "n") = Some(20),
///     start(u32, "start") = None
/// }
/// ```
///
/// Produces a `FilterOptions` struct with `limit` and `start` fields, builder style setters with
/// the same names and a [`Default`] implementation which uses the given default values.
/// Serializing `FilterOptions::default()` results in `{"n":20}`.
macro_rules! options {
    // `$(#[$attribute:meta])*` should generally only be used for `#[doc = "..."]`
    ($(#[$struct_attribute:meta])* $name:ident; $($(#[$attribute:meta])* $field:ident($t:ty, $wire_name:literal) = $default:expr),*) => {
        $(
            #[$struct_attribute]
        )*
        #[derive(Clone, Debug, PartialEq, serde::Serialize, smart_default::SmartDefault)]
        pub struct $name {
            $(
                $(
                    #[$attribute]
                )*
                #[default($default)]
                #[serde(rename = $wire_name, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$t>
            ),*
        }

        impl $name {
            $(
                $(
                    #[$attribute]
                )*
                pub fn $field<T: Into<$t>>(mut self, value: T) -> $name {
                    self.$field = Some(value.into());

                    self
                }
            )*
        }
    }
}

pub(crate) use enum_values;
pub(crate) use options;
