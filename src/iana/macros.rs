//! Macros making implementing integer-valued registry types easier.

/// Creates a standard registry type wrapping an integer.
///
/// This adds impls for `From`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`,
/// `Hash`, and `Debug`, as well as the `from_int()`, `to_int()`,
/// `from_mnemonic()`, and `to_mnemonic_str()` methods and a `KNOWN` slice
/// listing all well-defined values.
///
/// For `Display`, see the other macro in this module or implement it
/// manually.
macro_rules! int_enum {
    ( $(#[$attr:meta])* =>
      $name:ident, $int:path;
      $( $(#[$value_attr:meta])* ( $konst:ident =>
                                        $value:expr, $mnemonic:expr) )* ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $name($int);

        impl $name {
            $(
                $(#[$value_attr])*
                pub const $konst: $name = $name($value);
            )*

            /// All well-defined values in registry order.
            pub const KNOWN: &'static [$name] = &[
                $( $name::$konst, )*
            ];
        }

        impl $name {
            /// Creates a value from the raw integer.
            #[must_use]
            pub const fn from_int(value: $int) -> Self {
                Self(value)
            }

            /// Returns the raw integer.
            #[must_use]
            pub const fn to_int(self) -> $int {
                self.0
            }

            /// Looks up a value by its mnemonic, ignoring case.
            #[must_use]
            pub fn from_mnemonic(m: &str) -> Option<Self> {
                $(
                    if m.eq_ignore_ascii_case($mnemonic) {
                        return Some($name::$konst)
                    }
                )*
                None
            }

            /// Returns the mnemonic if the value is well-defined.
            #[must_use]
            pub const fn to_mnemonic_str(self) -> Option<&'static str> {
                match self {
                    $(
                        $name::$konst => {
                            Some($mnemonic)
                        }
                    )*
                    _ => None
                }
            }

            /// Returns whether this is one of the well-defined values.
            #[must_use]
            pub const fn is_known(self) -> bool {
                self.to_mnemonic_str().is_some()
            }
        }

        //--- From

        impl From<$int> for $name {
            fn from(value: $int) -> Self {
                $name::from_int(value)
            }
        }

        impl From<$name> for $int {
            fn from(value: $name) -> Self {
                value.to_int()
            }
        }

        //--- Debug

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                match self.to_mnemonic_str() {
                    Some(mnemonic) => {
                        write!(
                            f,
                            concat!(stringify!($name), "::{}"),
                            mnemonic
                        )
                    }
                    None => {
                        f.debug_tuple(stringify!($name))
                            .field(&self.0)
                            .finish()
                    }
                }
            }
        }
    }
}

/// Adds string conversions to a registry type.
///
/// Parsing accepts any mnemonic regardless of case or a decimal number.
/// Formatting produces the mnemonic or, lacking one, the decimal number.
///
/// With the `serde` feature, values serialize as their mnemonic where one
/// exists and as the integer otherwise. Both forms are accepted when
/// deserializing.
macro_rules! int_enum_str_with_decimal {
    ($name:ident, $int:ident) => {
        impl core::str::FromStr for $name {
            type Err = $crate::iana::FromStrError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::from_mnemonic(s)
                    .or_else(|| s.parse().ok().map($name::from_int))
                    .ok_or($crate::iana::FromStrError(stringify!($name)))
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                match self.to_mnemonic_str() {
                    Some(m) => f.write_str(m),
                    None => write!(f, "{}", self.to_int()),
                }
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                match self.to_mnemonic_str() {
                    Some(m) => serializer.serialize_str(m),
                    None => serde::Serialize::serialize(
                        &self.to_int(),
                        serializer,
                    ),
                }
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                use serde::de;

                struct Visitor;

                impl<'de> de::Visitor<'de> for Visitor {
                    type Value = $name;

                    fn expecting(
                        &self,
                        f: &mut core::fmt::Formatter,
                    ) -> core::fmt::Result {
                        f.write_str(concat!(
                            "a mnemonic or integer ",
                            stringify!($name)
                        ))
                    }

                    fn visit_str<E: de::Error>(
                        self,
                        v: &str,
                    ) -> Result<Self::Value, E> {
                        v.parse().map_err(E::custom)
                    }

                    fn visit_i64<E: de::Error>(
                        self,
                        v: i64,
                    ) -> Result<Self::Value, E> {
                        $int::try_from(v)
                            .map($name::from_int)
                            .map_err(E::custom)
                    }

                    fn visit_u64<E: de::Error>(
                        self,
                        v: u64,
                    ) -> Result<Self::Value, E> {
                        $int::try_from(v)
                            .map($name::from_int)
                            .map_err(E::custom)
                    }
                }

                deserializer.deserialize_any(Visitor)
            }
        }
    };
}
