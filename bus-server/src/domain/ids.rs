//! Identifier newtypes for GTFS entities.
//!
//! GTFS identifiers are opaque strings. Wrapping them keeps the different id
//! spaces from being mixed up at compile time; a `StopId` can never be passed
//! where a `TripId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

id_type! {
    /// Identifier of a stop (`stops.txt` `stop_id`).
    StopId
}

id_type! {
    /// Identifier of a route (`routes.txt` `route_id`).
    RouteId
}

id_type! {
    /// Identifier of a trip (`trips.txt` `trip_id`).
    TripId
}

id_type! {
    /// Identifier of a service-calendar entry (`calendar.txt` `service_id`).
    ServiceId
}
