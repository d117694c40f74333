use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string did not name any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: '{value}'")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr + serde-as-string pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(UnknownVariant {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(
    /// What the caller submitted for analysis.
    RequestKind {
        Text => "text",
        Url => "url",
    }
);

str_enum!(
    /// Which HTML reduction strategy the content extractor uses.
    HtmlEngine {
        Dom => "dom",
        TagStrip => "strip",
    }
);

str_enum!(
    /// Composite service status reported by the health aggregator.
    HealthStatus {
        Healthy => "healthy",
        Degraded => "degraded",
    }
);

str_enum!(
    /// Classified failure category. The string is the wire error code.
    ErrorKind {
        InvalidRequest => "INVALID_REQUEST",
        InvalidUrl => "INVALID_URL",
        InvalidPrediction => "INVALID_PREDICTION",
        ScrapeFailed => "SCRAPE_FAILED",
        ServiceUnavailable => "SERVICE_UNAVAILABLE",
        PredictionFailed => "PREDICTION_FAILED",
        NotFound => "NOT_FOUND",
        Cancelled => "CANCELLED",
        Internal => "INTERNAL",
    }
);
