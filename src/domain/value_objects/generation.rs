//! Device generation selector

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which device hardware a deployment is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceGeneration {
    /// Convention-based layout, no explicit index
    V1,
    /// Indexed layout with `packages_data.txt`
    #[default]
    V2,
}

impl DeviceGeneration {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceGeneration::V1 => "v1",
            DeviceGeneration::V2 => "v2",
        }
    }
}

impl fmt::Display for DeviceGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device generation '{0}' (expected v1 or v2)")]
pub struct UnknownGeneration(pub String);

impl FromStr for DeviceGeneration {
    type Err = UnknownGeneration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" | "tbv1" => Ok(DeviceGeneration::V1),
            "v2" | "2" | "tbv2" => Ok(DeviceGeneration::V2),
            other => Err(UnknownGeneration(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        assert_eq!("v1".parse::<DeviceGeneration>(), Ok(DeviceGeneration::V1));
        assert_eq!("TBv2".parse::<DeviceGeneration>(), Ok(DeviceGeneration::V2));
        assert!("v3".parse::<DeviceGeneration>().is_err());
    }
}
