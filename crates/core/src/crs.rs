//! Coordinate Reference System handling

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate reference system, identified by an EPSG code or an
/// authority string such as `"EPSG:4326"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    epsg: Option<u32>,
    authority: Option<String>,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            authority: None,
        }
    }

    /// Parse an authority string. `"EPSG:<code>"` resolves to the EPSG
    /// code; anything else is kept verbatim.
    pub fn parse(s: &str) -> Self {
        if let Some(code) = s
            .strip_prefix("EPSG:")
            .or_else(|| s.strip_prefix("epsg:"))
            .and_then(|c| c.parse::<u32>().ok())
        {
            return Self::from_epsg(code);
        }
        Self {
            epsg: None,
            authority: Some(s.to_string()),
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get the EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Whether this is a geographic (latitude/longitude) system.
    ///
    /// Recognizes the common geographic EPSG codes; projected systems and
    /// unknown authorities report false.
    pub fn is_geographic(&self) -> bool {
        matches!(self.epsg, Some(4326) | Some(4269) | Some(4267))
    }

    /// Check if two CRS refer to the same system
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }
        match (&self.authority, &other.authority) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// String identifier for this CRS, e.g. `"EPSG:4326"`
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        self.authority
            .clone()
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = Crs::from_epsg(4326);
        assert_eq!(crs.epsg(), Some(4326));
        assert_eq!(crs.identifier(), "EPSG:4326");
    }

    #[test]
    fn test_crs_parse_epsg_string() {
        let crs = Crs::parse("EPSG:4326");
        assert_eq!(crs.epsg(), Some(4326));
        assert!(crs.is_equivalent(&Crs::wgs84()));
    }

    #[test]
    fn test_crs_parse_other_authority() {
        let crs = Crs::parse("ESRI:54009");
        assert_eq!(crs.epsg(), None);
        assert_eq!(crs.identifier(), "ESRI:54009");
    }

    #[test]
    fn test_crs_geographic() {
        assert!(Crs::wgs84().is_geographic());
        assert!(!Crs::from_epsg(3857).is_geographic());
    }
}
