//! Study area: the named geographic extent an analysis covers

use crate::crs::Crs;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Rectangular geographic extent in CRS units.
///
/// Invariant: `west < east` and `south < north`; enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Create a bounding box, validating the extent ordering.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self> {
        if !(west < east && south < north)
            || !west.is_finite()
            || !south.is_finite()
            || !east.is_finite()
            || !north.is_finite()
        {
            return Err(Error::InvalidBounds {
                west,
                south,
                east,
                north,
            });
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Extent in the X direction
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Extent in the Y direction
    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

/// A named study area: bounding box plus coordinate reference system.
///
/// Immutable after construction; cloned freely by generators and pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyArea {
    name: String,
    bbox: BoundingBox,
    crs: Crs,
}

impl StudyArea {
    pub fn new(name: impl Into<String>, bbox: BoundingBox, crs: Crs) -> Self {
        Self {
            name: name.into(),
            bbox,
            crs,
        }
    }

    /// The default study area: Kosi Basin, Bihar, India.
    pub fn kosi_basin() -> Self {
        Self {
            name: "Kosi Basin, Bihar, India".to_string(),
            bbox: BoundingBox {
                west: 85.5,
                south: 25.5,
                east: 88.5,
                north: 27.5,
            },
            crs: Crs::wgs84(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }
}
