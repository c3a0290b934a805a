//! Vector shape data.

use serde::{Deserialize, Serialize};

/// Geometry of a vector element inside its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorType {
    #[default]
    Rectangle,
    Ellipse,
    Triangle,
    Polygon,
    Star,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorData {
    #[serde(alias = "shapeType")]
    pub vector_type: VectorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    /// Side count for polygons and point count for stars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,
}

impl VectorData {
    pub fn new(vector_type: VectorType) -> Self {
        let sides = match vector_type {
            VectorType::Triangle => Some(3),
            VectorType::Polygon => Some(6),
            VectorType::Star => Some(5),
            VectorType::Rectangle | VectorType::Ellipse => None,
        };
        Self {
            vector_type,
            corner_radius: None,
            sides,
        }
    }
}
