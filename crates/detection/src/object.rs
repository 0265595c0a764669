//! Vehicle classes, bounding boxes, and frame observations

use serde::{Deserialize, Serialize};

/// Vehicle class (subset of COCO classes relevant to traffic analysis)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Car,
    Motorcycle,
    Bus,
    Truck,
}

impl VehicleClass {
    /// Map a COCO class id to a vehicle class, if it is one
    pub fn from_coco_id(id: u32) -> Option<Self> {
        match id {
            2 => Some(Self::Car),
            3 => Some(Self::Motorcycle),
            5 => Some(Self::Bus),
            7 => Some(Self::Truck),
            _ => None,
        }
    }

    /// COCO class id for this vehicle class
    pub fn coco_id(&self) -> u32 {
        match self {
            Self::Car => 2,
            Self::Motorcycle => 3,
            Self::Bus => 5,
            Self::Truck => 7,
        }
    }
}

/// Axis-aligned bounding box in pixel coordinates (x2 > x1, y2 > y1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box midpoint
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

/// Raw detector output before class/confidence filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetection {
    /// COCO class id as reported by the detector
    pub class_id: u32,
    /// Detection confidence
    pub confidence: f32,
    /// Bounding box
    pub bbox: BoundingBox,
}

/// One filtered vehicle detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDetection {
    /// Vehicle class
    pub class: VehicleClass,
    /// Detection confidence
    pub confidence: f32,
    /// Bounding box
    pub bbox: BoundingBox,
    /// Box center (cx, cy)
    pub center: (f32, f32),
}

impl VehicleDetection {
    pub fn from_raw(raw: &RawDetection, class: VehicleClass) -> Self {
        Self {
            class,
            confidence: raw.confidence,
            bbox: raw.bbox,
            center: raw.bbox.center(),
        }
    }
}

/// Operating mode for a whole video, selected once from the first frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Direct camera footage
    #[default]
    Standard,
    /// Screen-recorded footage (re-encoded, lower detection quality)
    ScreenCapture,
}

/// Outcome of analyzing one sampled frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameObservation {
    /// Ordinal position in the decoded stream
    pub frame_index: u64,
    /// Filtered vehicle detections, in detector output order
    pub vehicles: Vec<VehicleDetection>,
    /// Operating mode active when this frame was analyzed
    pub mode: AnalysisMode,
}

impl FrameObservation {
    /// Number of vehicles retained after filtering
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }
}
