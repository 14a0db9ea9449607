//! Consultation data model — steps, project types, diagnoses, and selections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The named stages of a consultation.
///
/// Ordinals follow the declaration order but the flow is not sequential:
/// COLOR_MIXER and TOOLS_GENERIC come after SUMMARY numerically while being
/// visited before SERVICES on the painting and garden paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Intro,
    ProjectSelect,
    Meeting,
    Assessment,
    Demolition,
    SupportCheck,
    ProductSelect,
    Calculator,
    Installation,
    Services,
    Summary,
    ColorMixer,
    ToolsGeneric,
}

impl Step {
    /// All steps in ordinal order.
    pub const ALL: [Step; 13] = [
        Step::Intro,
        Step::ProjectSelect,
        Step::Meeting,
        Step::Assessment,
        Step::Demolition,
        Step::SupportCheck,
        Step::ProductSelect,
        Step::Calculator,
        Step::Installation,
        Step::Services,
        Step::Summary,
        Step::ColorMixer,
        Step::ToolsGeneric,
    ];

    /// Stable ordinal, used for ordering and display only.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Steps that may be occupied before a project type is chosen.
    pub fn is_pre_project(&self) -> bool {
        matches!(self, Self::Intro | Self::ProjectSelect)
    }

    /// Whether the consultation is finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Summary)
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::Intro
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Intro => "intro",
            Self::ProjectSelect => "project_select",
            Self::Meeting => "meeting",
            Self::Assessment => "assessment",
            Self::Demolition => "demolition",
            Self::SupportCheck => "support_check",
            Self::ProductSelect => "product_select",
            Self::Calculator => "calculator",
            Self::Installation => "installation",
            Self::Services => "services",
            Self::Summary => "summary",
            Self::ColorMixer => "color_mixer",
            Self::ToolsGeneric => "tools_generic",
        };
        write!(f, "{s}")
    }
}

/// The three kinds of renovation project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Flooring,
    Painting,
    Garden,
}

impl ProjectType {
    pub const ALL: [ProjectType; 3] = [Self::Flooring, Self::Painting, Self::Garden];
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flooring => write!(f, "flooring"),
            Self::Painting => write!(f, "painting"),
            Self::Garden => write!(f, "garden"),
        }
    }
}

impl std::str::FromStr for ProjectType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flooring" => Ok(Self::Flooring),
            "painting" => Ok(Self::Painting),
            "garden" => Ok(Self::Garden),
            _ => Err(format!("Unknown project type: {}", s)),
        }
    }
}

/// Condition of the existing floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorDiagnosis {
    Swollen,
    Old,
    Squeaky,
}

/// Condition of the walls to be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallDiagnosis {
    Fresh,
    Stained,
    Mold,
}

/// Which garden area is being worked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GardenType {
    Lawn,
    Terrace,
}

/// A diagnosis answer, tagged by the project it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "project", content = "value", rename_all = "snake_case")]
pub enum Diagnosis {
    Flooring(FloorDiagnosis),
    Painting(WallDiagnosis),
    Garden(GardenType),
}

impl Diagnosis {
    /// Parse a raw answer against the allowed set of `project`.
    ///
    /// Returns `None` for values outside that set; values belonging to a
    /// different project are not accepted either.
    pub fn parse(project: ProjectType, raw: &str) -> Option<Self> {
        let raw = raw.trim().to_lowercase();
        match project {
            ProjectType::Flooring => match raw.as_str() {
                "swollen" => Some(Self::Flooring(FloorDiagnosis::Swollen)),
                "old" => Some(Self::Flooring(FloorDiagnosis::Old)),
                "squeaky" => Some(Self::Flooring(FloorDiagnosis::Squeaky)),
                _ => None,
            },
            ProjectType::Painting => match raw.as_str() {
                "fresh" => Some(Self::Painting(WallDiagnosis::Fresh)),
                "stained" => Some(Self::Painting(WallDiagnosis::Stained)),
                "mold" => Some(Self::Painting(WallDiagnosis::Mold)),
                _ => None,
            },
            ProjectType::Garden => match raw.as_str() {
                "lawn" => Some(Self::Garden(GardenType::Lawn)),
                "terrace" => Some(Self::Garden(GardenType::Terrace)),
                _ => None,
            },
        }
    }

    /// The project this diagnosis belongs to.
    pub fn project(&self) -> ProjectType {
        match self {
            Self::Flooring(_) => ProjectType::Flooring,
            Self::Painting(_) => ProjectType::Painting,
            Self::Garden(_) => ProjectType::Garden,
        }
    }

    /// The raw identifier, as submitted by the presentation layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flooring(FloorDiagnosis::Swollen) => "swollen",
            Self::Flooring(FloorDiagnosis::Old) => "old",
            Self::Flooring(FloorDiagnosis::Squeaky) => "squeaky",
            Self::Painting(WallDiagnosis::Fresh) => "fresh",
            Self::Painting(WallDiagnosis::Stained) => "stained",
            Self::Painting(WallDiagnosis::Mold) => "mold",
            Self::Garden(GardenType::Lawn) => "lawn",
            Self::Garden(GardenType::Terrace) => "terrace",
        }
    }

    /// Allowed raw values for a project.
    pub fn allowed_values(project: ProjectType) -> &'static [&'static str] {
        match project {
            ProjectType::Flooring => &["swollen", "old", "squeaky"],
            ProjectType::Painting => &["fresh", "stained", "mold"],
            ProjectType::Garden => &["lawn", "terrace"],
        }
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Floor,
    Paint,
    GardenTool,
    Accessory,
}

/// A product the customer can pick during the consultation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier, e.g. "egger".
    pub id: String,
    pub name: String,
    pub category: ProductCategory,
    pub description: String,
    /// Shelf price per unit. Informational only.
    pub price: Decimal,
    /// Sales unit, e.g. "m²", "L", "pcs".
    pub unit: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

/// Room dimensions as entered at the calculator step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length in metres.
    pub length: f64,
    /// Width in metres.
    pub width: f64,
    /// Paint coats. Only read for painting projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<u8>,
}

impl Dimensions {
    pub fn new(length: f64, width: f64) -> Self {
        Self {
            length,
            width,
            layers: None,
        }
    }

    /// Builder: set the number of paint coats.
    pub fn with_layers(mut self, layers: u8) -> Self {
        self.layers = Some(layers);
        self
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        // Initial values of the calculator inputs.
        Self::new(4.0, 3.5)
    }
}
