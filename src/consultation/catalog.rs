//! Static catalog — the option tables offered at each consultation step.
//!
//! Everything here is fixed data. The transition engine reads the cart item
//! sets and validates selections against these tables; presentation layers
//! read labels, questions and advice.

use rust_decimal_macros::dec;
use serde::Serialize;

use super::model::{Diagnosis, FloorDiagnosis, GardenType, Product, ProductCategory, ProjectType, WallDiagnosis};

/// Reply used when an answer has no specific consultant response.
pub const GENERIC_ACKNOWLEDGEMENT: &str = "Understood.";

/// Tools added to the cart once the old floor is removed.
pub const DEMOLITION_TOOLS: &[&str] = &[
    "Pry Bar",
    "Rubber Mallet",
    "Protective Gloves",
    "Utility Knife",
    "Rubble Bags",
];

/// Materials added to the cart after the screed check.
pub const SUPPORT_MATERIALS: &[&str] = &["Self-Leveling Screed", "Wide Trowel", "Screed Primer"];

/// A named item with a short usage note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub id: &'static str,
    pub label: &'static str,
    pub note: &'static str,
}

const fn item(id: &'static str, label: &'static str, note: &'static str) -> CatalogItem {
    CatalogItem { id, label, note }
}

/// Tools for laying the new floor.
pub const INSTALLATION_TOOLS: &[CatalogItem] = &[
    item("spacers", "Spacers", "Keeps the expansion gap"),
    item("mallet", "Rubber Mallet", "Tapping boards into place"),
    item("saw", "Saw/Drill", "For cut-outs"),
];

/// Materials for laying the new floor.
pub const INSTALLATION_MATERIALS: &[CatalogItem] = &[
    item("underlay", "Underlay Foil", "Required under the floor"),
    item("skirting", "Skirting & Corners", "Perimeter finish"),
    item("tape", "Sealing Tape", "Joins the underlay sheets"),
];

/// The laying procedure, in order.
pub const INSTALLATION_STEPS: &[&str] = &[
    "Spread the underlay over the whole surface.",
    "Leave a 1 cm gap at the walls using spacers.",
    "Lay the first row parallel to the natural light.",
    "Click the boards together.",
    "Fit skirting and corners last.",
];

const PAINTING_TOOLS: &[CatalogItem] = &[
    item("p1", "Roller Set", "Microfibre roller and grid"),
    item("p2", "Masking Tape", "Protects skirting and sockets"),
    item("p3", "Wall Primer", "Evens out absorption"),
    item("p4", "Protective Sheet", "Covers furniture and floor"),
];

const GARDEN_TOOLS: &[CatalogItem] = &[
    item("g1", "Lawn Mower", "Electric or petrol"),
    item("g2", "Electric Trimmer", "For the edges"),
    item("g3", "Fertilizer", "Lawn nutrients"),
    item("g4", "Work Gloves", "Skin protection"),
];

/// Everything the installation step hands to the cart: tools first, then materials.
pub fn installation_items() -> Vec<String> {
    INSTALLATION_TOOLS
        .iter()
        .chain(INSTALLATION_MATERIALS)
        .map(|i| i.label.to_string())
        .collect()
}

/// Tools offered at the generic tools step. Flooring has its own
/// installation step and offers none here.
pub fn generic_tools(project: ProjectType) -> &'static [CatalogItem] {
    match project {
        ProjectType::Flooring => &[],
        ProjectType::Painting => PAINTING_TOOLS,
        ProjectType::Garden => GARDEN_TOOLS,
    }
}

/// Display label of a project.
pub fn project_label(project: ProjectType) -> &'static str {
    match project {
        ProjectType::Flooring => "Parquet & Flooring",
        ProjectType::Painting => "Paint & Walls",
        ProjectType::Garden => "Garden & Terrace",
    }
}

/// Question asked at the assessment step.
pub fn assessment_question(project: ProjectType) -> &'static str {
    match project {
        ProjectType::Flooring => {
            "First we need to understand the state of your bedroom. Is the current floor damaged? Swollen? Does it squeak?"
        }
        ProjectType::Painting => "What is the current state of the walls?",
        ProjectType::Garden => "Which area are we working on?",
    }
}

/// One selectable answer at the assessment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosisOption {
    pub value: Diagnosis,
    pub label: &'static str,
    pub description: &'static str,
}

/// Answers offered for a project, in display order.
pub fn diagnosis_options(project: ProjectType) -> Vec<DiagnosisOption> {
    let opt = |value, label, description| DiagnosisOption {
        value,
        label,
        description,
    };
    match project {
        ProjectType::Flooring => vec![
            opt(
                Diagnosis::Flooring(FloorDiagnosis::Swollen),
                "Yes, some areas are swollen",
                "Points to moisture",
            ),
            opt(
                Diagnosis::Flooring(FloorDiagnosis::Old),
                "No, it is just old and worn",
                "Normal wear over time",
            ),
            opt(
                Diagnosis::Flooring(FloorDiagnosis::Squeaky),
                "It squeaks quite a lot",
                "Problem with the sub-floor",
            ),
        ],
        ProjectType::Painting => vec![
            opt(
                Diagnosis::Painting(WallDiagnosis::Fresh),
                "Fresh plaster",
                "Needs primer",
            ),
            opt(
                Diagnosis::Painting(WallDiagnosis::Stained),
                "Old paint",
                "Needs cleaning",
            ),
            opt(
                Diagnosis::Painting(WallDiagnosis::Mold),
                "Mold spots",
                "Needs treatment",
            ),
        ],
        ProjectType::Garden => vec![
            opt(Diagnosis::Garden(GardenType::Lawn), "Lawn", ""),
            opt(Diagnosis::Garden(GardenType::Terrace), "Terrace", ""),
        ],
    }
}

/// The consultant's reply to a diagnosis.
pub fn acknowledgement(diagnosis: Diagnosis) -> &'static str {
    match diagnosis {
        Diagnosis::Flooring(FloorDiagnosis::Swollen) => {
            "If it is swollen, that is a moisture problem. We will remove everything and treat the screed against mold before laying anything new."
        }
        Diagnosis::Flooring(FloorDiagnosis::Squeaky) => {
            "Squeaking means the surface is uneven. A self-leveling screed will be required to fix the flatness."
        }
        Diagnosis::Flooring(FloorDiagnosis::Old) => {
            "All right. In that case you will remove it completely and we will check the screed underneath for a quality result."
        }
        Diagnosis::Painting(WallDiagnosis::Fresh) => {
            "For fresh plaster a primer is essential so the wall does not soak up the paint."
        }
        Diagnosis::Painting(WallDiagnosis::Stained) => "We will pick a paint with high hiding power.",
        Diagnosis::Garden(_) => "Perfect.",
        Diagnosis::Painting(WallDiagnosis::Mold) => GENERIC_ACKNOWLEDGEMENT,
    }
}

/// A line of the screed checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub label: &'static str,
    pub note: &'static str,
}

/// Screed advice and checklist, tailored to the floor diagnosis.
///
/// Advisory only: the cart always receives [`SUPPORT_MATERIALS`].
pub fn support_checklist(diagnosis: Option<FloorDiagnosis>) -> (String, Vec<ChecklistItem>) {
    let mut advice = String::from("Once the old floor is out, the screed has to be checked.");
    let mut items = vec![
        ChecklistItem {
            label: "Wide Trowel",
            note: "For spreading materials",
        },
        ChecklistItem {
            label: "Screed Primer",
            note: "For optimal adhesion",
        },
    ];

    match diagnosis {
        Some(FloorDiagnosis::Swollen) => {
            advice.push_str(
                " Since the floor was swollen, I strongly recommend an anti-mold treatment and a hygrometer check.",
            );
            items.insert(
                0,
                ChecklistItem {
                    label: "Anti-Mold Solution",
                    note: "Mandatory moisture treatment",
                },
            );
            items.push(ChecklistItem {
                label: "Self-Leveling Screed",
                note: "Covers the affected areas",
            });
        }
        Some(FloorDiagnosis::Squeaky) => {
            advice.push_str(
                " Squeaking is usually caused by unevenness. Self-leveling screed is mandatory in your case.",
            );
            items.insert(
                0,
                ChecklistItem {
                    label: "Self-Leveling Screed",
                    note: "Essential to stop the squeaking",
                },
            );
        }
        Some(FloorDiagnosis::Old) | None => {
            advice.push_str(" Small holes or bumps can be repaired quickly.");
            items.insert(
                0,
                ChecklistItem {
                    label: "Screed Repair Kit",
                    note: "For small cracks",
                },
            );
        }
    }

    (advice, items)
}

/// Flooring products offered at the product step.
pub fn products() -> Vec<Product> {
    let floor = |id: &str, name: &str, description: &str, price| Product {
        id: id.to_string(),
        name: name.to_string(),
        category: ProductCategory::Floor,
        description: description.to_string(),
        price,
        unit: "m²".to_string(),
        features: Vec::new(),
    };
    vec![
        floor(
            "egger",
            "Egger Pro Parquet",
            "Laminate 8mm, Light Oak, Heavy Traffic AC4",
            dec!(45),
        ),
        floor(
            "classen",
            "Classen Parquet",
            "Laminate 10mm, Modern Grey, Water Resistant",
            dec!(62),
        ),
        floor(
            "krono",
            "Krono Original",
            "Laminate 12mm, Solid Look, 4-sided V-Groove",
            dec!(89),
        ),
    ]
}

/// Look up a product by id.
pub fn product(id: &str) -> Option<Product> {
    products().into_iter().find(|p| p.id == id)
}

/// A paint shade from the mixing palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteColor {
    pub name: &'static str,
    pub hex: &'static str,
}

/// Shades the mixing centre offers.
pub const PALETTE: &[PaletteColor] = &[
    PaletteColor { name: "Polar White", hex: "#ffffff" },
    PaletteColor { name: "Ice Blue", hex: "#e0e7ff" },
    PaletteColor { name: "Vanilla Cream", hex: "#fef3c7" },
    PaletteColor { name: "Mint Green", hex: "#dcfce7" },
    PaletteColor { name: "Slate Grey", hex: "#475569" },
    PaletteColor { name: "Burgundy Red", hex: "#7f1d1d" },
];

/// Look up a palette color by name, ignoring case.
pub fn palette_color(name: &str) -> Option<PaletteColor> {
    let name = name.trim();
    PALETTE
        .iter()
        .copied()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

/// An add-on service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Short label printed on the receipt.
    pub receipt_label: &'static str,
}

pub const SERVICES: &[Service] = &[
    Service {
        id: "transport",
        title: "Home Delivery",
        description: "Fast kerbside delivery (48h)",
        receipt_label: "Express Transport",
    },
    Service {
        id: "installation",
        title: "Certified Installation Service",
        description: "Extended 2-year labour warranty",
        receipt_label: "Pro Installation",
    },
];

pub fn service(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|s| s.id == id)
}
