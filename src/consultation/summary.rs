//! Consultation summary — the receipt produced at the end of a flow.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Serialize;

use super::calculator::QuantityUnit;
use super::cart;
use super::catalog;
use super::model::{ProjectType, Step};
use super::session::ConsultationSession;

/// Source of receipt codes.
///
/// Injected so tests and replays can pin the codes a session produces.
pub trait CodeGenerator: Send {
    /// A four-digit number in `1000..=9999`.
    fn next_code(&mut self) -> u16;
}

/// [`CodeGenerator`] backed by a seedable RNG.
pub struct SeededCodes {
    rng: StdRng,
}

impl SeededCodes {
    /// Reproducible sequence for `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sequence seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl CodeGenerator for SeededCodes {
    fn next_code(&mut self) -> u16 {
        self.rng.gen_range(1000..=9999)
    }
}

/// Code the customer shows at the till, e.g. `HB-4821`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct ReceiptCode(u16);

impl ReceiptCode {
    pub fn number(&self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ReceiptCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HB-{:04}", self.0)
    }
}

impl From<ReceiptCode> for String {
    fn from(code: ReceiptCode) -> Self {
        code.to_string()
    }
}

/// A grouped cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub name: String,
    pub count: u32,
}

/// The final receipt of a consultation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultationSummary {
    pub project: ProjectType,
    /// Headline material, e.g. "Parquet".
    pub material: &'static str,
    /// Headline quantity to buy.
    pub quantity: Decimal,
    pub unit: QuantityUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub items: Vec<CartLine>,
    /// Receipt labels of the chosen services.
    pub services: Vec<String>,
    pub issued_at: DateTime<Utc>,
    pub code: ReceiptCode,
}

impl ConsultationSummary {
    /// Build the receipt for a session that has reached SUMMARY.
    ///
    /// Returns `None` for sessions still in progress.
    pub fn build(
        session: &ConsultationSession,
        issued_at: DateTime<Utc>,
        codes: &mut dyn CodeGenerator,
    ) -> Option<Self> {
        if session.current_step() != Step::Summary {
            return None;
        }
        let project = session.project_type()?;

        let (quantity, unit) = match session.quantity() {
            Some(q) => (q.required, q.unit),
            None => match project {
                ProjectType::Painting => (session.measurement(), QuantityUnit::Litres),
                _ => (session.measurement(), QuantityUnit::SquareMetres),
            },
        };

        let items = cart::tally(session.cart())
            .into_iter()
            .map(|(name, count)| CartLine { name, count })
            .collect();

        let services = session
            .selected_services()
            .iter()
            .map(|id| {
                catalog::service(id)
                    .map(|s| s.receipt_label.to_string())
                    .unwrap_or_else(|| id.clone())
            })
            .collect();

        Some(Self {
            project,
            material: material_label(project),
            quantity: quantity.normalize(),
            unit,
            product: session.selected_product().map(|p| p.name.clone()),
            color: session.selected_color().map(str::to_string),
            items,
            services,
            issued_at,
            code: ReceiptCode(codes.next_code()),
        })
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            "Virtual Consultation Receipt".to_string(),
            self.issued_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            String::new(),
            format!("{}: {} {}", self.material.to_uppercase(), self.quantity, self.unit),
        ];

        if let Some(ref product) = self.product {
            lines.push(format!("PRODUCT: {product}"));
        }
        if let Some(ref color) = self.color {
            lines.push(format!("COLOR MIX: {color}"));
        }
        if !self.items.is_empty() {
            lines.push("Items / Tools:".to_string());
            for line in &self.items {
                lines.push(format!("  {} x{}", line.name, line.count));
            }
        }
        if !self.services.is_empty() {
            lines.push("Services:".to_string());
            for service in &self.services {
                lines.push(format!("  {service}: YES"));
            }
        }

        lines.push(String::new());
        lines.push(format!("Project code: {}", self.code));
        lines.join("\n")
    }
}

fn material_label(project: ProjectType) -> &'static str {
    match project {
        ProjectType::Flooring => "Parquet",
        ProjectType::Painting => "Paint",
        ProjectType::Garden => "Garden",
    }
}
