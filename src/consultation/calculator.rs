//! Quantity calculator — turns room dimensions into material quantities.
//!
//! All arithmetic runs on [`Decimal`] so that results such as
//! `4 × 3.5 × 1.1 = 15.4` come out exact. Rounding is half-up (away from
//! zero) to two decimal places.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::model::{Dimensions, ProjectType};
use crate::error::QuantityError;

/// Installation waste allowance applied to flooring.
pub const FLOORING_WASTE_FACTOR: Decimal = dec!(1.1);

/// Square metres covered by one litre of paint, per coat.
pub const PAINT_COVERAGE_SQM_PER_LITRE: Decimal = dec!(10);

/// Coats assumed when a painting measurement does not say.
pub const DEFAULT_PAINT_LAYERS: u8 = 2;

/// Accepted coat counts.
pub const PAINT_LAYER_RANGE: std::ops::RangeInclusive<u8> = 1..=3;

/// Unit of a required quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityUnit {
    SquareMetres,
    Litres,
}

impl QuantityUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::SquareMetres => "m²",
            Self::Litres => "L",
        }
    }
}

impl std::fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Result of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub project: ProjectType,
    /// Measured floor or wall area, rounded to 2 dp.
    pub area: Decimal,
    /// Amount of material to buy.
    pub required: Decimal,
    pub unit: QuantityUnit,
    /// Coats used for painting; `None` for other projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<u8>,
}

impl Quantity {
    /// The value carried forward into the session's `measurement` field:
    /// litres for painting, the bare area otherwise.
    pub fn measurement(&self) -> Decimal {
        match self.project {
            ProjectType::Painting => self.required,
            ProjectType::Flooring | ProjectType::Garden => self.area,
        }
    }
}

/// Round half-up to two decimal places.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a raw dimension, clamping negative or non-finite input to zero.
pub fn sanitize_dimension(raw: f64) -> Decimal {
    if !raw.is_finite() || raw < 0.0 {
        warn!(value = raw, "Invalid dimension clamped to zero");
        return Decimal::ZERO;
    }
    match Decimal::from_f64(raw) {
        Some(value) => value,
        None => {
            warn!(value = raw, "Dimension out of decimal range, clamped to zero");
            Decimal::ZERO
        }
    }
}

/// `round(length * width, 2)` with clamped inputs.
///
/// A product outside the decimal range is clamped to zero like any other
/// unusable dimension.
pub fn area(length: f64, width: f64) -> Decimal {
    let (length, width) = (sanitize_dimension(length), sanitize_dimension(width));
    match length.checked_mul(width) {
        Some(area) => round2(area),
        None => {
            warn!(length = %length, width = %width, "Area out of decimal range, clamped to zero");
            Decimal::ZERO
        }
    }
}

/// Compute the quantity needed for `project` given room `dims`.
///
/// Only painting reads `dims.layers`; a value outside 1..=3 is rejected.
pub fn calculate(dims: &Dimensions, project: ProjectType) -> Result<Quantity, QuantityError> {
    let area = area(dims.length, dims.width);

    let (required, unit, layers) = match project {
        ProjectType::Flooring => (
            area.checked_mul(FLOORING_WASTE_FACTOR).map(round2),
            QuantityUnit::SquareMetres,
            None,
        ),
        ProjectType::Painting => {
            let layers = dims.layers.unwrap_or(DEFAULT_PAINT_LAYERS);
            if !PAINT_LAYER_RANGE.contains(&layers) {
                return Err(QuantityError::UnsupportedLayers(layers));
            }
            (
                area.checked_mul(Decimal::from(layers))
                    .and_then(|coated| coated.checked_div(PAINT_COVERAGE_SQM_PER_LITRE)),
                QuantityUnit::Litres,
                Some(layers),
            )
        }
        ProjectType::Garden => (Some(area), QuantityUnit::SquareMetres, None),
    };

    let (area, required) = match required {
        Some(required) => (area, required),
        None => {
            warn!(area = %area, project = %project, "Required quantity out of decimal range, clamped to zero");
            (Decimal::ZERO, Decimal::ZERO)
        }
    };

    Ok(Quantity {
        project,
        area,
        required,
        unit,
        layers,
    })
}
