//! Cart accumulation — how tool and material lists merge into the session cart.

use serde::{Deserialize, Serialize};

/// How an incoming item list combines with the existing cart.
///
/// The policy is fixed per event: demolition, support check and installation
/// items append; the generic tools step replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// `cart ++ items`, order kept, duplicates allowed.
    Append,
    /// `items`, prior contents dropped.
    Replace,
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Append => write!(f, "append"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

/// Produce the cart that results from merging `items` into `cart`.
pub fn merge<I, S>(cart: &[String], items: I, policy: MergePolicy) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match policy {
        MergePolicy::Append => cart
            .iter()
            .cloned()
            .chain(items.into_iter().map(Into::into))
            .collect(),
        MergePolicy::Replace => items.into_iter().map(Into::into).collect(),
    }
}

/// Cart lines grouped by name with counts, in first-seen order.
///
/// The cart itself keeps duplicates; this is a view for the receipt.
pub fn tally(cart: &[String]) -> Vec<(String, u32)> {
    let mut lines: Vec<(String, u32)> = Vec::new();
    for name in cart {
        match lines.iter_mut().find(|(n, _)| n == name) {
            Some((_, count)) => *count += 1,
            None => lines.push((name.clone(), 1)),
        }
    }
    lines
}
