//! Free-shipping discount evaluation.
//!
//! The checkout pipeline hands us an input envelope carrying the merchant's
//! goal configuration (a JSON-encoded metafield string) and a snapshot of the
//! shopper's cart. We decide whether the cart qualifies for a 100%-off
//! shipping discount across all delivery groups.
//!
//! Evaluation is pure and total: it never reads ambient state and never
//! fails. Malformed or missing values normalize to zero/defaults, which
//! surfaces as "no discount" rather than an error — a thrown error here would
//! abort discount calculation for the whole cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message shown to the shopper when the merchant never set one.
pub const DEFAULT_GOAL_TEXT: &str = "Free Shipping";

const FULL_PERCENTAGE: &str = "100";

// ---------------------------------------------------------------------------
// Input envelope
// ---------------------------------------------------------------------------

/// The input envelope supplied by the checkout pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunInput {
    pub discount_node: DiscountNode,
    pub cart: Cart,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscountNode {
    pub metafield: Option<Metafield>,
}

/// Configuration carrier: `value` is itself a JSON-encoded string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Metafield {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cart {
    pub cost: CartCost,
    pub delivery_groups: Vec<DeliveryGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: MoneyAmount,
}

/// A decimal amount on the wire. Accepts either a decimal string or a bare
/// JSON number; anything else normalizes to zero at evaluation time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MoneyAmount {
    pub amount: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeliveryGroup {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Goal configuration
// ---------------------------------------------------------------------------

/// Raw merchant configuration as stored in the metafield value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalConfiguration {
    goal_amount: Option<Value>,
    goal_text: Option<String>,
}

/// The merchant's free-shipping goal, normalized for evaluation.
///
/// `amount <= 0` means "no active goal": the evaluator never grants a
/// discount regardless of cart contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub amount: Decimal,
    pub text: Option<String>,
}

impl Goal {
    /// Decode a goal from a raw metafield value.
    ///
    /// A missing value or invalid JSON yields the empty configuration, which
    /// normalizes to a zero amount and therefore never qualifies.
    #[must_use]
    pub fn from_metafield(raw: Option<&str>) -> Self {
        let configuration: GoalConfiguration = raw
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default();

        Goal {
            amount: decimal_from_value(configuration.goal_amount.as_ref()),
            text: configuration.goal_text,
        }
    }
}

// ---------------------------------------------------------------------------
// Output envelope
// ---------------------------------------------------------------------------

/// The evaluator's decision: zero or one discount applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub discounts: Vec<Discount>,
}

impl RunResult {
    /// The empty decision: no discount applies.
    #[must_use]
    pub fn empty() -> Self {
        RunResult { discounts: vec![] }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub message: String,
    pub targets: Vec<DiscountTarget>,
    pub value: DiscountValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountTarget {
    pub delivery_group: DeliveryGroupTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryGroupTarget {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountValue {
    pub percentage: Percentage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentage {
    pub value: String,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Decode the envelope's configuration and evaluate the cart against it.
#[must_use]
pub fn run(input: &RunInput) -> RunResult {
    let goal = Goal::from_metafield(
        input
            .discount_node
            .metafield
            .as_ref()
            .and_then(|m| m.value.as_deref()),
    );
    evaluate(&goal, &input.cart)
}

/// Decide whether the cart earns the free-shipping discount.
///
/// Qualification is `goal.amount > 0 && subtotal >= goal.amount` (inclusive
/// threshold). On qualification, one target is built per delivery group,
/// preserving their order; a qualifying cart with no delivery groups still
/// emits the discount application, with an empty target set, which is a no-op
/// when applied.
#[must_use]
pub fn evaluate(goal: &Goal, cart: &Cart) -> RunResult {
    let subtotal = decimal_from_value(cart.cost.subtotal_amount.amount.as_ref());

    if goal.amount <= Decimal::ZERO || subtotal < goal.amount {
        return RunResult::empty();
    }

    let targets = cart
        .delivery_groups
        .iter()
        .map(|group| DiscountTarget {
            delivery_group: DeliveryGroupTarget {
                id: group.id.clone(),
            },
        })
        .collect();

    RunResult {
        discounts: vec![Discount {
            message: goal
                .text
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_GOAL_TEXT.to_string()),
            targets,
            value: DiscountValue {
                percentage: Percentage {
                    value: FULL_PERCENTAGE.to_string(),
                },
            },
        }],
    }
}

/// Total decimal parsing: a decimal string or JSON number, else zero.
fn decimal_from_value(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::String(s)) => s.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO),
        // JSON numbers round-trip through their literal text, which Decimal
        // parses without the precision loss of going through f64.
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}
