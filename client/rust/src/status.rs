//! Order status workflow.
//!
//! The fulfillment workflow is a small state machine over [`OrderStatus`].
//! The table here is advisory: it decides which transitions a client offers,
//! while the backend remains the authority on what it accepts.
//!
//! ```text
//! NEW -> PRINT -> PICKING_UP -> PROCESSING -> SHIPPING -> DELIVERED
//!  ^       |          |             |            |           |
//!  |       +----------+-------------+------------+--> MISSING |
//!  +--------------------------------------------------- MISSING
//!  every status except REFUND --------------------------> REFUND (terminal)
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Status of an order in the fulfillment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum OrderStatus {
    New,
    Print,
    PickingUp,
    Processing,
    Shipping,
    Delivered,
    Missing,
    Refund,
}

/// A status string outside the enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid order status: {0:?}")]
pub struct InvalidStatus(pub String);

use OrderStatus::*;

const FROM_NEW: &[OrderStatus] = &[Print, Missing, Refund];
const FROM_PRINT: &[OrderStatus] = &[PickingUp, Missing, Refund];
const FROM_PICKING_UP: &[OrderStatus] = &[Processing, Missing, Refund];
const FROM_PROCESSING: &[OrderStatus] = &[Shipping, Missing, Refund];
const FROM_SHIPPING: &[OrderStatus] = &[Delivered, Missing, Refund];
const FROM_DELIVERED: &[OrderStatus] = &[Refund];
const FROM_MISSING: &[OrderStatus] = &[New, Refund];
const FROM_REFUND: &[OrderStatus] = &[];

impl OrderStatus {
    /// Every status, in Kanban column order.
    pub const ALL: [OrderStatus; 8] = [
        New, Print, PickingUp, Processing, Shipping, Delivered, Missing, Refund,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            New => "NEW",
            Print => "PRINT",
            PickingUp => "PICKING_UP",
            Processing => "PROCESSING",
            Shipping => "SHIPPING",
            Delivered => "DELIVERED",
            Missing => "MISSING",
            Refund => "REFUND",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            New => "New",
            Print => "Print",
            PickingUp => "Picking Up",
            Processing => "Processing",
            Shipping => "Shipping",
            Delivered => "Delivered",
            Missing => "Missing",
            Refund => "Refund",
        }
    }

    /// Statuses reachable in one step, in the order they should be offered.
    pub fn transitions(self) -> &'static [OrderStatus] {
        match self {
            New => FROM_NEW,
            Print => FROM_PRINT,
            PickingUp => FROM_PICKING_UP,
            Processing => FROM_PROCESSING,
            Shipping => FROM_SHIPPING,
            Delivered => FROM_DELIVERED,
            Missing => FROM_MISSING,
            Refund => FROM_REFUND,
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.transitions().contains(&next)
    }

    /// The forward edge along the happy path, if any.
    ///
    /// MISSING and REFUND are exits, never primary; MISSING's primary edge
    /// is its recovery back to NEW.
    pub fn primary_next(self) -> Option<OrderStatus> {
        self.transitions()
            .first()
            .copied()
            .filter(|next| !matches!(next, Missing | Refund))
    }

    /// True once no further transition is possible.
    pub fn is_terminal(self) -> bool {
        self.transitions().is_empty()
    }

    /// Kanban board column ordering.
    pub fn kanban_columns() -> &'static [OrderStatus] {
        &Self::ALL
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = InvalidStatus;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// Transition table consulted before offering or sending a status change.
///
/// Defaults to the builtin workflow. An override can be loaded when the
/// backend's policy is known to differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    rows: Vec<Vec<OrderStatus>>,
}

impl TransitionTable {
    pub fn builtin() -> Self {
        Self {
            rows: OrderStatus::ALL
                .iter()
                .map(|status| status.transitions().to_vec())
                .collect(),
        }
    }

    /// Build a table from `status -> [status]` strings.
    ///
    /// Every status needs exactly one row (an empty list marks it terminal)
    /// and no status may list itself. Keys are case-insensitive, so `NEW` and
    /// `new` name the same row.
    pub fn from_map(map: &HashMap<String, Vec<String>>) -> Result<Self> {
        let mut rows: Vec<Option<Vec<OrderStatus>>> = vec![None; OrderStatus::ALL.len()];

        for (from, targets) in map {
            let from: OrderStatus = from.parse()?;
            if rows[from.index()].is_some() {
                return Err(ClientError::InvalidArgument(format!(
                    "{from} has more than one transition row"
                )));
            }
            let mut row = Vec::with_capacity(targets.len());
            for target in targets {
                let to: OrderStatus = target.parse()?;
                if to == from {
                    return Err(ClientError::InvalidArgument(format!(
                        "{from} cannot transition to itself"
                    )));
                }
                if !row.contains(&to) {
                    row.push(to);
                }
            }
            rows[from.index()] = Some(row);
        }

        let rows = OrderStatus::ALL
            .iter()
            .zip(rows)
            .map(|(status, row)| {
                row.ok_or_else(|| {
                    ClientError::InvalidArgument(format!("no transitions defined for {status}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rows })
    }

    pub fn transitions(&self, from: OrderStatus) -> &[OrderStatus] {
        &self.rows[from.index()]
    }

    pub fn can_transition(&self, from: OrderStatus, to: OrderStatus) -> bool {
        self.transitions(from).contains(&to)
    }

    /// Fails with `InvalidTransition` when `to` is not offered from `from`.
    pub fn check(&self, from: OrderStatus, to: OrderStatus) -> Result<()> {
        if self.can_transition(from, to) {
            Ok(())
        } else {
            Err(ClientError::InvalidTransition { from, to })
        }
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::builtin()
    }
}
