//! Report data types.

use std::collections::BTreeSet;

use budgetline_shared::types::{AccountId, AccountTypeId, ReportNodeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::AccountBalance;

/// What a report node's balance is made of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportNodeKind {
    /// Sum of the child nodes.
    Aggregate,
    /// Sum of the listed accounts.
    Accounts {
        /// Accounts summed.
        account_ids: BTreeSet<AccountId>,
    },
    /// Sum of all accounts of the listed types.
    AccountType {
        /// Account types summed.
        account_type_ids: BTreeSet<AccountTypeId>,
    },
    /// Balance of another report node.
    NestedReport {
        /// Referenced node.
        report_id: ReportNodeId,
    },
}

impl ReportNodeKind {
    /// Returns true if the account contributes directly to this node.
    #[must_use]
    pub fn covers(&self, account: &AccountBalance) -> bool {
        match self {
            Self::Accounts { account_ids } => account_ids.contains(&account.account_id),
            Self::AccountType { account_type_ids } => {
                account_type_ids.contains(&account.account_type_id)
            }
            Self::Aggregate | Self::NestedReport { .. } => false,
        }
    }
}

/// Sign applied to a node's balance when it is displayed or rolled up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSign {
    /// Keep the balance sign.
    #[default]
    Preserve,
    /// Reverse the balance sign.
    Reverse,
}

impl ReportSign {
    /// Returns `1` or `-1`.
    #[must_use]
    pub fn factor(self) -> Decimal {
        match self {
            Self::Preserve => Decimal::ONE,
            Self::Reverse => Decimal::NEGATIVE_ONE,
        }
    }
}

/// How the accounts behind a node are listed under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayDetail {
    /// Only the node total.
    None,
    /// Accounts listed at the node's own level.
    #[default]
    Flat,
    /// Accounts nested one level under the node.
    Hierarchical,
}

/// Rendering style of a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStyle {
    /// Derived from the line level.
    #[default]
    Automatic,
    /// Bold, underlined.
    MainTitle,
    /// Bold.
    Title,
    /// Bold, smaller.
    Subtitle,
    /// Normal text.
    Normal,
    /// Italic, smaller.
    Italic,
    /// Smallest text.
    Smallest,
}

impl ReportStyle {
    /// Resolves `Automatic` for a line at `level`.
    #[must_use]
    pub fn resolve(self, level: u32) -> Self {
        match self {
            Self::Automatic => match level {
                0 => Self::MainTitle,
                1 => Self::Title,
                2 => Self::Subtitle,
                3 => Self::Normal,
                4 => Self::Italic,
                _ => Self::Smallest,
            },
            explicit => explicit,
        }
    }
}

/// A node of a financial report tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportNode {
    /// Node ID.
    pub id: ReportNodeId,
    /// Display name.
    pub name: String,
    /// Parent node.
    pub parent_id: Option<ReportNodeId>,
    /// Ordering among siblings.
    pub sequence: i32,
    /// Depth in the tree; roots are level 0.
    pub level: u32,
    /// Balance composition.
    pub kind: ReportNodeKind,
    /// Sign.
    pub sign: ReportSign,
    /// Account detail mode.
    pub display_detail: DisplayDetail,
    /// Style override.
    pub style: ReportStyle,
}

/// Definition of a node to insert into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReportNode {
    /// Node ID.
    #[serde(default)]
    pub id: ReportNodeId,
    /// Display name.
    pub name: String,
    /// Parent node.
    #[serde(default)]
    pub parent_id: Option<ReportNodeId>,
    /// Ordering among siblings.
    #[serde(default)]
    pub sequence: i32,
    /// Balance composition.
    pub kind: ReportNodeKind,
    /// Sign.
    #[serde(default)]
    pub sign: ReportSign,
    /// Account detail mode.
    #[serde(default)]
    pub display_detail: DisplayDetail,
    /// Style override.
    #[serde(default)]
    pub style: ReportStyle,
}

impl NewReportNode {
    /// A root node with default sign, detail and style.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ReportNodeKind) -> Self {
        Self {
            id: ReportNodeId::new(),
            name: name.into(),
            parent_id: None,
            sequence: 0,
            kind,
            sign: ReportSign::default(),
            display_detail: DisplayDetail::default(),
            style: ReportStyle::default(),
        }
    }

    /// Places the node under `parent_id` at `sequence`.
    #[must_use]
    pub fn under(mut self, parent_id: ReportNodeId, sequence: i32) -> Self {
        self.parent_id = Some(parent_id);
        self.sequence = sequence;
        self
    }
}

/// One rendered line of a financial report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    /// Node the line belongs to.
    pub node_id: ReportNodeId,
    /// Account, for account detail lines.
    pub account_id: Option<AccountId>,
    /// Label.
    pub name: String,
    /// Indentation level.
    pub level: u32,
    /// Displayed (signed) balance.
    pub balance: Decimal,
    /// Resolved style.
    pub style: ReportStyle,
}
