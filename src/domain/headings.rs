//! Document outline: flat heading records grouped into a table-of-contents forest.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Deepest heading level HTML can express (`<h6>`).
pub const MAX_HEADING_LEVEL: u8 = 6;

/// One heading extracted from rendered markup, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRecord {
    pub title: String,
    pub anchor: String,
    pub level: u8,
}

impl HeadingRecord {
    pub fn new(title: impl Into<String>, anchor: impl Into<String>, level: u8) -> Self {
        Self {
            title: title.into(),
            anchor: anchor.into(),
            level,
        }
    }
}

/// Node of the outline forest. Children always sit exactly one level deeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingNode {
    pub title: String,
    pub anchor: String,
    pub level: u8,
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    fn leaf(record: &HeadingRecord) -> Self {
        Self {
            title: record.title.clone(),
            anchor: record.anchor.clone(),
            level: record.level,
            children: Vec::new(),
        }
    }

    fn untitled(level: u8) -> Self {
        Self {
            title: String::new(),
            anchor: String::new(),
            level,
            children: Vec::new(),
        }
    }

    /// Pre-order walk over a forest.
    pub fn walk<'a>(forest: &'a [HeadingNode], visit: &mut impl FnMut(&'a HeadingNode)) {
        for node in forest {
            visit(node);
            HeadingNode::walk(&node.children, visit);
        }
    }
}

/// What to do with headings that appear before any heading of the level being grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Orphans contribute no node at that level.
    #[default]
    Drop,
    /// Orphans are gathered under an untitled node of the missing level.
    Group,
}

/// Group a flat heading sequence into an outline, dropping orphans.
pub fn build_forest(records: &[HeadingRecord]) -> Vec<HeadingNode> {
    build_forest_with(records, OrphanPolicy::Drop)
}

/// Group a flat heading sequence into an outline using the given orphan policy.
pub fn build_forest_with(records: &[HeadingRecord], policy: OrphanPolicy) -> Vec<HeadingNode> {
    group_level(records.iter().collect(), 1, policy)
}

struct Accumulator<'r> {
    node: HeadingNode,
    pending: Vec<&'r HeadingRecord>,
}

impl<'r> Accumulator<'r> {
    fn close(self, level: u8, policy: OrphanPolicy) -> HeadingNode {
        let Accumulator { mut node, pending } = self;
        if !pending.is_empty() {
            node.children = group_level(pending, level + 1, policy);
        }
        node
    }
}

fn group_level(records: Vec<&HeadingRecord>, level: u8, policy: OrphanPolicy) -> Vec<HeadingNode> {
    if level > MAX_HEADING_LEVEL {
        return Vec::new();
    }

    let mut forest = Vec::new();
    let mut current: Option<Accumulator<'_>> = None;

    for record in records {
        if record.level == level {
            if let Some(previous) = current.take() {
                forest.push(previous.close(level, policy));
            }
            current = Some(Accumulator {
                node: HeadingNode::leaf(record),
                pending: Vec::new(),
            });
            continue;
        }

        match (current.as_mut(), policy) {
            (Some(accumulator), _) => accumulator.pending.push(record),
            (None, OrphanPolicy::Group) => {
                current = Some(Accumulator {
                    node: HeadingNode::untitled(level),
                    pending: vec![record],
                });
            }
            (None, OrphanPolicy::Drop) => {
                debug!(
                    target = "domain::headings",
                    level,
                    heading_level = record.level,
                    anchor = %record.anchor,
                    "Dropping heading without a parent at this level"
                );
            }
        }
    }

    if let Some(last) = current {
        forest.push(last.close(level, policy));
    }

    forest
}
