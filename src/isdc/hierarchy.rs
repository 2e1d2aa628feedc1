//! Explicit ISDC code tree.
//!
//! ISDC codes encode their own position in the hierarchy:
//!
//! | Digits | Level | Parent |
//! |--------|-------|--------|
//! | 2      | L1 (principal activity) | none |
//! | 4      | L2 (activity group)     | first 2 digits |
//! | 5+     | L3 (detailed activity)  | first 4 digits |
//!
//! The tree resolves these relations once, when it is built. Aggregation then
//! follows parent links instead of slicing strings, and a code that does not
//! resolve is unassigned rather than silently misfiled.

use crate::core::IsdcCodeEntry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Bucket key for items whose code is missing, malformed, or unknown.
pub const UNASSIGNED: &str = "UNASSIGNED";

const L1_DIGITS: usize = 2;
const L2_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IsdcLevel {
    L1,
    L2,
    L3,
}

impl IsdcLevel {
    /// Classify a code by its shape. `None` for anything that is not a
    /// plain run of ASCII digits with a valid length.
    pub fn classify(code: &str) -> Option<Self> {
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match code.len() {
            L1_DIGITS => Some(Self::L1),
            L2_DIGITS => Some(Self::L2),
            n if n > L2_DIGITS => Some(Self::L3),
            _ => None,
        }
    }

    /// Code of the parent node implied by the code's prefix.
    fn parent_code(self, code: &str) -> Option<&str> {
        match self {
            Self::L1 => None,
            Self::L2 => Some(&code[..L1_DIGITS]),
            Self::L3 => Some(&code[..L2_DIGITS]),
        }
    }
}

impl fmt::Display for IsdcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L3 => write!(f, "L3"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsdcNode {
    pub code: String,
    pub level: IsdcLevel,
    pub parent: Option<String>,
    pub title: Option<String>,
}

/// Why a code could not be placed in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedCode {
    pub code: String,
    pub reason: String,
}

/// Resolved path from a leaf up to its principal activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsdcPath<'a> {
    pub leaf: &'a IsdcNode,
    pub l2: &'a IsdcNode,
    pub l1: &'a IsdcNode,
}

/// Canonical ISDC code table with resolved parent links.
#[derive(Debug, Clone, Default)]
pub struct IsdcTree {
    l1: BTreeMap<String, IsdcNode>,
    l2: BTreeMap<String, IsdcNode>,
    l3: BTreeMap<String, IsdcNode>,
    rejected: Vec<RejectedCode>,
}

impl IsdcTree {
    /// Build from a canonical code table.
    ///
    /// Entries may come in any order. Codes that are malformed, duplicated,
    /// or whose parent is not in the table are rejected and listed by
    /// [`IsdcTree::rejected`].
    pub fn from_codes<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a IsdcCodeEntry>,
    {
        let mut tree = Self::default();
        let mut by_level: [Vec<&IsdcCodeEntry>; 3] = [Vec::new(), Vec::new(), Vec::new()];

        for entry in entries {
            match IsdcLevel::classify(&entry.code) {
                Some(IsdcLevel::L1) => by_level[0].push(entry),
                Some(IsdcLevel::L2) => by_level[1].push(entry),
                Some(IsdcLevel::L3) => by_level[2].push(entry),
                None => tree.reject(&entry.code, "not a 2, 4 or 5+ digit ISDC code"),
            }
        }

        // Parents must exist before children can link to them
        for (level, entries) in [IsdcLevel::L1, IsdcLevel::L2, IsdcLevel::L3]
            .into_iter()
            .zip(by_level)
        {
            for entry in entries {
                tree.insert(level, &entry.code, entry.title.clone());
            }
        }

        tree
    }

    /// Build a tree covering every well-formed code in `codes`.
    ///
    /// Ancestors are created from code prefixes. Used when the caller has
    /// no canonical table; malformed codes are ignored here and end up
    /// unassigned at aggregation time.
    pub fn infer_from_codes<'a, I>(codes: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tree = Self::default();

        for code in codes {
            let Some(level) = IsdcLevel::classify(code) else {
                continue;
            };
            tree.ensure(IsdcLevel::L1, &code[..L1_DIGITS]);
            if level >= IsdcLevel::L2 {
                tree.ensure(IsdcLevel::L2, &code[..L2_DIGITS]);
            }
            if level == IsdcLevel::L3 {
                tree.ensure(IsdcLevel::L3, code);
            }
        }

        tree
    }

    fn ensure(&mut self, level: IsdcLevel, code: &str) {
        if self.level_map(level).contains_key(code) {
            return;
        }
        self.insert(level, code, None);
    }

    fn insert(&mut self, level: IsdcLevel, code: &str, title: Option<String>) {
        if self.level_map(level).contains_key(code) {
            self.reject(code, "duplicate code");
            return;
        }

        let parent = level.parent_code(code);
        if let Some(parent) = parent {
            let parent_level = match level {
                IsdcLevel::L3 => IsdcLevel::L2,
                _ => IsdcLevel::L1,
            };
            if !self.level_map(parent_level).contains_key(parent) {
                self.reject(code, format!("parent {parent_level} code '{parent}' is not defined"));
                return;
            }
        }

        let node = IsdcNode {
            code: code.to_string(),
            level,
            parent: parent.map(str::to_string),
            title,
        };
        self.level_map_mut(level).insert(code.to_string(), node);
    }

    fn reject(&mut self, code: &str, reason: impl Into<String>) {
        self.rejected.push(RejectedCode {
            code: code.to_string(),
            reason: reason.into(),
        });
    }

    fn level_map(&self, level: IsdcLevel) -> &BTreeMap<String, IsdcNode> {
        match level {
            IsdcLevel::L1 => &self.l1,
            IsdcLevel::L2 => &self.l2,
            IsdcLevel::L3 => &self.l3,
        }
    }

    fn level_map_mut(&mut self, level: IsdcLevel) -> &mut BTreeMap<String, IsdcNode> {
        match level {
            IsdcLevel::L1 => &mut self.l1,
            IsdcLevel::L2 => &mut self.l2,
            IsdcLevel::L3 => &mut self.l3,
        }
    }

    pub fn node(&self, level: IsdcLevel, code: &str) -> Option<&IsdcNode> {
        self.level_map(level).get(code)
    }

    pub fn parent_of(&self, node: &IsdcNode) -> Option<&IsdcNode> {
        let parent = node.parent.as_deref()?;
        match node.level {
            IsdcLevel::L1 => None,
            IsdcLevel::L2 => self.l1.get(parent),
            IsdcLevel::L3 => self.l2.get(parent),
        }
    }

    /// Resolve an item code to its leaf, activity group and principal
    /// activity.
    ///
    /// Items are normally booked against L3 codes, but an item booked
    /// directly against an L2 group resolves with that group as its leaf.
    pub fn resolve(&self, code: &str) -> Option<IsdcPath<'_>> {
        let leaf = self.l3.get(code).or_else(|| self.l2.get(code))?;
        let l2 = match leaf.level {
            IsdcLevel::L3 => self.parent_of(leaf)?,
            _ => leaf,
        };
        let l1 = self.parent_of(l2)?;
        Some(IsdcPath { leaf, l2, l1 })
    }

    pub fn rejected(&self) -> &[RejectedCode] {
        &self.rejected
    }

    pub fn nodes(&self, level: IsdcLevel) -> impl Iterator<Item = &IsdcNode> {
        self.level_map(level).values()
    }

    pub fn len(&self) -> usize {
        self.l1.len() + self.l2.len() + self.l3.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
