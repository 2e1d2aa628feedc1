//! ISDC hierarchy and cost roll-up.

pub mod aggregate;
pub mod hierarchy;

pub use aggregate::{aggregate, aggregate_with_tree, BucketShare, BucketTotal, IsdcRollup};
pub use hierarchy::{IsdcLevel, IsdcNode, IsdcPath, IsdcTree, RejectedCode, UNASSIGNED};
