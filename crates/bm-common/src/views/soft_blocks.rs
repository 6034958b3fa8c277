use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::{ceil_days, parse_loose};
use crate::model::{Resource, SoftBlock};

impl SoftBlock {
    fn end(&self) -> Option<DateTime<Utc>> {
        parse_loose(&self.end_date)
    }

    /// Ends strictly after `now`. Blocks with no readable end are neither
    /// active nor expired.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.end().is_some_and(|end| end > now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end().is_some_and(|end| end <= now)
    }

    /// Whole days left, rounded up. Only defined for active blocks.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        let end = self.end()?;
        (end > now).then(|| ceil_days(now, end))
    }
}

/// A soft block with the owning resource's display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBlock {
    #[serde(flatten)]
    pub block: SoftBlock,
    pub resource_name: String,
    pub resource_designation: String,
    pub resource_location: String,
}

pub fn collect_soft_blocks(resources: &[Resource]) -> Vec<ResourceBlock> {
    resources
        .iter()
        .flat_map(|resource| {
            resource.soft_blocks.iter().map(move |block| ResourceBlock {
                block: block.clone(),
                resource_name: resource.name.clone(),
                resource_designation: resource.designation.clone(),
                resource_location: resource.location.clone(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockFilter {
    #[default]
    All,
    Active,
    Expired,
}

pub fn filter_blocks(
    blocks: Vec<ResourceBlock>,
    filter: BlockFilter,
    now: DateTime<Utc>,
) -> Vec<ResourceBlock> {
    match filter {
        BlockFilter::All => blocks,
        BlockFilter::Active => blocks.into_iter().filter(|b| b.block.is_active(now)).collect(),
        BlockFilter::Expired => blocks.into_iter().filter(|b| b.block.is_expired(now)).collect(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
}

impl BlockSummary {
    pub fn from_blocks(blocks: &[ResourceBlock], now: DateTime<Utc>) -> Self {
        Self {
            total: blocks.len(),
            active: blocks.iter().filter(|b| b.block.is_active(now)).count(),
            expired: blocks.iter().filter(|b| b.block.is_expired(now)).count(),
        }
    }
}
