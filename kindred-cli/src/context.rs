use std::path::Path;

use kindred::config::ConfigBuilder;
use kindred::prelude::*;

pub struct KindredCliContext {
    pub family_manager: FamilyManager,
}

impl KindredCliContext {
    /// Open (or create on first write) the snapshot at `snapshot`.
    pub async fn new(snapshot: &Path) -> kindred::Result<Self> {
        let config = ConfigBuilder::new().with_snapshot(snapshot).build()?;
        let family_manager = kindred::init(config).await?;

        Ok(Self { family_manager })
    }

    pub fn from_manager(family_manager: FamilyManager) -> Self {
        Self { family_manager }
    }
}
