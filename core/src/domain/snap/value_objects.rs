use uuid::Uuid;

use crate::domain::recipe::entities::{GroundingChunk, ImageAsset, ParsedRecipe};

/// Snaps returned by the recent list when no limit is given.
pub const DEFAULT_SNAP_LIMIT: u64 = 4;
pub const MAX_SNAP_LIMIT: u64 = 50;

/// Everything needed to persist a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveSnapInput {
    pub image: ImageAsset,
    pub selected_ingredients: Vec<String>,
    pub raw_recipe_content: String,
    pub search_queries: Vec<String>,
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSnap {
    pub image_url: String,
    pub selected_ingredients: Vec<String>,
    pub raw_recipe_content: String,
    pub search_queries: Vec<String>,
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSnapRecipe {
    pub parent_snap: Uuid,
    pub recipe: ParsedRecipe,
}

pub fn clamp_snap_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_SNAP_LIMIT).clamp(1, MAX_SNAP_LIMIT)
}
