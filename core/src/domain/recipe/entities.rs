use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Image supplied by the user, kept in memory for the lifetime of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub bytes: Bytes,
    pub mime_type: String,
    pub file_name: Option<String>,
}

impl ImageAsset {
    pub fn new(bytes: Bytes, mime_type: impl Into<String>, file_name: Option<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            file_name,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension used for the storage key.
    ///
    /// Taken from the original file name when it has one, otherwise derived
    /// from the mime type. Falls back to `jpeg`.
    pub fn extension(&self) -> String {
        if let Some(ext) = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return ext;
        }

        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            "image/heic" => "heic",
            "image/gif" => "gif",
            _ => "jpeg",
        }
        .to_string()
    }
}

/// One food item recognised in the photo.
///
/// The model may attach more keys than `label`; they are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetectionItem {
    pub label: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DetectionItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebSource {
    pub title: String,
    pub uri: String,
}

/// A page the grounded search cited, in the `{ "web": { title, uri } }` shape
/// Gemini returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GroundingChunk {
    pub web: WebSource,
}

impl GroundingChunk {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            web: WebSource {
                title: title.into(),
                uri: uri.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub search_queries: Vec<String>,
    pub where_it_searched: Vec<GroundingChunk>,
    pub response: String,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.search_queries.is_empty() && self.where_it_searched.is_empty() && self.response.is_empty()
    }
}

/// Raw answer of a search-augmented generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundedResponse {
    pub text: String,
    pub web_search_queries: Vec<String>,
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub fn as_str(&self) -> &str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

impl TryFrom<&str> for MealType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            other => Err(format!("unknown meal type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    pub description: String,
    pub time_to_complete: String,
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRecipe {
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub title: String,
    pub total_time: String,
    pub steps: Vec<RecipeStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_item_keeps_extra_fields() {
        let item: DetectionItem =
            serde_json::from_str(r#"{"label":"Eggs","quantity":6,"box_2d":[1,2,3,4]}"#).unwrap();

        assert_eq!(item.label, "Eggs");
        assert_eq!(item.extra.get("quantity"), Some(&serde_json::json!(6)));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["box_2d"], serde_json::json!([1, 2, 3, 4]));
        assert_eq!(back["label"], "Eggs");
    }

    #[test]
    fn parsed_recipe_uses_camel_case_and_type_key() {
        let json = r#"{
            "type": "dinner",
            "title": "Omelette",
            "totalTime": "15 minutes",
            "steps": [
                {"description": "Whisk", "timeToComplete": "2 minutes", "ingredients": ["Egg"]}
            ]
        }"#;

        let recipe: ParsedRecipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.meal_type, MealType::Dinner);
        assert_eq!(recipe.total_time, "15 minutes");
        assert_eq!(recipe.steps[0].time_to_complete, "2 minutes");
    }

    #[test]
    fn unknown_meal_type_is_rejected() {
        let json = r#"{"type":"brunch","title":"x","totalTime":"1","steps":[]}"#;
        assert!(serde_json::from_str::<ParsedRecipe>(json).is_err());
        assert!(MealType::try_from("brunch").is_err());
    }

    #[test]
    fn image_extension_prefers_file_name() {
        let image = ImageAsset::new(Bytes::from_static(b"x"), "image/jpeg", Some("fridge.PNG".into()));
        assert_eq!(image.extension(), "png");

        let image = ImageAsset::new(Bytes::from_static(b"x"), "image/webp", None);
        assert_eq!(image.extension(), "webp");

        let image = ImageAsset::new(Bytes::from_static(b"x"), "application/octet-stream", Some("noext".into()));
        assert_eq!(image.extension(), "jpeg");
    }
}
