use chrono::{DateTime, Utc};
use dachef_core::domain::{
    recipe::entities::{DetectionItem, ParsedRecipe, SearchResult},
    snap::entities::PersistenceStatus,
    workflow::entities::{WorkflowSession, WorkflowStage},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ImageView {
    pub mime_type: String,
    pub size_bytes: usize,
    pub file_name: Option<String>,
}

/// Client-facing view of a session. Image bytes stay on the server.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SessionView {
    pub id: Uuid,
    pub run_id: Uuid,
    pub stage: WorkflowStage,
    pub image: Option<ImageView>,
    pub image_url: Option<String>,
    pub detected_items: Vec<DetectionItem>,
    pub selection: Vec<String>,
    pub search_result: Option<SearchResult>,
    pub parsed_recipes: Vec<ParsedRecipe>,
    pub last_error: Option<String>,
    pub persistence: PersistenceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkflowSession> for SessionView {
    fn from(session: WorkflowSession) -> Self {
        Self {
            id: session.id,
            run_id: session.run_id,
            stage: session.stage,
            image: session.image.map(|image| ImageView {
                mime_type: image.mime_type,
                size_bytes: image.bytes.len(),
                file_name: image.file_name,
            }),
            image_url: session.image_url,
            detected_items: session.detected_items,
            selection: session.selection,
            search_result: session.search_result,
            parsed_recipes: session.parsed_recipes,
            last_error: session.last_error,
            persistence: session.persistence,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SessionResponse {
    pub data: SessionView,
}

impl From<WorkflowSession> for SessionResponse {
    fn from(session: WorkflowSession) -> Self {
        Self {
            data: SessionView::from(session),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use dachef_core::domain::{recipe::entities::ImageAsset, workflow::entities::WorkflowAction};

    use super::*;

    #[test]
    fn view_describes_the_image_without_its_bytes() {
        let mut session = WorkflowSession::new();
        session.apply(WorkflowAction::ImageAcquired).unwrap();
        session.image = Some(ImageAsset::new(
            Bytes::from_static(b"12345"),
            "image/png",
            Some("fridge.png".to_string()),
        ));

        let json = serde_json::to_value(SessionResponse::from(session)).unwrap();

        assert_eq!(json["data"]["stage"], "awaiting_confirmation");
        assert_eq!(json["data"]["image"]["size_bytes"], 5);
        assert_eq!(json["data"]["image"]["mime_type"], "image/png");
        assert_eq!(json["data"]["persistence"]["status"], "not_started");
    }
}
