use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_uuid_v7},
    recipe::entities::{DetectionItem, ImageAsset, ParsedRecipe, SearchResult},
    snap::entities::{PersistenceStatus, SnapWithRecipes},
};

/// Stages of a recipe run, in the order a run moves through them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    AwaitingImage,
    AwaitingConfirmation,
    DetectingItems,
    AwaitingSelection,
    GeneratingRecipe,
    DisplayingRawRecipe,
    DisplayingParsedRecipe,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::AwaitingImage => "awaiting_image",
            WorkflowStage::AwaitingConfirmation => "awaiting_confirmation",
            WorkflowStage::DetectingItems => "detecting_items",
            WorkflowStage::AwaitingSelection => "awaiting_selection",
            WorkflowStage::GeneratingRecipe => "generating_recipe",
            WorkflowStage::DisplayingRawRecipe => "displaying_raw_recipe",
            WorkflowStage::DisplayingParsedRecipe => "displaying_parsed_recipe",
        }
    }

    /// Transition table. `None` means the action is not allowed here.
    pub fn next(self, action: WorkflowAction) -> Option<WorkflowStage> {
        use WorkflowAction as A;
        use WorkflowStage as S;

        match (self, action) {
            (S::AwaitingImage, A::Reset) => None,
            (_, A::Reset) => Some(S::AwaitingImage),
            (S::AwaitingImage | S::AwaitingConfirmation, A::ImageAcquired) => {
                Some(S::AwaitingConfirmation)
            }
            (S::AwaitingConfirmation, A::Confirm) => Some(S::DetectingItems),
            (S::DetectingItems, A::DetectionCompleted) => Some(S::AwaitingSelection),
            (S::AwaitingSelection, A::SelectionMade) => Some(S::GeneratingRecipe),
            (S::GeneratingRecipe, A::SearchCompleted) => Some(S::DisplayingRawRecipe),
            (S::DisplayingRawRecipe, A::ParseCompleted) => Some(S::DisplayingParsedRecipe),
            _ => None,
        }
    }

    pub fn allows(self, action: WorkflowAction) -> bool {
        self.next(action).is_some()
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    ImageAcquired,
    Confirm,
    DetectionCompleted,
    SelectionMade,
    SearchCompleted,
    ParseCompleted,
    Reset,
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowAction::ImageAcquired => "image_acquired",
            WorkflowAction::Confirm => "confirm",
            WorkflowAction::DetectionCompleted => "detection_completed",
            WorkflowAction::SelectionMade => "selection_made",
            WorkflowAction::SearchCompleted => "search_completed",
            WorkflowAction::ParseCompleted => "parse_completed",
            WorkflowAction::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// State of one user's pass from photo to recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSession {
    pub id: Uuid,
    /// Changes on every reset. Background steps started under an older run
    /// id drop their results.
    pub run_id: Uuid,
    pub stage: WorkflowStage,
    pub image: Option<ImageAsset>,
    /// Public URL of the stored photo, known once the run is persisted or resumed.
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

impl WorkflowSession {
    pub fn new() -> Self {
        let now = Utc::now();

        Self {
            id: generate_uuid_v7(),
            run_id: Uuid::new_v4(),
            stage: WorkflowStage::AwaitingImage,
            image: None,
            image_url: None,
            detected_items: Vec::new(),
            selection: Vec::new(),
            search_result: None,
            parsed_recipes: Vec::new(),
            last_error: None,
            persistence: PersistenceStatus::NotStarted,
            created_at: now,
            updated_at: now,
        }
    }

    /// A session already at the terminal stage, rebuilt from a saved snap.
    pub fn from_snap(saved: SnapWithRecipes, image_url: String) -> Self {
        let mut session = Self::new();
        let recipes_saved = saved.recipes.len();

        session.stage = WorkflowStage::DisplayingParsedRecipe;
        session.image_url = Some(image_url);
        session.detected_items = saved
            .snap
            .selected_ingredients
            .iter()
            .map(DetectionItem::new)
            .collect();
        session.selection = saved.snap.selected_ingredients.clone();
        session.search_result = Some(saved.snap.search_result());
        session.parsed_recipes = saved.recipes.into_iter().map(ParsedRecipe::from).collect();
        session.persistence = PersistenceStatus::Saved {
            snap_id: saved.snap.id,
            recipes_saved,
            recipes_failed: 0,
        };

        session
    }

    /// Move along the transition table. A rejected action leaves the session untouched.
    pub fn apply(&mut self, action: WorkflowAction) -> Result<WorkflowStage, CoreError> {
        let next = self
            .stage
            .next(action)
            .ok_or(CoreError::InvalidTransition {
                from: self.stage,
                action,
            })?;

        if action == WorkflowAction::Reset {
            self.clear();
        }

        self.stage = next;
        self.updated_at = Utc::now();

        Ok(next)
    }

    /// Check an action would be accepted without applying it.
    pub fn ensure_allowed(&self, action: WorkflowAction) -> Result<(), CoreError> {
        if self.stage.allows(action) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.stage,
                action,
            })
        }
    }

    /// Raw recipe text is shown and parsing has not finished yet.
    pub fn awaits_parse(&self) -> bool {
        self.stage == WorkflowStage::DisplayingRawRecipe
    }

    /// True when `other` is this session in the same run.
    pub fn same_run(&self, other: &WorkflowSession) -> bool {
        self.id == other.id && self.run_id == other.run_id
    }

    fn clear(&mut self) {
        self.run_id = Uuid::new_v4();
        self.image = None;
        self.image_url = None;
        self.detected_items.clear();
        self.selection.clear();
        self.search_result = None;
        self.parsed_recipes.clear();
        self.last_error = None;
        self.persistence = PersistenceStatus::NotStarted;
    }
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use chrono::Utc;

    use super::*;
    use crate::domain::{
        recipe::entities::MealType,
        snap::entities::{Snap, SnapRecipe},
    };

    const ALL_STAGES: [WorkflowStage; 7] = [
        WorkflowStage::AwaitingImage,
        WorkflowStage::AwaitingConfirmation,
        WorkflowStage::DetectingItems,
        WorkflowStage::AwaitingSelection,
        WorkflowStage::GeneratingRecipe,
        WorkflowStage::DisplayingRawRecipe,
        WorkflowStage::DisplayingParsedRecipe,
    ];

    const ALL_ACTIONS: [WorkflowAction; 7] = [
        WorkflowAction::ImageAcquired,
        WorkflowAction::Confirm,
        WorkflowAction::DetectionCompleted,
        WorkflowAction::SelectionMade,
        WorkflowAction::SearchCompleted,
        WorkflowAction::ParseCompleted,
        WorkflowAction::Reset,
    ];

    #[test]
    fn only_reset_moves_backwards() {
        for stage in ALL_STAGES {
            for action in ALL_ACTIONS {
                if let Some(next) = stage.next(action) {
                    if action == WorkflowAction::Reset {
                        assert_eq!(next, WorkflowStage::AwaitingImage);
                    } else {
                        assert!(next >= stage, "{stage} --{action}--> {next}");
                    }
                }
            }
        }
    }

    #[test]
    fn reset_is_accepted_everywhere_but_the_start() {
        for stage in ALL_STAGES {
            assert_eq!(
                stage.allows(WorkflowAction::Reset),
                stage != WorkflowStage::AwaitingImage
            );
        }
    }

    #[test]
    fn happy_path_walks_every_stage_in_order() {
        let mut session = WorkflowSession::new();
        let path = [
            WorkflowAction::ImageAcquired,
            WorkflowAction::Confirm,
            WorkflowAction::DetectionCompleted,
            WorkflowAction::SelectionMade,
            WorkflowAction::SearchCompleted,
            WorkflowAction::ParseCompleted,
        ];

        for (action, expected) in path.into_iter().zip(ALL_STAGES.into_iter().skip(1)) {
            assert_eq!(session.apply(action).unwrap(), expected);
        }
    }

    #[test]
    fn only_the_raw_recipe_stage_awaits_a_parse() {
        let mut session = WorkflowSession::new();
        session.stage = WorkflowStage::DisplayingRawRecipe;
        assert!(session.awaits_parse());

        session.apply(WorkflowAction::Reset).unwrap();
        assert!(!session.awaits_parse());

        session.stage = WorkflowStage::DisplayingParsedRecipe;
        assert!(!session.awaits_parse());
    }

    #[test]
    fn rejected_action_leaves_session_unchanged() {
        let mut session = WorkflowSession::new();
        let before = session.clone();

        let err = session.apply(WorkflowAction::SelectionMade).unwrap_err();

        assert_eq!(
            err,
            CoreError::InvalidTransition {
                from: WorkflowStage::AwaitingImage,
                action: WorkflowAction::SelectionMade,
            }
        );
        assert_eq!(session, before);
    }

    #[test]
    fn reset_clears_everything_and_starts_a_new_run() {
        let mut session = WorkflowSession::new();
        session.apply(WorkflowAction::ImageAcquired).unwrap();
        session.image = Some(ImageAsset::new(Bytes::from_static(b"jpeg"), "image/jpeg", None));
        session.apply(WorkflowAction::Confirm).unwrap();
        session.detected_items = vec![DetectionItem::new("Egg")];
        session.apply(WorkflowAction::DetectionCompleted).unwrap();
        session.selection = vec!["Egg".to_string()];
        session.last_error = Some("boom".to_string());
        let old_run = session.run_id;

        session.apply(WorkflowAction::Reset).unwrap();

        assert_eq!(session.stage, WorkflowStage::AwaitingImage);
        assert_ne!(session.run_id, old_run);
        assert!(session.image.is_none());
        assert!(session.detected_items.is_empty());
        assert!(session.selection.is_empty());
        assert!(session.search_result.is_none());
        assert!(session.parsed_recipes.is_empty());
        assert!(session.last_error.is_none());
        assert_eq!(session.persistence, PersistenceStatus::NotStarted);
    }

    #[test]
    fn from_snap_lands_on_the_terminal_stage() {
        let snap_id = Uuid::new_v4();
        let recipe = |title: &str| SnapRecipe {
            id: Uuid::new_v4(),
            parent_snap: snap_id,
            title: title.to_string(),
            steps: vec![],
            total_time: "10 minutes".to_string(),
            meal_type: MealType::Lunch,
            created_at: Utc::now(),
        };
        let saved = SnapWithRecipes {
            snap: Snap {
                id: snap_id,
                created_at: Utc::now(),
                image_url: "public/1.jpeg".to_string(),
                selected_ingredients: vec!["Egg".to_string(), "Milk".to_string()],
                raw_recipe_content: "# Recipe".to_string(),
                search_queries: vec!["eggs".to_string()],
                grounding_chunks: vec![],
            },
            recipes: vec![recipe("Quiche"), recipe("Flan")],
        };

        let session = WorkflowSession::from_snap(saved, "https://cdn.test/snaps/public/1.jpeg".to_string());

        assert_eq!(session.stage, WorkflowStage::DisplayingParsedRecipe);
        assert_eq!(session.parsed_recipes.len(), 2);
        assert_eq!(session.selection, vec!["Egg", "Milk"]);
        assert_eq!(
            session.search_result.as_ref().map(|r| r.response.as_str()),
            Some("# Recipe")
        );
        assert!(matches!(
            session.persistence,
            PersistenceStatus::Saved { recipes_saved: 2, .. }
        ));
    }
}
