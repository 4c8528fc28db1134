//! Structural patches over the project tree.
//!
//! [`apply_patch`] is the pure half of the edit pipeline: it merges a
//! patch into the relevant node (project metadata, an act, a scene, or
//! the codex), re-derives every word count from scratch, and stamps
//! `last_edited`. Scheduling the resulting durable write — debounced for
//! scene content, immediate for everything else — is the sync layer's
//! job; [`ProjectPatch::is_content_edit`] is the classifier it uses.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{Act, CodexEntry, PrintSize, Project, Scene, SceneStatus};

// ---------------------------------------------------------------------------
// Patch types
// ---------------------------------------------------------------------------

/// Project-level metadata changes. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetaPatch {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub tags: Option<Vec<String>>,
    pub back_synopsis: Option<String>,
    pub front_cover: Option<String>,
    pub back_cover: Option<String>,
    pub print_size: Option<PrintSize>,
}

/// Scene-level changes. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePatch {
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub status: Option<SceneStatus>,
    pub content: Option<String>,
    pub image: Option<String>,
}

impl ScenePatch {
    /// Patch that replaces a scene's full text.
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Self::default()
        }
    }
}

/// A single edit against a project, targeted at one node of the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ProjectPatch {
    /// Merge project-level metadata.
    Meta(ProjectMetaPatch),
    /// Append a new act (acts are append-only; no reordering).
    #[serde(rename_all = "camelCase")]
    AddAct { title: Option<String> },
    /// Append a new empty scene to an act.
    #[serde(rename_all = "camelCase")]
    AddScene { act_id: Uuid, title: Option<String> },
    /// Merge fields into an existing scene.
    #[serde(rename_all = "camelCase")]
    Scene {
        scene_id: Uuid,
        #[serde(flatten)]
        patch: ScenePatch,
    },
    /// Replace the codex wholesale (the only path that can remove entries).
    #[serde(rename_all = "camelCase")]
    ReplaceCodex { codex: Vec<CodexEntry> },
    /// Insert or replace a single codex entry by id.
    #[serde(rename_all = "camelCase")]
    UpsertCodexEntry { entry: CodexEntry },
}

impl ProjectPatch {
    /// Content edits coalesce under the debounced persistence path; every
    /// other edit commits to the durable store immediately.
    pub fn is_content_edit(&self) -> bool {
        matches!(self, Self::Scene { patch, .. } if patch.content.is_some())
    }

    /// The scene this patch targets, when it targets one.
    pub fn scene_id(&self) -> Option<Uuid> {
        match self {
            Self::Scene { scene_id, .. } => Some(*scene_id),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Apply a patch, returning the updated project.
///
/// Every successful application re-derives all word counts from content
/// and stamps `last_edited`. The input project is left untouched; the
/// caller decides whether to commit the result.
pub fn apply_patch(project: &Project, patch: &ProjectPatch) -> Result<Project, CoreError> {
    let mut next = project.clone();

    match patch {
        ProjectPatch::Meta(meta) => {
            if let Some(title) = &meta.title {
                next.title = title.clone();
            }
            if let Some(genre) = &meta.genre {
                next.genre = genre.clone();
            }
            if let Some(tags) = &meta.tags {
                next.tags = tags.clone();
            }
            if let Some(synopsis) = &meta.back_synopsis {
                next.back_synopsis = Some(synopsis.clone());
            }
            if let Some(cover) = &meta.front_cover {
                next.front_cover = Some(cover.clone());
            }
            if let Some(cover) = &meta.back_cover {
                next.back_cover = Some(cover.clone());
            }
            if let Some(size) = meta.print_size {
                next.print_size = size;
            }
        }

        ProjectPatch::AddAct { title } => {
            let title = title
                .clone()
                .unwrap_or_else(|| format!("Act {}", next.acts.len() + 1));
            next.acts.push(Act::new(title));
        }

        ProjectPatch::AddScene { act_id, title } => {
            let act = next
                .acts
                .iter_mut()
                .find(|act| act.id == *act_id)
                .ok_or(CoreError::NotFound {
                    entity: "Act",
                    id: *act_id,
                })?;
            let title = title.clone().unwrap_or_else(|| "Untitled Scene".to_string());
            act.scenes.push(Scene::new(title));
        }

        ProjectPatch::Scene { scene_id, patch } => {
            let scene = next
                .acts
                .iter_mut()
                .flat_map(|act| act.scenes.iter_mut())
                .find(|scene| scene.id == *scene_id)
                .ok_or(CoreError::NotFound {
                    entity: "Scene",
                    id: *scene_id,
                })?;
            if let Some(title) = &patch.title {
                scene.title = title.clone();
            }
            if let Some(synopsis) = &patch.synopsis {
                scene.synopsis = synopsis.clone();
            }
            if let Some(status) = patch.status {
                scene.status = status;
            }
            if let Some(content) = &patch.content {
                scene.content = content.clone();
            }
            if let Some(image) = &patch.image {
                scene.image = Some(image.clone());
            }
        }

        ProjectPatch::ReplaceCodex { codex } => {
            next.codex = codex.clone();
        }

        ProjectPatch::UpsertCodexEntry { entry } => {
            match next.codex.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry.clone(),
                None => next.codex.push(entry.clone()),
            }
        }
    }

    next.rederive_word_counts();
    next.last_edited = Utc::now();
    Ok(next)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::model::EntryKind;

    fn project_with_scene(content: &str) -> (Project, Uuid) {
        let mut project = Project::new(Uuid::new_v4(), "T", "G", vec![]);
        let mut scene = Scene::new("S");
        scene.content = content.to_string();
        let id = scene.id;
        project.acts[0].scenes.push(scene);
        project.rederive_word_counts();
        (project, id)
    }

    fn codex_entry(name: &str) -> CodexEntry {
        CodexEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind: EntryKind::Character,
            description: String::new(),
            details: String::new(),
            notes: String::new(),
            is_locked: false,
            image: None,
        }
    }

    // -- meta ----------------------------------------------------------------

    #[test]
    fn meta_patch_only_touches_set_fields() {
        let project = Project::new(Uuid::new_v4(), "Before", "Fantasy", vec!["a".into()]);
        let patch = ProjectPatch::Meta(ProjectMetaPatch {
            title: Some("After".into()),
            ..Default::default()
        });
        let next = apply_patch(&project, &patch).unwrap();
        assert_eq!(next.title, "After");
        assert_eq!(next.genre, "Fantasy");
        assert_eq!(next.tags, vec!["a".to_string()]);
    }

    // -- acts and scenes -----------------------------------------------------

    #[test]
    fn add_act_appends_with_default_numbering() {
        let project = Project::new(Uuid::new_v4(), "T", "G", vec![]);
        let next = apply_patch(&project, &ProjectPatch::AddAct { title: None }).unwrap();
        assert_eq!(next.acts.len(), 2);
        assert_eq!(next.acts[1].title, "Act 2");
    }

    #[test]
    fn add_scene_appends_empty_draft() {
        let project = Project::new(Uuid::new_v4(), "T", "G", vec![]);
        let act_id = project.acts[0].id;
        let next =
            apply_patch(&project, &ProjectPatch::AddScene { act_id, title: None }).unwrap();
        let scene = &next.acts[0].scenes[0];
        assert_eq!(scene.title, "Untitled Scene");
        assert_eq!(scene.status, SceneStatus::Draft);
        assert_eq!(scene.word_count, 0);
    }

    #[test]
    fn add_scene_to_unknown_act_is_not_found() {
        let project = Project::new(Uuid::new_v4(), "T", "G", vec![]);
        let result = apply_patch(
            &project,
            &ProjectPatch::AddScene {
                act_id: Uuid::new_v4(),
                title: None,
            },
        );
        assert_matches!(result, Err(CoreError::NotFound { entity: "Act", .. }));
    }

    #[test]
    fn scene_patch_to_unknown_scene_is_not_found() {
        let project = Project::new(Uuid::new_v4(), "T", "G", vec![]);
        let result = apply_patch(
            &project,
            &ProjectPatch::Scene {
                scene_id: Uuid::new_v4(),
                patch: ScenePatch::content("x"),
            },
        );
        assert_matches!(result, Err(CoreError::NotFound { entity: "Scene", .. }));
    }

    // -- word-count invariant ------------------------------------------------

    #[test]
    fn content_edit_rederives_scene_and_project_counts() {
        let (project, scene_id) = project_with_scene("a b c");
        assert_eq!(project.word_count, 3);

        let next = apply_patch(
            &project,
            &ProjectPatch::Scene {
                scene_id,
                patch: ScenePatch::content("one two three four five"),
            },
        )
        .unwrap();

        assert_eq!(next.acts[0].scenes[0].word_count, 5);
        assert_eq!(next.word_count, 5);
    }

    #[test]
    fn counts_rederived_even_for_non_content_edits() {
        let (mut project, _) = project_with_scene("a b c");
        // Simulate a drifted stored count; any commit repairs it.
        project.word_count = 999;
        let next = apply_patch(
            &project,
            &ProjectPatch::Meta(ProjectMetaPatch::default()),
        )
        .unwrap();
        assert_eq!(next.word_count, 3);
    }

    #[test]
    fn blank_content_counts_zero() {
        let (project, scene_id) = project_with_scene("words here");
        let next = apply_patch(
            &project,
            &ProjectPatch::Scene {
                scene_id,
                patch: ScenePatch::content("   \n  "),
            },
        )
        .unwrap();
        assert_eq!(next.word_count, 0);
    }

    #[test]
    fn last_edited_is_stamped() {
        let (project, _) = project_with_scene("a");
        let next =
            apply_patch(&project, &ProjectPatch::Meta(ProjectMetaPatch::default())).unwrap();
        assert!(next.last_edited >= project.last_edited);
    }

    // -- codex ---------------------------------------------------------------

    #[test]
    fn replace_codex_swaps_the_whole_set() {
        let (project, _) = project_with_scene("a");
        let replacement = vec![codex_entry("Aria"), codex_entry("Bram")];
        let next = apply_patch(
            &project,
            &ProjectPatch::ReplaceCodex {
                codex: replacement.clone(),
            },
        )
        .unwrap();
        assert_eq!(next.codex, replacement);
    }

    #[test]
    fn upsert_replaces_by_id_or_appends() {
        let (project, _) = project_with_scene("a");
        let entry = codex_entry("Aria");

        let next = apply_patch(
            &project,
            &ProjectPatch::UpsertCodexEntry {
                entry: entry.clone(),
            },
        )
        .unwrap();
        assert_eq!(next.codex.len(), 1);

        let mut renamed = entry.clone();
        renamed.description = "updated".to_string();
        let next = apply_patch(
            &next,
            &ProjectPatch::UpsertCodexEntry { entry: renamed },
        )
        .unwrap();
        assert_eq!(next.codex.len(), 1);
        assert_eq!(next.codex[0].description, "updated");
    }

    // -- classification ------------------------------------------------------

    #[test]
    fn content_edits_classified_for_debounce() {
        let patch = ProjectPatch::Scene {
            scene_id: Uuid::new_v4(),
            patch: ScenePatch::content("x"),
        };
        assert!(patch.is_content_edit());
        assert!(patch.scene_id().is_some());
    }

    #[test]
    fn metadata_edits_are_immediate() {
        let title_only = ProjectPatch::Scene {
            scene_id: Uuid::new_v4(),
            patch: ScenePatch {
                title: Some("New title".into()),
                ..Default::default()
            },
        };
        assert!(!title_only.is_content_edit());
        assert!(!ProjectPatch::Meta(ProjectMetaPatch::default()).is_content_edit());
    }

    // -- wire format ---------------------------------------------------------

    #[test]
    fn patch_deserializes_from_tagged_json() {
        let scene_id = Uuid::new_v4();
        let patch: ProjectPatch = serde_json::from_value(serde_json::json!({
            "op": "scene",
            "sceneId": scene_id,
            "content": "hello world"
        }))
        .unwrap();
        assert!(patch.is_content_edit());
        assert_eq!(patch.scene_id(), Some(scene_id));
    }

    #[test]
    fn meta_patch_deserializes_from_tagged_json() {
        let patch: ProjectPatch = serde_json::from_value(serde_json::json!({
            "op": "meta",
            "printSize": "US Letter"
        }))
        .unwrap();
        let ProjectPatch::Meta(meta) = patch else {
            panic!("expected meta patch");
        };
        assert_eq!(meta.print_size, Some(PrintSize::UsLetter));
    }
}
