//! Manuscript and codex entity types.
//!
//! These are the wire types the studio UI reads and writes. The durable
//! store persists the full [`Project`] document verbatim, so every field
//! here round-trips through JSON — including base64 cover and portrait
//! image payloads, which are carried as opaque strings and never decoded.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Timestamp;
use crate::wordcount;

// ---------------------------------------------------------------------------
// Scene status
// ---------------------------------------------------------------------------

/// Workflow status of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneStatus {
    Draft,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl SceneStatus {
    /// Return the status name as shown in the UI and stored on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Parse a status string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Draft" => Some(Self::Draft),
            "In Progress" => Some(Self::InProgress),
            "Done" => Some(Self::Done),
            _ => None,
        }
    }

    /// All valid status values.
    pub const ALL: &'static [&'static str] = &["Draft", "In Progress", "Done"];
}

impl std::fmt::Display for SceneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Codex entry kind
// ---------------------------------------------------------------------------

/// Category of a codex entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Character,
    Location,
    Item,
    Lore,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "Character",
            Self::Location => "Location",
            Self::Item => "Item",
            Self::Lore => "Lore",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Character" => Some(Self::Character),
            "Location" => Some(Self::Location),
            "Item" => Some(Self::Item),
            "Lore" => Some(Self::Lore),
            _ => None,
        }
    }

    /// All valid entry kinds.
    pub const ALL: &'static [&'static str] = &["Character", "Location", "Item", "Lore"];
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Print size
// ---------------------------------------------------------------------------

/// Physical page size used by the print projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrintSize {
    A4,
    A5,
    #[serde(rename = "US Letter")]
    UsLetter,
}

impl PrintSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A5 => "A5",
            Self::UsLetter => "US Letter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "A4" => Some(Self::A4),
            "A5" => Some(Self::A5),
            "US Letter" => Some(Self::UsLetter),
            _ => None,
        }
    }
}

impl Default for PrintSize {
    fn default() -> Self {
        Self::A5
    }
}

impl std::fmt::Display for PrintSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Codex entry
// ---------------------------------------------------------------------------

/// A world-building entry attached to a project.
///
/// Entries are unique by `id`; that is the only identity used for editing
/// and persistence. `name` + `kind` (case-insensitive) is merely the
/// heuristic the AI merge uses to match extracted candidates — two entries
/// may legitimately share a name across kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodexEntry {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub description: String,
    pub details: String,
    pub notes: String,
    /// When set, automated extraction must not overwrite this entry's
    /// content fields.
    #[serde(default)]
    pub is_locked: bool,
    /// Base64 portrait payload, carried verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// ---------------------------------------------------------------------------
// Scene / Act
// ---------------------------------------------------------------------------

/// A single scene of prose.
///
/// `word_count` is derived from `content` and re-derived at every commit;
/// it is never hand-set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub synopsis: String,
    pub status: SceneStatus,
    pub word_count: u32,
    /// Base64 illustration payload, carried verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Scene {
    /// Create an empty Draft scene.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: String::new(),
            synopsis: String::new(),
            status: SceneStatus::Draft,
            word_count: 0,
            image: None,
        }
    }
}

/// An act: an ordered, append-only sequence of scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Act {
    pub id: Uuid,
    pub title: String,
    pub scenes: Vec<Scene>,
}

impl Act {
    /// Create an act with no scenes.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            scenes: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A full writing project: manuscript tree plus codex.
///
/// Invariant: `word_count == Σ scene.word_count` over every act. The value
/// is recomputed from scratch on every committed mutation — it is never
/// trusted as independently stored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub genre: String,
    pub tags: Vec<String>,
    pub last_edited: Timestamp,
    pub word_count: u32,
    pub acts: Vec<Act>,
    pub codex: Vec<CodexEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_synopsis: Option<String>,
    /// Base64 front cover payload, carried verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_cover: Option<String>,
    /// Base64 back cover payload, carried verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_cover: Option<String>,
    #[serde(default)]
    pub print_size: PrintSize,
}

impl Project {
    /// Create a new project with a single empty first act.
    ///
    /// Blank titles and genres fall back to the same defaults the studio UI
    /// uses for its "new project" action.
    pub fn new(owner_id: Uuid, title: &str, genre: &str, tags: Vec<String>) -> Self {
        let title = if title.trim().is_empty() {
            "Untitled Project".to_string()
        } else {
            title.to_string()
        };
        let genre = if genre.trim().is_empty() {
            "Fiction".to_string()
        } else {
            genre.to_string()
        };
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title,
            genre,
            tags,
            last_edited: chrono::Utc::now(),
            word_count: 0,
            acts: vec![Act::new("Act 1")],
            codex: Vec::new(),
            back_synopsis: None,
            front_cover: None,
            back_cover: None,
            print_size: PrintSize::default(),
        }
    }

    /// Find a scene anywhere in the act tree.
    pub fn find_scene(&self, scene_id: Uuid) -> Option<&Scene> {
        self.acts
            .iter()
            .flat_map(|act| act.scenes.iter())
            .find(|scene| scene.id == scene_id)
    }

    /// Re-derive every scene word count and the project total from content.
    pub fn rederive_word_counts(&mut self) {
        for act in &mut self.acts {
            for scene in &mut act.scenes {
                scene.word_count = wordcount::scene_word_count(&scene.content);
            }
        }
        self.word_count = wordcount::project_word_count(self);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- enum round trips ----------------------------------------------------

    #[test]
    fn scene_status_round_trip() {
        for s in SceneStatus::ALL {
            let status = SceneStatus::from_str(s).unwrap();
            assert_eq!(status.as_str(), *s);
        }
    }

    #[test]
    fn scene_status_unknown_returns_none() {
        assert!(SceneStatus::from_str("Finished").is_none());
    }

    #[test]
    fn entry_kind_round_trip() {
        for s in EntryKind::ALL {
            let kind = EntryKind::from_str(s).unwrap();
            assert_eq!(kind.as_str(), *s);
        }
    }

    #[test]
    fn print_size_default_is_a5() {
        assert_eq!(PrintSize::default(), PrintSize::A5);
    }

    // -- wire format ---------------------------------------------------------

    #[test]
    fn scene_serializes_camel_case_with_status_label() {
        let mut scene = Scene::new("Opening");
        scene.status = SceneStatus::InProgress;
        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["status"], "In Progress");
        assert!(json.get("wordCount").is_some());
        assert!(json.get("word_count").is_none());
    }

    #[test]
    fn codex_entry_uses_type_and_is_locked_keys() {
        let entry = CodexEntry {
            id: Uuid::new_v4(),
            name: "Aria".to_string(),
            kind: EntryKind::Character,
            description: String::new(),
            details: String::new(),
            notes: String::new(),
            is_locked: true,
            image: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "Character");
        assert_eq!(json["isLocked"], true);
        // Absent image must be omitted, not serialized as null.
        assert!(json.get("image").is_none());
    }

    #[test]
    fn codex_entry_lock_defaults_to_false_when_absent() {
        let entry: CodexEntry = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Old Mill",
            "type": "Location",
            "description": "",
            "details": "",
            "notes": ""
        }))
        .unwrap();
        assert!(!entry.is_locked);
    }

    #[test]
    fn project_round_trips_through_json() {
        let mut project = Project::new(Uuid::new_v4(), "Ashfall", "Fantasy", vec![]);
        project.front_cover = Some("aGVsbG8=".to_string());
        project.acts[0].scenes.push(Scene::new("Opening"));
        project.acts[0].scenes[0].content = "one two three".to_string();
        project.rederive_word_counts();

        let json = serde_json::to_string(&project).unwrap();
        let back: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(back, project);
    }

    // -- constructors --------------------------------------------------------

    #[test]
    fn new_project_has_one_empty_act_and_defaults() {
        let project = Project::new(Uuid::new_v4(), "", "", vec![]);
        assert_eq!(project.title, "Untitled Project");
        assert_eq!(project.genre, "Fiction");
        assert_eq!(project.acts.len(), 1);
        assert!(project.acts[0].scenes.is_empty());
        assert_eq!(project.word_count, 0);
        assert_eq!(project.print_size, PrintSize::A5);
    }

    #[test]
    fn find_scene_walks_all_acts() {
        let mut project = Project::new(Uuid::new_v4(), "T", "G", vec![]);
        project.acts.push(Act::new("Act 2"));
        let scene = Scene::new("Buried");
        let id = scene.id;
        project.acts[1].scenes.push(scene);
        assert_eq!(project.find_scene(id).unwrap().title, "Buried");
        assert!(project.find_scene(Uuid::new_v4()).is_none());
    }
}
