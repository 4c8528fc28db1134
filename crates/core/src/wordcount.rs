//! Word-count aggregates derived from the manuscript tree.
//!
//! Both functions are pure and total: undefined/empty content counts as
//! zero, and the project total is recomputed top-down on every call — no
//! incremental cache is trusted across edits, so the stored counts can
//! never drift from the content they describe.

use crate::model::Project;

/// Number of whitespace-delimited tokens in a scene's content.
///
/// Blank or whitespace-only content counts as 0.
pub fn scene_word_count(content: &str) -> u32 {
    if content.trim().is_empty() {
        0
    } else {
        content.split_whitespace().count() as u32
    }
}

/// Total word count across every scene in every act, recomputed from the
/// scene contents (not from any stored per-scene count).
pub fn project_word_count(project: &Project) -> u32 {
    project
        .acts
        .iter()
        .flat_map(|act| act.scenes.iter())
        .map(|scene| scene_word_count(&scene.content))
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Act, Scene};
    use uuid::Uuid;

    fn project_with_contents(contents: &[&str]) -> Project {
        let mut project = Project::new(Uuid::new_v4(), "T", "G", vec![]);
        for content in contents {
            let mut scene = Scene::new("S");
            scene.content = content.to_string();
            project.acts[0].scenes.push(scene);
        }
        project
    }

    // -- scene_word_count ----------------------------------------------------

    #[test]
    fn empty_content_is_zero() {
        assert_eq!(scene_word_count(""), 0);
    }

    #[test]
    fn whitespace_only_content_is_zero() {
        assert_eq!(scene_word_count("   \n\t  "), 0);
    }

    #[test]
    fn counts_whitespace_delimited_tokens() {
        assert_eq!(scene_word_count("the quick brown fox"), 4);
    }

    #[test]
    fn leading_and_trailing_whitespace_ignored() {
        assert_eq!(scene_word_count("  hello   world  "), 2);
    }

    #[test]
    fn newlines_and_tabs_delimit_tokens() {
        assert_eq!(scene_word_count("one\ntwo\tthree"), 3);
    }

    // -- project_word_count --------------------------------------------------

    #[test]
    fn sums_over_all_scenes() {
        let project = project_with_contents(&["a b c", ""]);
        assert_eq!(project_word_count(&project), 3);
    }

    #[test]
    fn sums_across_acts() {
        let mut project = project_with_contents(&["a b"]);
        let mut act = Act::new("Act 2");
        let mut scene = Scene::new("S");
        scene.content = "c d e".to_string();
        act.scenes.push(scene);
        project.acts.push(act);
        assert_eq!(project_word_count(&project), 5);
    }

    #[test]
    fn ignores_stale_stored_counts() {
        let mut project = project_with_contents(&["one two"]);
        // A hand-set stale count must not influence the recompute.
        project.acts[0].scenes[0].word_count = 999;
        assert_eq!(project_word_count(&project), 2);
    }

    #[test]
    fn empty_project_is_zero() {
        let project = project_with_contents(&[]);
        assert_eq!(project_word_count(&project), 0);
    }
}
