//! Prompt construction for the generative text service.
//!
//! Builders are pure so both the sync layer and the HTTP handlers can
//! share them. Manuscript excerpts are size-bounded before transmission
//! to respect the service's request-size limits.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Practical cap on the manuscript excerpt embedded in a codex scan.
pub const MAX_SCAN_EXCERPT_CHARS: usize = 24_000;

/// How much trailing scene text is embedded as context for draft requests.
pub const DRAFT_CONTEXT_CHARS: usize = 1_000;

/// System instruction for the codex scan. The service is told to answer
/// with bare JSON; the extraction parser still tolerates code fences.
pub const EXTRACTION_SYSTEM_INSTRUCTION: &str = "You are a story analyst. Extract every named character that appears in the manuscript excerpt. Respond with ONLY a JSON array, no prose and no code fences. Each element must be an object with the string fields: name, role, age, appearance, personality, background, traits. Use \"Unknown\" for anything the text does not reveal.";

// ---------------------------------------------------------------------------
// Codex scan
// ---------------------------------------------------------------------------

/// Concatenate scene contents in narrative order, labelled by scene title,
/// truncated to `max_chars` at a character boundary. Blank scenes are
/// skipped.
pub fn manuscript_excerpt(project: &crate::model::Project, max_chars: usize) -> String {
    let mut excerpt = String::new();
    'acts: for act in &project.acts {
        for scene in &act.scenes {
            if scene.content.trim().is_empty() {
                continue;
            }
            let block = format!("## {}\n{}\n\n", scene.title, scene.content);
            if excerpt.len() + block.len() > max_chars {
                let remaining = max_chars.saturating_sub(excerpt.len());
                excerpt.push_str(truncate_at_boundary(&block, remaining));
                break 'acts;
            }
            excerpt.push_str(&block);
        }
    }
    excerpt
}

/// User prompt for the codex scan.
pub fn extraction_prompt(excerpt: &str) -> String {
    format!("Manuscript excerpt:\n\n{excerpt}")
}

// ---------------------------------------------------------------------------
// Scene drafting
// ---------------------------------------------------------------------------

/// User prompt for drafting prose into a scene.
pub fn draft_prompt(project_title: &str, instruction: &str) -> String {
    format!("Draft the following for my scene in the novel \"{project_title}\": {instruction}")
}

/// System instruction for drafting, carrying the tail of the scene being
/// edited as context.
pub fn draft_system_instruction(scene_content: &str) -> String {
    let tail = tail_at_boundary(scene_content, DRAFT_CONTEXT_CHARS);
    format!(
        "You are a world-class novelist. Use immersive, high-quality prose. Current scene context: {tail}"
    )
}

// ---------------------------------------------------------------------------
// Boundary-safe slicing
// ---------------------------------------------------------------------------

/// Longest prefix of `s` at most `max` bytes long, cut on a char boundary.
fn truncate_at_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Longest suffix of `s` at most `max` bytes long, cut on a char boundary.
fn tail_at_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
