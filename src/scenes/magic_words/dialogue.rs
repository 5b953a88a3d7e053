//=========================================================================
// Dialogue Payload
//=========================================================================
//
// JSON payload driving the Magic Words scene and the helpers that turn
// it into something drawable:
//
// ```json
// {
//   "dialogue": [{ "name": "Sheldon", "text": "Hi {wave}" }],
//   "emojies":  [{ "name": "wave", "url": "..." }],
//   "avatars":  [{ "name": "Sheldon", "url": "...", "position": "left" }]
// }
// ```
//
// Every list is optional in the payload and defaults to empty.
//
//=========================================================================

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::transfer::Anchor;

//=== Payload Types =======================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DialogueLine {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Emoji {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Avatar {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub position: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DialoguePayload {
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
    #[serde(default)]
    pub emojies: Vec<Emoji>,
    #[serde(default)]
    pub avatars: Vec<Avatar>,
}

impl DialoguePayload {
    pub fn from_json(json: &str) -> Result<Self, DialogueError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Names of every emoji the payload declares.
    pub fn emoji_names(&self) -> HashSet<String> {
        self.emojies.iter().map(|e| e.name.clone()).collect()
    }
}

//=== DialogueError =======================================================

#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("Failed to read dialogue from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dialogue payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Dialogue loader stopped before delivering a payload")]
    LoaderGone,
}

//=== DialogueSource ======================================================

/// Where the scene fetches its payload from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogueSource {
    /// Payload compiled into the binary.
    #[default]
    Builtin,
    /// JSON file on disk.
    File(PathBuf),
}

impl DialogueSource {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// Loads and parses the payload. Blocking; run off the logic thread.
    pub fn load(&self) -> Result<DialoguePayload, DialogueError> {
        match self {
            Self::Builtin => DialoguePayload::from_json(BUILTIN_PAYLOAD),
            Self::File(path) => {
                let json = fs::read_to_string(path).map_err(|source| DialogueError::Io {
                    path: path.clone(),
                    source,
                })?;
                DialoguePayload::from_json(&json)
            }
        }
    }
}

//=== Text Segments =======================================================

/// Piece of a dialogue line: plain text or an inline emoji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Emoji(String),
}

/// Splits `text` on `{name}` tokens.
///
/// Tokens naming a known emoji become [`Segment::Emoji`]; anything else,
/// including unknown names and unbalanced braces, stays literal text.
pub fn parse_segments(text: &str, known: &HashSet<String>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            break;
        };

        let name = &after_open[..close];

        // A stray `{` before the token: keep it literal, rescan from the inner brace.
        if let Some(inner) = name.rfind('{') {
            let restart = open + 1 + inner;
            literal.push_str(&rest[..restart]);
            rest = &rest[restart..];
            continue;
        }

        literal.push_str(&rest[..open]);

        if known.contains(name) {
            if !literal.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Emoji(name.to_owned()));
        } else {
            literal.push('{');
            literal.push_str(name);
            literal.push('}');
        }

        rest = &after_open[close + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Text(literal));
    }
    segments
}

/// Flattens segments back into a single displayable line.
pub fn render_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| match s {
            Segment::Text(t) => t.clone(),
            Segment::Emoji(name) => format!("[{}]", name),
        })
        .collect()
}

//=== Avatar Placement ====================================================

/// Speaker used for lines whose name has no avatar.
pub const NARRATOR: &str = "";

/// Screen corner a speaker is drawn in.
pub fn avatar_anchor(name: &str) -> Anchor {
    match name {
        "Sheldon" => Anchor::TopLeft,
        "Leonard" => Anchor::BottomLeft,
        "Penny" => Anchor::BottomRight,
        _ => Anchor::TopRight,
    }
}

//=== Built-in Payload ====================================================

const BUILTIN_PAYLOAD: &str = r#"{
  "dialogue": [
    { "name": "Sheldon", "text": "I have a theory about this build {intrigued}" },
    { "name": "Leonard", "text": "Of course you do {neutral}" },
    { "name": "Penny", "text": "Does it involve pizza? {satisfied}" },
    { "name": "Sheldon", "text": "It involves frame clocks {affirmative}" },
    { "name": "Neighbour", "text": "Could you keep it down up there?" },
    { "name": "Leonard", "text": "Sorry! {laughing}" }
  ],
  "emojies": [
    { "name": "intrigued", "url": "emoji/intrigued.png" },
    { "name": "neutral", "url": "emoji/neutral.png" },
    { "name": "satisfied", "url": "emoji/satisfied.png" },
    { "name": "affirmative", "url": "emoji/affirmative.png" },
    { "name": "laughing", "url": "emoji/laughing.png" }
  ],
  "avatars": [
    { "name": "Sheldon", "url": "avatars/sheldon.png", "position": "left" },
    { "name": "Leonard", "url": "avatars/leonard.png", "position": "left" },
    { "name": "Penny", "url": "avatars/penny.png", "position": "right" }
  ]
}"#;
