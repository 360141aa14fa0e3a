//! Bookmark document model: categories holding ordered websites.
//!
//! The [`Document`] is the whole persisted state. It serializes as a bare JSON
//! array of categories so the on-disk layout stays `[{id, name, websites}]`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable identifier of a category.
///
/// Seed categories use fixed slugs (`"ai-category"`); new categories get a
/// UUID v4 string so identifiers are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

/// Stable identifier of a website.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebsiteId(String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh, globally unique identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(CategoryId);
string_id!(WebsiteId);

// ============================================================================
// Website / Category
// ============================================================================

/// A single bookmarked link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: WebsiteId,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Website {
    /// Case-insensitive substring match against name, url and description.
    ///
    /// `needle` must already be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.url.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// A named, user-ordered group of websites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub websites: Vec<Website>,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            websites: Vec::new(),
        }
    }

    pub fn website(&self, id: &WebsiteId) -> Option<&Website> {
        self.websites.iter().find(|w| &w.id == id)
    }

    pub(crate) fn website_index(&self, id: &WebsiteId) -> Option<usize> {
        self.websites.iter().position(|w| &w.id == id)
    }
}

// ============================================================================
// Document
// ============================================================================

/// Ordered list of categories; the entire persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    categories: Vec<Category>,
}

impl Document {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub(crate) fn categories_mut(&mut self) -> &mut Vec<Category> {
        &mut self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub(crate) fn category_mut(&mut self, id: &CategoryId) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| &c.id == id)
    }

    pub(crate) fn category_index(&self, id: &CategoryId) -> Option<usize> {
        self.categories.iter().position(|c| &c.id == id)
    }

    /// Find a category whose name equals `name` ignoring case, skipping `except`.
    pub fn find_by_name(&self, name: &str, except: Option<&CategoryId>) -> Option<&Category> {
        let wanted = name.trim().to_lowercase();
        self.categories
            .iter()
            .filter(|c| Some(&c.id) != except)
            .find(|c| c.name.to_lowercase() == wanted)
    }

    /// Total number of websites across all categories.
    pub fn website_count(&self) -> usize {
        self.categories.iter().map(|c| c.websites.len()).sum()
    }

    /// The built-in seed document used when nothing valid is persisted.
    pub fn seed() -> Self {
        fn site(id: &str, name: &str, url: &str, description: &str) -> Website {
            Website {
                id: WebsiteId::new(id),
                name: name.to_string(),
                url: url.to_string(),
                description: Some(description.to_string()),
            }
        }

        fn category(id: &str, name: &str, websites: Vec<Website>) -> Category {
            Category {
                id: CategoryId::new(id),
                name: name.to_string(),
                websites,
            }
        }

        Self::new(vec![
            category(
                "ai-category",
                "AI",
                vec![
                    site("chatgpt", "ChatGPT", "https://chat.openai.com", "AI-powered conversational assistant"),
                    site("claude", "Claude", "https://claude.ai", "Anthropic's AI assistant"),
                    site("gemini", "Google Gemini", "https://gemini.google.com", "Google's AI chatbot"),
                    site("copilot", "Microsoft Copilot", "https://copilot.microsoft.com", "Microsoft's AI assistant"),
                ],
            ),
            category(
                "news-category",
                "News",
                vec![
                    site("bbc", "BBC News", "https://bbc.com/news", "British Broadcasting Corporation"),
                    site("cnn", "CNN", "https://cnn.com", "Cable News Network"),
                    site("reuters", "Reuters", "https://reuters.com", "International news agency"),
                    site("techcrunch", "TechCrunch", "https://techcrunch.com", "Technology news and analysis"),
                ],
            ),
            category(
                "movies-category",
                "Movies",
                vec![
                    site("netflix", "Netflix", "https://netflix.com", "Streaming service"),
                    site("imdb", "IMDb", "https://imdb.com", "Internet Movie Database"),
                    site("disney", "Disney+", "https://disneyplus.com", "Disney streaming platform"),
                    site("prime", "Prime Video", "https://primevideo.com", "Amazon's streaming service"),
                ],
            ),
            category(
                "songs-category",
                "Songs",
                vec![
                    site("spotify", "Spotify", "https://spotify.com", "Music streaming platform"),
                    site("youtube-music", "YouTube Music", "https://music.youtube.com", "Google's music service"),
                    site("apple-music", "Apple Music", "https://music.apple.com", "Apple's music streaming"),
                    site("soundcloud", "SoundCloud", "https://soundcloud.com", "Audio platform"),
                ],
            ),
            category(
                "social-media-category",
                "Social Media",
                vec![
                    site("twitter", "Twitter/X", "https://x.com", "Social networking platform"),
                    site("facebook", "Facebook", "https://facebook.com", "Social media platform"),
                    site("instagram", "Instagram", "https://instagram.com", "Photo and video sharing"),
                    site("linkedin", "LinkedIn", "https://linkedin.com", "Professional networking"),
                ],
            ),
        ])
    }
}

/// Ensure a URL carries an explicit scheme.
///
/// Trims whitespace and prepends `https://` unless the value already starts
/// with `http://` or `https://`.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
