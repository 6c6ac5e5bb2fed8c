//! Productivity categories and the layered application categorizer.
//!
//! Classification is a small strategy dispatch:
//! - [`TitleRules`] handles title-sensitive applications (browsers) by
//!   scanning the window title for distraction and productive keywords.
//! - [`BaseMapping`] handles everything else with a static identifier lookup.
//!
//! Every list is injected through [`CategoryConfig`], so deployments and tests
//! can supply their own sets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Productivity classification of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    DeepWork,
    ShallowWork,
    Distraction,
    Unknown,
}

/// Classification lists, loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Coding and building tools.
    pub deep_work: Vec<String>,
    /// Research, communication, reading and admin.
    pub shallow_work: Vec<String>,
    /// Non-work focus breakers.
    pub distraction: Vec<String>,
    /// Applications whose category depends on the window title.
    pub title_sensitive: Vec<String>,
    /// Title keywords that mark a title-sensitive window as a distraction.
    pub distraction_keywords: Vec<String>,
    /// Title keywords that mark a title-sensitive window as productive.
    pub productive_keywords: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            deep_work: owned(&[
                "com.apple.dt.Xcode",
                "com.microsoft.VSCode",
                "com.apple.Terminal",
                "com.googlecode.iterm2",
            ]),
            shallow_work: owned(&[
                "com.google.Chrome",
                "com.apple.Safari",
                "company.thebrowser.Browser",
                "com.tinyspeck.slackmacgap",
                "com.hnc.Discord",
                "com.apple.mail",
            ]),
            distraction: owned(&["com.apple.MobileSMS", "com.spotify.client"]),
            title_sensitive: owned(&[
                "com.google.Chrome",
                "com.apple.Safari",
                "company.thebrowser.Browser",
            ]),
            distraction_keywords: owned(&[
                "youtube",
                "netflix",
                "hulu",
                "prime video",
                "reddit",
                "twitter",
                "x.com",
                "instagram",
                "tiktok",
                "twitch",
                "discord",
                "spotify",
                "music",
            ]),
            productive_keywords: owned(&[
                "canvas",
                "gradescope",
                "piazza",
                "github",
                "pull request",
                "issue",
                "stack overflow",
                "documentation",
                "docs",
                "leetcode",
                "hackerrank",
                "pdf",
                "lecture",
                "notes",
                "syllabus",
                "google docs",
                "notion",
            ]),
        }
    }
}

/// A classification strategy.
pub trait Classify {
    /// Classifies an application, optionally using its window title.
    fn classify(&self, app_id: &str, window_title: Option<&str>) -> Category;
}

/// Static identifier lookup. Identifiers absent from every set are `Unknown`.
#[derive(Debug, Clone, Default)]
pub struct BaseMapping {
    deep_work: HashSet<String>,
    shallow_work: HashSet<String>,
    distraction: HashSet<String>,
}

impl BaseMapping {
    pub fn new(config: &CategoryConfig) -> Self {
        Self {
            deep_work: config.deep_work.iter().cloned().collect(),
            shallow_work: config.shallow_work.iter().cloned().collect(),
            distraction: config.distraction.iter().cloned().collect(),
        }
    }
}

impl Classify for BaseMapping {
    fn classify(&self, app_id: &str, _window_title: Option<&str>) -> Category {
        if self.deep_work.contains(app_id) {
            Category::DeepWork
        } else if self.shallow_work.contains(app_id) {
            Category::ShallowWork
        } else if self.distraction.contains(app_id) {
            Category::Distraction
        } else {
            Category::Unknown
        }
    }
}

/// Keyword rules for title-sensitive applications.
///
/// Distraction keywords win over productive ones. Anything else, including a
/// missing title, is shallow work.
#[derive(Debug, Clone, Default)]
pub struct TitleRules {
    distraction_keywords: Vec<String>,
    productive_keywords: Vec<String>,
}

impl TitleRules {
    pub fn new(config: &CategoryConfig) -> Self {
        Self {
            distraction_keywords: lowercase_keywords(&config.distraction_keywords),
            productive_keywords: lowercase_keywords(&config.productive_keywords),
        }
    }
}

fn lowercase_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

impl Classify for TitleRules {
    fn classify(&self, _app_id: &str, window_title: Option<&str>) -> Category {
        let Some(title) = window_title.filter(|t| !t.is_empty()) else {
            return Category::ShallowWork;
        };
        let title = title.to_lowercase();

        if self
            .distraction_keywords
            .iter()
            .any(|k| title.contains(k.as_str()))
        {
            return Category::Distraction;
        }
        if self
            .productive_keywords
            .iter()
            .any(|k| title.contains(k.as_str()))
        {
            return Category::ShallowWork;
        }
        Category::ShallowWork
    }
}

/// Maps applications to productivity categories.
///
/// Title-sensitive identifiers are routed to [`TitleRules`]; all others go to
/// [`BaseMapping`]. The categorizer is total and never fails.
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    base: BaseMapping,
    titles: TitleRules,
    title_sensitive: HashSet<String>,
}

impl Categorizer {
    pub fn new(config: &CategoryConfig) -> Self {
        Self {
            base: BaseMapping::new(config),
            titles: TitleRules::new(config),
            title_sensitive: config.title_sensitive.iter().cloned().collect(),
        }
    }

    /// Returns the strategy responsible for an identifier.
    fn strategy_for(&self, app_id: &str) -> &dyn Classify {
        if self.title_sensitive.contains(app_id) {
            &self.titles
        } else {
            &self.base
        }
    }

    /// Classifies an application, refining title-sensitive ones by title.
    pub fn categorize(&self, app_id: &str, window_title: Option<&str>) -> Category {
        self.strategy_for(app_id).classify(app_id, window_title)
    }
}
