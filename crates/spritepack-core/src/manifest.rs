use crate::document::Anchor;
use crate::error::Result;
use globset::{Glob, GlobMatcher};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Project manifest: which files to pack and how to describe them.
///
/// ```json
/// {
///   "sources": ["sprites/**/*.png"],
///   "frames": [{ "path": "**/player*", "anchor": [0.5, 1.0] }],
///   "animations": { "walk": { "frames": [{ "path": "**/walk_*" }] } }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectManifest {
    /// Globs selecting source sprites, relative to the input directory.
    /// Empty means every supported image file.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Per-sprite overrides, applied in declaration order.
    #[serde(default)]
    pub frames: Vec<FrameRule>,
    /// Named animations resolved against sprite display names.
    #[serde(default)]
    pub animations: BTreeMap<String, AnimationRule>,
}

/// Overrides the display name and/or anchor of every sprite whose relative
/// path matches `path`. When several rules match one sprite, the last
/// matching rule in declaration order wins.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRule {
    pub path: String,
    #[serde(default)]
    pub anchor: Option<[f64; 2]>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationRule {
    pub frames: Vec<FrameRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameRef {
    pub path: String,
}

/// Display name and anchor a sprite resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSprite {
    pub name: String,
    pub anchor: Anchor,
}

struct CompiledFrameRule {
    matcher: GlobMatcher,
    anchor: Option<Anchor>,
    name: Option<String>,
}

/// A named animation as an ordered list of frame matchers (rule order).
pub struct AnimationPatterns {
    pub name: String,
    pub matchers: Vec<GlobMatcher>,
}

/// Manifest rules with their globs compiled, ready for per-sprite resolution.
pub struct CompiledRules {
    frame_rules: Vec<CompiledFrameRule>,
    animations: Vec<AnimationPatterns>,
}

impl CompiledRules {
    pub fn compile(manifest: &ProjectManifest) -> Result<Self> {
        let mut frame_rules = Vec::with_capacity(manifest.frames.len());
        for rule in &manifest.frames {
            frame_rules.push(CompiledFrameRule {
                matcher: Glob::new(&rule.path)?.compile_matcher(),
                anchor: rule.anchor.map(|[x, y]| Anchor { x, y }),
                name: rule.name.clone(),
            });
        }

        let mut animations = Vec::with_capacity(manifest.animations.len());
        for (name, rule) in &manifest.animations {
            let mut matchers = Vec::with_capacity(rule.frames.len());
            for frame in &rule.frames {
                matchers.push(Glob::new(&frame.path)?.compile_matcher());
            }
            animations.push(AnimationPatterns {
                name: name.clone(),
                matchers,
            });
        }

        Ok(Self {
            frame_rules,
            animations,
        })
    }

    /// Resolves a sprite's display name and anchor from its relative path.
    ///
    /// Defaults: name = the path itself, anchor = (0.5, 0.5). All matching
    /// rules are applied in declaration order, so the last match wins.
    pub fn resolve(&self, path: &str) -> ResolvedSprite {
        let mut resolved = ResolvedSprite {
            name: path.to_string(),
            anchor: Anchor { x: 0.5, y: 0.5 },
        };
        for rule in &self.frame_rules {
            if rule.matcher.is_match(path) {
                if let Some(name) = &rule.name {
                    resolved.name = name.clone();
                }
                if let Some(anchor) = rule.anchor {
                    resolved.anchor = anchor;
                }
            }
        }
        resolved
    }

    /// Declared animations in name order.
    pub fn animations(&self) -> &[AnimationPatterns] {
        &self.animations
    }
}
