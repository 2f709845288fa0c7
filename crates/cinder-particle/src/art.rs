//! Art resolution for particles.
//!
//! Art lists come from configuration as texture names or already-resolved
//! textures. Resolution never fails: unknown names fall back to the empty
//! placeholder and every oddity is reported as an [`ArtWarning`] in the
//! returned [`ArtReport`] rather than logged.

use std::collections::{HashMap, HashSet};

use cinder_common::{AtlasId, TextureId};
use serde::{Deserialize, Serialize};

/// A renderable texture region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Texture {
    /// Texture ID
    pub id: TextureId,
    /// Base atlas the texture is cut from
    pub atlas: AtlasId,
}

impl Texture {
    /// Placeholder used when no art is available.
    pub const EMPTY: Self = Self::new(TextureId::EMPTY, AtlasId::NONE);

    /// Creates a texture.
    #[must_use]
    pub const fn new(id: TextureId, atlas: AtlasId) -> Self {
        Self { id, atlas }
    }

    /// Checks if this is the empty placeholder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for Texture {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// An art entry before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtRef {
    /// Texture looked up by name
    Id(String),
    /// Texture supplied directly
    Texture(Texture),
}

impl From<&str> for ArtRef {
    fn from(name: &str) -> Self {
        Self::Id(name.to_string())
    }
}

impl From<Texture> for ArtRef {
    fn from(texture: Texture) -> Self {
        Self::Texture(texture)
    }
}

/// Name-to-texture lookup provided by the host's asset layer.
pub trait TextureSource {
    /// Resolves a texture name.
    fn resolve(&self, name: &str) -> Option<Texture>;
}

impl TextureSource for HashMap<String, Texture> {
    fn resolve(&self, name: &str) -> Option<Texture> {
        self.get(name).copied()
    }
}

/// Non-fatal findings from art resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtWarning {
    /// The art list was empty; the placeholder was used.
    Empty,
    /// A texture name did not resolve; the placeholder was used.
    Unresolved(String),
    /// Textures come from more than one atlas, which defeats batching.
    MixedAtlases {
        /// Number of distinct atlases
        atlases: usize,
    },
}

impl std::fmt::Display for ArtWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "no art supplied, using empty texture"),
            Self::Unresolved(name) => write!(f, "texture {name:?} not found, using empty texture"),
            Self::MixedAtlases { atlases } => write!(
                f,
                "particle textures span {atlases} atlases; batching will be limited"
            ),
        }
    }
}

/// A resolved value plus any advisory warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtReport<T> {
    /// The resolved value
    pub value: T,
    /// Advisory warnings, in discovery order
    pub warnings: Vec<ArtWarning>,
}

impl<T> ArtReport<T> {
    /// True when resolution produced no warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Splits the report into its parts.
    #[must_use]
    pub fn into_parts(self) -> (T, Vec<ArtWarning>) {
        (self.value, self.warnings)
    }
}

/// Resolves a single art entry, recording a warning on failure.
pub(crate) fn resolve_one(
    art: &ArtRef,
    source: &impl TextureSource,
    warnings: &mut Vec<ArtWarning>,
) -> Texture {
    match art {
        ArtRef::Texture(texture) => *texture,
        ArtRef::Id(name) => source.resolve(name).unwrap_or_else(|| {
            warnings.push(ArtWarning::Unresolved(name.clone()));
            Texture::EMPTY
        }),
    }
}

/// Pushes a mixed-atlas warning if the real textures span several atlases.
pub(crate) fn check_atlases<'a>(
    textures: impl IntoIterator<Item = &'a Texture>,
    warnings: &mut Vec<ArtWarning>,
) {
    let atlases: HashSet<AtlasId> = textures
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(|t| t.atlas)
        .collect();
    if atlases.len() > 1 {
        warnings.push(ArtWarning::MixedAtlases {
            atlases: atlases.len(),
        });
    }
}

/// Validates and resolves a static art list.
///
/// The result is never empty: an empty input yields the placeholder.
pub fn parse_art(art: &[ArtRef], source: &impl TextureSource) -> ArtReport<Vec<Texture>> {
    let mut warnings = Vec::new();

    if art.is_empty() {
        warnings.push(ArtWarning::Empty);
        return ArtReport {
            value: vec![Texture::EMPTY],
            warnings,
        };
    }

    let textures: Vec<Texture> = art
        .iter()
        .map(|entry| resolve_one(entry, source, &mut warnings))
        .collect();
    check_atlases(&textures, &mut warnings);

    ArtReport {
        value: textures,
        warnings,
    }
}

/// Extra per-particle configuration for static particles, passed through
/// unchanged.
#[must_use]
pub fn parse_data<T>(data: T) -> T {
    data
}
