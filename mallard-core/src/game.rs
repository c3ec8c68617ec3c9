//! Game model and manifest loading.
//!
//! A game is a directory with a `game.toml` manifest describing metadata,
//! target platforms, the script target, graphics/audio settings, and the
//! resource table. The manifest is deserialized leniently and then validated
//! into the typed [`Game`] model; every validation failure maps to
//! [`ErrorKind::InvalidGame`] or [`ErrorKind::InvalidFormat`].

use std::path::Path;

use serde::Deserialize;
use tracing::{error, trace};

use crate::error::{EngineError, EngineResult, ErrorKind};
use crate::platform::Platform;
use crate::version::Version;

/// A platform a game declares support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePlatform {
    Linux,
    Darwin,
    Windows,
}

impl GamePlatform {
    /// Maps the host platform into the manifest's platform set.
    pub fn from_host(platform: Platform) -> EngineResult<Self> {
        match platform {
            Platform::Linux => Ok(Self::Linux),
            Platform::Darwin => Ok(Self::Darwin),
            Platform::Windows => Ok(Self::Windows),
            Platform::Unknown => Err(EngineError::with_message(
                ErrorKind::UnknownEnumVariant,
                "unknown or unconvertible platform",
            )),
        }
    }
}

/// The Lua flavor the game targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuaTarget {
    Lua51,
    Lua54,
    LuaJit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Text,
    Sprite,
    Music,
    SoundEffect,
    Font,
    Animation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDef {
    pub resource_type: ResourceType,
    pub key: String,
    pub source: String,
    pub lazy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetMetadata {
    pub platforms: Vec<GamePlatform>,
    pub lua: LuaTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsMetadata {
    pub window_resolution: Resolution,
    pub window_fullscreen: bool,
    pub window_resizing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioMetadata {
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub title: String,
    pub author: String,
    pub license: String,
    pub description: Option<String>,
    pub version: Version,
    pub entry_scene: String,
    pub graphics: GraphicsMetadata,
    pub audio: AudioMetadata,
    pub target: TargetMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub meta: Metadata,
    pub resources: Vec<ResourceDef>,
}

// Raw deserialization shape of game.toml. Validation happens afterwards so
// error messages can name the field that is wrong.

#[derive(Debug, Deserialize)]
struct RawManifest {
    meta: RawMeta,
    target: RawTarget,
    game: RawGame,
    graphics: RawGraphics,
    audio: RawAudio,
    #[serde(default)]
    resources: Vec<RawResource>,
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    name: String,
    title: String,
    description: Option<String>,
    author: String,
    license: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    platforms: Vec<String>,
    lua: String,
}

#[derive(Debug, Deserialize)]
struct RawGame {
    entry_scene: String,
}

#[derive(Debug, Deserialize)]
struct RawGraphics {
    resolution: [u32; 2],
    fullscreen: bool,
    allow_resizing: bool,
}

#[derive(Debug, Deserialize)]
struct RawAudio {
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct RawResource {
    #[serde(rename = "type")]
    resource_type: String,
    key: String,
    source: String,
    #[serde(default)]
    lazy: bool,
}

impl Game {
    /// Loads and validates the manifest of the game directory at `path`.
    pub fn load(path: &Path) -> EngineResult<Self> {
        trace!(path = %path.display(), "loading game");

        if !path.exists() {
            error!(path = %path.display(), "game directory doesn't exist");
            return Err(EngineError::with_message(
                ErrorKind::InvalidGame,
                format!("directory doesn't exist: {}", path.display()),
            ));
        }
        if !path.is_dir() {
            error!(path = %path.display(), "a game has to be a folder");
            return Err(EngineError::new(ErrorKind::InvalidGame));
        }

        let manifest_path = path.join("game.toml");
        if !manifest_path.exists() {
            error!("missing manifest file");
            return Err(EngineError::with_message(
                ErrorKind::InvalidGame,
                "missing game.toml",
            ));
        }

        let manifest_text = std::fs::read_to_string(&manifest_path)
            .map_err(|err| EngineError::from(err).context("reading game.toml"))?;

        Self::from_manifest(&manifest_text)
    }

    /// Validates a manifest document into the typed game model.
    pub fn from_manifest(text: &str) -> EngineResult<Self> {
        let raw: RawManifest = toml::from_str(text).map_err(|err| {
            error!(%err, "manifest doesn't parse");
            EngineError::with_message(ErrorKind::InvalidGame, err.to_string())
        })?;

        let version: Version = raw.meta.version.parse().map_err(|_| {
            error!("invalid version format");
            EngineError::with_message(ErrorKind::InvalidGame, "invalid version format")
        })?;

        let mut platforms = Vec::with_capacity(raw.target.platforms.len());
        for platform in &raw.target.platforms {
            platforms.push(match platform.as_str() {
                "Linux" => GamePlatform::Linux,
                "MacOS" => GamePlatform::Darwin,
                "Windows" => GamePlatform::Windows,
                other => {
                    error!(platform = other, "unknown platform");
                    return Err(EngineError::with_message(
                        ErrorKind::InvalidGame,
                        format!("unknown platform: {other}"),
                    ));
                }
            });
        }

        let lua = match raw.target.lua.as_str() {
            "5.4" => LuaTarget::Lua54,
            "5.1" => LuaTarget::Lua51,
            "JIT" => LuaTarget::LuaJit,
            other => {
                error!(target = other, "unknown lua target");
                return Err(EngineError::with_message(
                    ErrorKind::InvalidGame,
                    format!("unknown lua target: {other}"),
                ));
            }
        };

        if !(0.0..=1.0).contains(&raw.audio.volume) {
            error!(volume = raw.audio.volume, "audio volume out of range");
            return Err(EngineError::with_message(
                ErrorKind::InvalidGame,
                "the audio volume must be in the range 0-1",
            ));
        }

        let mut resources = Vec::with_capacity(raw.resources.len());
        for resource in raw.resources {
            let resource_type = match resource.resource_type.as_str() {
                "Text" => ResourceType::Text,
                "Sprite" => ResourceType::Sprite,
                "Music" => ResourceType::Music,
                "Sound" => ResourceType::SoundEffect,
                "Font" => ResourceType::Font,
                "Anim" => ResourceType::Animation,
                other => {
                    error!(resource_type = other, "invalid resource type");
                    return Err(EngineError::with_message(
                        ErrorKind::InvalidGame,
                        format!("invalid resource type: {other}"),
                    ));
                }
            };
            resources.push(ResourceDef {
                resource_type,
                key: resource.key,
                source: resource.source,
                lazy: resource.lazy,
            });
        }

        Ok(Self {
            meta: Metadata {
                name: raw.meta.name,
                title: raw.meta.title,
                author: raw.meta.author,
                license: raw.meta.license,
                description: raw.meta.description,
                version,
                entry_scene: raw.game.entry_scene,
                graphics: GraphicsMetadata {
                    window_resolution: Resolution {
                        width: raw.graphics.resolution[0],
                        height: raw.graphics.resolution[1],
                    },
                    window_fullscreen: raw.graphics.fullscreen,
                    window_resizing: raw.graphics.allow_resizing,
                },
                audio: AudioMetadata {
                    volume: raw.audio.volume,
                },
                target: TargetMetadata { platforms, lua },
            },
            resources,
        })
    }

    /// Whether the game declares support for the given host platform.
    pub fn supports(&self, platform: Platform) -> EngineResult<bool> {
        let platform = GamePlatform::from_host(platform)?;
        Ok(self.meta.target.platforms.contains(&platform))
    }
}
