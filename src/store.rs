//! JSON-file backed settings store.
//!
//! The control surface writes "last used" values and per-overlay settings
//! here; the broadcast core only reads it, through [`ConfigSource`].

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use crate::{
    broadcast::ConfigSource,
    error::ConfigError,
    models::{
        command::{Action, Command, KnownModule, ModuleId, ModuleState},
        config::{AppConfig, ReactionSource},
    },
};

pub struct ConfigStore {
    path: Option<PathBuf>,
    config: RwLock<AppConfig>,
}

impl ConfigStore {
    /// Loads the config file, or starts from defaults when it does not exist
    /// yet. A file that exists but cannot be parsed is an error rather than
    /// something to overwrite.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(Self {
            path: Some(path),
            config: RwLock::new(config),
        })
    }

    /// A store that never touches disk.
    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            path: None,
            config: RwLock::new(config),
        }
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `change` to a copy, persists it, and only then makes it current.
    fn update<F>(&self, change: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut AppConfig) -> Result<(), ConfigError>,
    {
        let mut current = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = current.clone();
        change(&mut next)?;
        if let Some(path) = &self.path {
            save(path, &next)?;
        }
        *current = next;
        Ok(())
    }

    /// Shallow-merges `patch` into one overlay section (`lowerThird`,
    /// `nowPlaying`, `socialWidget`, `streamScenes` or `reaction`).
    pub fn merge_section(&self, section: &str, patch: Value) -> Result<(), ConfigError> {
        self.update(|config| {
            let overlays = &mut config.overlays;
            match section {
                "lowerThird" | "lower-third" => merge_into(&mut overlays.lower_third, patch, section),
                "nowPlaying" | "now-playing" => merge_into(&mut overlays.now_playing, patch, section),
                "socialWidget" | "social-widget" => {
                    merge_into(&mut overlays.social_widget, patch, section)
                }
                "streamScenes" | "stream-scenes" => {
                    merge_into(&mut overlays.stream_scenes, patch, section)
                }
                "reaction" => merge_into(&mut overlays.reaction, patch, section),
                other => Err(ConfigError::UnknownSection(other.to_string())),
            }
        })
    }

    pub fn merge_scene(&self, scene_id: &str, patch: Value) -> Result<(), ConfigError> {
        self.update(|config| {
            let scenes = &mut config.overlays.stream_scenes.scenes;
            let scene = match scene_id {
                "starting" => &mut scenes.starting,
                "brb" => &mut scenes.brb,
                "ending" => &mut scenes.ending,
                "technical" => &mut scenes.technical,
                other => return Err(ConfigError::UnknownSection(other.to_string())),
            };
            merge_into(scene, patch, scene_id)
        })
    }

    pub fn add_reaction_source(&self, source: ReactionSource) -> Result<(), ConfigError> {
        self.update(|config| {
            config.overlays.reaction.sources.push(source);
            Ok(())
        })
    }

    pub fn update_reaction_source(&self, id: &str, patch: Value) -> Result<(), ConfigError> {
        self.update(|config| {
            let source = config
                .overlays
                .reaction
                .sources
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| ConfigError::SourceNotFound(id.to_string()))?;
            merge_into(source, patch, "reaction source")?;
            // The id is the lookup key and stays fixed.
            source.id = id.to_string();
            Ok(())
        })
    }

    pub fn remove_reaction_source(&self, id: &str) -> Result<(), ConfigError> {
        self.update(|config| {
            let sources = &mut config.overlays.reaction.sources;
            let before = sources.len();
            sources.retain(|s| s.id != id);
            if sources.len() == before {
                return Err(ConfigError::SourceNotFound(id.to_string()));
            }
            Ok(())
        })
    }

    /// Keeps the text of a SHOW around so the overlay can be primed after a
    /// restart. Returns whether anything was written.
    pub fn remember(&self, command: &Command) -> Result<bool, ConfigError> {
        if command.action != Action::Show {
            return Ok(false);
        }
        let text = |key: &str| {
            command
                .payload
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        match command.module.known() {
            Some(KnownModule::LowerThird) => self.update(|config| {
                let lower_third = &mut config.overlays.lower_third;
                lower_third.last_used_name = text("name");
                lower_third.last_used_title = text("title");
                Ok(())
            })?,
            Some(KnownModule::NowPlaying) => self.update(|config| {
                let now_playing = &mut config.overlays.now_playing;
                now_playing.last_used_title = text("title");
                now_playing.last_used_subtitle = text("subtitle");
                now_playing.cover = text("cover");
                Ok(())
            })?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl ConfigSource for ConfigStore {
    fn last_used(&self, module: &ModuleId) -> Option<ModuleState> {
        let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
        let overlays = &config.overlays;

        let payload = match module.known()? {
            KnownModule::LowerThird => {
                let lt = &overlays.lower_third;
                if lt.last_used_name.is_empty() && lt.last_used_title.is_empty() {
                    return None;
                }
                json!({
                    "name": lt.last_used_name,
                    "title": lt.last_used_title,
                    "style": lt.style,
                    "avatar": lt.avatar,
                    "duration": lt.display_duration,
                })
            }
            KnownModule::NowPlaying => {
                let np = &overlays.now_playing;
                if np.last_used_title.is_empty() {
                    return None;
                }
                json!({
                    "title": np.last_used_title,
                    "subtitle": np.last_used_subtitle,
                    "cover": np.cover,
                    "style": np.style,
                    "duration": np.display_duration,
                })
            }
            KnownModule::SocialWidget => {
                let social = &overlays.social_widget;
                let links: Vec<_> = social.enabled_links().collect();
                if !social.is_running || links.is_empty() {
                    return None;
                }
                json!({
                    "links": links,
                    "style": social.style,
                    "displayDuration": social.display_duration,
                    "running": true,
                })
            }
            KnownModule::StreamScene | KnownModule::Reaction => return None,
        };

        Some(ModuleState {
            action: Action::Update,
            payload,
        })
    }
}

fn merge_into<T>(target: &mut T, patch: Value, section: &str) -> Result<(), ConfigError>
where
    T: Serialize + DeserializeOwned,
{
    let invalid = |source| ConfigError::InvalidSettings {
        section: section.to_string(),
        source,
    };
    let patch: Map<String, Value> = serde_json::from_value(patch).map_err(invalid)?;
    let mut merged = serde_json::to_value(&*target).map_err(invalid)?;
    if let Value::Object(fields) = &mut merged {
        fields.extend(patch);
    }
    *target = serde_json::from_value(merged).map_err(invalid)?;
    Ok(())
}

fn save(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let raw = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}
