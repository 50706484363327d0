//! Persisted overlay settings.
//!
//! Every struct falls back to its defaults field by field, so a config file
//! written by an older or newer build still loads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub overlays: OverlayConfig,
    /// Sections owned by other parts of the application (OBS, game lookup).
    /// Kept verbatim so saving never drops them.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    pub lower_third: LowerThirdConfig,
    pub now_playing: NowPlayingConfig,
    pub social_widget: SocialWidgetConfig,
    pub stream_scenes: StreamScenesConfig,
    pub reaction: ReactionConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    #[default]
    Clean,
    Broadcast,
    Esports,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LowerThirdConfig {
    pub last_used_name: String,
    pub last_used_title: String,
    pub theme: String,
    pub style: CardStyle,
    /// Base64 data URL, or empty.
    pub avatar: String,
    /// Seconds.
    pub display_duration: u32,
    pub auto_show_enabled: bool,
    /// Minutes.
    pub auto_show_interval: u32,
    /// Keys this build does not know about, kept for the next save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for LowerThirdConfig {
    fn default() -> Self {
        Self {
            last_used_name: String::new(),
            last_used_title: String::new(),
            theme: "neon-blue".into(),
            style: CardStyle::Clean,
            avatar: String::new(),
            display_duration: 8,
            auto_show_enabled: false,
            auto_show_interval: 15,
            extra: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NowPlayingStyle {
    #[default]
    Card,
    Fullwidth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NowPlayingConfig {
    pub last_used_title: String,
    pub last_used_subtitle: String,
    pub cover: String,
    pub style: NowPlayingStyle,
    pub display_duration: u32,
    pub auto_show_enabled: bool,
    pub auto_show_interval: u32,
    /// Follow the foreground game instead of the manual title.
    pub auto_detect_enabled: bool,
    /// Seconds between detection passes.
    pub auto_detect_interval: u32,
    /// Keys this build does not know about, kept for the next save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for NowPlayingConfig {
    fn default() -> Self {
        Self {
            last_used_title: String::new(),
            last_used_subtitle: String::new(),
            cover: String::new(),
            style: NowPlayingStyle::Card,
            display_duration: 10,
            auto_show_enabled: false,
            auto_show_interval: 15,
            auto_detect_enabled: false,
            auto_detect_interval: 30,
            extra: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Website,
    Twitter,
    Youtube,
    Instagram,
    Tiktok,
    Discord,
    Twitch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: String,
    pub platform: SocialPlatform,
    pub label: String,
    pub enabled: bool,
}

impl SocialLink {
    fn new(platform: SocialPlatform, id: &str, label: &str, enabled: bool) -> Self {
        Self {
            id: id.into(),
            platform,
            label: label.into(),
            enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialWidgetConfig {
    pub links: Vec<SocialLink>,
    pub style: CardStyle,
    /// Seconds per link.
    pub display_duration: u32,
    pub is_running: bool,
    /// Keys this build does not know about, kept for the next save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for SocialWidgetConfig {
    fn default() -> Self {
        use SocialPlatform::*;
        Self {
            links: vec![
                SocialLink::new(Website, "website", "www.mystream.gg", true),
                SocialLink::new(Twitter, "twitter", "@myhandle", true),
                SocialLink::new(Youtube, "youtube", "/MyChannel", true),
                SocialLink::new(Instagram, "instagram", "@my.insta", false),
                SocialLink::new(Tiktok, "tiktok", "@mytiktok", false),
                SocialLink::new(Discord, "discord", "discord.gg/xyz", false),
                SocialLink::new(Twitch, "twitch", "/mytwitch", false),
            ],
            style: CardStyle::Clean,
            display_duration: 5,
            is_running: true,
            extra: Default::default(),
        }
    }
}

impl SocialWidgetConfig {
    pub fn enabled_links(&self) -> impl Iterator<Item = &SocialLink> {
        self.links.iter().filter(|l| l.enabled)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneStyle {
    Minimal,
    #[default]
    Gaming,
    Elegant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneBackground {
    Gradient,
    #[default]
    Animated,
    Solid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamScene {
    pub id: String,
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub show_countdown: bool,
    pub countdown_minutes: u32,
    pub style: SceneStyle,
    pub background_type: SceneBackground,
    pub background_color: String,
    pub accent_color: String,
    pub show_socials: bool,
}

impl Default for StreamScene {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            title: String::new(),
            subtitle: String::new(),
            show_countdown: false,
            countdown_minutes: 0,
            style: SceneStyle::Gaming,
            background_type: SceneBackground::Animated,
            background_color: "#0a0a0f".into(),
            accent_color: "#6366f1".into(),
            show_socials: true,
        }
    }
}

impl StreamScene {
    fn preset(id: &str, name: &str, title: &str, subtitle: &str, accent: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            accent_color: accent.into(),
            ..Self::default()
        }
    }
}

/// Scene slots; each is rendered by its own browser source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenes {
    pub starting: StreamScene,
    pub brb: StreamScene,
    pub ending: StreamScene,
    pub technical: StreamScene,
}

impl Default for Scenes {
    fn default() -> Self {
        Self {
            starting: StreamScene {
                show_countdown: true,
                countdown_minutes: 5,
                ..StreamScene::preset(
                    "starting",
                    "Starting Soon",
                    "Stream is starting soon",
                    "Get comfortable!",
                    "#6366f1",
                )
            },
            brb: StreamScene {
                show_countdown: true,
                countdown_minutes: 5,
                ..StreamScene::preset("brb", "Be Right Back", "Be right back", "Short break...", "#f59e0b")
            },
            ending: StreamScene::preset(
                "ending",
                "Stream Ending",
                "Thanks for watching!",
                "See you next time",
                "#ec4899",
            ),
            technical: StreamScene {
                show_socials: false,
                ..StreamScene::preset(
                    "technical",
                    "Technical Difficulties",
                    "Technical difficulties",
                    "We'll be right back!",
                    "#ef4444",
                )
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamScenesConfig {
    pub scenes: Scenes,
    pub global_style: SceneStyle,
    /// Keys this build does not know about, kept for the next save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoPlatform {
    Youtube,
    Twitch,
    Tiktok,
    Twitter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSource {
    pub id: String,
    pub name: String,
    pub channel_name: String,
    #[serde(default)]
    pub channel_avatar: String,
    #[serde(default)]
    pub video_title: String,
    #[serde(default)]
    pub video_thumbnail: String,
    pub platform: VideoPlatform,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReactionConfig {
    pub sources: Vec<ReactionSource>,
    pub active_source_id: String,
    pub style: CardStyle,
    /// Seconds, 0 keeps the badge up until hidden.
    pub display_duration: u32,
    pub repeat_enabled: bool,
    /// Seconds.
    pub repeat_interval: u32,
    /// 0 repeats forever.
    pub repeat_count: u32,
    pub show_channel_info: bool,
    pub show_video_title: bool,
    pub position: Corner,
    /// Keys this build does not know about, kept for the next save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            active_source_id: String::new(),
            style: CardStyle::Clean,
            display_duration: 0,
            repeat_enabled: false,
            repeat_interval: 60,
            repeat_count: 0,
            show_channel_info: true,
            show_video_title: true,
            position: Corner::TopRight,
            extra: Default::default(),
        }
    }
}
