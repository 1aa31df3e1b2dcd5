//! Static landing page copy.

pub const BOT_NAME: &str = "StreamSync";

pub const TAGLINE: &str = "Experience synchronized music streaming with your Discord community. \
     Control playback, manage queues, and enjoy seamless audio together.";

pub const INVITE_URL: &str = "https://discord.com/oauth2/authorize?client_id=1437365534831153226&permissions=281475013487632&integration_type=0&scope=applications.commands+bot";

pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: &[Feature] = &[
    Feature {
        title: "Crystal Clear Audio",
        description: "Opus codec at 10/10 quality with ultra-low 400ms latency. HIGH quality resampling for pristine audio playback.",
    },
    Feature {
        title: "Smart Playlist Management",
        description: "Create up to 4 playlists per user with descriptions. Add/remove songs, shuffle play, and queue entire playlists.",
    },
    Feature {
        title: "Rich Metadata Extraction",
        description: "Complete YouTube information including title, artist, duration, views, likes, and high-quality thumbnails.",
    },
    Feature {
        title: "Cloud Backup & Sync",
        description: "Auto-sync with NeonDB PostgreSQL. Survives local data loss with persistent cloud storage and manual backup/restore.",
    },
    Feature {
        title: "Multi-Source Support",
        description: "Stream from YouTube, SoundCloud, Bandcamp, Vimeo, and HTTP sources. Reliable dual metadata libraries with automatic fallback.",
    },
    Feature {
        title: "Audio Enhancements",
        description: "Bass boost filters, volume normalization, treble enhancement, and equalizer presets for optimal listening experience.",
    },
];

pub struct Command {
    pub usage: &'static str,
    pub summary: &'static str,
}

pub struct CommandCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub commands: &'static [Command],
}

pub const COMMAND_CATEGORIES: &[CommandCategory] = &[
    CommandCategory {
        id: "music",
        label: "Music Commands",
        commands: &[
            Command {
                usage: "/play <query>",
                summary: "Play music from YouTube (song name or URL)",
            },
            Command {
                usage: "/player",
                summary: "Open the interactive music player interface",
            },
            Command {
                usage: "/disconnect",
                summary: "Disconnect the bot from voice channel",
            },
            Command {
                usage: "/help",
                summary: "Show all available commands and features",
            },
        ],
    },
    CommandCategory {
        id: "playlist",
        label: "Playlist Commands",
        commands: &[
            Command {
                usage: "/create-playlist <name> [description]",
                summary: "Create a new personal playlist",
            },
            Command {
                usage: "/playlist",
                summary: "View and manage your personal playlists",
            },
        ],
    },
    CommandCategory {
        id: "player",
        label: "Player Interface Controls",
        commands: &[
            Command {
                usage: "Play/Pause Button",
                summary: "Control music playback",
            },
            Command {
                usage: "Next/Previous Buttons",
                summary: "Navigate between tracks",
            },
            Command {
                usage: "Loop Button",
                summary: "Toggle loop mode (Off/Track/Queue)",
            },
            Command {
                usage: "Save Button",
                summary: "Save current track to playlist",
            },
            Command {
                usage: "Stop Button",
                summary: "Stop playback and disconnect",
            },
        ],
    },
];
