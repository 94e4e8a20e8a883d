//! Predefined user setting vocabulary.
//!
//! These keys must match the seed rows of the `predefined_settings` table;
//! every user gets one `user_settings` row per key at sign-up.

pub struct PredefinedSetting {
    pub key: &'static str,
    pub description: &'static str,
    /// Default value as a JSON literal.
    pub default_json: &'static str,
}

pub const PREDEFINED_SETTINGS: &[PredefinedSetting] = &[
    PredefinedSetting {
        key: "appearance.theme",
        description: "Color theme of the client (light or dark).",
        default_json: r#""light""#,
    },
    PredefinedSetting {
        key: "appearance.accent_color",
        description: "Accent color used to highlight selected items.",
        default_json: r##""#3b82f6""##,
    },
    PredefinedSetting {
        key: "locale.language",
        description: "Preferred language as an ISO 639-1 code.",
        default_json: r#""en""#,
    },
    PredefinedSetting {
        key: "locale.timezone",
        description: "IANA time zone used to compute today and tomorrow.",
        default_json: r#""UTC""#,
    },
    PredefinedSetting {
        key: "tasks.default_priority",
        description: "Priority given to new tasks.",
        default_json: r#""medium""#,
    },
    PredefinedSetting {
        key: "tasks.show_completed",
        description: "Whether completed tasks are shown in lists.",
        default_json: "true",
    },
    PredefinedSetting {
        key: "notifications.email",
        description: "Whether reminders are also sent by email.",
        default_json: "false",
    },
];

pub fn is_predefined(key: &str) -> bool {
    PREDEFINED_SETTINGS.iter().any(|s| s.key == key)
}
