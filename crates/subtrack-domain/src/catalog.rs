//! Well-known services offered as presets when adding a subscription.

use chrono::NaiveDate;

use crate::{
    money::Money,
    subscription::{HexColor, SubscriptionDraft},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub color: &'static str,
    pub logo: &'static str,
}

impl Preset {
    /// Prefills a draft with the preset's name, accent and logo.
    pub fn draft(&self, renewal_date: NaiveDate, cost: Money) -> SubscriptionDraft {
        let color = HexColor::parse(self.color).unwrap_or_default();
        SubscriptionDraft::new(self.name, renewal_date, cost)
            .with_color(color)
            .with_logo(self.logo)
    }
}

macro_rules! preset {
    ($name:expr, $color:expr, $logo:expr) => {
        Preset {
            name: $name,
            color: $color,
            logo: concat!("logos/", $logo),
        }
    };
}

pub const PRESETS: &[Preset] = &[
    preset!("Netflix", "#E50914", "netflix.png"),
    preset!("Spotify", "#1DB954", "spotify.png"),
    preset!("Amazon Prime", "#00A8E1", "amazon_prime.png"),
    preset!("Disney+", "#113CCF", "disney_plus.png"),
    preset!("Slack", "#4A154B", "slack.png"),
    preset!("LinkedIn Premium", "#0077B5", "linkedin_premium.png"),
    preset!("YouTube Premium", "#FF0000", "youtube.png"),
    preset!("HBO Max", "#8400FF", "hbo.png"),
    preset!("Apple TV+", "#000000", "appletv.png"),
    preset!("Xbox Game Pass", "#107C10", "xbox.png"),
    preset!("PlayStation Plus", "#003791", "playstation.png"),
    preset!("Apple Music", "#FC3C44", "applemusic.png"),
    preset!("Adobe Creative Cloud", "#FF0000", "adobe.png"),
    preset!("Microsoft 365", "#0078D4", "office365.png"),
    preset!("Google One", "#4285F4", "googleone.png"),
    preset!("Dropbox", "#0061FF", "dropbox.png"),
    preset!("iCloud+", "#147EFB", "icloud.png"),
    preset!("Hulu", "#1CE783", "hulu.png"),
    preset!("EA Play", "#FF4747", "eaplay.png"),
    preset!("Paramount+", "#0064FF", "paramount.png"),
    preset!("Discord Nitro", "#5865F2", "discord.png"),
    preset!("GitHub Pro", "#24292E", "github.png"),
    preset!("Nord VPN", "#4687FF", "nordvpn.png"),
    preset!("Twitch Prime", "#9146FF", "twitch.png"),
    preset!("Crunchyroll", "#F47521", "crunchyroll.png"),
    preset!("Amazon Music", "#00A8E1", "amazonmusic.png"),
];

/// Case-insensitive preset lookup by service name.
pub fn preset(name: &str) -> Option<&'static Preset> {
    let wanted = name.trim();
    PRESETS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(wanted))
}
