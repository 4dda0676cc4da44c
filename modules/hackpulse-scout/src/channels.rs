/// Channels polled every cycle. Statically configured; changing the list
/// means a redeploy, which is fine at this scale.
pub const CHANNELS: &[&str] = &[
    "astanahub",
    "uppertunity",
    "nuris_nu",
    "terriconvalley",
    "bluescreenkz",
    "kolesa_team",
    "tce_kz",
    "hackathons_ru",
];
