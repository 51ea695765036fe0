//! Static directory of community consultation channels.

use std::collections::BTreeMap;

use super::types::ConsultationChannel;

const CHANNELS: &[(&str, ConsultationChannel)] = &[
    (
        "whatsapp",
        ConsultationChannel {
            name: "Medical Consultation Group",
            link: "https://chat.whatsapp.com/Lq7OV6PBT8p43y0dkoQUr6",
            description: "Get instant medical consultation from our doctors",
            icon: "whatsapp",
            color: "#25D366",
            available: true,
        },
    ),
    (
        "telegram",
        ConsultationChannel {
            name: "Health Support Channel",
            link: "https://t.me/+WovcsURvAd5iMWRk",
            description: "Join our health support community",
            icon: "telegram",
            color: "#0088cc",
            available: true,
        },
    ),
];

/// All consultation channels keyed by platform identifier.
pub fn consultation_groups() -> BTreeMap<String, ConsultationChannel> {
    CHANNELS
        .iter()
        .map(|(id, channel)| (id.to_string(), channel.clone()))
        .collect()
}

/// Look up a single channel by identifier ("whatsapp", "telegram").
pub fn consultation_channel(id: &str) -> Option<&'static ConsultationChannel> {
    let id = id.trim().to_lowercase();
    CHANNELS.iter().find(|(key, _)| *key == id).map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_channels_present() {
        let groups = consultation_groups();
        for key in ["whatsapp", "telegram"] {
            let channel = groups.get(key).unwrap();
            assert!(!channel.link.is_empty());
            assert!(channel.link.starts_with("https://"));
        }
    }

    #[test]
    fn test_colors_are_hex() {
        for channel in consultation_groups().values() {
            assert!(channel.color.starts_with('#'));
            assert!(channel.color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_lookup_single_channel() {
        assert_eq!(consultation_channel("Telegram").unwrap().icon, "telegram");
        assert!(consultation_channel("signal").is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(consultation_groups()).unwrap();
        assert_eq!(json["whatsapp"]["color"], "#25D366");
        assert_eq!(json["telegram"]["available"], true);
    }
}
