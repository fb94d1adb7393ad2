use serde::{Deserialize, Serialize};

use crate::ASSETS;

/// A live stream in the channel guide
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub url: String,
}

/// The channel guide: the embedded built-in streams, optionally followed by
/// extras from the config file. Guide order is display order; the first
/// channel is the default tune-in.
#[derive(Debug, Clone)]
pub struct ChannelGuide {
    channels: Vec<Channel>,
}

impl ChannelGuide {
    pub fn builtin() -> Self {
        let file = ASSETS
            .get_file("channels.json")
            .expect("channel guide missing from embedded assets");
        let contents = file
            .contents_utf8()
            .expect("channel guide is not valid utf-8");
        let channels =
            serde_json::from_str(contents).expect("unable to deserialize channel guide");
        Self { channels }
    }

    /// Built-in guide plus extras; an extra whose name is already in the
    /// guide is dropped.
    pub fn with_extras(extras: &[Channel]) -> Self {
        let mut guide = Self::builtin();
        for extra in extras {
            if guide.find(&extra.name).is_none() {
                guide.channels.push(extra.clone());
            }
        }
        guide
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn find(&self, name: &str) -> Option<&Channel> {
        self.channels
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.channels
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }
}
