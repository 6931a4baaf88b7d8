//! Value types passed across entity accessors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Switcher-wide identifier of a video source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputId(pub i64);

impl InputId {
    /// Black is always present.
    pub const BLACK: InputId = InputId(0);
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input {}", self.0)
    }
}

impl From<i64> for InputId {
    fn from(id: i64) -> Self {
        InputId(id)
    }
}

/// Filter shape of an equalizer band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandShape {
    LowShelf,
    LowPass,
    #[default]
    Bell,
    Notch,
    HighPass,
    HighShelf,
}

/// How an audio input contributes to the program mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioMixOption {
    #[default]
    Off,
    On,
    AudioFollowVideo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VideoMode {
    #[serde(rename = "720p50")]
    Hd720p50,
    #[serde(rename = "720p59.94")]
    Hd720p5994,
    #[serde(rename = "1080i50")]
    Hd1080i50,
    #[serde(rename = "1080i59.94")]
    Hd1080i5994,
    #[serde(rename = "1080p25")]
    Hd1080p25,
    #[default]
    #[serde(rename = "1080p50")]
    Hd1080p50,
    #[serde(rename = "2160p25")]
    Uhd2160p25,
    #[serde(rename = "2160p50")]
    Uhd2160p50,
}

impl VideoMode {
    pub fn frame_rate(self) -> f64 {
        match self {
            VideoMode::Hd720p50 | VideoMode::Hd1080p50 | VideoMode::Uhd2160p50 => 50.0,
            VideoMode::Hd720p5994 => 60000.0 / 1001.0,
            VideoMode::Hd1080i50 | VideoMode::Hd1080p25 | VideoMode::Uhd2160p25 => 25.0,
            VideoMode::Hd1080i5994 => 30000.0 / 1001.0,
        }
    }

    pub fn is_interlaced(self) -> bool {
        matches!(self, VideoMode::Hd1080i50 | VideoMode::Hd1080i5994)
    }

    /// Frame height in lines.
    pub fn height(self) -> u32 {
        match self {
            VideoMode::Hd720p50 | VideoMode::Hd720p5994 => 720,
            VideoMode::Uhd2160p25 | VideoMode::Uhd2160p50 => 2160,
            _ => 1080,
        }
    }
}
