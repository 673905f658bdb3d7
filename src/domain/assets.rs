use serde::{Deserialize, Serialize};

use crate::core::GlobeError;

/// Image layers of the globe, in draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Interior,
    Artwork,
    Glass,
    Reflection,
    Base,
}

impl Layer {
    pub const ALL: [Layer; 6] = [
        Layer::Background,
        Layer::Interior,
        Layer::Artwork,
        Layer::Glass,
        Layer::Reflection,
        Layer::Base,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::Background => "background",
            Layer::Interior => "interior",
            Layer::Artwork => "artwork",
            Layer::Glass => "glass",
            Layer::Reflection => "reflection",
            Layer::Base => "base",
        }
    }

    /// Whether the layer moves with the globe
    pub fn follows_camera(self) -> bool {
        !matches!(self, Layer::Background)
    }
}

/// URLs of everything the widget loads before it starts.
///
/// Any entry may be missing; that layer is simply not drawn.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub background: Option<String>,
    pub interior: Option<String>,
    pub artwork: Option<String>,
    pub glass: Option<String>,
    pub reflection: Option<String>,
    pub base: Option<String>,
    pub shake_audio: Option<String>,
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self, GlobeError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn url(&self, layer: Layer) -> Option<&str> {
        let url = match layer {
            Layer::Background => &self.background,
            Layer::Interior => &self.interior,
            Layer::Artwork => &self.artwork,
            Layer::Glass => &self.glass,
            Layer::Reflection => &self.reflection,
            Layer::Base => &self.base,
        };
        url.as_deref().filter(|u| !u.is_empty())
    }
}
