//! Image and audio loading.
//!
//! Every image is requested up front and then awaited in layer order. A
//! failed image only costs its layer; audio is created lazily by the browser
//! and any `play()` rejection is ignored.

use js_sys::{Function, Promise};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAudioElement, HtmlImageElement};

use crate::core::GlobeError;
use crate::domain::assets::{AssetManifest, Layer};
use crate::systems::drag::ShakeCue;

use super::canvas::LayerImages;

/// Start loading `url`; the promise settles on `load` or `error`.
fn request_image(url: &str) -> Result<(HtmlImageElement, Promise), GlobeError> {
    let image = HtmlImageElement::new().map_err(|e| GlobeError::from_js(&e))?;
    let mut executor = |resolve: Function, reject: Function| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    };
    let promise = Promise::new(&mut executor);
    image.set_src(url);
    Ok((image, promise))
}

/// Load every layer named in the manifest. Never fails: broken layers are
/// logged and left out.
pub(crate) async fn load_layers(manifest: &AssetManifest) -> LayerImages {
    let mut pending = Vec::new();
    for layer in Layer::ALL {
        let Some(url) = manifest.url(layer) else { continue };
        match request_image(url) {
            Ok((image, promise)) => pending.push((layer, url.to_string(), image, promise)),
            Err(e) => log::warn!("{} layer: {}", layer.name(), e),
        }
    }

    let mut images: LayerImages = Default::default();
    for (layer, url, image, promise) in pending {
        let loaded = JsFuture::from(promise).await;
        image.set_onload(None);
        image.set_onerror(None);
        match loaded {
            Ok(_) => images[layer.index()] = Some(image),
            Err(_) => log::warn!("failed to load {} layer from {}", layer.name(), url),
        }
    }

    let count = images.iter().filter(|i| i.is_some()).count();
    log::info!("loaded {}/{} image layers", count, Layer::ALL.len());
    images
}

/// Shake sound backed by an `<audio>` element.
pub(crate) struct WebShakeCue {
    audio: Option<HtmlAudioElement>,
}

impl WebShakeCue {
    pub(crate) fn new(url: Option<&str>) -> Self {
        let audio = url.and_then(|url| match HtmlAudioElement::new_with_src(url) {
            Ok(audio) => {
                audio.set_preload("none");
                Some(audio)
            }
            Err(e) => {
                log::warn!("shake audio unavailable: {:?}", e);
                None
            }
        });
        Self { audio }
    }
}

impl ShakeCue for WebShakeCue {
    fn is_playing(&self) -> bool {
        self.audio.as_ref().map(|a| !a.paused() && !a.ended()).unwrap_or(false)
    }

    fn play(&mut self) {
        let Some(audio) = &self.audio else { return };
        audio.set_current_time(0.0);
        if let Ok(promise) = audio.play() {
            // Autoplay policies reject until the user has interacted; that's fine.
            wasm_bindgen_futures::spawn_local(async move {
                let _ = JsFuture::from(promise).await;
            });
        }
    }
}
