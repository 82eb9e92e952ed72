//! Background avatar fetcher.
//!
//! Downloads profile pictures on worker threads and decodes them into RGBA
//! buffers sized for the profile card, ready for texture upload.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc;
use std::time::Duration;

use image::imageops::FilterType;

/// Largest edge of a decoded avatar, in pixels.
pub const AVATAR_MAX_EDGE: u32 = 128;

const AVATAR_TIMEOUT: Duration = Duration::from_secs(10);

/// Decoded avatar pixels (RGBA, row-major).
pub struct AvatarImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Tracks in-flight, decoded and failed avatar downloads by URL.
#[derive(Default)]
pub struct AvatarLoader {
    pending: HashMap<String, mpsc::Receiver<Option<AvatarImage>>>,
    loaded: HashMap<String, AvatarImage>,
    failed: HashSet<String>,
}

impl AvatarLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a download unless the URL is already known. `notify` runs on
    /// the worker once the result is ready (typically a repaint request).
    pub fn request<F>(&mut self, url: &str, notify: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if url.is_empty()
            || self.loaded.contains_key(url)
            || self.pending.contains_key(url)
            || self.failed.contains(url)
        {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let owned = url.to_string();
        std::thread::spawn(move || {
            let result = fetch_avatar(&owned);
            let _ = tx.send(result);
            notify();
        });
        self.pending.insert(url.to_string(), rx);
    }

    /// Move finished downloads out of the pending set. Call every frame.
    pub fn poll(&mut self) {
        let mut done = Vec::new();
        for (url, rx) in &self.pending {
            match rx.try_recv() {
                Ok(Some(img)) => {
                    self.loaded.insert(url.clone(), img);
                    done.push(url.clone());
                }
                Ok(None) | Err(mpsc::TryRecvError::Disconnected) => {
                    self.failed.insert(url.clone());
                    done.push(url.clone());
                }
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }
        for url in done {
            self.pending.remove(&url);
        }
    }

    pub fn get(&self, url: &str) -> Option<&AvatarImage> {
        self.loaded.get(url)
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains_key(url)
    }
}

fn fetch_avatar(url: &str) -> Option<AvatarImage> {
    let resp = reqwest::blocking::Client::builder()
        .timeout(AVATAR_TIMEOUT)
        .build()
        .ok()?
        .get(url)
        .send()
        .map_err(|e| log::debug!("Avatar {} failed: {}", url, e))
        .ok()?;

    if !resp.status().is_success() {
        log::debug!("Avatar {} -> {}", url, resp.status());
        return None;
    }

    let bytes = resp.bytes().ok()?;
    decode_avatar(&bytes)
}

/// Decode and shrink to fit [`AVATAR_MAX_EDGE`], keeping the aspect ratio.
pub fn decode_avatar(bytes: &[u8]) -> Option<AvatarImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| log::debug!("Avatar decode failed: {}", e))
        .ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    let longest = w.max(h);
    let rgba = if longest > AVATAR_MAX_EDGE {
        let ratio = AVATAR_MAX_EDGE as f32 / longest as f32;
        let nw = ((w as f32 * ratio).round() as u32).max(1);
        let nh = ((h as f32 * ratio).round() as u32).max(1);
        image::imageops::resize(&rgba, nw, nh, FilterType::Triangle)
    } else {
        rgba
    };

    let (width, height) = rgba.dimensions();
    Some(AvatarImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn loader_deduplicates() {
        let mut loader = AvatarLoader::new();
        loader.request("http://127.0.0.1:9/a.png", || {});
        loader.request("http://127.0.0.1:9/a.png", || {});
        assert_eq!(loader.pending.len(), 1);
        assert!(loader.is_pending("http://127.0.0.1:9/a.png"));
    }

    #[test]
    fn empty_url_is_ignored() {
        let mut loader = AvatarLoader::new();
        loader.request("", || {});
        assert!(loader.pending.is_empty());
    }

    #[test]
    fn large_avatars_are_shrunk() {
        let img = decode_avatar(&png(460, 230)).unwrap();
        assert_eq!((img.width, img.height), (128, 64));
        assert_eq!(img.rgba.len(), 128 * 64 * 4);
    }

    #[test]
    fn small_avatars_are_untouched() {
        let img = decode_avatar(&png(40, 40)).unwrap();
        assert_eq!((img.width, img.height), (40, 40));
    }

    #[test]
    fn garbage_does_not_decode() {
        assert!(decode_avatar(b"not an image").is_none());
    }
}
