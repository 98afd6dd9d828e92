// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! Images are decoded on a background thread and delivered through a
//! channel. A [`PendingImage`] is the only listener for a load: dropping it
//! detaches the listener, so a completion for an image that is no longer
//! displayed is never observed.

use crate::util::geometry::CanvasSize;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};

/// Decoded RGBA image.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    /// Natural size of the image, used to size the canvas.
    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize {
            width: self.width as f64,
            height: self.height as f64,
        }
    }
}

/// Load an image file and convert it to RGBA pixels.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

/// An image load in flight for one image key.
pub struct PendingImage {
    key: String,
    receiver: Option<Receiver<Result<LoadedImage, String>>>,
}

impl PendingImage {
    /// Start loading `path` on a background thread.
    pub fn spawn(key: impl Into<String>, path: PathBuf) -> Self {
        let (sender, receiver) = channel();

        std::thread::spawn(move || {
            let result = load_image(&path).map_err(|e| format!("{:#}", e));
            if let Ok(ref img) = result {
                log::info!("Loaded image: {} ({}x{})", path.display(), img.width, img.height);
            }
            // The listener may already be gone
            let _ = sender.send(result);
        });

        Self {
            key: key.into(),
            receiver: Some(receiver),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The completion, delivered at most once.
    pub fn poll(&mut self) -> Option<Result<LoadedImage, String>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(result) => {
                self.receiver = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.receiver = None;
                Some(Err("image loader stopped".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait(pending: &mut PendingImage) -> Result<LoadedImage, String> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = pending.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "image load timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_missing_file_reports_error_once() {
        let mut pending = PendingImage::spawn("missing", PathBuf::from("/nonexistent/none.png"));
        assert_eq!(pending.key(), "missing");
        assert!(wait(&mut pending).is_err());
        assert!(pending.poll().is_none());
    }

    #[test]
    fn test_loads_natural_size() {
        let path = std::env::temp_dir().join(format!(
            "boxlabel-media-{}.png",
            crate::models::annotation::new_annotation_id()
        ));
        image::RgbaImage::new(4, 3).save(&path).unwrap();

        let mut pending = PendingImage::spawn("img", path.clone());
        let loaded = wait(&mut pending).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.pixels.len(), 4 * 3 * 4);
        assert_eq!(
            loaded.canvas_size(),
            CanvasSize {
                width: 4.0,
                height: 3.0
            }
        );
    }
}
