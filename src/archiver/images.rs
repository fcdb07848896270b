//! Image downloads with bounded concurrency and skip-if-exists.

use std::collections::HashSet;
use std::path::Path;

use futures::stream::{self, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::types::{Event, Image};

use super::TiebaArchiver;

/// Make sure `dir` exists and is a directory, creating it if absent
///
/// # Errors
///
/// Returns [`Error::NotADirectory`] if something other than a directory
/// occupies `dir`, or [`Error::Io`] if it cannot be created.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tokio::fs::create_dir_all(dir).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// What happened to a single image
enum Saved {
    Downloaded,
    Skipped,
}

fn download_failed(url: &str, reason: impl Into<String>) -> Error {
    Error::DownloadFailed {
        url: url.to_string(),
        reason: reason.into(),
    }
}

impl TiebaArchiver {
    /// Download `images` into `target_dir`
    ///
    /// At most `crawl.image_batch_size` downloads are in flight; a new one
    /// starts as soon as any finishes. Files that already exist are skipped
    /// without being re-verified, so a second call with the same list makes no
    /// requests. Repeated filenames are downloaded once.
    ///
    /// # Errors
    ///
    /// - [`Error::NotADirectory`] if `target_dir` is occupied by a file
    /// - [`Error::DownloadFailed`] for the first failed image in list order;
    ///   every other dispatched download still runs to completion
    pub async fn fetch_images(&self, images: &[Image], target_dir: &Path) -> Result<()> {
        ensure_dir(target_dir).await?;

        let mut seen = HashSet::new();
        let unique: Vec<&Image> = images
            .iter()
            .filter(|image| seen.insert(image.filename.as_str()))
            .collect();
        let limit = self.config.crawl.image_batch_size.max(1);

        let mut results: Vec<(usize, Result<()>)> = stream::iter(unique.into_iter().enumerate())
            .map(|(index, image)| async move {
                (index, self.download_image(image, target_dir).await)
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        // Completion order depends on the network; report failures in list order
        results.sort_unstable_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }

    async fn download_image(&self, image: &Image, target_dir: &Path) -> Result<()> {
        let dest = target_dir.join(&image.filename);

        match self.save_image(image, &dest).await {
            Ok(Saved::Skipped) => {
                self.emit(Event::ImageSkipped { path: dest });
                Ok(())
            }
            Ok(Saved::Downloaded) => {
                self.emit(Event::ImageDownloaded {
                    url: image.url.clone(),
                    path: dest,
                });
                Ok(())
            }
            Err(err) => {
                let error = match &err {
                    Error::DownloadFailed { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                self.emit(Event::ImageFailed {
                    url: image.url.clone(),
                    error,
                });
                Err(err)
            }
        }
    }

    async fn save_image(&self, image: &Image, dest: &Path) -> Result<Saved> {
        let exists = tokio::fs::try_exists(dest).await.map_err(|e| {
            download_failed(&image.url, format!("cannot check {}: {e}", dest.display()))
        })?;
        if exists {
            return Ok(Saved::Skipped);
        }

        if let Err(err) = self.stream_to_file(&image.url, dest).await {
            // Partial file may or may not exist yet
            tokio::fs::remove_file(dest).await.ok();
            return Err(err);
        }
        Ok(Saved::Downloaded)
    }

    /// Stream the response body for `url` into a new file at `dest`
    async fn stream_to_file(&self, url: &str, dest: &Path) -> Result<()> {
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| download_failed(url, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_failed(url, format!("HTTP {}", status.as_u16())));
        }

        let mut file = tokio::fs::File::create(dest).await.map_err(|e| {
            download_failed(url, format!("failed to create {}: {e}", dest.display()))
        })?;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| download_failed(url, format!("body stream error: {e}")))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| download_failed(url, format!("write error: {e}")))?;
        }
        file.flush()
            .await
            .map_err(|e| download_failed(url, format!("write error: {e}")))?;
        Ok(())
    }
}
