//! Markdown and JSON export of crawled floors.

use std::path::Path;

use crate::error::Result;
use crate::markdown::{IMAGES_DIR, collect_images, render_markdown};
use crate::types::{Event, Floor};

use super::TiebaArchiver;

impl TiebaArchiver {
    /// Write `floors` as Markdown to `output_file` and download their images
    ///
    /// The document is written first (overwriting any existing file); images
    /// then go into an `images` directory next to it.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Io`] if the document cannot be written; no image is fetched
    /// - any error from [`TiebaArchiver::fetch_images`]; the document stays on disk
    pub async fn export_markdown(
        &self,
        floors: &[Floor],
        output_file: impl AsRef<Path>,
    ) -> Result<()> {
        let output = output_file.as_ref();

        tokio::fs::write(output, render_markdown(floors)).await?;
        self.emit(Event::MarkdownWritten {
            path: output.to_path_buf(),
        });

        let images = collect_images(floors);
        let image_dir = output
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(IMAGES_DIR);
        self.fetch_images(&images, &image_dir).await?;

        self.emit(Event::Exported {
            path: output.to_path_buf(),
            images: images.len(),
        });
        Ok(())
    }

    /// Dump `floors` as pretty-printed JSON to `output_file`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub async fn export_json(
        &self,
        floors: &[Floor],
        output_file: impl AsRef<Path>,
    ) -> Result<()> {
        let output = output_file.as_ref();
        let json = serde_json::to_vec_pretty(floors)?;
        tokio::fs::write(output, json).await?;
        self.emit(Event::JsonWritten {
            path: output.to_path_buf(),
        });
        Ok(())
    }

    /// Crawl pages `from_page..=to_page` of a thread and export them as Markdown
    ///
    /// # Errors
    ///
    /// Any error from [`TiebaArchiver::crawl_thread`] (nothing is written) or
    /// [`TiebaArchiver::export_markdown`].
    pub async fn download_thread_as_markdown(
        &self,
        thread_url: &str,
        from_page: u32,
        to_page: u32,
        output_file: impl AsRef<Path>,
    ) -> Result<()> {
        let floors = self.crawl_thread(thread_url, from_page, to_page).await?;
        self.export_markdown(&floors, output_file).await
    }
}
