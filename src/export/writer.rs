use std::path::{Path, PathBuf};

use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufWriter},
};

use crate::{
    Res,
    export::row::{self, TrackRow},
    utils,
};

/// One output file. The header is written on creation; nothing reaches the
/// disk for sure until [`TsvWriter::finish`].
pub struct TsvWriter {
    path: PathBuf,
    file_name: String,
    out: BufWriter<File>,
    rows: usize,
}

impl TsvWriter {
    /// Creates (or truncates) `<sanitized list name>.tsv` inside `dir`.
    pub async fn create(dir: &Path, list_name: &str) -> Res<Self> {
        async_fs::create_dir_all(dir).await?;

        let file_name = format!("{}.tsv", utils::sanitize_filename(list_name));
        let path = dir.join(&file_name);
        let file = File::create(&path).await?;

        let mut writer = Self {
            path,
            file_name,
            out: BufWriter::new(file),
            rows: 0,
        };
        writer.out.write_all(row::header_line().as_bytes()).await?;
        Ok(writer)
    }

    pub async fn write_row(&mut self, row: &TrackRow) -> Res<()> {
        self.out.write_all(row.to_line().as_bytes()).await?;
        self.rows += 1;
        Ok(())
    }

    pub async fn write_local(&mut self, track_name: &str) -> Res<()> {
        self.out
            .write_all(row::local_line(track_name).as_bytes())
            .await?;
        self.rows += 1;
        Ok(())
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and closes the file, returning its path.
    pub async fn finish(mut self) -> Res<PathBuf> {
        self.out.flush().await?;
        self.out.get_mut().sync_all().await?;
        Ok(self.path)
    }
}
