use anyhow::{Context, Result};
use gtfs::Record;

use crate::{ChunkSource, LoadProgress, LoadSession, SegmentInfo};

/// Loads a dataset that was split into chunk files, as described by a manifest.
///
/// Chunks are fetched strictly one after another, in manifest order, so records come out in
/// manifest order and then row order within each chunk. A chunk that can't be fetched is logged
/// and skipped; a manifest that can't be fetched fails the whole load.
pub struct SegmentedLoader<'a, S> {
    source: &'a S,
    manifest_path: String,
    base_path: String,
    max_segments: Option<usize>,
}

/// The result of a load that ran to completion.
pub struct Loaded<T> {
    pub info: SegmentInfo,
    pub data: T,
    pub loaded_segments: usize,
    /// Filenames of chunks that couldn't be fetched
    pub failed_segments: Vec<String>,
}

impl<'a, S: ChunkSource> SegmentedLoader<'a, S> {
    pub fn new(source: &'a S, manifest_path: &str, base_path: &str) -> Self {
        Self {
            source,
            manifest_path: manifest_path.to_string(),
            base_path: base_path.trim_end_matches('/').to_string(),
            max_segments: None,
        }
    }

    /// Only fetch the first few chunks listed in the manifest.
    pub fn max_segments(mut self, max: Option<usize>) -> Self {
        self.max_segments = max;
        self
    }

    /// Loads every chunk as records of type `R`, without further processing.
    pub async fn load_records<R: Record>(
        &self,
        session: &LoadSession,
    ) -> Result<Option<Loaded<Vec<R>>>> {
        self.load(session, gtfs::parse_chunk::<R>, |records| records)
            .await
    }

    /// `parse` turns one chunk's text into records; its flag is set only for the first chunk in
    /// the manifest, which carries the header line. `transform` shapes all accumulated records
    /// into the final result.
    ///
    /// Returns `None` when the session is cancelled partway through; nothing more is reported in
    /// that case.
    pub async fn load<R, T, P, F>(
        &self,
        session: &LoadSession,
        parse: P,
        transform: F,
    ) -> Result<Option<Loaded<T>>>
    where
        P: Fn(&str, bool) -> Vec<R>,
        F: FnOnce(Vec<R>) -> T,
    {
        if session.is_cancelled() {
            return Ok(None);
        }
        let info = self.load_manifest().await?;
        if session.is_cancelled() {
            return Ok(None);
        }

        let segments = match self.max_segments {
            Some(max) => &info.segments[..max.min(info.segments.len())],
            None => &info.segments[..],
        };
        let total_segments = segments.len();

        let mut records = Vec::new();
        let mut loaded_segments = 0;
        let mut failed_segments = Vec::new();
        for (idx, segment) in segments.iter().enumerate() {
            let path = format!("{}/{}", self.base_path, segment.filename);
            let result = self.source.fetch_text(&path).await;
            if session.is_cancelled() {
                debug!("Abandoning load of {} at {path}", self.manifest_path);
                return Ok(None);
            }

            let message = match result {
                Ok(text) => {
                    let parsed = parse(&text, idx == 0);
                    records.extend(parsed);
                    loaded_segments += 1;
                    format!(
                        "Processed {} of {} segments. Found {} items.",
                        idx + 1,
                        total_segments,
                        records.len()
                    )
                }
                Err(err) => {
                    warn!(
                        "Failed to load segment {}, continuing with next segment: {:#}",
                        segment.filename, err
                    );
                    failed_segments.push(segment.filename.clone());
                    format!(
                        "Skipped segment {} of {}. Found {} items.",
                        idx + 1,
                        total_segments,
                        records.len()
                    )
                }
            };
            session.report(LoadProgress {
                message,
                loaded_segments,
                total_segments,
                records: records.len(),
            });
        }

        let data = transform(records);
        Ok(Some(Loaded {
            info,
            data,
            loaded_segments,
            failed_segments,
        }))
    }

    async fn load_manifest(&self) -> Result<SegmentInfo> {
        let json = self
            .source
            .fetch_text(&self.manifest_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to load segments information from {}",
                    self.manifest_path
                )
            })?;
        SegmentInfo::from_json(&json)
            .with_context(|| format!("Failed to parse segments information {}", self.manifest_path))
    }
}
