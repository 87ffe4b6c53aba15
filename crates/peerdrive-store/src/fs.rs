//! Local-directory content engine

use crate::{
    normalize_key, ByteRange, ByteStream, ContentEngine, EntryStat, Result, StoreError,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio_util::io::ReaderStream;

/// A content engine backed by a directory on the local filesystem.
///
/// Collections stay virtual at the protocol level: MKCOL never reaches this
/// engine, and intermediate directories are created on demand by writes. All
/// writes go through the streaming strategy; there is no direct put.
#[derive(Clone)]
pub struct FsEngine {
    root: PathBuf,
}

impl FsEngine {
    /// Open an engine rooted at `root`, creating the directory if needed
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Root directory this engine serves
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a path beneath the root, rejecting traversal segments
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let key = normalize_key(key);
        let mut path = self.root.clone();
        for segment in key.split('/').filter(|s| !s.is_empty()) {
            if segment == ".." || segment == "." {
                return Err(StoreError::InvalidKey(key.clone()));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

#[async_trait]
impl ContentEngine for FsEngine {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let path = self.key_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_stream(&self, key: &str, mut data: ByteStream) -> Result<()> {
        let path = self.key_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(&path).await?;
        while let Some(chunk) = data.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let want = normalize_key(prefix);
        let path = self.key_path(prefix)?;
        let mut dir = match tokio::fs::read_dir(&path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut children = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let child = if want.is_empty() {
                name
            } else {
                format!("{want}/{name}")
            };
            children.push(child);
        }
        children.sort();
        Ok(children)
    }

    async fn stat(&self, key: &str) -> Result<Option<EntryStat>> {
        let path = self.key_path(key)?;
        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let modified = meta.modified().ok().map(DateTime::<Utc>::from);
        if meta.is_dir() {
            Ok(Some(EntryStat {
                is_collection: true,
                size: None,
                modified,
            }))
        } else {
            Ok(Some(EntryStat::entry(Some(meta.len()), modified)))
        }
    }

    async fn read_stream(&self, key: &str, range: Option<ByteRange>) -> Result<ByteStream> {
        let path = self.key_path(key)?;
        let mut file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(normalize_key(key)));
            }
            Err(e) => return Err(e.into()),
        };
        match range {
            Some(r) => {
                file.seek(SeekFrom::Start(r.start)).await?;
                let windowed = file.take(r.byte_len());
                Ok(ReaderStream::new(windowed)
                    .map_err(StoreError::from)
                    .boxed())
            }
            None => Ok(ReaderStream::new(file).map_err(StoreError::from).boxed()),
        }
    }

    fn writable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk_stream;
    use futures::StreamExt;

    async fn temp_engine() -> (tempfile::TempDir, FsEngine) {
        let dir = tempfile::tempdir().unwrap();
        let engine = FsEngine::new(dir.path()).await.unwrap();
        (dir, engine)
    }

    async fn collect(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn write_stream_then_get() {
        let (_dir, engine) = temp_engine().await;
        engine
            .write_stream("docs/a.txt", chunk_stream(Bytes::from_static(b"hello")))
            .await
            .unwrap();
        let data = engine.get("docs/a.txt").await.unwrap().unwrap();
        assert_eq!(data.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn direct_put_is_unsupported() {
        let (_dir, engine) = temp_engine().await;
        let err = engine.put("x", Bytes::from_static(b"1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Unsupported("put")));
    }

    #[tokio::test]
    async fn read_stream_windows_by_offset() {
        let (_dir, engine) = temp_engine().await;
        engine
            .write_stream("r.bin", chunk_stream(Bytes::from_static(b"0123456789")))
            .await
            .unwrap();
        let stream = engine
            .read_stream("r.bin", Some(ByteRange { start: 3, end: 6 }))
            .await
            .unwrap();
        assert_eq!(collect(stream).await, b"3456");
    }

    #[tokio::test]
    async fn stat_reports_size_and_collections() {
        let (_dir, engine) = temp_engine().await;
        engine
            .write_stream("docs/a.txt", chunk_stream(Bytes::from_static(b"abc")))
            .await
            .unwrap();

        let stat = engine.stat("docs/a.txt").await.unwrap().unwrap();
        assert_eq!(stat.size, Some(3));
        assert!(!stat.is_collection);
        assert!(stat.modified.is_some());

        let stat = engine.stat("docs").await.unwrap().unwrap();
        assert!(stat.is_collection);

        assert!(engine.stat("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_one_level() {
        let (_dir, engine) = temp_engine().await;
        engine
            .write_stream("docs/a.txt", chunk_stream(Bytes::from_static(b"a")))
            .await
            .unwrap();
        engine
            .write_stream("docs/sub/b.txt", chunk_stream(Bytes::from_static(b"b")))
            .await
            .unwrap();

        let children = engine.list("docs").await.unwrap();
        assert_eq!(children, vec!["docs/a.txt".to_string(), "docs/sub".to_string()]);
        assert!(engine.list("absent").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let (_dir, engine) = temp_engine().await;
        let err = engine.get("../escape").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn delete_tolerates_absence() {
        let (_dir, engine) = temp_engine().await;
        engine.delete("never-existed").await.unwrap();
    }
}
