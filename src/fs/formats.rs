//! Whole-file reads and writes for bytes, text, lines and JSON.
//!
//! Writers create missing parent directories first. Readers report a missing
//! file as an error, except [`read_json`], which treats a missing or malformed
//! document as "no value".

use crate::constants::DEFAULT_EOL;
use crate::core::file_error::{FileOperation, FileResultExt};
use crate::core::{FsError, Result};
use crate::fs::dirs::{ensure_parent, ensure_parent_sync};
use crate::fs::probe::exists;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Split text into lines on `\r\n` if it contains one, otherwise on `\n`.
///
/// A trailing separator yields a trailing empty line, so joining the result
/// with the same separator restores the input.
pub fn split_lines(text: &str) -> Vec<String> {
    let eol = if text.contains("\r\n") { "\r\n" } else { "\n" };
    text.split(eol).map(str::to_owned).collect()
}

fn join_lines<S: AsRef<str>>(lines: &[S], eol: Option<&str>) -> String {
    let eol = eol.unwrap_or(DEFAULT_EOL);
    lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(eol)
}

/// Read a file as bytes.
pub async fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    Ok(tokio::fs::read(path).await.with_file_context(
        FileOperation::Read,
        path,
        "reading file",
        "fs::formats::read_file",
    )?)
}

/// Blocking mirror of [`read_file`].
pub fn read_file_sync(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    Ok(std::fs::read(path).with_file_context(
        FileOperation::Read,
        path,
        "reading file",
        "fs::formats::read_file_sync",
    )?)
}

/// Read a UTF-8 text file.
pub async fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    Ok(tokio::fs::read_to_string(path).await.with_file_context(
        FileOperation::Read,
        path,
        "reading text file",
        "fs::formats::read_text_file",
    )?)
}

/// Blocking mirror of [`read_text_file`].
pub fn read_text_file_sync(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    Ok(std::fs::read_to_string(path).with_file_context(
        FileOperation::Read,
        path,
        "reading text file",
        "fs::formats::read_text_file_sync",
    )?)
}

/// Read a text file and split it with [`split_lines`].
pub async fn read_text_file_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    Ok(split_lines(&read_text_file(path).await?))
}

/// Blocking mirror of [`read_text_file_lines`].
pub fn read_text_file_lines_sync(path: impl AsRef<Path>) -> Result<Vec<String>> {
    Ok(split_lines(&read_text_file_sync(path)?))
}

/// Write bytes, creating parent directories as needed.
pub async fn write_file(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path).await?;
    tokio::fs::write(path, contents).await.with_file_context(
        FileOperation::Write,
        path,
        "writing file",
        "fs::formats::write_file",
    )?;
    Ok(())
}

/// Blocking mirror of [`write_file`].
pub fn write_file_sync(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_sync(path)?;
    std::fs::write(path, contents).with_file_context(
        FileOperation::Write,
        path,
        "writing file",
        "fs::formats::write_file_sync",
    )?;
    Ok(())
}

/// Write text, creating parent directories as needed.
pub async fn write_text_file(path: impl AsRef<Path>, text: &str) -> Result<()> {
    write_file(path, text.as_bytes()).await
}

/// Blocking mirror of [`write_text_file`].
pub fn write_text_file_sync(path: impl AsRef<Path>, text: &str) -> Result<()> {
    write_file_sync(path, text.as_bytes())
}

/// Join `lines` with `eol` (default `\n`) and write them.
pub async fn write_text_lines<S: AsRef<str>>(
    path: impl AsRef<Path>,
    lines: &[S],
    eol: Option<&str>,
) -> Result<()> {
    write_text_file(path, &join_lines(lines, eol)).await
}

/// Blocking mirror of [`write_text_lines`].
pub fn write_text_lines_sync<S: AsRef<str>>(
    path: impl AsRef<Path>,
    lines: &[S],
    eol: Option<&str>,
) -> Result<()> {
    write_text_file_sync(path, &join_lines(lines, eol))
}

/// Read and parse a JSON file, leniently.
///
/// Returns `Ok(None)` when the file does not exist or does not parse as `T`;
/// the parse failure is logged at debug level. Other read failures are errors.
pub async fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Option<T>> {
    let path = path.as_ref();
    if !exists(path).await {
        return Ok(None);
    }
    let text = read_text_file(path).await?;
    match serde_json::from_str(&text) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::debug!(
                target: "fs::read",
                "ignoring invalid JSON in {}: {e}",
                path.display()
            );
            Ok(None)
        }
    }
}

/// Read and parse a JSON file, failing on a missing file or bad content.
///
/// # Errors
///
/// [`FsError::NotFound`] or [`FsError::InvalidJson`].
pub async fn read_json_strict<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    if !exists(path).await {
        return Err(FsError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = read_text_file(path).await?;
    serde_json::from_str(&text).map_err(|source| FsError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as JSON and write it, creating parents as needed.
pub async fn write_json<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
    pretty: bool,
) -> Result<()> {
    let path = path.as_ref();
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|source| FsError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    write_text_file(path, &json).await
}
