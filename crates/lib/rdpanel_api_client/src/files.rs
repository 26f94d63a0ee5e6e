//! Remote file manager endpoints.
//!
//! Transfers are binary: uploads go out as multipart forms and downloads are
//! streamed chunk by chunk into the caller's writer.

use std::path::Path;

use futures_util::StreamExt;
use rdpanel_core::models::SuccessResponse;
use rdpanel_core::models::files::{FileItem, FileOperation, FileSearchResults};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::client::Client;
use crate::error::{ApiError, ApiResult};

/// `/files/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct FilesApi<'a> {
    client: &'a Client,
}

impl Client {
    pub fn files(&self) -> FilesApi<'_> {
        FilesApi { client: self }
    }
}

impl FilesApi<'_> {
    /// Entries of a remote directory.
    pub async fn list(&self, path: &str) -> ApiResult<Vec<FileItem>> {
        self.client
            .get_query(&["files", "list"], &[("path", path)])
            .await
    }

    /// Upload `data` as `file_name` into the remote directory `dir`.
    pub async fn upload(
        &self,
        file_name: &str,
        data: Vec<u8>,
        dir: &str,
        encrypt: bool,
    ) -> ApiResult<FileItem> {
        if file_name.is_empty() {
            return Err(ApiError::Validation("file name must not be empty".into()));
        }
        let form = Form::new()
            .part("file", Part::bytes(data).file_name(file_name.to_string()))
            .text("path", dir.to_string())
            .text("encrypt", encrypt.to_string());

        let url = self.client.endpoint(&["files", "upload"])?;
        self.client
            .json(self.client.request(Method::POST, url).multipart(form))
            .await
    }

    /// Upload a local file, keeping its name.
    pub async fn upload_path(&self, local: &Path, dir: &str, encrypt: bool) -> ApiResult<FileItem> {
        let file_name = local
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::Validation(format!("{} has no file name", local.display())))?
            .to_string();
        let data = tokio::fs::read(local).await?;
        self.upload(&file_name, data, dir, encrypt).await
    }

    /// Stream a remote file into `writer`. Returns the number of bytes written.
    pub async fn download_to<W>(&self, remote: &str, writer: &mut W) -> ApiResult<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let url = self.client.endpoint_with_path(&["files", "download"], remote)?;
        let response = self.client.execute(self.client.request(Method::GET, url)).await?;

        let written = copy_body(response, writer).await?;
        debug!(remote, bytes = written, "download complete");
        Ok(written)
    }

    /// Download a remote file to a local path. A partial file is removed on
    /// failure.
    pub async fn download_file(&self, remote: &str, local: &Path) -> ApiResult<u64> {
        let mut file = tokio::fs::File::create(local).await?;
        match self.download_to(remote, &mut file).await {
            Ok(n) => Ok(n),
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(local).await;
                Err(e)
            }
        }
    }

    /// Zip archive of several remote files, streamed into `writer`.
    pub async fn bulk_download_to<W>(&self, paths: &[&str], writer: &mut W) -> ApiResult<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let url = self.client.endpoint(&["files", "bulk-download"])?;
        let response = self
            .client
            .execute(self.client.request(Method::POST, url).json(paths))
            .await?;

        copy_body(response, writer).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<SuccessResponse> {
        self.client
            .send_query(Method::DELETE, &["files", "delete"], &[("file_path", path)])
            .await
    }

    pub async fn create_directory(&self, path: &str) -> ApiResult<FileItem> {
        self.client
            .send_query(Method::POST, &["files", "create-directory"], &[("path", path)])
            .await
    }

    /// Move or rename.
    pub async fn rename(&self, source: &str, dest: &str) -> ApiResult<SuccessResponse> {
        self.client
            .send_query(
                Method::POST,
                &["files", "move"],
                &[("source_path", source), ("dest_path", dest)],
            )
            .await
    }

    /// Recent file operations of the current user.
    pub async fn operations(&self, limit: u32) -> ApiResult<Vec<FileOperation>> {
        self.client
            .get_query(&["files", "operations"], &[("limit", limit)])
            .await
    }

    pub async fn storage_stats(&self) -> ApiResult<Value> {
        self.client.get(&["files", "storage-stats"]).await
    }

    /// Delete several paths. The backend reports per-path failures in the
    /// response's `data.errors` rather than failing the call.
    pub async fn bulk_delete(&self, paths: &[&str]) -> ApiResult<SuccessResponse> {
        self.client
            .send_json(Method::POST, &["files", "bulk-delete"], paths)
            .await
    }

    /// Case-insensitive name search under `path`.
    pub async fn search(&self, query: &str, path: &str) -> ApiResult<FileSearchResults> {
        self.client
            .get_query(&["files", "search"], &[("query", query), ("path", path)])
            .await
    }

    pub async fn info(&self, path: &str) -> ApiResult<FileItem> {
        let url = self.client.endpoint_with_path(&["files", "info"], path)?;
        self.client
            .json(self.client.request(Method::GET, url))
            .await
    }
}

/// Write a response body into `writer` chunk by chunk, then flush.
async fn copy_body<W>(response: reqwest::Response, writer: &mut W) -> ApiResult<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}
