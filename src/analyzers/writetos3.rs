use anyhow::Context;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tracing::info;

/// Content type for an output file, judged by its name.
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => "application/gzip",
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Uploads a local file to `bucket` under `prefix/<file name>`.
pub async fn upload_file_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    prefix: &str,
    path: &Path,
) -> anyhow::Result<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let key = format!("{}/{}", prefix.trim_end_matches('/'), file_name);

    let body = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    client
        .put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(body))
        .content_type(content_type(path))
        .send()
        .await?;

    info!(bucket, key = %key, "Uploaded to S3");
    Ok(key)
}
