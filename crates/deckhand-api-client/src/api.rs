//! Asset endpoints: multipart upload and delete by URL.

use crate::ApiClient;
use deckhand_core::models::{DeleteEnvelope, UploadEnvelope};
use deckhand_core::{CandidateFile, UploadError, UploadResult};
use reqwest::multipart::{Form, Part};

pub const IMAGE_UPLOAD_PATH: &str = "/images/upload";
pub const DECK_UPLOAD_PATH: &str = "/decks/upload";
pub const IMAGE_DELETE_PATH: &str = "/images/delete";

/// Multipart part carrying the raw file. An unparseable media type is left
/// off rather than failing the upload.
fn file_part(file: &CandidateFile) -> Part {
    let build = || {
        Part::stream_with_length(file.data().clone(), file.size_bytes())
            .file_name(file.name().to_string())
    };
    build().mime_str(file.media_type()).unwrap_or_else(|_| build())
}

impl ApiClient {
    /// Upload `file` as multipart field `file` to `path`.
    ///
    /// Issues exactly one request once a credential is obtained. Does not
    /// validate the file; callers must have done so.
    pub async fn upload_asset(
        &self,
        path: &str,
        file: &CandidateFile,
    ) -> Result<UploadResult, UploadError> {
        let credential = self.credential().await?;

        let url = self.build_url(path);
        let form = Form::new().part("file", file_part(file));

        tracing::debug!(
            endpoint = %url,
            filename = %file.name(),
            size_bytes = file.size_bytes(),
            "Sending upload request"
        );

        let response = self
            .send(self.client().post(&url).multipart(form), &credential)
            .await?;
        let status = response.status().as_u16();
        let envelope: UploadEnvelope = Self::parse_json(response).await?;

        if !envelope.success {
            return Err(UploadError::server_rejected(
                status,
                Some(
                    envelope
                        .message
                        .unwrap_or_else(|| "Upload failed".to_string()),
                ),
            ));
        }

        envelope.data.ok_or_else(|| {
            UploadError::MalformedResponse("upload succeeded without a data payload".to_string())
        })
    }

    /// Upload an image to `POST /images/upload`.
    pub async fn upload_image(&self, file: &CandidateFile) -> Result<UploadResult, UploadError> {
        self.upload_asset(IMAGE_UPLOAD_PATH, file).await
    }

    /// Delete a previously uploaded asset by its URL.
    ///
    /// Returns the server's `success` flag; `false` means nothing was removed
    /// and is not an error.
    pub async fn delete_asset(&self, asset_url: &str) -> Result<bool, UploadError> {
        let credential = self.credential().await?;

        let url = format!(
            "{}?image_url={}",
            self.build_url(IMAGE_DELETE_PATH),
            urlencoding::encode(asset_url)
        );

        tracing::debug!(asset_url = %asset_url, "Sending delete request");

        let response = self.send(self.client().delete(&url), &credential).await?;
        let envelope: DeleteEnvelope = Self::parse_json(response).await?;
        Ok(envelope.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SessionProvider, StaticSession};
    use mockito::Matcher;
    use std::sync::Arc;

    fn client_for(
        server: &mockito::ServerGuard,
        session: impl SessionProvider + 'static,
    ) -> ApiClient {
        ApiClient::new(server.url(), Arc::new(session), None).unwrap()
    }

    fn png() -> CandidateFile {
        CandidateFile::new("y.png", "image/png", vec![7u8; 1024])
    }

    #[tokio::test]
    async fn test_upload_sends_bearer_and_multipart_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/images/upload")
            .match_header("authorization", "Bearer tok")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="y.png""#.to_string()),
                Matcher::Regex("Content-Type: image/png".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success":true,"data":{"url":"https://x/y.png","filename":"y.png","sizeBytes":1024}}"#,
            )
            .create_async()
            .await;

        let result = client_for(&server, StaticSession::new("tok"))
            .upload_image(&png())
            .await
            .unwrap();

        assert_eq!(result.url, "https://x/y.png");
        assert_eq!(result.filename, "y.png");
        assert_eq!(result.size_bytes, 1024);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_success_false_is_rejected_with_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/images/upload")
            .with_status(200)
            .with_body(r#"{"success":false,"message":"bad"}"#)
            .create_async()
            .await;

        let err = client_for(&server, StaticSession::new("tok"))
            .upload_image(&png())
            .await
            .unwrap_err();

        assert_eq!(err, UploadError::server_rejected(200, Some("bad".to_string())));
        assert_eq!(err.to_string(), "bad");
    }

    #[tokio::test]
    async fn test_upload_error_status_uses_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/images/upload")
            .with_status(401)
            .with_body(r#"{"detail":"Invalid token"}"#)
            .create_async()
            .await;

        let err = client_for(&server, StaticSession::new("expired"))
            .upload_image(&png())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            UploadError::server_rejected(401, Some("Invalid token".to_string()))
        );
    }

    #[tokio::test]
    async fn test_upload_error_status_without_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/images/upload")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let err = client_for(&server, StaticSession::new("tok"))
            .upload_image(&png())
            .await
            .unwrap_err();

        assert_eq!(err, UploadError::server_rejected(502, None));
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[tokio::test]
    async fn test_upload_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/images/upload")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server, StaticSession::new("tok"))
            .upload_image(&png())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_upload_success_without_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/images/upload")
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let err = client_for(&server, StaticSession::new("tok"))
            .upload_image(&png())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_upload_without_session_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = client_for(&server, StaticSession::signed_out())
            .upload_image(&png())
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Unauthenticated(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_asset_custom_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/decks/upload")
            .with_status(201)
            .with_body(
                r#"{"success":true,"data":{"url":"https://x/spanish.apkg","filename":"spanish.apkg","sizeBytes":2}}"#,
            )
            .create_async()
            .await;

        let deck = CandidateFile::new("spanish.apkg", "application/octet-stream", vec![0u8, 1]);
        let result = client_for(&server, StaticSession::new("tok"))
            .upload_asset(DECK_UPLOAD_PATH, &deck)
            .await
            .unwrap();

        assert_eq!(result.filename, "spanish.apkg");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_network_failure() {
        // Nothing listens on port 9 (discard) in test environments.
        let client = ApiClient::new(
            "http://127.0.0.1:9",
            Arc::new(StaticSession::new("tok")),
            None,
        )
        .unwrap();

        let err = client.upload_image(&png()).await.unwrap_err();
        assert!(matches!(err, UploadError::NetworkFailure(_)));
    }

    #[tokio::test]
    async fn test_delete_encodes_url_and_returns_flag() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/images/delete")
            .match_header("authorization", "Bearer tok")
            .match_query(Matcher::UrlEncoded(
                "image_url".to_string(),
                "https://cdn.example.com/a b.png?v=1".to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let removed = client_for(&server, StaticSession::new("tok"))
            .delete_asset("https://cdn.example.com/a b.png?v=1")
            .await
            .unwrap();

        assert!(removed);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_logical_noop() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/images/delete")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success":false}"#)
            .create_async()
            .await;

        let removed = client_for(&server, StaticSession::new("tok"))
            .delete_asset("https://x/missing.png")
            .await
            .unwrap();
        assert!(!removed);
    }

    #[tokio::test]
    async fn test_delete_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/images/delete")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"detail":"Not your image"}"#)
            .create_async()
            .await;

        let err = client_for(&server, StaticSession::new("tok"))
            .delete_asset("https://x/theirs.png")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            UploadError::server_rejected(403, Some("Not your image".to_string()))
        );
    }
}
