//! Media URL mutations
//!
//! The API never proxies file bytes; clients upload directly to object
//! storage with a presigned PUT and later fetch with presigned GETs. View
//! signing is fail-open so one bad stored URL cannot blank a whole feed.

use chrono::Utc;

use super::prelude::*;

#[derive(Default)]
pub struct MediaMutations;

#[Object]
impl MediaMutations {
    /// Presign one upload slot per requested file
    async fn get_upload_targets(
        &self,
        ctx: &Context<'_>,
        requests: Vec<UploadRequest>,
    ) -> Result<Vec<UploadTarget>> {
        let auth = ctx.auth_user()?;
        let storage = ctx.data_unchecked::<StorageClient>();

        let now = Utc::now();
        let now_millis = now.timestamp_millis();

        let targets = requests
            .iter()
            .enumerate()
            .map(|(index, request)| {
                let key = storage.object_key(&auth.uid, now_millis, index, &request.filename);
                UploadTarget {
                    upload_url: storage.presign_put(&key, &request.content_type, now),
                    public_url: storage.public_url(&key),
                    fields: Vec::new(),
                }
            })
            .collect();

        tracing::debug!(user_id = %auth.uid, count = requests.len(), "Upload targets presigned");
        Ok(targets)
    }

    /// Presign stored public URLs for viewing.
    ///
    /// URLs that cannot be parsed back to a storage key pass through
    /// unchanged rather than failing the whole batch.
    async fn get_view_urls(&self, ctx: &Context<'_>, urls: Vec<String>) -> Result<Vec<String>> {
        let _auth = ctx.auth_user()?;
        let storage = ctx.data_unchecked::<StorageClient>();

        let now = Utc::now();
        let signed = urls
            .into_iter()
            .map(|url| match storage.sign_view_url(&url, now) {
                Some(signed) => signed,
                None => {
                    tracing::warn!(url = %url, "Could not presign stored URL, returning it unsigned");
                    url
                }
            })
            .collect();
        Ok(signed)
    }
}
