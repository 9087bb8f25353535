//! Shared HTTP response checks for the review API client.

use crate::error::ReportError;

/// Return the response unchanged on success; map 429 to
/// [`ReportError::RateLimited`] (honouring `Retry-After`, default 60 s) and
/// any other failure status to [`ReportError::Api`] with the response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ReportError> {
    if resp.status() == 429 {
        return Err(ReportError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(ReportError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
