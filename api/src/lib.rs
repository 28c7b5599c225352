use dioxus::prelude::*;
use types::{ExportRequest, ExportedFile};

/// Builds the PDF for a report on the server and returns it base64 encoded.
#[post("/api/reports/export")]
pub async fn export_report(request: ExportRequest) -> ServerFnResult<ExportedFile> {
    server::export(request).await.map_err(server_error)
}

/// Carries the message across unchanged so the error banner can split it.
pub fn server_error(error: types::Error) -> ServerFnError {
    ServerFnError::new(error.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_keeps_message() {
        let error = server_error(types::Error::from("failed to fetch logo: timed out"));
        assert!(matches!(
            error,
            ServerFnError::ServerError { ref message, code: 500, .. }
                if message == "failed to fetch logo: timed out"
        ));
    }
}
