use dioxus::document::eval;
use types::{ExportedFile, Result, err};

/// Saves the file through a temporary object URL and a synthetic link click.
pub async fn save(file: &ExportedFile) -> Result<()> {
    let payload =
        serde_json::to_string(file).map_err(|e| err!("failed to encode download: {e}"))?;

    let js = format!(
        r#"
        const file = {payload};
        const bytes = Uint8Array.from(atob(file.data_base64), (c) => c.charCodeAt(0));
        const url = URL.createObjectURL(new Blob([bytes], {{ type: file.mime }}));
        const link = document.createElement("a");
        link.href = url;
        link.download = file.filename;
        document.body.appendChild(link);
        link.click();
        link.remove();
        setTimeout(() => URL.revokeObjectURL(url), 1000);
        dioxus.send(true);
        "#
    );

    eval(&js)
        .recv::<bool>()
        .await
        .map(|_| ())
        .map_err(|e| err!("browser rejected the download: {e:?}"))
}
