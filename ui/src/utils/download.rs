use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Offer `bytes` to the user as a file download.
///
/// Wraps the bytes in a Blob, points a temporary anchor at an object URL
/// for it and clicks the anchor. The URL is revoked right after.
pub fn download_bytes(
    bytes: &[u8],
    filename: &str,
    mime: &str,
) -> Result<(), JsValue> {
    let array = Uint8Array::from(bytes);
    let parts = Array::of1(&array.buffer());

    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: HtmlAnchorElement =
        document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url)?;
    tracing::debug!("downloaded {filename} ({} bytes)", bytes.len());
    Ok(())
}
