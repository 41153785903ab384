use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::domain::{Preview, PreviewState, SelectedFile};
use tracing::debug;

use crate::error::PreviewError;

/// Builds the data URL for any accepted image. Dimensions are best effort:
/// formats the decoder does not know (SVG, TIFF) still preview without them.
pub fn render_preview(file: &SelectedFile) -> Preview {
    let dimensions = match probe_dimensions(&file.bytes) {
        Ok(dimensions) => Some(dimensions),
        Err(err) => {
            debug!(file = %file.name, mime_type = %file.mime_type, "no dimensions: {err}");
            None
        }
    };

    Preview {
        data_url: format!("data:{};base64,{}", file.mime_type, STANDARD.encode(&file.bytes)),
        dimensions,
    }
}

pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), PreviewError> {
    Ok(image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?)
}

/// Encodes the preview on the blocking pool so large images do not stall the
/// session loop.
pub async fn compute_preview(file: SelectedFile) -> PreviewState {
    let name = file.name.clone();
    let rendered = tokio::task::spawn_blocking(move || render_preview(&file))
        .await
        .map_err(|err| PreviewError::Join(err.to_string()));

    match rendered {
        Ok(preview) => {
            debug!(file = %name, dimensions = ?preview.dimensions, "preview ready");
            PreviewState::Ready(preview)
        }
        Err(err) => {
            debug!(file = %name, "preview unavailable: {err}");
            PreviewState::Unavailable {
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{intake::validate_selection, tests_support::png_bytes};

    const SVG: &[u8] =
        br#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><rect width="8" height="8"/></svg>"#;

    #[test]
    fn renders_data_url_with_dimensions() {
        let file = SelectedFile::new("cat.png", "image/png", png_bytes(3, 2));
        let preview = render_preview(&file);

        assert_eq!(preview.dimensions, Some((3, 2)));
        let encoded = preview
            .data_url
            .strip_prefix("data:image/png;base64,")
            .expect("prefix");
        assert_eq!(STANDARD.decode(encoded).expect("base64"), png_bytes(3, 2));
    }

    #[tokio::test]
    async fn svg_pick_still_gets_a_preview() {
        let file = validate_selection("logo.svg", SVG.to_vec(), 1024).expect("accepted");
        assert_eq!(file.mime_type, "image/svg+xml");

        let PreviewState::Ready(preview) = compute_preview(file).await else {
            panic!("expected a ready preview");
        };
        assert!(preview.data_url.starts_with("data:image/svg+xml;base64,"));
        assert_eq!(preview.dimensions, None);
    }

    #[tokio::test]
    async fn undecodable_header_previews_without_dimensions() {
        let mut tiff = b"II*\0".to_vec();
        tiff.extend_from_slice(&[0; 16]);
        let file = SelectedFile::new("scan.tiff", "image/tiff", tiff);

        let state = compute_preview(file).await;

        assert!(matches!(
            state,
            PreviewState::Ready(Preview {
                dimensions: None,
                ..
            })
        ));
    }

    #[test]
    fn probing_garbage_is_an_error() {
        assert!(probe_dimensions(b"not really a png").is_err());
    }
}
