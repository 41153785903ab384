//! View resolution and text rendering.

use serde::Serialize;
use shared::{
    domain::PreviewState,
    error::{FailureKind, Locale},
};

use crate::controller::state::AppState;

const CONFIDENCE_BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub preview: PreviewSummary,
    pub can_analyze: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PreviewSummary {
    Loading,
    Ready {
        dimensions: Option<(u32, u32)>,
        data_url_len: usize,
    },
    Unavailable {
        reason: String,
    },
}

/// Exactly one panel of the result area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewState {
    Empty {
        selection: Option<SelectionSummary>,
        notice: Option<String>,
    },
    Loading {
        file_name: String,
    },
    Error {
        message: String,
        kind: FailureKind,
    },
    Success {
        label: String,
        confidence: f64,
        confidence_percent: f64,
    },
}

/// Pending wins over a failure, which wins over a success; otherwise empty.
pub fn resolve_view(state: &AppState) -> ViewState {
    if state.request.is_pending() {
        return ViewState::Loading {
            file_name: state
                .selection
                .current()
                .map(|selection| selection.file.name.clone())
                .unwrap_or_default(),
        };
    }

    if let Some(failure) = state.result.failure() {
        return ViewState::Error {
            message: failure.message.clone(),
            kind: failure.kind.clone(),
        };
    }
    if let Some(result) = state.result.prediction() {
        return ViewState::Success {
            label: result.label.clone(),
            confidence: result.confidence,
            confidence_percent: result.confidence_percent(),
        };
    }

    ViewState::Empty {
        selection: state.selection.current().map(|selection| SelectionSummary {
            file_name: selection.file.name.clone(),
            mime_type: selection.file.mime_type.clone(),
            size_bytes: selection.file.size_bytes,
            preview: match &selection.preview {
                PreviewState::Loading => PreviewSummary::Loading,
                PreviewState::Ready(preview) => PreviewSummary::Ready {
                    dimensions: preview.dimensions,
                    data_url_len: preview.data_url.len(),
                },
                PreviewState::Unavailable { reason } => PreviewSummary::Unavailable {
                    reason: reason.clone(),
                },
            },
            can_analyze: state.can_analyze(),
        }),
        notice: state.notice.clone(),
    }
}

struct UiStrings {
    upload_prompt: &'static str,
    upload_formats: &'static str,
    awaiting: &'static str,
    awaiting_hint: &'static str,
    preview_loading: &'static str,
    preview_unavailable: &'static str,
    preview_ready: &'static str,
    remove_image_action: &'static str,
    analyze_action: &'static str,
    analyzing: &'static str,
    analyzing_hint: &'static str,
    error_title: &'static str,
    retry_action: &'static str,
    success_title: &'static str,
    prediction: &'static str,
    confidence: &'static str,
    new_analysis_action: &'static str,
}

const STRINGS_ES: UiStrings = UiStrings {
    upload_prompt: "Selecciona una imagen",
    upload_formats: "PNG, JPG, JPEG hasta",
    awaiting: "Esperando análisis",
    awaiting_hint: "Los resultados aparecerán aquí después de procesar la imagen",
    preview_loading: "Generando vista previa...",
    preview_unavailable: "Vista previa no disponible",
    preview_ready: "Vista previa lista",
    remove_image_action: "reset: Eliminar imagen",
    analyze_action: "analyze: Analizar Imagen",
    analyzing: "Procesando imagen...",
    analyzing_hint: "Esto puede tomar unos segundos",
    error_title: "Error en el análisis",
    retry_action: "reset: Intentar de nuevo",
    success_title: "Análisis Completado",
    prediction: "Predicción",
    confidence: "Nivel de Confianza",
    new_analysis_action: "reset: Realizar Nuevo Análisis",
};

const STRINGS_EN: UiStrings = UiStrings {
    upload_prompt: "Select an image",
    upload_formats: "PNG, JPG, JPEG up to",
    awaiting: "Waiting for analysis",
    awaiting_hint: "Results will appear here once the image is processed",
    preview_loading: "Generating preview...",
    preview_unavailable: "Preview not available",
    preview_ready: "Preview ready",
    remove_image_action: "reset: Remove image",
    analyze_action: "analyze: Analyze Image",
    analyzing: "Processing image...",
    analyzing_hint: "This may take a few seconds",
    error_title: "Analysis error",
    retry_action: "reset: Try again",
    success_title: "Analysis Complete",
    prediction: "Prediction",
    confidence: "Confidence Level",
    new_analysis_action: "reset: Run a New Analysis",
};

fn strings(locale: Locale) -> &'static UiStrings {
    match locale {
        Locale::Es => &STRINGS_ES,
        Locale::En => &STRINGS_EN,
    }
}

pub fn render_text(view: &ViewState, locale: Locale, max_upload_bytes: u64) -> String {
    let s = strings(locale);
    let mut out = String::new();
    match view {
        ViewState::Empty { selection, notice } => {
            match selection {
                None => {
                    out.push_str(&format!(
                        "{}\n  {} {}\n",
                        s.upload_prompt,
                        s.upload_formats,
                        human_readable_bytes(max_upload_bytes)
                    ));
                }
                Some(selection) => {
                    out.push_str(&format!(
                        "{} ({}, {})\n",
                        selection.file_name,
                        selection.mime_type,
                        human_readable_bytes(selection.size_bytes)
                    ));
                    match &selection.preview {
                        PreviewSummary::Loading => {
                            out.push_str(&format!("  {}\n", s.preview_loading));
                        }
                        PreviewSummary::Ready {
                            dimensions: Some((width, height)),
                            ..
                        } => {
                            out.push_str(&format!("  preview: {width}x{height}\n"));
                        }
                        PreviewSummary::Ready { .. } => {
                            out.push_str(&format!("  {}\n", s.preview_ready));
                        }
                        PreviewSummary::Unavailable { reason } => {
                            out.push_str(&format!("  {}: {reason}\n", s.preview_unavailable));
                        }
                    }
                    if selection.can_analyze {
                        out.push_str(&format!("  [{}]\n", s.analyze_action));
                    }
                    out.push_str(&format!("  [{}]\n", s.remove_image_action));
                }
            }
            out.push_str(&format!("{}\n  {}\n", s.awaiting, s.awaiting_hint));
            if let Some(notice) = notice {
                out.push_str(&format!("! {notice}\n"));
            }
        }
        ViewState::Loading { file_name } => {
            out.push_str(&format!(
                "{} {file_name}\n  {}\n",
                s.analyzing, s.analyzing_hint
            ));
        }
        ViewState::Error { message, .. } => {
            out.push_str(&format!(
                "{}\n  {message}\n  [{}]\n",
                s.error_title, s.retry_action
            ));
        }
        ViewState::Success {
            label,
            confidence_percent,
            ..
        } => {
            out.push_str(&format!(
                "{}\n  {}: {label}\n  {}: {} {}\n  [{}]\n",
                s.success_title,
                s.prediction,
                s.confidence,
                confidence_bar(*confidence_percent),
                format_percent(*confidence_percent),
                s.new_analysis_action
            ));
        }
    }
    out
}

pub fn render_json(view: &ViewState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.2}%", percent.clamp(0.0, 100.0))
}

fn confidence_bar(percent: f64) -> String {
    let filled =
        ((percent.clamp(0.0, 100.0) / 100.0) * CONFIDENCE_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(CONFIDENCE_BAR_WIDTH - filled)
    )
}

fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    format_scaled_unit(bytes, MB, "MB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
