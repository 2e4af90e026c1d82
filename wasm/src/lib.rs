use std::collections::BTreeMap;

use process_flow_renderer::{RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    #[serde(default)]
    expanded: Vec<String>,
    #[serde(default)]
    zone_heights: BTreeMap<String, f32>,
}

fn build_render_options(options: ProcessRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("classic") {
        RenderOptions::classic()
    } else {
        RenderOptions::modern()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
        render_options.layout.font_size = font_size;
    }
    render_options.expanded = options.expanded.iter().collect();
    render_options.zone_heights = options.zone_heights;

    render_options
}

#[wasm_bindgen]
pub fn render_process_svg(description_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ProcessRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ProcessRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(description_json, render_options)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
