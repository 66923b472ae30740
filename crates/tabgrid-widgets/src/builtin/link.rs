#![forbid(unsafe_code)]

//! Shortcut tile: favicon over a label, navigating to `extra.rel`.

use serde::Deserialize;

use super::centered_column;
use crate::context::WidgetContext;
use crate::kind::BoxError;
use crate::preferences::SHORTCUT_CIRCLE;
use crate::surface::{NodeKind, Surface};
use crate::widget::{Extra, Widget};

pub const DEFAULT_COLOR: &str = "#e9e9e9";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct LinkExtra {
    rel: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkWidget {
    rel: String,
    label: String,
    color: String,
}

impl LinkWidget {
    /// Decode the link target from persisted data. `rel` is required.
    pub fn from_extra(extra: &Extra) -> Result<Self, BoxError> {
        let data = LinkExtra::deserialize(extra)?;
        if data.rel.is_empty() {
            return Err("link widget requires a non-empty `rel`".into());
        }
        Ok(Self {
            label: data.label.unwrap_or_else(|| data.rel.clone()),
            color: data.color.unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
            rel: data.rel,
        })
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

pub fn icon_source(rel: &str) -> String {
    format!("chrome://favicon/{rel}")
}

impl Widget for LinkWidget {
    fn prepare_layout(&mut self, surface: &mut Surface, _: &Extra, _: &mut WidgetContext<'_>) {
        centered_column(surface);
        surface.set_style("cursor", "pointer");
        surface.append("anchor", NodeKind::Link);
        surface.append("icon", NodeKind::Image);
        surface.set_attr("icon", "width", "24px");
        surface.set_attr("icon", "height", "24px");
        surface.set_attr("icon", "padding", "12px");
        surface.append("label", NodeKind::Text);
    }

    fn update(&mut self, surface: &mut Surface, _: &Extra, cx: &mut WidgetContext<'_>) {
        let radius = if cx.preferences().flag(SHORTCUT_CIRCLE) { "50%" } else { "25%" };
        surface.set_attr("anchor", "href", self.rel.as_str());
        surface.set_attr("icon", "src", icon_source(&self.rel));
        surface.set_attr("icon", "background-color", self.color.as_str());
        surface.set_attr("icon", "border-radius", radius);
        surface.set_text("label", self.label.as_str());
    }
}
