#![forbid(unsafe_code)]

//! Solid colour block, useful for exercising layout.

use crate::context::WidgetContext;
use crate::surface::{NodeKind, Surface};
use crate::widget::{Extra, Widget};

pub const FILL_COLOR: &str = "#1b79ff";

#[derive(Debug, Clone, Copy, Default)]
pub struct SampleWidget;

impl Widget for SampleWidget {
    fn prepare_layout(&mut self, surface: &mut Surface, _: &Extra, _: &mut WidgetContext<'_>) {
        surface.append("fill", NodeKind::Fill);
    }

    fn update(&mut self, surface: &mut Surface, _: &Extra, _: &mut WidgetContext<'_>) {
        surface.set_attr("fill", "background-color", FILL_COLOR);
    }
}
