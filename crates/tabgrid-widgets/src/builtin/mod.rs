#![forbid(unsafe_code)]

//! Widget kinds shipped with the engine.

pub mod clock;
pub mod link;
pub mod sample;

pub use clock::ClockWidget;
pub use link::LinkWidget;
pub use sample::SampleWidget;

use crate::kind::KindRegistry;
use crate::widget::Widget;

pub const CLOCK: &str = "clock";
pub const LINK: &str = "link";
pub const SAMPLE: &str = "sample";

pub(crate) fn register_all(registry: &mut KindRegistry) {
    registry.register(CLOCK, |_| Ok(Box::new(ClockWidget::new()) as Box<dyn Widget>));
    registry.register(LINK, |extra| {
        LinkWidget::from_extra(extra).map(|w| Box::new(w) as Box<dyn Widget>)
    });
    registry.register(SAMPLE, |_| Ok(Box::new(SampleWidget) as Box<dyn Widget>));
}

/// Centre children in a vertical column; shared by clock and link.
pub(crate) fn centered_column(surface: &mut crate::Surface) {
    surface.set_style("display", "flex");
    surface.set_style("flex-direction", "column");
    surface.set_style("align-items", "center");
    surface.set_style("justify-content", "center");
}
