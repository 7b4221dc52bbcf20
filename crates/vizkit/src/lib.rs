//! vizkit toolkit crate.
//!
//! A small pipeline-style visualization toolkit on top of `vizkit-engine`:
//! sources produce geometry or images, actors place them in a renderer, a
//! render window stacks renderers and an interactor drives the event loop.
//!
//! ```rust,ignore
//! let colors = NamedColors::new();
//! let mut renderer = Renderer::new();
//! renderer.add_actor2d(TextActor::new("Hello World!"));
//! renderer.set_background(colors.color3d("DarkGreen")?);
//!
//! let mut window = RenderWindow::new();
//! window.add_renderer(renderer);
//!
//! let mut interactor = RenderWindowInteractor::new(window);
//! interactor.initialize();
//! interactor.start()?;
//! ```

pub mod error;
pub mod colors;
pub mod observer;
pub mod event;
pub mod math;
pub mod camera;
pub mod polydata;
pub mod locator;
pub mod actor;
pub mod text;
pub mod chart;
pub mod imaging;
pub mod widgets;
pub mod renderer;
pub mod render_window;
pub mod interactor;

mod painter;

pub use actor::{Actor, Property, Representation, Interpolation};
pub use camera::Camera;
pub use chart::{Axis, AxisLocation, ChartXY, MarkerStyle, PlotPoints, Table};
pub use colors::NamedColors;
pub use error::{Result, VizError};
pub use imaging::{ImageActor, ImageCanvasSource2D, ImageData};
pub use event::{EventResult, InteractionEvent};
pub use interactor::{InteractorStyle, RenderWindowInteractor};
pub use locator::CellLocator;
pub use math::{Bounds, Vec3};
pub use observer::{EventId, ObserverTag, Observers};
pub use polydata::{PolyData, SphereSource, SuperquadricSource};
pub use render_window::RenderWindow;
pub use renderer::{Renderer, RendererId};
pub use text::{FontFamily, Justification, TextActor, TextProperty};
pub use widgets::{
    AnimationMode, Overlay, SliderColors, SliderWidget, SphereRepresentation, SphereWidget, Widget, WidgetId,
};
