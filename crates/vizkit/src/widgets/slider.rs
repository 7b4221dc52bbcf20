use std::any::Any;

use vizkit_engine::coords::{Rect, Vec2};
use vizkit_engine::input::MouseButton;

use crate::actor::Actor;
use crate::colors::Rgb;
use crate::event::{EventResult, InteractionEvent};
use crate::observer::{self, EventId, ObserverTag, Observers};
use crate::render_window::RenderWindow;
use crate::renderer::RendererId;
use crate::text::{Justification, TextActor, TextProperty};

use super::{Overlay, Widget};

/// What a press on the tube or an end cap does.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum AnimationMode {
    /// Only the knob can be dragged.
    Off,
    /// The knob jumps to the pressed spot.
    #[default]
    Jump,
    /// The knob slides to the pressed spot, one `Interaction` per step.
    Animate,
}

/// Colors of the slider parts.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderColors {
    pub slider: Rgb,
    /// Knob color while it is grabbed.
    pub selected: Rgb,
    pub tube: Rgb,
    pub cap: Rgb,
}

impl Default for SliderColors {
    fn default() -> Self {
        Self { slider: [1.0, 1.0, 1.0], selected: [1.0, 0.4, 0.4], tube: [1.0, 1.0, 1.0], cap: [1.0, 1.0, 1.0] }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum State {
    Idle,
    Sliding,
}

/// Which part of the slider a point falls on.
#[derive(Debug, Copy, Clone, PartialEq)]
enum Part {
    Knob,
    LeftCap,
    RightCap,
    /// Arc length along the tube, in pixels from point 1.
    Tube(f32),
}

/// The slider's frame in screen pixels.
#[derive(Debug, Copy, Clone)]
struct Track {
    start: Vec2,
    dir: Vec2,
    length: f32,
}

impl Track {
    fn at(&self, s: f32) -> Vec2 {
        self.start + self.dir * s
    }
}

/// A flat slider drawn over its renderer.
///
/// The two end points are given in normalized display coordinates
/// (0..1 across the renderer, y up). Lengths and widths of the parts are
/// fractions of the distance between the end points.
pub struct SliderWidget {
    minimum: f64,
    maximum: f64,
    value: f64,
    title: String,
    point1: [f64; 2],
    point2: [f64; 2],
    slider_length: f64,
    slider_width: f64,
    end_cap_length: f64,
    end_cap_width: f64,
    tube_width: f64,
    title_height: f64,
    label_height: f64,
    show_label: bool,
    colors: SliderColors,
    title_property: TextProperty,
    label_property: TextProperty,
    animation_mode: AnimationMode,
    animation_steps: u32,

    enabled: bool,
    renderer: Option<RendererId>,
    state: State,
    observers: Observers<SliderWidget>,
    fired: Vec<EventId>,
}

impl Default for SliderWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl SliderWidget {
    pub fn new() -> Self {
        let centered = TextProperty { justification: Justification::Centered, ..TextProperty::default() };
        Self {
            minimum: 0.0,
            maximum: 1.0,
            value: 0.0,
            title: String::new(),
            point1: [0.1, 0.1],
            point2: [0.9, 0.1],
            slider_length: 0.05,
            slider_width: 0.05,
            end_cap_length: 0.025,
            end_cap_width: 0.05,
            tube_width: 0.025,
            title_height: 0.03,
            label_height: 0.025,
            show_label: true,
            colors: SliderColors::default(),
            title_property: TextProperty { bold: true, ..centered.clone() },
            label_property: centered,
            animation_mode: AnimationMode::Jump,
            animation_steps: 24,
            enabled: false,
            renderer: None,
            state: State::Idle,
            observers: Observers::new(),
            fired: Vec::new(),
        }
    }

    pub fn on(&mut self) {
        self.enabled = true;
    }

    pub fn off(&mut self) {
        self.enabled = false;
        self.state = State::Idle;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Clamped to `[minimum, maximum]`.
    pub fn set_value(&mut self, value: f64) {
        if value.is_finite() {
            self.value = value.clamp(self.minimum, self.maximum);
        }
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    /// A minimum at or above the maximum pushes the maximum to `minimum + 1`.
    pub fn set_minimum(&mut self, minimum: f64) {
        if !minimum.is_finite() {
            return;
        }
        if minimum >= self.maximum {
            self.maximum = minimum + 1.0;
        }
        self.minimum = minimum;
        self.value = self.value.clamp(self.minimum, self.maximum);
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// A maximum at or below the minimum pulls the minimum to `maximum - 1`.
    pub fn set_maximum(&mut self, maximum: f64) {
        if !maximum.is_finite() {
            return;
        }
        if maximum <= self.minimum {
            self.minimum = maximum - 1.0;
        }
        self.maximum = maximum;
        self.value = self.value.clamp(self.minimum, self.maximum);
    }

    pub fn title_text(&self) -> &str {
        &self.title
    }

    pub fn set_title_text(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Left end, normalized display coordinates.
    pub fn set_point1(&mut self, x: f64, y: f64) {
        self.point1 = [x, y];
    }

    /// Right end, normalized display coordinates.
    pub fn set_point2(&mut self, x: f64, y: f64) {
        self.point2 = [x, y];
    }

    pub fn set_slider_length(&mut self, fraction: f64) {
        self.slider_length = fraction.clamp(0.0, 1.0);
    }

    pub fn set_slider_width(&mut self, fraction: f64) {
        self.slider_width = fraction.clamp(0.0, 1.0);
    }

    pub fn set_end_cap_length(&mut self, fraction: f64) {
        self.end_cap_length = fraction.clamp(0.0, 0.25);
    }

    pub fn set_end_cap_width(&mut self, fraction: f64) {
        self.end_cap_width = fraction.clamp(0.0, 1.0);
    }

    pub fn set_tube_width(&mut self, fraction: f64) {
        self.tube_width = fraction.clamp(0.0, 1.0);
    }

    pub fn set_show_label(&mut self, show: bool) {
        self.show_label = show;
    }

    pub fn colors_mut(&mut self) -> &mut SliderColors {
        &mut self.colors
    }

    pub fn title_property_mut(&mut self) -> &mut TextProperty {
        &mut self.title_property
    }

    pub fn label_property_mut(&mut self) -> &mut TextProperty {
        &mut self.label_property
    }

    pub fn set_animation_mode(&mut self, mode: AnimationMode) {
        self.animation_mode = mode;
    }

    pub fn set_number_of_animation_steps(&mut self, steps: u32) {
        self.animation_steps = steps.max(1);
    }

    /// True while the knob is held.
    pub fn is_active(&self) -> bool {
        self.state == State::Sliding
    }

    pub fn add_observer(
        &mut self,
        event: EventId,
        callback: impl FnMut(&SliderWidget, EventId) + 'static,
    ) -> ObserverTag {
        self.observers.add(event, callback)
    }

    pub fn remove_observer(&mut self, tag: ObserverTag) -> bool {
        self.observers.remove(tag)
    }

    fn fire(&mut self, event: EventId) {
        observer::fire(self, |w| &mut w.observers, event);
        self.fired.push(event);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    fn track(&self, viewport: Rect) -> Option<Track> {
        let to_screen = |[x, y]: [f64; 2]| {
            Vec2::new(
                viewport.origin.x + x as f32 * viewport.size.x,
                viewport.origin.y + (1.0 - y as f32) * viewport.size.y,
            )
        };
        let (start, end) = (to_screen(self.point1), to_screen(self.point2));
        let length = (end - start).length();
        (length >= 1.0).then(|| Track { start, dir: (end - start).normalized_or_zero(), length })
    }

    /// Travel of the knob center along the track: `(first, last)` in pixels.
    fn travel(&self, track: &Track) -> (f32, f32) {
        let margin = (self.end_cap_length + self.slider_length * 0.5) as f32 * track.length;
        (margin, (track.length - margin).max(margin))
    }

    fn fraction(&self) -> f64 {
        let span = self.maximum - self.minimum;
        if span > 0.0 { ((self.value - self.minimum) / span).clamp(0.0, 1.0) } else { 0.0 }
    }

    fn knob_center(&self, track: &Track) -> f32 {
        let (first, last) = self.travel(track);
        first + (last - first) * self.fraction() as f32
    }

    /// Value under the knob when its center is at `s` pixels along the track.
    fn value_at(&self, track: &Track, s: f32) -> f64 {
        let (first, last) = self.travel(track);
        let t = if last > first { f64::from((s - first) / (last - first)).clamp(0.0, 1.0) } else { 0.0 };
        self.minimum + t * (self.maximum - self.minimum)
    }

    fn pick(&self, track: &Track, pos: Vec2) -> Option<Part> {
        let d = pos - track.start;
        let s = d.x * track.dir.x + d.y * track.dir.y;
        let off = (d.x * track.dir.y - d.y * track.dir.x).abs();
        let l = track.length;

        let knob = self.knob_center(track);
        if (s - knob).abs() <= self.slider_length as f32 * l * 0.5 && off <= self.slider_width as f32 * l * 0.5 {
            return Some(Part::Knob);
        }
        let cap = self.end_cap_length as f32 * l;
        if off <= self.end_cap_width as f32 * l * 0.5 {
            if (0.0..=cap).contains(&s) {
                return Some(Part::LeftCap);
            }
            if (l - cap..=l).contains(&s) {
                return Some(Part::RightCap);
            }
        }
        let half_tube = (self.tube_width.max(self.end_cap_width) as f32 * l * 0.5).max(1.0);
        ((0.0..=l).contains(&s) && off <= half_tube).then_some(Part::Tube(s))
    }

    fn project(track: &Track, pos: Vec2) -> f32 {
        let d = pos - track.start;
        d.x * track.dir.x + d.y * track.dir.y
    }

    /// Moves the knob to `target` as the animation mode says.
    fn move_to(&mut self, target: f64) {
        self.fire(EventId::StartInteraction);
        match self.animation_mode {
            AnimationMode::Off => {}
            AnimationMode::Jump => {
                self.set_value(target);
                self.fire(EventId::Interaction);
            }
            AnimationMode::Animate => {
                let from = self.value;
                let steps = self.animation_steps;
                for step in 1..=steps {
                    self.set_value(from + (target - from) * f64::from(step) / f64::from(steps));
                    self.fire(EventId::Interaction);
                }
            }
        }
        self.fire(EventId::EndInteraction);
    }
}

impl Widget for SliderWidget {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn renderer(&self) -> Option<RendererId> {
        self.renderer
    }

    fn set_renderer(&mut self, renderer: RendererId) {
        self.renderer = Some(renderer);
    }

    fn process_event(&mut self, event: &InteractionEvent, window: &RenderWindow) -> EventResult {
        if !self.enabled {
            return EventResult::Ignored;
        }
        let Some(track) = self.renderer.and_then(|id| window.viewport_rect(id)).and_then(|r| self.track(r)) else {
            return EventResult::Ignored;
        };

        match (*event, self.state) {
            (InteractionEvent::ButtonPress { button: MouseButton::Left, pos, .. }, State::Idle) => {
                let target = match self.pick(&track, pos) {
                    None => return EventResult::Ignored,
                    Some(Part::Knob) => {
                        self.state = State::Sliding;
                        self.fire(EventId::StartInteraction);
                        return EventResult::Consumed;
                    }
                    Some(_) if self.animation_mode == AnimationMode::Off => return EventResult::Ignored,
                    Some(Part::LeftCap) => self.minimum,
                    Some(Part::RightCap) => self.maximum,
                    Some(Part::Tube(s)) => self.value_at(&track, s),
                };
                self.move_to(target);
                EventResult::Consumed
            }
            (InteractionEvent::PointerMove { pos }, State::Sliding) => {
                let value = self.value_at(&track, Self::project(&track, pos));
                self.set_value(value);
                self.fire(EventId::Interaction);
                EventResult::Consumed
            }
            (InteractionEvent::ButtonRelease { button: MouseButton::Left, .. }, State::Sliding) => {
                self.state = State::Idle;
                self.fire(EventId::EndInteraction);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn build(&self) -> Vec<Actor> {
        Vec::new()
    }

    fn build_overlay(&self, viewport: Rect) -> Vec<Overlay> {
        let Some(track) = self.track(viewport).filter(|_| self.enabled) else {
            return Vec::new();
        };
        let l = track.length;
        let cap = self.end_cap_length as f32 * l;
        let cap_width = self.end_cap_width as f32 * l;
        let knob = self.knob_center(&track);
        let half_knob = self.slider_length as f32 * l * 0.5;
        let knob_width = self.slider_width as f32 * l;
        let knob_color = if self.is_active() { self.colors.selected } else { self.colors.slider };

        let mut out = vec![
            Overlay::Segment {
                p0: track.at(cap),
                p1: track.at(l - cap),
                width: self.tube_width as f32 * l,
                color: self.colors.tube,
            },
            Overlay::Segment { p0: track.at(0.0), p1: track.at(cap), width: cap_width, color: self.colors.cap },
            Overlay::Segment { p0: track.at(l - cap), p1: track.at(l), width: cap_width, color: self.colors.cap },
            Overlay::Segment {
                p0: track.at(knob - half_knob),
                p1: track.at(knob + half_knob),
                width: knob_width,
                color: knob_color,
            },
        ];

        // Text is placed in display pixels from the viewport's bottom-left.
        let display = |p: Vec2| [p.x - viewport.origin.x, viewport.origin.y + viewport.size.y - p.y];
        let thickness = knob_width.max(cap_width) * 0.5;
        if self.show_label {
            let size = (self.label_height * f64::from(viewport.size.y)).round().max(1.0);
            let [x, y] = display(track.at(knob));
            let mut label = TextActor::new(format_value(self.value));
            label.text_property = TextProperty { font_size: size as u32, ..self.label_property.clone() };
            label.set_display_position(x.round() as i32, (y + thickness + 2.0).round() as i32);
            out.push(Overlay::Text(label));
        }
        if !self.title.is_empty() {
            let size = (self.title_height * f64::from(viewport.size.y)).round().max(1.0);
            let [x, y] = display(track.at(l * 0.5));
            let mut title = TextActor::new(self.title.clone());
            title.text_property = TextProperty { font_size: size as u32, ..self.title_property.clone() };
            title.set_display_position(x.round() as i32, (y - thickness - 2.0 - size as f32).round() as i32);
            out.push(Overlay::Text(title));
        }
        out
    }

    fn take_fired(&mut self) -> Vec<EventId> {
        std::mem::take(&mut self.fired)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Three significant digits, trailing zeros dropped; exponent form for
/// very small or large magnitudes.
fn format_value(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return if v.is_finite() { "0".to_owned() } else { v.to_string() };
    }
    let exp = v.abs().log10().floor() as i32;
    if !(-4..3).contains(&exp) {
        let s = format!("{v:.2e}");
        let (mantissa, e) = s.split_once('e').unwrap_or((&s, "0"));
        let e: i32 = e.parse().unwrap_or(0);
        let sign = if e < 0 { '-' } else { '+' };
        return format!("{}e{sign}{:02}", trim_zeros(mantissa), e.abs());
    }
    let decimals = (2 - exp).max(0) as usize;
    trim_zeros(&format!("{v:.decimals$}")).to_owned()
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') { s.trim_end_matches('0').trim_end_matches('.') } else { s }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use vizkit_engine::input::Modifiers;

    use super::*;
    use crate::renderer::Renderer;

    /// 300 × 300 window; slider from (0.2, 0.1) to (0.8, 0.1), so the track
    /// runs from (60, 270) to (240, 270) on screen and is 180 px long.
    fn scene() -> (RenderWindow, SliderWidget) {
        let mut window = RenderWindow::new();
        let id = window.add_renderer(Renderer::new());
        let mut w = SliderWidget::new();
        w.set_point1(0.2, 0.1);
        w.set_point2(0.8, 0.1);
        w.set_slider_length(0.075);
        w.set_slider_width(0.05);
        w.set_end_cap_length(0.05);
        w.set_maximum(4.0);
        w.set_renderer(id);
        w.on();
        (window, w)
    }

    fn press(x: f32, y: f32) -> InteractionEvent {
        InteractionEvent::ButtonPress { button: MouseButton::Left, pos: Vec2::new(x, y), modifiers: Modifiers::default() }
    }

    fn release(x: f32, y: f32) -> InteractionEvent {
        InteractionEvent::ButtonRelease { button: MouseButton::Left, pos: Vec2::new(x, y), modifiers: Modifiers::default() }
    }

    fn moved(x: f32, y: f32) -> InteractionEvent {
        InteractionEvent::PointerMove { pos: Vec2::new(x, y) }
    }

    fn values(w: &mut SliderWidget) -> Rc<RefCell<Vec<f64>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        w.add_observer(EventId::Interaction, move |s, _| l.borrow_mut().push(s.value()));
        log
    }

    // Knob travel: margin = (0.05 + 0.0375) * 180 = 15.75 px, so the knob
    // center runs from x = 75.75 to x = 224.25.

    #[test]
    fn range_setters_keep_minimum_below_maximum() {
        let mut w = SliderWidget::new();
        w.set_maximum(0.0);
        assert_eq!((w.minimum(), w.maximum()), (-1.0, 0.0));
        w.set_minimum(3.0);
        assert_eq!((w.minimum(), w.maximum()), (3.0, 4.0));
        assert_eq!(w.value(), 3.0);
        w.set_value(10.0);
        assert_eq!(w.value(), 4.0);
    }

    #[test]
    fn dragging_the_knob_maps_position_to_value() {
        let (window, mut w) = scene();
        let log = values(&mut w);

        assert!(w.process_event(&press(76.0, 270.0), &window).is_consumed());
        assert!(w.is_active());
        w.process_event(&moved(150.0, 275.0), &window);
        w.process_event(&moved(500.0, 275.0), &window);
        w.process_event(&release(500.0, 275.0), &window);

        let seen = log.borrow();
        assert_eq!(seen.len(), 2);
        assert!((seen[0] - 2.0).abs() < 1e-6);
        assert_eq!(seen[1], 4.0);
        assert!(!w.is_active());
        assert_eq!(
            w.take_fired(),
            vec![EventId::StartInteraction, EventId::Interaction, EventId::Interaction, EventId::EndInteraction]
        );
        assert!(w.take_fired().is_empty());
    }

    #[test]
    fn jump_mode_moves_straight_to_the_pressed_spot() {
        let (window, mut w) = scene();
        let log = values(&mut w);
        assert!(w.process_event(&press(150.0, 270.0), &window).is_consumed());
        assert!(!w.is_active());
        assert_eq!(log.borrow().len(), 1);
        assert!((w.value() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn animate_mode_steps_towards_the_end_cap() {
        let (window, mut w) = scene();
        w.set_animation_mode(AnimationMode::Animate);
        w.set_number_of_animation_steps(4);
        let log = values(&mut w);
        // Right cap spans 231..240.
        w.process_event(&press(235.0, 270.0), &window);
        assert_eq!(*log.borrow(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn off_mode_only_drags_the_knob() {
        let (window, mut w) = scene();
        w.set_animation_mode(AnimationMode::Off);
        assert_eq!(w.process_event(&press(150.0, 270.0), &window), EventResult::Ignored);
        assert_eq!(w.value(), 0.0);
    }

    #[test]
    fn presses_away_from_the_slider_pass_through() {
        let (window, mut w) = scene();
        assert_eq!(w.process_event(&press(150.0, 100.0), &window), EventResult::Ignored);
        assert_eq!(w.process_event(&press(20.0, 270.0), &window), EventResult::Ignored);
        assert!(w.take_fired().is_empty());
    }

    #[test]
    fn overlay_has_tube_caps_knob_and_text() {
        let (_, mut w) = scene();
        w.set_title_text("MaxPointsPerRegion");
        w.colors_mut().slider = [0.8, 0.5, 0.25];
        let vp = Rect::new(0.0, 0.0, 300.0, 300.0);
        let overlay = w.build_overlay(vp);

        let segments: Vec<_> = overlay
            .iter()
            .filter_map(|o| match o {
                Overlay::Segment { p0, p1, color, .. } => Some((*p0, *p1, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(segments.len(), 4);
        let (k0, k1, knob_color) = segments[3];
        assert_eq!(knob_color, [0.8, 0.5, 0.25]);
        assert!(((k0.x + k1.x) * 0.5 - 75.75).abs() < 1e-3);

        let texts: Vec<&TextActor> = overlay
            .iter()
            .filter_map(|o| match o {
                Overlay::Text(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].input, "0");
        assert_eq!(texts[1].input, "MaxPointsPerRegion");
        assert_eq!(texts[1].text_property.justification, Justification::Centered);
        assert_eq!(texts[1].display_position[0], 150);
    }

    #[test]
    fn grabbed_knob_uses_the_selected_color() {
        let (window, mut w) = scene();
        w.colors_mut().selected = [1.0, 0.0, 0.5];
        w.process_event(&press(76.0, 270.0), &window);
        let knob = w.build_overlay(Rect::new(0.0, 0.0, 300.0, 300.0)).into_iter().nth(3);
        let Some(Overlay::Segment { color, .. }) = knob else { panic!("knob segment missing") };
        assert_eq!(color, [1.0, 0.0, 0.5]);
    }

    #[test]
    fn disabled_slider_draws_nothing() {
        let (_, mut w) = scene();
        w.off();
        assert!(w.build_overlay(Rect::new(0.0, 0.0, 300.0, 300.0)).is_empty());
    }

    #[test]
    fn labels_use_three_significant_digits() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(1.0), "1");
        assert_eq!(format_value(0.123456), "0.123");
        assert_eq!(format_value(-12.345), "-12.3");
        assert_eq!(format_value(1234.0), "1.23e+03");
        assert_eq!(format_value(0.00001234), "1.23e-05");
    }
}
