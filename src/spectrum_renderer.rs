use std::time::Instant;

use crate::config::RendererConfig;
use crate::draw_surface::{DrawCommand, DrawSurface, Hsla, Point, Rgba};
use crate::error::Result;
use crate::frequency_analyzer::FrequencyFrame;

// Configuration constants
const PULSE_SCALE: f32 = 0.3; // Pulse radius gained per loudness unit
const PULSE_THRESHOLD: f32 = 10.0; // Suppress the pulse below ~4% loudness to avoid idle flicker
const PULSE_ALPHA_SCALE: f32 = 0.1; // Pulse opacity at full loudness
const BAR_LENGTH_SCALE: f32 = 0.8; // Bar length per amplitude unit
const BAR_WIDTH: f32 = 4.0;
const RING_WIDTH: f32 = 2.0;
const INNER_DISC_RADIUS: f32 = 30.0; // Session indicator disc
const INNER_RING_RADIUS: f32 = 32.0;

// Bar gradient (darker toward the tip)
const BAR_SATURATION: f32 = 0.9;
const BAR_INNER_LIGHTNESS: f32 = 0.5;
const BAR_OUTER_LIGHTNESS: f32 = 0.4;
const BAR_INNER_ALPHA: f32 = 0.9;
const BAR_OUTER_ALPHA: f32 = 0.6;

// Indicator pulse (wall-clock driven, not audio)
const INDICATOR_PULSE_RATE: f32 = 0.01; // Radians per millisecond
const LISTENING_BASE_OPACITY: f32 = 0.7;
const LISTENING_OPACITY_SWING: f32 = 0.3;

const BACKGROUND_FADE: Rgba = Rgba::new(255, 255, 255, 0.1);
const CENTER_FILL: Rgba = Rgba::new(255, 255, 255, 0.9);
const ACCENT_STROKE: Rgba = Rgba::new(59, 130, 246, 0.3);
const PULSE_TINT: (u8, u8, u8) = (59, 130, 246);
const LISTENING_TINT: (u8, u8, u8) = (239, 68, 68);
const LISTENING_RING: Rgba = Rgba::new(239, 68, 68, 0.3);
const IDLE_FILL: Rgba = Rgba::new(34, 197, 94, 0.8);
const IDLE_RING: Rgba = Rgba::new(34, 197, 94, 0.3);

/// One radial bar of the spectrum wheel
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumBar {
    pub angle: f32,
    pub length: f32,
    pub hue: f32,
    pub inner: Point,
    pub outer: Point,
}

/// Per-tick drawing parameters derived from one frequency frame. Exists
/// only for the duration of the render call that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualGeometry {
    pub center: Point,
    pub base_radius: f32,
    pub loudness: f32,
    pub pulse_radius: f32,
    pub pulse_visible: bool,
    pub bars: Vec<SpectrumBar>,
}

/// Hue of a bin on the loudness-rotated color wheel. Periodic in the bin
/// index: bin `i + bin_count` lands on the same hue as bin `i`.
pub fn bar_hue(index: usize, bin_count: usize, loudness: f32) -> f32 {
    (index as f32 * 360.0 / bin_count as f32 + loudness).rem_euclid(360.0)
}

/// Maps frequency frames onto a circular bar spectrum around a pulsing
/// center disc and writes the result to the drawing surface.
pub struct SpectrumRenderer {
    center: Point,
    base_radius: f32,
    epoch: Instant,
}

impl SpectrumRenderer {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            center: Point::new(config.width / 2.0, config.height / 2.0),
            base_radius: config.base_radius,
            epoch: Instant::now(),
        }
    }

    /// Derives the drawing parameters for one frame
    pub fn geometry(&self, frame: &FrequencyFrame) -> VisualGeometry {
        let loudness = frame.loudness();
        let bin_count = frame.len();

        let bars = frame
            .bins()
            .iter()
            .enumerate()
            .map(|(i, &amplitude)| {
                let angle = i as f32 / bin_count as f32 * std::f32::consts::TAU;
                let length = amplitude as f32 * BAR_LENGTH_SCALE;
                let (sin, cos) = angle.sin_cos();
                SpectrumBar {
                    angle,
                    length,
                    hue: bar_hue(i, bin_count, loudness),
                    inner: Point::new(
                        self.center.x + cos * self.base_radius,
                        self.center.y + sin * self.base_radius,
                    ),
                    outer: Point::new(
                        self.center.x + cos * (self.base_radius + length),
                        self.center.y + sin * (self.base_radius + length),
                    ),
                }
            })
            .collect();

        VisualGeometry {
            center: self.center,
            base_radius: self.base_radius,
            loudness,
            pulse_radius: self.base_radius + loudness * PULSE_SCALE,
            pulse_visible: loudness > PULSE_THRESHOLD,
            bars,
        }
    }

    /// Renders one frame and returns the loudness the caller surfaces as
    /// a percentage readout. A surface refusal aborts only this tick.
    pub fn render(
        &self,
        frame: &FrequencyFrame,
        listening: bool,
        surface: &mut dyn DrawSurface,
    ) -> Result<f32> {
        let geometry = self.geometry(frame);
        let commands = self.encode(&geometry, listening);
        surface.submit(&commands)?;
        Ok(geometry.loudness)
    }

    /// Renders the static resting frame: base and indicator discs, no
    /// bars, no pulse. Called once on entering the idle state, not on a
    /// loop.
    pub fn render_idle(&self, surface: &mut dyn DrawSurface) -> Result<()> {
        let mut commands = Vec::with_capacity(5);
        commands.push(DrawCommand::FadeFill {
            color: BACKGROUND_FADE,
        });
        self.encode_center(&mut commands);
        self.encode_indicator(&mut commands, false);
        surface.submit(&commands)
    }

    fn encode(&self, geometry: &VisualGeometry, listening: bool) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(geometry.bars.len() + 6);

        commands.push(DrawCommand::FadeFill {
            color: BACKGROUND_FADE,
        });

        if geometry.pulse_visible {
            let (r, g, b) = PULSE_TINT;
            commands.push(DrawCommand::FillCircle {
                center: geometry.center,
                radius: geometry.pulse_radius,
                color: Rgba::new(r, g, b, geometry.loudness / 255.0 * PULSE_ALPHA_SCALE),
            });
        }

        self.encode_center(&mut commands);

        for bar in &geometry.bars {
            commands.push(DrawCommand::GradientLine {
                from: bar.inner,
                to: bar.outer,
                start: Hsla::new(bar.hue, BAR_SATURATION, BAR_INNER_LIGHTNESS, BAR_INNER_ALPHA)
                    .to_rgba(),
                end: Hsla::new(bar.hue, BAR_SATURATION, BAR_OUTER_LIGHTNESS, BAR_OUTER_ALPHA)
                    .to_rgba(),
                width: BAR_WIDTH,
            });
        }

        self.encode_indicator(&mut commands, listening);
        commands
    }

    fn encode_center(&self, commands: &mut Vec<DrawCommand>) {
        commands.push(DrawCommand::FillCircle {
            center: self.center,
            radius: self.base_radius,
            color: CENTER_FILL,
        });
        commands.push(DrawCommand::StrokeCircle {
            center: self.center,
            radius: self.base_radius,
            color: ACCENT_STROKE,
            width: RING_WIDTH,
        });
    }

    fn encode_indicator(&self, commands: &mut Vec<DrawCommand>, listening: bool) {
        let (fill, ring) = if listening {
            let (r, g, b) = LISTENING_TINT;
            (Rgba::new(r, g, b, self.indicator_opacity()), LISTENING_RING)
        } else {
            (IDLE_FILL, IDLE_RING)
        };

        commands.push(DrawCommand::FillCircle {
            center: self.center,
            radius: INNER_DISC_RADIUS,
            color: fill,
        });
        commands.push(DrawCommand::StrokeCircle {
            center: self.center,
            radius: INNER_RING_RADIUS,
            color: ring,
            width: RING_WIDTH,
        });
    }

    /// Oscillates with wall-clock time so the indicator breathes even
    /// while the room is silent
    fn indicator_opacity(&self) -> f32 {
        let millis = self.epoch.elapsed().as_millis() as f32;
        LISTENING_BASE_OPACITY + (millis * INDICATOR_PULSE_RATE).sin() * LISTENING_OPACITY_SWING
    }
}
