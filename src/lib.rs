//! # rasterlab
//!
//! CPU-only 2D vector graphics workbench: several anti-aliased polygon
//! fill engines behind one contract, together with the geometry front-end
//! and paint machinery needed to turn arbitrary vector input into a 32-bit
//! RGBA image.
//!
//! ## Architecture
//!
//! Data flows in one direction, leaves first:
//!
//! 1. **Path front-end** — [`path_storage::PathStorage`] collects contours,
//!    flattening curves on insertion ([`curves`]); [`stroke::Stroker`] and
//!    [`dash::Dasher`] expand strokes and dash patterns into polygons.
//! 2. **Paint fetchers** — solid color, linear/radial/conic gradients over
//!    a 256-entry LUT ([`gradient`]), and affine image patterns
//!    ([`pattern`]), all behind the per-pixel [`paint::Fetch`] capability.
//! 3. **Rasterizers** — the analytic cell-accumulation engine
//!    ([`raster_analytic::AnalyticRasterizer`]) is the reference; seven
//!    alternative engines honor the same [`raster::PolygonFill`] contract
//!    with different coverage models.
//! 4. **Compositing** — scalar source-over / source-copy kernels on
//!    straight 8-bit RGBA ([`comp_op`]).
//!
//! All engines are single-threaded and deterministic; buffers are
//! allocated at construction and reused across draws.

// Foundation
pub mod basics;
pub mod color;
pub mod error;
pub mod math;

// Path front-end
pub mod curves;
pub mod dash;
pub mod path_storage;
pub mod stroke;

// Paint
pub mod gradient;
pub mod gradient_lut;
pub mod paint;
pub mod pattern;

// Target surface and compositing
pub mod comp_op;
pub mod framebuffer;

// Rasterizer family
pub mod raster;
pub mod raster_analytic;
pub mod raster_coverage_span;
pub mod raster_distance_field;
pub mod raster_edge_lut;
pub mod raster_signature;
pub mod raster_subpixel_rgb;
pub mod raster_supersample;
pub mod raster_tessellate;
pub mod raster_wavelet;

pub use basics::{FillingRule, PointD};
pub use comp_op::CompOp;
pub use dash::Dasher;
pub use error::Error;
pub use framebuffer::Framebuffer;
pub use gradient::{ConicGradient, LinearGradient, RadialGradient};
pub use gradient_lut::{ColorLut, GradientStop};
pub use paint::{Extend, Fetch, Solid};
pub use path_storage::PathStorage;
pub use pattern::{Filter, ImagePattern};
pub use raster::PolygonFill;
pub use raster_analytic::AnalyticRasterizer;
pub use raster_coverage_span::CoverageSpanRasterizer;
pub use raster_distance_field::DistanceFieldRasterizer;
pub use raster_edge_lut::EdgeLutRasterizer;
pub use raster_signature::SignatureRasterizer;
pub use raster_subpixel_rgb::SubpixelDistanceRasterizer;
pub use raster_supersample::SupersampleRasterizer;
pub use raster_tessellate::TessellationRasterizer;
pub use raster_wavelet::WaveletRasterizer;
pub use stroke::{LineCap, LineJoin, StrokeOptions, Stroker};
