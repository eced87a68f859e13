//! # plotplan-core
//!
//! Geometric planning core for a laser/plotter toolpath generator.
//!
//! Given a drawing made of straight-line subpaths, this crate plans what
//! order to cut them in, how to fill closed outlines with a scanning
//! pattern, and how to turn a raster image into a zig-zag toolpath. It
//! owns none of the I/O around that: no file formats, no device
//! communication, no UI. Callers hand in geometry and pixel data and get
//! back plans.
//!
//! ## Modules
//!
//! - [`geometry`] — points, bounding boxes, and straight-line subpaths: the
//!   thin contract the rest of the crate is written against.
//! - [`monotonizer`] — sweep-line active-edge tracking and point-in-polygon
//!   queries.
//! - [`graph`] — an arena-indexed planar graph of nodes and typed edges.
//! - [`fill`] — fills a single closed outline with a scanning pattern and
//!   walks the result into a point sequence.
//! - [`walker`] — Hierholzer walk construction, scaffold pruning, and
//!   2-opt walk refinement.
//! - [`cutplan`] — cut-order nesting and travel-distance optimization.
//! - [`raster`] — zig-zag raster-scan toolpath generation over a pixel
//!   source.
//!
//! Everything here runs synchronously over owned data with no shared
//! mutable state between calls, so a single `RasterPlotter` or
//! `GraphWalker` is meant to be used from one thread for the life of one
//! planning pass.
//!
//! `math` is kept from the library this crate grew out of: its distance
//! and intersection primitives are reused directly by [`geometry`].

pub mod math;

pub mod geometry;
pub mod monotonizer;
pub mod graph;
pub mod fill;
pub mod walker;
pub mod cutplan;
pub mod raster;
