//! Tests for file formats, configuration and the command-line driver

mod checkpoint;
mod configuration;
mod progress;
mod raster;
