//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::{GpuInit, parse_backends};
