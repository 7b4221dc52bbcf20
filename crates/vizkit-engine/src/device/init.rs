/// Environment variable selecting the wgpu backend set (`vulkan`, `metal`,
/// `dx12`, `gl`, `all`; comma separated).
pub const BACKEND_ENV: &str = "VIZKIT_BACKEND";

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the instance may pick an adapter from.
    pub backends: wgpu::Backends,

    /// Adapter preference. Demo scenes are tiny, so integrated GPUs are fine.
    pub power_preference: wgpu::PowerPreference,

    /// Prefer an sRGB surface format when available.
    ///
    /// Named colors are sRGB bytes; an sRGB surface keeps them exact.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::LowPower,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Defaults, with the backend set overridden by [`BACKEND_ENV`] when it parses.
    pub fn from_env() -> Self {
        let mut init = Self::default();
        if let Ok(raw) = std::env::var(BACKEND_ENV) {
            match parse_backends(&raw) {
                Some(b) => init.backends = b,
                None => log::warn!("ignoring {BACKEND_ENV}={raw:?}: no known backend"),
            }
        }
        init
    }
}

/// Parses a comma-separated backend list. Returns `None` if nothing matched.
pub fn parse_backends(raw: &str) -> Option<wgpu::Backends> {
    let mut out = wgpu::Backends::empty();
    for part in raw.split(',').map(|p| p.trim().to_ascii_lowercase()) {
        out |= match part.as_str() {
            "vulkan" | "vk" => wgpu::Backends::VULKAN,
            "metal" | "mtl" => wgpu::Backends::METAL,
            "dx12" | "d3d12" => wgpu::Backends::DX12,
            "gl" | "gles" | "opengl" => wgpu::Backends::GL,
            "all" => wgpu::Backends::all(),
            _ => wgpu::Backends::empty(),
        };
    }
    if out.is_empty() { None } else { Some(out) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_backend() {
        assert_eq!(parse_backends("vulkan"), Some(wgpu::Backends::VULKAN));
        assert_eq!(parse_backends(" GL "), Some(wgpu::Backends::GL));
    }

    #[test]
    fn parses_backend_list() {
        let b = parse_backends("metal, dx12").unwrap();
        assert!(b.contains(wgpu::Backends::METAL));
        assert!(b.contains(wgpu::Backends::DX12));
        assert!(!b.contains(wgpu::Backends::VULKAN));
    }

    #[test]
    fn unknown_backend_is_none() {
        assert_eq!(parse_backends("glide"), None);
        assert_eq!(parse_backends(""), None);
    }
}
