use super::SurfaceErrorAction;

/// Picks an 8-bit RGBA surface, plain before sRGB, else the first format offered.
pub(crate) fn choose_surface_format(caps: &wgpu::SurfaceCapabilities) -> Option<wgpu::TextureFormat> {
    let preferred = [
        wgpu::TextureFormat::Bgra8Unorm,
        wgpu::TextureFormat::Rgba8Unorm,
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];
    preferred
        .into_iter()
        .find(|f| caps.formats.contains(f))
        .or_else(|| caps.formats.first().copied())
}

/// The view format renderers draw through.
///
/// Colors are sRGB-encoded, so frames are written through the non-sRGB twin of
/// the surface format and blending happens on encoded values.
pub(crate) fn render_view_format(surface: wgpu::TextureFormat) -> wgpu::TextureFormat {
    surface.remove_srgb_suffix()
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Policy for errors returned while acquiring a surface texture.
pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: Vec<wgpu::TextureFormat>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            ..Default::default()
        }
    }

    #[test]
    fn prefers_plain_eight_bit_formats() {
        let c = caps(vec![
            wgpu::TextureFormat::Rgba16Float,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Bgra8Unorm,
        ]);
        assert_eq!(choose_surface_format(&c), Some(wgpu::TextureFormat::Bgra8Unorm));
        let srgb_only = caps(vec![wgpu::TextureFormat::Rgba16Float, wgpu::TextureFormat::Rgba8UnormSrgb]);
        assert_eq!(choose_surface_format(&srgb_only), Some(wgpu::TextureFormat::Rgba8UnormSrgb));
    }

    #[test]
    fn unknown_formats_fall_back_to_the_first() {
        let c = caps(vec![wgpu::TextureFormat::Rgb10a2Unorm]);
        assert_eq!(choose_surface_format(&c), Some(wgpu::TextureFormat::Rgb10a2Unorm));
        assert_eq!(choose_surface_format(&caps(vec![])), None);
    }

    #[test]
    fn srgb_surfaces_are_drawn_through_plain_views() {
        assert_eq!(render_view_format(wgpu::TextureFormat::Bgra8UnormSrgb), wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(render_view_format(wgpu::TextureFormat::Rgba8Unorm), wgpu::TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let c = caps(vec![wgpu::TextureFormat::Bgra8Unorm]);
        let mode = choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied));
        assert_eq!(mode, wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert_eq!(classify_surface_error(&wgpu::SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
        assert_eq!(classify_surface_error(&wgpu::SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(classify_surface_error(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
    }
}
