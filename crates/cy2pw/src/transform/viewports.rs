/// Portrait width and height of a Cypress viewport preset.
pub fn device_viewport(preset: &str) -> Option<(u32, u32)> {
    let size = match preset {
        "ipad-2" | "ipad-mini" => (768, 1024),
        "iphone-3" | "iphone-4" => (320, 480),
        "iphone-5" => (320, 568),
        "iphone-6" | "iphone-7" | "iphone-8" | "iphone-se2" => (375, 667),
        "iphone-6+" => (414, 736),
        "iphone-x" => (375, 812),
        "iphone-xr" => (414, 896),
        "macbook-11" => (1366, 768),
        "macbook-13" => (1280, 800),
        "macbook-15" => (1440, 900),
        "macbook-16" => (1536, 960),
        "samsung-note9" => (414, 846),
        "samsung-s10" => (360, 760),
        _ => return None,
    };
    Some(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(device_viewport("iphone-6"), Some((375, 667)));
        assert_eq!(device_viewport("macbook-15"), Some((1440, 900)));
        assert_eq!(device_viewport("nokia-3310"), None);
    }
}
