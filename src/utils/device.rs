use crate::utils::analytics::{DeviceData, DeviceType};

pub fn detect_device_type(user_agent: &str) -> DeviceType {
    let ua = user_agent.to_lowercase();

    let android_tablet = ua
        .rfind("android")
        .map_or(false, |i| !ua[i..].contains("mobile"));
    if ["ipad", "tablet", "playbook", "silk"].iter().any(|t| ua.contains(t)) || android_tablet {
        return DeviceType::Tablet;
    }

    let mobile_markers = [
        "mobile",
        "iphone",
        "ipod",
        "android",
        "blackberry",
        "opera mini",
        "windows phone",
    ];
    if mobile_markers.iter().any(|m| ua.contains(m)) {
        return DeviceType::Mobile;
    }

    DeviceType::Desktop
}

/// Chromium derivatives are checked before Chrome itself.
pub fn detect_browser(user_agent: &str) -> &'static str {
    let ua = user_agent;
    if ua.contains("Edg/") {
        "Edge"
    } else if ua.contains("OPR/") || ua.contains("Opera/") {
        "Opera"
    } else if ua.contains("Chrome/") {
        "Chrome"
    } else if ua.contains("Safari/") {
        "Safari"
    } else if ua.contains("Firefox/") {
        "Firefox"
    } else if ua.contains("MSIE") || ua.contains("Trident/") {
        "Internet Explorer"
    } else {
        "Outro"
    }
}

fn version_after<'u>(ua: &'u str, marker: &str) -> Option<&'u str> {
    let rest = &ua[ua.find(marker)? + marker.len()..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '_'))
        .unwrap_or(rest.len());
    Some(&rest[..end]).filter(|v| !v.is_empty())
}

pub fn device_info(user_agent: &str) -> String {
    let ua = user_agent;
    if ua.contains("iPhone") {
        return "iPhone".to_string();
    }
    if ua.contains("iPad") {
        return "iPad".to_string();
    }
    if ua.contains("Android") {
        return match version_after(ua, "Android ") {
            Some(version) => format!("Android {}", version),
            None => "Android".to_string(),
        };
    }
    if ua.contains("Windows") {
        let name = if ua.contains("Windows NT 10.0") {
            "Windows 10/11"
        } else if ua.contains("Windows NT 6.3") {
            "Windows 8.1"
        } else if ua.contains("Windows NT 6.2") {
            "Windows 8"
        } else if ua.contains("Windows NT 6.1") {
            "Windows 7"
        } else {
            "Windows"
        };
        return name.to_string();
    }
    if ua.contains("Macintosh") || ua.contains("Mac OS X") {
        return match version_after(ua, "Mac OS X ") {
            Some(version) => format!("macOS {}", version.replace('_', ".")),
            None => "macOS".to_string(),
        };
    }
    if ua.contains("Linux") {
        return "Linux".to_string();
    }
    "Desconhecido".to_string()
}

pub fn device_data(user_agent: &str) -> DeviceData {
    DeviceData {
        kind: detect_device_type(user_agent),
        info: device_info(user_agent),
        browser: detect_browser(user_agent).to_string(),
    }
}

/// Reads the user agent from the running browser.
pub fn current_device() -> Option<DeviceData> {
    let agent = web_sys::window()?.navigator().user_agent().ok()?;
    Some(device_data(&agent))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
    const ANDROID_PHONE: &str = "Mozilla/5.0 (Linux; Android 13; SM-S911B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Mobile Safari/537.36";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 12.1; SM-X200) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
    const WINDOWS_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36 Edg/119.0.2151.72";
    const MAC_SAFARI: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
    const LINUX_FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

    #[test]
    fn device_types() {
        assert_eq!(detect_device_type(IPHONE), DeviceType::Mobile);
        assert_eq!(detect_device_type(IPAD), DeviceType::Tablet);
        assert_eq!(detect_device_type(ANDROID_PHONE), DeviceType::Mobile);
        assert_eq!(detect_device_type(ANDROID_TABLET), DeviceType::Tablet);
        assert_eq!(detect_device_type(WINDOWS_EDGE), DeviceType::Desktop);
        assert_eq!(detect_device_type(LINUX_FIREFOX), DeviceType::Desktop);
    }

    #[test]
    fn browsers() {
        assert_eq!(detect_browser(WINDOWS_EDGE), "Edge");
        assert_eq!(detect_browser(ANDROID_PHONE), "Chrome");
        assert_eq!(detect_browser(MAC_SAFARI), "Safari");
        assert_eq!(detect_browser(LINUX_FIREFOX), "Firefox");
        assert_eq!(detect_browser("Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.1; Trident/6.0)"), "Internet Explorer");
        assert_eq!(detect_browser("curl/8.0"), "Outro");
    }

    #[test]
    fn operating_systems() {
        assert_eq!(device_info(IPHONE), "iPhone");
        assert_eq!(device_info(IPAD), "iPad");
        assert_eq!(device_info(ANDROID_PHONE), "Android 13");
        assert_eq!(device_info(ANDROID_TABLET), "Android 12.1");
        assert_eq!(device_info(WINDOWS_EDGE), "Windows 10/11");
        assert_eq!(device_info(MAC_SAFARI), "macOS 10.15.7");
        assert_eq!(device_info(LINUX_FIREFOX), "Linux");
        assert_eq!(device_info("curl/8.0"), "Desconhecido");
    }

    #[test]
    fn device_data_combines_all_three() {
        let data = device_data(ANDROID_PHONE);
        assert_eq!(data.kind, DeviceType::Mobile);
        assert_eq!(data.browser, "Chrome");
        assert_eq!(data.info, "Android 13");
    }
}
