use std::{collections::HashMap, fs};

use anyhow::bail;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub ocr_endpoint: String,
    pub ocr_api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            ocr_endpoint: "https://api.ocr.space/parse/image".into(),
            ocr_api_key: String::new(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("ocr_endpoint") {
                settings.ocr_endpoint = v.clone();
            }
            if let Some(v) = file_cfg.get("ocr_api_key") {
                settings.ocr_api_key = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("OCR_ENDPOINT") {
        settings.ocr_endpoint = v;
    }
    if let Ok(v) = std::env::var("APP__OCR_ENDPOINT") {
        settings.ocr_endpoint = v;
    }

    if let Ok(v) = std::env::var("OCR_API_KEY") {
        settings.ocr_api_key = v;
    }
    if let Ok(v) = std::env::var("APP__OCR_API_KEY") {
        settings.ocr_api_key = v;
    }

    settings
}

/// The recognition proxy is useless without a real key; refuse to start
/// rather than fail on the first request.
pub fn require_ocr_api_key(settings: &Settings) -> anyhow::Result<()> {
    if settings.ocr_api_key.is_empty() || settings.ocr_api_key == "YOUR_API_KEY_HERE" {
        bail!("OCR service API key is missing; set OCR_API_KEY or ocr_api_key in server.toml");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_api_key() {
        let settings = Settings::default();
        assert!(require_ocr_api_key(&settings).is_err());
    }

    #[test]
    fn rejects_placeholder_api_key() {
        let settings = Settings {
            ocr_api_key: "YOUR_API_KEY_HERE".into(),
            ..Settings::default()
        };
        assert!(require_ocr_api_key(&settings).is_err());
    }

    #[test]
    fn accepts_configured_api_key() {
        let settings = Settings {
            ocr_api_key: "k-123".into(),
            ..Settings::default()
        };
        assert!(require_ocr_api_key(&settings).is_ok());
    }
}
