use config::{Config, ConfigError, Environment};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub service_name: String,
    pub listen_port: String,
    pub upload_dir: String,
    pub static_dir: String,
    pub max_upload_bytes: usize,
    //chart
    pub chart_width: u32,
    pub chart_height: u32,
    pub chart_font: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .set_default("service_name", "ci-scoring")?
            .set_default("listen_port", "5000")?
            .set_default("upload_dir", "uploads")?
            .set_default("static_dir", "static")?
            .set_default("max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("chart_width", 1000)?
            .set_default("chart_height", 600)?
            .set_default(
                "chart_font",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            )?
            .add_source(Environment::default())
            .build()?;
        let s: Settings = conf.try_deserialize()?;
        if s.chart_width == 0 || s.chart_height == 0 {
            return Err(ConfigError::Message(
                "chart_width and chart_height must be non-zero".into(),
            ));
        }
        Ok(s)
    }
}

lazy_static! {
    pub static ref settings: Settings = Settings::new().expect("improperly configured");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_unset_keys() -> Result<(), ConfigError> {
        let s = Settings::new()?;
        assert!(!s.upload_dir.is_empty());
        assert!(!s.static_dir.is_empty());
        assert!(s.max_upload_bytes > 0);
        assert!(s.chart_width > 0 && s.chart_height > 0);
        Ok(())
    }
}
