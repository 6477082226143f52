use serde::{Deserialize, Serialize};

/// Geometry knobs for the circular spectrum renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Drawing surface width in logical pixels
    pub width: f32,
    /// Drawing surface height in logical pixels
    pub height: f32,
    /// Radius of the resting circle the bars radiate from
    pub base_radius: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            base_radius: 70.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language tag handed to the recognition engine (BCP 47)
    pub language: String,
    /// Audio sample rate in Hz
    pub sample_rate: usize,
    /// Capture block size in samples; also the most audio a single
    /// frequency frame can see
    pub buffer_size: usize,
    /// FFT size for the analyzer; the spectrum carries fft_size/2 bins
    pub fft_size: usize,
    /// Tick cadence of the render loop, approximating the display refresh
    pub refresh_rate_hz: u32,
    /// Delay before restarting a recognition session that ended on its own
    pub restart_delay_ms: u64,
    /// Whether to log periodic session statistics
    pub log_stats_enabled: bool,
    /// Renderer configuration
    pub renderer: RendererConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            sample_rate: 16000,
            buffer_size: 1024,
            fft_size: 256, // 128 spectrum bins
            refresh_rate_hz: 60,
            restart_delay_ms: 100,
            log_stats_enabled: true,
            renderer: RendererConfig::default(),
        }
    }
}

/// Helper function to read the application configuration
pub fn read_app_config() -> AppConfig {
    match std::fs::read_to_string("config.json") {
        Ok(config_str) => match serde_json::from_str(&config_str) {
            Ok(config) => config,
            Err(e) => {
                println!(
                    "Failed to parse config.json: {}. Using default configuration.",
                    e
                );
                AppConfig::default()
            }
        },
        Err(e) => {
            println!(
                "Failed to read config.json: {}. Using default configuration.",
                e
            );
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.fft_size, 256);
        assert_eq!(config.restart_delay_ms, 100);
        assert_eq!(config.renderer.base_radius, 70.0);
        assert!(config.fft_size.is_power_of_two());
    }

    #[test]
    fn partial_config_fills_missing_fields_from_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "language": "de-DE", "fft_size": 512 }"#).unwrap();
        assert_eq!(config.language, "de-DE");
        assert_eq!(config.fft_size, 512);
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.renderer.width, 400.0);
    }

    #[test]
    fn nested_partial_renderer_config() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "renderer": { "base_radius": 90.0 } }"#).unwrap();
        assert_eq!(config.renderer.base_radius, 90.0);
        assert_eq!(config.renderer.height, 400.0);
    }

    #[test]
    fn round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.language, config.language);
        assert_eq!(parsed.refresh_rate_hz, config.refresh_rate_hz);
    }
}
