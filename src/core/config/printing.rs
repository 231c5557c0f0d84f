use crate::core::config::data::Config;
use crate::core::constants::BACKEND_URL_ENV;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.backend_url {
            Some(url) => println!("  backend-url: {url}"),
            None => println!("  backend-url: (unset, using built-in sample answers)"),
        }
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                println!("    overridden by {BACKEND_URL_ENV}: {url}");
            }
        }
        match self.sample_latency_ms {
            Some(millis) => println!("  sample-latency-ms: {millis}"),
            None => println!("  sample-latency-ms: (unset, {})", self.sample_latency_ms()),
        }
        match &self.log_file {
            Some(path) => println!("  log-file: {path}"),
            None => println!("  log-file: (unset)"),
        }
        match &self.theme {
            Some(theme) => println!("  theme: {theme}"),
            None => println!("  theme: (unset)"),
        }
    }
}
