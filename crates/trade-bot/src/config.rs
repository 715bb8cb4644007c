//! Configuration for the order bot

use std::time::Duration;

/// Configuration for the order bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Timeout applied to each outbound exchange request
    pub request_timeout: Duration,

    /// Welcome message sent at the start of a conversation
    pub welcome_message: String,

    /// Prompt prefix for the REPL transport
    pub prompt: String,

    /// Idle session lifetime in seconds
    pub session_ttl_secs: i64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            welcome_message: "Welcome! Please select an exchange: OKX, Bybit, Deribit, Binance."
                .to_string(),
            prompt: ">>> ".to_string(),
            session_ttl_secs: 3600,
        }
    }
}

impl BotConfig {
    /// Create a configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }
}

/// Builder for [`BotConfig`]
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    request_timeout: Option<Duration>,
    welcome_message: Option<String>,
    prompt: Option<String>,
    session_ttl_secs: Option<i64>,
}

impl BotConfigBuilder {
    /// Set the outbound request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the welcome message
    pub fn welcome_message(mut self, msg: impl Into<String>) -> Self {
        self.welcome_message = Some(msg.into());
        self
    }

    /// Set the REPL prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the idle session lifetime in seconds
    pub fn session_ttl_secs(mut self, ttl: i64) -> Self {
        self.session_ttl_secs = Some(ttl);
        self
    }

    /// Build the configuration
    pub fn build(self) -> BotConfig {
        let defaults = BotConfig::default();
        BotConfig {
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            welcome_message: self.welcome_message.unwrap_or(defaults.welcome_message),
            prompt: self.prompt.unwrap_or(defaults.prompt),
            session_ttl_secs: self.session_ttl_secs.unwrap_or(defaults.session_ttl_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.welcome_message.contains("Binance"));
        assert_eq!(config.prompt, ">>> ");
    }

    #[test]
    fn test_config_builder() {
        let config = BotConfig::builder()
            .request_timeout(Duration::from_secs(5))
            .prompt("$ ")
            .session_ttl_secs(60)
            .build();

        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.session_ttl_secs, 60);
    }
}
