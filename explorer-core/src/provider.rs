use crate::{
    Config, ProviderResponse, TravelError, TravelResult, provider::gemini::GeminiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod gemini;

/// A search-grounded text backend that can answer a travel brief request.
#[async_trait]
pub trait TravelProvider: Send + Sync + Debug {
    /// Issue exactly one request for `location`. No retry is performed.
    async fn fetch(&self, location: &str) -> Result<ProviderResponse, TravelError>;
}

/// Construct the provider described by the configuration.
///
/// Fails with [`TravelError::Config`] before any request when no API key is
/// available.
pub fn provider_from_config(config: &Config) -> TravelResult<Box<dyn TravelProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        TravelError::config(
            "No Gemini API key configured.\n\
             Hint: run `explorer configure` or set GEMINI_API_KEY.",
        )
    })?;

    Ok(Box::new(GeminiProvider::new(
        api_key.to_owned(),
        config.model().to_owned(),
        config.endpoint().to_owned(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        assert!(matches!(err, TravelError::Config { .. }));
        assert!(err.to_string().contains("No Gemini API key configured"));
        assert!(err.to_string().contains("Hint: run `explorer configure`"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
