use std::env;

/// Vendor backend selection, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Naver,
    Kakao,
    Synthetic,
}

impl ProviderKind {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "naver" => Some(ProviderKind::Naver),
            "kakao" => Some(ProviderKind::Kakao),
            "synthetic" => Some(ProviderKind::Synthetic),
            _ => None,
        }
    }
}

/// Process configuration, read from the environment exactly once. Nothing
/// re-reads environment variables after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderKind,
    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
    pub kakao_rest_api_key: Option<String>,
    pub database_url: Option<String>,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let provider = match env::var("MAP_PROVIDER") {
            Ok(value) => ProviderKind::parse(&value).unwrap_or_else(|| {
                tracing::warn!("unknown MAP_PROVIDER {value:?}, defaulting to kakao");
                ProviderKind::Kakao
            }),
            Err(_) => ProviderKind::Kakao,
        };

        Self {
            provider,
            naver_client_id: env::var("NAVER_MAPS_CLIENT_ID").ok(),
            naver_client_secret: env::var("NAVER_MAPS_CLIENT_SECRET").ok(),
            kakao_rest_api_key: env::var("KAKAO_REST_API_KEY").ok(),
            database_url: env::var("DATABASE_URL").ok(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        }
    }
}
