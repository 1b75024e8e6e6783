use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlopscanConfig {
    pub github: Option<GithubConfig>,
    pub cache: Option<CacheConfig>,
    pub sampling: Option<SamplingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    pub token: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub dir: Option<String>,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    3_600
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_max_files() -> usize {
    28
}

impl SlopscanConfig {
    pub fn api_base(&self) -> String {
        self.github
            .as_ref()
            .map(|github| github.api_base.clone())
            .unwrap_or_else(default_api_base)
    }

    pub fn token(&self) -> Option<String> {
        self.github.as_ref().and_then(|github| github.token.clone())
    }

    pub fn cache_ttl_secs(&self) -> u64 {
        self.cache
            .as_ref()
            .map(|cache| cache.ttl_secs)
            .unwrap_or_else(default_ttl_secs)
    }

    pub fn cache_dir(&self) -> Option<String> {
        self.cache.as_ref().and_then(|cache| cache.dir.clone())
    }

    pub fn max_sample_files(&self) -> usize {
        self.sampling
            .as_ref()
            .map(|sampling| sampling.max_files)
            .unwrap_or_else(default_max_files)
    }
}
