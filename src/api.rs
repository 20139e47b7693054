//! PokeAPI client: the name list, per-Pokemon details and official artwork.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::artwork::{self, Artwork, ArtworkUnavailable};
use crate::format::capitalize;
use crate::state::{PokemonDetails, PokemonStat, PokemonSummary};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";
pub const DEFAULT_LIST_LIMIT: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_base: String,
    pub artwork_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            artwork_base: DEFAULT_ARTWORK_BASE.to_string(),
        }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchError {
    #[error("Error: 404 ({} not found)", capitalize(.name))]
    NotFound { name: String },
    #[error("Error: {status}")]
    Http { status: u16 },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait PokeClient: Send + Sync {
    async fn list_names(&self, limit: u32) -> Result<Vec<PokemonSummary>, FetchError>;

    /// `name` is trimmed and lowercased before it is sent.
    async fn get_details(&self, name: &str) -> Result<PokemonDetails, FetchError>;

    async fn resolve_artwork(&self, id: u32) -> Result<Artwork, ArtworkUnavailable>;
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    types: Vec<PokemonTypeSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    stats: Vec<PokemonStatSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u32,
    stat: NamedResource,
}

impl From<PokemonResponse> for PokemonDetails {
    fn from(response: PokemonResponse) -> Self {
        PokemonDetails {
            id: response.id,
            name: response.name,
            types: response
                .types
                .into_iter()
                .map(|slot| slot.type_info.name)
                .collect(),
            abilities: response
                .abilities
                .into_iter()
                .map(|slot| slot.ability.name)
                .collect(),
            stats: response
                .stats
                .into_iter()
                .map(|slot| PokemonStat {
                    name: slot.stat.name,
                    base_value: slot.base_stat,
                })
                .collect(),
        }
    }
}

pub struct HttpPokeClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpPokeClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| FetchError::Decode(err.to_string()))
    }
}

#[async_trait]
impl PokeClient for HttpPokeClient {
    async fn list_names(&self, limit: u32) -> Result<Vec<PokemonSummary>, FetchError> {
        let url = format!(
            "{}/pokemon?limit={limit}",
            self.config.api_base.trim_end_matches('/')
        );
        let response: ListResponse = self.get_json(&url).await?;
        Ok(response
            .results
            .into_iter()
            .map(|entry| PokemonSummary { name: entry.name })
            .collect())
    }

    async fn get_details(&self, name: &str) -> Result<PokemonDetails, FetchError> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(FetchError::NotFound { name });
        }
        let url = format!(
            "{}/pokemon/{}",
            self.config.api_base.trim_end_matches('/'),
            urlencoding::encode(&name)
        );
        match self.get_json::<PokemonResponse>(&url).await {
            Ok(response) => Ok(response.into()),
            Err(FetchError::Http { status: 404 }) => Err(FetchError::NotFound { name }),
            Err(err) => Err(err),
        }
    }

    async fn resolve_artwork(&self, id: u32) -> Result<Artwork, ArtworkUnavailable> {
        let url = artwork::artwork_url(&self.config.artwork_base, id);
        let response = self
            .get(&url)
            .await
            .map_err(|err| ArtworkUnavailable::new(err.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ArtworkUnavailable::new(err.to_string()))?;
        artwork::decode_artwork(&bytes)
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_response_keeps_provider_order() {
        let json = r#"{
            "id": 6,
            "name": "charizard",
            "types": [
                {"slot": 1, "type": {"name": "fire", "url": "x"}},
                {"slot": 2, "type": {"name": "flying", "url": "x"}}
            ],
            "abilities": [
                {"ability": {"name": "blaze", "url": "x"}, "is_hidden": false},
                {"ability": {"name": "solar-power", "url": "x"}, "is_hidden": true}
            ],
            "stats": [
                {"base_stat": 78, "effort": 0, "stat": {"name": "hp", "url": "x"}},
                {"base_stat": 100, "effort": 3, "stat": {"name": "speed", "url": "x"}}
            ],
            "height": 17
        }"#;
        let response: PokemonResponse = serde_json::from_str(json).unwrap();
        let details = PokemonDetails::from(response);
        assert_eq!(details.id, 6);
        assert_eq!(details.types, vec!["fire", "flying"]);
        assert_eq!(details.abilities, vec!["blaze", "solar-power"]);
        assert_eq!(details.stats[1].name, "speed");
        assert_eq!(details.stats[1].base_value, 100);
    }

    #[test]
    fn fetch_errors_render_user_messages() {
        assert_eq!(
            FetchError::NotFound {
                name: "missingno".into()
            }
            .to_string(),
            "Error: 404 (Missingno not found)"
        );
        assert_eq!(FetchError::Http { status: 503 }.to_string(), "Error: 503");
    }

    #[test]
    fn names_are_lowercased_before_transport() {
        assert_eq!(normalize_name("  Pikachu "), "pikachu");
    }
}
