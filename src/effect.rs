use crate::action::Action;
use crate::api::PokeClient;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadNames { limit: u32 },
    FetchDetails { seq: u64, name: String },
    FetchArtwork { seq: u64, id: u32 },
}

impl Effect {
    /// Task slot for the runtime. A new lookup replaces the task of the previous one.
    pub fn task_key(&self) -> &'static str {
        match self {
            Effect::LoadNames { .. } => "names",
            Effect::FetchDetails { .. } => "lookup",
            Effect::FetchArtwork { .. } => "artwork",
        }
    }
}

/// Runs `effect` against `client` and returns the completion action.
pub async fn perform(client: &dyn PokeClient, effect: Effect) -> Action {
    match effect {
        Effect::LoadNames { limit } => match client.list_names(limit).await {
            Ok(names) => {
                tracing::info!(count = names.len(), "name list loaded");
                Action::NamesDidLoad(names)
            }
            Err(error) => {
                tracing::warn!(%error, "name list failed");
                Action::NamesDidError(error)
            }
        },
        Effect::FetchDetails { seq, name } => {
            tracing::info!(seq, %name, "lookup started");
            match client.get_details(&name).await {
                Ok(details) => Action::DetailsDidLoad { seq, details },
                Err(error) => {
                    tracing::warn!(seq, %name, %error, "lookup failed");
                    Action::DetailsDidError { seq, name, error }
                }
            }
        }
        Effect::FetchArtwork { seq, id } => match client.resolve_artwork(id).await {
            Ok(artwork) => Action::ArtworkDidLoad { seq, artwork },
            Err(error) => {
                tracing::debug!(seq, id, %error, "artwork unavailable");
                Action::ArtworkDidFail { seq, error }
            }
        },
    }
}
