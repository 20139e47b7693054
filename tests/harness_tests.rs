//! Store-level flows: reducer plus effects, with async completions fed back by hand.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use pokeinfo::{
    action::Action,
    api::{FetchError, PokeClient},
    artwork::{Artwork, ArtworkUnavailable},
    effect::{self, Effect},
    reducer::reducer,
    state::{
        AppState, ArtworkState, NoticeKind, PokemonDetails, PokemonStat, PokemonSummary,
        ViewState,
    },
};
use tui_dispatch::testing::*;

fn pikachu() -> PokemonDetails {
    PokemonDetails {
        id: 25,
        name: "pikachu".into(),
        types: vec!["electric".into()],
        abilities: vec!["static".into(), "lightning-rod".into()],
        stats: vec![
            PokemonStat {
                name: "hp".into(),
                base_value: 35,
            },
            PokemonStat {
                name: "speed".into(),
                base_value: 90,
            },
        ],
    }
}

fn names(list: &[&str]) -> Vec<PokemonSummary> {
    list.iter()
        .map(|name| PokemonSummary {
            name: name.to_string(),
        })
        .collect()
}

/// Counts calls and answers from fixed data.
#[derive(Default)]
struct CountingClient {
    calls: AtomicUsize,
}

#[async_trait]
impl PokeClient for CountingClient {
    async fn list_names(&self, limit: u32) -> Result<Vec<PokemonSummary>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(names(&["bulbasaur", "pikachu"])
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn get_details(&self, name: &str) -> Result<PokemonDetails, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match name.trim().to_lowercase().as_str() {
            "pikachu" => Ok(pikachu()),
            other => Err(FetchError::NotFound {
                name: other.to_string(),
            }),
        }
    }

    async fn resolve_artwork(&self, _id: u32) -> Result<Artwork, ArtworkUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ArtworkUnavailable::new("Error: 404"))
    }
}

#[test]
fn startup_loads_name_list() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.names_loading);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadNames { limit: 100 }));

    harness.complete_action(Action::NamesDidLoad(names(&["bulbasaur", "ivysaur"])));
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (1, 1));
    harness.assert_state(|s| !s.names_loading && s.names.len() == 2);
}

#[test]
fn name_list_failure_leaves_dropdown_empty() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.complete_action(Action::NamesDidError(FetchError::Http { status: 503 }));
    harness.process_emitted();
    harness.assert_state(|s| s.names.is_empty());
    harness.assert_state(|s| {
        s.notice
            .as_ref()
            .is_some_and(|n| n.kind == NoticeKind::Error && n.text.contains("503"))
    });
}

#[test]
fn lookup_flow_reaches_info_with_artwork_fallback() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::NamesDidLoad(names(&["bulbasaur", "pikachu"])));
    harness.dispatch_collect(Action::DropdownMove(1));
    harness.dispatch_collect(Action::DropdownConfirm);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::FetchDetails { seq: 1, name } if name == "pikachu"),
    );

    harness.complete_action(Action::DetailsDidLoad {
        seq: 1,
        details: pikachu(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.view_state() == ViewState::Info);
    harness.assert_state(|s| s.artwork.is_loading());

    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::FetchArtwork { seq: 1, id: 25 }));

    harness.complete_action(Action::ArtworkDidFail {
        seq: 1,
        error: ArtworkUnavailable::new("Error: 404"),
    });
    harness.process_emitted();
    harness.assert_state(|s| matches!(s.artwork, ArtworkState::Unavailable(_)));
    harness.assert_state(|s| s.view_state() == ViewState::Info && s.notice.is_none());

    harness.dispatch_collect(Action::Back);
    harness.assert_state(|s| s.view_state() == ViewState::Main);
}

#[test]
fn newer_lookup_wins_over_late_result() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_all([
        Action::EntryInput('e'),
        Action::LookupSubmit,
        Action::EntryBackspace,
        Action::EntryInput('p'),
        Action::LookupSubmit,
    ]);
    let effects = harness.drain_effects();
    effects.effects_count(2);

    harness.complete_action(Action::DetailsDidLoad {
        seq: 1,
        details: PokemonDetails {
            name: "eevee".into(),
            id: 133,
            ..pikachu()
        },
    });
    let (changed, _) = harness.process_emitted();
    assert_eq!(changed, 0);
    harness.assert_state(|s| s.view_state() == ViewState::Main);
    harness.drain_effects().effects_empty();

    harness.complete_action(Action::DetailsDidLoad {
        seq: 2,
        details: pikachu(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.details.as_ref().is_some_and(|d| d.id == 25));
}

#[test]
fn favorites_add_then_remove_through_overlay() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_all([
        Action::NamesDidLoad(names(&["bulbasaur", "pikachu"])),
        Action::DropdownSelect(1),
        Action::FavoriteAdd,
        Action::NoticeDismiss,
        Action::DropdownSelect(0),
        Action::FavoriteAdd,
        Action::NoticeDismiss,
    ]);
    harness.assert_state(|s| s.favorites.list() == vec!["bulbasaur", "pikachu"]);
    harness.drain_effects().effects_empty();

    harness.dispatch_all([
        Action::FavoritesOpen,
        Action::FavoritesMove(1),
        Action::FavoritesToggleMark,
        Action::FavoritesRemoveMarked,
    ]);
    harness.assert_state(|s| s.favorites.list() == vec!["bulbasaur"]);
    harness.assert_state(|s| s.view_state() == ViewState::FavoritesModal);

    harness.dispatch_all([Action::NoticeDismiss, Action::FavoritesClose]);
    harness.assert_state(|s| s.view_state() == ViewState::Main);
}

#[tokio::test]
async fn empty_query_never_reaches_the_client() {
    let client = Arc::new(CountingClient::default());
    let mut state = AppState::default();

    let result = reducer(&mut state, Action::LookupSubmit);
    for effect in result.effects {
        effect::perform(client.as_ref(), effect).await;
    }

    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    assert_eq!(state.view_state(), ViewState::Main);
    assert!(state.notice.is_some());
}

#[tokio::test]
async fn perform_maps_client_results_to_actions() {
    let client = CountingClient::default();

    let action = effect::perform(
        &client,
        Effect::FetchDetails {
            seq: 4,
            name: "Pikachu".into(),
        },
    )
    .await;
    assert_eq!(
        action,
        Action::DetailsDidLoad {
            seq: 4,
            details: pikachu()
        }
    );

    let action = effect::perform(
        &client,
        Effect::FetchDetails {
            seq: 5,
            name: "missingno".into(),
        },
    )
    .await;
    assert!(matches!(
        action,
        Action::DetailsDidError {
            seq: 5,
            error: FetchError::NotFound { .. },
            ..
        }
    ));

    let action = effect::perform(&client, Effect::FetchArtwork { seq: 5, id: 25 }).await;
    assert!(matches!(action, Action::ArtworkDidFail { seq: 5, .. }));
    assert_eq!(client.calls.load(Ordering::SeqCst), 3);
}
