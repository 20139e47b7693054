use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::favorites::Added;
use crate::format::capitalize;
use crate::state::{AppState, ArtworkState, MainFocus, Notice, PendingLookup, Screen};

const EMPTY_QUERY_MESSAGE: &str = "Please select or enter a Pokemon";
const EMPTY_REMOVAL_MESSAGE: &str = "Please select a Pokemon to remove";
const DROPDOWN_PAGE: i16 = 10;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.names_loading = true;
            state.notice = None;
            DispatchResult::changed_with(Effect::LoadNames {
                limit: state.list_limit,
            })
        }

        Action::NamesDidLoad(names) => {
            state.names = names;
            state.names_loading = false;
            state.dropdown_cursor = 0;
            DispatchResult::changed()
        }

        Action::NamesDidError(error) => {
            state.names.clear();
            state.names_loading = false;
            state.notice = Some(Notice::error(format!(
                "Could not load the Pokemon list. {error}"
            )));
            DispatchResult::changed()
        }

        Action::DropdownMove(delta) => {
            let delta = match delta {
                i16::MIN..=-2 => -DROPDOWN_PAGE,
                2..=i16::MAX => DROPDOWN_PAGE,
                step => step,
            };
            let next = clamp_index(state.dropdown_cursor, state.names.len(), delta);
            if next == state.dropdown_cursor {
                return DispatchResult::unchanged();
            }
            state.dropdown_cursor = next;
            DispatchResult::changed()
        }

        Action::DropdownSelect(index) => {
            let Some(summary) = state.names.get(index) else {
                return DispatchResult::unchanged();
            };
            state.dropdown_value = summary.name.clone();
            state.dropdown_cursor = index;
            DispatchResult::changed()
        }

        Action::DropdownConfirm => {
            if let Some(name) = state.cursor_name() {
                state.dropdown_value = name.to_string();
            }
            submit_lookup(state)
        }

        Action::DropdownClear => {
            if state.dropdown_value.is_empty() {
                return DispatchResult::unchanged();
            }
            state.dropdown_value.clear();
            DispatchResult::changed()
        }

        Action::EntryInput(ch) => {
            state.entry.push(ch);
            DispatchResult::changed()
        }

        Action::EntryBackspace => {
            if state.entry.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::FocusToggle => {
            state.focus = match state.focus {
                MainFocus::Dropdown => MainFocus::Entry,
                MainFocus::Entry => MainFocus::Dropdown,
            };
            DispatchResult::changed()
        }

        Action::LookupSubmit => submit_lookup(state),

        Action::FreeSearchSubmit => {
            state.dropdown_value.clear();
            submit_lookup(state)
        }

        Action::DetailsDidLoad { seq, details } => {
            if !is_current(state, seq) {
                tracing::debug!(seq, latest = state.lookup_seq, "discarding stale details");
                return DispatchResult::unchanged();
            }
            let id = details.id;
            state.lookup = None;
            state.details = Some(details);
            state.artwork = ArtworkState::Loading;
            state.screen = Screen::Info;
            state.favorites_modal.open = false;
            DispatchResult::changed_with(Effect::FetchArtwork { seq, id })
        }

        Action::DetailsDidError { seq, name, error } => {
            if !is_current(state, seq) {
                tracing::debug!(seq, %name, latest = state.lookup_seq, "discarding stale error");
                return DispatchResult::unchanged();
            }
            state.lookup = None;
            state.notice = Some(Notice::error(error.to_string()));
            DispatchResult::changed()
        }

        Action::ArtworkDidLoad { seq, artwork } => {
            if seq != state.lookup_seq {
                return DispatchResult::unchanged();
            }
            state.artwork = ArtworkState::Ready(artwork);
            DispatchResult::changed()
        }

        Action::ArtworkDidFail { seq, error } => {
            if seq != state.lookup_seq {
                return DispatchResult::unchanged();
            }
            state.artwork = ArtworkState::Unavailable(error.reason);
            DispatchResult::changed()
        }

        Action::Back => {
            if state.screen == Screen::Main {
                return DispatchResult::unchanged();
            }
            state.screen = Screen::Main;
            DispatchResult::changed()
        }

        Action::FavoriteAdd => {
            let name = state.dropdown_value.clone();
            match state.favorites.add(&name) {
                Ok(Added::New) | Ok(Added::AlreadyPresent) => {
                    state.notice = Some(Notice::info(format!(
                        "{} added to favorites!",
                        capitalize(name.trim())
                    )));
                }
                Err(error) => {
                    state.notice = Some(Notice::error(error.to_string()));
                }
            }
            DispatchResult::changed()
        }

        Action::FavoritesOpen => {
            // The overlay only opens over Main.
            if state.screen != Screen::Main || state.favorites_modal.open {
                return DispatchResult::unchanged();
            }
            state.favorites_modal.open = true;
            state.favorites_modal.cursor = 0;
            state.favorites_modal.marked.clear();
            DispatchResult::changed()
        }

        Action::FavoritesClose => {
            if !state.favorites_modal.open {
                return DispatchResult::unchanged();
            }
            state.favorites_modal.open = false;
            state.favorites_modal.marked.clear();
            DispatchResult::changed()
        }

        Action::FavoritesMove(delta) => {
            if !state.favorites_modal.open {
                return DispatchResult::unchanged();
            }
            let next = clamp_index(state.favorites_modal.cursor, state.favorites.len(), delta);
            if next == state.favorites_modal.cursor {
                return DispatchResult::unchanged();
            }
            state.favorites_modal.cursor = next;
            DispatchResult::changed()
        }

        Action::FavoritesToggleMark => {
            let modal = &mut state.favorites_modal;
            if !modal.open || modal.cursor >= state.favorites.len() {
                return DispatchResult::unchanged();
            }
            if let Some(pos) = modal.marked.iter().position(|idx| *idx == modal.cursor) {
                modal.marked.remove(pos);
            } else {
                modal.marked.push(modal.cursor);
            }
            DispatchResult::changed()
        }

        Action::FavoritesRemoveMarked => {
            if !state.favorites_modal.open {
                return DispatchResult::unchanged();
            }
            if state.favorites_modal.marked.is_empty() {
                state.notice = Some(Notice::error(EMPTY_REMOVAL_MESSAGE));
                return DispatchResult::changed();
            }
            let marked = std::mem::take(&mut state.favorites_modal.marked);
            state.favorites.remove_indices(&marked);
            state.favorites_modal.cursor = state
                .favorites_modal
                .cursor
                .min(state.favorites.len().saturating_sub(1));
            state.notice = Some(Notice::info("Selected Pokemon removed from favorites!"));
            DispatchResult::changed()
        }

        Action::NoticeDismiss => {
            if state.notice.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            if !state.is_busy() {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn submit_lookup(state: &mut AppState) -> DispatchResult<Effect> {
    let Some(name) = state.effective_query() else {
        state.notice = Some(Notice::error(EMPTY_QUERY_MESSAGE));
        return DispatchResult::changed();
    };
    state.lookup_seq += 1;
    let seq = state.lookup_seq;
    state.lookup = Some(PendingLookup {
        seq,
        name: name.clone(),
    });
    state.notice = None;
    // Artwork still downloading for the previous lookup will never land now.
    if state.artwork.is_loading() {
        state.artwork = ArtworkState::Idle;
    }
    DispatchResult::changed_with(Effect::FetchDetails { seq, name })
}

fn is_current(state: &AppState, seq: u64) -> bool {
    state
        .lookup
        .as_ref()
        .is_some_and(|pending| pending.seq == seq)
}

fn clamp_index(current: usize, len: usize, delta: i16) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as i64 + delta as i64;
    next.clamp(0, len as i64 - 1) as usize
}
