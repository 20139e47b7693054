use serde::{Deserialize, Serialize};

use crate::api::FetchError;
use crate::artwork::{Artwork, ArtworkUnavailable};
use crate::state::{PokemonDetails, PokemonSummary};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    NamesDidLoad(Vec<PokemonSummary>),
    NamesDidError(FetchError),

    DropdownMove(i16),
    DropdownSelect(usize),
    DropdownConfirm,
    DropdownClear,

    EntryInput(char),
    EntryBackspace,
    FocusToggle,

    /// "Get Info": look up the effective query.
    LookupSubmit,
    /// "Free Search": drop the dropdown selection and look up the entry text.
    FreeSearchSubmit,
    DetailsDidLoad { seq: u64, details: PokemonDetails },
    DetailsDidError { seq: u64, name: String, error: FetchError },
    ArtworkDidLoad { seq: u64, artwork: Artwork },
    ArtworkDidFail { seq: u64, error: ArtworkUnavailable },
    Back,

    FavoriteAdd,
    FavoritesOpen,
    FavoritesClose,
    FavoritesMove(i16),
    FavoritesToggleMark,
    FavoritesRemoveMarked,

    NoticeDismiss,

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
