use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{Component, EventKind, EventOutcome};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::artwork::{self, Artwork};
use crate::format::{capitalize, format_details};
use crate::sprite_backend;
use crate::state::{AppState, ArtworkState, MainFocus, NoticeKind, Screen, ViewState};

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const ACCENT_RED: Color = Color::Rgb(224, 96, 96);
const CELL_ASPECT: f32 = 2.0;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct PokeUi {
    dropdown: SelectList,
    favorites: SelectList,
    status_bar: StatusBar,
}

impl Default for PokeUi {
    fn default() -> Self {
        Self::new()
    }
}

impl PokeUi {
    pub fn new() -> Self {
        Self {
            dropdown: SelectList::new(),
            favorites: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state);
        match state.screen {
            Screen::Main => {
                sprite_backend::clear_artwork();
                render_main(frame, layout[1], state, &mut self.dropdown);
            }
            Screen::Info => render_info(frame, layout[1], state),
        }
        render_footer(frame, layout[2], state, &mut self.status_bar);

        if state.view_state() == ViewState::FavoritesModal {
            render_favorites_modal(frame, area, state, &mut self.favorites);
        }
        if state.notice.is_some() {
            sprite_backend::clear_artwork();
            render_notice(frame, area, state);
        }
    }
}

pub fn handle_event(event: &EventKind, state: &AppState) -> EventOutcome<Action> {
    match event {
        EventKind::Resize(width, height) => {
            EventOutcome::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        EventKind::Key(key) => handle_key(*key, state),
        _ => EventOutcome::ignored(),
    }
}

fn handle_key(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return EventOutcome::action(Action::Quit);
    }
    // A notice blocks everything underneath until dismissed.
    if state.notice.is_some() {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                EventOutcome::action(Action::NoticeDismiss)
            }
            _ => EventOutcome::ignored(),
        };
    }

    match state.view_state() {
        ViewState::FavoritesModal => handle_favorites_key(key),
        ViewState::Info => handle_info_key(key),
        ViewState::Main => match state.focus {
            MainFocus::Dropdown => handle_dropdown_key(key, state),
            MainFocus::Entry => handle_entry_key(key),
        },
    }
}

fn handle_favorites_key(key: KeyEvent) -> EventOutcome<Action> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => EventOutcome::action(Action::FavoritesMove(-1)),
        KeyCode::Down | KeyCode::Char('j') => EventOutcome::action(Action::FavoritesMove(1)),
        KeyCode::Char(' ') => EventOutcome::action(Action::FavoritesToggleMark),
        KeyCode::Enter | KeyCode::Delete | KeyCode::Char('d') => {
            EventOutcome::action(Action::FavoritesRemoveMarked)
        }
        KeyCode::Esc | KeyCode::Char('v') => EventOutcome::action(Action::FavoritesClose),
        KeyCode::Char('q') => EventOutcome::action(Action::Quit),
        _ => EventOutcome::ignored(),
    }
}

fn handle_info_key(key: KeyEvent) -> EventOutcome<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('b') => {
            EventOutcome::action(Action::Back)
        }
        KeyCode::Char('v') => EventOutcome::action(Action::FavoritesOpen),
        KeyCode::Char('q') => EventOutcome::action(Action::Quit),
        _ => EventOutcome::ignored(),
    }
}

fn handle_dropdown_key(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::DropdownMove(-1),
        KeyCode::Down | KeyCode::Char('j') => Action::DropdownMove(1),
        KeyCode::PageUp => Action::DropdownMove(i16::MIN),
        KeyCode::PageDown => Action::DropdownMove(i16::MAX),
        KeyCode::Char(' ') => Action::DropdownSelect(state.dropdown_cursor),
        KeyCode::Enter => Action::DropdownConfirm,
        KeyCode::Char('g') => Action::LookupSubmit,
        KeyCode::Backspace | KeyCode::Delete | KeyCode::Char('x') => Action::DropdownClear,
        KeyCode::Char('a') => Action::FavoriteAdd,
        KeyCode::Char('v') => Action::FavoritesOpen,
        KeyCode::Tab | KeyCode::Char('/') => Action::FocusToggle,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return EventOutcome::ignored(),
    };
    EventOutcome::action(action)
}

fn handle_entry_key(key: KeyEvent) -> EventOutcome<Action> {
    match key.code {
        KeyCode::Enter => EventOutcome::action(Action::FreeSearchSubmit),
        KeyCode::Backspace => EventOutcome::action(Action::EntryBackspace),
        KeyCode::Tab | KeyCode::Esc => EventOutcome::action(Action::FocusToggle),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            EventOutcome::action(Action::EntryInput(ch))
        }
        _ => EventOutcome::ignored(),
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let title_style = Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD);
    let page = match state.screen {
        Screen::Main => "SEARCH",
        Screen::Info => "INFO",
    };
    let line = Line::from(vec![
        Span::styled("POKEINFO", title_style),
        Span::raw("  |  "),
        Span::styled(page, Style::default().fg(ACCENT_GOLD)),
        Span::raw("  |  Favorites: "),
        Span::styled(
            state.favorites.len().to_string(),
            Style::default().fg(ACCENT_TEAL),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_main(frame: &mut Frame, area: Rect, state: &AppState, dropdown: &mut SelectList) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    let selected = if state.dropdown_value.is_empty() {
        Span::styled("(none)", Style::default().fg(TEXT_DIM))
    } else {
        Span::styled(
            capitalize(&state.dropdown_value),
            Style::default().fg(ACCENT_GOLD),
        )
    };
    let selection = Paragraph::new(Line::from(vec![
        Span::raw("Select Pokemon: "),
        selected,
    ]))
    .block(panel("SELECTED", false));
    frame.render_widget(selection, layout[0]);

    let entry_focused = state.focus == MainFocus::Entry;
    let mut entry_spans = vec![Span::raw("Free Search: "), Span::raw(state.entry.clone())];
    if entry_focused {
        entry_spans.push(Span::styled("_", Style::default().fg(ACCENT_TEAL)));
    }
    let entry = Paragraph::new(Line::from(entry_spans)).block(panel("SEARCH", entry_focused));
    frame.render_widget(entry, layout[1]);

    let list_block = panel("POKEMON", state.focus == MainFocus::Dropdown);
    let inner = list_block.inner(layout[2]);
    frame.render_widget(list_block, layout[2]);

    if state.names.is_empty() {
        let text = if state.names_loading {
            format!("Loading Pokemon {}", spinner(state))
        } else {
            "No Pokemon loaded.".to_string()
        };
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            inner,
        );
        return;
    }

    let items = name_items(state);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.dropdown_cursor.min(items.len().saturating_sub(1)),
        is_focused: state.focus == MainFocus::Dropdown && state.notice.is_none(),
        style: list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::DropdownSelect,
        render_item: &|item| item.clone(),
    };
    dropdown.render(frame, inner, props);
}

fn render_info(frame: &mut Frame, area: Rect, state: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let art_block = panel("ARTWORK", false);
    let art_inner = art_block.inner(layout[0]);
    frame.render_widget(art_block, layout[0]);
    render_artwork(frame, art_inner, state);

    let details = state
        .details
        .as_ref()
        .map(format_details)
        .unwrap_or_default();
    let text = Paragraph::new(Text::from(details))
        .block(panel("DETAILS", false))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(TEXT_MAIN));
    frame.render_widget(text, layout[1]);
}

fn render_artwork(frame: &mut Frame, area: Rect, state: &AppState) {
    let fallback = match &state.artwork {
        ArtworkState::Ready(art) if state.notice.is_none() && !state.favorites_modal.open => {
            let (cols, rows) = artwork_fit(art, area.width, area.height);
            match artwork::kitty_sequence(art, cols, rows) {
                Ok(sequence) => {
                    let x = area.x.saturating_add(area.width.saturating_sub(cols) / 2);
                    let y = area.y.saturating_add(area.height.saturating_sub(rows) / 2);
                    sprite_backend::place_artwork(x, y, sequence);
                    return;
                }
                Err(err) => {
                    tracing::warn!(%err, "artwork encode failed");
                    "Image not available".to_string()
                }
            }
        }
        ArtworkState::Ready(_) | ArtworkState::Idle => String::new(),
        ArtworkState::Loading => format!("Loading artwork {}", spinner(state)),
        ArtworkState::Unavailable(_) => "Image not available".to_string(),
    };

    sprite_backend::clear_artwork();
    let paragraph = Paragraph::new(fallback)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(TEXT_DIM));
    let middle = Rect {
        y: area.y.saturating_add(area.height / 2),
        height: area.height.min(1),
        ..area
    };
    frame.render_widget(paragraph, middle);
}

fn render_favorites_modal(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    favorites: &mut SelectList,
) {
    sprite_backend::clear_artwork();
    let modal = modal_rect(40, 16, area);
    frame.render_widget(Clear, modal);
    let block = panel("FAVORITES", true);
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let names = state.favorites.list();
    if names.is_empty() {
        frame.render_widget(
            Paragraph::new("No favorites yet.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            inner,
        );
        return;
    }

    let items: Vec<Line<'static>> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let marked = state.favorites_modal.marked.contains(&idx);
            let marker = if marked { "[x] " } else { "[ ] " };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(ACCENT_GOLD)),
                Span::raw(capitalize(name)),
            ])
        })
        .collect();
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.favorites_modal.cursor.min(items.len().saturating_sub(1)),
        is_focused: state.notice.is_none(),
        style: list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: |_| Action::FavoritesToggleMark,
        render_item: &|item| item.clone(),
    };
    favorites.render(frame, inner, props);
}

fn render_notice(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(notice) = state.notice.as_ref() else {
        return;
    };
    let (title, accent) = match notice.kind {
        NoticeKind::Error => ("ERROR", ACCENT_RED),
        NoticeKind::Info => ("INFO", ACCENT_TEAL),
    };
    let modal = modal_rect(48, 7, area);
    frame.render_widget(Clear, modal);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
    let text = Text::from(vec![
        Line::from(notice.text.clone()),
        Line::from(""),
        Line::from(Span::styled("Enter: OK", Style::default().fg(TEXT_DIM))),
    ]);
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        modal,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = if let Some(pending) = state.lookup.as_ref() {
        format!("Looking up {} {}", capitalize(&pending.name), spinner(state))
    } else if state.names_loading {
        format!("Loading list {}", spinner(state))
    } else {
        String::new()
    };
    let hints = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];
    let no_hints: [StatusBarHint<'static>; 0] = [];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::hints(&no_hints),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.notice.is_some() {
        return vec![StatusBarHint::new("Enter", "OK")];
    }
    match state.view_state() {
        ViewState::FavoritesModal => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Space", "Mark"),
            StatusBarHint::new("d", "Remove"),
            StatusBarHint::new("Esc", "Close"),
        ],
        ViewState::Info => vec![
            StatusBarHint::new("Esc", "Back"),
            StatusBarHint::new("q", "Quit"),
        ],
        ViewState::Main if state.focus == MainFocus::Entry => vec![
            StatusBarHint::new("Enter", "Free Search"),
            StatusBarHint::new("Tab", "List"),
        ],
        ViewState::Main => vec![
            StatusBarHint::new("Enter", "Select+Info"),
            StatusBarHint::new("g", "Get Info"),
            StatusBarHint::new("a", "Add Fav"),
            StatusBarHint::new("v", "Favorites"),
            StatusBarHint::new("Tab", "Search"),
            StatusBarHint::new("q", "Quit"),
        ],
    }
}

fn name_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .names
        .iter()
        .map(|summary| {
            let style = if summary.name == state.dropdown_value {
                Style::default().fg(ACCENT_GOLD)
            } else {
                Style::default().fg(TEXT_MAIN)
            };
            Line::from(Span::styled(capitalize(&summary.name), style))
        })
        .collect()
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn panel(title: &'static str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(border)
}

fn spinner(state: &AppState) -> &'static str {
    SPINNER[(state.tick % SPINNER.len() as u64) as usize]
}

fn modal_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

fn artwork_fit(art: &Artwork, max_cols: u16, max_rows: u16) -> (u16, u16) {
    if max_cols == 0 || max_rows == 0 || art.height == 0 {
        return (max_cols, max_rows);
    }
    let image_ratio = art.width as f32 / art.height as f32;
    let cols_for_max_rows = image_ratio * max_rows as f32 * CELL_ASPECT;
    if cols_for_max_rows <= max_cols as f32 {
        let cols = cols_for_max_rows.max(1.0).round() as u16;
        return (cols.max(1), max_rows.max(1));
    }
    let rows = (max_cols as f32 / (image_ratio * CELL_ASPECT)).max(1.0).round() as u16;
    (max_cols.max(1), rows.min(max_rows).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn actions(outcome: EventOutcome<Action>) -> Vec<Action> {
        outcome.actions
    }

    #[test]
    fn notice_swallows_keys_until_dismissed() {
        let mut state = AppState::default();
        state.notice = Some(crate::state::Notice::error("Error: 404"));

        assert!(actions(handle_event(&press(KeyCode::Char('g')), &state)).is_empty());
        assert_eq!(
            actions(handle_event(&press(KeyCode::Enter), &state)),
            vec![Action::NoticeDismiss]
        );
    }

    #[test]
    fn entry_focus_captures_characters() {
        let mut state = AppState::default();
        state.focus = MainFocus::Entry;
        assert_eq!(
            actions(handle_event(&press(KeyCode::Char('q')), &state)),
            vec![Action::EntryInput('q')]
        );
        assert_eq!(
            actions(handle_event(&press(KeyCode::Enter), &state)),
            vec![Action::FreeSearchSubmit]
        );
    }

    #[test]
    fn info_screen_keys() {
        let mut state = AppState::default();
        state.screen = Screen::Info;
        assert_eq!(
            actions(handle_event(&press(KeyCode::Esc), &state)),
            vec![Action::Back]
        );
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut state = AppState::default();
        state.focus = MainFocus::Entry;
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            actions(handle_event(&EventKind::Key(key), &state)),
            vec![Action::Quit]
        );
    }

    #[test]
    fn wide_artwork_is_limited_by_columns() {
        let art = Artwork {
            payload: String::new(),
            width: 475,
            height: 475,
        };
        assert_eq!(artwork_fit(&art, 20, 20), (20, 10));
        assert_eq!(artwork_fit(&art, 80, 10), (20, 10));
    }
}
