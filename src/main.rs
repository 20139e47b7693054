use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventOutcome, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};

use pokeinfo::action::Action;
use pokeinfo::api::{self, ApiConfig, HttpPokeClient, PokeClient};
use pokeinfo::effect::{self, Effect};
use pokeinfo::logging;
use pokeinfo::reducer::reducer;
use pokeinfo::sprite_backend::{self, ArtworkBackend};
use pokeinfo::state::AppState;
use pokeinfo::ui;

#[derive(Parser, Debug)]
#[command(name = "pokeinfo")]
#[command(about = "Look up Pokemon, view their artwork and keep a favorites list")]
struct Args {
    /// Base URL of the Pokemon data API
    #[arg(long, default_value = api::DEFAULT_API_BASE)]
    api_base: String,

    /// Base URL for official artwork images (`<base>/<id>.png`)
    #[arg(long, default_value = api::DEFAULT_ARTWORK_BASE)]
    artwork_base: String,

    /// How many names to load into the selection list (at least 1)
    #[arg(
        long,
        default_value_t = api::DEFAULT_LIST_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    list_limit: u32,

    /// Write logs to this file (logging is off otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// tracing filter directive used with --log-file
    #[arg(long, default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init(args.log_file.as_deref(), &args.log_level)?;
    let debug = DebugSession::new(args.debug);

    let list_limit = args.list_limit;
    let state = debug
        .load_state_or_else_async(|| async move {
            Ok::<AppState, io::Error>(AppState::new(list_limit))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let client: Arc<dyn PokeClient> = Arc::new(HttpPokeClient::new(ApiConfig {
        api_base: args.api_base,
        artwork_base: args.artwork_base,
    }));

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = ArtworkBackend::new(stdout, sprite_backend::artwork_slot());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, client).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("pokeinfo exiting");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    client: Arc<dyn PokeClient>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(ui::PokeUi::new()));

    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(120), || Action::Tick);
            },
            |frame, area, state, _render_ctx: RenderContext| {
                ui.borrow_mut().render(frame, area, state);
            },
            |event, state| -> EventOutcome<Action> { ui::handle_event(event, state) },
            |action| matches!(action, Action::Quit),
            move |effect: Effect, ctx: &mut EffectContext<Action>| {
                handle_effect(&client, effect, ctx)
            },
        )
        .await
}

fn handle_effect(client: &Arc<dyn PokeClient>, effect: Effect, ctx: &mut EffectContext<Action>) {
    let key = TaskKey::new(effect.task_key());
    // A newer lookup supersedes the artwork still downloading for the previous one.
    if matches!(effect, Effect::FetchDetails { .. }) {
        ctx.tasks().cancel(&TaskKey::new("artwork"));
    }
    let client = Arc::clone(client);
    ctx.tasks().spawn(key, async move {
        effect::perform(client.as_ref(), effect).await
    });
}
