use clap::Parser;
use color_eyre::Result;
use rete_dash::{
    api::ApiClient,
    app::{App, AppMode},
    channel::{ReconnectPolicy, ReconnectingChannel, WsTransport},
    cli::Cli,
    config::Config,
    export::resolve_export_dir,
    logging,
    metrics::{MetricsController, PollerHandle, PollingScheduler},
    sink::{LogSink, Notification},
    tui::{
        event::{poll_action, Action},
        screens::dashboard::DashboardScreen,
        terminal, TuiSink, ViewModel,
    },
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let _log_guard = if cli.headless {
        logging::init_stderr_logging(&config.logging)?;
        None
    } else {
        Some(logging::init_file_logging(&config.logging)?)
    };

    let (channel_tx, channel_rx) = mpsc::unbounded_channel();
    let (poll_tx, poll_rx) = mpsc::unbounded_channel();

    let api = Arc::new(ApiClient::new(config.base_url()?, config.request_timeout)?);
    let (scheduler, poller) = PollingScheduler::new(api, config.poll_interval, poll_tx);

    let view = ViewModel::shared(config.toast_ttl);
    let mut controller = MetricsController::new(config.history_capacity, config.scoring);
    if cli.headless {
        controller.register(Box::new(LogSink::new()));
    } else {
        controller.register(Box::new(TuiSink::new(view.clone())));
    }
    controller.attach_poller(poller.clone());

    let mut channel = ReconnectingChannel::new(
        Arc::new(WsTransport::new()),
        ReconnectPolicy::from_config(&config),
        channel_tx,
    );
    let push_url = config.push_url()?;
    info!(server = %config.server_url, push = %push_url, "starting dashboard");
    channel.connect(push_url.to_string());
    controller.attach_channel(channel);

    let cancel = CancellationToken::new();
    let controller_handle = tokio::spawn(controller.run(channel_rx, poll_rx, cancel.clone()));
    let poller_handle = tokio::spawn(scheduler.run(cancel.clone()));

    if cli.headless {
        tokio::signal::ctrl_c().await?;
    } else {
        let mut tui = terminal::setup_terminal()?;
        let result = run_ui(&mut tui, App::new(view), &poller, &config);
        terminal::restore_terminal(&mut tui)?;
        result?;
    }

    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(1), controller_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(1), poller_handle).await;
    info!("dashboard stopped");
    Ok(())
}

fn run_ui(
    tui: &mut terminal::Tui,
    mut app: App,
    poller: &PollerHandle,
    config: &Config,
) -> Result<()> {
    while !app.should_quit {
        let exported = {
            let mut view = app.view.write();
            view.prune_toasts(Instant::now());
            view.exported.take()
        };
        if let Some(path) = exported {
            app.show_export_success(path);
        }

        tui.draw(|frame| DashboardScreen::render(frame, &app))?;

        let before = app.current_section;
        match poll_action(&app.mode, Duration::from_millis(100))? {
            Action::Quit => app.quit(),
            Action::Section(index) => app.select_section(index),
            Action::NextSection => app.next_section(),
            Action::PrevSection => app.previous_section(),
            Action::Up => app.scroll_up(),
            Action::Down => app.scroll_down(),
            Action::Refresh => poller.refresh(app.current_section),
            Action::Help => app.toggle_help(),
            Action::Close => match app.mode {
                AppMode::Help => app.toggle_help(),
                _ => app.cancel_dialog(),
            },
            Action::Export => app.show_export_confirmation(),
            Action::Confirm => {
                app.cancel_dialog();
                poller.export_network(resolve_export_dir(config.export_dir.as_deref()));
            }
            Action::NewRule => app.open_rule_form(),
            Action::NextField => app.next_form_field(),
            Action::PrevField => app.previous_form_field(),
            Action::Input(c) => app.push_form_char(c),
            Action::Backspace => app.pop_form_char(),
            Action::Submit => match app.submit_rule_form() {
                Ok(rule) => poller.create_rule(rule),
                Err(count) => app.view.write().push_toast(
                    Notification::error(
                        "Invalid alert rule",
                        format!("{} field(s) need attention", count),
                    ),
                    Instant::now(),
                ),
            },
            Action::DismissToasts => app.view.write().dismiss_toasts(),
            Action::None => {}
        }

        if app.current_section != before {
            poller.show(app.current_section);
        }
    }
    Ok(())
}
