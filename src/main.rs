use clap::Parser;
use lotte_vegi::{cli, clipboard, commands, config, error};
use lotte_vegi::clipboard::NativeClipboard;
use lotte_vegi::console::ConsoleNotifier;
use lotte_vegi_common::{Notifier, OpenAttempt, SortConfig};
use cli::{Cli, Commands, SwitchMode};
use config::Config;
use error::Result;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Commands::HoldClipboard = cli.command {
        clipboard::hold_from_stdin()?;
        return Ok(());
    }
    init_tracing(cli.verbose);

    let config = Config::load()?;

    if let Commands::Config { show, set_data, set_state, set_sort_by, set_order, set_browser } =
        cli.command
    {
        let mut config = config;
        let changed = set_data.is_some()
            || set_state.is_some()
            || set_sort_by.is_some()
            || set_order.is_some()
            || set_browser.is_some();

        if let Some(path) = set_data {
            config.data_path = Some(path);
        }
        if let Some(path) = set_state {
            config.state_path = Some(path);
        }
        if let Some(key) = set_sort_by {
            config.sort_by = key;
        }
        if let Some(order) = set_order {
            config.order = order;
        }
        if let Some(browser) = set_browser {
            config.browser = Some(browser).filter(|b| !b.trim().is_empty());
        }
        if changed {
            config.save()?;
            println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
        }

        if show || !changed {
            println!("設定:");
            println!("  データ: {}", config.resolve_data_path(None).display());
            println!("  状態: {}", config.resolve_state_path(None)?.display());
            println!("  ソート: {}", SortConfig::new(config.sort_by, config.order).label());
            println!("  ブラウザ: {}", config.browser.as_deref().unwrap_or("(既定)"));
        }
        return Ok(());
    }

    let data_path = config.resolve_data_path(cli.data);
    let state_path = config.resolve_state_path(cli.state)?;
    let sort = SortConfig::new(
        cli.sort_by.unwrap_or(config.sort_by),
        cli.order.unwrap_or(config.order),
    );
    let mut controller =
        commands::open_controller(&data_path, &state_path, sort, config.browser.as_deref())?;
    let notifier = ConsoleNotifier;

    match cli.command {
        Commands::List => {
            for line in commands::render_list(&controller) {
                println!("{}", line);
            }
        }

        Commands::Pick { ids } => {
            if ids.is_empty() {
                let changed = commands::pick_interactive(&mut controller)?;
                println!("✔ {}件を変更 (찜 {})", changed, controller.picked_count());
            } else {
                for (id, picked) in commands::toggle_picks(&mut controller, &ids)? {
                    println!("{} {}", if picked { "✔ 찜" } else { "✖ 해제" }, id);
                }
                println!("찜 {}", controller.picked_count());
            }
        }

        Commands::OnlyPicked { mode } => {
            let requested = match mode {
                SwitchMode::On => true,
                SwitchMode::Off => false,
                SwitchMode::Toggle => !controller.show_only_picked(),
            };
            if requested != controller.show_only_picked() {
                controller.toggle_show_only_picked();
            }
            if requested && !controller.show_only_picked() {
                notifier.notify(&lotte_vegi_common::Notice::NothingSelected);
            }
            for line in commands::render_list(&controller) {
                println!("{}", line);
            }
        }

        Commands::Copy => {
            let clipboard = NativeClipboard::new();
            let notice = commands::copy_links(&mut controller, &clipboard).await;
            notifier.notify(&notice);
        }

        Commands::OpenAll => {
            let clipboard = NativeClipboard::new();
            let notice = commands::open_all(&mut controller, &clipboard).await;
            notifier.notify(&notice);
            controller.dispatcher().scheduler().drain().await;
        }

        Commands::Open { id } => {
            if commands::open_item(&controller, &id)? == OpenAttempt::Blocked {
                eprintln!("⚠ 브라우저를 열 수 없었어요: {}", id);
            }
        }

        Commands::Config { .. } | Commands::HoldClipboard => {}
    }

    Ok(())
}
