use clap::Subcommand;
use folio_preference::{ColorScheme, FileStorage, PreferenceEvent, PreferenceStore, Theme};
use strum::VariantArray;
use tokio::sync::broadcast::error::RecvError;

#[derive(Subcommand, Default)]
pub enum ThemeAction {
    /// Print the active theme
    #[default]
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme (light, dark)
    Set { theme: String },
}

#[derive(Subcommand, Default)]
pub enum SchemeAction {
    /// Print the active color scheme
    #[default]
    Show,
    /// List the available color schemes
    List,
    /// Set the color scheme
    Set { scheme: String },
}

fn open(config: &folio::Config) -> anyhow::Result<PreferenceStore> {
    let storage = FileStorage::open(&config.preferences.path)?;

    Ok(PreferenceStore::load(storage))
}

pub fn theme(config: folio::Config, action: ThemeAction) -> anyhow::Result<()> {
    let store = open(&config)?;

    match action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            store.toggle_theme()?;
        }
        ThemeAction::Set { theme } => {
            let theme = Theme::parse(&theme)?;
            if !store.set_theme(theme)? {
                tracing::info!(theme = %theme, "Theme already active");
            }
        }
    }

    println!("{}", store.theme());

    Ok(())
}

pub async fn scheme(config: folio::Config, action: SchemeAction) -> anyhow::Result<()> {
    let store = open(&config)?;

    match action {
        SchemeAction::Show => println!("{}", store.color_scheme()),
        SchemeAction::List => {
            let active = store.color_scheme();
            for scheme in ColorScheme::VARIANTS {
                let marker = if *scheme == active { "*" } else { " " };
                println!("{marker} {:<14} {}", scheme.to_string(), scheme.accent());
            }
        }
        SchemeAction::Set { scheme } => {
            let scheme = ColorScheme::parse(&scheme)?;
            let mut events = store.subscribe();

            if store.set_color_scheme(scheme)? {
                wait_transition(&mut events).await;
            } else {
                tracing::info!(color_scheme = %scheme, "Color scheme already active");
            }

            println!("{}", store.color_scheme());
        }
    }

    Ok(())
}

async fn wait_transition(events: &mut tokio::sync::broadcast::Receiver<PreferenceEvent>) {
    loop {
        match events.recv().await {
            Ok(PreferenceEvent::TransitionEnded) | Err(RecvError::Closed) => return,
            Ok(_) | Err(RecvError::Lagged(_)) => {}
        }
    }
}
