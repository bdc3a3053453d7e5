//! Devalue demo: load an image, apply one brightness-reducing effect,
//! report the preview placement and export a PNG.

mod backend;
mod config;

use anyhow::{Context, bail};
use clap::Parser;
use devalue_core::{EffectPreset, EffectRegistry, GradingSession};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Cli, DemoConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devalue_core=info,devalue_gpu=info,devalue_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();
    let registry = EffectRegistry::new();

    if cli.list {
        print_effects(&registry);
        return Ok(());
    }

    let config = DemoConfig::from_env().with_cli(&cli);
    tracing::info!(
        title = %config.title,
        image = %config.image.display(),
        viewport = ?config.viewport,
        "starting"
    );

    let mut session = GradingSession::new(registry, config.viewport)?;
    session
        .load_image(&config.image)
        .with_context(|| format!("loading {}", config.image.display()))?;

    if let Some(path) = &cli.preset {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading preset {}", path.display()))?;
        session.apply_preset(&EffectPreset::from_json(&json)?)?;
    }
    if let Some(name) = &cli.effect {
        session.select_effect(name)?;
    }
    for (key, value) in &cli.set {
        let Some(applied) = session.set_parameter_by_key(key, *value) else {
            bail!("{} has no parameter {key:?}", session.effect().name());
        };
        if applied != *value {
            tracing::warn!(key = %key, requested = value, applied, "value clamped");
        }
    }

    let mut compositor = backend::select_compositor(config.gpu);
    let frame = backend::preview_with_fallback(&session, &mut compositor)?;

    println!("effect:   {}", session.effect().name());
    for slider in session.effect().parameters().sliders() {
        println!("  {:<18} {:.3}", slider.name(), slider.value());
    }
    println!(
        "preview:  {}x{} on {} at scale {:.3}, offset ({:.1}, {:.1})",
        frame.image.width(),
        frame.image.height(),
        frame.backend,
        frame.fit.scale,
        frame.fit.translate_x,
        frame.fit.translate_y,
    );

    if let Some(output) = &cli.output {
        session.export(&compositor, output)?;
        println!("exported: {}", output.display());
    }

    if let Some(path) = &cli.save_preset {
        let json = session.effect().to_preset().to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("writing preset {}", path.display()))?;
        println!("preset:   {}", path.display());
    }

    Ok(())
}

fn print_effects(registry: &EffectRegistry) {
    for &kind in registry.kinds() {
        println!("{}", kind.name());
        for slider in devalue_core::Effect::new(kind).parameters().sliders() {
            println!(
                "  {:<12} {:<18} default {:.2}  range [{:.2}, {:.2}]",
                slider.uniform_key(),
                slider.name(),
                slider.default_value(),
                slider.min(),
                slider.max(),
            );
        }
    }
}
