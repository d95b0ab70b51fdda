use clap::{Parser, ValueEnum};

use tideline::pages::{portfolio, restaurant};
use tideline::{MemoryStage, Property, SequenceRegistry, Viewport};

#[derive(Parser, Debug)]
#[command(name = "tideline", version)]
struct Cli {
    /// Page composition to drive.
    #[arg(long, value_enum, default_value_t = PageChoice::Restaurant)]
    page: PageChoice,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Scroll offset reached by the end of the sweep, in pixels.
    #[arg(long, default_value_t = 3000.0)]
    scroll_to: f64,

    /// Number of 60 Hz frames the sweep spans.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Print a property report every N frames.
    #[arg(long, default_value_t = 60)]
    report_every: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PageChoice {
    Restaurant,
    Portfolio,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut stage = MemoryStage::new();
    let mut registry = SequenceRegistry::new();
    let vp = Viewport::new(cli.width, cli.height)?;

    let watched: Vec<(&'static str, tideline::ElementId)> = match cli.page {
        PageChoice::Restaurant => {
            let page = restaurant::mount(&mut registry, &mut stage, &vp)?;
            vec![
                ("nav bar y", page.header),
                ("hero title opacity", page.hero_title),
                ("about cta opacity", page.cta),
            ]
        }
        PageChoice::Portfolio => {
            let page = portfolio::mount(&mut registry, &mut stage, &vp)?;
            vec![
                ("loader y", page.loader),
                ("first card opacity", page.cards[0].card),
                ("accent channel", page.root),
            ]
        }
    };

    let dt = 1.0 / 60.0;
    for frame in 0..cli.frames {
        let progress = f64::from(frame) / f64::from(cli.frames.max(1));
        let scroll = cli.scroll_to * progress;
        registry.set_viewport(vp.at_scroll(scroll));
        registry.tick(dt, &mut stage);

        if frame % cli.report_every == 0 {
            println!("frame {frame:4}  scroll {scroll:7.1}px");
            for (label, el) in &watched {
                report(&stage, label, *el);
            }
        }
    }

    println!("done: {} active sequences", registry.len());
    Ok(())
}

fn report(stage: &MemoryStage, label: &str, el: tideline::ElementId) {
    use tideline::Stage as _;
    for property in [
        Property::Y,
        Property::Opacity,
        Property::var(tideline::theme::ACCENT),
    ] {
        if let Some(value) = stage.read(el, &property) {
            println!("    {label:20} {property:?} = {value:?}");
        }
    }
}
