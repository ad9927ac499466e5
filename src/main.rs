mod app;
mod catalog;
mod map;
mod util;

use std::path::PathBuf;

use clap::Parser;

use crate::catalog::Catalog;
use crate::map::Timings;

const FAST_FACTOR: f64 = 0.1;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Experiences to place on the map, in order. Opens the selection screen when empty.
    experiences: Vec<String>,

    /// JSON emotion catalog replacing the built-in one.
    #[arg(long)]
    emotion_catalog: Option<PathBuf>,

    /// Shorten every scripted delay tenfold.
    #[arg(long)]
    fast: bool,
}

impl Args {
    fn catalog(&self) -> Catalog {
        let Some(path) = &self.emotion_catalog else {
            return Catalog::builtin();
        };

        match Catalog::load(path) {
            Ok(catalog) => {
                log::info!(
                    "loaded {} emotion categories from {}",
                    catalog.categories.len(),
                    path.display()
                );
                catalog
            }
            Err(error) => {
                log::warn!("{error:#}; using the built-in catalog");
                Catalog::builtin()
            }
        }
    }

    fn timings(&self) -> Timings {
        if self.fast {
            Timings::default().scaled(FAST_FACTOR)
        } else {
            Timings::default()
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let catalog = args.catalog();
    let timings = args.timings();
    let labels = args
        .experiences
        .iter()
        .map(|label| label.trim().to_owned())
        .filter(|label| !label.is_empty())
        .collect::<Vec<_>>();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "belief-map",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::BeliefMapApp::new(
                cc, labels, catalog, timings,
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_experiences_and_flags() {
        let args = Args::try_parse_from(["belief-map", "--fast", "Exam", "Other - Family"])
            .expect("valid args");
        assert_eq!(args.experiences, vec!["Exam", "Other - Family"]);
        assert!(args.fast);
        assert!((args.timings().loading - 250.0).abs() < 1e-9);
        assert_eq!(args.timings().camera_move, 400.0);
    }

    #[test]
    fn missing_catalog_falls_back() {
        let args = Args::try_parse_from([
            "belief-map",
            "--emotion-catalog",
            "/nonexistent/emotions.json",
        ])
        .expect("valid args");
        assert!(args.experiences.is_empty());
        assert!(!args.catalog().fallback.is_empty());
    }
}
