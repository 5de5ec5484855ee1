//! Background resolution

use super::sticky;
use crate::resolve::AssetResolver;
use crate::types::{Background, ScriptLine};

/// Effective background at `index`
///
/// A `black_bg` anywhere in `0..=index` takes precedence over every
/// `bg_name`; otherwise the nearest `bg_name` wins; otherwise `default`.
pub fn resolve(
    scripts: &[ScriptLine],
    index: usize,
    default: Option<&str>,
    assets: &dyn AssetResolver,
) -> Background {
    if sticky::scan(scripts, index, |line| line.black_bg.then_some(())).is_some() {
        return Background::black();
    }

    match sticky::scan(scripts, index, |line| line.bg_name.as_deref()) {
        Some(name) => {
            log::trace!("background at {index}: {name}");
            Background {
                url: assets.background_url(name),
                is_black: false,
            }
        }
        None => Background::from_default(default),
    }
}
